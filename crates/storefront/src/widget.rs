//! Per-visitor widget state.
//!
//! Each visitor owns one [`WidgetState`], kept server-side in the
//! [`WidgetStore`] behind its own lock. The session only carries the
//! visitor id. Handlers take the lock, mutate through the cart, modal and
//! filter operations, render, and release it; the lock is never held across
//! a catalog fetch, so a handler that fetched re-locks and applies its result
//! to whatever the state has become meanwhile.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use green_earth_core::{ActiveCategory, Cart, Category, Modal, Plant};
use tokio::sync::Mutex;
use tower_sessions::Session;
use uuid::Uuid;

use crate::catalog::CatalogClient;
use crate::error::Result;

/// Session keys for widget data.
pub mod keys {
    /// Key for the visitor id that selects the widget in the store.
    pub const VISITOR: &str = "visitor";
}

/// Outcome of the category fetch done at page load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryListing {
    /// No page load has fetched the categories for this widget yet.
    #[default]
    NotLoaded,
    Loaded(Vec<Category>),
    Failed,
}

/// Outcome of a plant list fetch. Never stored; rendered and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlantListing {
    Loaded(Vec<Plant>),
    Failed,
}

/// Everything one visitor's widget remembers between events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub categories: CategoryListing,
    pub active_category: ActiveCategory,
    pub cart: Cart,
    pub modal: Modal,
}

impl WidgetState {
    /// Start over for a fresh page load: empty cart, closed modal, "all"
    /// filter.
    ///
    /// The modal keeps counting tickets, so a detail request issued before
    /// the reload cannot match an open-request made after it.
    pub fn restart(&mut self, categories: CategoryListing) {
        self.categories = categories;
        self.active_category = ActiveCategory::All;
        self.cart.clear();
        self.modal.close();
    }
}

/// One visitor's widget, shared by that visitor's concurrent requests.
pub type SharedWidget = Arc<Mutex<WidgetState>>;

struct Visitor {
    widget: SharedWidget,
    touched: Instant,
}

/// Server-side widgets keyed by visitor id.
///
/// Widgets idle for longer than the session lifetime are dropped when a new
/// visitor arrives.
#[derive(Clone)]
pub struct WidgetStore {
    visitors: Arc<Mutex<HashMap<String, Visitor>>>,
    idle: Duration,
}

impl WidgetStore {
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            visitors: Arc::new(Mutex::new(HashMap::new())),
            idle,
        }
    }

    /// The widget of the visitor behind `session`, created on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the visitor id cannot be read or
    /// stored.
    pub async fn widget(&self, session: &Session) -> Result<SharedWidget> {
        let id = visitor_id(session).await?;
        Ok(self.widget_for(&id).await)
    }

    async fn widget_for(&self, id: &str) -> SharedWidget {
        let now = Instant::now();
        let mut visitors = self.visitors.lock().await;

        if !visitors.contains_key(id) {
            let idle = self.idle;
            visitors.retain(|_, visitor| now.duration_since(visitor.touched) < idle);
            tracing::debug!(visitors = visitors.len() + 1, "New widget");
        }

        let visitor = visitors.entry(id.to_string()).or_insert_with(|| Visitor {
            widget: SharedWidget::default(),
            touched: now,
        });
        visitor.touched = now;
        Arc::clone(&visitor.widget)
    }
}

async fn visitor_id(session: &Session) -> Result<String> {
    if let Some(id) = session.get::<String>(keys::VISITOR).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    session.insert(keys::VISITOR, &id).await?;
    Ok(id)
}

impl CategoryListing {
    /// Fetch the category list, falling back to the failure message.
    pub async fn fetch(catalog: &CatalogClient) -> Self {
        match catalog.fetch_categories().await {
            Ok(categories) => Self::Loaded(categories),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    network = e.is_network_failure(),
                    "Failed to load categories"
                );
                Self::Failed
            }
        }
    }
}

impl PlantListing {
    /// Fetch the plants for `filter`: the whole catalog for the sentinel,
    /// one category otherwise. Exactly one request is issued.
    pub async fn fetch(catalog: &CatalogClient, filter: &ActiveCategory) -> Self {
        let result = match filter {
            ActiveCategory::All => catalog.fetch_all_plants().await,
            ActiveCategory::Category(id) => catalog.fetch_plants_by_category(id).await,
        };

        match result {
            Ok(plants) => Self::Loaded(plants),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    network = e.is_network_failure(),
                    filter = %filter,
                    "Failed to load plants"
                );
                Self::Failed
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use green_earth_core::{CartItem, CategoryId, PlantId, Price};
    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn item(id: &str) -> CartItem {
        CartItem {
            id: PlantId::new(id),
            name: "Neem".to_string(),
            price: Price::from(400),
        }
    }

    #[test]
    fn test_restart_keeps_ticket_counter() {
        let mut state = WidgetState::default();
        state.active_category = ActiveCategory::Category(CategoryId::new("5"));
        state.cart.add(item("3"));
        let before = state.modal.open(PlantId::new("3"));

        state.restart(CategoryListing::Failed);

        assert_eq!(state.active_category, ActiveCategory::All);
        assert!(state.cart.is_empty());
        assert!(!state.modal.is_open());
        assert_eq!(state.categories, CategoryListing::Failed);
        assert_eq!(state.modal.pending(before), None);

        let after = state.modal.open(PlantId::new("1"));
        assert!(after > before);
    }

    #[tokio::test]
    async fn test_same_session_shares_widget() {
        let store = WidgetStore::new(Duration::from_secs(60));
        let session = session();

        store.widget(&session).await.unwrap().lock().await.cart.add(item("3"));

        let widget = store.widget(&session).await.unwrap();
        assert_eq!(widget.lock().await.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_visitors_are_isolated() {
        let store = WidgetStore::new(Duration::from_secs(60));

        store.widget(&session()).await.unwrap().lock().await.cart.add(item("3"));

        let other = store.widget(&session()).await.unwrap();
        assert!(other.lock().await.cart.is_empty());
    }

    #[tokio::test]
    async fn test_idle_widgets_are_dropped() {
        let store = WidgetStore::new(Duration::ZERO);
        let first = session();

        store.widget(&first).await.unwrap().lock().await.cart.add(item("3"));
        store.widget(&session()).await.unwrap();

        let widget = store.widget(&first).await.unwrap();
        assert!(widget.lock().await.cart.is_empty());
    }
}
