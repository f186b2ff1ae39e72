//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::middleware::session::SESSION_IDLE_SECONDS;
use crate::widget::WidgetStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    widgets: WidgetStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let widgets = WidgetStore::new(Duration::from_secs(SESSION_IDLE_SECONDS.unsigned_abs()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                widgets,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the per-visitor widget store.
    #[must_use]
    pub fn widgets(&self) -> &WidgetStore {
        &self.inner.widgets
    }
}
