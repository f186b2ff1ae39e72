//! Event router.
//!
//! Each widget region posts its events to one endpoint,
//! `POST /events/{region}`. The submitted fields describe the event target
//! (which button, which item); [`UiAction::decode`] turns them into a
//! semantic action and [`dispatch`] applies it and renders the regions it
//! touched.

use std::fmt;
use std::str::FromStr;

use green_earth_core::{ActiveCategory, Cart, CartItem, PlantId, Price};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::CatalogClient;
use crate::catalog::normalize::DEFAULT_PLANT_NAME;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::modal;
use crate::render::{Fragments, render_cart_list, render_category_list, render_product_grid};
use crate::widget::{CategoryListing, PlantListing, SharedWidget};

/// A widget region with its own event endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Categories,
    Grid,
    Cart,
    Modal,
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "categories" => Ok(Self::Categories),
            "grid" => Ok(Self::Grid),
            "cart" => Ok(Self::Cart),
            "modal" => Ok(Self::Modal),
            other => Err(AppError::BadRequest(format!("unknown region '{other}'"))),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Categories => "categories",
            Self::Grid => "grid",
            Self::Cart => "cart",
            Self::Modal => "modal",
        })
    }
}

/// Form fields describing the element an event came from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTarget {
    pub action: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
}

impl EventTarget {
    fn action(&self) -> &str {
        self.action.as_deref().map_or("", str::trim)
    }

    fn plant_id(&self) -> Option<PlantId> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(PlantId::new)
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SelectCategory(ActiveCategory),
    AddToCart(CartItem),
    OpenDetail(PlantId),
    AdjustQuantity { id: PlantId, delta: i64 },
    RemoveFromCart(PlantId),
    ClearCart,
    CloseModal,
    AddDisplayedToCart,
}

impl UiAction {
    /// Decode an event from `region`; `None` when the target is not an
    /// interactive element of that region.
    #[must_use]
    pub fn decode(region: Region, target: &EventTarget) -> Option<Self> {
        match (region, target.action()) {
            (Region::Categories, "select") => target
                .id
                .as_deref()
                .and_then(ActiveCategory::parse)
                .map(Self::SelectCategory),
            (Region::Grid, "add") => {
                let id = target.plant_id()?;
                let name = target
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(DEFAULT_PLANT_NAME)
                    .to_string();
                let price = target
                    .price
                    .as_deref()
                    .map_or(Price::ZERO, Price::parse_or_zero);
                Some(Self::AddToCart(CartItem { id, name, price }))
            }
            (Region::Grid, "open") => target.plant_id().map(Self::OpenDetail),
            (Region::Cart, "inc") => target
                .plant_id()
                .map(|id| Self::AdjustQuantity { id, delta: 1 }),
            (Region::Cart, "dec") => target
                .plant_id()
                .map(|id| Self::AdjustQuantity { id, delta: -1 }),
            (Region::Cart, "remove") => target.plant_id().map(Self::RemoveFromCart),
            (Region::Cart, "clear") => Some(Self::ClearCart),
            (Region::Modal, "close") => Some(Self::CloseModal),
            (Region::Modal, "add") => Some(Self::AddDisplayedToCart),
            _ => None,
        }
    }
}

/// Apply `action` to the visitor's widget and render the affected regions.
///
/// An empty result means the action's outcome was superseded while it was
/// fetching and nothing needs redrawing.
///
/// # Errors
///
/// Returns `AppError` if rendering fails. Catalog failures are rendered as
/// fallback states, not returned.
#[instrument(skip(widget, catalog))]
pub async fn dispatch(
    action: UiAction,
    widget: &SharedWidget,
    catalog: &CatalogClient,
) -> Result<Fragments> {
    match action {
        UiAction::SelectCategory(filter) => select_category(widget, catalog, filter).await,
        UiAction::AddToCart(item) => {
            add_breadcrumb(
                "cart",
                "Added item",
                Some(&[("plant_id", item.id.as_str())]),
            );
            update_cart(widget, |cart| cart.add(item)).await
        }
        UiAction::AdjustQuantity { id, delta } => {
            update_cart(widget, |cart| cart.update_quantity(&id, delta)).await
        }
        UiAction::RemoveFromCart(id) => {
            add_breadcrumb("cart", "Removed item", Some(&[("plant_id", id.as_str())]));
            update_cart(widget, |cart| cart.remove(&id)).await
        }
        UiAction::ClearCart => {
            add_breadcrumb("cart", "Cleared cart", None);
            update_cart(widget, Cart::clear).await
        }
        UiAction::OpenDetail(id) => modal::open(widget, id).await,
        UiAction::CloseModal => modal::close(widget).await,
        UiAction::AddDisplayedToCart => modal::add_displayed_to_cart(widget).await,
    }
}

/// Switch the active filter, then fetch and render the matching plants.
///
/// The category list is fetched again only when this widget never got one
/// (its page load happened before the widget expired). Plants that arrive
/// after another filter was selected are dropped.
async fn select_category(
    widget: &SharedWidget,
    catalog: &CatalogClient,
    filter: ActiveCategory,
) -> Result<Fragments> {
    let needs_categories = {
        let mut state = widget.lock().await;
        state.active_category = filter.clone();
        state.categories == CategoryListing::NotLoaded
    };

    let categories = if needs_categories {
        Some(CategoryListing::fetch(catalog).await)
    } else {
        None
    };
    let plants = PlantListing::fetch(catalog, &filter).await;

    let mut state = widget.lock().await;
    if let Some(listing) = categories
        && state.categories == CategoryListing::NotLoaded
    {
        state.categories = listing;
    }

    if state.active_category != filter {
        tracing::debug!(%filter, "Dropping plants for a superseded filter");
        return Ok(Fragments::new());
    }

    Fragments::new()
        .with(&render_category_list(&state.categories, &state.active_category))?
        .with(&render_product_grid(&plants))
}

/// Mutate the cart and re-render it.
async fn update_cart(widget: &SharedWidget, mutate: impl FnOnce(&mut Cart)) -> Result<Fragments> {
    let mut state = widget.lock().await;
    mutate(&mut state.cart);

    Fragments::new().with(&render_cart_list(&state.cart))
}
