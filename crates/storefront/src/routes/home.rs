//! Home page route handler.

use askama::Template;
use axum::{extract::State, response::IntoResponse};
use green_earth_core::ActiveCategory;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::render::{
    DonationTemplate, IndexTemplate, render_cart_list, render_category_list, render_modal,
    render_product_grid,
};
use crate::state::AppState;
use crate::widget::{CategoryListing, PlantListing};

/// Display the storefront page.
///
/// Every page load restarts the visitor's widget: empty cart, closed modal,
/// "All Trees" active. Categories are fetched first, then the full catalog.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let catalog = state.catalog();

    let categories = CategoryListing::fetch(catalog).await;
    let plants = PlantListing::fetch(catalog, &ActiveCategory::All).await;

    let widget = state.widgets().widget(&session).await?;
    let mut widget = widget.lock().await;
    widget.restart(categories);

    Ok(IndexTemplate {
        categories: render_category_list(&widget.categories, &widget.active_category)
            .render()?,
        grid: render_product_grid(&plants).render()?,
        cart: render_cart_list(&widget.cart).render()?,
        modal: render_modal(&widget.modal).render()?,
        donation: DonationTemplate { thanks: false }.render()?,
    })
}
