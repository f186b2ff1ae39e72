//! Detail modal controller.
//!
//! Opening the modal renders its Loading state, whose fragment immediately
//! asks for `/modal/detail?ticket=N`. [`resolve_detail`] answers that request:
//! it fetches the plant without holding the widget lock, then re-locks and
//! applies the result only if ticket `N` is still the one being loaded.

use green_earth_core::{ModalTicket, PlantId};
use tracing::instrument;

use crate::catalog::CatalogClient;
use crate::error::{Result, add_breadcrumb};
use crate::render::{Fragments, render_cart_list, render_modal};
use crate::widget::SharedWidget;

/// Open the modal for `plant_id` and render its Loading state.
///
/// # Errors
///
/// Returns `AppError` if rendering fails.
#[instrument(skip(widget))]
pub async fn open(widget: &SharedWidget, plant_id: PlantId) -> Result<Fragments> {
    let mut state = widget.lock().await;
    let ticket = state.modal.open(plant_id);
    tracing::debug!(ticket, "Modal opened");

    Fragments::new().with(&render_modal(&state.modal))
}

/// Close the modal from any state.
///
/// # Errors
///
/// Returns `AppError` if rendering fails.
#[instrument(skip(widget))]
pub async fn close(widget: &SharedWidget) -> Result<Fragments> {
    let mut state = widget.lock().await;
    state.modal.close();

    Fragments::new().with(&render_modal(&state.modal))
}

/// Add the plant currently shown in the modal to the cart.
///
/// Nothing is added unless the modal is in its Shown state.
///
/// # Errors
///
/// Returns `AppError` if rendering fails.
#[instrument(skip(widget))]
pub async fn add_displayed_to_cart(widget: &SharedWidget) -> Result<Fragments> {
    let mut state = widget.lock().await;
    if let Some(item) = state.modal.displayed_item() {
        add_breadcrumb(
            "cart",
            "Added item from modal",
            Some(&[("plant_id", item.id.as_str())]),
        );
        state.cart.add(item);
    }

    Fragments::new().with(&render_cart_list(&state.cart))
}

/// Fetch the detail for `ticket` and move the modal to Shown or Error.
///
/// Returns `None` when the ticket is not current, before or after the
/// fetch (the modal was closed or reopened meanwhile); the stale answer is
/// dropped.
///
/// # Errors
///
/// Returns `AppError` if rendering fails. Catalog failures become the
/// modal's Error state instead.
#[instrument(skip(widget, catalog))]
pub async fn resolve_detail(
    widget: &SharedWidget,
    catalog: &CatalogClient,
    ticket: ModalTicket,
) -> Result<Option<Fragments>> {
    let Some(plant_id) = widget.lock().await.modal.pending(ticket).cloned() else {
        tracing::debug!(ticket, "Ignoring stale detail request");
        return Ok(None);
    };

    let result = catalog.fetch_plant_detail(&plant_id).await;

    let mut state = widget.lock().await;
    let applied = match result {
        Ok(plant) => state.modal.show(ticket, plant),
        Err(e) => {
            tracing::warn!(
                error = %e,
                network = e.is_network_failure(),
                plant_id = %plant_id,
                "Failed to load plant details"
            );
            state.modal.fail(ticket)
        }
    };

    if !applied {
        tracing::debug!(ticket, "Modal moved on during detail fetch");
        return Ok(None);
    }

    Fragments::new().with(&render_modal(&state.modal)).map(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::config::CatalogConfig;

    fn offline_catalog() -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            api_url: Url::parse("http://127.0.0.1:9/api").unwrap(),
        })
    }

    #[tokio::test]
    async fn test_failed_detail_moves_to_error() {
        let widget = SharedWidget::default();
        open(&widget, PlantId::new("1")).await.unwrap();

        let html = resolve_detail(&widget, &offline_catalog(), 1)
            .await
            .unwrap()
            .unwrap()
            .into_html();

        assert!(html.contains("Failed to load details."));
        assert!(widget.lock().await.modal.is_open());
    }

    #[tokio::test]
    async fn test_closed_modal_drops_detail() {
        let widget = SharedWidget::default();
        open(&widget, PlantId::new("1")).await.unwrap();
        close(&widget).await.unwrap();

        let resolved = resolve_detail(&widget, &offline_catalog(), 1).await.unwrap();

        assert!(resolved.is_none());
        assert!(!widget.lock().await.modal.is_open());
    }

    #[tokio::test]
    async fn test_add_displayed_requires_shown_plant() {
        let widget = SharedWidget::default();
        open(&widget, PlantId::new("1")).await.unwrap();

        add_displayed_to_cart(&widget).await.unwrap();

        assert!(widget.lock().await.cart.is_empty());
    }
}
