//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Full page (fresh widget state)
//! GET  /health                 - Health check
//!
//! # Widget events (HTMX fragments)
//! POST /events/{region}        - Event router (categories, grid, cart, modal)
//! GET  /modal/detail?ticket=N  - Resolve the modal's pending detail fetch
//!
//! # Donations
//! POST /donations              - Donation pledge (returns reset form)
//! ```

pub mod donations;
pub mod events;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the widget event routes router.
pub fn event_routes() -> Router<AppState> {
    Router::new().route("/{region}", post(events::handle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/events", event_routes())
        .route("/modal/detail", get(events::modal_detail))
        .route("/donations", post(donations::donate))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
