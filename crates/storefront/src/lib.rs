//! Green Earth storefront library.
//!
//! The plant storefront widget as a library: catalog client, per-visitor
//! widget state, event routing and fragment rendering, plus [`app`] to
//! assemble the HTTP router so it can be served or tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod middleware;
pub mod modal;
pub mod render;
pub mod routes;
pub mod state;
pub mod widget;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router with its full middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
