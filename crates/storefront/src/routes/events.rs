//! Widget event route handlers (HTMX).
//!
//! Responses are out-of-band fragments for the regions an event touched.
//! Events that do not map to an action, and answers that were superseded
//! while fetching, are `204 No Content` so htmx leaves the page alone.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use green_earth_core::ModalTicket;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::events::{EventTarget, Region, UiAction, dispatch};
use crate::modal;
use crate::state::AppState;

/// Query for the modal detail request.
#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub ticket: ModalTicket,
}

/// Route an event posted by one of the widget regions.
#[instrument(skip(state, session, target), fields(action = ?target.action))]
pub async fn handle(
    State(state): State<AppState>,
    session: Session,
    Path(region): Path<String>,
    Form(target): Form<EventTarget>,
) -> Result<Response> {
    let region: Region = region.parse()?;

    let Some(action) = UiAction::decode(region, &target) else {
        tracing::debug!(%region, "Ignoring event without a matching action");
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let widget = state.widgets().widget(&session).await?;
    let fragments = dispatch(action, &widget, state.catalog()).await?;
    Ok(fragments.into_response())
}

/// Resolve the detail fetch started when the modal opened.
#[instrument(skip(state, session))]
pub async fn modal_detail(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DetailQuery>,
) -> Result<Response> {
    let widget = state.widgets().widget(&session).await?;
    match modal::resolve_detail(&widget, state.catalog(), query.ticket).await? {
        Some(fragments) => Ok(fragments.into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
