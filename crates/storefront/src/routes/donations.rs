//! Donation pledge route handler.
//!
//! The pledge is acknowledged and logged; nothing is stored or forwarded.

use axum::{Form, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::render::DonationTemplate;

/// Donation form data. Every field is optional; the form has no validation.
#[derive(Debug, Default, Deserialize)]
pub struct DonationForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub amount: Option<String>,
}

/// Acknowledge a donation pledge (HTMX).
///
/// Returns the cleared form with the thank-you message.
#[instrument(skip(form))]
pub async fn donate(Form(form): Form<DonationForm>) -> impl IntoResponse {
    let trees = form
        .amount
        .as_deref()
        .and_then(|amount| amount.trim().parse::<u32>().ok());
    let named = form.name.as_deref().is_some_and(|name| !name.trim().is_empty());
    let has_email = form.email.as_deref().is_some_and(|email| email.contains('@'));

    tracing::info!(?trees, named, has_email, "Donation pledge received");

    DonationTemplate { thanks: true }
}
