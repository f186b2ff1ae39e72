//! Plant catalog API client.
//!
//! # Architecture
//!
//! - Four read-only JSON endpoints: categories, all plants, plants by
//!   category and single-plant detail
//! - The API is the source of truth: no local copy, no caching
//! - Response envelopes differ per endpoint; [`normalize`] maps them onto the
//!   core `Category` and `Plant` types
//! - Failures are returned, never retried; callers render the fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use green_earth_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let categories = client.fetch_categories().await?;
//! let plants = client.fetch_plants_by_category(&categories[0].id).await?;
//! ```

mod client;
pub mod normalize;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// JSON parsed but none of the expected keys were present.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl CatalogError {
    /// Whether this is a transport-level failure rather than an unexpected
    /// response shape.
    #[must_use]
    pub const fn is_network_failure(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Parse(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Malformed("no `categories` or `data` list".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed response: no `categories` or `data` list"
        );
    }

    #[test]
    fn test_error_taxonomy() {
        let parse = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(CatalogError::from(parse).is_network_failure());
        assert!(!CatalogError::Malformed(String::new()).is_network_failure());
    }
}
