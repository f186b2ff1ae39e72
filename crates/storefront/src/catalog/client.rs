//! Catalog API client implementation.

use std::sync::Arc;

use green_earth_core::{Category, CategoryId, Plant, PlantId};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{CatalogError, normalize};
use crate::config::CatalogConfig;

/// Client for the plant catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Fetch the category list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails, the body is not JSON, or
    /// no category list is present.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let body = self.get_json("categories").await?;
        let categories = normalize::categories(&body)?;
        debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }

    /// Fetch the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails, the body is not JSON, or
    /// no plant list is present.
    #[instrument(skip(self))]
    pub async fn fetch_all_plants(&self) -> Result<Vec<Plant>, CatalogError> {
        let body = self.get_json("plants").await?;
        let plants = normalize::plant_list(&body)?;
        debug!(count = plants.len(), "Fetched all plants");
        Ok(plants)
    }

    /// Fetch the plants of one category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails, the body is not JSON, or
    /// no plant list is present.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn fetch_plants_by_category(
        &self,
        id: &CategoryId,
    ) -> Result<Vec<Plant>, CatalogError> {
        let path = format!("category/{}", urlencoding::encode(id.as_str()));
        let body = self.get_json(&path).await?;
        let plants = normalize::plant_list(&body)?;
        debug!(count = plants.len(), "Fetched plants by category");
        Ok(plants)
    }

    /// Fetch a single plant.
    ///
    /// Unrecognized response shapes yield a best-effort plant.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the body is not JSON.
    #[instrument(skip(self), fields(plant_id = %id))]
    pub async fn fetch_plant_detail(&self, id: &PlantId) -> Result<Plant, CatalogError> {
        let path = format!("plant/{}", urlencoding::encode(id.as_str()));
        let body = self.get_json(&path).await?;
        Ok(normalize::plant_detail(&body, id))
    }

    /// GET `{base_url}/{path}` and parse the body as JSON.
    async fn get_json(&self, path: &str) -> Result<Value, CatalogError> {
        let url = format!("{}/{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?;

        // Read as text first for better error diagnostics
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(
                error = %e,
                url = %url,
                body = %text.chars().take(200).collect::<String>(),
                "Catalog API returned a non-JSON body"
            );
            CatalogError::Parse(e)
        })
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            api_url: Url::parse(base).unwrap(),
        })
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client("http://127.0.0.1:9/api/");
        assert_eq!(client.inner.base_url, "http://127.0.0.1:9/api");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_failure() {
        // Port 9 (discard) is closed on test machines; the connect fails fast.
        let client = client("http://127.0.0.1:9/api");

        let err = client.fetch_categories().await.unwrap_err();
        assert!(err.is_network_failure());
    }

    #[tokio::test]
    async fn test_detail_failure_is_reported() {
        let client = client("http://127.0.0.1:9/api");

        let err = client.fetch_plant_detail(&PlantId::new("1")).await.unwrap_err();
        assert!(err.is_network_failure());
    }
}
