//! Integration tests for the Green Earth storefront.
//!
//! Each test starts a fake plant catalog and a storefront pointed at it, both
//! on ephemeral local ports, then drives the widget over HTTP the way htmx
//! would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p green-earth-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use green_earth_storefront::config::{CatalogConfig, StorefrontConfig};
use green_earth_storefront::state::AppState;
use serde_json::{Value, json};
use url::Url;

/// What the fake catalog answers for one path.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    Text(&'static str),
    /// Answer `body` after `delay`, leaving the catalog free to serve others.
    Delayed { delay: Duration, body: Value },
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Self::Json(body) => axum::Json(body).into_response(),
            Self::Status(status) => status.into_response(),
            Self::Text(body) => body.into_response(),
            Self::Delayed { body, .. } => axum::Json(body).into_response(),
        }
    }
}

#[derive(Default)]
struct FakeCatalogInner {
    replies: HashMap<String, Reply>,
    hits: HashMap<String, usize>,
}

/// An in-process stand-in for the remote plant catalog.
///
/// Paths are relative to `/api`, e.g. `categories` or `plant/3`. Unknown
/// paths answer 404.
#[derive(Clone)]
pub struct FakeCatalog {
    inner: Arc<Mutex<FakeCatalogInner>>,
    pub api_url: Url,
}

impl FakeCatalog {
    /// Start a catalog serving the sample categories and plants.
    pub async fn spawn() -> Self {
        Self::spawn_with(sample_replies()).await
    }

    /// Start a catalog serving exactly `replies`.
    pub async fn spawn_with(replies: HashMap<String, Reply>) -> Self {
        let inner = Arc::new(Mutex::new(FakeCatalogInner {
            replies,
            hits: HashMap::new(),
        }));

        let router = Router::new().fallback(serve).with_state(Arc::clone(&inner));
        let addr = serve_on_ephemeral_port(router).await;
        let api_url =
            Url::parse(&format!("http://{addr}/api")).expect("Failed to build catalog URL");

        Self { inner, api_url }
    }

    /// Replace the reply for `path`.
    pub fn set(&self, path: &str, reply: Reply) {
        self.lock().replies.insert(path.to_string(), reply);
    }

    /// Hold the current JSON reply for `path` back by `delay`.
    pub fn delay(&self, path: &str, delay: Duration) {
        let mut inner = self.lock();
        if let Some(Reply::Json(body)) = inner.replies.remove(path) {
            inner
                .replies
                .insert(path.to_string(), Reply::Delayed { delay, body });
        }
    }

    /// Number of requests received for `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.lock().hits.get(path).copied().unwrap_or(0)
    }

    /// Number of requests received across all paths.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.lock().hits.values().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeCatalogInner> {
        self.inner.lock().expect("Fake catalog lock poisoned")
    }
}

async fn serve(State(inner): State<Arc<Mutex<FakeCatalogInner>>>, request: Request) -> Reply {
    let path = request
        .uri()
        .path()
        .trim_start_matches("/api/")
        .to_string();

    let reply = {
        let mut inner = inner.lock().expect("Fake catalog lock poisoned");
        *inner.hits.entry(path.clone()).or_default() += 1;
        inner
            .replies
            .get(&path)
            .cloned()
            .unwrap_or(Reply::Status(StatusCode::NOT_FOUND))
    };

    if let Reply::Delayed { delay, .. } = &reply {
        tokio::time::sleep(*delay).await;
    }
    reply
}

/// A running storefront and a cookie-keeping client for one visitor.
///
/// Clones share the client and its cookies, so they act as the same visitor
/// from concurrently spawned tasks.
#[derive(Clone)]
pub struct TestStorefront {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestStorefront {
    /// Start a storefront backed by `catalog`.
    pub async fn spawn(catalog: &FakeCatalog) -> Self {
        let state = AppState::new(test_config(catalog.api_url.clone()));
        let addr = serve_on_ephemeral_port(green_earth_storefront::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    /// Load the full page, starting a fresh widget.
    pub async fn page(&self) -> String {
        self.text(self.client.get(&self.base_url)).await
    }

    /// Post a widget event and return the status and body.
    pub async fn event(&self, region: &str, fields: &[(&str, &str)]) -> (StatusCode, String) {
        let response = self
            .client
            .post(format!("{}/events/{region}", self.base_url))
            .form(fields)
            .send()
            .await
            .expect("Failed to post event");
        split(response).await
    }

    /// Request the modal detail for `ticket`.
    pub async fn modal_detail(&self, ticket: u64) -> (StatusCode, String) {
        let response = self
            .client
            .get(format!("{}/modal/detail?ticket={ticket}", self.base_url))
            .send()
            .await
            .expect("Failed to request modal detail");
        split(response).await
    }

    async fn text(&self, request: reqwest::RequestBuilder) -> String {
        let response = request.send().await.expect("Request failed");
        assert!(response.status().is_success(), "{}", response.status());
        response.text().await.expect("Failed to read response")
    }
}

async fn split(response: reqwest::Response) -> (StatusCode, String) {
    let status = StatusCode::from_u16(response.status().as_u16())
        .expect("Storefront returned an invalid status");
    let body = response.text().await.expect("Failed to read response");
    (status, body)
}

async fn serve_on_ephemeral_port(router: Router) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    addr
}

/// Storefront configuration pointing at `api_url`, with Sentry disabled.
#[must_use]
pub fn test_config(api_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost".to_string(),
        catalog: CatalogConfig { api_url },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

// ============================================================================
// Sample catalog data
// ============================================================================

/// A plant entry shaped like the catalog's.
#[must_use]
pub fn plant(id: u32, name: &str, category: &str, price: u32) -> Value {
    json!({
        "id": id,
        "image": format!("https://img.example/{id}.png"),
        "name": name,
        "description": format!("{name} grows well in warm climates."),
        "category": category,
        "price": price,
    })
}

/// Replies for the sample catalog: two categories, three plants.
#[must_use]
pub fn sample_replies() -> HashMap<String, Reply> {
    let mango = plant(1, "Mango Tree", "Fruit Tree", 500);
    let neem = plant(3, "Neem Tree", "Medicinal Tree", 400);
    let guava = plant(4, "Guava Tree", "Fruit Tree", 350);

    HashMap::from([
        (
            "categories".to_string(),
            Reply::Json(json!({
                "status": true,
                "categories": [
                    {"id": 1, "category_name": "Fruit Tree", "small_description": "Trees that bear fruit"},
                    {"id": 5, "category_name": "Medicinal Tree", "small_description": "Trees that heal"},
                ],
            })),
        ),
        (
            "plants".to_string(),
            Reply::Json(json!({"status": true, "plants": [mango.clone(), neem.clone(), guava.clone()]})),
        ),
        (
            "category/1".to_string(),
            Reply::Json(json!({"status": true, "plants": [mango.clone(), guava.clone()]})),
        ),
        (
            "category/5".to_string(),
            Reply::Json(json!({"status": true, "plants": [neem.clone()]})),
        ),
        (
            "plant/1".to_string(),
            Reply::Json(json!({"status": true, "plants": mango})),
        ),
        (
            "plant/3".to_string(),
            Reply::Json(json!({"status": true, "plants": neem})),
        ),
        (
            "plant/4".to_string(),
            Reply::Json(json!({"status": true, "plants": guava})),
        ),
    ])
}
