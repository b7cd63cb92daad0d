//! HTTP client for the overlay REST API.
//!
//! Endpoints (relative to the API base URL):
//! - `GET    /overlays`      → `{ "overlays": [...] }`
//! - `POST   /overlays`      → `{ "overlay": {...} }`
//! - `PUT    /overlays/{id}` → success/failure
//! - `DELETE /overlays/{id}` → success/failure
//!
//! Non-success responses are turned into [`OverlayError::Server`] carrying the
//! server's `error` message when the body has one, else the status reason.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use super::OverlayStore;
use crate::error::{OverlayError, Result};
use crate::model::{ApiErrorBody, CreatedOverlay, Overlay, OverlayDraft, OverlayList, OverlayPatch};

/// Default API base URL of the overlay server.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Transport settings for [`HttpOverlayStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL, e.g. `http://localhost:5000/api` (trailing slash optional)
    pub api_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Overlay store backed by the REST API.
pub struct HttpOverlayStore {
    client: Client,
    base: String,
}

impl HttpOverlayStore {
    /// Client for `api_url` with default timeouts.
    pub fn new(api_url: &str) -> Result<Self> {
        Self::with_config(&StoreConfig {
            api_url: api_url.to_string(),
            ..StoreConfig::default()
        })
    }

    pub fn with_config(config: &StoreConfig) -> Result<Self> {
        let base = config.api_url.trim().trim_end_matches('/').to_string();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(OverlayError::InvalidInput(format!(
                "API URL must be http(s): {}",
                config.api_url
            )));
        }

        let client = Client::builder()
            // Keep connections alive for reuse across drags
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, base })
    }

    /// API base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn collection_url(&self) -> String {
        format!("{}/overlays", self.base)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/overlays/{}", self.base, urlencoding::encode(id))
    }

    /// Pass successful responses through; turn the rest into errors.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        warn!(status = status.as_u16(), %message, "Overlay API returned an error");
        Err(OverlayError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl OverlayStore for HttpOverlayStore {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self), fields(base = %self.base))]
    async fn list(&self) -> Result<Vec<Overlay>> {
        debug!("Listing overlays");
        let response = self.client.get(self.collection_url()).send().await?;
        let list: OverlayList = Self::check(response).await?.json().await?;
        info!(count = list.overlays.len(), "Overlays fetched");
        Ok(list.overlays)
    }

    #[instrument(skip(self, draft), fields(kind = %draft.kind))]
    async fn create(&self, draft: &OverlayDraft) -> Result<Overlay> {
        let response = self
            .client
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        let created: CreatedOverlay = Self::check(response).await?.json().await?;
        info!(id = %created.overlay.id, "Overlay created");
        Ok(created.overlay)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: &OverlayPatch) -> Result<()> {
        let response = self.client.put(self.item_url(id)).json(patch).send().await?;
        Self::check(response).await?;
        debug!("Overlay updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::check(response).await?;
        info!("Overlay deleted");
        Ok(())
    }
}
