//! HTTP client shared by every connector.
//!
//! One pooled `reqwest` client with a fixed per-request deadline: a directory
//! page or a station detail page that hangs must time out and be handled as a
//! fetch failure by the owning connector, never stall the whole run.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

/// Total deadline for any single fetch, connect included.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("bandscan/", env!("CARGO_PKG_VERSION"));

/// Pooled HTTP client used for listing pages, detail pages and the
/// directory API.
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Create the shared client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .use_rustls_tls()
            // Compression auto-negotiated via Accept-Encoding
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .connect_timeout(FETCH_TIMEOUT)
            .timeout(FETCH_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a URL. Callers decide how to treat non-2xx statuses.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;

        debug!(
            status = %response.status(),
            content_type = ?response.headers().get("content-type"),
            "Response received"
        );

        Ok(response)
    }

    /// Fetch and return the body as a string.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch(url).await?;
        let text = response.text().await?;
        Ok(text)
    }

    /// Get the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}
