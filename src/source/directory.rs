//! Directory API connector (radio-browser style JSON search endpoint).
//!
//! Maps each upstream record to the unified station shape by direct field
//! correspondence with defined fallbacks. Records from this source are marked
//! playable unconditionally: the upstream directory already filters broken
//! streams and the connector trusts its URLs without probing them.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::http_client::CatalogClient;
use crate::source::StationSource;
use crate::station::{Station, DEFAULT_LOGO, UNKNOWN};

/// Default search endpoint; `hidebroken` keeps known-dead streams out.
pub const DEFAULT_API_URL: &str =
    "https://de1.api.radio-browser.info/json/stations/search?limit=100&hidebroken=true";

/// One record as returned by the search endpoint. Every field is optional;
/// the mapping supplies the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryRecord {
    pub name: Option<String>,
    /// Comma-separated tag list; the closest thing the API has to a genre.
    pub tags: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub favicon: Option<String>,
    /// Stream URL after the directory followed playlists/redirects.
    pub url_resolved: Option<String>,
    /// Raw submitted URL; fallback when no resolved URL is present.
    pub url: Option<String>,
}

impl DirectoryRecord {
    /// Map to the unified shape. Total: any missing field falls back to its
    /// documented default, so no partial record survives.
    fn into_station(self) -> Station {
        let or_unknown = |v: Option<String>| {
            v.filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };
        Station {
            name: or_unknown(self.name),
            genre: or_unknown(self.tags),
            country: or_unknown(self.country),
            language: or_unknown(self.language),
            logo: self
                .favicon
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_LOGO.to_string()),
            stream: self
                .url_resolved
                .filter(|s| !s.is_empty())
                .or(self.url)
                .unwrap_or_default(),
            playable: true,
        }
    }
}

/// Connector for the JSON directory search API.
pub struct DirectoryConnector {
    url: String,
}

impl DirectoryConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn fetch_records(&self, client: &CatalogClient) -> Result<Vec<DirectoryRecord>> {
        let response = client.fetch(&self.url).await?.error_for_status()?;
        let records = response.json().await?;
        Ok(records)
    }
}

#[async_trait]
impl StationSource for DirectoryConnector {
    fn name(&self) -> &'static str {
        "directory"
    }

    /// Non-success status, transport error and malformed body are all the
    /// same condition here: log it, yield nothing, let the run continue.
    async fn fetch_stations(&self, client: &CatalogClient) -> Result<Vec<Station>> {
        match self.fetch_records(client).await {
            Ok(records) => {
                info!(count = records.len(), "Fetched directory records");
                Ok(records.into_iter().map(DirectoryRecord::into_station).collect())
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Directory API unavailable");
                Ok(Vec::new())
            }
        }
    }
}
