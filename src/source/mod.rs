//! Station source connectors.
//!
//! A [`StationSource`] produces a sequence of unified [`Station`] records from
//! one specific upstream: the HTML listing site, the directory search API, or
//! the curated in-process list. Connectors are isolated from each other —
//! each recovers its own transient failures and the aggregator skips a source
//! whose fetch still errors, so one broken upstream never empties the catalog.

pub mod curated;
pub mod directory;
pub mod listing;

use anyhow::Result;
use async_trait::async_trait;

use crate::http_client::CatalogClient;
use crate::station::Station;

/// A component that produces station records from one upstream source.
#[async_trait]
pub trait StationSource: Send + Sync {
    /// Short lowercase source name (e.g., `"listing"`, `"directory"`).
    fn name(&self) -> &'static str;

    /// Fetch and normalize this source's stations.
    ///
    /// Implementations recover transient per-station failures internally;
    /// an `Err` here means the source as a whole produced nothing.
    async fn fetch_stations(&self, client: &CatalogClient) -> Result<Vec<Station>>;
}
