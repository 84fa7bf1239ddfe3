//! Aggregation run: connectors in fixed order, concatenated output.
//!
//! Sources run sequentially and are isolated from each other: a source whose
//! fetch fails outright is logged and skipped, never aborting the run. The
//! concatenated sequence preserves each source's internal ordering; the
//! name-keyed view applied downstream resolves duplicate names by
//! last-write-wins, so the fixed source order doubles as the merge priority
//! (curated entries overwrite directory entries, which overwrite listing
//! entries).

use anyhow::Result;
use tracing::{info, warn};

use crate::http_client::CatalogClient;
use crate::source::curated::CuratedSource;
use crate::source::directory::DirectoryConnector;
use crate::source::listing::ListingConnector;
use crate::source::StationSource;
use crate::station::Station;

/// Runs the configured sources in order and concatenates their stations.
pub struct Aggregator {
    sources: Vec<Box<dyn StationSource>>,
}

impl Aggregator {
    /// Aggregator over an explicit source list, run in the given order.
    #[must_use]
    pub fn new(sources: Vec<Box<dyn StationSource>>) -> Self {
        Self { sources }
    }

    /// The standard pipeline: listing site, directory API, curated list.
    pub fn with_default_sources(listing_url: &str, api_url: &str) -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(ListingConnector::new(listing_url)?),
            Box::new(DirectoryConnector::new(api_url)),
            Box::new(CuratedSource),
        ]))
    }

    /// Run every source and concatenate the results.
    ///
    /// Always returns; a failed source contributes nothing but the remaining
    /// sources still run.
    pub async fn run(&self, client: &CatalogClient) -> Vec<Station> {
        let mut all = Vec::new();
        for source in &self.sources {
            match source.fetch_stations(client).await {
                Ok(stations) => {
                    info!(source = source.name(), count = stations.len(), "Source done");
                    all.extend(stations);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Source failed, skipping");
                }
            }
        }
        info!(total = all.len(), "Aggregation complete");
        all
    }
}
