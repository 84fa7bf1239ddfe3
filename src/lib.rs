//! `bandscan` - Internet radio station catalog builder
//!
//! # Pipeline
//!
//! - **Connectors**: HTML listing scrape, JSON directory API, curated list
//! - **Extraction cascade**: ordered heuristics locating stream URLs in HTML
//! - **Aggregator**: fixed-order, failure-isolated concatenation
//! - **Catalog**: atomic JSON snapshot, name-keyed at load time
//! - **Lookup service**: two-endpoint HTTP read layer over the snapshot
//!
//! # Example
//!
//! ```rust,no_run
//! use bandscan::{Aggregator, CatalogClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CatalogClient::new()?;
//!     let aggregator = Aggregator::with_default_sources(
//!         bandscan::source::listing::DEFAULT_LISTING_URL,
//!         bandscan::source::directory::DEFAULT_API_URL,
//!     )?;
//!     let stations = aggregator.run(&client).await;
//!     bandscan::catalog::write(std::path::Path::new("radio_stations.json"), &stations)?;
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod catalog;
pub mod extract;
pub mod http_client;
pub mod serve;
pub mod source;
pub mod station;

pub use aggregate::Aggregator;
pub use catalog::CatalogError;
pub use extract::ExtractionCascade;
pub use http_client::CatalogClient;
pub use source::StationSource;
pub use station::Station;

/// Version of bandscan
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
