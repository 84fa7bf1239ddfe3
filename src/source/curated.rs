//! Curated source: hand-maintained stations with known-good streams.
//!
//! No network access and no failure mode; this source guarantees the catalog
//! is never empty even when every remote source is down.

use anyhow::Result;
use async_trait::async_trait;

use crate::http_client::CatalogClient;
use crate::source::StationSource;
use crate::station::{Station, DEFAULT_LOGO};

/// In-process list of known-good stations.
pub struct CuratedSource;

impl CuratedSource {
    fn stations() -> Vec<Station> {
        let station = |name: &str, genre: &str, country: &str, language: &str, stream: &str| {
            Station {
                name: name.to_string(),
                genre: genre.to_string(),
                country: country.to_string(),
                language: language.to_string(),
                logo: DEFAULT_LOGO.to_string(),
                stream: stream.to_string(),
                playable: true,
            }
        };
        vec![
            station(
                "Radio Paradise",
                "Eclectic",
                "USA",
                "English",
                "http://stream-uk1.radioparadise.com/aac-320",
            ),
            station(
                "SomaFM Groove Salad",
                "Downtempo",
                "USA",
                "English",
                "https://ice5.somafm.com/groovesalad-128-mp3",
            ),
            station(
                "Sai Global Harmony",
                "Spiritual",
                "India",
                "English",
                "https://stream-ssl.radiosai.net:8004/",
            ),
        ]
    }
}

#[async_trait]
impl StationSource for CuratedSource {
    fn name(&self) -> &'static str {
        "curated"
    }

    async fn fetch_stations(&self, _client: &CatalogClient) -> Result<Vec<Station>> {
        Ok(Self::stations())
    }
}
