//! Unified station entity shared by every connector and the catalog.

use serde::{Deserialize, Serialize};

/// Default for free-text metadata fields the source did not provide.
pub const UNKNOWN: &str = "Unknown";

/// Logo path served for stations without their own artwork.
pub const DEFAULT_LOGO: &str = "/static/default-radio.png";

/// Stream URL stored for stations whose stream could not be resolved.
pub const PLACEHOLDER_STREAM: &str = "https://example.com/stream_placeholder";

/// One radio broadcast entity with its metadata and resolved playback stream.
///
/// `name` is the catalog's identity key: two records with the same name are
/// the same station, and the later-processed record overwrites the earlier one
/// in full. Every field always carries a value — connectors normalize missing
/// source data to the defaults above, so no partial record ever reaches the
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Display name; used as catalog key.
    pub name: String,
    /// Free-text genre (the directory API maps its tag list here).
    pub genre: String,
    /// Free-text country.
    pub country: String,
    /// Free-text language.
    pub language: String,
    /// Logo URL or path.
    pub logo: String,
    /// Stream URL; [`PLACEHOLDER_STREAM`] when unresolved.
    pub stream: String,
    /// True only when `stream` is believed to be directly fetchable audio.
    pub playable: bool,
}

impl Station {
    /// A fully-defaulted, unplayable station with the given name.
    #[must_use]
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            genre: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            language: UNKNOWN.to_string(),
            logo: DEFAULT_LOGO.to_string(),
            stream: PLACEHOLDER_STREAM.to_string(),
            playable: false,
        }
    }
}
