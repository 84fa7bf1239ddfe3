//! HTML listing connector.
//!
//! Scrapes a radio directory listing page whose layout is not under our
//! control. Station entries are located heuristically: the innermost `div`
//! blocks whose text carries a fixed marker label (`Country:`). Each block's
//! first text line is taken as the station name, labeled lines fill known
//! attributes, and the block's first hyperlink leads to the detail page that
//! the extraction cascade mines for a stream URL.
//!
//! Block detection is pluggable via [`BlockLocator`] so another listing site
//! can supply its own layout heuristic without touching the rest of the
//! connector.

use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::extract::ExtractionCascade;
use crate::http_client::CatalogClient;
use crate::source::StationSource;
use crate::station::{Station, UNKNOWN};

/// Default listing page scraped by this connector.
pub const DEFAULT_LISTING_URL: &str = "https://onlineradiofm.in/stations";

/// Marker substring identifying a station block in the page layout.
const BLOCK_MARKER: &str = "Country:";

/// One candidate station block located in the listing page: its visible
/// text lines plus the first hyperlink found inside it, if any.
#[derive(Debug, Clone)]
pub struct StationBlock {
    pub lines: Vec<String>,
    pub detail_href: Option<String>,
}

/// Locates candidate station blocks in an unknown page layout.
pub trait BlockLocator: Send + Sync {
    fn locate(&self, doc: &Html) -> Vec<StationBlock>;
}

/// Default locator: innermost `div` elements whose text contains a marker
/// substring. Restricting to innermost blocks keeps one station from being
/// reported once per ancestor container.
pub struct MarkerLocator {
    marker: String,
    block_selector: Selector,
    anchor_selector: Selector,
}

impl MarkerLocator {
    pub fn new(marker: impl Into<String>) -> Result<Self> {
        Ok(Self {
            marker: marker.into(),
            block_selector: parse_selector("div")?,
            anchor_selector: parse_selector("a[href]")?,
        })
    }
}

impl BlockLocator for MarkerLocator {
    fn locate(&self, doc: &Html) -> Vec<StationBlock> {
        let marked: Vec<ElementRef> = doc
            .select(&self.block_selector)
            .filter(|el| el.text().collect::<String>().contains(&self.marker))
            .collect();
        let marked_ids: HashSet<_> = marked.iter().map(|el| el.id()).collect();

        marked
            .iter()
            // Innermost only: no marked div anywhere below this one
            .filter(|el| {
                !el.descendants()
                    .skip(1)
                    .any(|node| marked_ids.contains(&node.id()))
            })
            .map(|el| StationBlock {
                lines: el
                    .text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(ToString::to_string)
                    .collect(),
                detail_href: el
                    .select(&self.anchor_selector)
                    .find_map(|a| a.value().attr("href"))
                    .map(ToString::to_string),
            })
            .collect()
    }
}

/// Partially-structured station entry parsed from one block, before stream
/// resolution. `frequency` is display-only on the upstream site and is not
/// part of the unified station shape, so it is dropped at normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub country: String,
    pub frequency: String,
    pub detail_url: Option<String>,
}

/// Connector for the HTML listing site.
pub struct ListingConnector {
    url: String,
    locator: Box<dyn BlockLocator>,
    cascade: ExtractionCascade,
}

impl ListingConnector {
    /// Connector for `url` using the default marker-based block locator.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            locator: Box::new(MarkerLocator::new(BLOCK_MARKER)?),
            cascade: ExtractionCascade::new()?,
        })
    }

    /// Connector with a caller-supplied block locator.
    pub fn with_locator(url: impl Into<String>, locator: Box<dyn BlockLocator>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            locator,
            cascade: ExtractionCascade::new()?,
        })
    }

    /// Parse the listing page into structured entries. Relative detail links
    /// are resolved against `base`.
    fn parse_entries(&self, html: &str, base: &Url) -> Vec<ListingEntry> {
        let doc = Html::parse_document(html);
        self.locator
            .locate(&doc)
            .into_iter()
            .map(|block| Self::entry_from_block(&block, base))
            .collect()
    }

    fn entry_from_block(block: &StationBlock, base: &Url) -> ListingEntry {
        let name = block
            .lines
            .first()
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string());

        let mut country = UNKNOWN.to_string();
        let mut frequency = UNKNOWN.to_string();
        // Labels may sit mid-line in some layouts; match them anywhere and
        // take the text after the label as the value.
        for line in block.lines.iter().skip(1) {
            if let Some((_, value)) = line.split_once("Country:") {
                country = value.trim().to_string();
            }
            if let Some((_, value)) = line.split_once("Frequency:") {
                frequency = value.trim().to_string();
            }
        }

        let detail_url = block.detail_href.as_deref().and_then(|href| {
            base.join(href)
                .map(|u| u.to_string())
                .map_err(|e| warn!(href, error = %e, "Unresolvable detail link"))
                .ok()
        });

        ListingEntry {
            name,
            country,
            frequency,
            detail_url,
        }
    }
}

#[async_trait]
impl StationSource for ListingConnector {
    fn name(&self) -> &'static str {
        "listing"
    }

    async fn fetch_stations(&self, client: &CatalogClient) -> Result<Vec<Station>> {
        let base = Url::parse(&self.url).context("invalid listing URL")?;
        let html = client
            .fetch_text(&self.url)
            .await
            .with_context(|| format!("fetching listing page {}", self.url))?;

        // Parse fully before the per-station fetches: `Html` is not Send and
        // must not be held across an await point.
        let entries = self.parse_entries(&html, &base);
        debug!(count = entries.len(), "Located station blocks");

        let mut stations = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut station = Station::unresolved(entry.name);
            station.country = entry.country;

            // A failed or fruitless detail fetch degrades only this station
            if let Some(detail_url) = &entry.detail_url {
                if let Some(stream) = self
                    .cascade
                    .resolve_stream_url(client, detail_url)
                    .await
                {
                    station.stream = stream;
                    station.playable = true;
                } else {
                    debug!(station = %station.name, url = %detail_url, "No stream found");
                }
            }
            stations.push(station);
        }
        Ok(stations)
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {css:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::PLACEHOLDER_STREAM;

    const LISTING_FIXTURE: &str = r#"
        <html><body><div id="content">
            <div class="station">
                <span>Radio Mirchi</span>
                <span>Country: India</span>
                <span>Frequency: 98.3 FM</span>
                <a href="/radio-mirchi">details</a>
            </div>
            <div class="station">
                <span>City FM</span>
                <span>Country: UAE</span>
            </div>
            <div class="station"></div>
        </div></body></html>
    "#;

    fn connector() -> ListingConnector {
        ListingConnector::new(DEFAULT_LISTING_URL).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://onlineradiofm.in/stations").unwrap()
    }

    #[test]
    fn locator_finds_innermost_blocks_only() {
        // The #content ancestor also contains "Country:" but must not be
        // reported as a block of its own.
        let doc = Html::parse_document(LISTING_FIXTURE);
        let locator = MarkerLocator::new("Country:").unwrap();
        let blocks = locator.locate(&doc);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines[0], "Radio Mirchi");
        assert_eq!(blocks[1].lines[0], "City FM");
    }

    #[test]
    fn entry_fields_are_parsed_from_labeled_lines() {
        let entries = connector().parse_entries(LISTING_FIXTURE, &base());
        assert_eq!(entries[0].name, "Radio Mirchi");
        assert_eq!(entries[0].country, "India");
        assert_eq!(entries[0].frequency, "98.3 FM");
    }

    #[test]
    fn relative_detail_link_is_resolved_to_absolute() {
        let entries = connector().parse_entries(LISTING_FIXTURE, &base());
        assert_eq!(
            entries[0].detail_url.as_deref(),
            Some("https://onlineradiofm.in/radio-mirchi")
        );
    }

    #[test]
    fn block_without_link_has_no_detail_url() {
        let entries = connector().parse_entries(LISTING_FIXTURE, &base());
        assert_eq!(entries[1].name, "City FM");
        assert_eq!(entries[1].country, "UAE");
        assert_eq!(entries[1].frequency, UNKNOWN);
        assert!(entries[1].detail_url.is_none());
    }

    #[test]
    fn unlabeled_lines_leave_defaults() {
        let html = r#"<div><span>Lone FM</span><span>Country: Norway</span>
            <span>Some other text</span></div>"#;
        let entries = connector().parse_entries(html, &base());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Lone FM");
        assert_eq!(entries[0].country, "Norway");
        assert_eq!(entries[0].frequency, UNKNOWN);
    }

    #[test]
    fn labels_are_matched_anywhere_in_a_line() {
        let html = r#"<div><span>Desert FM</span>
            <span>Broadcast Country: Egypt</span>
            <span>On air at Frequency: 101.1 FM</span></div>"#;
        let entries = connector().parse_entries(html, &base());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].country, "Egypt");
        assert_eq!(entries[0].frequency, "101.1 FM");
    }

    #[test]
    fn absolute_detail_link_is_kept_as_is() {
        let html = r#"<div><span>X FM</span><span>Country: SE</span>
            <a href="https://elsewhere.example/x-fm">x</a></div>"#;
        let entries = connector().parse_entries(html, &base());
        assert_eq!(
            entries[0].detail_url.as_deref(),
            Some("https://elsewhere.example/x-fm")
        );
    }

    #[test]
    fn pageless_block_yields_fully_defaulted_entry() {
        let html = r"<div>Country:</div>";
        let entries = connector().parse_entries(html, &base());
        assert_eq!(entries.len(), 1);
        // The only line carries the marker itself, so it becomes the name and
        // no labeled line fills country.
        assert_eq!(entries[0].country, UNKNOWN);
        assert!(entries[0].detail_url.is_none());
    }

    #[test]
    fn custom_locator_replaces_block_detection() {
        struct EveryListItem;

        impl BlockLocator for EveryListItem {
            fn locate(&self, doc: &Html) -> Vec<StationBlock> {
                let li = Selector::parse("li").unwrap();
                doc.select(&li)
                    .map(|el| StationBlock {
                        lines: el
                            .text()
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(ToString::to_string)
                            .collect(),
                        detail_href: None,
                    })
                    .collect()
            }
        }

        let connector =
            ListingConnector::with_locator(DEFAULT_LISTING_URL, Box::new(EveryListItem)).unwrap();
        let html = "<ul><li>Alpha FM</li><li>Beta FM</li></ul>";
        let entries = connector.parse_entries(html, &base());
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Alpha FM", "Beta FM"]);
    }

    #[tokio::test]
    async fn unreachable_listing_page_is_an_error() {
        let client = CatalogClient::new().unwrap();
        let connector = ListingConnector::new("http://127.0.0.1:1/stations").unwrap();
        assert!(connector.fetch_stations(&client).await.is_err());
    }

    #[test]
    fn unresolved_station_keeps_placeholder_stream() {
        let station = Station::unresolved("City FM");
        assert_eq!(station.stream, PLACEHOLDER_STREAM);
        assert!(!station.playable);
    }
}
