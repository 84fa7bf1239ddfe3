//! Stream-URL extraction heuristics.
//!
//! Directory sites rarely expose a stream URL in structured form, so the
//! cascade tries strategies in order from most specific (an explicit media
//! tag) to least specific (key/value patterns inside player setup scripts).
//! First match wins.
//!
//! ## Strategies
//!
//! 1. `media-source` — direct `src` attribute on a media-embedding element
//! 2. `script-url` — absolute stream URL inside inline script text
//! 3. `anchor-href` — `<a href>` ending in a streaming extension
//! 4. `player-config` — `file:`/`src:` value in embeddable-player config

use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::http_client::CatalogClient;

/// File extensions accepted as directly fetchable audio streams.
const STREAM_EXTENSIONS: &str = "mp3|aac|m3u|pls|m4a|ogg";

/// A single total matcher: inspects a parsed document, never fails,
/// returns a stream URL when its strategy applies.
type Matcher = fn(&ExtractionCascade, &Html) -> Option<String>;

/// Ordered cascade of stream-URL extraction strategies.
///
/// Total over arbitrary markup: malformed HTML is parsed leniently and a page
/// where no strategy applies simply yields `None`. Only the fetch step in
/// [`resolve_stream_url`](Self::resolve_stream_url) can fail, and that is
/// caught and degraded to `None` as well.
pub struct ExtractionCascade {
    media_selector: Selector,
    script_selector: Selector,
    anchor_selector: Selector,
    script_url: Regex,
    anchor_ext: Regex,
    player_config: Regex,
}

impl ExtractionCascade {
    /// Compile the selectors and patterns for all strategies.
    pub fn new() -> Result<Self> {
        Ok(Self {
            media_selector: parse_selector("audio[src], source[src], embed[src]")?,
            script_selector: parse_selector("script")?,
            anchor_selector: parse_selector("a[href]")?,
            // Absolute URL ending in a streaming extension
            script_url: Regex::new(&format!(
                r#"(https?://[^\s"'\\]+\.(?:{STREAM_EXTENSIONS}))"#
            ))?,
            anchor_ext: Regex::new(&format!(r"\.(?:{STREAM_EXTENSIONS})$"))?,
            // file: "http://..." / src: 'http://...' inside player setup literals
            player_config: Regex::new(&format!(
                r#"(?:file|src)\s*:\s*["'](https?://[^\s"'\\]+\.(?:{STREAM_EXTENSIONS}))["']"#
            ))?,
        })
    }

    /// Strategies in priority order. Later entries only run when every
    /// earlier one found nothing.
    fn matchers() -> [(&'static str, Matcher); 4] {
        [
            ("media-source", Self::media_source),
            ("script-url", Self::script_stream_url),
            ("anchor-href", Self::anchor_href),
            ("player-config", Self::player_config_url),
        ]
    }

    /// Run the cascade over one HTML document.
    #[must_use]
    pub fn extract(&self, html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        for (name, matcher) in Self::matchers() {
            if let Some(url) = matcher(self, &doc) {
                debug!(strategy = name, url = %url, "Stream URL resolved");
                return Some(url);
            }
        }
        None
    }

    /// Fetch a station's detail page and run the cascade over it.
    ///
    /// A transport failure or timeout is logged and treated as "no result";
    /// it never aborts the caller's run.
    pub async fn resolve_stream_url(
        &self,
        client: &CatalogClient,
        page_url: &str,
    ) -> Option<String> {
        let html = match client.fetch_text(page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %page_url, error = %e, "Detail page fetch failed");
                return None;
            }
        };
        self.extract(&html)
    }

    fn media_source(&self, doc: &Html) -> Option<String> {
        // JS-populated player templates ship empty src="" attributes; those
        // must not satisfy this strategy or stop the cascade.
        doc.select(&self.media_selector)
            .filter_map(|el| el.value().attr("src"))
            .find(|src| !src.trim().is_empty())
            .map(ToString::to_string)
    }

    fn script_stream_url(&self, doc: &Html) -> Option<String> {
        for script in doc.select(&self.script_selector) {
            let text: String = script.text().collect();
            if let Some(m) = self.script_url.captures(&text) {
                return Some(m[1].to_string());
            }
        }
        None
    }

    fn anchor_href(&self, doc: &Html) -> Option<String> {
        doc.select(&self.anchor_selector)
            .filter_map(|el| el.value().attr("href"))
            .find(|href| self.anchor_ext.is_match(href))
            .map(ToString::to_string)
    }

    fn player_config_url(&self, doc: &Html) -> Option<String> {
        for script in doc.select(&self.script_selector) {
            let text: String = script.text().collect();
            if let Some(m) = self.player_config.captures(&text) {
                return Some(m[1].to_string());
            }
        }
        None
    }
}

/// `SelectorErrorKind` borrows the input, so it cannot cross `?` into anyhow.
fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e}"))
}
