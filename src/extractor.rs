//! Search-results page parsing.
//!
//! Everything that knows about the target engine's markup lives here. When the
//! engine changes its HTML, the selectors passed to [`ResultExtractor::new`]
//! are the only thing that needs to change.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::canonical::canonicalize;

/// Bing wraps each organic result in `li.b_algo`.
pub const DEFAULT_BLOCK_SELECTOR: &str = "li.b_algo";
pub const DEFAULT_LINK_SELECTOR: &str = "a";

#[derive(Debug, Clone)]
pub struct ResultExtractor {
    block_selector: Selector,
    link_selector: Selector,
}

impl ResultExtractor {
    /// Build an extractor from CSS selectors for the result block and for the
    /// link inside it. Only the first link match in each block is used.
    pub fn new(block_selector: &str, link_selector: &str) -> Result<Self> {
        let block_selector = Selector::parse(block_selector)
            .map_err(|e| anyhow!("invalid result block selector {block_selector:?}: {e:?}"))?;
        let link_selector = Selector::parse(link_selector)
            .map_err(|e| anyhow!("invalid link selector {link_selector:?}: {e:?}"))?;

        Ok(Self {
            block_selector,
            link_selector,
        })
    }

    pub fn bing() -> Result<Self> {
        Self::new(DEFAULT_BLOCK_SELECTOR, DEFAULT_LINK_SELECTOR)
    }

    /// Pull the ranked result links out of one results page.
    ///
    /// Links come back exactly as they appear in the markup, in document
    /// order. With `deduplicate`, a block whose link is canonically equal to
    /// an earlier one on the same page is dropped. Extraction stops once
    /// `max_results` links have been collected.
    ///
    /// A page with no result blocks yields an empty list. That usually means
    /// the engine blocked the request or changed its markup, so it is logged
    /// as a warning rather than passed off as a query with no results. Blocks
    /// that are present but carry no usable link are warned about as well.
    pub fn extract(&self, html: &str, max_results: Option<usize>, deduplicate: bool) -> Vec<String> {
        let document = Html::parse_document(html);
        let blocks: Vec<_> = document.select(&self.block_selector).collect();

        info!(
            action = "parse",
            component = "extractor",
            raw_results = blocks.len(),
            "Raw result blocks found"
        );

        if blocks.is_empty() {
            warn!(
                action = "parse",
                component = "extractor",
                page_bytes = html.len(),
                "No result blocks on page; the engine may be blocking requests or its markup changed"
            );
            return Vec::new();
        }

        let block_count = blocks.len();
        let mut links = Vec::new();
        let mut seen = HashSet::new();

        for (position, block) in blocks.into_iter().enumerate() {
            if max_results.is_some_and(|max| links.len() >= max) {
                break;
            }

            let Some(anchor) = block.select(&self.link_selector).next() else {
                debug!(action = "skip", component = "extractor", block = position + 1, "Result block has no link");
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                debug!(action = "skip", component = "extractor", block = position + 1, "Result link has no href");
                continue;
            };

            debug!(action = "link", component = "extractor", block = position + 1, link = href, "Link");

            if deduplicate && !seen.insert(canonicalize(href)) {
                debug!(action = "skip", component = "extractor", link = href, "Duplicate result link");
                continue;
            }

            links.push(href.to_string());
        }

        if links.is_empty() {
            warn!(
                action = "parse",
                component = "extractor",
                raw_results = block_count,
                "Result blocks found but none had a usable link; the link markup may have changed"
            );
        }

        links
    }
}
