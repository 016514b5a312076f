//! Pattern-based extraction of candidate symbols and the next-page link from a
//! listings page.

use regex::Regex;
use std::collections::BTreeSet;
use stock_common::{Result, StockError};

/// Symbol links on the listings page look like `.../symbol/aapl`.
pub const SYMBOL_PATTERN: &str = r"symbol/([a-z]*)";
/// Anchor of the pager's "next" button.
pub const NEXT_PAGE_PATTERN: &str = r#"<a href="(.{90,105})" id="main_content_lb_NextPage""#;

/// Extracts symbols and the next-page link using configurable patterns.
///
/// Each pattern must have one capture group holding the wanted text.
#[derive(Debug, Clone)]
pub struct SymbolExtractor {
    symbols: Regex,
    next_page: Regex,
}

impl SymbolExtractor {
    /// Compiles the two patterns.
    pub fn new(symbol_pattern: &str, next_page_pattern: &str) -> Result<Self> {
        Ok(Self {
            symbols: Regex::new(symbol_pattern)?,
            next_page: Regex::new(next_page_pattern)?,
        })
    }

    /// Extractor for the NASDAQ listings pages.
    pub fn nasdaq() -> Result<Self> {
        Self::new(SYMBOL_PATTERN, NEXT_PAGE_PATTERN)
    }

    /// Distinct non-empty candidate symbols on the page.
    pub fn symbols(&self, html: &str) -> BTreeSet<String> {
        self.symbols
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The raw next-page href; the first match wins.
    ///
    /// A page without one is an error: the pattern no longer fits the listings markup.
    pub fn next_page(&self, html: &str, page_url: &str) -> Result<String> {
        self.next_page
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| StockError::NextPageNotFound {
                url: page_url.to_string(),
            })
    }
}
