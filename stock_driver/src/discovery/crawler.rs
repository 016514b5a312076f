//! Ticker discovery across paginated listings pages.
//!
//! The crawler walks the listings from a seed URL. For every page it extracts candidate
//! symbols, validates each against the quote provider and adds the valid ones to a
//! capped set. After each page the whole set is written to the tickers file, so a crash
//! loses at most the page in progress. Discovery ends once the cap is reached, or when
//! the listings link back to a page already visited.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use stock_common::net::{PageSource, resolve_link};
use stock_common::provider::{ProviderError, QuoteProvider};
use stock_common::tickers::{MAX_TICKERS, Ticker, TickerSet, save_tickers};
use stock_common::{Result, StockError};

use super::extractor::SymbolExtractor;
use super::validator::TickerValidator;

/// Drives extraction and validation over successive listings pages.
pub struct Crawler<'a, S: PageSource, P: QuoteProvider> {
    source: &'a S,
    provider: &'a P,
    extractor: SymbolExtractor,
    seed_url: String,
    output: PathBuf,
}

impl<'a, S: PageSource, P: QuoteProvider> Crawler<'a, S, P> {
    /// Crawler starting at `seed_url` that flushes progress to `output`.
    pub fn new(
        source: &'a S,
        provider: &'a P,
        extractor: SymbolExtractor,
        seed_url: &str,
        output: PathBuf,
    ) -> Self {
        Self {
            source,
            provider,
            extractor,
            seed_url: seed_url.to_string(),
            output,
        }
    }

    /// Collects up to `maximum` valid tickers and saves them to the tickers file.
    ///
    /// A `maximum` of zero writes an empty file without touching the network.
    pub fn discover(&self, maximum: usize) -> Result<TickerSet> {
        if maximum > MAX_TICKERS {
            return Err(StockError::InvalidArgument(format!(
                "0 <= ticker_count <= {} is not satisfied by {}",
                MAX_TICKERS, maximum
            )));
        }

        let mut found = TickerSet::with_limit(maximum);
        let mut visited = HashSet::new();
        let mut url = self.seed_url.clone();

        if maximum == 0 {
            save_tickers(&self.output, &found)?;
            return Ok(found);
        }

        while found.len() < maximum {
            visited.insert(url.clone());
            debug!("Fetching listings page {}", url);
            let body = self.source.fetch_page(&url)?;

            self.harvest_page(&body, &mut found);
            save_tickers(&self.output, &found)?;

            if found.is_full() {
                break;
            }

            let href = self.extractor.next_page(&body, &url)?;
            let next = resolve_link(&url, &href)?;
            if visited.contains(&next) {
                warn!(
                    "Listings link back to {}; stopping with {} ticker(s)",
                    next,
                    found.len()
                );
                break;
            }
            info!(
                "Moving to next page {} Valid ticker(s) found: {}",
                next,
                found.len()
            );
            url = next;
        }

        Ok(found)
    }

    /// Validates the page's candidates into `found` until it is full.
    ///
    /// Symbols already found on an earlier page are not looked up again.
    fn harvest_page(&self, body: &str, found: &mut TickerSet) {
        let validator = TickerValidator::new(self.provider);

        for candidate in self.extractor.symbols(body) {
            if found.is_full() {
                info!(
                    "{} valid ticker(s) found. Requested limit reached.",
                    found.len()
                );
                break;
            }

            if Ticker::new(&candidate).is_ok_and(|ticker| found.contains(&ticker)) {
                continue;
            }

            match validator.validate(&candidate) {
                Ok(ticker) => {
                    debug!("Valid ticker: {}", ticker);
                    found.insert(ticker);
                }
                Err(ProviderError::InvalidSymbol { symbol }) => {
                    info!("Invalid ticker: {}", symbol);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", candidate, e);
                }
            }
        }
    }
}
