//! Confirms that a candidate symbol is tradable.

use stock_common::provider::{ProviderError, QuoteProvider};
use stock_common::tickers::Ticker;

/// Validates candidates with a single price lookup each.
pub struct TickerValidator<'a, P: QuoteProvider> {
    provider: &'a P,
}

impl<'a, P: QuoteProvider> TickerValidator<'a, P> {
    /// Validator backed by `provider`.
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Returns the upper-cased ticker if the provider prices the symbol.
    ///
    /// A candidate that is not even a well-formed symbol is reported as invalid without
    /// a lookup.
    pub fn validate(&self, candidate: &str) -> Result<Ticker, ProviderError> {
        let ticker = Ticker::new(candidate).map_err(|_| ProviderError::InvalidSymbol {
            symbol: candidate.to_string(),
        })?;
        self.provider.price(ticker.as_str())?;
        Ok(ticker)
    }
}
