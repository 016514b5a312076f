//! Quote provider trait, failure kinds and the HTTP implementation.
//!
//! Callers never retry a provider call. They match on `ProviderError` to decide what to
//! skip: discovery drops the candidate symbol, polling drops the ticker for one round.

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;

use crate::quote::Quote;

/// Why a provider lookup failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider does not know the symbol.
    #[error("unknown symbol: {symbol}")]
    InvalidSymbol {
        /// Symbol that was looked up.
        symbol: String,
    },

    /// The provider could not be reached or answered with an error status.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered but the body could not be decoded.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Source of live quote data for a symbol.
pub trait QuoteProvider {
    /// Latest traded price; succeeds only for tradable symbols.
    fn price(&self, symbol: &str) -> Result<f64, ProviderError>;

    /// Current quote fields for the symbol.
    fn quote(&self, symbol: &str) -> Result<Quote, ProviderError>;
}

/// Quote provider speaking the IEX `stock/<symbol>/{price,quote}` API.
pub struct IexProvider {
    client: Client,
    base_url: String,
}

impl IexProvider {
    /// Provider rooted at `base_url` (e.g. `https://api.iextrading.com/1.0`).
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, symbol: &str, resource: &str) -> String {
        format!(
            "{}/stock/{}/{}",
            self.base_url,
            symbol.to_ascii_lowercase(),
            resource
        )
    }

    /// GETs an endpoint and returns the body of a successful response.
    fn get(&self, symbol: &str, resource: &str) -> Result<String, ProviderError> {
        let url = self.endpoint(symbol, resource);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if status == StatusCode::NOT_FOUND || body.trim().eq_ignore_ascii_case("unknown symbol") {
            return Err(ProviderError::InvalidSymbol {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!(
                "HTTP {} for {}",
                status, symbol
            )));
        }
        Ok(body)
    }
}

impl QuoteProvider for IexProvider {
    fn price(&self, symbol: &str) -> Result<f64, ProviderError> {
        let body = self.get(symbol, "price")?;
        body.trim().parse::<f64>().map_err(|e| {
            ProviderError::Malformed(format!("price for {}: {:?}: {}", symbol, body.trim(), e))
        })
    }

    fn quote(&self, symbol: &str) -> Result<Quote, ProviderError> {
        let body = self.get(symbol, "quote")?;
        serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("quote for {}: {}", symbol, e)))
    }
}
