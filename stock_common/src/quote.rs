//! Quote data model.
//!
//! A `Quote` is what the provider returns for one symbol. A `QuoteSample` is the row
//! persisted for one ticker in one polling round.

use serde::{Deserialize, Serialize};

use crate::result::Result;
use crate::tickers::Ticker;
use crate::time_bucket::TimeBucket;

/// Current quote fields for a single symbol, as served by the provider.
///
/// Any field except the latest price may be missing outside trading hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Session low.
    pub low: Option<f64>,
    /// Session high.
    pub high: Option<f64>,
    /// Opening price.
    pub open: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Traded volume.
    pub latest_volume: Option<i64>,
    /// Last traded price.
    pub latest_price: f64,
}

/// One stored row: a ticker's quote in a given minute bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSample {
    /// Minute bucket, `HH:MM`.
    pub time: TimeBucket,
    /// Symbol.
    pub ticker: Ticker,
    /// Session low.
    pub low: Option<f64>,
    /// Session high.
    pub high: Option<f64>,
    /// Opening price.
    pub open: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Traded volume.
    pub volume: Option<i64>,
    /// Last traded price.
    pub price: f64,
}

impl QuoteSample {
    /// Builds the row for `ticker` in `time` from a provider quote.
    pub fn from_quote(time: TimeBucket, ticker: Ticker, quote: Quote) -> Self {
        QuoteSample {
            time,
            ticker,
            low: quote.low,
            high: quote.high,
            open: quote.open,
            close: quote.close,
            volume: quote.latest_volume,
            price: quote.latest_price,
        }
    }

    /// Encode the sample to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }
}
