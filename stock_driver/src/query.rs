//! Point lookup of stored quotes by ticker and minute.

use std::io::Write;
use std::path::PathBuf;
use stock_common::Result;
use stock_common::quote::QuoteSample;
use stock_common::store::Store;
use stock_common::tickers::Ticker;
use stock_common::time_bucket::TimeBucket;

/// Message printed when nothing matches.
pub const NO_RESULTS: &str = "No results found";

/// Exact-match query of one ticker in one minute bucket.
pub struct Query {
    time: TimeBucket,
    store_path: PathBuf,
    ticker: Ticker,
}

impl Query {
    /// Query for `ticker` at `time` against the store at `store_path`.
    pub fn new(time: TimeBucket, store_path: PathBuf, ticker: Ticker) -> Self {
        Self {
            time,
            store_path,
            ticker,
        }
    }

    /// Matching rows, consumed in a single pass. No match is an empty result.
    ///
    /// The store is opened read-only, so a wrong path fails instead of creating a database.
    pub fn fetch(&self) -> Result<impl Iterator<Item = QuoteSample>> {
        let store = Store::open_read_only(&self.store_path)?;
        let rows = store.fetch(&self.time, &self.ticker)?;
        store.close()?;
        Ok(rows.into_iter())
    }

    /// Writes the first matching row, or `No results found`.
    pub fn fetch_and_print<W: Write>(&self, out: &mut W, json: bool) -> Result<()> {
        match self.fetch()?.next() {
            Some(sample) if json => {
                out.write_all(&sample.to_json_bytes()?)?;
                writeln!(out)?;
            }
            Some(sample) => writeln!(out, "{}", render(&sample))?,
            None => writeln!(out, "{}", NO_RESULTS)?,
        }
        Ok(())
    }
}

/// One line: `Time Ticker Low High Open Close Volume Price`.
pub fn render(sample: &QuoteSample) -> String {
    fn field<T: ToString>(value: Option<T>) -> String {
        value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
    }

    format!(
        "{} {} {} {} {} {} {} {}",
        sample.time,
        sample.ticker,
        field(sample.low),
        field(sample.high),
        field(sample.open),
        field(sample.close),
        field(sample.volume),
        sample.price
    )
}
