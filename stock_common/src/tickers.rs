//! Ticker symbols, capped ticker sets and the ticker list file.
//!
//! The ticker list is plain text with one uppercase symbol per line. Discovery rewrites
//! the whole file after every page; polling reads it back wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::StockError;
use crate::result::Result;

/// Largest ticker count discovery may be asked for.
pub const MAX_TICKERS: usize = 110;

/// Longest symbol accepted as a ticker.
const MAX_SYMBOL_LEN: usize = 10;

/// Stock symbol, always stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Builds a ticker from raw text, upper-casing it.
    ///
    /// Accepts 1 to 10 ASCII alphanumeric characters after trimming.
    pub fn new(raw: &str) -> Result<Self> {
        let symbol = raw.trim().to_ascii_uppercase();
        let valid = !symbol.is_empty()
            && symbol.len() <= MAX_SYMBOL_LEN
            && symbol.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(StockError::InvalidTicker(raw.to_string()));
        }
        Ok(Ticker(symbol))
    }

    /// Symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        Ticker::new(s)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of unique tickers with an optional size cap.
///
/// A capped set refuses inserts once it holds `limit` tickers, so `len() <= limit`
/// holds at all times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerSet {
    tickers: BTreeSet<Ticker>,
    limit: Option<usize>,
}

impl TickerSet {
    /// Unbounded set, as read back from the ticker list file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set that never grows past `limit` tickers.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            tickers: BTreeSet::new(),
            limit: Some(limit),
        }
    }

    /// Adds a ticker. Returns `false` if it was already present or the cap is reached.
    pub fn insert(&mut self, ticker: Ticker) -> bool {
        if self.is_full() {
            return false;
        }
        self.tickers.insert(ticker)
    }

    /// Returns `true` if the ticker is present.
    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.tickers.contains(ticker)
    }

    /// Returns `true` once a capped set holds `limit` tickers.
    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.tickers.len() >= limit)
    }

    /// Number of tickers held.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// Returns `true` if the set holds no tickers.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Tickers in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &Ticker> {
        self.tickers.iter()
    }
}

impl FromIterator<Ticker> for TickerSet {
    fn from_iter<I: IntoIterator<Item = Ticker>>(iter: I) -> Self {
        Self {
            tickers: iter.into_iter().collect(),
            limit: None,
        }
    }
}

/// Trait providing file parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Each non-empty line is parsed as a single `Ticker`. Returns an error if any line
    /// cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<TickerSet>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<TickerSet> {
        let mut tickers = TickerSet::new();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() {
                continue;
            }

            match trimmed_line.parse::<Self>() {
                Ok(ticker) => {
                    tickers.insert(ticker);
                }
                Err(e) => {
                    return Err(StockError::ParseTickersFile(format!(
                        "line {}: {}",
                        index + 1,
                        e
                    )));
                }
            }
        }
        Ok(tickers)
    }
}

/// Writes one ticker per line.
pub fn write_tickers<W: Write>(writer: &mut W, tickers: &TickerSet) -> Result<()> {
    for ticker in tickers.iter() {
        writeln!(writer, "{}", ticker)?;
    }
    Ok(())
}

/// Overwrites the ticker list file with the full set.
pub fn save_tickers(path: &Path, tickers: &TickerSet) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_tickers(&mut writer, tickers)?;
    writer.flush()?;
    Ok(())
}

/// Reads the whole ticker list file.
pub fn load_tickers(path: &Path) -> Result<TickerSet> {
    let file = File::open(path).map_err(|source| StockError::TickersFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ticker::parse_from_file(BufReader::new(file))
}
