//! Error types shared by the common library and the driver.
//!
//! `StockError` unifies I/O, HTTP, storage and parsing failures so every layer can
//! propagate a single error type. Provider lookups use the narrower `ProviderError`
//! (see `provider`) because callers apply a skip policy per error kind.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::provider::ProviderError;

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum StockError {
    /// I/O error originating from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP transport error while fetching a page.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The listings page URL or a next-page link could not be parsed.
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// Offending URL or link.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Failure reported by the SQLite store.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// An extraction pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Quote provider failure that was not absorbed by a skip policy.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// JSON encoding failure.
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The ticker list file could not be read.
    #[error("Cannot read tickers file {path}: {source}")]
    TickersFile {
        /// Location of the ticker list.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// A line of the ticker list file is not a valid ticker.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// A string is not a valid ticker symbol.
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// A string is not an `HH:MM` time bucket.
    #[error("Invalid time bucket: {0:?} (expected HH:MM)")]
    InvalidTimeBucket(String),

    /// The listings page carried no next-page link.
    #[error("No next-page link found on {url}")]
    NextPageNotFound {
        /// Page that was scanned.
        url: String,
    },

    /// The listings source answered with a non-success status.
    #[error("Listings page {url} returned HTTP {status}")]
    PageStatus {
        /// Requested page.
        url: String,
        /// Status code returned.
        status: u16,
    },

    /// An argument is outside its accepted range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
