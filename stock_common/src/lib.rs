//!
//! Common types and collaborators shared by the stock driver.
//!
//! This crate aggregates:
//! - `error` — unified error type `StockError` used across the workspace.
//! - `result` — handy `Result<T, StockError>` alias.
//! - `tickers` — ticker symbols, capped ticker sets and the ticker list file.
//! - `time_bucket` — `HH:MM` minute buckets and the minute tracker used by polling.
//! - `quote` — provider quotes and stored quote samples.
//! - `net` — network defaults and the listings page source.
//! - `provider` — quote provider trait, error kinds and the HTTP provider.
//! - `store` — SQLite table of quote samples.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod provider;
pub mod quote;
pub mod result;
pub mod store;
pub mod tickers;
pub mod time_bucket;

pub use error::StockError;
pub use result::Result;
