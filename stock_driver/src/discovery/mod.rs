//! Ticker discovery.
//!
//! - `extractor` — pulls candidate symbols and the next-page link out of a listings page.
//! - `validator` — confirms a candidate with one provider lookup.
//! - `crawler` — walks the pages until enough valid tickers are found.
pub mod crawler;
pub mod extractor;
pub mod validator;

pub use crawler::Crawler;
pub use extractor::SymbolExtractor;
