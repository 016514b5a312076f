//! Command-line arguments for the stock driver.
//!
//! This module defines the CLI interface using `clap`. Requirements that depend on the
//! chosen operation are checked by clap, so an invalid combination never reaches an
//! operation. See `main` for end-to-end usage.
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stock_common::net::{DEFAULT_PROVIDER_URL, DEFAULT_SEED_URL};
use stock_common::tickers::MAX_TICKERS;
use stock_common::time_bucket::TimeBucket;
use strum_macros::{Display, EnumString};

/// Work the driver performs in one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[value(rename_all = "PascalCase")]
pub enum Operation {
    /// Discover tickers from the listings pages and save them to the tickers file.
    Ticker,
    /// Poll quotes for the saved tickers into the store.
    Fetcher,
    /// Look up the stored quote of one ticker in one minute.
    Query,
}

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Operation to perform.
    #[arg(long, value_enum)]
    pub operation: Operation,

    /// Number of tickers to retrieve (0 <= ticker_count <= 110).
    #[arg(
        long = "ticker_count",
        value_parser = parse_ticker_count,
        required_if_eq("operation", "Ticker")
    )]
    pub ticker_count: Option<usize>,

    /// How long the fetcher polls, in seconds.
    #[arg(long = "time_limit", required_if_eq("operation", "Fetcher"))]
    pub time_limit: Option<u64>,

    /// Minute to query, as HH:MM.
    #[arg(
        long,
        value_parser = parse_time_bucket,
        required_if_eq("operation", "Query")
    )]
    pub time: Option<TimeBucket>,

    /// Path of the quote store.
    #[arg(long, required_if_eq_any([("operation", "Fetcher"), ("operation", "Query")]))]
    pub db: Option<PathBuf>,

    /// Ticker symbol to query.
    #[arg(long, required_if_eq("operation", "Query"))]
    pub ticker: Option<String>,

    /// File holding the discovered tickers, one per line.
    #[arg(long = "tickers_file", default_value = "tickers.txt")]
    pub tickers_file: PathBuf,

    /// First listings page to crawl.
    #[arg(long = "seed_url", default_value = DEFAULT_SEED_URL)]
    pub seed_url: String,

    /// Base URL of the quote provider.
    #[arg(long = "provider_url", default_value = DEFAULT_PROVIDER_URL)]
    pub provider_url: String,

    /// Print the query result as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_ticker_count(raw: &str) -> Result<usize, String> {
    let count: usize = raw
        .parse()
        .map_err(|_| format!("{raw:?} is not a non-negative integer"))?;
    if count > MAX_TICKERS {
        return Err(format!(
            "0 <= ticker_count <= {MAX_TICKERS} is not satisfied by {count}"
        ));
    }
    Ok(count)
}

fn parse_time_bucket(raw: &str) -> Result<TimeBucket, String> {
    raw.parse().map_err(|e: stock_common::StockError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("stock_driver").chain(args.iter().copied()))
    }

    #[test]
    fn ticker_needs_count() {
        assert!(parse(&["--operation", "Ticker"]).is_err());
        let args = parse(&["--operation", "Ticker", "--ticker_count", "50"]).unwrap();
        assert_eq!(args.operation, Operation::Ticker);
        assert_eq!(args.ticker_count, Some(50));
        assert_eq!(args.tickers_file, PathBuf::from("tickers.txt"));
    }

    #[test]
    fn ticker_count_bounds_are_inclusive() {
        assert!(parse(&["--operation", "Ticker", "--ticker_count", "0"]).is_ok());
        assert!(parse(&["--operation", "Ticker", "--ticker_count", "110"]).is_ok());
        assert!(parse(&["--operation", "Ticker", "--ticker_count", "111"]).is_err());
        assert!(parse(&["--operation", "Ticker", "--ticker_count", "-1"]).is_err());
    }

    #[test]
    fn fetcher_needs_limit_and_store() {
        assert!(parse(&["--operation", "Fetcher", "--time_limit", "60"]).is_err());
        assert!(parse(&["--operation", "Fetcher", "--db", "stocks.db"]).is_err());
        let args = parse(&[
            "--operation",
            "Fetcher",
            "--time_limit",
            "60",
            "--db",
            "stocks.db",
        ])
        .unwrap();
        assert_eq!(args.time_limit, Some(60));
    }

    #[test]
    fn query_needs_time_store_and_ticker() {
        assert!(parse(&["--operation", "Query", "--time", "16:32", "--db", "s.db"]).is_err());
        let args = parse(&[
            "--operation",
            "Query",
            "--time",
            "16:32",
            "--db",
            "s.db",
            "--ticker",
            "YI",
        ])
        .unwrap();
        assert_eq!(args.time.unwrap().as_str(), "16:32");
    }

    #[test]
    fn query_time_keeps_lax_hour_check() {
        let base = ["--operation", "Query", "--db", "s.db", "--ticker", "YI", "--time"];
        let with_time = |t: &'static str| {
            let mut v = base.to_vec();
            v.push(t);
            parse(&v)
        };
        assert!(with_time("29:00").is_ok());
        assert!(with_time("30:00").is_err());
        assert!(with_time("12:61").is_err());
        assert!(with_time("1:05").is_err());
    }

    #[test]
    fn unknown_operation_is_rejected() {
        assert!(parse(&["--operation", "Delete"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn operation_names_round_trip() {
        assert_eq!(Operation::Fetcher.to_string(), "Fetcher");
        assert_eq!("Query".parse::<Operation>().unwrap(), Operation::Query);
    }
}
