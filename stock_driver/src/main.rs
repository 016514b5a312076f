//! Stock driver — discovers tickers, polls their quotes into a SQLite store and answers
//! point queries over that store.
//!
//! One operation runs per invocation:
//! - `Ticker` — crawls the listings pages from `--seed_url`, validates each symbol with
//!   the quote provider and writes up to `--ticker_count` tickers to `--tickers_file`.
//! - `Fetcher` — reads `--tickers_file` and samples every ticker once per calendar minute
//!   for `--time_limit` seconds, appending rows to the store at `--db`.
//! - `Query` — prints the row stored for `--ticker` in minute `--time` of the store at `--db`.
//!
//! Usage example (CLI):
//! ```bash
//! stock_driver --operation Ticker --ticker_count 50
//! stock_driver --operation Fetcher --time_limit 600 --db stocks.db
//! stock_driver --operation Query --time 16:32 --db stocks.db --ticker YI
//! ```
//!
//! Everything runs on the calling thread; network and storage calls block.
#![warn(missing_docs)]
mod args;
mod discovery;
mod fetcher;
mod query;
#[cfg(test)]
mod testing;

use crate::args::{Args, Operation};
use crate::discovery::{Crawler, SymbolExtractor};
use crate::fetcher::{Fetcher, SystemClock};
use crate::query::Query;
use clap::Parser;
use log::info;
use std::io;
use stock_common::net::{HttpPageSource, http_client};
use stock_common::provider::IexProvider;
use stock_common::tickers::Ticker;
use stock_common::{Result, StockError};

fn main() -> Result<(), StockError> {
    init_logger();
    let args = Args::parse();
    info!("Operation: {}", args.operation);

    match args.operation {
        Operation::Ticker => run_discovery(&args),
        Operation::Fetcher => run_fetcher(&args),
        Operation::Query => run_query(&args),
    }
}

fn run_discovery(args: &Args) -> Result<()> {
    let maximum = required(args.ticker_count, "--ticker_count")?;
    let client = http_client()?;
    let source = HttpPageSource::new(client.clone());
    let provider = IexProvider::new(client, &args.provider_url);

    let crawler = Crawler::new(
        &source,
        &provider,
        SymbolExtractor::nasdaq()?,
        &args.seed_url,
        args.tickers_file.clone(),
    );
    let found = crawler.discover(maximum)?;
    info!(
        "Saved {} ticker(s) to {}",
        found.len(),
        args.tickers_file.display()
    );
    Ok(())
}

fn run_fetcher(args: &Args) -> Result<()> {
    let time_limit = required(args.time_limit, "--time_limit")?;
    let db = required(args.db.clone(), "--db")?;
    let provider = IexProvider::new(http_client()?, &args.provider_url);
    let clock = SystemClock;

    let report = Fetcher::new(&provider, &clock, args.tickers_file.clone()).run(&db, time_limit)?;
    info!(
        "Total time elapsed: {}s ({} row(s) in {} round(s))",
        report.elapsed.num_seconds(),
        report.rows,
        report.rounds
    );
    Ok(())
}

fn run_query(args: &Args) -> Result<()> {
    let time = required(args.time.clone(), "--time")?;
    let db = required(args.db.clone(), "--db")?;
    let ticker: Ticker = required(args.ticker.as_deref(), "--ticker")?.parse()?;

    let query = Query::new(time, db, ticker);
    let stdout = io::stdout();
    query.fetch_and_print(&mut stdout.lock(), args.json)
}

/// Unwraps an argument clap was told to require for this operation.
fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| StockError::InvalidArgument(format!("{flag} is required")))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
