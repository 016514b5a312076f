//! Minute-gated quote polling into the store.
//!
//! A round samples every ticker once and commits the rows together. A round runs on the
//! first pass and then whenever the clock's minute differs from the last round's minute.
//! Between rounds the poller sleeps to the next whole second. The deadline is only checked
//! between rounds, so a slow round may run past it. The deadline is an absolute instant,
//! while rounds are bucketed by the local hour and minute.

use chrono::{DateTime, FixedOffset, TimeDelta};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use stock_common::provider::{ProviderError, QuoteProvider};
use stock_common::quote::QuoteSample;
use stock_common::store::Store;
use stock_common::tickers::{TickerSet, load_tickers};
use stock_common::time_bucket::{MinuteTracker, TimeBucket, until_next_second};
use stock_common::{Result, StockError};

use super::clock::Clock;

/// Totals of one polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Rounds executed.
    pub rounds: usize,
    /// Rows committed to the store.
    pub rows: usize,
    /// Ticker samples skipped because the provider failed.
    pub skipped: usize,
    /// Wall-clock time from start to close of the store.
    pub elapsed: TimeDelta,
}

/// Polls quotes for the tickers in a ticker list file.
pub struct Fetcher<'a, P: QuoteProvider, C: Clock> {
    provider: &'a P,
    clock: &'a C,
    tickers_file: PathBuf,
}

impl<'a, P: QuoteProvider, C: Clock> Fetcher<'a, P, C> {
    /// Fetcher reading its tickers from `tickers_file`.
    pub fn new(provider: &'a P, clock: &'a C, tickers_file: PathBuf) -> Self {
        Self {
            provider,
            clock,
            tickers_file,
        }
    }

    /// Loads the tickers, opens the store and polls for `duration_seconds`.
    ///
    /// An unreadable tickers file or store fails the run before any quote is requested.
    pub fn run(&self, store_path: &Path, duration_seconds: u64) -> Result<FetchReport> {
        let tickers = load_tickers(&self.tickers_file)?;
        info!(
            "Loaded {} ticker(s) from {}",
            tickers.len(),
            self.tickers_file.display()
        );
        let store = Store::open(store_path)?;
        self.poll(&tickers, store, duration_seconds)
    }

    /// Polls `tickers` into `store` until `duration_seconds` have passed, then closes it.
    pub fn poll(
        &self,
        tickers: &TickerSet,
        mut store: Store,
        duration_seconds: u64,
    ) -> Result<FetchReport> {
        let started = self.clock.now();
        let deadline = deadline_after(started, duration_seconds)?;
        let mut tracker = MinuteTracker::default();
        let mut report = FetchReport {
            rounds: 0,
            rows: 0,
            skipped: 0,
            elapsed: TimeDelta::zero(),
        };

        loop {
            let now = self.clock.now();
            if now >= deadline {
                break;
            }
            if !tracker.is_due(&now) {
                self.clock.sleep(until_next_second(&now));
                continue;
            }

            let bucket = TimeBucket::from_time(&now);
            info!("Round {} for {} ticker(s)", bucket, tickers.len());
            let samples = self.sample_round(tickers, &bucket, &mut report);
            report.rows += store.insert_round(&samples)?;
            report.rounds += 1;
            tracker.record(&now);
        }

        store.close()?;
        report.elapsed = self.clock.now() - started;
        info!(
            "Polling finished: {} round(s), {} row(s), {} skipped, {}s elapsed",
            report.rounds,
            report.rows,
            report.skipped,
            report.elapsed.num_seconds()
        );
        Ok(report)
    }

    /// Requests a quote per ticker; a failing ticker is skipped for this round only.
    fn sample_round(
        &self,
        tickers: &TickerSet,
        bucket: &TimeBucket,
        report: &mut FetchReport,
    ) -> Vec<QuoteSample> {
        let mut samples = Vec::with_capacity(tickers.len());
        for ticker in tickers.iter() {
            match self.provider.quote(ticker.as_str()) {
                Ok(quote) => {
                    debug!("{} {} price={}", bucket, ticker, quote.latest_price);
                    samples.push(QuoteSample::from_quote(
                        bucket.clone(),
                        ticker.clone(),
                        quote,
                    ));
                }
                Err(ProviderError::InvalidSymbol { symbol }) => {
                    warn!("Skipping {} in round {}: no longer a valid symbol", symbol, bucket);
                    report.skipped += 1;
                }
                Err(e) => {
                    warn!("Skipping {} in round {}: {}", ticker, bucket, e);
                    report.skipped += 1;
                }
            }
        }
        samples
    }
}

fn deadline_after(
    start: DateTime<FixedOffset>,
    duration_seconds: u64,
) -> Result<DateTime<FixedOffset>> {
    i64::try_from(duration_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|duration| start.checked_add_signed(duration))
        .ok_or_else(|| {
            StockError::InvalidArgument(format!("time limit of {}s is too large", duration_seconds))
        })
}
