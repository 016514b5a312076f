//! In-memory collaborators shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use stock_common::net::PageSource;
use stock_common::provider::{ProviderError, QuoteProvider};
use stock_common::quote::Quote;
use stock_common::{Result, StockError};

use crate::fetcher::clock::Clock;

/// Pages served from a map; unknown URLs answer 404.
#[derive(Default)]
pub struct FakePages {
    pages: HashMap<String, String>,
    fetches: Cell<usize>,
}

impl FakePages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: String) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl PageSource for FakePages {
    fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetches.set(self.fetches.get() + 1);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| StockError::PageStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Provider knowing a fixed set of symbols, each priced at 10.0.
pub struct FakeProvider {
    symbols: HashSet<String>,
    unavailable: HashSet<String>,
    price_calls: Cell<usize>,
    quote_calls: Cell<usize>,
}

impl FakeProvider {
    pub fn with_symbols(symbols: &[&str]) -> Self {
        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            unavailable: HashSet::new(),
            price_calls: Cell::new(0),
            quote_calls: Cell::new(0),
        }
    }

    /// Makes every lookup of `symbol` fail as if the provider were down.
    pub fn unavailable(mut self, symbol: &str) -> Self {
        self.unavailable.insert(symbol.to_string());
        self
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.get()
    }

    pub fn quote_calls(&self) -> usize {
        self.quote_calls.get()
    }

    fn lookup(&self, symbol: &str) -> std::result::Result<f64, ProviderError> {
        if self.unavailable.contains(symbol) {
            return Err(ProviderError::Unavailable(format!("{symbol}: connection reset")));
        }
        if self.symbols.contains(symbol) {
            Ok(10.0)
        } else {
            Err(ProviderError::InvalidSymbol {
                symbol: symbol.to_string(),
            })
        }
    }
}

impl QuoteProvider for FakeProvider {
    fn price(&self, symbol: &str) -> std::result::Result<f64, ProviderError> {
        self.price_calls.set(self.price_calls.get() + 1);
        self.lookup(symbol)
    }

    fn quote(&self, symbol: &str) -> std::result::Result<Quote, ProviderError> {
        self.quote_calls.set(self.quote_calls.get() + 1);
        let price = self.lookup(symbol)?;
        Ok(Quote {
            low: Some(price - 0.5),
            high: Some(price + 0.5),
            open: Some(price),
            close: None,
            latest_volume: Some(1_000),
            latest_price: price,
        })
    }
}

/// Clock that only moves when slept on, or by `work_per_call` on each `now`.
///
/// Time is kept as a UTC instant and shown in a fixed offset, which can change once at a
/// chosen instant to mimic a daylight saving switch.
pub struct ManualClock {
    now: RefCell<DateTime<Utc>>,
    offset: FixedOffset,
    change: Option<(DateTime<Utc>, FixedOffset)>,
    work_per_call: TimeDelta,
    sleeps: Cell<usize>,
}

impl ManualClock {
    /// Clock at `hour:minute:second` UTC.
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        Self::in_zone(hour, minute, second, 0)
    }

    /// Clock reading `hour:minute:second` local time at UTC`+offset_hours`.
    pub fn in_zone(hour: u32, minute: u32, second: u32, offset_hours: i32) -> Self {
        let offset = hours_east(offset_hours);
        Self {
            now: RefCell::new(local_instant(offset, hour, minute, second)),
            offset,
            change: None,
            work_per_call: TimeDelta::zero(),
            sleeps: Cell::new(0),
        }
    }

    /// Switches to UTC`+offset_hours` once the local time reaches `hour:minute:second`.
    pub fn shifting_at(mut self, hour: u32, minute: u32, second: u32, offset_hours: i32) -> Self {
        let when = local_instant(self.offset, hour, minute, second);
        self.change = Some((when, hours_east(offset_hours)));
        self
    }

    /// Advances the clock by `step` every time it is read.
    pub fn ticking(mut self, step: TimeDelta) -> Self {
        self.work_per_call = step;
        self
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.get()
    }

    fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        let offset = match self.change {
            Some((when, offset)) if instant >= when => offset,
            _ => self.offset,
        };
        instant.with_timezone(&offset)
    }
}

fn hours_east(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).expect("valid test offset")
}

fn local_instant(offset: FixedOffset, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .and_then(|t| t.and_local_timezone(offset).single())
        .expect("valid test time")
        .with_timezone(&Utc)
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let mut now = self.now.borrow_mut();
        let current = *now;
        *now += self.work_per_call;
        self.local(current)
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
        let step = TimeDelta::from_std(duration).expect("test sleep fits in TimeDelta");
        *self.now.borrow_mut() += step;
    }
}
