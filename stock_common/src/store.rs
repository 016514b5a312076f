//! SQLite table of quote samples.
//!
//! The table is created with `IF NOT EXISTS` on every writable open and is only ever
//! appended to. A read-only open never creates the file or the table.
//! All statements bind their values as parameters.

use log::debug;
use rusqlite::{Connection, OpenFlags, Row, params};
use std::path::Path;

use crate::quote::QuoteSample;
use crate::result::Result;
use crate::tickers::Ticker;
use crate::time_bucket::TimeBucket;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS stocks (
    Time TEXT NOT NULL,
    Ticker TEXT NOT NULL,
    Low REAL,
    High REAL,
    Open REAL,
    Close REAL,
    Volume INTEGER,
    Price REAL NOT NULL
)";

const INSERT_SAMPLE: &str = "INSERT INTO stocks
    (Time, Ticker, Low, High, Open, Close, Volume, Price)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const SELECT_SAMPLES: &str = "SELECT Time, Ticker, Low, High, Open, Close, Volume, Price
    FROM stocks WHERE Time = ?1 AND Ticker = ?2";

/// Durable append-only table of `QuoteSample` rows.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens or creates the store at `path` and makes sure the table exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Opens an existing store for reading only.
    ///
    /// A missing file is an error; it is never created.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    /// Store kept in memory, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self { conn })
    }

    /// Appends one round of samples in a single transaction.
    ///
    /// Returns the number of rows written. Either all rows of the round are committed or
    /// none are.
    pub fn insert_round(&mut self, samples: &[QuoteSample]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_SAMPLE)?;
            for sample in samples {
                stmt.execute(params![
                    sample.time.as_str(),
                    sample.ticker.as_str(),
                    sample.low,
                    sample.high,
                    sample.open,
                    sample.close,
                    sample.volume,
                    sample.price,
                ])?;
            }
        }
        tx.commit()?;
        debug!("Committed {} row(s)", samples.len());
        Ok(samples.len())
    }

    /// All rows stored for `ticker` in the minute `time`.
    ///
    /// A store whose table was never created holds no rows.
    pub fn fetch(&self, time: &TimeBucket, ticker: &Ticker) -> Result<Vec<QuoteSample>> {
        if !self.has_table()? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare_cached(SELECT_SAMPLES)?;
        let rows = stmt.query_map(params![time.as_str(), ticker.as_str()], read_sample)?;
        let mut samples = Vec::new();
        for row in rows {
            samples.push(row?);
        }
        Ok(samples)
    }

    /// Total number of stored rows.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM stocks", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn has_table(&self) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'stocks')",
            [],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Closes the underlying connection, reporting any pending failure.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

fn read_sample(row: &Row<'_>) -> rusqlite::Result<QuoteSample> {
    let time: String = row.get(0)?;
    let ticker: String = row.get(1)?;
    Ok(QuoteSample {
        time: time.parse().map_err(|e| text_conversion(0, e))?,
        ticker: Ticker::new(&ticker).map_err(|e| text_conversion(1, e))?,
        low: row.get(2)?,
        high: row.get(3)?,
        open: row.get(4)?,
        close: row.get(5)?,
        volume: row.get(6)?,
        price: row.get(7)?,
    })
}

fn text_conversion(column: usize, err: crate::StockError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(err),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: &str, ticker: &str, price: f64) -> QuoteSample {
        QuoteSample {
            time: time.parse().unwrap(),
            ticker: Ticker::new(ticker).unwrap(),
            low: Some(price - 1.0),
            high: Some(price + 1.0),
            open: Some(price),
            close: None,
            volume: Some(1000),
            price,
        }
    }

    #[test]
    fn fetch_returns_seeded_row() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .insert_round(&[sample("16:32", "YI", 7.5), sample("16:32", "AAPL", 190.0)])
            .unwrap();

        let rows = store
            .fetch(&"16:32".parse().unwrap(), &Ticker::new("YI").unwrap())
            .unwrap();

        assert_eq!(rows, vec![sample("16:32", "YI", 7.5)]);
    }

    #[test]
    fn fetch_without_match_is_empty() {
        let mut store = Store::open_in_memory().unwrap();
        store.insert_round(&[sample("16:32", "YI", 7.5)]).unwrap();

        let rows = store
            .fetch(&"01:01".parse().unwrap(), &Ticker::new("NOPE").unwrap())
            .unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn reopen_keeps_rows_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stocks.db");

        let mut store = Store::open(&path).unwrap();
        store.insert_round(&[sample("10:00", "YI", 1.0)]).unwrap();
        store.close().unwrap();

        let mut store = Store::open(&path).unwrap();
        store.insert_round(&[sample("10:01", "YI", 2.0)]).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn ticker_text_is_bound_not_spliced() {
        let mut store = Store::open_in_memory().unwrap();
        store.insert_round(&[sample("10:00", "YI", 1.0)]).unwrap();

        // A parameter that would break a concatenated statement is just an unmatched value.
        let mut stmt = store.conn.prepare(SELECT_SAMPLES).unwrap();
        let hits = stmt
            .query_map(params!["10:00", "YI' OR '1'='1"], read_sample)
            .unwrap()
            .count();
        assert_eq!(hits, 0);
    }

    #[test]
    fn read_only_open_never_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.db");

        assert!(Store::open_read_only(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn read_only_store_reads_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stocks.db");
        let mut store = Store::open(&path).unwrap();
        store.insert_round(&[sample("10:00", "YI", 1.0)]).unwrap();
        store.close().unwrap();

        let store = Store::open_read_only(&path).unwrap();
        let rows = store
            .fetch(&"10:00".parse().unwrap(), &Ticker::new("YI").unwrap())
            .unwrap();
        assert_eq!(rows, vec![sample("10:00", "YI", 1.0)]);
    }

    #[test]
    fn database_without_table_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE other (x INTEGER)").unwrap();
        conn.close().unwrap();

        let store = Store::open_read_only(&path).unwrap();
        let rows = store
            .fetch(&"10:00".parse().unwrap(), &Ticker::new("YI").unwrap())
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_round_commits_nothing() {
        let mut store = Store::open_in_memory().unwrap();
        assert_eq!(store.insert_round(&[]).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 0);
    }
}
