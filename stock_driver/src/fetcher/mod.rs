//! Timed quote polling.
//!
//! - `clock` — wall-clock source and sleeping, swappable in tests.
//! - `poller` — samples every ticker once per calendar minute until a deadline.
pub mod clock;
pub mod poller;

pub use clock::SystemClock;
pub use poller::{FetchReport, Fetcher};
