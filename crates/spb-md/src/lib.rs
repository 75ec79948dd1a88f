//! spb-md
//!
//! Market-data boundary for the price-behavior tools.
//!
//! This crate owns the bar type, decimal price parsing, the quote-file reader
//! and the [`QuoteStore`] abstraction. It does **not** normalize session
//! times or compute anything; `spb-analysis` consumes the bars it returns.

pub mod ingest_csv;
pub mod price;
pub mod store;

use chrono::{NaiveDate, NaiveTime};

pub use ingest_csv::{parse_quotes_file, parse_quotes_str, CsvOptions};
pub use price::{micros_to_f64, price_to_micros, PriceParseError, MICROS_PER_UNIT};
pub use store::{CsvQuoteStore, MemoryQuoteStore, QuoteStore, QuoteStoreError};

/// One 5-minute OHLCV observation for a single ticker.
///
/// Identity is the `(date, time)` pair. Prices are integer micros
/// (1 currency unit = [`MICROS_PER_UNIT`]) so alignment and differencing are
/// exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    /// Trading date (calendar day as written in the source).
    pub date: NaiveDate,
    /// Wall-clock time of day as written in the source.
    pub time: NaiveTime,
    pub open_micros: i64,
    pub high_micros: i64,
    pub low_micros: i64,
    pub close_micros: i64,
    pub volume: i64,
}

impl Bar {
    /// Canonical identity key of the bar.
    pub fn key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }
}
