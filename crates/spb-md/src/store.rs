//! Quote source boundary.
//!
//! [`QuoteStore`] is the only way the analysis pipeline obtains bars. A store
//! answers one question: "all bars for ticker X, in source order".

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::ingest_csv::{parse_quotes_file, CsvOptions};
use crate::price::PriceParseError;
use crate::Bar;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`QuoteStore`] implementation may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteStoreError {
    /// The store has no data for this ticker.
    NotFound { ticker: String, location: String },
    /// Underlying I/O failure.
    Io(String),
    /// The CSV layer could not decode a record.
    Csv(String),
    /// A row was structurally wrong (column count, date, time, volume).
    BadRow { line: u64, reason: String },
    /// A price field could not be converted to micros.
    Price { line: u64, source: PriceParseError },
}

impl fmt::Display for QuoteStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStoreError::NotFound { ticker, location } => {
                write!(f, "no quotes for ticker '{ticker}' at {location}")
            }
            QuoteStoreError::Io(msg) => write!(f, "quote io error: {msg}"),
            QuoteStoreError::Csv(msg) => write!(f, "quote csv error: {msg}"),
            QuoteStoreError::BadRow { line, reason } => {
                write!(f, "quote row {line}: {reason}")
            }
            QuoteStoreError::Price { line, source } => write!(f, "quote row {line}: {source}"),
        }
    }
}

impl std::error::Error for QuoteStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuoteStoreError::Price { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Read-only source of bars, one ticker at a time.
///
/// Implementations must return bars in chronological source order and must
/// not sort or deduplicate them.
pub trait QuoteStore: Send + Sync {
    /// Short identifier for logs (e.g. `"csv"`).
    fn name(&self) -> &'static str;

    /// All bars for `ticker` (already upper-cased by the caller).
    fn load_bars(&self, ticker: &str) -> Result<Vec<Bar>, QuoteStoreError>;
}

// ---------------------------------------------------------------------------
// CSV directory store
// ---------------------------------------------------------------------------

/// One quote file per ticker: `<dir>/<TICKER>.<extension>`.
#[derive(Debug, Clone)]
pub struct CsvQuoteStore {
    dir: PathBuf,
    extension: String,
    options: CsvOptions,
}

impl CsvQuoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "txt".to_string(),
            options: CsvOptions::default(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.options.has_header = has_header;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the quotes for `ticker`.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.{}", self.extension))
    }
}

impl QuoteStore for CsvQuoteStore {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn load_bars(&self, ticker: &str) -> Result<Vec<Bar>, QuoteStoreError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(QuoteStoreError::NotFound {
                ticker: ticker.to_string(),
                location: path.display().to_string(),
            });
        }
        let bars = parse_quotes_file(&path, self.options)?;
        debug!(ticker, path = %path.display(), bars = bars.len(), "quote file loaded");
        Ok(bars)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Shared, immutable per-ticker bar sequences.
///
/// Each sequence is held behind an `Arc` so concurrent readers share one copy;
/// every analysis still works on its own derived data.
#[derive(Debug, Clone, Default)]
pub struct MemoryQuoteStore {
    series: BTreeMap<String, Arc<[Bar]>>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the bars for `ticker`. The key is upper-cased.
    pub fn insert(&mut self, ticker: &str, bars: Vec<Bar>) {
        self.series.insert(ticker.to_ascii_uppercase(), bars.into());
    }

    pub fn with_series(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.insert(ticker, bars);
        self
    }

    /// Shared handle to the stored sequence.
    pub fn shared(&self, ticker: &str) -> Option<Arc<[Bar]>> {
        self.series.get(ticker).cloned()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

impl QuoteStore for MemoryQuoteStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load_bars(&self, ticker: &str) -> Result<Vec<Bar>, QuoteStoreError> {
        self.series
            .get(ticker)
            .map(|bars| bars.to_vec())
            .ok_or_else(|| QuoteStoreError::NotFound {
                ticker: ticker.to_string(),
                location: "memory".to_string(),
            })
    }
}
