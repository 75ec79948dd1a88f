use std::fmt;

use spb_md::QuoteStoreError;

/// Every way an analysis call can fail.
///
/// The first four variants are input validation failures and are raised
/// before any quote is loaded. `EmptyResultSet` and `InsufficientSamples`
/// come from the statistics stage. `Quotes` wraps data-source failures.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    InvalidTicker { raw: String, allowed: Vec<String> },
    InvalidMode { raw: String },
    InvalidBoundary { value: f64 },
    InvalidCutoffTime { raw: Option<String>, reason: String },
    /// Alignment or cutoff filtering produced zero observations.
    EmptyResultSet,
    /// Sample standard deviation needs at least two observations.
    InsufficientSamples { count: usize },
    Quotes(QuoteStoreError),
}

impl AnalysisError {
    /// Stable machine-readable kind, used by the CLI and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidTicker { .. } => "INVALID_TICKER",
            AnalysisError::InvalidMode { .. } => "INVALID_MODE",
            AnalysisError::InvalidBoundary { .. } => "INVALID_BOUNDARY",
            AnalysisError::InvalidCutoffTime { .. } => "INVALID_CUTOFF_TIME",
            AnalysisError::EmptyResultSet => "EMPTY_RESULT_SET",
            AnalysisError::InsufficientSamples { .. } => "INSUFFICIENT_SAMPLES",
            AnalysisError::Quotes(_) => "QUOTE_SOURCE",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidTicker { .. }
                | AnalysisError::InvalidMode { .. }
                | AnalysisError::InvalidBoundary { .. }
                | AnalysisError::InvalidCutoffTime { .. }
        )
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidTicker { raw, allowed } => write!(
                f,
                "invalid ticker '{raw}'. expected one of: {}",
                allowed.join(" | ")
            ),
            AnalysisError::InvalidMode { raw } => write!(
                f,
                "invalid mode '{raw}'. expected one of: \
                 open_priorclose | close_open | close_priorclose | intraprice_open"
            ),
            AnalysisError::InvalidBoundary { value } => {
                write!(f, "invalid boundary {value}: must be a positive number")
            }
            AnalysisError::InvalidCutoffTime { raw: Some(raw), reason } => {
                write!(f, "invalid cutoff time '{raw}': {reason}")
            }
            AnalysisError::InvalidCutoffTime { raw: None, reason } => {
                write!(f, "invalid cutoff time: {reason}")
            }
            AnalysisError::EmptyResultSet => {
                write!(f, "no observations left after alignment and cutoff filtering")
            }
            AnalysisError::InsufficientSamples { count } => write!(
                f,
                "sample standard deviation needs at least 2 observations, got {count}"
            ),
            AnalysisError::Quotes(e) => write!(f, "quote source failed: {e}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Quotes(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QuoteStoreError> for AnalysisError {
    fn from(e: QuoteStoreError) -> Self {
        AnalysisError::Quotes(e)
    }
}
