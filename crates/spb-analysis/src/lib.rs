//! spb-analysis
//!
//! Price-fluctuation pipeline over 5-minute bars:
//! clock correction ([`normalizer`]), day alignment ([`aligner`]),
//! differencing ([`difference`]) and summary statistics ([`stats`]),
//! fronted by [`analyze`].
//!
//! Every stage takes immutable input and returns a fresh value; nothing is
//! cached between calls. Chart rendering sits behind [`ChartSink`].

pub mod aligner;
pub mod chart;
pub mod difference;
pub mod error;
pub mod facade;
pub mod normalizer;
pub mod quality;
pub mod session;
pub mod stats;
pub mod types;

pub use aligner::{align, AlignedSeries, IntradaySeries};
pub use chart::{ChartSink, HistogramSpec, NullChartSink, BIN_WIDTH};
pub use difference::{difference, DifferenceSeries};
pub use error::AnalysisError;
pub use facade::{
    analyze, analyze_bars, AnalysisOutcome, AnalysisRequest, AnalysisSettings, ValidatedRequest,
};
pub use normalizer::{flagged_days, normalize, NormalizedBar};
pub use quality::{build_quality_report, QualityReport};
pub use session::{SessionError, SessionSpec};
pub use stats::{round_to, summarize, StatisticsRecord};
pub use types::{ComparisonMode, CutoffTime, Ticker, DEFAULT_CUTOFF, DEFAULT_TICKERS};
