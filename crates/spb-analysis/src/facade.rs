//! Analysis entry point.
//!
//! [`analyze`] validates a raw [`AnalysisRequest`], then runs the pipeline
//! `QuoteStore -> normalize -> align -> difference -> summarize` and, on
//! request, hands the series to a [`ChartSink`]. Validation completes before
//! any quote is loaded, and either a full record or an error is returned.

use serde::Serialize;
use spb_md::{Bar, QuoteStore};
use tracing::{debug, info, warn};

use crate::aligner::align;
use crate::chart::{ChartSink, HistogramSpec};
use crate::difference::difference;
use crate::error::AnalysisError;
use crate::normalizer::normalize;
use crate::quality::build_quality_report;
use crate::session::SessionSpec;
use crate::stats::{summarize, StatisticsRecord};
use crate::types::{ComparisonMode, CutoffTime, Ticker, DEFAULT_CUTOFF, DEFAULT_TICKERS};

// ---------------------------------------------------------------------------
// Settings and request types
// ---------------------------------------------------------------------------

/// Deployment-level knobs the facade validates against.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub tickers: Vec<String>,
    pub session: SessionSpec,
    /// Cutoff assumed when a non-intraday request carries none.
    pub default_cutoff: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect(),
            session: SessionSpec::default(),
            default_cutoff: DEFAULT_CUTOFF.to_string(),
        }
    }
}

/// Raw caller input, as typed on a command line or received over an API.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub mode: String,
    pub boundary: f64,
    pub cutoff: Option<String>,
    pub show_chart: bool,
}

impl AnalysisRequest {
    pub fn new(ticker: impl Into<String>, mode: impl Into<String>, boundary: f64) -> Self {
        Self {
            ticker: ticker.into(),
            mode: mode.into(),
            boundary,
            cutoff: None,
            show_chart: false,
        }
    }

    pub fn with_cutoff(mut self, cutoff: impl Into<String>) -> Self {
        self.cutoff = Some(cutoff.into());
        self
    }

    pub fn with_chart(mut self, show_chart: bool) -> Self {
        self.show_chart = show_chart;
        self
    }

    /// Check fields in order ticker, mode, boundary, cutoff; first failure wins.
    pub fn validate(&self, settings: &AnalysisSettings) -> Result<ValidatedRequest, AnalysisError> {
        let ticker = Ticker::parse(&self.ticker, &settings.tickers)?;
        let mode = ComparisonMode::parse(&self.mode)?;
        if !self.boundary.is_finite() || self.boundary <= 0.0 {
            return Err(AnalysisError::InvalidBoundary {
                value: self.boundary,
            });
        }
        // Daily modes never read the cutoff, so a supplied one is ignored.
        let cutoff = match (&self.cutoff, mode.requires_intraday()) {
            (Some(raw), true) => CutoffTime::parse(raw, &settings.session)?,
            (None, true) => {
                return Err(AnalysisError::InvalidCutoffTime {
                    raw: None,
                    reason: format!("mode {mode} requires a cutoff time HHMM"),
                })
            }
            (_, false) => CutoffTime::parse(&settings.default_cutoff, &settings.session)?,
        };

        Ok(ValidatedRequest {
            ticker,
            mode,
            boundary: self.boundary,
            cutoff,
            show_chart: self.show_chart,
        })
    }
}

/// A request whose every field is known to be usable.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub ticker: Ticker,
    pub mode: ComparisonMode,
    pub boundary: f64,
    /// Used only by `intraprice_open`.
    pub cutoff: CutoffTime,
    pub show_chart: bool,
}

/// Successful analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub ticker: Ticker,
    pub mode: ComparisonMode,
    pub label: String,
    pub record: StatisticsRecord,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Validate `request`, load its ticker from `store` and compute statistics.
pub fn analyze(
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
    store: &dyn QuoteStore,
    chart: &dyn ChartSink,
) -> Result<AnalysisOutcome, AnalysisError> {
    let validated = request.validate(settings)?;
    let bars = store.load_bars(validated.ticker.as_str())?;
    debug!(
        ticker = %validated.ticker,
        store = store.name(),
        bars = bars.len(),
        "quotes loaded"
    );
    analyze_bars(&validated, &settings.session, &bars, chart)
}

/// Run the pipeline over bars already in memory.
pub fn analyze_bars(
    request: &ValidatedRequest,
    session: &SessionSpec,
    bars: &[Bar],
    chart: &dyn ChartSink,
) -> Result<AnalysisOutcome, AnalysisError> {
    let quality = build_quality_report(bars, session);
    if !quality.is_clean() {
        warn!(
            ticker = %request.ticker,
            duplicates = quality.duplicates.len(),
            order_violations = quality.order_violations.len(),
            "quote sequence has duplicate or out-of-order bars"
        );
    }

    let normalized = normalize(bars, session);
    let cutoff = request.mode.requires_intraday().then_some(request.cutoff);
    let aligned = align(&normalized, session, cutoff);
    let diff = difference(&aligned, request.mode, request.cutoff)?;
    let record = summarize(&diff.values, request.boundary)?;

    info!(
        ticker = %request.ticker,
        mode = %request.mode,
        boundary = request.boundary,
        observations = record.all_obs_number,
        within = record.obs_btw_boundaries,
        mean = record.mean,
        std = record.std,
        "analysis complete"
    );

    if request.show_chart {
        if let Some(histogram) = HistogramSpec::new(request.ticker.as_str(), diff.label.clone(), diff.values) {
            chart.render(&histogram);
        }
    }

    Ok(AnalysisOutcome {
        ticker: request.ticker.clone(),
        mode: request.mode,
        label: diff.label,
        record,
    })
}
