//! Validated request vocabulary: ticker, comparison mode, cutoff time.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::session::{SessionSpec, BAR_MINUTES};

/// Symbols shipped with the historical quote set.
pub const DEFAULT_TICKERS: &[&str] = &["AMAT", "C", "JD", "MSFT", "MU", "TWTR"];

/// Cutoff used for non-intraday modes when the caller supplies none.
pub const DEFAULT_CUTOFF: &str = "1755";

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

/// Upper-cased symbol known to be on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Case-insensitive lookup against `allowed`.
    pub fn parse(raw: &str, allowed: &[String]) -> Result<Self, AnalysisError> {
        let upper = raw.trim().to_ascii_uppercase();
        if !upper.is_empty() && allowed.iter().any(|a| a.eq_ignore_ascii_case(&upper)) {
            Ok(Ticker(upper))
        } else {
            Err(AnalysisError::InvalidTicker {
                raw: raw.to_string(),
                allowed: allowed.to_vec(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ComparisonMode
// ---------------------------------------------------------------------------

/// Which two aligned series are subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// open - prior close
    OpenPriorclose,
    /// close - open
    CloseOpen,
    /// close - prior close
    ClosePriorclose,
    /// intraday price at cutoff - open of the same day
    IntrapriceOpen,
}

impl ComparisonMode {
    pub const ALL: [ComparisonMode; 4] = [
        ComparisonMode::OpenPriorclose,
        ComparisonMode::CloseOpen,
        ComparisonMode::ClosePriorclose,
        ComparisonMode::IntrapriceOpen,
    ];

    pub fn parse(raw: &str) -> Result<Self, AnalysisError> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| AnalysisError::InvalidMode {
                raw: raw.to_string(),
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonMode::OpenPriorclose => "open_priorclose",
            ComparisonMode::CloseOpen => "close_open",
            ComparisonMode::ClosePriorclose => "close_priorclose",
            ComparisonMode::IntrapriceOpen => "intraprice_open",
        }
    }

    pub fn requires_intraday(self) -> bool {
        matches!(self, ComparisonMode::IntrapriceOpen)
    }

    /// Human-readable label used in reports and chart titles.
    pub fn label(self, cutoff: CutoffTime) -> String {
        match self {
            ComparisonMode::OpenPriorclose => "Open-Prior Close Price Difference".to_string(),
            ComparisonMode::CloseOpen => "Close-Open Price Difference".to_string(),
            ComparisonMode::ClosePriorclose => "Close-Prior Close Price Difference".to_string(),
            ComparisonMode::IntrapriceOpen => format!(
                "Intraday Price @{} - Open Price Difference",
                cutoff.as_hhmm()
            ),
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CutoffTime
// ---------------------------------------------------------------------------

/// Intraday observation time, on the bar grid and inside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CutoffTime(NaiveTime);

impl CutoffTime {
    /// Parse a 4-digit `HHMM` string such as `"1835"`.
    pub fn parse(raw: &str, session: &SessionSpec) -> Result<Self, AnalysisError> {
        let fail = |reason: String| AnalysisError::InvalidCutoffTime {
            raw: Some(raw.to_string()),
            reason,
        };

        let s = raw.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("expected four digits HHMM".to_string()));
        }
        let hour: u32 = s[..2].parse().map_err(|_| fail("hour is not a number".to_string()))?;
        let minute: u32 = s[2..].parse().map_err(|_| fail("minute is not a number".to_string()))?;
        if minute >= 60 {
            return Err(fail(format!("minute {minute} out of range")));
        }
        if minute % BAR_MINUTES != 0 {
            return Err(fail(format!(
                "minute {minute:02} is not a multiple of {BAR_MINUTES}"
            )));
        }
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| fail(format!("hour {hour} out of range")))?;
        if time < session.start || time > session.last_bar {
            return Err(fail(format!(
                "outside session {}..{}",
                session.start.format("%H%M"),
                session.last_bar.format("%H%M")
            )));
        }
        Ok(CutoffTime(time))
    }

    /// Wrap a time that is already known to be valid (builders, tests).
    pub fn from_time(time: NaiveTime) -> Self {
        CutoffTime(time)
    }

    pub fn time(self) -> NaiveTime {
        self.0
    }

    pub fn as_hhmm(self) -> String {
        format!("{:02}{:02}", self.0.hour(), self.0.minute())
    }
}

impl fmt::Display for CutoffTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
