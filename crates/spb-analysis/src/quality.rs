//! Quote-file quality report.
//!
//! Summarizes one ticker's bar sequence before (or instead of) an analysis:
//! - total bar count, trading day count, first / last date
//! - duplicate `(date, time)` keys
//! - order violations (a bar not strictly after its predecessor)
//! - days shifted by the clock correction
//! - days with no session-start bar after correction
//! - short sessions (last corrected bar before the nominal last bar)
//!
//! Nothing here rejects data; the analysis facade only logs findings.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use spb_md::Bar;

use crate::normalizer::{flagged_days, normalize};
use crate::session::SessionSpec;

/// A `(date, time)` key seen more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Always >= 2.
    pub count: usize,
}

/// A bar whose key is not strictly after the previous bar's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderViolation {
    /// 0-based position in the source sequence.
    pub row: usize,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub prev_date: NaiveDate,
    pub prev_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub total_bars: usize,
    pub trading_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub duplicates: Vec<DuplicateKey>,
    pub order_violations: Vec<OrderViolation>,
    pub shifted_days: Vec<NaiveDate>,
    pub days_without_session_start: Vec<NaiveDate>,
    pub short_sessions: Vec<NaiveDate>,
}

impl QualityReport {
    /// `true` when keys are unique and strictly increasing.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.order_violations.is_empty()
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "none".to_string());
        let days = |v: &[NaiveDate]| {
            v.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(",")
        };
        writeln!(f, "total_bars={}", self.total_bars)?;
        writeln!(f, "trading_days={}", self.trading_days)?;
        writeln!(f, "first_date={}", date(self.first_date))?;
        writeln!(f, "last_date={}", date(self.last_date))?;
        writeln!(f, "duplicates={}", self.duplicates.len())?;
        for d in &self.duplicates {
            writeln!(f, "  duplicate={} {} count={}", d.date, d.time, d.count)?;
        }
        writeln!(f, "order_violations={}", self.order_violations.len())?;
        for v in &self.order_violations {
            writeln!(
                f,
                "  row={} at={} {} after={} {}",
                v.row, v.date, v.time, v.prev_date, v.prev_time
            )?;
        }
        writeln!(f, "shifted_days={} [{}]", self.shifted_days.len(), days(&self.shifted_days))?;
        writeln!(
            f,
            "days_without_session_start={} [{}]",
            self.days_without_session_start.len(),
            days(&self.days_without_session_start)
        )?;
        write!(f, "short_sessions={} [{}]", self.short_sessions.len(), days(&self.short_sessions))
    }
}

/// Build a [`QualityReport`] for one ticker's bars in source order.
pub fn build_quality_report(bars: &[Bar], session: &SessionSpec) -> QualityReport {
    let mut key_counts: BTreeMap<(NaiveDate, NaiveTime), usize> = BTreeMap::new();
    for bar in bars {
        *key_counts.entry(bar.key()).or_insert(0) += 1;
    }
    let duplicates = key_counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|((date, time), count)| DuplicateKey { date, time, count })
        .collect();

    let order_violations = bars
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[1].key() <= w[0].key())
        .map(|(i, w)| OrderViolation {
            row: i + 1,
            date: w[1].date,
            time: w[1].time,
            prev_date: w[0].date,
            prev_time: w[0].time,
        })
        .collect();

    // Per day: (has session-start bar, last corrected time).
    let mut per_day: BTreeMap<NaiveDate, (bool, NaiveTime)> = BTreeMap::new();
    for nb in normalize(bars, session) {
        let entry = per_day
            .entry(nb.date())
            .or_insert((false, nb.adjusted_time));
        entry.0 |= nb.adjusted_time == session.start;
        entry.1 = entry.1.max(nb.adjusted_time);
    }

    let days_without_session_start = per_day
        .iter()
        .filter(|(_, (has_start, _))| !has_start)
        .map(|(d, _)| *d)
        .collect();
    let short_sessions = per_day
        .iter()
        .filter(|(_, (_, last))| *last < session.last_bar)
        .map(|(d, _)| *d)
        .collect();

    QualityReport {
        total_bars: bars.len(),
        trading_days: per_day.len(),
        first_date: per_day.keys().next().copied(),
        last_date: per_day.keys().next_back().copied(),
        duplicates,
        order_violations,
        shifted_days: flagged_days(bars, session).into_iter().collect(),
        days_without_session_start,
        short_sessions,
    }
}
