//! Day alignment: per-day open, prior close, close and intraday series.
//!
//! Layout for `D` trading days with a session-start bar, in source order:
//!
//! ```text
//! open[i]        = open of the session-start bar of day i+1
//! prior_close[i] = close of the bar just before that session-start bar
//! close[i]       = prior_close[i+1]        (i < N-1)
//! close[N-1]     = close of the last bar in the sequence
//! ```
//!
//! with `N = D - 1`; the first day only supplies a prior close. The prior
//! close is found by position in the bar sequence, never by subtracting a
//! calendar duration, so weekends and holidays need no special casing.
//!
//! The intraday series is built independently: every day (the first one
//! included) that has both a bar at the cutoff and a session-start bar
//! contributes one `(price, open)` pair. Short sessions drop out here, so its
//! length can differ from `N`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::normalizer::NormalizedBar;
use crate::session::SessionSpec;
use crate::types::CutoffTime;

/// The four day-indexed price series, in micros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSeries {
    /// Trading day of entry `i` in `open`, `prior_close` and `close`.
    pub days: Vec<NaiveDate>,
    pub open: Vec<i64>,
    pub prior_close: Vec<i64>,
    pub close: Vec<i64>,
    /// Present when alignment was asked for a cutoff.
    pub intraday: Option<IntradaySeries>,
}

/// Cutoff-time close paired with the same day's session open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntradaySeries {
    pub cutoff: CutoffTime,
    pub days: Vec<NaiveDate>,
    pub price: Vec<i64>,
    pub open: Vec<i64>,
}

impl AlignedSeries {
    /// Number of aligned days `N`.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Align `bars` (already time-normalized, in source order).
pub fn align(
    bars: &[NormalizedBar],
    session: &SessionSpec,
    cutoff: Option<CutoffTime>,
) -> AlignedSeries {
    // Row of the first session-start bar of each day, in source order.
    let mut open_rows: Vec<usize> = Vec::new();
    let mut seen_day: Option<NaiveDate> = None;
    for (row, nb) in bars.iter().enumerate() {
        if nb.adjusted_time == session.start && seen_day != Some(nb.date()) {
            seen_day = Some(nb.date());
            open_rows.push(row);
        }
    }

    let later_days = open_rows.iter().skip(1);
    let days: Vec<NaiveDate> = later_days.clone().map(|&r| bars[r].date()).collect();
    let open: Vec<i64> = later_days.clone().map(|&r| bars[r].bar.open_micros).collect();
    // `r > open_rows[0] >= 0`, so `r - 1` is always a valid row.
    let prior_close: Vec<i64> = later_days
        .map(|&r| bars[r - 1].bar.close_micros)
        .collect();

    let mut close: Vec<i64> = prior_close.iter().skip(1).copied().collect();
    if !prior_close.is_empty() {
        if let Some(last) = bars.last() {
            close.push(last.bar.close_micros);
        }
    }

    let intraday = cutoff.map(|c| align_intraday(bars, session, c));

    debug!(
        trading_days = open_rows.len(),
        aligned = open.len(),
        intraday = intraday.as_ref().map(|s| s.price.len()),
        "day alignment"
    );

    AlignedSeries {
        days,
        open,
        prior_close,
        close,
        intraday,
    }
}

fn align_intraday(bars: &[NormalizedBar], session: &SessionSpec, cutoff: CutoffTime) -> IntradaySeries {
    let mut at_cutoff: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut at_open: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for nb in bars {
        if nb.adjusted_time == cutoff.time() {
            at_cutoff.entry(nb.date()).or_insert(nb.bar.close_micros);
        }
        if nb.adjusted_time == session.start {
            at_open.entry(nb.date()).or_insert(nb.bar.open_micros);
        }
    }

    let mut series = IntradaySeries {
        cutoff,
        days: Vec::new(),
        price: Vec::new(),
        open: Vec::new(),
    };
    for (day, price) in at_cutoff {
        if let Some(&open) = at_open.get(&day) {
            series.days.push(day);
            series.price.push(price);
            series.open.push(open);
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::session::hm;
    use chrono::Datelike;
    use spb_md::Bar;

    fn bar(day: u32, h: u32, m: u32, open: i64, close: i64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2018, 3, day).unwrap(),
            time: hm(h, m),
            open_micros: open,
            high_micros: open.max(close),
            low_micros: open.min(close),
            close_micros: close,
            volume: 100,
        }
    }

    /// Three full days, prices in cents-as-micros for readability.
    fn three_days() -> Vec<Bar> {
        vec![
            bar(12, 15, 30, 100, 101),
            bar(12, 18, 0, 101, 103),
            bar(12, 21, 55, 103, 105),
            bar(13, 15, 30, 106, 107),
            bar(13, 18, 0, 107, 104),
            bar(13, 21, 55, 104, 102),
            bar(14, 15, 30, 100, 99),
            bar(14, 18, 0, 99, 98),
            bar(14, 21, 55, 98, 97),
        ]
    }

    fn aligned(bars: &[Bar], cutoff: Option<CutoffTime>) -> AlignedSeries {
        let session = SessionSpec::default();
        align(&normalize(bars, &session), &session, cutoff)
    }

    #[test]
    fn first_day_only_supplies_a_prior_close() {
        let a = aligned(&three_days(), None);
        assert_eq!(a.len(), 2);
        assert_eq!(a.days[0], NaiveDate::from_ymd_opt(2018, 3, 13).unwrap());
        assert_eq!(a.open, vec![106, 100]);
        assert_eq!(a.prior_close, vec![105, 102]);
        assert_eq!(a.close, vec![102, 97]);
        assert!(a.intraday.is_none());
    }

    #[test]
    fn close_is_next_prior_close_and_last_bar_close() {
        let bars = three_days();
        let a = aligned(&bars, None);
        for i in 0..a.len() - 1 {
            assert_eq!(a.close[i], a.prior_close[i + 1]);
        }
        assert_eq!(a.close[a.len() - 1], bars.last().unwrap().close_micros);
    }

    #[test]
    fn prior_close_follows_position_across_a_short_session() {
        let mut bars = three_days();
        // Day 13 ends at 18:00.
        bars.remove(5);
        let a = aligned(&bars, None);
        assert_eq!(a.prior_close, vec![105, 104]);
        assert_eq!(a.close, vec![104, 97]);
    }

    #[test]
    fn shifted_day_is_aligned_after_correction() {
        let mut bars = three_days();
        for b in bars.iter_mut().filter(|b| b.date.day() == 13) {
            b.time = b.time - chrono::Duration::hours(1);
        }
        assert_eq!(aligned(&bars, None), aligned(&three_days(), None));
    }

    #[test]
    fn intraday_includes_first_day_and_skips_missing_cutoff() {
        let mut bars = three_days();
        bars.remove(7); // day 14 has no 18:00 bar
        let cutoff = CutoffTime::from_time(hm(18, 0));
        let intra = aligned(&bars, Some(cutoff)).intraday.unwrap();
        assert_eq!(intra.price, vec![103, 104]);
        assert_eq!(intra.open, vec![100, 106]);
        assert_eq!(intra.days.len(), 2);
    }

    #[test]
    fn cutoff_absent_from_data_gives_empty_intraday() {
        let cutoff = CutoffTime::from_time(hm(19, 0));
        let intra = aligned(&three_days(), Some(cutoff)).intraday.unwrap();
        assert!(intra.price.is_empty());
        assert!(intra.open.is_empty());
    }

    #[test]
    fn no_bars_or_one_day_gives_empty_series() {
        assert!(aligned(&[], None).is_empty());
        let one_day = &three_days()[..3];
        let a = aligned(one_day, None);
        assert!(a.is_empty());
        assert!(a.close.is_empty());
    }
}
