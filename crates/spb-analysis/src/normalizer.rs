//! Clock-anomaly correction.
//!
//! Some days in the historical quote files were exported with the clock one
//! hour behind: the opening bar is stamped `14:30` instead of `15:30`. A day is
//! flagged when its earliest bar sits exactly at [`SessionSpec::anomalous_start`];
//! every bar of a flagged day is moved forward one hour. Other days pass
//! through unchanged.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveTime};
use spb_md::Bar;
use tracing::{debug, warn};

use crate::session::{clock_shift, SessionSpec};

/// A bar plus its corrected time of day. `bar.time` keeps the raw stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedBar {
    pub bar: Bar,
    pub adjusted_time: NaiveTime,
}

impl NormalizedBar {
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    pub fn was_shifted(&self) -> bool {
        self.adjusted_time != self.bar.time
    }
}

/// Days whose earliest bar is stamped one hour before session start.
pub fn flagged_days(bars: &[Bar], session: &SessionSpec) -> BTreeSet<NaiveDate> {
    let mut earliest: BTreeMap<NaiveDate, NaiveTime> = BTreeMap::new();
    for bar in bars {
        earliest
            .entry(bar.date)
            .and_modify(|t| *t = (*t).min(bar.time))
            .or_insert(bar.time);
    }
    let anomalous = session.anomalous_start();
    earliest
        .into_iter()
        .filter(|(_, first)| *first == anomalous)
        .map(|(date, _)| date)
        .collect()
}

/// Attach corrected times to every bar, preserving order and length.
pub fn normalize(bars: &[Bar], session: &SessionSpec) -> Vec<NormalizedBar> {
    let flagged = flagged_days(bars, session);
    debug!(bars = bars.len(), flagged_days = flagged.len(), "time normalization");

    let shift = clock_shift();
    bars.iter()
        .map(|bar| {
            let adjusted_time = if flagged.contains(&bar.date) {
                let (moved, wrapped_secs) = bar.time.overflowing_add_signed(shift);
                if wrapped_secs != 0 {
                    warn!(date = %bar.date, time = %bar.time, "clock correction would cross midnight; bar left as-is");
                    bar.time
                } else {
                    moved
                }
            } else {
                bar.time
            };
            NormalizedBar {
                bar: *bar,
                adjusted_time,
            }
        })
        .collect()
}
