//! Trading session clock.
//!
//! Quote times are local wall-clock times of the exporting desk, so the
//! regular session opens at `15:30` and its last 5-minute bar starts at
//! `21:55`. Deterministic, pure logic; no time zone database involved.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};

/// Bar granularity of the quote files.
pub const BAR_MINUTES: u32 = 5;

/// Size of the one historical clock anomaly: on some days the exporter's
/// clock ran one hour behind the exchange (DST switched on different dates).
pub fn clock_shift() -> Duration {
    Duration::hours(1)
}

/// Session boundaries in quote-file wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSpec {
    /// Start time of the opening bar.
    pub start: NaiveTime,
    /// Start time of the closing bar.
    pub last_bar: NaiveTime,
}

impl Default for SessionSpec {
    fn default() -> Self {
        Self {
            start: hm(15, 30),
            last_bar: hm(21, 55),
        }
    }
}

/// Why a session window was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `last_bar` is earlier than `start`.
    Inverted { start: NaiveTime, last_bar: NaiveTime },
    /// `start` is too early for the one-hour correction to stay on the same day.
    NoRoomForClockShift { start: NaiveTime },
    /// A boundary is not on the bar grid.
    OffGrid { time: NaiveTime },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Inverted { start, last_bar } => {
                write!(f, "session last bar {last_bar} is before start {start}")
            }
            SessionError::NoRoomForClockShift { start } => write!(
                f,
                "session start {start} leaves no room for the one-hour clock correction"
            ),
            SessionError::OffGrid { time } => {
                write!(f, "session time {time} is not on the {BAR_MINUTES}-minute grid")
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl SessionSpec {
    /// Build a session, rejecting inverted or off-grid boundaries.
    pub fn new(start: NaiveTime, last_bar: NaiveTime) -> Result<Self, SessionError> {
        if last_bar < start {
            return Err(SessionError::Inverted { start, last_bar });
        }
        if start < clock_shift_floor() {
            return Err(SessionError::NoRoomForClockShift { start });
        }
        for t in [start, last_bar] {
            if t.second() != 0 || t.minute() % BAR_MINUTES != 0 {
                return Err(SessionError::OffGrid { time: t });
            }
        }
        Ok(Self { start, last_bar })
    }

    /// The opening-bar time observed on days hit by the clock anomaly.
    pub fn anomalous_start(&self) -> NaiveTime {
        self.start - clock_shift()
    }

    /// `true` when `t` is the start of a regular-session bar.
    pub fn contains_bar(&self, t: NaiveTime) -> bool {
        t >= self.start && t <= self.last_bar && t.second() == 0 && t.minute() % BAR_MINUTES == 0
    }
}

fn clock_shift_floor() -> NaiveTime {
    hm(1, 0)
}

pub(crate) fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}
