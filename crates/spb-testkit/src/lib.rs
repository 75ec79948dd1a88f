//! Shared test helpers: synthetic sessions, quote-file writers and the
//! `DEMO` fixture.
//!
//! The `DEMO` ticker covers four days: a regular day, a day stamped one hour
//! early (`14:30` open), a short session ending `18:55`, and a regular day.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use spb_md::{parse_quotes_str, Bar, CsvOptions, MemoryQuoteStore, MICROS_PER_UNIT};

/// Raw text of `fixtures/DEMO.txt`.
pub const DEMO_QUOTES: &str = include_str!("../fixtures/DEMO.txt");

/// Ticker name the `DEMO` fixture is registered under.
pub const DEMO_TICKER: &str = "DEMO";

/// Env var pointing at a directory with the historical `<TICKER>.txt` files.
pub const QUOTES_DIR_ENV: &str = "SPB_QUOTES_DIR";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid test time")
}

// ---------------------------------------------------------------------------
// Session builders
// ---------------------------------------------------------------------------

/// Consecutive 5-minute bars from `first` to `last` inclusive.
///
/// Bar `k` opens at `open_micros + k * drift_micros` and closes one drift
/// higher, so every close equals the next bar's open.
pub fn session_bars(
    day: NaiveDate,
    first: NaiveTime,
    last: NaiveTime,
    open_micros: i64,
    drift_micros: i64,
) -> Vec<Bar> {
    let mut out = Vec::new();
    let mut t = first;
    let mut price = open_micros;
    while t <= last {
        let close = price + drift_micros;
        out.push(Bar {
            date: day,
            time: t,
            open_micros: price,
            high_micros: price.max(close),
            low_micros: price.min(close),
            close_micros: close,
            volume: 1_000,
        });
        price = close;
        let (next, wrapped) = t.overflowing_add_signed(Duration::minutes(5));
        if wrapped != 0 {
            break;
        }
        t = next;
    }
    out
}

/// Regular session, `15:30` to `21:55` (78 bars).
pub fn full_session(day: NaiveDate, open_micros: i64, drift_micros: i64) -> Vec<Bar> {
    session_bars(day, time(15, 30), time(21, 55), open_micros, drift_micros)
}

/// Regular session exported one hour early, `14:30` to `20:55`.
pub fn anomalous_session(day: NaiveDate, open_micros: i64, drift_micros: i64) -> Vec<Bar> {
    session_bars(day, time(14, 30), time(20, 55), open_micros, drift_micros)
}

/// Session that stops after the bar starting at `last`.
pub fn short_session(day: NaiveDate, last: NaiveTime, open_micros: i64, drift_micros: i64) -> Vec<Bar> {
    session_bars(day, time(15, 30), last, open_micros, drift_micros)
}

// ---------------------------------------------------------------------------
// Quote files
// ---------------------------------------------------------------------------

/// `12_340_000` -> `"12.34"`.
pub fn format_micros(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let abs = micros.unsigned_abs();
    let unit = MICROS_PER_UNIT as u64;
    let frac = format!("{:06}", abs % unit);
    let frac = frac.trim_end_matches('0');
    let frac = if frac.len() < 2 { format!("{frac:0<2}") } else { frac.to_string() };
    format!("{sign}{}.{frac}", abs / unit)
}

/// Write `bars` as a header-less quote file `<dir>/<ticker>.txt`.
pub fn write_quotes_file(dir: &Path, ticker: &str, bars: &[Bar]) -> Result<PathBuf> {
    let path = dir.join(format!("{ticker}.txt"));
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("create quotes file: {}", path.display()))?;
    for b in bars {
        w.write_record([
            b.date.format("%Y.%m.%d").to_string(),
            b.time.format("%H:%M:%S").to_string(),
            format_micros(b.open_micros),
            format_micros(b.high_micros),
            format_micros(b.low_micros),
            format_micros(b.close_micros),
            b.volume.to_string(),
        ])?;
    }
    w.flush().context("flush quotes file")?;
    Ok(path)
}

/// Temp directory holding one quote file per `(ticker, bars)` entry.
pub fn temp_quotes_dir(series: &[(&str, &[Bar])]) -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir().context("create temp quotes dir")?;
    for (ticker, bars) in series {
        write_quotes_file(dir.path(), ticker, bars)?;
    }
    Ok(dir)
}

/// Temp directory containing `DEMO.txt`.
pub fn demo_quotes_dir() -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir().context("create temp quotes dir")?;
    fs::write(dir.path().join(format!("{DEMO_TICKER}.txt")), DEMO_QUOTES)
        .context("write DEMO.txt")?;
    Ok(dir)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn demo_bars() -> Result<Vec<Bar>> {
    parse_quotes_str(DEMO_QUOTES, CsvOptions::default()).context("parse DEMO fixture")
}

pub fn demo_store() -> Result<MemoryQuoteStore> {
    Ok(MemoryQuoteStore::new().with_series(DEMO_TICKER, demo_bars()?))
}

/// Directory from `SPB_QUOTES_DIR`, if it is set and exists.
pub fn quotes_dir_from_env() -> Option<PathBuf> {
    let dir = PathBuf::from(std::env::var_os(QUOTES_DIR_ENV)?);
    dir.is_dir().then_some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_session_has_78_bars_and_chained_prices() {
        let bars = full_session(date(2018, 3, 12), 10_000_000, 10_000);
        assert_eq!(bars.len(), 78);
        assert_eq!(bars[0].time, time(15, 30));
        assert_eq!(bars[77].time, time(21, 55));
        for w in bars.windows(2) {
            assert_eq!(w[0].close_micros, w[1].open_micros);
        }
    }

    #[test]
    fn anomalous_and_short_sessions() {
        let a = anomalous_session(date(2018, 3, 13), 1, 0);
        assert_eq!(a.first().unwrap().time, time(14, 30));
        assert_eq!(a.last().unwrap().time, time(20, 55));
        let s = short_session(date(2018, 3, 14), time(18, 55), 1, 0);
        assert_eq!(s.len(), 42);
    }

    #[test]
    fn format_micros_keeps_two_decimals() {
        assert_eq!(format_micros(12_340_000), "12.34");
        assert_eq!(format_micros(12_000_000), "12.00");
        assert_eq!(format_micros(12_345_600), "12.3456");
        assert_eq!(format_micros(-500_000), "-0.50");
    }

    #[test]
    fn written_files_read_back_identically() {
        let bars = full_session(date(2018, 3, 12), 44_500_000, -12_345);
        let dir = temp_quotes_dir(&[("MU", bars.as_slice())]).unwrap();
        let text = fs::read_to_string(dir.path().join("MU.txt")).unwrap();
        assert_eq!(parse_quotes_str(&text, CsvOptions::default()).unwrap(), bars);
    }

    #[test]
    fn demo_fixture_has_four_days() {
        let bars = demo_bars().unwrap();
        assert_eq!(bars.len(), 12);
        assert_eq!(bars[3].time, time(14, 30));
        assert_eq!(bars.last().unwrap().close_micros, 10_800_000);
    }
}
