//! Quote-file reader (read side only).
//!
//! ## Row contract (positional, no header by default)
//!
//! | # | Column   | Example          | Notes                                   |
//! |---|----------|------------------|-----------------------------------------|
//! | 0 | `Date`   | `2018.03.12`     | see [`parse_date`] for accepted layouts |
//! | 1 | `Time`   | `15:30:00`       | `HH:MM:SS` or `HH:MM`, local wall clock |
//! | 2 | `Open`   | `44.50`          | decimal string, at most 6 decimals      |
//! | 3 | `High`   | `44.80`          |                                         |
//! | 4 | `Low`    | `44.20`          |                                         |
//! | 5 | `Close`  | `44.61`          |                                         |
//! | 6 | `Volume` | `120334`         | integer                                 |
//!
//! Rows are returned in file order. Sorting, deduplication and session-time
//! correction are left to the caller.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};

use crate::price::price_to_micros;
use crate::store::QuoteStoreError;
use crate::Bar;

const COLUMNS: usize = 7;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Reader options for quote files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvOptions {
    /// Skip the first row as a header.
    pub has_header: bool,
}

/// Read and parse the quote file at `path`.
pub fn parse_quotes_file(path: &Path, options: CsvOptions) -> Result<Vec<Bar>, QuoteStoreError> {
    let file = File::open(path)
        .map_err(|e| QuoteStoreError::Io(format!("open '{}': {e}", path.display())))?;
    parse_quotes_reader(file, options)
}

/// Parse quote rows from an in-memory string (tests, embedded fixtures).
pub fn parse_quotes_str(src: &str, options: CsvOptions) -> Result<Vec<Bar>, QuoteStoreError> {
    parse_quotes_reader(src.as_bytes(), options)
}

fn parse_quotes_reader<R: Read>(rdr: R, options: CsvOptions) -> Result<Vec<Bar>, QuoteStoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| QuoteStoreError::Csv(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != COLUMNS {
            return Err(QuoteStoreError::BadRow {
                line,
                reason: format!("expected {COLUMNS} columns, found {}", record.len()),
            });
        }

        out.push(parse_row(&record, line)?);
    }

    Ok(out)
}

fn parse_row(record: &csv::StringRecord, line: u64) -> Result<Bar, QuoteStoreError> {
    let field = |i: usize| record.get(i).unwrap_or("");
    let price = |i: usize, name: &'static str| {
        price_to_micros(field(i), name).map_err(|source| QuoteStoreError::Price { line, source })
    };

    let date = parse_date(field(0)).ok_or_else(|| QuoteStoreError::BadRow {
        line,
        reason: format!("unrecognised date '{}'", field(0)),
    })?;
    let time = parse_time(field(1)).ok_or_else(|| QuoteStoreError::BadRow {
        line,
        reason: format!("unrecognised time '{}'", field(1)),
    })?;
    let volume: i64 = field(6).parse().map_err(|_| QuoteStoreError::BadRow {
        line,
        reason: format!("volume is not an integer: '{}'", field(6)),
    })?;

    Ok(Bar {
        date,
        time,
        open_micros: price(2, "open")?,
        high_micros: price(3, "high")?,
        low_micros: price(4, "low")?,
        close_micros: price(5, "close")?,
        volume,
    })
}

/// Parse a calendar date in any of the layouts quote exporters use:
/// `2018-03-12`, `2018.03.12`, `2018/03/12`, `20180312`, `03/12/2018`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a wall-clock time `HH:MM:SS` or `HH:MM`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_positional_rows_in_file_order() {
        let src = "2018.01.02,15:30:00,44.50,44.80,44.20,44.61,1200\n\
                   2018.01.02,15:35:00,44.61,44.70,44.40,44.45,900\n";
        let bars = parse_quotes_str(src, CsvOptions::default()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, d(2018, 1, 2));
        assert_eq!(bars[0].time, t(15, 30));
        assert_eq!(bars[0].open_micros, 44_500_000);
        assert_eq!(bars[0].close_micros, 44_610_000);
        assert_eq!(bars[1].time, t(15, 35));
        assert_eq!(bars[1].volume, 900);
    }

    #[test]
    fn header_row_is_skipped_when_enabled() {
        let src = "Date,Time,Open,High,Low,Close,Volume\n\
                   2018-01-02,15:30,1,2,0.5,1.5,10\n";
        let bars = parse_quotes_str(src, CsvOptions { has_header: true }).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].time, t(15, 30));
    }

    #[test]
    fn header_row_without_option_is_a_bad_row() {
        let src = "Date,Time,Open,High,Low,Close,Volume\n";
        let err = parse_quotes_str(src, CsvOptions::default()).unwrap_err();
        assert!(matches!(err, QuoteStoreError::BadRow { line: 1, .. }), "{err}");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let src = "2018.01.02,15:30:00,1,1,1,1,1\n\n2018.01.02,15:35:00,1,1,1,1,1\n";
        assert_eq!(parse_quotes_str(src, CsvOptions::default()).unwrap().len(), 2);
    }

    #[test]
    fn wrong_column_count_names_the_line() {
        let src = "2018.01.02,15:30:00,1,1,1,1,1\n2018.01.02,15:35:00,1,1,1\n";
        let err = parse_quotes_str(src, CsvOptions::default()).unwrap_err();
        assert_eq!(
            err,
            QuoteStoreError::BadRow {
                line: 2,
                reason: "expected 7 columns, found 5".to_string()
            }
        );
    }

    #[test]
    fn bad_price_is_reported_with_field() {
        let src = "2018.01.02,15:30:00,1,1,x,1,1\n";
        let err = parse_quotes_str(src, CsvOptions::default()).unwrap_err();
        assert!(matches!(err, QuoteStoreError::Price { line: 1, .. }));
        assert!(err.to_string().contains("'low'"), "{err}");
    }

    #[test]
    fn bad_volume_is_rejected() {
        let src = "2018.01.02,15:30:00,1,1,1,1,lots\n";
        assert!(matches!(
            parse_quotes_str(src, CsvOptions::default()),
            Err(QuoteStoreError::BadRow { line: 1, .. })
        ));
    }

    #[test]
    fn date_layouts() {
        for raw in ["2018-03-12", "2018.03.12", "2018/03/12", "20180312", "03/12/2018"] {
            assert_eq!(parse_date(raw), Some(d(2018, 3, 12)), "layout {raw}");
        }
        assert_eq!(parse_date("12th March"), None);
    }

    #[test]
    fn time_layouts() {
        assert_eq!(parse_time("14:30:00"), Some(t(14, 30)));
        assert_eq!(parse_time("21:55"), Some(t(21, 55)));
        assert_eq!(parse_time("25:00"), None);
    }
}
