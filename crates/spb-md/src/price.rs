//! Decimal price strings <-> integer micros.
//!
//! Quote files carry prices such as `44.5` or `182.3400`. They are converted
//! to integer micros without going through `f64`, so the same text always
//! yields the same integer.

use std::fmt;

/// 1 currency unit = 1_000_000 micros.
pub const MICROS_PER_UNIT: i64 = 1_000_000;

const MAX_FRACTION_DIGITS: usize = 6;

/// Why a price string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    Empty { field: &'static str },
    Invalid { field: &'static str, raw: String },
    TooManyDecimalPlaces { field: &'static str, raw: String },
}

impl fmt::Display for PriceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceParseError::Empty { field } => write!(f, "price field '{field}' is empty"),
            PriceParseError::Invalid { field, raw } => {
                write!(f, "price field '{field}' is not a decimal number: '{raw}'")
            }
            PriceParseError::TooManyDecimalPlaces { field, raw } => write!(
                f,
                "price field '{field}' has more than {MAX_FRACTION_DIGITS} decimal places: '{raw}'"
            ),
        }
    }
}

impl std::error::Error for PriceParseError {}

/// Parse a decimal price string into integer micros.
///
/// Accepts an optional sign and an optional fractional part of at most six
/// digits. Exponents, thousands separators and multiple dots are rejected.
pub fn price_to_micros(raw: &str, field: &'static str) -> Result<i64, PriceParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(PriceParseError::Empty { field });
    }
    let invalid = || PriceParseError::Invalid {
        field,
        raw: s.to_string(),
    };

    let (negative, unsigned) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(whole) || !digits_only(fraction) {
        return Err(invalid());
    }
    if fraction.len() > MAX_FRACTION_DIGITS {
        return Err(PriceParseError::TooManyDecimalPlaces {
            field,
            raw: s.to_string(),
        });
    }

    let whole_val: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction_val: i64 = if fraction.is_empty() {
        0
    } else {
        let scale = 10_i64.pow((MAX_FRACTION_DIGITS - fraction.len()) as u32);
        fraction.parse::<i64>().map_err(|_| invalid())? * scale
    };

    let micros = whole_val
        .checked_mul(MICROS_PER_UNIT)
        .and_then(|v| v.checked_add(fraction_val))
        .ok_or_else(invalid)?;

    Ok(if negative { -micros } else { micros })
}

/// Convert micros back to currency units.
///
/// Division is correctly rounded, so `micros_to_f64(200_000) == 0.2`.
pub fn micros_to_f64(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_UNIT as f64
}
