//! Summary statistics for a difference series.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Output of one analysis. Field names serialize as the reporting keys
/// (`minPriceChange`, `obsBtwBoundariesPerc`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    /// Rounded to 2 decimals.
    pub min_price_change: f64,
    /// Rounded to 2 decimals.
    pub max_price_change: f64,
    pub all_obs_number: usize,
    /// Observations with `-boundary <= x <= boundary`.
    pub obs_btw_boundaries: usize,
    /// Rounded to 1 decimal.
    pub obs_btw_boundaries_perc: f64,
    /// Rounded to 3 decimals.
    pub mean: f64,
    /// Sample standard deviation (N-1), rounded to 3 decimals.
    pub std: f64,
}

/// Reduce `values` against `boundary` (assumed finite and positive).
pub fn summarize(values: &[f64], boundary: f64) -> Result<StatisticsRecord, AnalysisError> {
    let n = values.len();
    if n == 0 {
        return Err(AnalysisError::EmptyResultSet);
    }
    if n < 2 {
        return Err(AnalysisError::InsufficientSamples { count: n });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let above = values.iter().filter(|&&x| x > boundary).count();
    let below = values.iter().filter(|&&x| x < -boundary).count();
    let within = n - above - below;

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

    Ok(StatisticsRecord {
        min_price_change: round_to(min, 2),
        max_price_change: round_to(max, 2),
        all_obs_number: n,
        obs_btw_boundaries: within,
        obs_btw_boundaries_perc: round_to(within as f64 / n as f64 * 100.0, 1),
        mean: round_to(mean, 3),
        std: round_to(variance.sqrt(), 3),
    })
}

/// Round half to even at `decimals` places; never returns `-0.0`.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let r = (x * scale).round_ties_even() / scale;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}
