//! Element-wise differences of two aligned series.

use spb_md::micros_to_f64;

use crate::aligner::AlignedSeries;
use crate::error::AnalysisError;
use crate::types::{ComparisonMode, CutoffTime};

/// One difference per aligned day, in currency units.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceSeries {
    pub mode: ComparisonMode,
    pub label: String,
    pub values: Vec<f64>,
}

impl DifferenceSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Subtract the two series `mode` selects.
///
/// The subtraction happens in micros; only the result is converted to `f64`.
pub fn difference(
    aligned: &AlignedSeries,
    mode: ComparisonMode,
    cutoff: CutoffTime,
) -> Result<DifferenceSeries, AnalysisError> {
    let (minuend, subtrahend): (&[i64], &[i64]) = match mode {
        ComparisonMode::OpenPriorclose => (&aligned.open, &aligned.prior_close),
        ComparisonMode::CloseOpen => (&aligned.close, &aligned.open),
        ComparisonMode::ClosePriorclose => (&aligned.close, &aligned.prior_close),
        ComparisonMode::IntrapriceOpen => {
            let intra = aligned
                .intraday
                .as_ref()
                .ok_or_else(|| AnalysisError::InvalidCutoffTime {
                    raw: None,
                    reason: format!("{mode} needs series aligned at a cutoff"),
                })?;
            (&intra.price, &intra.open)
        }
    };

    let values = minuend
        .iter()
        .zip(subtrahend)
        .map(|(a, b)| micros_to_f64(a - b))
        .collect();

    Ok(DifferenceSeries {
        mode,
        label: mode.label(cutoff),
        values,
    })
}
