//! Histogram description handed to chart sinks.
//!
//! The core only describes the histogram. Rendering (text, PNG, ...) lives
//! behind [`ChartSink`] and never reports back.

/// Fixed bin width in currency units.
pub const BIN_WIDTH: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    pub ticker: String,
    pub label: String,
    pub values: Vec<f64>,
    pub bin_width: f64,
    /// `floor(min) - 0.5`
    pub start: f64,
    /// `ceil(max) + 0.5`
    pub end: f64,
}

impl HistogramSpec {
    /// `None` for an empty series or one carrying non-finite values.
    pub fn new(ticker: impl Into<String>, label: impl Into<String>, values: Vec<f64>) -> Option<Self> {
        if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            ticker: ticker.into(),
            label: label.into(),
            values,
            bin_width: BIN_WIDTH,
            start: min.floor() - 0.5,
            end: max.ceil() + 0.5,
        })
    }

    pub fn title(&self) -> String {
        format!("Histogram of Stock {}\nTicker Symbol: {}", self.label, self.ticker)
    }

    pub fn bin_count(&self) -> usize {
        ((self.end - self.start) / self.bin_width).round().max(0.0) as usize
    }

    /// Bin edges from `start` to `end`, both included.
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.bin_count())
            .map(|k| self.start + k as f64 * self.bin_width)
            .collect()
    }

    /// Observations per bin. Bins are `[a, b)` except the last, which also
    /// takes values equal to `end`.
    pub fn counts(&self) -> Vec<usize> {
        let bins = self.bin_count();
        let mut counts = vec![0usize; bins];
        if bins == 0 {
            return counts;
        }
        for v in &self.values {
            if *v < self.start || *v > self.end {
                continue;
            }
            let idx = ((v - self.start) / self.bin_width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }
        counts
    }
}

/// Receives a histogram to draw. Failures stay inside the sink.
pub trait ChartSink {
    fn render(&self, histogram: &HistogramSpec);
}

/// Sink that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChartSink;

impl ChartSink for NullChartSink {
    fn render(&self, _histogram: &HistogramSpec) {}
}
