//! spb-chart
//!
//! Concrete [`ChartSink`](spb_analysis::ChartSink) implementations:
//! - [`TextHistogramSink`]: one line per bin, written to any `io::Write`
//! - `PngHistogramSink` (feature `png`): bitmap file per ticker and label

pub mod text;

#[cfg(feature = "png")]
pub mod png;

pub use text::TextHistogramSink;

#[cfg(feature = "png")]
pub use png::PngHistogramSink;

/// File-name friendly form of a histogram label.
///
/// `"Intraday Price @1835 - Open Price Difference"` becomes
/// `"intraday_price_1835_open_price_difference"`.
pub fn label_slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}
