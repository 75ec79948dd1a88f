//! Plain-text histogram rendering.

use std::io::{self, Write};
use std::sync::Mutex;

use spb_analysis::{ChartSink, HistogramSpec};
use tracing::warn;

const DEFAULT_WIDTH: usize = 40;

/// Writes one line per bin: edges, a `#` bar scaled to `width`, the count.
pub struct TextHistogramSink<W: Write> {
    out: Mutex<W>,
    width: usize,
}

impl<W: Write> TextHistogramSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            width: DEFAULT_WIDTH,
        }
    }

    /// Length of the longest bar, in characters (at least 1).
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_histogram(&self, out: &mut W, h: &HistogramSpec) -> io::Result<()> {
        let counts = h.counts();
        let edges = h.edges();
        let peak = counts.iter().copied().max().unwrap_or(0);

        writeln!(out, "{}", h.title())?;
        writeln!(out, "x: {}  y: Frequency  bin: {}", h.label, h.bin_width)?;
        for (i, (count, edge)) in counts.iter().zip(edges.windows(2)).enumerate() {
            let close = if i + 1 == counts.len() { ']' } else { ')' };
            let bar = "#".repeat(scaled(*count, peak, self.width));
            writeln!(
                out,
                "[{:>7.2}, {:>7.2}{close} {bar:<width$} {count}",
                edge[0],
                edge[1],
                width = self.width
            )?;
        }
        writeln!(out, "observations: {}", h.values.len())?;
        out.flush()
    }
}

fn scaled(count: usize, peak: usize, width: usize) -> usize {
    if count == 0 || peak == 0 {
        return 0;
    }
    (count * width).div_ceil(peak)
}

impl<W: Write> ChartSink for TextHistogramSink<W> {
    fn render(&self, histogram: &HistogramSpec) {
        let mut guard = match self.out.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = self.write_histogram(&mut guard, histogram) {
            warn!(ticker = %histogram.ticker, error = %e, "text histogram write failed");
        }
    }
}
