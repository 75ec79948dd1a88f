//! Bitmap histogram output via `plotters`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use spb_analysis::{ChartSink, HistogramSpec};
use tracing::{info, warn};

use crate::label_slug;

const CHART_SIZE: (u32, u32) = (960, 600);

/// Writes `<output_dir>/<TICKER>_<label_slug>.png` for every histogram.
#[derive(Debug, Clone)]
pub struct PngHistogramSink {
    output_dir: PathBuf,
}

impl PngHistogramSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn path_for(&self, histogram: &HistogramSpec) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.png",
            histogram.ticker,
            label_slug(&histogram.label)
        ))
    }

    fn draw(&self, h: &HistogramSpec, path: &Path) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("create chart dir: {}", self.output_dir.display()))?;

        let counts = h.counts();
        let edges = h.edges();
        let y_top = counts.iter().copied().max().unwrap_or(0) as u32 + 1;

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        // Captions are single-line.
        let caption = h.title().replace('\n', "  |  ");
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(48)
            .build_cartesian_2d(h.start..h.end, 0u32..y_top)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc(h.label.as_str())
            .y_desc("Frequency")
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(counts.iter().zip(edges.windows(2)).map(|(&count, edge)| {
                Rectangle::new(
                    [(edge[0], 0u32), (edge[1], count as u32)],
                    BLUE.mix(0.6).filled(),
                )
            }))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        Ok(())
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("plotting failed: {e}")
}

impl ChartSink for PngHistogramSink {
    fn render(&self, histogram: &HistogramSpec) {
        let path = self.path_for(histogram);
        match self.draw(histogram, &path) {
            Ok(()) => info!(path = %path.display(), "histogram written"),
            Err(e) => warn!(path = %path.display(), error = %format!("{e:#}"), "histogram not written"),
        }
    }
}
