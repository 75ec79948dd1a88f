use std::io;

use anyhow::{bail, Context as _, Result};
use spb_analysis::{analyze, AnalysisRequest, ChartSink, NullChartSink};
use spb_chart::TextHistogramSink;
use spb_config::{ChartFormat, SpbConfig};

use super::Context;

pub fn run(
    ctx: &Context,
    ticker: String,
    mode: String,
    boundary: f64,
    cutoff: Option<String>,
    chart: bool,
) -> Result<()> {
    let request = AnalysisRequest {
        ticker,
        mode,
        boundary,
        cutoff,
        show_chart: chart,
    };

    let sink: Box<dyn ChartSink> = if chart {
        chart_sink(&ctx.config)?
    } else {
        Box::new(NullChartSink)
    };

    let outcome = match analyze(&request, &ctx.settings, &ctx.store, sink.as_ref()) {
        Ok(o) => o,
        Err(e) => bail!("{}: {e}", e.kind()),
    };

    let json = serde_json::to_string_pretty(&outcome).context("serialize analysis outcome")?;
    println!("{json}");
    Ok(())
}

/// Text histograms go to stderr, next to the logs, keeping stdout pure JSON.
fn chart_sink(config: &SpbConfig) -> Result<Box<dyn ChartSink>> {
    match config.chart.format {
        ChartFormat::Text => Ok(Box::new(TextHistogramSink::new(io::stderr()))),
        #[cfg(feature = "png")]
        ChartFormat::Png => Ok(Box::new(spb_chart::PngHistogramSink::new(
            config.chart.output_dir.clone(),
        ))),
        #[cfg(not(feature = "png"))]
        ChartFormat::Png => bail!("chart.format=png requires spb-cli built with --features png"),
    }
}
