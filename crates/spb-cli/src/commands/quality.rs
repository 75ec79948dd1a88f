use anyhow::{bail, Result};
use spb_analysis::{build_quality_report, Ticker};
use spb_md::QuoteStore;
use tracing::warn;

use super::Context;

pub fn run(ctx: &Context, ticker: &str) -> Result<()> {
    let ticker = match Ticker::parse(ticker, &ctx.settings.tickers) {
        Ok(t) => t,
        Err(e) => bail!("{}: {e}", e.kind()),
    };
    let bars = match ctx.store.load_bars(ticker.as_str()) {
        Ok(b) => b,
        Err(e) => bail!("QUOTE_SOURCE: {e}"),
    };

    let report = build_quality_report(&bars, &ctx.settings.session);
    if !report.is_clean() {
        warn!(ticker = %ticker, "quote file has duplicate or out-of-order bars");
    }
    println!("ticker={ticker}");
    println!("{report}");
    Ok(())
}
