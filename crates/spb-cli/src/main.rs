use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "spb")]
#[command(about = "Stock price behavior: intraday fluctuation statistics", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (built-in defaults when omitted)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Quote directory; overrides SPB_QUOTES_DIR and quotes.dir
    #[arg(long, global = true)]
    quotes_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute price-difference statistics for one ticker (JSON on stdout)
    Analyze {
        #[arg(long)]
        ticker: String,

        /// open_priorclose | close_open | close_priorclose | intraprice_open
        #[arg(long)]
        mode: String,

        /// Half-width of the "typical" band; must be > 0
        #[arg(long, allow_negative_numbers = true)]
        boundary: f64,

        /// Intraday cutoff HHMM (required for intraprice_open)
        #[arg(long)]
        cutoff: Option<String>,

        /// Render a histogram through the configured chart sink
        #[arg(long, default_value_t = false)]
        chart: bool,
    },

    /// Print the quote-file quality report for one ticker
    Quality {
        #[arg(long)]
        ticker: String,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Analyze {
            ticker,
            mode,
            boundary,
            cutoff,
            chart,
        } => {
            let ctx = commands::Context::load(&cli.config_paths, cli.quotes_dir.as_deref())?;
            commands::analyze::run(&ctx, ticker, mode, boundary, cutoff, chart)?;
        }

        Commands::Quality { ticker } => {
            let ctx = commands::Context::load(&cli.config_paths, cli.quotes_dir.as_deref())?;
            commands::quality::run(&ctx, &ticker)?;
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = spb_config::load_layered_yaml(&path_refs)?;
            loaded.typed()?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
