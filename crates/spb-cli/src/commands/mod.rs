//! Command handlers for `spb`.
//!
//! Shared setup (config layering, quote store resolution) lives here; each
//! subcommand has its own module.

pub mod analyze;
pub mod quality;

use std::path::Path;

use anyhow::{Context as _, Result};
use spb_analysis::AnalysisSettings;
use spb_config::{load_layered_yaml, load_layered_yaml_from_strings, SpbConfig};
use spb_md::CsvQuoteStore;
use tracing::debug;

/// Env var that overrides `quotes.dir`.
pub const ENV_QUOTES_DIR: &str = "SPB_QUOTES_DIR";

/// Everything a subcommand needs, resolved once.
pub struct Context {
    pub config: SpbConfig,
    pub settings: AnalysisSettings,
    pub store: CsvQuoteStore,
}

impl Context {
    pub fn load(config_paths: &[String], quotes_dir: Option<&Path>) -> Result<Self> {
        let loaded = if config_paths.is_empty() {
            load_layered_yaml_from_strings(&["{}"])?
        } else {
            let refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
            load_layered_yaml(&refs)?
        };
        let config = loaded.typed()?;
        let settings = config
            .analysis_settings()
            .context("config does not yield valid analysis settings")?;

        let dir = config.resolve_quotes_dir(quotes_dir, std::env::var_os(ENV_QUOTES_DIR));
        debug!(config_hash = %loaded.config_hash, quotes_dir = %dir.display(), "config loaded");
        let store = config.quote_store(dir);

        Ok(Self {
            config,
            settings,
            store,
        })
    }
}
