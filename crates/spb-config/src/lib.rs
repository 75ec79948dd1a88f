//! spb-config
//!
//! Layered YAML configuration.
//!
//! Documents are merged in order (later layers override earlier ones, maps
//! merge key by key), converted to JSON and hashed: SHA-256 over the compact
//! JSON rendering, whose object keys are always sorted. The merged JSON is then
//! read into the typed [`SpbConfig`], which rejects unknown keys.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use spb_analysis::{AnalysisSettings, CutoffTime, SessionSpec, DEFAULT_CUTOFF, DEFAULT_TICKERS};
use spb_md::{ingest_csv::parse_time, CsvQuoteStore};

// ---------------------------------------------------------------------------
// Layered loading + hashing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Typed view of the merged document.
    pub fn typed(&self) -> Result<SpbConfig> {
        SpbConfig::from_json(&self.config_json)
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        // An empty document parses as null; treat it as an empty layer.
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Typed configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpbConfig {
    pub quotes: QuotesConfig,
    pub session: SessionConfig,
    pub analysis: AnalysisConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuotesConfig {
    /// Directory holding `<TICKER>.<extension>` files.
    pub dir: PathBuf,
    pub extension: String,
    pub has_header: bool,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("IntraQuotes"),
            extension: "txt".to_string(),
            has_header: false,
        }
    }
}

/// Session times as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub start: String,
    pub last_bar: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start: "15:30".to_string(),
            last_bar: "21:55".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub tickers: Vec<String>,
    /// `HHMM`, used when a non-intraday request has no cutoff.
    pub default_cutoff: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect(),
            default_cutoff: DEFAULT_CUTOFF.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Text,
    Png,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub output_dir: PathBuf,
    pub format: ChartFormat,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports/charts"),
            format: ChartFormat::Text,
        }
    }
}

impl SpbConfig {
    pub fn from_json(v: &Value) -> Result<Self> {
        serde_json::from_value(v.clone()).context("CONFIG_INVALID: config does not match schema")
    }

    pub fn session_spec(&self) -> Result<SessionSpec> {
        let start = parse_time(&self.session.start)
            .ok_or_else(|| anyhow!("CONFIG_INVALID: session.start '{}' is not HH:MM", self.session.start))?;
        let last_bar = parse_time(&self.session.last_bar).ok_or_else(|| {
            anyhow!("CONFIG_INVALID: session.last_bar '{}' is not HH:MM", self.session.last_bar)
        })?;
        SessionSpec::new(start, last_bar).map_err(|e| anyhow!("CONFIG_INVALID: {e}"))
    }

    /// Settings the analysis facade validates requests against.
    pub fn analysis_settings(&self) -> Result<AnalysisSettings> {
        let session = self.session_spec()?;

        let mut tickers: Vec<String> = Vec::new();
        for t in &self.analysis.tickers {
            let t = t.trim().to_ascii_uppercase();
            if t.is_empty() {
                bail!("CONFIG_INVALID: analysis.tickers contains an empty symbol");
            }
            if !tickers.contains(&t) {
                tickers.push(t);
            }
        }
        if tickers.is_empty() {
            bail!("CONFIG_INVALID: analysis.tickers is empty");
        }

        CutoffTime::parse(&self.analysis.default_cutoff, &session)
            .map_err(|e| anyhow!("CONFIG_INVALID: analysis.default_cutoff: {e}"))?;

        Ok(AnalysisSettings {
            tickers,
            session,
            default_cutoff: self.analysis.default_cutoff.trim().to_string(),
        })
    }

    /// Quotes directory by precedence: explicit flag, then env value, then config.
    pub fn resolve_quotes_dir(&self, flag: Option<&Path>, env: Option<OsString>) -> PathBuf {
        match (flag, env) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) if !dir.is_empty() => PathBuf::from(dir),
            _ => self.quotes.dir.clone(),
        }
    }

    pub fn quote_store(&self, dir: PathBuf) -> CsvQuoteStore {
        CsvQuoteStore::new(dir)
            .with_extension(self.quotes.extension.clone())
            .with_header(self.quotes.has_header)
    }
}
