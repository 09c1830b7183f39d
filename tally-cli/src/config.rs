use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tally_finance::PaymentPolicy;

use crate::output::{OutputFormat, WriteMode};
use crate::state::{ensure_tally_home, tally_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub normalize: NormalizeSection,
    pub ingest: IngestSection,
    pub output: OutputSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeSection {
    /// "drop" removes payment rows, "income" keeps them as income
    pub payment_policy: PaymentPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSection {
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Destination file; empty means stdout
    pub path: String,
    pub write_mode: WriteMode,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Used when RUST_LOG is unset
    pub filter: String,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["csv".to_string()],
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn,tally_cli=info,tally_finance=info,tally_ingest=info".to_string(),
        }
    }
}

impl OutputSection {
    pub fn path(&self) -> Option<PathBuf> {
        let p = self.path.trim();
        if p.is_empty() { None } else { Some(PathBuf::from(p)) }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    ensure_tally_home()?;
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let p = save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
