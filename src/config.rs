// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::provider::purpleair::DEFAULT_BASE_URL;
use crate::ranking::LatLon;

const ENV_PATH: &str = "PURPLEWATCH_CONFIG";
const DEFAULT_PATH: &str = "config/purplewatch.toml";

/// Service configuration, loaded from TOML. Every field has a default so
/// an empty file (or no file at all) is a valid deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Base URL of the PurpleAir map API (overridable for tests).
    pub provider_base_url: String,
    /// Where the selected-sensor id is persisted.
    pub store_path: PathBuf,
    /// Default origin when a request carries no coordinates. Absent means
    /// callers must always pass lat/lon.
    pub default_location: Option<LatLon>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            provider_base_url: DEFAULT_BASE_URL.to_string(),
            store_path: PathBuf::from("data/selection.json"),
            default_location: None,
        }
    }
}

/// Load configuration from an explicit TOML path.
pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Load configuration using env var + fallbacks:
/// 1) $PURPLEWATCH_CONFIG
/// 2) config/purplewatch.toml
/// 3) built-in defaults
pub fn load_default() -> Result<Config> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("PURPLEWATCH_CONFIG points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_PATH);
    if default.exists() {
        return load_from(&default);
    }
    Ok(Config::default())
}
