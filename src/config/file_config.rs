use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub source: Option<String>,
    pub table: Option<String>,
    pub db_cache_ttl_sec: Option<u64>,
    pub fetch_timeout_sec: Option<u64>,
    pub max_results: Option<usize>,

    // Feature configs
    pub lookup: Option<LookupConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LookupConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub ttl_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
