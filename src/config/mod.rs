mod file_config;

pub use file_config::{FileConfig, LookupConfig};

use crate::catalog_service::RefreshSettings;
use crate::lookup::OMDB_API_BASE;
use crate::source::DEFAULT_TABLE;
use anyhow::{bail, Result};
use std::time::Duration;

pub const DEFAULT_DB_CACHE_TTL_SEC: u64 = 600;
pub const DEFAULT_FETCH_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_LOOKUP_TTL_SEC: u64 = 86_400;
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// CLI arguments that can be used for config resolution.
/// TOML config values take precedence over these.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub source: Option<String>,
    pub table: String,
    pub db_cache_ttl_sec: u64,
    pub fetch_timeout_sec: u64,
    pub max_results: usize,
    pub omdb_api_key: Option<String>,
    pub lookup_ttl_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            source: None,
            table: DEFAULT_TABLE.to_string(),
            db_cache_ttl_sec: DEFAULT_DB_CACHE_TTL_SEC,
            fetch_timeout_sec: DEFAULT_FETCH_TIMEOUT_SEC,
            max_results: DEFAULT_MAX_RESULTS,
            omdb_api_key: None,
            lookup_ttl_sec: DEFAULT_LOOKUP_TTL_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: String,
    pub table: String,
    pub db_cache_ttl_sec: u64,
    pub fetch_timeout_sec: u64,
    pub max_results: usize,
    pub lookup: LookupSettings,
}

#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub ttl_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let source = file
            .source
            .or_else(|| cli.source.clone())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("source must be specified via --source or in config file")
            })?;

        let table = file.table.unwrap_or_else(|| cli.table.clone());
        if table.trim().is_empty() {
            bail!("table name must not be empty");
        }

        let db_cache_ttl_sec = file.db_cache_ttl_sec.unwrap_or(cli.db_cache_ttl_sec);
        let fetch_timeout_sec = file.fetch_timeout_sec.unwrap_or(cli.fetch_timeout_sec);
        if fetch_timeout_sec == 0 {
            bail!("fetch_timeout_sec must be greater than zero");
        }
        let max_results = file.max_results.unwrap_or(cli.max_results);
        if max_results == 0 {
            bail!("max_results must be greater than zero");
        }

        let lookup_file = file.lookup.unwrap_or_default();
        let lookup = LookupSettings {
            api_key: lookup_file
                .api_key
                .or_else(|| cli.omdb_api_key.clone())
                .filter(|k| !k.trim().is_empty()),
            base_url: lookup_file
                .base_url
                .unwrap_or_else(|| OMDB_API_BASE.to_string()),
            ttl_sec: lookup_file.ttl_sec.unwrap_or(cli.lookup_ttl_sec),
        };

        Ok(Self {
            source,
            table,
            db_cache_ttl_sec,
            fetch_timeout_sec,
            max_results,
            lookup,
        })
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            source: self.source.clone(),
            table: self.table.clone(),
            ttl: Duration::from_secs(self.db_cache_ttl_sec),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_sec),
        }
    }
}
