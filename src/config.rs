use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) const API_URL_ENV: &str = "FINTRACK_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Base URL of the expense service, without the `/api/expenses` path.
    pub(crate) api_url: String,
    pub(crate) timeout_ms: u64,
    pub(crate) currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8081".to_string(),
            timeout_ms: 10_000,
            currency_symbol: "₹".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the config file, then `FINTRACK_API_URL`, then the
    /// `--api-url` flag.
    pub(crate) fn load(path: &Path, api_url_flag: Option<&str>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(std::env::var(API_URL_ENV).ok().as_deref(), api_url_flag);
        Ok(config)
    }

    pub(crate) fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub(crate) fn apply_overrides(&mut self, env_url: Option<&str>, flag_url: Option<&str>) {
        for url in [env_url, flag_url].into_iter().flatten() {
            let url = url.trim();
            if !url.is_empty() {
                self.api_url = url.to_string();
            }
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "fintrack", "fintrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

pub(crate) fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub(crate) fn log_path() -> Result<PathBuf> {
    let proj_dirs = project_dirs()?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("fintrack.log"))
}
