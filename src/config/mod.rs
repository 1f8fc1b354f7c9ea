//! Monitor configuration
//!
//! Loaded once at startup and passed by parameter into the pipelines. There
//! is no global config state; tests construct their own values directly.
//!
//! ## Loading Order
//!
//! 1. `COINWATCH_CONFIG` environment variable (path to TOML file)
//! 2. `coinwatch.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The OpenAI API key is deliberately not part of the TOML file; it comes
//! from `OPENAI_API_KEY` (a `.env` file is honored).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub llm: LlmConfig,
    pub feed: FeedConfig,
    pub store: StoreConfig,
    pub weekly: WeeklyConfig,
}

/// Generation backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
    /// Chat model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Price feed settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// CoinGecko simple-price endpoint
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Log store file locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Daily analysis log (JSONL, append-only)
    pub analysis_log: PathBuf,
    /// Weekly report log (JSONL, append-only)
    pub weekly_log: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            analysis_log: PathBuf::from("ai_crypto_log.jsonl"),
            weekly_log: PathBuf::from("weekly_reports.jsonl"),
        }
    }
}

/// Weekly report settings.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WeeklyConfig {
    /// Number of trailing log rows the weekly report covers
    pub window_size: usize,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self { window_size: 7 }
    }
}

impl MonitorConfig {
    /// Load configuration from the first file found, falling back to
    /// defaults. A malformed file is reported and ignored rather than
    /// aborting startup.
    pub fn load() -> Self {
        let path = std::env::var("COINWATCH_CONFIG")
            .unwrap_or_else(|_| "coinwatch.toml".to_string());

        match Self::from_file(Path::new(&path)) {
            Ok(Some(config)) => {
                tracing::info!(path = %path, "Loaded configuration");
                config
            }
            Ok(None) => {
                tracing::info!("No config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse a specific TOML config file. `Ok(None)` when the file does not
    /// exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }

    /// OpenAI API key from the environment. Required for live runs.
    pub fn api_key() -> Result<String> {
        std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY not found in environment variables")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.weekly.window_size, 7);
        assert_eq!(config.store.analysis_log, PathBuf::from("ai_crypto_log.jsonl"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[llm]\nmodel = \"gpt-4o\"\n\n[weekly]\nwindow_size = 14"
        )
        .unwrap();

        let config = MonitorConfig::from_file(file.path()).unwrap().unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
        assert_eq!(config.weekly.window_size, 14);
        assert_eq!(config.feed.timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_is_none() {
        let result = MonitorConfig::from_file(Path::new("/nonexistent/coinwatch.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml at all [[[").unwrap();

        assert!(MonitorConfig::from_file(file.path()).is_err());
    }
}
