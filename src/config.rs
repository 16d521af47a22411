use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct JotterConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub store_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        // The shell shares the terminal with log output, so keep it quiet.
        Self {
            log_level: "warn".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let store_path = default_jotter_dir()
            .join("store.json")
            .to_string_lossy()
            .into_owned();
        Self { store_path }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".into(),
            base_url: "http://localhost:11434".into(),
            model: "llama3".into(),
            timeout_secs: 120,
        }
    }
}

/// Returns `~/.jotter/`
pub fn default_jotter_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jotter")
}

/// Returns the default config file path: `~/.jotter/config.toml`
pub fn default_config_path() -> PathBuf {
    default_jotter_dir().join("config.toml")
}

impl JotterConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            JotterConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (JOTTER_STORE, JOTTER_OLLAMA_URL, JOTTER_MODEL, JOTTER_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("JOTTER_STORE") {
            self.storage.store_path = val;
        }
        if let Ok(val) = std::env::var("JOTTER_OLLAMA_URL") {
            self.analysis.base_url = val;
        }
        if let Ok(val) = std::env::var("JOTTER_MODEL") {
            self.analysis.model = val;
        }
        if let Ok(val) = std::env::var("JOTTER_LOG_LEVEL") {
            self.logging.log_level = val;
        }
    }

    /// Resolve the store file path, expanding `~` if needed.
    pub fn resolved_store_path(&self) -> PathBuf {
        expand_tilde(&self.storage.store_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
