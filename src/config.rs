use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::duration::deserialize_duration;

fn default_refresh_interval() -> Duration {
    Duration::from_secs(30)
}

/// Default USDT→toman rate used when neither network nor cache has one.
fn default_fallback_usdt_rate() -> f64 {
    105_000.0
}

fn default_coingecko_base() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_wallex_base() -> String {
    "https://api.wallex.ir".to_string()
}

fn default_version_url() -> String {
    "https://zabiullahjm-star.github.io/price-site/version.json".to_string()
}

/// Remote endpoint base URLs, overridable for forks and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub coingecko_base: String,
    pub wallex_base: String,
    pub version_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            coingecko_base: default_coingecko_base(),
            wallex_base: default_wallex_base(),
            version_url: default_version_url(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the cache/data directory. If relative, resolved from the
    /// config file location. If not specified, defaults to the config
    /// file's directory.
    pub data_dir: Option<PathBuf>,

    /// How often the poller refreshes, e.g. "30s", "5m".
    #[serde(
        default = "default_refresh_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub refresh_interval: Duration,

    /// USDT→toman rate used when nothing better is available.
    #[serde(default = "default_fallback_usdt_rate")]
    pub fallback_usdt_rate: f64,

    /// Remote endpoints.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            refresh_interval: default_refresh_interval(),
            fallback_usdt_rate: default_fallback_usdt_rate(),
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to `config_dir`.
    /// If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub refresh_interval: Duration,
    pub fallback_usdt_rate: f64,
    pub endpoints: EndpointsConfig,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./coinwatch.toml` if it exists in current directory
/// 2. `~/.local/share/coinwatch/coinwatch.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("coinwatch.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("coinwatch").join("coinwatch.toml");
    }

    local_config
}

impl ResolvedConfig {
    /// Load and resolve config from a file path.
    ///
    /// The data directory is resolved relative to the config file's parent directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        let data_dir = config.resolve_data_dir(config_dir);

        Ok(Self {
            data_dir,
            refresh_interval: config.refresh_interval,
            fallback_usdt_rate: config.fallback_usdt_rate,
            endpoints: config.endpoints,
        })
    }

    /// Load config, creating a default if the file doesn't exist.
    ///
    /// Without a config file the intended config directory doubles as
    /// the data directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            let config_path = if config_path.is_relative() {
                std::env::current_dir()
                    .context("Failed to get current directory")?
                    .join(config_path)
            } else {
                config_path.to_path_buf()
            };

            let config_dir = config_path
                .parent()
                .context("Config path has no parent directory")?;

            Ok(Self {
                data_dir: config_dir.to_path_buf(),
                refresh_interval: default_refresh_interval(),
                fallback_usdt_rate: default_fallback_usdt_rate(),
                endpoints: EndpointsConfig::default(),
            })
        }
    }
}
