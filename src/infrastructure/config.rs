use crate::domain::error::WashboardError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for `max_cache_age_hours` (one year).
pub const MAX_CACHE_AGE_HOURS: i64 = 24 * 365;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub offline: OfflineConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OfflineConfig {
    #[serde(default = "default_probe_url")]
    pub probe_url: String,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_cache_age_hours")]
    pub max_cache_age_hours: i64,
    /// Serialized payloads at or above this size are never persisted.
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: usize,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: Option<String>,
    #[serde(default = "default_max_item_bytes")]
    pub max_item_bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            offline: OfflineConfig::default(),
            store: StoreConfig::default(),
            api: ApiConfig::default(),
            logging: Logging::default(),
        }
    }
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            probe_url: default_probe_url(),
            probe_timeout_secs: default_probe_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            max_cache_age_hours: default_max_cache_age_hours(),
            max_entry_bytes: default_max_entry_bytes(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl OfflineConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn max_cache_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.max_cache_age_hours.clamp(1, MAX_CACHE_AGE_HOURS))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_item_bytes: default_max_item_bytes(),
        }
    }
}

impl ApiConfig {
    /// Current credentials. `WASHBOARD_API_TOKEN` wins over the file.
    pub fn token(&self) -> Option<String> {
        std::env::var("WASHBOARD_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone())
    }
}

impl Logging {
    /// `tracing` filter directive for the configured level; unknown levels read as WARN.
    pub fn filter_directive(&self) -> &'static str {
        match self.level.to_uppercase().as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" => "warn",
            "ERROR" => "error",
            _ => "warn",
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

// Defaults
fn default_theme() -> String {
    "temp".to_string()
}
fn default_probe_url() -> String {
    "https://www.google.com".to_string()
}
fn default_probe_timeout_secs() -> u64 {
    5
}
fn default_poll_interval_secs() -> u64 {
    15
}
fn default_max_cache_age_hours() -> i64 {
    24
}
fn default_max_entry_bytes() -> usize {
    2000
}
fn default_key_prefix() -> String {
    "cache_".to_string()
}
fn default_max_item_bytes() -> usize {
    2048
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("washboard").join("config.toml"))
}

/// Secure store path (config override, else ~/.config/washboard/secure_store.db)
pub fn get_store_path(config: &Config) -> PathBuf {
    if let Some(path) = config.store.path.as_deref().filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("washboard")
        .join("secure_store.db")
}

pub fn parse_config(content: &str) -> Result<Config, WashboardError> {
    let config = toml::from_str::<Config>(content)?;

    let hours = config.offline.max_cache_age_hours;
    if !(1..=MAX_CACHE_AGE_HOURS).contains(&hours) {
        return Err(WashboardError::Config(format!(
            "offline.max_cache_age_hours must be between 1 and {}, got {}",
            MAX_CACHE_AGE_HOURS, hours
        )));
    }

    Ok(config)
}

pub fn load_config() -> Result<Config, WashboardError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match parse_config(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), WashboardError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| WashboardError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| WashboardError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(WashboardError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
