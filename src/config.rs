//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides. Every
//! feed and client takes its settings from a [`Config`] passed in at
//! construction time; nothing reads the environment after startup.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL; endpoint paths (`/api/...`) are appended verbatim
    #[serde(default = "default_api_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Live WebSocket feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    /// Base URL; endpoint paths are appended verbatim
    #[serde(default = "default_ws_url")]
    pub base_url: String,

    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,

    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

fn default_ws_url() -> String {
    "ws://localhost:8000/ws".to_string()
}

fn default_reconnect_delay() -> u64 {
    3000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_ws_url(),
            reconnect_delay_ms: default_reconnect_delay(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

impl StreamConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

/// Polling feed defaults
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Default refresh interval; 0 disables repeated polling
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
}

fn default_refresh_interval() -> u64 {
    5000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
        }
    }
}

impl PollingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("zerogex").join("config.toml")),
            Some(PathBuf::from("/etc/zerogex/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists and parses, else environment only
    pub fn load_first(paths: &[PathBuf]) -> Self {
        for path_opt in paths {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(url) = var("ZEROGEX_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("ZEROGEX_REQUEST_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.api.request_timeout_ms = timeout;
        }

        // Stream overrides
        if let Some(url) = var("ZEROGEX_WS_URL") {
            self.stream.base_url = url;
        }
        if let Some(delay) = var("ZEROGEX_RECONNECT_DELAY_MS").and_then(|s| s.parse().ok()) {
            self.stream.reconnect_delay_ms = delay;
        }
        if let Some(max) = var("ZEROGEX_MAX_RECONNECT_ATTEMPTS").and_then(|s| s.parse().ok()) {
            self.stream.max_reconnect_attempts = max;
        }

        // Polling overrides
        if let Some(refresh) = var("ZEROGEX_REFRESH_MS").and_then(|s| s.parse().ok()) {
            self.polling.refresh_interval_ms = refresh;
        }

        // Logging overrides
        if let Some(level) = var("ZEROGEX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ZEROGEX_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# ZeroGEX Client Configuration
#
# Environment variables override these settings:
# - ZEROGEX_API_URL
# - ZEROGEX_REQUEST_TIMEOUT_MS
# - ZEROGEX_WS_URL
# - ZEROGEX_RECONNECT_DELAY_MS
# - ZEROGEX_MAX_RECONNECT_ATTEMPTS
# - ZEROGEX_REFRESH_MS
# - ZEROGEX_LOG_LEVEL
# - ZEROGEX_LOG_FORMAT

[api]
# Backend base URL (endpoint paths such as /api/gex/summary are appended)
base_url = "http://localhost:8000"

# Per-request timeout (ms)
request_timeout_ms = 10000

[stream]
# WebSocket base URL (endpoint paths are appended)
base_url = "ws://localhost:8000/ws"

# Fixed delay between reconnect attempts (ms)
reconnect_delay_ms = 3000

# Consecutive reconnect attempts before giving up
max_reconnect_attempts = 5

[polling]
# Default refresh interval (ms); 0 fetches once
refresh_interval_ms = 5000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
