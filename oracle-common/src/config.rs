//! Configuration management for the Oracle presentation layer.
//!
//! The CLI and the web server share one configuration file at
//! `~/.oracle/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Command line flags (applied by the binaries)
//! 2. Environment variables (ORACLE_* prefix)
//! 3. Explicit config file values
//! 4. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ORACLE_ENDPOINT` → endpoint
//! - `ORACLE_TIMEOUT_SECS` → timeout_secs
//! - `ORACLE_BIND_ADDRESS` → network.bind
//! - `ORACLE_WEB_PORT` → network.port
//! - `ORACLE_LOG_LEVEL` → observability.log_level
//! - `ORACLE_LOG_FORMAT` → observability.log_format
//! - `ORACLE_TTS_API_KEY` (or `OPENAI_API_KEY`) → narration.api_key

use crate::error::{Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default base URL of the remote analysis service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

/// Default port of the presentation server.
pub const DEFAULT_WEB_PORT: u16 = 4440;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".oracle"),
        |dirs| dirs.home_dir().join(".oracle"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Bind address and port of the presentation server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address.
    /// Default: "127.0.0.1" (local only)
    #[serde(default = "default_bind_address")]
    pub bind: String,

    /// Listening port.
    #[serde(default = "default_web_port")]
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            port: default_web_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

fn default_web_port() -> u16 {
    DEFAULT_WEB_PORT
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,

    /// Additional module targets to force to `warn`.
    #[serde(default)]
    pub excluded_targets: Vec<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            excluded_targets: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Narration Configuration
// ============================================================================

/// Narration backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NarrationProvider {
    /// Write the spoken script as plain text.
    #[default]
    Transcript,
    /// Synthesize audio through an OpenAI-compatible speech endpoint.
    Speech,
}

/// Read-aloud settings for rendered results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Narrate every successful result without `--narrate`.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub provider: NarrationProvider,

    /// API key for the speech provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Speech model (default: tts-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Voice (default: onyx)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,

    /// Base URL for OpenAI-compatible providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Where narration files are written. `~` is expanded.
    #[serde(default = "default_narration_dir")]
    pub output_dir: String,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: NarrationProvider::default(),
            api_key: None,
            model: None,
            voice: None,
            base_url: None,
            output_dir: default_narration_dir(),
        }
    }
}

fn default_narration_dir() -> String {
    "~/.oracle/narration".into()
}

impl NarrationConfig {
    /// Output directory with `~` and environment variables expanded.
    pub fn resolved_output_dir(&self) -> PathBuf {
        let expanded = shellexpand::full(&self.output_dir)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| self.output_dir.clone());
        PathBuf::from(expanded)
    }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote analysis service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout for the analysis call. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub narration: NarrationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: None,
            network: NetworkConfig::default(),
            observability: ObservabilityConfig::default(),
            narration: NarrationConfig::default(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .context(format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    ///
    /// An explicit path must exist; the default path falls back to defaults.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("ORACLE_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(secs) = lookup("ORACLE_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.timeout_secs = Some(s);
            }
        }
        if let Some(bind) = lookup("ORACLE_BIND_ADDRESS") {
            self.network.bind = bind;
        }
        if let Some(port) = lookup("ORACLE_WEB_PORT") {
            if let Ok(p) = port.parse() {
                self.network.port = p;
            }
        }
        if let Some(level) = lookup("ORACLE_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("ORACLE_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if self.narration.api_key.is_none() {
            self.narration.api_key =
                lookup("ORACLE_TTS_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
    }

    /// Endpoint without a trailing slash, ready for path joining.
    pub fn endpoint_base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).context(format!("Failed to write config to {}", path.display()))
    }
}
