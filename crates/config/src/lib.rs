//! Configuration loading and validation for Roundtable.
//!
//! Loads configuration from `roundtable.toml` in the working directory (or
//! `~/.roundtable/config.toml`) with environment variable overrides.
//! Required settings are validated at startup; a missing one is fatal before
//! any run is attempted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Constructed once at startup and passed by reference to every component
/// that needs it. Business logic never reads ambient global state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Search provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Domain-scoped (custom) search settings
    #[serde(default)]
    pub custom_search: CustomSearchConfig,

    /// Run limits and termination settings
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Completion backend endpoint and identifiers.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base endpoint URL, e.g. `https://myresource.openai.azure.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Deployment name the requests are addressed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    /// API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Underlying model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for agent turns
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_api_version() -> String {
    "2024-10-01-preview".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl BackendConfig {
    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        require(&self.endpoint, "backend.endpoint", "ROUNDTABLE_OPENAI_ENDPOINT")
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        require(&self.api_key, "backend.api_key", "ROUNDTABLE_OPENAI_KEY")
    }

    pub fn require_deployment(&self) -> Result<&str, ConfigError> {
        require(&self.deployment, "backend.deployment", "ROUNDTABLE_OPENAI_DEPLOYMENT")
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: default_api_version(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

/// General web/entity search settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Subscription key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Market code sent with every query
    #[serde(default = "default_market")]
    pub market: String,

    /// Number of results requested per query
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_market() -> String {
    "en-IN".into()
}
fn default_count() -> u32 {
    5
}

impl SearchConfig {
    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        require(&self.endpoint, "search.endpoint", "ROUNDTABLE_SEARCH_ENDPOINT")
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        require(&self.api_key, "search.api_key", "ROUNDTABLE_SEARCH_KEY")
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            market: default_market(),
            count: default_count(),
        }
    }
}

/// Domain-scoped search settings (separate instance and key).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CustomSearchConfig {
    /// Base endpoint URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Subscription key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom configuration identifier scoping the searched domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
}

impl CustomSearchConfig {
    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        require(
            &self.endpoint,
            "custom_search.endpoint",
            "ROUNDTABLE_CUSTOM_SEARCH_ENDPOINT",
        )
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        require(
            &self.api_key,
            "custom_search.api_key",
            "ROUNDTABLE_CUSTOM_SEARCH_KEY",
        )
    }

    pub fn require_config_id(&self) -> Result<&str, ConfigError> {
        require(
            &self.config_id,
            "custom_search.config_id",
            "ROUNDTABLE_CUSTOM_SEARCH_CONFIG",
        )
    }
}

/// Run limits and termination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Message cap for assistant-mode runs
    #[serde(default = "default_assistant_max_messages")]
    pub assistant_max_messages: usize,

    /// Message cap for planner-mode runs
    #[serde(default = "default_planner_max_messages")]
    pub planner_max_messages: usize,

    /// Marker whose appearance in any message ends the run
    #[serde(default = "default_termination_marker")]
    pub termination_marker: String,

    /// Optional wall-clock cap for one run, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout_secs: Option<u64>,
}

fn default_assistant_max_messages() -> usize {
    10
}
fn default_planner_max_messages() -> usize {
    25
}
fn default_termination_marker() -> String {
    "TERMINATE".into()
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            assistant_max_messages: default_assistant_max_messages(),
            planner_max_messages: default_planner_max_messages(),
            termination_marker: default_termination_marker(),
            run_timeout_secs: None,
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("market", &self.market)
            .field("count", &self.count)
            .finish()
    }
}

impl std::fmt::Debug for CustomSearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomSearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("config_id", &self.config_id)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default locations with environment
    /// overrides applied on top.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path. A missing file yields
    /// the defaults (required settings can still arrive via environment).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Resolve the config file path: `roundtable.toml` in the working
    /// directory if present, `~/.roundtable/config.toml` otherwise.
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from("roundtable.toml");
        if local.exists() {
            return local;
        }
        dirs_home().join(".roundtable").join("config.toml")
    }

    /// Apply environment-style overrides. Values present in the lookup beat
    /// file values. Injectable for tests.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("ROUNDTABLE_OPENAI_ENDPOINT") {
            self.backend.endpoint = Some(v);
        }
        if let Some(v) = lookup("ROUNDTABLE_OPENAI_KEY") {
            self.backend.api_key = Some(v);
        }
        if let Some(v) = lookup("ROUNDTABLE_OPENAI_DEPLOYMENT") {
            self.backend.deployment = Some(v);
        }
        if let Some(v) = lookup("ROUNDTABLE_OPENAI_API_VERSION") {
            self.backend.api_version = v;
        }
        if let Some(v) = lookup("ROUNDTABLE_MODEL") {
            self.backend.model = v;
        }
        if let Some(v) = lookup("ROUNDTABLE_SEARCH_ENDPOINT") {
            self.search.endpoint = Some(v);
        }
        if let Some(v) = lookup("ROUNDTABLE_SEARCH_KEY") {
            self.search.api_key = Some(v);
        }
        if let Some(v) = lookup("ROUNDTABLE_MARKET") {
            self.search.market = v;
        }
        if let Some(v) = lookup("ROUNDTABLE_CUSTOM_SEARCH_ENDPOINT") {
            self.custom_search.endpoint = Some(v);
        }
        if let Some(v) = lookup("ROUNDTABLE_CUSTOM_SEARCH_KEY") {
            self.custom_search.api_key = Some(v);
        }
        if let Some(v) = lookup("ROUNDTABLE_CUSTOM_SEARCH_CONFIG") {
            self.custom_search.config_id = Some(v);
        }
    }

    /// Validate bounds that hold regardless of mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.temperature < 0.0 || self.backend.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "backend.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.search.count == 0 {
            return Err(ConfigError::ValidationError(
                "search.count must be at least 1".into(),
            ));
        }
        if self.limits.assistant_max_messages == 0 || self.limits.planner_max_messages == 0 {
            return Err(ConfigError::ValidationError(
                "message limits must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Validate the settings assistant mode requires.
    pub fn validate_assistant(&self) -> Result<(), ConfigError> {
        self.backend.require_endpoint()?;
        self.backend.require_api_key()?;
        self.backend.require_deployment()?;
        self.search.require_endpoint()?;
        self.search.require_api_key()?;
        Ok(())
    }

    /// Validate the settings planner mode requires (assistant settings plus
    /// the domain-scoped search triple).
    pub fn validate_planner(&self) -> Result<(), ConfigError> {
        self.validate_assistant()?;
        self.custom_search.require_endpoint()?;
        self.custom_search.require_api_key()?;
        self.custom_search.require_config_id()?;
        Ok(())
    }
}

fn require<'a>(
    value: &'a Option<String>,
    field: &str,
    env: &str,
) -> Result<&'a str, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.as_str()),
        _ => Err(ConfigError::MissingRequired {
            field: field.to_string(),
            env: env.to_string(),
        }),
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required configuration `{field}` (set {env} or add it to roundtable.toml)")]
    MissingRequired { field: String, env: String },
}
