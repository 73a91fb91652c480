//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CRATEDIGGER_*)
//! 2. TOML config file (if CRATEDIGGER_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CRATEDIGGER_*)
/// 2. TOML config file (if CRATEDIGGER_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Discogs consumer key.
    ///
    /// Set via CRATEDIGGER_API_KEY environment variable. Required only when
    /// upstream requests are actually made.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Discogs consumer secret.
    ///
    /// Set via CRATEDIGGER_API_SECRET environment variable.
    #[serde(default)]
    pub api_secret: Option<String>,

    /// User-Agent string for upstream requests.
    ///
    /// Set via CRATEDIGGER_USER_AGENT environment variable. Discogs rejects
    /// requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the upstream API.
    ///
    /// Set via CRATEDIGGER_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum number of entries in the response cache.
    ///
    /// Set via CRATEDIGGER_CACHE_CAPACITY environment variable.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Maximum age of a cached response in milliseconds.
    ///
    /// Set via CRATEDIGGER_CACHE_MAX_AGE_MS environment variable.
    #[serde(default = "default_cache_max_age_ms")]
    pub cache_max_age_ms: u64,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via CRATEDIGGER_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_user_agent() -> String {
    "cratedigger/0.1".into()
}

fn default_api_base_url() -> String {
    "https://api.discogs.com".into()
}

fn default_cache_capacity() -> usize {
    crate::cache::DEFAULT_CAPACITY
}

fn default_cache_max_age_ms() -> u64 {
    crate::cache::DEFAULT_MAX_AGE.as_millis() as u64
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            user_agent: default_user_agent(),
            api_base_url: default_api_base_url(),
            cache_capacity: default_cache_capacity(),
            cache_max_age_ms: default_cache_max_age_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Cache max age as a Duration for use with `ResponseCache`.
    pub fn cache_max_age(&self) -> Duration {
        Duration::from_millis(self.cache_max_age_ms)
    }

    /// Timeout as a Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CRATEDIGGER_`
    /// 2. TOML file from `CRATEDIGGER_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CRATEDIGGER_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CRATEDIGGER_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Discogs consumer key is available (for deferred
    /// validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "api_key".into(),
            hint: "Set CRATEDIGGER_API_KEY environment variable".into(),
        })
    }

    /// Check if the Discogs consumer secret is available.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the secret is not set.
    pub fn require_api_secret(&self) -> Result<&str, ConfigError> {
        self.api_secret.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "api_secret".into(),
            hint: "Set CRATEDIGGER_API_SECRET environment variable".into(),
        })
    }
}
