//! Discogs API client.
//!
//! Provides the authenticated transport for the Discogs HTTP/JSON API.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://api.discogs.com`
//! - **Authentication**: `Authorization: Discogs key=…, secret=…` header.
//! - **Media type**: `Accept` pinned to the versioned Discogs JSON type.
//! - **User agent**: required by Discogs; always sent.
//!
//! Payloads are opaque `serde_json::Value`s: the application renders
//! whatever the upstream returns and only inspects shape (see
//! [`payload::is_negative_lookup`]).

pub mod error;
pub mod payload;
pub mod urls;

pub use error::DiscogsError;
pub use payload::is_negative_lookup;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;

use cratedigger_core::AppConfig;

/// Default base URL for the Discogs API.
const DEFAULT_BASE_URL: &str = "https://api.discogs.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "cratedigger/0.1";

/// Versioned Discogs JSON media type.
const DISCOGS_MEDIA_TYPE: &str = "application/vnd.discogs.v2.discogs+json";

/// Discogs API client configuration.
#[derive(Debug, Clone)]
pub struct DiscogsConfig {
    /// Consumer key.
    pub api_key: String,
    /// Consumer secret.
    pub api_secret: String,
    /// Base URL (default: https://api.discogs.com).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for DiscogsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DiscogsConfig {
    /// Build a transport configuration from the loaded application
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `DiscogsError::MissingCredentials` if the consumer key or
    /// secret is absent.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DiscogsError> {
        let api_key = config.require_api_key().map_err(|_| DiscogsError::MissingCredentials)?;
        let api_secret = config
            .require_api_secret()
            .map_err(|_| DiscogsError::MissingCredentials)?;

        Ok(Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Transport seam for the upstream API.
///
/// The cached client and route handlers program against this trait; tests
/// substitute a scripted implementation instead of mocking the network.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Execute an authenticated GET against the upstream API and parse the
    /// response body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, DiscogsError>;
}

/// Discogs API client.
#[derive(Debug, Clone)]
pub struct DiscogsClient {
    http: reqwest::Client,
    config: DiscogsConfig,
}

impl DiscogsClient {
    /// Create a new Discogs client with the given configuration.
    pub fn new(config: DiscogsConfig) -> Result<Self, DiscogsError> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(DiscogsError::MissingCredentials);
        }

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| DiscogsError::Network(std::sync::Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Create a new Discogs client from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DiscogsError> {
        Self::new(DiscogsConfig::from_app_config(config)?)
    }

    /// The configured base URL, parsed, for use with the URL builders.
    pub fn base_url(&self) -> Result<url::Url, DiscogsError> {
        url::Url::parse(&self.config.base_url).map_err(|e| DiscogsError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ApiTransport for DiscogsClient {
    async fn get_json(&self, url: &str) -> Result<Value, DiscogsError> {
        let start = Instant::now();

        tracing::debug!("requesting upstream: {}", url);

        let response = self
            .http
            .get(url)
            .header(
                header::AUTHORIZATION,
                format!("Discogs key={}, secret={}", self.config.api_key, self.config.api_secret),
            )
            .header(header::ACCEPT, DISCOGS_MEDIA_TYPE)
            .send()
            .await
            .map_err(DiscogsError::from)?;

        let status = response.status();
        tracing::debug!("upstream response status: {}", status);

        if !status.is_success() {
            return Err(DiscogsError::Http { status: status.as_u16() });
        }

        let bytes = response.bytes().await.map_err(DiscogsError::from)?;
        let payload: Value = serde_json::from_slice(&bytes).map_err(|e| DiscogsError::Parse(e.to_string()))?;

        tracing::debug!("upstream request completed in {:?} ({} bytes)", start.elapsed(), bytes.len());

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = DiscogsConfig::default();
        assert_eq!(config.base_url, "https://api.discogs.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, "cratedigger/0.1");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_client_new_missing_credentials() {
        let config = DiscogsConfig::default();
        let result = DiscogsClient::new(config);
        assert!(matches!(result, Err(DiscogsError::MissingCredentials)));
    }

    #[test]
    fn test_client_new_with_credentials() {
        let config = DiscogsConfig {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        };
        assert!(DiscogsClient::new(config).is_ok());
    }

    #[test]
    fn test_from_app_config_requires_both_credentials() {
        let app = AppConfig { api_key: Some("key".into()), ..Default::default() };
        let result = DiscogsConfig::from_app_config(&app);
        assert!(matches!(result, Err(DiscogsError::MissingCredentials)));
    }

    #[test]
    fn test_from_app_config_carries_settings_over() {
        let app = AppConfig {
            api_key: Some("key".into()),
            api_secret: Some("secret".into()),
            user_agent: "custom/1.0".into(),
            timeout_ms: 2_000,
            ..Default::default()
        };

        let config = DiscogsConfig::from_app_config(&app).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_secret, "secret");
        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.base_url, "https://api.discogs.com");
    }

    #[test]
    fn test_base_url_parses() {
        let client = DiscogsClient::new(DiscogsConfig {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        })
        .unwrap();

        let base = client.base_url().unwrap();
        assert_eq!(base.host_str(), Some("api.discogs.com"));
    }
}
