//! Discogs API client error types.

use std::sync::Arc;

/// Errors from the Discogs API transport.
#[derive(Debug, thiserror::Error)]
pub enum DiscogsError {
    /// Consumer key/secret not configured.
    #[error("missing credentials: consumer key and secret are required")]
    MissingCredentials,

    /// Non-success HTTP status from the upstream.
    #[error("upstream HTTP error: {status}")]
    Http { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for DiscogsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { DiscogsError::Timeout } else { DiscogsError::Network(Arc::new(err)) }
    }
}
