//! Cache-composed upstream fetching.
//!
//! Wraps an [`ApiTransport`] with the process-local response cache so route
//! handlers get one operation: data from the cache or over the network,
//! `None` when the upstream is down.

use std::sync::Arc;

use serde_json::Value;

use cratedigger_core::{AppConfig, ResponseCache};

use crate::discogs::{ApiTransport, DiscogsClient, DiscogsError};

/// Upstream client with transparent response caching.
///
/// The cache handle is injected rather than ambient: construct one cache per
/// process, share it behind an `Arc`, and pass it to every handler that
/// needs upstream data.
#[derive(Clone)]
pub struct CachedClient {
    transport: Arc<dyn ApiTransport>,
    cache: Arc<ResponseCache>,
}

impl CachedClient {
    /// Compose a transport with a response cache.
    pub fn new(transport: Arc<dyn ApiTransport>, cache: Arc<ResponseCache>) -> Self {
        Self { transport, cache }
    }

    /// Build the full stack from the application configuration: a Discogs
    /// transport plus a response cache with the configured bounds.
    pub fn from_config(config: &AppConfig) -> Result<Self, DiscogsError> {
        let transport = DiscogsClient::from_app_config(config)?;
        let cache = ResponseCache::new(config.cache_capacity, config.cache_max_age());

        Ok(Self::new(Arc::new(transport), Arc::new(cache)))
    }

    /// Fetch requested data from the cache or over the network.
    ///
    /// Returns `None` if the upstream is unavailable (transport error or
    /// non-success status); never panics or surfaces an error to the route
    /// layer. A 200 response whose payload encodes a negative lookup is
    /// still returned (and cached) — detecting that shape is the caller's
    /// concern, see [`crate::discogs::is_negative_lookup`].
    ///
    /// Two concurrent misses for the same URL will both fetch; the
    /// miss-then-fetch-then-store sequence is not mutually exclusive.
    pub async fn fetch_with_cache(&self, url: &str) -> Option<Value> {
        if let Some(cached) = self.cache.get(url).await {
            return Some(cached);
        }

        match self.transport.get_json(url).await {
            Ok(payload) => {
                self.cache.insert(url, payload.clone()).await;
                Some(payload)
            }
            Err(err) => {
                tracing::warn!("upstream unavailable for {}: {}", url, err);
                None
            }
        }
    }

    /// Empty the response cache immediately.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
