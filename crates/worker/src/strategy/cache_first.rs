//! Cache-fallback-network: the statics policy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkerError;
use crate::platform::{Bucket, BucketStore, FetchHandle, Request, Response};
use crate::strategy::{FetchStrategy, StrategyResponse};

/// Serve immutable build assets from the statics bucket, falling back to
/// the network for anything not installed.
///
/// The network fallback is never written back: the statics bucket is
/// populated only at install time, its contents being content-addressed
/// build artifacts.
pub struct CacheFallbackNetwork {
    store: Arc<dyn BucketStore>,
    bucket: String,
    net: Arc<dyn FetchHandle>,
}

impl CacheFallbackNetwork {
    pub fn new(store: Arc<dyn BucketStore>, bucket: String, net: Arc<dyn FetchHandle>) -> Self {
        Self { store, bucket, net }
    }

    /// Bucket lookup that degrades to a miss on storage faults.
    async fn cached(&self, request: &Request) -> Option<Response> {
        match self.store.open(&self.bucket).await {
            Ok(bucket) => match bucket.lookup(request, true).await {
                Ok(hit) => hit,
                Err(err) => {
                    tracing::warn!("statics lookup failed for {}: {}", request.url, err);
                    None
                }
            },
            Err(err) => {
                tracing::warn!("failed to open statics bucket {}: {}", self.bucket, err);
                None
            }
        }
    }
}

#[async_trait]
impl FetchStrategy for CacheFallbackNetwork {
    async fn respond(&self, request: &Request) -> Result<StrategyResponse, WorkerError> {
        if let Some(response) = self.cached(request).await {
            tracing::debug!("statics cache hit for {}", request.url);
            return Ok(StrategyResponse::done(response));
        }

        // no offline fallback for assets: a network failure here surfaces
        let response = self.net.fetch(request).await?;
        tracing::debug!("statics cache miss for {}, served from network", request.url);
        Ok(StrategyResponse::done(response))
    }
}
