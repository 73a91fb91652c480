//! Stale-while-revalidate: the pages policy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkerError;
use crate::platform::{Bucket, BucketStore, FetchHandle, Request, Response};
use crate::strategy::{CacheWrite, FetchStrategy, StrategyResponse};

/// Serve cached page responses immediately while refreshing the generation
/// bucket in the background.
///
/// A cached match is returned as-is with the network refresh continuing as
/// the pending cache write. Without a match the page waits on the network;
/// if that fails too, the offline document from the statics bucket is the
/// last resort. Only direct same-origin 200 responses are ever stored —
/// error pages and opaque third-party responses are discarded.
pub struct StaleWhileRevalidate {
    store: Arc<dyn BucketStore>,
    generation_bucket: String,
    statics_bucket: String,
    offline_url: String,
    net: Arc<dyn FetchHandle>,
}

impl StaleWhileRevalidate {
    pub fn new(
        store: Arc<dyn BucketStore>, generation_bucket: String, statics_bucket: String, offline_url: String,
        net: Arc<dyn FetchHandle>,
    ) -> Self {
        Self { store, generation_bucket, statics_bucket, offline_url, net }
    }

    /// Generation-bucket lookup that degrades to a miss on storage faults.
    async fn cached(&self, request: &Request) -> Option<Response> {
        match self.store.open(&self.generation_bucket).await {
            Ok(bucket) => match bucket.lookup(request, true).await {
                Ok(hit) => hit,
                Err(err) => {
                    tracing::warn!("page cache lookup failed for {}: {}", request.url, err);
                    None
                }
            },
            Err(err) => {
                tracing::warn!("failed to open bucket {}: {}", self.generation_bucket, err);
                None
            }
        }
    }

    /// The background refresh run after a cached match was already
    /// returned: fetch, validate, store. A failed fetch leaves the cached
    /// response authoritative until the next successful revalidation.
    fn revalidation(&self, request: Request) -> CacheWrite {
        let store = Arc::clone(&self.store);
        let net = Arc::clone(&self.net);
        let bucket = self.generation_bucket.clone();

        Box::pin(async move {
            match net.fetch(&request).await {
                Ok(response) => store_if_valid(&store, &bucket, &request, response).await,
                Err(err) => {
                    tracing::warn!("revalidation fetch failed for {}: {}", request.url, err);
                }
            }
        })
    }

    /// The deferred store of a response that is also being returned to the
    /// page. The caller hands in a clone; the page consumer keeps the
    /// original.
    fn deferred_store(&self, request: Request, response: Response) -> CacheWrite {
        let store = Arc::clone(&self.store);
        let bucket = self.generation_bucket.clone();

        Box::pin(async move { store_if_valid(&store, &bucket, &request, response).await })
    }

    /// The last-resort navigation fallback.
    async fn offline_document(&self) -> Result<Response, WorkerError> {
        let url = url::Url::parse(&self.offline_url)
            .map_err(|_| WorkerError::OfflineUnavailable(self.offline_url.clone()))?;
        let request = Request::navigate(url);

        let bucket = self
            .store
            .open(&self.statics_bucket)
            .await
            .map_err(|e| WorkerError::Storage(e.to_string()))?;

        match bucket.lookup(&request, true).await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(WorkerError::OfflineUnavailable(self.offline_url.clone())),
            Err(e) => Err(WorkerError::Storage(e.to_string())),
        }
    }
}

/// Validate and store a freshly fetched response, degrading on storage
/// faults. Invalid responses (non-200, redirected, opaque) are discarded.
async fn store_if_valid(store: &Arc<dyn BucketStore>, bucket_name: &str, request: &Request, response: Response) {
    if !response.is_cacheable() {
        tracing::debug!(
            "discarding non-cacheable response for {} (status {}, {:?})",
            request.url,
            response.status,
            response.kind
        );
        return;
    }

    match store.open(bucket_name).await {
        Ok(bucket) => {
            if let Err(err) = bucket.put(request, response).await {
                tracing::warn!("failed to store response for {}: {}", request.url, err);
            } else {
                tracing::debug!("cached page response for {}", request.url);
            }
        }
        Err(err) => {
            tracing::warn!("failed to open bucket {}: {}", bucket_name, err);
        }
    }
}

#[async_trait]
impl FetchStrategy for StaleWhileRevalidate {
    async fn respond(&self, request: &Request) -> Result<StrategyResponse, WorkerError> {
        if let Some(cached) = self.cached(request).await {
            tracing::debug!("serving cached page for {}, revalidating", request.url);
            return Ok(StrategyResponse {
                response: cached,
                wait_until: Some(self.revalidation(request.clone())),
            });
        }

        match self.net.fetch(request).await {
            Ok(response) => {
                // a body can be consumed once: the page gets the original,
                // the bucket a clone
                let pending = self.deferred_store(request.clone(), response.clone());
                Ok(StrategyResponse { response, wait_until: Some(pending) })
            }
            Err(err) => {
                tracing::warn!("network fetch failed for {}: {}; serving offline document", request.url, err);
                let offline = self.offline_document().await?;
                Ok(StrategyResponse::done(offline))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBucketStore;
    use crate::platform::ResponseKind;
    use crate::testutil::StubNet;
    use url::Url;

    const GENERATION: &str = "pages-2019-05-01T12:00:00.000Z";
    const STATICS: &str = "statics-v1";
    const OFFLINE: &str = "https://app.example/offline";

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn strategy(store: Arc<MemoryBucketStore>, net: Arc<StubNet>) -> StaleWhileRevalidate {
        StaleWhileRevalidate::new(store, GENERATION.into(), STATICS.into(), OFFLINE.into(), net)
    }

    async fn seed(store: &MemoryBucketStore, bucket: &str, url_str: &str, body: &str) {
        let bucket = store.open(bucket).await.unwrap();
        let req = Request::navigate(url(url_str));
        bucket
            .put(&req, Response::basic(req.url.clone(), 200, body.to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cached_match_returned_immediately_then_refreshed() {
        let store = Arc::new(MemoryBucketStore::new());
        seed(&store, GENERATION, "https://app.example/artist/1", "stale").await;

        let net = StubNet::new();
        net.route(
            "https://app.example/artist/1",
            Response::basic(url("https://app.example/artist/1"), 200, "fresh"),
        )
        .await;

        let swr = strategy(Arc::clone(&store), net.clone());
        let request = Request::navigate(url("https://app.example/artist/1"));
        let result = swr.respond(&request).await.unwrap();

        // the stale copy goes straight back to the page
        assert_eq!(result.response.body, "stale");

        // the refresh is still pending; driving it updates the bucket
        result.wait_until.unwrap().await;
        assert_eq!(net.calls_for("https://app.example/artist/1").await, 1);

        let bucket = store.open(GENERATION).await.unwrap();
        let refreshed = bucket.lookup(&request, true).await.unwrap().unwrap();
        assert_eq!(refreshed.body, "fresh");
    }

    #[tokio::test]
    async fn test_failed_revalidation_keeps_cached_copy() {
        let store = Arc::new(MemoryBucketStore::new());
        seed(&store, GENERATION, "https://app.example/artist/1", "stale").await;

        let net = StubNet::new();
        net.fail("https://app.example/artist/1").await;

        let swr = strategy(Arc::clone(&store), net.clone());
        let request = Request::navigate(url("https://app.example/artist/1"));
        let result = swr.respond(&request).await.unwrap();

        assert_eq!(result.response.body, "stale");
        result.wait_until.unwrap().await;

        let bucket = store.open(GENERATION).await.unwrap();
        let kept = bucket.lookup(&request, true).await.unwrap().unwrap();
        assert_eq!(kept.body, "stale");
    }

    #[tokio::test]
    async fn test_invalid_revalidation_response_is_discarded() {
        let store = Arc::new(MemoryBucketStore::new());
        seed(&store, GENERATION, "https://app.example/artist/1", "stale").await;

        let net = StubNet::new();
        net.route(
            "https://app.example/artist/1",
            Response::basic(url("https://app.example/artist/1"), 500, "server error page"),
        )
        .await;

        let swr = strategy(Arc::clone(&store), net.clone());
        let request = Request::navigate(url("https://app.example/artist/1"));
        let result = swr.respond(&request).await.unwrap();
        result.wait_until.unwrap().await;

        assert_eq!(result.response.body, "stale");
        let bucket = store.open(GENERATION).await.unwrap();
        assert_eq!(bucket.lookup(&request, true).await.unwrap().unwrap().body, "stale");
    }

    #[tokio::test]
    async fn test_miss_waits_for_network_and_stores_clone() {
        let store = Arc::new(MemoryBucketStore::new());
        let net = StubNet::new();
        net.route(
            "https://app.example/release/42",
            Response::basic(url("https://app.example/release/42"), 200, "release page"),
        )
        .await;

        let swr = strategy(Arc::clone(&store), net.clone());
        let request = Request::navigate(url("https://app.example/release/42"));
        let result = swr.respond(&request).await.unwrap();

        assert_eq!(result.response.body, "release page");

        result.wait_until.unwrap().await;
        let bucket = store.open(GENERATION).await.unwrap();
        assert_eq!(bucket.lookup(&request, true).await.unwrap().unwrap().body, "release page");
    }

    #[tokio::test]
    async fn test_opaque_response_returned_but_never_stored() {
        let store = Arc::new(MemoryBucketStore::new());
        let net = StubNet::new();
        net.route("https://other.example/page", Response::opaque(url("https://other.example/page"))).await;

        let swr = strategy(Arc::clone(&store), net.clone());
        let request = Request::get(url("https://other.example/page"));
        let result = swr.respond(&request).await.unwrap();

        assert_eq!(result.response.kind, ResponseKind::Opaque);
        result.wait_until.unwrap().await;

        let bucket = store.open(GENERATION).await.unwrap();
        assert!(bucket.lookup(&request, true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_network_failure_without_match_serves_offline_document() {
        let store = Arc::new(MemoryBucketStore::new());
        seed(&store, STATICS, OFFLINE, "you are offline").await;

        let net = StubNet::new();
        net.fail("https://app.example/artist/7").await;

        let swr = strategy(Arc::clone(&store), net.clone());
        let request = Request::navigate(url("https://app.example/artist/7"));
        let result = swr.respond(&request).await.unwrap();

        assert_eq!(result.response.body, "you are offline");
        assert!(result.wait_until.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_without_offline_document_errors() {
        let store = Arc::new(MemoryBucketStore::new());
        let net = StubNet::new();
        net.fail("https://app.example/artist/7").await;

        let swr = strategy(Arc::clone(&store), net.clone());
        let request = Request::navigate(url("https://app.example/artist/7"));
        let result = swr.respond(&request).await;

        assert!(matches!(result, Err(WorkerError::OfflineUnavailable(_))));
    }
}
