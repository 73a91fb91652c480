//! Worker lifecycle: install, activate, fetch routing.
//!
//! [`CacheWorker`] is the pure orchestration component behind the three
//! platform events. The phase is explicit and transitions are checked, so a
//! platform adapter driving events out of order gets an error instead of a
//! silently corrupted cache.

use std::sync::Arc;

use tokio::sync::Mutex;
use url::Url;

use crate::classify::RequestClass;
use crate::config::{WorkerConfig, WorkerConfigError};
use crate::error::WorkerError;
use crate::platform::{Bucket, BucketStore, FetchHandle, Request, Response};
use crate::strategy::{CacheFallbackNetwork, FetchStrategy, StaleWhileRevalidate, StrategyResponse};

/// Where a worker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Script evaluated, nothing installed yet.
    New,
    /// Statics durably stored; waiting to take over.
    Installed,
    /// Intercepting traffic.
    Active,
}

/// The orchestrator's answer for one fetch event.
pub enum FetchDecision {
    /// Answer the event with this response (and possibly pending cache
    /// work).
    Respond(StrategyResponse),
    /// Do not intercept; default browser networking applies.
    PassThrough,
}

/// The service-worker cache orchestrator.
pub struct CacheWorker {
    store: Arc<dyn BucketStore>,
    net: Arc<dyn FetchHandle>,
    config: WorkerConfig,
    phase: Mutex<WorkerPhase>,
    statics: CacheFallbackNetwork,
    pages: StaleWhileRevalidate,
}

impl CacheWorker {
    /// Build a worker over the platform capabilities and a validated
    /// configuration.
    pub fn new(
        store: Arc<dyn BucketStore>, net: Arc<dyn FetchHandle>, config: WorkerConfig,
    ) -> Result<Self, WorkerConfigError> {
        config.validate()?;

        let statics =
            CacheFallbackNetwork::new(Arc::clone(&store), config.statics_bucket.clone(), Arc::clone(&net));
        let pages = StaleWhileRevalidate::new(
            Arc::clone(&store),
            config.generation_bucket.clone(),
            config.statics_bucket.clone(),
            config.offline_url.clone(),
            Arc::clone(&net),
        );

        Ok(Self { store, net, config, phase: Mutex::new(WorkerPhase::New), statics, pages })
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> WorkerPhase {
        *self.phase.lock().await
    }

    /// Install: fetch and store the complete asset manifest.
    ///
    /// Every manifest URL is fetched and checked before anything is
    /// written, so a failed asset cannot leave a partially updated statics
    /// set. Any failure fails the install; the platform then discards this
    /// worker version and keeps the previous one active.
    pub async fn install(&self) -> Result<(), WorkerError> {
        self.expect_phase(WorkerPhase::New).await?;

        tracing::info!(
            "installing: caching {} static assets into {}",
            self.config.manifest.len(),
            self.config.statics_bucket
        );

        self.cache_manifest()
            .await
            .inspect_err(|err| tracing::error!("{err}; discarding this worker version"))?;

        self.set_phase(WorkerPhase::Installed).await;
        tracing::info!("install complete");
        Ok(())
    }

    /// Fetch every manifest asset, then store them all.
    async fn cache_manifest(&self) -> Result<(), WorkerError> {
        let mut fetched = Vec::with_capacity(self.config.manifest.len());
        for asset in &self.config.manifest {
            let url = Url::parse(asset).map_err(|e| WorkerError::Install(format!("invalid asset URL {asset}: {e}")))?;
            let request = Request::get(url);

            let response = self
                .net
                .fetch(&request)
                .await
                .map_err(|e| WorkerError::Install(format!("failed to fetch {asset}: {e}")))?;
            if response.status != 200 {
                return Err(WorkerError::Install(format!("asset {asset} returned status {}", response.status)));
            }

            fetched.push((request, response));
        }

        let bucket = self
            .store
            .open(&self.config.statics_bucket)
            .await
            .map_err(|e| WorkerError::Install(e.to_string()))?;
        for (request, response) in fetched {
            bucket
                .put(&request, response)
                .await
                .map_err(|e| WorkerError::Install(e.to_string()))?;
        }

        Ok(())
    }

    /// Activate: delete every bucket outside the current whitelist.
    ///
    /// The whitelist is {generation bucket, statics bucket}; anything else
    /// belongs to a superseded worker version. This is the only point at
    /// which buckets are pruned.
    pub async fn activate(&self) -> Result<(), WorkerError> {
        self.expect_phase(WorkerPhase::Installed).await?;

        let keep = [self.config.generation_bucket.as_str(), self.config.statics_bucket.as_str()];
        let names = self.store.names().await.map_err(|e| WorkerError::Storage(e.to_string()))?;

        for name in names {
            if !keep.contains(&name.as_str()) {
                tracing::info!("removing stale cache bucket {}", name);
                self.store
                    .delete(&name)
                    .await
                    .map_err(|e| WorkerError::Storage(e.to_string()))?;
            }
        }

        self.set_phase(WorkerPhase::Active).await;
        tracing::info!("activated generation {}", self.config.generation_bucket);
        Ok(())
    }

    /// Route one intercepted fetch event to its strategy.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchDecision, WorkerError> {
        self.expect_phase(WorkerPhase::Active).await?;

        let strategy: &dyn FetchStrategy = match RequestClass::classify(request, &self.config) {
            RequestClass::StaticAsset => &self.statics,
            RequestClass::Page => &self.pages,
            RequestClass::Bypass => return Ok(FetchDecision::PassThrough),
        };

        Ok(FetchDecision::Respond(strategy.respond(request).await?))
    }

    /// Convenience wrapper for adapters that treat pass-through as "no
    /// response from the worker".
    pub async fn respond_to(&self, request: &Request) -> Result<Option<Response>, WorkerError> {
        match self.handle_fetch(request).await? {
            FetchDecision::Respond(answer) => {
                if let Some(pending) = answer.wait_until {
                    pending.await;
                }
                Ok(Some(answer.response))
            }
            FetchDecision::PassThrough => Ok(None),
        }
    }

    async fn expect_phase(&self, expected: WorkerPhase) -> Result<(), WorkerError> {
        let actual = *self.phase.lock().await;
        if actual == expected { Ok(()) } else { Err(WorkerError::Phase { expected, actual }) }
    }

    async fn set_phase(&self, phase: WorkerPhase) {
        *self.phase.lock().await = phase;
    }
}
