//! Fetch strategies.
//!
//! Each resource class gets its own freshness policy, dispatched through the
//! [`FetchStrategy`] trait:
//!
//! - [`CacheFallbackNetwork`] for immutable build assets
//! - [`StaleWhileRevalidate`] for navigable pages
//!
//! A strategy may hand back a pending cache write alongside the response;
//! the platform adapter must keep the worker alive until it completes (the
//! `waitUntil` analog).

pub mod cache_first;
pub mod stale_while_revalidate;

pub use cache_first::CacheFallbackNetwork;
pub use stale_while_revalidate::StaleWhileRevalidate;

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::WorkerError;
use crate::platform::{Request, Response};

/// A cache write still in flight after the response has been returned.
pub type CacheWrite = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A strategy's answer for one intercepted request.
pub struct StrategyResponse {
    /// What the page receives.
    pub response: Response,
    /// Pending cache write to drive to completion after responding; the
    /// worker must not be torn down until it finishes.
    pub wait_until: Option<CacheWrite>,
}

impl StrategyResponse {
    /// A response with no pending cache work.
    pub fn done(response: Response) -> Self {
        Self { response, wait_until: None }
    }
}

/// One freshness policy for one resource class.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Produce the response for `request`.
    ///
    /// Cache faults inside a strategy degrade (logged, treated as a miss or
    /// skipped write); an error return means the event itself cannot be
    /// satisfied and surfaces to the browser.
    async fn respond(&self, request: &Request) -> Result<StrategyResponse, WorkerError>;
}
