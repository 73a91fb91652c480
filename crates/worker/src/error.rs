//! Error types for the cache orchestrator.

use crate::lifecycle::WorkerPhase;

/// A platform fetch that rejected (network unreachable, aborted, …).
#[derive(Debug, Clone, thiserror::Error)]
#[error("fetch failed: {0}")]
pub struct FetchError(pub String);

/// A cache-storage operation that failed at the platform layer.
#[derive(Debug, Clone, thiserror::Error)]
#[error("cache storage error: {0}")]
pub struct StorageError(pub String);

/// Errors surfaced by the cache worker.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// A lifecycle method was driven out of order.
    #[error("lifecycle phase error: expected {expected:?}, was {actual:?}")]
    Phase { expected: WorkerPhase, actual: WorkerPhase },

    /// Install failed; this worker version must be discarded.
    #[error("install failed: {0}")]
    Install(String),

    /// Cache storage failure outside a degradable path.
    #[error("cache storage error: {0}")]
    Storage(String),

    /// The offline fallback document is not in the statics bucket.
    #[error("offline document {0} is not cached")]
    OfflineUnavailable(String),

    /// Network failure that could not be served from cache.
    #[error(transparent)]
    Network(#[from] FetchError),
}
