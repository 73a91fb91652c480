//! Service-worker cache orchestration for cratedigger.
//!
//! The browser drives a service worker through three integration points —
//! install, activate, and fetch. This crate implements that orchestration as
//! a pure component over platform-capability traits; a thin adapter in the
//! embedding application binds the real worker events and cache storage to
//! [`CacheWorker`].
//!
//! Two cache partitions exist by design:
//!
//! - a **statics** bucket with a stable name across worker versions,
//!   populated exactly once at install time from a build-injected asset
//!   manifest and never written to afterwards;
//! - a **generation** bucket named after the build timestamp, accumulating
//!   page responses opportunistically and revalidating them on every
//!   navigation (stale-while-revalidate).
//!
//! Superseded generation buckets are garbage-collected during activation,
//! the only point at which buckets are ever pruned.

pub mod classify;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod platform;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::RequestClass;
pub use config::{WorkerConfig, WorkerConfigError};
pub use error::{FetchError, StorageError, WorkerError};
pub use lifecycle::{CacheWorker, FetchDecision, WorkerPhase};
pub use memory::MemoryBucketStore;
pub use platform::{Bucket, BucketStore, FetchHandle, Method, Request, RequestMode, Response, ResponseKind};
pub use strategy::{CacheWrite, FetchStrategy, StrategyResponse};
