//! In-memory cache storage.
//!
//! The storage backend used by tests and non-browser embedders. Entries are
//! keyed by request URL; vary-header matching is not modeled, so the
//! `ignore_vary` flag is trivially honored (URL identity), which is exactly
//! how the app treats navigation URLs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::platform::{Bucket, BucketStore, Request, Response};

/// One in-memory bucket.
#[derive(Default)]
pub struct MemoryBucket {
    entries: RwLock<HashMap<String, Response>>,
}

#[async_trait]
impl Bucket for MemoryBucket {
    async fn lookup(&self, request: &Request, _ignore_vary: bool) -> Result<Option<Response>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(request.url.as_str()).cloned())
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.insert(request.url.as_str().to_string(), response);
        Ok(())
    }
}

/// In-memory bucket registry.
#[derive(Default)]
pub struct MemoryBucketStore {
    buckets: RwLock<HashMap<String, Arc<MemoryBucket>>>,
}

impl MemoryBucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a bucket with this name currently exists.
    pub async fn contains(&self, name: &str) -> bool {
        self.buckets.read().await.contains_key(name)
    }
}

#[async_trait]
impl BucketStore for MemoryBucketStore {
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>, StorageError> {
        let mut buckets = self.buckets.write().await;
        let bucket = buckets.entry(name.to_string()).or_default();
        Ok(Arc::clone(bucket) as Arc<dyn Bucket>)
    }

    async fn names(&self) -> Result<Vec<String>, StorageError> {
        let mut names: Vec<String> = self.buckets.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let mut buckets = self.buckets.write().await;
        Ok(buckets.remove(name).is_some())
    }
}
