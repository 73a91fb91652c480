//! Process-local cache for upstream API responses.
//!
//! Shelters the upstream endpoints and helps respect their rate limit with a
//! bounded, time-expiring cache in front of every network call. Capacity is
//! enforced with least-recently-used eviction at write time and expiry is
//! checked at read time; there is no background sweeper. Entries never
//! persist past process lifetime.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::Mutex;

/// Default maximum number of cached responses.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default maximum age of a cached response (5 minutes).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// A cached payload with its insertion timestamp.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, max_age: Duration) -> bool {
        self.inserted_at.elapsed() > max_age
    }
}

/// Entries plus recency bookkeeping, guarded as one unit.
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Keys ordered least- to most-recently used.
    recency: VecDeque<String>,
}

impl CacheState {
    /// Mark `url` as the most-recently-used key.
    fn touch(&mut self, url: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == url) {
            self.recency.remove(pos);
        }
        self.recency.push_back(url.to_string());
    }

    /// Drop `url` from the entries and the recency order.
    fn forget(&mut self, url: &str) {
        self.entries.remove(url);
        if let Some(pos) = self.recency.iter().position(|k| k == url) {
            self.recency.remove(pos);
        }
    }
}

/// Bounded, time-expiring cache of upstream JSON responses, keyed by
/// request URL.
///
/// An explicit, constructed component: callers hold it behind an `Arc` and
/// pass it to whatever composes network fetching on top (see
/// `cratedigger-client`). The cache itself never makes a network call.
pub struct ResponseCache {
    state: Mutex<CacheState>,
    capacity: usize,
    max_age: Duration,
}

impl ResponseCache {
    /// Create a cache bounded to `capacity` entries, each valid for
    /// `max_age` from insertion.
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState { entries: HashMap::new(), recency: VecDeque::new() }),
            capacity,
            max_age,
        }
    }

    /// Create a cache with the default bounds (100 entries, 5 minutes).
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_MAX_AGE)
    }

    /// Look up the cached payload for `url`.
    ///
    /// Returns `None` for a missing or expired entry; an expired entry is
    /// removed on the way out. A hit promotes the entry to
    /// most-recently-used.
    pub async fn get(&self, url: &str) -> Option<Value> {
        let mut state = self.state.lock().await;

        let hit = match state.entries.get(url) {
            Some(entry) if entry.is_expired(self.max_age) => None,
            Some(entry) => Some(entry.payload.clone()),
            None => {
                tracing::debug!("cache miss for {}", url);
                return None;
            }
        };

        match hit {
            Some(payload) => {
                state.touch(url);
                tracing::debug!("cache hit for {}", url);
                Some(payload)
            }
            None => {
                state.forget(url);
                tracing::debug!("cache entry for {} expired", url);
                None
            }
        }
    }

    /// Store `payload` under `url` with a fresh timestamp, overwriting any
    /// existing entry.
    ///
    /// When the entry count exceeds the capacity bound, least-recently-used
    /// entries are evicted until it no longer does.
    pub async fn insert(&self, url: &str, payload: Value) {
        let mut state = self.state.lock().await;
        state
            .entries
            .insert(url.to_string(), CacheEntry { payload, inserted_at: Instant::now() });
        state.touch(url);

        while state.entries.len() > self.capacity {
            match state.recency.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                    tracing::debug!("evicted least-recently-used entry {}", oldest);
                }
                None => break,
            }
        }
    }

    /// Empty the cache immediately.
    ///
    /// Guarantees no state leaks across independent operations; also usable
    /// as an operational reset.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.recency.clear();
    }

    /// Number of entries currently stored, expired or not.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
