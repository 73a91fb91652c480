//! Platform model for the worker environment.
//!
//! A minimal rendering of the browser primitives the orchestrator touches:
//! requests, responses, named cache buckets, and the network. The traits at
//! the bottom are the seams a platform adapter implements; tests and
//! non-browser embedders use [`crate::memory::MemoryBucketStore`] instead.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::{FetchError, StorageError};

/// HTTP method of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Other,
}

/// Request mode, mirroring the platform's `Request.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// A top-level document navigation.
    Navigate,
    SameOrigin,
    Cors,
    NoCors,
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub mode: RequestMode,
}

impl Request {
    /// A plain GET (subresource) request.
    pub fn get(url: Url) -> Self {
        Self { url, method: Method::Get, mode: RequestMode::NoCors }
    }

    /// A top-level navigation request.
    pub fn navigate(url: Url) -> Self {
        Self { url, method: Method::Get, mode: RequestMode::Navigate }
    }
}

/// Response type, mirroring the platform's `Response.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response; status and body are visible.
    Basic,
    Cors,
    /// Cross-origin no-cors response; status and body are hidden.
    Opaque,
    Error,
}

/// A captured network response.
///
/// The body is `Bytes`, so clones are cheap; every code path that both
/// stores a response and hands it to the page stores a clone, mirroring the
/// platform rule that a body stream can be consumed at most once.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: Url,
    pub status: u16,
    pub kind: ResponseKind,
    pub redirected: bool,
    pub body: Bytes,
}

impl Response {
    /// A direct same-origin response.
    pub fn basic(url: Url, status: u16, body: impl Into<Bytes>) -> Self {
        Self { url, status, kind: ResponseKind::Basic, redirected: false, body: body.into() }
    }

    /// A cross-origin opaque response (status and body hidden).
    pub fn opaque(url: Url) -> Self {
        Self { url, status: 0, kind: ResponseKind::Opaque, redirected: false, body: Bytes::new() }
    }

    /// Whether this response may be written into a cache bucket: a direct
    /// (non-redirected) same-origin 200. Guards against caching error pages
    /// and opaque third-party responses as page content.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic && !self.redirected
    }
}

/// One named cache bucket of request/response pairs.
#[async_trait]
pub trait Bucket: Send + Sync {
    /// Look up a stored response for `request`.
    ///
    /// `ignore_vary` mirrors the platform match option: the app treats
    /// navigation URLs as the cache identity regardless of header variance.
    async fn lookup(&self, request: &Request, ignore_vary: bool) -> Result<Option<Response>, StorageError>;

    /// Store `response` keyed by the request URL, overwriting any previous
    /// entry.
    async fn put(&self, request: &Request, response: Response) -> Result<(), StorageError>;
}

/// The cache-storage registry: named buckets with open/enumerate/delete.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Open (creating if absent) the bucket called `name`.
    async fn open(&self, name: &str) -> Result<Arc<dyn Bucket>, StorageError>;

    /// Names of all existing buckets.
    async fn names(&self) -> Result<Vec<String>, StorageError>;

    /// Delete the bucket called `name`; returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;
}

/// The platform network.
#[async_trait]
pub trait FetchHandle: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}
