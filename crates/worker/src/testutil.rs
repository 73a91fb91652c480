//! Test doubles for the platform traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::FetchError;
use crate::platform::{FetchHandle, Request, Response};

/// Programmable network: routes responses by URL and records every fetch.
pub(crate) struct StubNet {
    routes: Mutex<HashMap<String, Result<Response, FetchError>>>,
    calls: Mutex<Vec<String>>,
}

impl StubNet {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self { routes: Mutex::new(HashMap::new()), calls: Mutex::new(Vec::new()) })
    }

    /// Serve `response` for `url`.
    pub(crate) async fn route(&self, url: &str, response: Response) {
        self.routes.lock().await.insert(url.to_string(), Ok(response));
    }

    /// Reject fetches of `url`.
    pub(crate) async fn fail(&self, url: &str) {
        self.routes
            .lock()
            .await
            .insert(url.to_string(), Err(FetchError("connection refused".into())));
    }

    pub(crate) async fn total_calls(&self) -> usize {
        self.calls.lock().await.len()
    }

    pub(crate) async fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().await.iter().filter(|seen| seen.as_str() == url).count()
    }
}

#[async_trait]
impl FetchHandle for StubNet {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let url = request.url.as_str().to_string();
        self.calls.lock().await.push(url.clone());

        match self.routes.lock().await.get(&url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(err)) => Err(err.clone()),
            None => Err(FetchError(format!("no route for {url}"))),
        }
    }
}
