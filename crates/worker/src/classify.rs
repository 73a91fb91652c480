//! Request classification.
//!
//! One total classification decides which strategy (if any) handles an
//! intercepted request. Suffix matching wins over everything else, then any
//! remaining GET is page traffic unless its host is a denylisted image CDN;
//! navigations are GETs, so the GET rule subsumes the navigation mode.

use url::Url;

use crate::config::WorkerConfig;
use crate::platform::{Method, Request};

/// Suffixes routed to the statics bucket: stylesheets, scripts, vector
/// images, animated images.
const STATIC_SUFFIXES: [&str; 4] = [".css", ".js", ".svg", ".gif"];

/// Which strategy handles an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Immutable build asset: cache-fallback-network against the statics
    /// bucket.
    StaticAsset,
    /// Navigable content: stale-while-revalidate against the generation
    /// bucket.
    Page,
    /// Not intercepted; default browser networking applies.
    Bypass,
}

impl RequestClass {
    /// Classify `request` under the worker's configuration.
    pub fn classify(request: &Request, config: &WorkerConfig) -> Self {
        let path = request.url.path();
        if STATIC_SUFFIXES.iter().any(|suffix| path.ends_with(suffix)) {
            return Self::StaticAsset;
        }

        if request.method == Method::Get && !is_denied_origin(&request.url, config) {
            return Self::Page;
        }

        Self::Bypass
    }
}

fn is_denied_origin(url: &Url, config: &WorkerConfig) -> bool {
    url.host_str()
        .is_some_and(|host| config.image_origin_denylist.iter().any(|denied| denied == host))
}
