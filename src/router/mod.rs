// Router module - classifies each intercepted request into exactly one route

use crate::fetch::{origin_of, path_of, Request, RequestMode};
use http::Method;

/// Route classification for one request
///
/// Computed per request and discarded after dispatch; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Not intercepted: pass straight through to the network, uncached
    Bypass,
    /// Top-level document load, served network-first
    Navigation,
    /// Local static asset, served cache-first
    StaticAsset,
    /// Everything else, served network-with-fallback
    Other,
}

/// Maps an inbound request to exactly one fetch strategy
///
/// Rules are ordered and the first match wins. Navigation detection takes
/// priority over suffix matching so an extensionless route (e.g. `/`) still
/// classifies as navigation.
pub struct RouteClassifier {
    origin: String,
    static_suffixes: Vec<String>,
}

impl RouteClassifier {
    pub fn new(origin: impl Into<String>, static_suffixes: Vec<String>) -> Self {
        Self {
            origin: origin.into(),
            static_suffixes,
        }
    }

    pub fn classify(&self, request: &Request) -> RouteDecision {
        // 1. Only GET requests are interceptable
        if request.method != Method::GET {
            return RouteDecision::Bypass;
        }

        // 2. Never touch third-party/CDN/backend traffic
        if let Some(request_origin) = origin_of(&request.url) {
            if request_origin != self.origin {
                return RouteDecision::Bypass;
            }
        }

        // 3. Navigation before suffix matching
        if request.mode == RequestMode::Navigate {
            return RouteDecision::Navigation;
        }

        // 4. Fixed static-asset suffix set
        let path = path_of(&request.url);
        if self
            .static_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
        {
            return RouteDecision::StaticAsset;
        }

        // 5. Uncategorized
        RouteDecision::Other
    }
}
