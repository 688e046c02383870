//! Request/response model and the network boundary
//!
//! This module defines the types that cross the fetch boundary:
//! - `Request`: an intercepted outgoing request (method + URL + mode)
//! - `Response`: a captured response (status, headers, body bytes)
//! - `Fetcher`: the trait behind which the actual network lives
//!
//! The fetch strategies and lifecycle controller only ever talk to the
//! network through the `Fetcher` trait, so tests can substitute scripted
//! fetchers with call-count instrumentation.

pub mod client;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};

/// How a request was issued by the client
///
/// Navigation requests are top-level document loads. They are detected by
/// mode rather than URL suffix so that extensionless routes (e.g. `/`)
/// still classify as navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level document load (HTML navigation)
    Navigate,
    /// Subresource fetch (stylesheet, script, image, data, ...)
    NoCors,
}

/// An intercepted outgoing request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Absolute URL (`scheme://authority/path`); relative URLs are resolved
    /// against the app origin before a request is constructed.
    pub url: String,
    pub mode: RequestMode,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>, mode: RequestMode) -> Self {
        Self {
            method,
            url: url.into(),
            mode,
        }
    }

    /// A plain GET subresource request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url, RequestMode::NoCors)
    }

    /// A top-level navigation request
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url, RequestMode::Navigate)
    }

    /// The origin (`scheme://authority`) of this request's URL, if absolute
    pub fn origin(&self) -> Option<&str> {
        origin_of(&self.url)
    }
}

/// Response classification mirroring the fetch "basic"/"opaque" distinction
///
/// Only Basic (same-origin, inspectable) responses qualify for caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response whose status/headers/body are inspectable
    Basic,
    /// Cross-origin response; contents must not be cached
    Opaque,
}

/// A captured response returned to the caller and possibly cached
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    pub kind: ResponseKind,
}

impl Response {
    pub fn new(
        status: StatusCode,
        headers: Vec<(String, String)>,
        body: Bytes,
        kind: ResponseKind,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            kind,
        }
    }

    /// Whether this response may be written to the cache store:
    /// successful (2xx) and basic (same-origin, non-opaque)
    pub fn qualifies_for_cache(&self) -> bool {
        self.status.is_success() && self.kind == ResponseKind::Basic
    }
}

/// Fetch error types
///
/// These are expected, recoverable conditions: they drive the strategy
/// fallback chains and are never propagated as a crash.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// The network is unreachable (offline)
    NetworkUnavailable,
    /// The request was attempted but failed (DNS, reset, malformed, ...)
    RequestFailed(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::NetworkUnavailable => write!(f, "network unavailable"),
            FetchError::RequestFailed(msg) => write!(f, "request failed: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// The network boundary
///
/// The only suspension point at which the engine touches the network.
/// Implementations: `HttpFetcher` (reqwest) for real traffic, scripted
/// mocks in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Extract the origin (`scheme://authority`) from an absolute URL
///
/// Returns None for relative URLs, which are treated as same-origin by
/// the classifier.
pub fn origin_of(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    let authority_end = rest
        .find(&['/', '?', '#'][..])
        .map(|i| scheme_end + 3 + i)
        .unwrap_or(url.len());
    Some(&url[..authority_end])
}

/// Extract the path component of a URL, without query or fragment
pub fn path_of(url: &str) -> &str {
    let after_origin = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find(&['/', '?', '#'][..]) {
                // A query or fragment directly after the authority means
                // the path is the bare root
                Some(i) if rest[i..].starts_with('/') => &url[scheme_end + 3 + i..],
                Some(_) => "/",
                None => "/",
            }
        }
        None => url,
    };
    let end = after_origin
        .find(&['?', '#'][..])
        .unwrap_or(after_origin.len());
    &after_origin[..end]
}

/// Resolve a manifest-style relative path (`./index.html`, `./`) against
/// an origin into an absolute URL
pub fn resolve_url(origin: &str, path: &str) -> String {
    let origin = origin.trim_end_matches('/');
    let path = path.trim_start_matches('.');
    if path.starts_with('/') {
        format!("{}{}", origin, path)
    } else {
        format!("{}/{}", origin, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_of_absolute_url() {
        assert_eq!(
            origin_of("https://app.example/index.html"),
            Some("https://app.example")
        );
        assert_eq!(
            origin_of("https://app.example:8443/a/b?q=1"),
            Some("https://app.example:8443")
        );
        assert_eq!(origin_of("https://app.example"), Some("https://app.example"));
    }

    #[test]
    fn test_origin_of_relative_url_is_none() {
        assert_eq!(origin_of("/index.html"), None);
        assert_eq!(origin_of("./style.css"), None);
    }

    #[test]
    fn test_path_of_strips_origin_query_and_fragment() {
        assert_eq!(path_of("https://app.example/a/b.css?v=3"), "/a/b.css");
        assert_eq!(path_of("https://app.example/a/b.css#frag"), "/a/b.css");
        assert_eq!(path_of("https://app.example"), "/");
        assert_eq!(path_of("https://app.example?q=1"), "/");
        assert_eq!(path_of("https://app.example#frag"), "/");
        assert_eq!(path_of("/local.js?x"), "/local.js");
    }

    #[test]
    fn test_resolve_url_handles_manifest_forms() {
        assert_eq!(resolve_url("https://app.example", "./"), "https://app.example/");
        assert_eq!(
            resolve_url("https://app.example", "./index.html"),
            "https://app.example/index.html"
        );
        assert_eq!(
            resolve_url("https://app.example/", "/manifest.json"),
            "https://app.example/manifest.json"
        );
        assert_eq!(
            resolve_url("https://app.example", "sw.js"),
            "https://app.example/sw.js"
        );
    }

    #[test]
    fn test_request_constructors() {
        let nav = Request::navigate("https://app.example/");
        assert_eq!(nav.method, Method::GET);
        assert_eq!(nav.mode, RequestMode::Navigate);

        let sub = Request::get("https://app.example/style.css");
        assert_eq!(sub.mode, RequestMode::NoCors);
        assert_eq!(sub.origin(), Some("https://app.example"));
    }

    #[test]
    fn test_response_qualifies_for_cache_requires_success_and_basic() {
        let ok = Response::new(
            StatusCode::OK,
            vec![],
            Bytes::from("body"),
            ResponseKind::Basic,
        );
        assert!(ok.qualifies_for_cache());

        let not_found = Response::new(
            StatusCode::NOT_FOUND,
            vec![],
            Bytes::new(),
            ResponseKind::Basic,
        );
        assert!(!not_found.qualifies_for_cache());

        let opaque = Response::new(
            StatusCode::OK,
            vec![],
            Bytes::from("body"),
            ResponseKind::Opaque,
        );
        assert!(!opaque.qualifies_for_cache());
    }
}
