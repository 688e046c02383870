//! Cache key and entry types
//!
//! This module defines the core cache entry structures:
//! - `CacheKey`: normalized request identity (method + URL, GET at all call sites)
//! - `CacheEntry`: a captured response (status, headers, body bytes)

use bytes::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::SystemTime;

use crate::fetch::{Request, Response, ResponseKind};

/// Cache key identifying one cached response
///
/// Combines request method and absolute URL. Exact-key lookup only; no
/// normalization beyond what the request layer already did.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    pub method: String,
    pub url: String,
}

impl CacheKey {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }

    /// Derive the key for a request
    pub fn from_request(request: &Request) -> Self {
        Self {
            method: request.method.to_string(),
            url: request.url.clone(),
        }
    }

    /// Filesystem-safe digest of this key, used by the disk store
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// A cached response
///
/// Entries are immutable once written; a `put` under the same key replaces
/// the prior value wholesale. Entries live until their namespace is deleted.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    /// When this entry was written
    pub stored_at: SystemTime,
}

impl CacheEntry {
    pub fn new(status: StatusCode, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: SystemTime::now(),
        }
    }

    /// Capture a response for storage
    ///
    /// Call sites are responsible for the qualifying check
    /// (`Response::qualifies_for_cache`); the store accepts any entry
    /// handed to it.
    pub fn from_response(response: &Response) -> Self {
        Self::new(
            response.status,
            response.headers.clone(),
            response.body.clone(),
        )
    }

    /// Rehydrate a response to hand back to the caller
    ///
    /// Cached entries are always basic: opaque responses never qualify
    /// for storage in the first place.
    pub fn to_response(&self) -> Response {
        Response::new(
            self.status,
            self.headers.clone(),
            self.body.clone(),
            ResponseKind::Basic,
        )
    }

    /// Approximate size of this entry in bytes (body plus header overhead)
    pub fn size_bytes(&self) -> usize {
        let header_bytes: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.len() + value.len())
            .sum();
        self.body.len() + header_bytes
    }
}
