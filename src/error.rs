// Error types module

use std::fmt;

/// Centralized error type for the cache worker
///
/// Categorizes errors into 4 main types for better debugging,
/// monitoring, and appropriate fallback handling.
#[derive(Debug, Clone)]
pub enum WorkerError {
    /// Configuration errors (invalid YAML, bad origin, empty manifest, etc.)
    Config(String),

    /// Network errors (fetch failed, offline, total fallback exhaustion)
    Network(String),

    /// Cache store errors (disk I/O, serialization, storage full)
    Cache(String),

    /// Internal worker errors (invalid lifecycle transition, unexpected errors)
    Internal(String),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::Config(msg) => write!(f, "Configuration error: {}", msg),
            WorkerError::Network(msg) => write!(f, "Network error: {}", msg),
            WorkerError::Cache(msg) => write!(f, "Cache error: {}", msg),
            WorkerError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for WorkerError {}

impl From<crate::cache::CacheError> for WorkerError {
    fn from(err: crate::cache::CacheError) -> Self {
        WorkerError::Cache(err.to_string())
    }
}

impl From<crate::fetch::FetchError> for WorkerError {
    fn from(err: crate::fetch::FetchError) -> Self {
        WorkerError::Network(err.to_string())
    }
}
