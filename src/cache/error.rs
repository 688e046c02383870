//! Cache error types

/// Cache error types
#[derive(Debug)]
pub enum CacheError {
    /// Cache storage is full (entry exceeds the per-item limit)
    StorageFull,
    /// I/O error (disk store)
    IoError(std::io::Error),
    /// Serialization/deserialization error (disk metadata)
    SerializationError(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::StorageFull => write!(f, "Cache storage is full"),
            CacheError::IoError(err) => write!(f, "I/O error: {}", err),
            CacheError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::IoError(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_implements_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<CacheError>();
    }

    #[test]
    fn test_cache_error_implements_display() {
        let err = CacheError::StorageFull;
        assert!(format!("{}", err).contains("full"));

        let err = CacheError::SerializationError("bad meta".to_string());
        assert!(format!("{}", err).contains("bad meta"));
    }

    #[test]
    fn test_cache_error_converts_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let cache_err: CacheError = io_err.into();
        assert!(matches!(cache_err, CacheError::IoError(_)));
    }

    #[test]
    fn test_cache_error_converts_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{nope}").unwrap_err();
        let cache_err: CacheError = serde_err.into();
        assert!(matches!(cache_err, CacheError::SerializationError(_)));
    }
}
