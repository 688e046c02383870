// Configuration module
//
// YAML-backed worker configuration: app origin, cache namespace prefix and
// version tag, precache manifest, static-asset route suffixes, and store
// backend selection.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::WorkerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// The app's own origin (`scheme://authority`); requests from any other
    /// origin bypass the worker entirely
    pub origin: String,
    #[serde(default)]
    pub cache: NamespaceConfig,
    /// Same-origin resource paths populated at install time (all-or-nothing)
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl WorkerConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, WorkerError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WorkerError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, WorkerError> {
        let config: WorkerConfig =
            serde_yaml::from_str(yaml).map_err(|e| WorkerError::Config(e.to_string()))?;
        config.validate().map_err(WorkerError::Config)?;
        Ok(config)
    }

    /// The current cache namespace (`prefix-version`)
    pub fn namespace(&self) -> String {
        self.cache.namespace()
    }

    /// Origin without a trailing slash, the form URLs are resolved against
    pub fn normalized_origin(&self) -> &str {
        self.origin.trim_end_matches('/')
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.origin.starts_with("http://") && !self.origin.starts_with("https://") {
            return Err(format!(
                "origin must be an absolute http(s) URL, got '{}'",
                self.origin
            ));
        }
        if self.normalized_origin().len() <= self.origin.find("://").unwrap_or(0) + 3 {
            return Err("origin is missing an authority".to_string());
        }
        if self.precache.is_empty() {
            return Err("precache manifest cannot be empty".to_string());
        }
        self.cache.validate()?;
        self.routes.validate()?;
        self.store.validate()
    }
}

/// Cache namespace identity: a fixed prefix plus a version tag
///
/// Bumping the version tag is the only supported upgrade mechanism; there
/// is no in-place migration of cached entries between versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            version: default_version(),
        }
    }
}

impl NamespaceConfig {
    pub fn namespace(&self) -> String {
        format!("{}-{}", self.prefix, self.version)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [("prefix", &self.prefix), ("version", &self.version)] {
            if value.is_empty() {
                return Err(format!("cache.{} cannot be empty", field));
            }
            // Namespaces become directory names in the disk store
            if !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            {
                return Err(format!(
                    "cache.{} contains characters unsafe for a namespace: '{}'",
                    field, value
                ));
            }
        }
        Ok(())
    }
}

fn default_prefix() -> String {
    "fukurou".to_string()
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_precache() -> Vec<String> {
    [
        "./",
        "./index.html",
        "./style.css",
        "./script.js",
        "./config.js",
        "./manifest.json",
        "./sw.js",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// URL path suffixes routed to the cache-first strategy
    #[serde(default = "default_static_suffixes")]
    pub static_suffixes: Vec<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            static_suffixes: default_static_suffixes(),
        }
    }
}

impl RouteConfig {
    pub fn validate(&self) -> Result<(), String> {
        for suffix in &self.static_suffixes {
            if !suffix.starts_with('.') || suffix.len() < 2 {
                return Err(format!(
                    "routes.static_suffixes entries must be extensions like '.css', got '{}'",
                    suffix
                ));
            }
        }
        Ok(())
    }
}

fn default_static_suffixes() -> Vec<String> {
    [
        ".css", ".js", ".json", ".png", ".jpg", ".jpeg", ".svg", ".webp", ".ico",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Disk,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub memory: MemoryStoreConfig,
    #[serde(default)]
    pub disk: DiskStoreConfig,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.memory.validate()?;
        if self.backend == StoreBackend::Disk {
            self.disk.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStoreConfig {
    #[serde(default = "default_max_item_size_mb")]
    pub max_item_size_mb: u64,
    #[serde(default = "default_max_cache_size_mb")]
    pub max_cache_size_mb: u64,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_item_size_mb: default_max_item_size_mb(),
            max_cache_size_mb: default_max_cache_size_mb(),
        }
    }
}

fn default_max_item_size_mb() -> u64 {
    10 // 10MB
}

fn default_max_cache_size_mb() -> u64 {
    1024 // 1GB
}

impl MemoryStoreConfig {
    /// Convert max_item_size_mb to bytes
    pub fn max_item_size_bytes(&self) -> u64 {
        self.max_item_size_mb * 1024 * 1024
    }

    /// Convert max_cache_size_mb to bytes
    pub fn max_cache_size_bytes(&self) -> u64 {
        self.max_cache_size_mb * 1024 * 1024
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_item_size_mb > self.max_cache_size_mb {
            return Err(format!(
                "max_item_size_mb ({}) cannot be greater than max_cache_size_mb ({})",
                self.max_item_size_mb, self.max_cache_size_mb
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskStoreConfig {
    #[serde(default = "default_disk_dir")]
    pub dir: String,
}

impl Default for DiskStoreConfig {
    fn default() -> Self {
        Self {
            dir: default_disk_dir(),
        }
    }
}

fn default_disk_dir() -> String {
    "/var/cache/fukurou".to_string()
}

impl DiskStoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.dir.is_empty() {
            return Err("store.disk.dir cannot be empty when the disk backend is selected"
                .to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_parse_minimal_config_from_yaml() {
        let yaml = r#"
origin: https://app.example
"#;
        let config = WorkerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.origin, "https://app.example");
        assert_eq!(config.namespace(), "fukurou-v1");
    }

    #[test]
    fn test_default_precache_matches_app_manifest() {
        let config = WorkerConfig::from_yaml("origin: https://app.example").unwrap();
        assert_eq!(
            config.precache,
            vec![
                "./",
                "./index.html",
                "./style.css",
                "./script.js",
                "./config.js",
                "./manifest.json",
                "./sw.js",
            ]
        );
    }

    #[test]
    fn test_default_static_suffixes_are_the_fixed_set() {
        let config = WorkerConfig::from_yaml("origin: https://app.example").unwrap();
        assert_eq!(
            config.routes.static_suffixes,
            vec![".css", ".js", ".json", ".png", ".jpg", ".jpeg", ".svg", ".webp", ".ico"]
        );
    }

    #[test]
    fn test_namespace_is_prefix_dash_version() {
        let yaml = r#"
origin: https://app.example
cache:
  prefix: perakam
  version: v3
"#;
        let config = WorkerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.namespace(), "perakam-v3");
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let result = WorkerConfig::from_yaml("origin: ftp://app.example");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_precache() {
        let yaml = r#"
origin: https://app.example
precache: []
"#;
        assert!(WorkerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_path_unsafe_version_tag() {
        let yaml = r#"
origin: https://app.example
cache:
  version: "v1/../../etc"
"#;
        assert!(WorkerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_suffix_without_leading_dot() {
        let yaml = r#"
origin: https://app.example
routes:
  static_suffixes: ["css"]
"#;
        assert!(WorkerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_normalized_origin_strips_trailing_slash() {
        let config = WorkerConfig::from_yaml("origin: https://app.example/").unwrap();
        assert_eq!(config.normalized_origin(), "https://app.example");
    }

    #[test]
    fn test_store_defaults_to_memory_backend() {
        let config = WorkerConfig::from_yaml("origin: https://app.example").unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.memory.max_item_size_mb, 10);
        assert_eq!(config.store.memory.max_cache_size_mb, 1024);
        assert_eq!(config.store.disk.dir, "/var/cache/fukurou");
    }

    #[test]
    fn test_can_select_disk_backend() {
        let yaml = r#"
origin: https://app.example
store:
  backend: disk
  disk:
    dir: /tmp/fukurou-cache
"#;
        let config = WorkerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Disk);
        assert_eq!(config.store.disk.dir, "/tmp/fukurou-cache");
    }

    #[test]
    fn test_rejects_disk_backend_with_empty_dir() {
        let yaml = r#"
origin: https://app.example
store:
  backend: disk
  disk:
    dir: ""
"#;
        assert!(WorkerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_item_size_over_cache_size() {
        let yaml = r#"
origin: https://app.example
store:
  memory:
    max_item_size_mb: 2048
    max_cache_size_mb: 1024
"#;
        assert!(WorkerConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_memory_size_helpers_convert_to_bytes() {
        let config = MemoryStoreConfig::default();
        assert_eq!(config.max_item_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.max_cache_size_bytes(), 1024 * 1024 * 1024);
    }
}
