//! Lifecycle controller
//!
//! Governs cache versioning: precache population at install, stale-namespace
//! eviction and client takeover at activate, and per-request dispatch to the
//! fetch strategies. The controller is constructed explicitly with its
//! configuration and collaborators; the current namespace identifier is
//! controller-owned state, not a module-level constant.
//!
//! The host runtime registers the controller once through the `WorkerEvents`
//! trait and awaits each handler before finalizing the corresponding
//! lifecycle transition or response.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::fetch::{resolve_url, Fetcher, Request, Response};
use crate::router::{RouteClassifier, RouteDecision};
use crate::strategy::StrategyEngine;

/// Worker lifecycle states
///
/// Installing → Waiting → Active; a failed install or a superseding version
/// leaves a worker Redundant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Precache population in progress
    Installing,
    /// Installed; activation requested immediately (no waiting hold)
    Waiting,
    /// Controlling clients and serving fetches
    Active,
    /// Install failed or a newer version took over
    Redundant,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Installing => write!(f, "installing"),
            WorkerState::Waiting => write!(f, "waiting"),
            WorkerState::Active => write!(f, "active"),
            WorkerState::Redundant => write!(f, "redundant"),
        }
    }
}

/// Host-provided handle over the open client connections
///
/// `claim` takes control of all open clients immediately instead of waiting
/// for their next navigation.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn claim(&self) -> Result<(), WorkerError>;
}

/// No-op registry for hosts without a client surface (tests, cache warmer)
pub struct NullClients;

#[async_trait]
impl ClientRegistry for NullClients {
    async fn claim(&self) -> Result<(), WorkerError> {
        Ok(())
    }
}

/// The three handlers a hosting runtime drives
///
/// Each returns a future the host awaits before finalizing the lifecycle
/// transition (install/activate) or the response (fetch).
#[async_trait]
pub trait WorkerEvents: Send + Sync {
    async fn on_install(&self) -> Result<(), WorkerError>;
    async fn on_activate(&self) -> Result<(), WorkerError>;
    async fn on_fetch(&self, request: &Request) -> Result<Response, WorkerError>;
}

pub struct LifecycleController {
    config: WorkerConfig,
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    clients: Arc<dyn ClientRegistry>,
    classifier: RouteClassifier,
    engine: StrategyEngine,
    /// Namespace this controller installs into and serves from
    namespace: String,
    state: RwLock<WorkerState>,
}

impl LifecycleController {
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        clients: Arc<dyn ClientRegistry>,
    ) -> Self {
        let origin = config.normalized_origin().to_string();
        let classifier =
            RouteClassifier::new(origin.clone(), config.routes.static_suffixes.clone());
        let engine = StrategyEngine::new(store.clone(), fetcher.clone(), origin);
        let namespace = config.namespace();

        Self {
            config,
            store,
            fetcher,
            clients,
            classifier,
            engine,
            namespace,
            state: RwLock::new(WorkerState::Installing),
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    /// The namespace this controller considers current
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn set_state(&self, state: WorkerState) {
        *self.state.write() = state;
    }

    /// Fetch one manifest resource and store it under the new namespace
    ///
    /// A non-2xx response counts as a failure: the manifest lists only
    /// resources that must exist, so anything else aborts the install.
    async fn precache_one(&self, path: &str) -> Result<(), WorkerError> {
        let url = resolve_url(self.config.normalized_origin(), path);
        let request = Request::get(url.clone());

        let response = self.fetcher.fetch(&request).await.map_err(|e| {
            WorkerError::Network(format!("precache fetch of {} failed: {}", url, e))
        })?;
        if !response.status.is_success() {
            return Err(WorkerError::Network(format!(
                "precache fetch of {} returned {}",
                url, response.status
            )));
        }

        self.store
            .put(
                &self.namespace,
                crate::cache::CacheKey::from_request(&request),
                crate::cache::CacheEntry::from_response(&response),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl WorkerEvents for LifecycleController {
    /// Install: open the new namespace and populate the precache manifest
    ///
    /// All-or-nothing: any single failure aborts the install and the worker
    /// goes Redundant; a previously active version keeps serving. Entries
    /// already written stay behind and are reclaimed by the next successful
    /// activation sweep. On success, activation is requested immediately
    /// rather than holding in the waiting state.
    async fn on_install(&self) -> Result<(), WorkerError> {
        self.set_state(WorkerState::Installing);
        self.store.open(&self.namespace).await?;

        let precache = self
            .config
            .precache
            .iter()
            .map(|path| self.precache_one(path));

        if let Err(err) = futures::future::try_join_all(precache).await {
            tracing::error!(namespace = %self.namespace, error = %err, "precache failed, install aborted");
            self.set_state(WorkerState::Redundant);
            return Err(err);
        }

        tracing::info!(
            namespace = %self.namespace,
            resources = self.config.precache.len(),
            "precache complete, skipping waiting hold"
        );
        self.set_state(WorkerState::Waiting);
        Ok(())
    }

    /// Activate: evict every stale namespace, then claim all clients
    async fn on_activate(&self) -> Result<(), WorkerError> {
        for namespace in self.store.list_namespaces().await? {
            if namespace != self.namespace {
                let existed = self.store.delete_namespace(&namespace).await?;
                if existed {
                    tracing::info!(stale = %namespace, current = %self.namespace, "deleted stale cache namespace");
                }
            }
        }

        self.clients.claim().await?;
        self.set_state(WorkerState::Active);
        tracing::info!(namespace = %self.namespace, "worker active, clients claimed");
        Ok(())
    }

    /// Fetch: classify and dispatch to exactly one strategy
    ///
    /// Bypass routes go straight to the network with no cache involvement.
    async fn on_fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        match self.classifier.classify(request) {
            RouteDecision::Bypass => Ok(self.fetcher.fetch(request).await?),
            RouteDecision::Navigation => self.engine.network_first(&self.namespace, request).await,
            RouteDecision::StaticAsset => self.engine.cache_first(&self.namespace, request).await,
            RouteDecision::Other => {
                self.engine
                    .network_with_fallback(&self.namespace, request)
                    .await
            }
        }
    }
}
