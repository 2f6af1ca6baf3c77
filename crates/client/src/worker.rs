//! Interception hook.
//!
//! [`ServiceWorker`] binds the policy engine to a host's lifecycle: install,
//! activate, and fetch. Hosts call these three entry points; the worker
//! calls back into the host through [`WorkerHost`] to skip the waiting phase
//! and to take control of already-open clients.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use swcache_core::{
    AppConfig, Cache, CacheStorage, Error, GenerationManager, Request, RequestKey, Response, SweepReport,
};
use tokio::sync::RwLock;
use url::Url;

use crate::classify::Classifier;
use crate::fetch::Network;
use crate::strategy::{Strategy, StrategyEngine};

/// Lifecycle callbacks provided by the hosting platform.
#[async_trait]
pub trait WorkerHost: Send + Sync {
    /// Become ready without waiting for earlier worker instances to finish.
    async fn skip_waiting(&self) -> Result<(), Error>;

    /// Take control of every open client so they route through this worker.
    async fn claim_clients(&self) -> Result<(), Error>;
}

/// Host with no other workers or clients to coordinate with.
#[derive(Debug, Default)]
pub struct StandaloneHost;

#[async_trait]
impl WorkerHost for StandaloneHost {
    async fn skip_waiting(&self) -> Result<(), Error> {
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
}

impl WorkerState {
    /// Only an activated worker intercepts fetches.
    pub fn can_intercept(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
        };
        f.write_str(s)
    }
}

/// What the worker did with an intercepted request.
#[derive(Debug)]
pub enum FetchDisposition {
    /// Not intercepted; the host handles the request as if no worker existed.
    Passthrough,
    Responded(Response),
    Failed(Error),
}

/// Installed cache policy bound to one active generation.
pub struct ServiceWorker {
    state: RwLock<WorkerState>,
    classifier: Classifier,
    engine: StrategyEngine,
    generations: GenerationManager,
    precache: Vec<Url>,
    host: Arc<dyn WorkerHost>,
}

impl ServiceWorker {
    /// Build a worker from configuration.
    ///
    /// Opens the active generation in `storage`; no other generation is
    /// touched until [`ServiceWorker::activate`].
    pub async fn new(
        config: &AppConfig, storage: Arc<dyn CacheStorage>, network: Arc<dyn Network>, host: Arc<dyn WorkerHost>,
    ) -> Result<Self, Error> {
        let invalid = |e: swcache_core::config::ConfigError| Error::InvalidInput(e.to_string());
        let origin = config.origin_url().map_err(invalid)?;
        let active = config.active_generation().map_err(invalid)?;
        let fallback = config.fallback_url().map_err(invalid)?;
        let precache = config.precache_urls().map_err(invalid)?;

        let cache = Cache::open(storage.clone(), active.clone()).await?;

        Ok(Self {
            state: RwLock::new(WorkerState::Parsed),
            classifier: Classifier::new(&origin),
            engine: StrategyEngine::new(network, cache, fallback),
            generations: GenerationManager::new(storage, active),
            precache,
            host,
        })
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    pub fn engine(&self) -> &StrategyEngine {
        &self.engine
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    async fn set_state(&self, state: WorkerState) {
        *self.state.write().await = state;
        tracing::info!(state = %state, generation = %self.generations.active(), "worker state changed");
    }

    /// Precache configured documents, then become ready immediately.
    ///
    /// Precache failures are logged; they never fail the install.
    pub async fn install(&self) -> Result<(), Error> {
        self.set_state(WorkerState::Installing).await;

        for url in &self.precache {
            let request = Request::get(url.clone());
            match self.engine.network().fetch(&request).await {
                Ok(response) if response.is_success() => {
                    if let Err(e) = self.engine.cache().put(&RequestKey::from_request(&request), response).await {
                        tracing::warn!(url = %url, error = %e, "failed to precache");
                    }
                }
                Ok(response) => {
                    tracing::warn!(url = %url, status = response.status, "precache fetch returned an error status")
                }
                Err(e) => tracing::warn!(url = %url, error = %e, "precache fetch failed"),
            }
        }

        self.host.skip_waiting().await?;
        self.set_state(WorkerState::Installed).await;
        Ok(())
    }

    /// Sweep superseded generations, then take control of open clients.
    ///
    /// The sweep completes before the worker starts intercepting. A sweep
    /// that cannot enumerate the store is logged and skipped.
    pub async fn activate(&self) -> Result<SweepReport, Error> {
        self.set_state(WorkerState::Activating).await;

        let report = match self.generations.activate().await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "generation sweep failed, continuing");
                SweepReport::default()
            }
        };

        self.host.claim_clients().await?;
        self.set_state(WorkerState::Activated).await;
        Ok(report)
    }

    /// Route one intercepted request.
    pub async fn fetch(&self, request: Request) -> FetchDisposition {
        if !self.state().await.can_intercept() {
            tracing::debug!(url = %request.url, "worker not active, passing through");
            return FetchDisposition::Passthrough;
        }

        let classification = self.classifier.classify(&request);
        let Some(strategy) = Strategy::for_classification(classification) else {
            tracing::debug!(method = %request.method, url = %request.url, "ignored request");
            return FetchDisposition::Passthrough;
        };

        match self.engine.execute(strategy, request).await {
            Ok(response) => FetchDisposition::Responded(response),
            Err(e) => FetchDisposition::Failed(e),
        }
    }
}
