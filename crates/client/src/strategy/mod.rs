//! Fetch strategies and the engine that runs them.
//!
//! - [`Strategy::NetworkFirst`] for navigations: live content preferred, the
//!   cache and then the fallback document used only when the network fails.
//! - [`Strategy::CacheFirst`] for static assets: a cache hit is returned
//!   immediately while a background fetch refreshes the entry.
//!
//! Store writes run as tasks on a [`TaskTracker`], detached from the caller;
//! their failures are logged, never returned. [`StrategyEngine::settled`]
//! waits for all of them.

mod cache_first;
mod network_first;

use std::sync::Arc;

use swcache_core::{Cache, Error, Request, RequestKey, Response};
use tokio_util::task::TaskTracker;
use url::Url;

use crate::classify::Classification;
use crate::fetch::Network;

/// Orchestration applied to a classified request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NetworkFirst,
    CacheFirst,
}

impl Strategy {
    /// Strategy for a classification; `None` for ignored requests.
    pub fn for_classification(classification: Classification) -> Option<Self> {
        match classification {
            Classification::Navigation => Some(Strategy::NetworkFirst),
            Classification::StaticAsset => Some(Strategy::CacheFirst),
            Classification::Ignored => None,
        }
    }
}

/// Runs strategies against one network and one opened cache generation.
pub struct StrategyEngine {
    network: Arc<dyn Network>,
    cache: Cache,
    fallback: Option<RequestKey>,
    tasks: TaskTracker,
}

impl StrategyEngine {
    /// `fallback` is the URL of the document served to navigations that
    /// fail with no exact cache hit.
    pub fn new(network: Arc<dyn Network>, cache: Cache, fallback: Option<Url>) -> Self {
        let fallback = fallback.map(|url| RequestKey::from_request(&Request::get(url)));
        Self { network, cache, fallback, tasks: TaskTracker::new() }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn network(&self) -> &Arc<dyn Network> {
        &self.network
    }

    pub async fn execute(&self, strategy: Strategy, request: Request) -> Result<Response, Error> {
        tracing::debug!(?strategy, method = %request.method, url = %request.url, "handling request");
        match strategy {
            Strategy::NetworkFirst => self.network_first(&request).await,
            Strategy::CacheFirst => self.cache_first(request).await,
        }
    }

    /// Wait until every background refresh and store write has finished.
    ///
    /// Must not be called concurrently: a second caller's `reopen` can let
    /// the first return before tasks spawned in between have finished.
    pub async fn settled(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Cache lookup that treats store failures as a miss.
    async fn lookup(&self, key: &RequestKey) -> Option<Response> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(url = %key.url, error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    fn store_in_background(&self, key: RequestKey, response: Response) {
        spawn_store(&self.tasks, self.cache.clone(), key, response);
    }
}

/// Write `response` into `cache` on a tracked task.
///
/// Every received response is stored, whatever its status.
fn spawn_store(tasks: &TaskTracker, cache: Cache, key: RequestKey, response: Response) {
    tasks.spawn(async move {
        match cache.put(&key, response).await {
            Ok(()) => tracing::debug!(url = %key.url, generation = %cache.generation(), "stored response"),
            Err(e) => tracing::warn!(url = %key.url, error = %e, "failed to store response"),
        }
    });
}
