//! Cache-first with background refresh.

use swcache_core::{Error, Request, RequestKey, Response};
use tokio::task::JoinHandle;

use super::{StrategyEngine, spawn_store};

impl StrategyEngine {
    /// Serve from the cache when possible; always refresh from the network.
    ///
    /// A hit returns without waiting for the refresh. A miss waits for the
    /// refresh and returns its response or its error.
    pub(crate) async fn cache_first(&self, request: Request) -> Result<Response, Error> {
        let key = RequestKey::from_request(&request);
        let cached = self.lookup(&key).await;
        let refresh = self.spawn_refresh(request, key);

        match cached {
            Some(hit) => {
                tracing::debug!("cache hit, refreshing in background");
                Ok(hit)
            }
            None => {
                tracing::debug!("cache miss, waiting on network");
                refresh.await.map_err(|e| Error::Task(e.to_string()))?
            }
        }
    }

    fn spawn_refresh(&self, request: Request, key: RequestKey) -> JoinHandle<Result<Response, Error>> {
        let network = self.network.clone();
        let cache = self.cache.clone();
        let tasks = self.tasks.clone();

        self.tasks.spawn(async move {
            let result = network.fetch(&request).await;
            match &result {
                Ok(response) => spawn_store(&tasks, cache, key, response.duplicate()),
                Err(e) => tracing::debug!(url = %request.url, error = %e, "background refresh failed"),
            }
            result
        })
    }
}
