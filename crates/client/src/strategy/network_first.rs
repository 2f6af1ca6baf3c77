//! Network-first with cache fallback.

use swcache_core::{Error, Request, RequestKey, Response, ResponseSource};

use super::StrategyEngine;

impl StrategyEngine {
    /// Fetch from the network, storing a copy of what comes back.
    ///
    /// On network failure: exact cache match, then the fallback document,
    /// then the original network error.
    pub(crate) async fn network_first(&self, request: &Request) -> Result<Response, Error> {
        let key = RequestKey::from_request(request);

        let err = match self.network.fetch(request).await {
            Ok(response) => {
                self.store_in_background(key, response.duplicate());
                return Ok(response);
            }
            Err(err) => err,
        };

        tracing::debug!(url = %request.url, error = %err, "network failed, falling back to cache");

        if let Some(hit) = self.lookup(&key).await {
            return Ok(hit);
        }

        if let Some(fallback) = &self.fallback
            && let Some(document) = self.lookup(fallback).await
        {
            tracing::debug!(url = %request.url, fallback = %fallback.url, "serving fallback document");
            return Ok(document.with_source(ResponseSource::Fallback));
        }

        tracing::warn!(url = %request.url, error = %err, "navigation failed with no cached copy");
        Err(err)
    }
}
