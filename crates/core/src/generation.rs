//! Generation manager.
//!
//! Owns the active generation label and, on activation, sweeps every other
//! generation out of the store so exactly one stays live.

use std::sync::Arc;

use serde::Serialize;

use crate::cache::{CacheStorage, Generation};
use crate::Error;

/// Outcome of an activation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub deleted: Vec<Generation>,
    /// Generations whose deletion failed; they are retried on the next activation.
    pub failed: Vec<Generation>,
}

/// Keeps one active generation and removes all others.
#[derive(Clone)]
pub struct GenerationManager {
    storage: Arc<dyn CacheStorage>,
    active: Generation,
}

impl GenerationManager {
    pub fn new(storage: Arc<dyn CacheStorage>, active: Generation) -> Self {
        Self { storage, active }
    }

    pub fn active(&self) -> &Generation {
        &self.active
    }

    /// Open the active generation and delete every other one.
    ///
    /// Individual delete failures are logged and reported, not returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the active generation cannot be opened or the
    /// store cannot enumerate its generations.
    pub async fn activate(&self) -> Result<SweepReport, Error> {
        self.storage.open(&self.active).await?;

        let mut report = SweepReport::default();
        for generation in self.storage.keys().await? {
            if generation == self.active {
                continue;
            }
            match self.storage.delete(&generation).await {
                Ok(_) => {
                    tracing::debug!(generation = %generation, "deleted superseded cache generation");
                    report.deleted.push(generation);
                }
                Err(e) => {
                    tracing::warn!(generation = %generation, error = %e, "failed to delete cache generation");
                    report.failed.push(generation);
                }
            }
        }

        tracing::info!(
            active = %self.active,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "cache generation sweep complete"
        );

        Ok(report)
    }
}
