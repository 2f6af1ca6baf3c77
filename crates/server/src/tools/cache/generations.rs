//! cache_generations tool implementation.
//!
//! Lists the generations in the store and the entries of the active one.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Cache, CacheStorage, EntryMeta};

use crate::error::ToolError;

/// Parameters for the cache_generations tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheGenerationsParams {
    /// Include per-entry metadata for the active generation.
    #[serde(default)]
    pub include_entries: bool,
}

/// Summary of one stored entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntrySummary {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body_len: usize,
    pub stored_at: String,
}

impl From<EntryMeta> for EntrySummary {
    fn from(meta: EntryMeta) -> Self {
        Self {
            method: meta.method,
            url: meta.url,
            status: meta.status,
            content_type: meta.content_type,
            body_len: meta.body_len,
            stored_at: meta.stored_at,
        }
    }
}

/// Output from the cache_generations tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGenerationsOutput {
    /// The active generation.
    pub active: String,
    /// Every generation present in the store.
    pub generations: Vec<String>,
    /// Entries of the active generation (empty unless requested).
    pub entries: Vec<EntrySummary>,
}

/// Implementation of the cache_generations tool.
pub async fn generations_impl(
    storage: &dyn CacheStorage, cache: &Cache, params: CacheGenerationsParams,
) -> Result<CallToolResult, McpError> {
    let generations = storage
        .keys()
        .await
        .map_err(ToolError::from)?
        .into_iter()
        .map(|g| g.to_string())
        .collect();

    let entries = if params.include_entries {
        cache
            .entries()
            .await
            .map_err(ToolError::from)?
            .into_iter()
            .map(EntrySummary::from)
            .collect()
    } else {
        Vec::new()
    };

    let output = CacheGenerationsOutput { active: cache.generation().to_string(), generations, entries };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| ToolError::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swcache_core::{CacheDb, Generation, Request, RequestKey, Response};

    use super::*;

    #[tokio::test]
    async fn test_generations_lists_store() {
        let storage = Arc::new(CacheDb::open_in_memory().await.unwrap());
        storage.open(&Generation::new("old").unwrap()).await.unwrap();
        let cache = Cache::open(storage.clone(), Generation::new("v1").unwrap()).await.unwrap();
        let request = Request::get(url::Url::parse("https://app.test/app.css").unwrap());
        cache.put(&RequestKey::from_request(&request), Response::ok("body{}")).await.unwrap();

        let params = CacheGenerationsParams { include_entries: true };
        let result = generations_impl(storage.as_ref(), &cache, params).await;
        assert!(result.is_ok());

        let entries = cache.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        let summary = EntrySummary::from(entries[0].clone());
        assert_eq!(summary.url, "https://app.test/app.css");
        assert_eq!(summary.body_len, 6);
    }
}
