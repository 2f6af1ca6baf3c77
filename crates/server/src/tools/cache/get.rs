//! cache_get tool implementation.
//!
//! Reads one entry from the active generation without touching the network.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::fetch::resolve;
use swcache_core::{Cache, Error, Request};

use crate::error::ToolError;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Request URL, absolute or relative to the configured origin.
    pub url: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub url: String,
    pub generation: String,
    pub status: u16,
    pub content_type: Option<String>,
    /// Stored body as UTF-8 (lossy).
    pub body: String,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &Cache, origin: &url::Url, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let url = resolve(origin, &params.url).map_err(|e| ToolError::from(Error::InvalidUrl(e.to_string())))?;
    let request = Request::get(url);

    let response = cache
        .match_request(&request)
        .await
        .map_err(ToolError::from)?
        .ok_or_else(|| ToolError::CacheMiss(request.url.to_string()))?;

    let output = CacheGetOutput {
        url: request.url.to_string(),
        generation: cache.generation().to_string(),
        status: response.status,
        content_type: response.content_type().map(str::to_string),
        body: response.into_text(),
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| ToolError::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
