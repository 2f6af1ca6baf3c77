//! MCP server handler implementation.
//!
//! Routes tool calls to the worker and the cache inspection tools.
use std::sync::Arc;

use crate::tools::{
    SwFetchParams,
    cache::{CacheGenerationsParams, CacheGetParams, generations_impl, get_impl},
    sw_fetch::fetch_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use swcache_client::ServiceWorker;
use swcache_core::CacheStorage;
use url::Url;

/// The main MCP server handler for swcache.
#[derive(Clone)]
pub struct SwCacheServer {
    tool_router: ToolRouter<Self>,
    worker: Arc<ServiceWorker>,
    storage: Arc<dyn CacheStorage>,
    origin: Url,
}

#[tool_router]
impl SwCacheServer {
    /// Create a new server handler around an activated worker.
    pub fn new(worker: Arc<ServiceWorker>, storage: Arc<dyn CacheStorage>, origin: Url) -> Self {
        Self { tool_router: Self::tool_router(), worker, storage, origin }
    }

    /// Route a request through the worker's cache policy.
    #[tool(
        description = "Fetch a URL through the offline cache worker. Documents are network-first with cache fallback; \
                       same-origin assets are cache-first with background refresh."
    )]
    async fn sw_fetch(&self, params: Parameters<SwFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, &self.origin, params.0).await
    }

    /// List cache generations.
    #[tool(description = "List cache generations in the store and, optionally, the entries of the active generation.")]
    async fn cache_generations(&self, params: Parameters<CacheGenerationsParams>) -> Result<CallToolResult, McpError> {
        generations_impl(self.storage.as_ref(), self.worker.engine().cache(), params.0).await
    }

    /// Read one cached entry.
    #[tool(description = "Read a cached response from the active generation without using the network.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.worker.engine().cache(), &self.origin, params.0).await
    }
}

impl ServerHandler for SwCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "swcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
