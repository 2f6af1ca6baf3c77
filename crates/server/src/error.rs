//! Structured errors for the swcache MCP server.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use swcache_core::Error;

/// Structured errors surfaced by tool calls.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No entry for the request in the active generation.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Error raised by the cache engine.
    #[error(transparent)]
    Engine(#[from] Error),
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let code = match &err {
            ToolError::InvalidInput(_) => -32602,
            ToolError::CacheMiss(_) => -32001,
            ToolError::Engine(e) => match e {
                Error::InvalidInput(_) | Error::InvalidUrl(_) => -32602,
                Error::Network(_) | Error::FetchTooLarge(_) => -32003,
                Error::Task(_) => -32603,
                Error::Database(_)
                | Error::MigrationFailed(_)
                | Error::CorruptEntry(_)
                | Error::QuotaExceeded(_) => -32002,
            },
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
