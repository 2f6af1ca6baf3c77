//! MCP tool implementations.
//!
//! This module contains all tools exposed by the swcache server.

pub mod cache;
pub mod sw_fetch;

pub use sw_fetch::SwFetchParams;
