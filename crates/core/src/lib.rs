//! Core types and shared functionality for swcache.
//!
//! This crate provides:
//! - Request/response model shared by the policy engine and its hosts
//! - Generation-scoped cache store with SQLite and in-memory backends
//! - Generation manager that sweeps superseded generations
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod generation;
pub mod request;
pub mod response;

pub use cache::{Cache, CacheDb, CacheStorage, EntryMeta, Generation, MemoryStorage, RequestKey};
pub use config::AppConfig;
pub use error::Error;
pub use generation::{GenerationManager, SweepReport};
pub use request::{Request, RequestMode};
pub use response::{Response, ResponseSource};
