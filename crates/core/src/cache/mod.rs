//! Generation-scoped response store.
//!
//! Responses are stored per generation, keyed by request identity. The
//! [`CacheStorage`] trait is the store boundary; [`Cache`] is a handle bound
//! to one opened generation. Two backends are provided:
//!
//! - [`CacheDb`]: SQLite via tokio-rusqlite, WAL mode, automatic migrations
//! - [`MemoryStorage`]: in-process maps with an optional byte quota

pub mod connection;
pub mod entries;
pub mod hash;
pub mod memory;
pub mod migrations;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::Error;
use crate::{Request, Response};

pub use connection::CacheDb;
pub use hash::RequestKey;
pub use memory::MemoryStorage;

/// Opaque cache generation label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(String);

impl Generation {
    /// Create a generation label, rejecting empty names.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("generation name cannot be empty".into()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary of a stored entry, without its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body_len: usize,
    pub stored_at: String,
}

/// Store boundary: named generations holding request → response entries.
///
/// Every operation may fail (quota, I/O); callers in the policy engine treat
/// those failures as non-fatal.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the generation if it does not exist yet.
    async fn open(&self, generation: &Generation) -> Result<(), Error>;

    /// Most recent response stored for `key`, if any.
    async fn get(&self, generation: &Generation, key: &RequestKey) -> Result<Option<Response>, Error>;

    /// Store `response` for `key`, replacing any previous entry.
    async fn put(&self, generation: &Generation, key: &RequestKey, response: Response) -> Result<(), Error>;

    /// Every generation known to the store.
    async fn keys(&self) -> Result<Vec<Generation>, Error>;

    /// Remove a generation and all its entries. Returns false if it did not exist.
    async fn delete(&self, generation: &Generation) -> Result<bool, Error>;

    /// Metadata for every entry in a generation, ordered by URL.
    async fn entries(&self, generation: &Generation) -> Result<Vec<EntryMeta>, Error>;
}

/// Handle to one opened generation.
#[derive(Clone)]
pub struct Cache {
    storage: Arc<dyn CacheStorage>,
    generation: Generation,
}

impl Cache {
    /// Open `generation` in `storage`, creating it if needed.
    pub async fn open(storage: Arc<dyn CacheStorage>, generation: Generation) -> Result<Self, Error> {
        storage.open(&generation).await?;
        Ok(Self { storage, generation })
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Exact-match lookup for a request.
    pub async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        self.get(&RequestKey::from_request(request)).await
    }

    pub async fn get(&self, key: &RequestKey) -> Result<Option<Response>, Error> {
        self.storage.get(&self.generation, key).await
    }

    pub async fn put(&self, key: &RequestKey, response: Response) -> Result<(), Error> {
        self.storage.put(&self.generation, key, response).await
    }

    pub async fn entries(&self) -> Result<Vec<EntryMeta>, Error> {
        self.storage.entries(&self.generation).await
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").field("generation", &self.generation).finish()
    }
}
