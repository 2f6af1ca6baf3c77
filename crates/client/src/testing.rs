//! Test doubles for the network, store, and worker host boundaries.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use swcache_core::cache::{CacheStorage, EntryMeta, Generation, MemoryStorage, RequestKey};
use swcache_core::{Error, Request, Response, ResponseSource};
use tokio::sync::watch;

use crate::fetch::Network;
use crate::worker::WorkerHost;

/// Scripted network: fixed replies per URL, an offline switch, and a gate
/// that holds every fetch until released.
pub(crate) struct StubNetwork {
    routes: Mutex<HashMap<String, (u16, String)>>,
    calls: Mutex<HashMap<String, usize>>,
    offline: AtomicBool,
    gate: watch::Sender<bool>,
}

impl StubNetwork {
    pub(crate) fn new() -> Self {
        let (gate, _) = watch::channel(false);
        Self { routes: Mutex::default(), calls: Mutex::default(), offline: AtomicBool::new(false), gate }
    }

    pub(crate) fn serve(&self, url: &str, body: &str) {
        self.serve_status(url, 200, body);
    }

    pub(crate) fn serve_status(&self, url: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Block every fetch until [`StubNetwork::release`].
    pub(crate) fn hold(&self) {
        self.gate.send_replace(true);
    }

    pub(crate) fn release(&self) {
        self.gate.send_replace(false);
    }

    pub(crate) fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Network for StubNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let url = request.url.to_string();
        *self.calls.lock().unwrap().entry(url.clone()).or_default() += 1;

        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|held| !*held).await;

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network(format!("{url}: connection refused")));
        }

        let route = self.routes.lock().unwrap().get(&url).cloned();
        Ok(match route {
            Some((status, body)) => Response::new(status, Vec::new(), body, ResponseSource::Network),
            None => Response::new(404, Vec::new(), "not found", ResponseSource::Network),
        })
    }
}

/// Memory store whose reads, writes and generation listing can be switched to fail.
#[derive(Default)]
pub(crate) struct FlakyStorage {
    pub(crate) inner: MemoryStorage,
    pub(crate) fail_get: AtomicBool,
    pub(crate) fail_put: AtomicBool,
    pub(crate) fail_keys: AtomicBool,
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, generation: &Generation) -> Result<(), Error> {
        self.inner.open(generation).await
    }

    async fn get(&self, generation: &Generation, key: &RequestKey) -> Result<Option<Response>, Error> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Error::CorruptEntry("disk I/O error".into()));
        }
        self.inner.get(generation, key).await
    }

    async fn put(&self, generation: &Generation, key: &RequestKey, response: Response) -> Result<(), Error> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(Error::QuotaExceeded("store full".into()));
        }
        self.inner.put(generation, key, response).await
    }

    async fn keys(&self) -> Result<Vec<Generation>, Error> {
        if self.fail_keys.load(Ordering::SeqCst) {
            return Err(Error::CorruptEntry("generation table unreadable".into()));
        }
        self.inner.keys().await
    }

    async fn delete(&self, generation: &Generation) -> Result<bool, Error> {
        self.inner.delete(generation).await
    }

    async fn entries(&self, generation: &Generation) -> Result<Vec<EntryMeta>, Error> {
        self.inner.entries(generation).await
    }
}

/// Worker host that records lifecycle calls in order.
#[derive(Default)]
pub(crate) struct RecordingHost {
    pub(crate) events: Mutex<Vec<&'static str>>,
    pub(crate) claims: AtomicUsize,
}

#[async_trait]
impl WorkerHost for RecordingHost {
    async fn skip_waiting(&self) -> Result<(), Error> {
        self.events.lock().unwrap().push("skip_waiting");
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        self.claims.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push("claim_clients");
        Ok(())
    }
}
