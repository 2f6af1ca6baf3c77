//! Request-interception cache policy for swcache.
//!
//! This crate provides request classification, the network boundary, the
//! fetch strategies, and the worker that wires them to a host's lifecycle.

pub mod classify;
pub mod fetch;
pub mod strategy;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{Classification, Classifier};
pub use fetch::{FetchConfig, HttpNetwork, Network};
pub use strategy::{Strategy, StrategyEngine};
pub use worker::{FetchDisposition, ServiceWorker, StandaloneHost, WorkerHost, WorkerState};
