//! swcache MCP server entry point.
//!
//! Boots one cache worker (install, then activate) and serves it over the
//! MCP stdio transport. Logging goes to stderr to avoid interfering with the
//! JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use swcache_client::{FetchConfig, HttpNetwork, ServiceWorker, StandaloneHost};
use swcache_core::{AppConfig, CacheDb, CacheStorage};
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let origin = config.origin_url()?;

    tracing::info!(
        origin = %origin,
        generation = %config.generation,
        db_path = %config.db_path.display(),
        "starting swcache server on stdio transport"
    );

    let storage: Arc<dyn CacheStorage> = Arc::new(CacheDb::open(&config.db_path).await?);
    let network = Arc::new(HttpNetwork::new(FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        ..Default::default()
    })?);

    let worker = Arc::new(ServiceWorker::new(&config, storage.clone(), network, Arc::new(StandaloneHost)).await?);
    worker.install().await?;
    let report = worker.activate().await?;
    tracing::info!(deleted = report.deleted.len(), failed = report.failed.len(), "worker activated");

    let handler = handler::SwCacheServer::new(worker, storage, origin);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
