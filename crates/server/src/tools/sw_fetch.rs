//! sw_fetch tool implementation.
//!
//! Routes one request through the worker's fetch interception. Requests the
//! worker passes through are fetched straight from the network, the way a
//! page without a worker would.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_client::{FetchDisposition, ServiceWorker, fetch::resolve};
use swcache_core::{Error, Request, RequestMode, Response};

use crate::error::ToolError;

/// Input parameters for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchParams {
    /// Request URL, absolute or relative to the configured origin.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Optional Accept header.
    #[serde(default)]
    pub accept: Option<String>,

    /// Mark the request as a document navigation.
    #[serde(default)]
    pub navigate: bool,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for the sw_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwFetchOutput {
    /// The normalized request URL.
    pub url: String,
    /// "worker" when the worker answered, "passthrough" when it declined.
    pub handled_by: String,
    /// Where the body came from: network, cache, or fallback.
    pub source: String,
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header.
    pub content_type: Option<String>,
    /// Response body as UTF-8 (lossy).
    pub body: String,
}

impl SwFetchOutput {
    fn from_response(url: String, handled_by: &str, response: Response) -> Self {
        let source = serde_json::to_value(response.source)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        Self {
            url,
            handled_by: handled_by.into(),
            source,
            status: response.status,
            content_type: response.content_type().map(str::to_string),
            body: response.into_text(),
        }
    }
}

/// Implementation of the sw_fetch tool.
pub async fn fetch_impl(worker: &ServiceWorker, origin: &url::Url, params: SwFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(ToolError::InvalidInput("url cannot be empty".into()).into());
    }

    let url = resolve(origin, &params.url).map_err(|e| ToolError::from(Error::InvalidUrl(e.to_string())))?;
    let mut request = Request::new(&params.method, url);
    if let Some(accept) = params.accept.as_deref() {
        request = request.with_header("Accept", accept);
    }
    if params.navigate {
        request = request.with_mode(RequestMode::Navigate);
    }

    let url = request.url.to_string();
    let output = match worker.fetch(request.clone()).await {
        FetchDisposition::Responded(response) => SwFetchOutput::from_response(url, "worker", response),
        FetchDisposition::Failed(e) => return Err(ToolError::from(e).into()),
        FetchDisposition::Passthrough => {
            let response = worker
                .engine()
                .network()
                .fetch(&request)
                .await
                .map_err(ToolError::from)?;
            SwFetchOutput::from_response(url, "passthrough", response)
        }
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| ToolError::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swcache_client::{FetchConfig, HttpNetwork, StandaloneHost};
    use swcache_core::{AppConfig, MemoryStorage, ResponseSource};

    use super::*;

    async fn worker() -> ServiceWorker {
        let config = AppConfig { origin: "http://127.0.0.1:9".into(), fallback_path: None, ..Default::default() };
        let network = Arc::new(HttpNetwork::new(FetchConfig::default()).unwrap());
        ServiceWorker::new(&config, Arc::new(MemoryStorage::new()), network, Arc::new(StandaloneHost))
            .await
            .unwrap()
    }

    fn origin() -> url::Url {
        url::Url::parse("http://127.0.0.1:9").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_empty_url() {
        let worker = worker().await;
        let params = SwFetchParams { url: "  ".into(), method: "GET".into(), accept: None, navigate: false };
        assert!(fetch_impl(&worker, &origin(), params).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_offline_asset_fails() {
        let worker = worker().await;
        worker.install().await.unwrap();
        worker.activate().await.unwrap();

        let params = SwFetchParams { url: "/app.css".into(), method: "GET".into(), accept: None, navigate: false };
        let err = fetch_impl(&worker, &origin(), params).await.unwrap_err();
        assert_eq!(err.code.0, -32003);
    }

    #[test]
    fn test_output_from_response() {
        let response = Response::new(
            200,
            vec![("content-type".into(), "text/html".into())],
            "<html>A</html>",
            ResponseSource::Cache,
        );
        let output = SwFetchOutput::from_response("http://127.0.0.1:9/".into(), "worker", response);
        assert_eq!(output.source, "cache");
        assert_eq!(output.content_type.as_deref(), Some("text/html"));
        assert_eq!(output.body, "<html>A</html>");
    }
}
