//! DashScope HTTP client.
//!
//! # Responsibilities
//! - Build endpoint URLs from the configured base URL
//! - Attach authentication and async-mode headers
//! - Issue exactly one request per call (no retries)
//! - Parse the body as a JSON object without touching the status

use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use url::Url;

use crate::config::schema::{DashScopeConfig, TimeoutConfig};
use crate::dashscope::types::{GenerationPayload, GenerationRequest, UpstreamReply};
use crate::error::{ProxyError, ProxyResult};

/// Header switching DashScope generation into asynchronous task mode.
pub const ASYNC_HEADER: &str = "X-DashScope-Async";

const GENERATION_PATH: [&str; 4] = ["services", "aigc", "multimodal-generation", "generation"];

/// Thin wrapper over a pooled `reqwest::Client`.
#[derive(Clone)]
pub struct DashScopeClient {
    http: reqwest::Client,
}

impl DashScopeClient {
    /// Build a client honouring the optional connect/request timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> ProxyResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.upstream_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| ProxyError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }

    /// Submit an asynchronous image generation task.
    pub async fn submit_generation(
        &self,
        config: &DashScopeConfig,
        api_key: &str,
        request: &GenerationRequest,
    ) -> ProxyResult<UpstreamReply> {
        let url = endpoint(config.base_url(), &GENERATION_PATH)?;
        let payload = GenerationPayload::new(&config.model, request);

        tracing::debug!(url = %url, size = payload.parameters.size, "Submitting generation task");

        let builder = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(AUTHORIZATION, bearer(api_key)?)
            .header(ASYNC_HEADER, HeaderValue::from_static("enable"))
            .json(&payload);

        execute(builder).await
    }

    /// Fetch the current state of a task.
    pub async fn query_task(
        &self,
        config: &DashScopeConfig,
        api_key: &str,
        task_id: &str,
    ) -> ProxyResult<UpstreamReply> {
        let url = endpoint(config.base_url(), &["tasks", task_id])?;

        tracing::debug!(url = %url, "Querying task");

        let builder = self.http.get(url).header(AUTHORIZATION, bearer(api_key)?);

        execute(builder).await
    }
}

/// Append path segments to a base URL. Each segment is percent-encoded, so a
/// task id always stays a single segment.
pub fn endpoint(base_url: &str, segments: &[&str]) -> ProxyResult<Url> {
    let invalid = || ProxyError::Configuration(format!("Invalid DashScope base URL '{}'", base_url));

    let mut url = Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn bearer(api_key: &str) -> ProxyResult<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|_| ProxyError::Configuration("DASHSCOPE_API_KEY is not a valid header value".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

async fn execute(builder: reqwest::RequestBuilder) -> ProxyResult<UpstreamReply> {
    let response = builder.send().await.map_err(|e| {
        tracing::error!(error = %e, "DashScope API error");
        ProxyError::UpstreamUnavailable(e)
    })?;

    let status = response.status();
    let raw = response.bytes().await.map_err(|e| {
        tracing::error!(status = %status, error = %e, "Failed to read DashScope response");
        ProxyError::UpstreamUnavailable(e)
    })?;

    let body: Map<String, Value> = serde_json::from_slice(&raw).map_err(|e| {
        tracing::error!(status = %status, error = %e, "DashScope response is not a JSON object");
        ProxyError::UpstreamProtocol(e)
    })?;

    Ok(UpstreamReply { status, raw, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_endpoint() {
        let url = endpoint("https://dashscope.aliyuncs.com/api/v1", &GENERATION_PATH).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation"
        );
    }

    #[test]
    fn test_task_endpoint() {
        let url = endpoint("https://dashscope-intl.aliyuncs.com/api/v1", &["tasks", "task-123"]).unwrap();
        assert_eq!(url.as_str(), "https://dashscope-intl.aliyuncs.com/api/v1/tasks/task-123");
    }

    #[test]
    fn test_trailing_slash_base() {
        let url = endpoint("http://127.0.0.1:9000/api/v1/", &["tasks", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/v1/tasks/abc");
    }

    #[test]
    fn test_task_id_stays_one_segment() {
        let url = endpoint("http://localhost/api/v1", &["tasks", "a/b?c"]).unwrap();
        assert_eq!(url.path(), "/api/v1/tasks/a%2Fb%3Fc");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = endpoint("not a url", &["tasks"]).unwrap_err();
        assert!(matches!(err, ProxyError::Configuration(_)));
    }

    #[test]
    fn test_bearer_is_sensitive() {
        let value = bearer("sk-abc").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer sk-abc");
        assert!(value.is_sensitive());
        assert!(bearer("bad\nkey").is_err());
    }
}
