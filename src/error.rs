//! Proxy error taxonomy and its HTTP mapping.
//!
//! Every variant renders as `{"error": "<message>"}`. The message is the
//! public one; underlying causes are kept as sources for logging only.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors produced while handling a proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Caller sent a malformed body, empty prompt or empty task id.
    #[error("{0}")]
    InvalidInput(String),

    /// Required configuration (the API key) is missing.
    #[error("{0}")]
    Configuration(String),

    /// DashScope could not be reached or the response could not be read.
    #[error("Failed to call DashScope API")]
    UpstreamUnavailable(#[source] reqwest::Error),

    /// DashScope answered with a body that is not a JSON object.
    #[error("Failed to parse response")]
    UpstreamProtocol(#[source] serde_json::Error),
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    pub fn invalid_body() -> Self {
        ProxyError::InvalidInput("Invalid request body".to_string())
    }

    pub fn missing_prompt() -> Self {
        ProxyError::InvalidInput("Prompt is required".to_string())
    }

    pub fn missing_task_id() -> Self {
        ProxyError::InvalidInput("Task ID is required".to_string())
    }

    /// A task id segment that could not be decoded.
    pub fn invalid_task_id() -> Self {
        ProxyError::InvalidInput("Invalid task ID".to_string())
    }

    pub fn missing_api_key() -> Self {
        ProxyError::Configuration("DASHSCOPE_API_KEY not configured".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ProxyError::Configuration(_)
            | ProxyError::UpstreamUnavailable(_)
            | ProxyError::UpstreamProtocol(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::InvalidInput(_) => "invalid_input",
            ProxyError::Configuration(_) => "configuration",
            ProxyError::UpstreamUnavailable(_) => "upstream_unavailable",
            ProxyError::UpstreamProtocol(_) => "upstream_protocol",
        }
    }
}

impl From<JsonRejection> for ProxyError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        ProxyError::invalid_body()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
