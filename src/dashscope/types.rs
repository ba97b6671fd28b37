//! DashScope request and response shapes.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Image size used when the caller does not pick one.
pub const DEFAULT_SIZE: &str = "1328*1328";

/// Caller payload for `POST /api/qwen/generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationRequest {
    pub prompt: String,
    pub size: Option<String>,
    pub prompt_extend: bool,
    pub watermark: bool,
}

impl GenerationRequest {
    /// Requested size, or [`DEFAULT_SIZE`] when missing or empty.
    pub fn size_or_default(&self) -> &str {
        match self.size.as_deref() {
            Some(size) if !size.is_empty() => size,
            _ => DEFAULT_SIZE,
        }
    }
}

/// Body of the multimodal generation call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPayload<'a> {
    pub model: &'a str,
    pub input: GenerationInput<'a>,
    pub parameters: GenerationParameters<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationInput<'a> {
    pub messages: Vec<Message<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message<'a> {
    pub role: &'static str,
    pub content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentBlock<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters<'a> {
    pub size: &'a str,
    pub prompt_extend: bool,
    pub watermark: bool,
}

impl<'a> GenerationPayload<'a> {
    /// Wrap the prompt as a single user message, applying the default size.
    pub fn new(model: &'a str, request: &'a GenerationRequest) -> Self {
        Self {
            model,
            input: GenerationInput {
                messages: vec![Message {
                    role: "user",
                    content: vec![ContentBlock {
                        text: &request.prompt,
                    }],
                }],
            },
            parameters: GenerationParameters {
                size: request.size_or_default(),
                prompt_extend: request.prompt_extend,
                watermark: request.watermark,
            },
        }
    }
}

/// Upstream answer: status, the original body bytes, and the parsed object.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub raw: Bytes,
    pub body: Map<String, Value>,
}

impl UpstreamReply {
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// DashScope error code (`code`), present on error bodies.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.body.get("request_id").and_then(Value::as_str)
    }

    pub fn task_id(&self) -> Option<&str> {
        self.output_field("task_id")
    }

    pub fn task_status(&self) -> Option<&str> {
        self.output_field("task_status")
    }

    fn output_field(&self, name: &str) -> Option<&str> {
        self.body
            .get("output")
            .and_then(|output| output.get(name))
            .and_then(Value::as_str)
    }
}
