//! Error types and DashScope error classification.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {}", .info.user_message)]
    Api { status: u16, info: ApiErrorInfo },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid proxy URL '{0}'")]
    InvalidUrl(String),
}

/// Known DashScope (and proxy) error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidApiKey,
    AuthFailed,
    RateLimitExceeded,
    QuotaExceeded,
    ContentModerationFailed,
    InvalidRequest,
    TaskNotFound,
    TaskFailed,
    ServerError,
    Unknown,
}

impl ErrorCode {
    fn from_code(code: &str) -> Self {
        match code {
            "InvalidApiKey" => ErrorCode::InvalidApiKey,
            "AuthFailed" => ErrorCode::AuthFailed,
            "RateLimitExceeded" | "Throttling" => ErrorCode::RateLimitExceeded,
            "QuotaExceeded" | "Arrearage" => ErrorCode::QuotaExceeded,
            "DataInspectionFailed" => ErrorCode::ContentModerationFailed,
            "InvalidRequest" | "InvalidParameter" => ErrorCode::InvalidRequest,
            "TaskNotFound" => ErrorCode::TaskNotFound,
            "TaskFailed" => ErrorCode::TaskFailed,
            _ => ErrorCode::Unknown,
        }
    }

    fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::AuthFailed,
            429 => ErrorCode::RateLimitExceeded,
            s if s >= 500 => ErrorCode::ServerError,
            _ => ErrorCode::Unknown,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::RateLimitExceeded
                | ErrorCode::TaskNotFound
                | ErrorCode::TaskFailed
                | ErrorCode::ServerError
        )
    }

    fn user_message(&self) -> Option<&'static str> {
        Some(match self {
            ErrorCode::InvalidApiKey => "API key is invalid or missing",
            ErrorCode::AuthFailed => "Authentication failed",
            ErrorCode::RateLimitExceeded => "Too many requests - rate limit exceeded",
            ErrorCode::QuotaExceeded => "API quota exceeded - no more generations available",
            ErrorCode::ContentModerationFailed => "Prompt blocked by content moderation",
            ErrorCode::InvalidRequest => "Invalid request format",
            ErrorCode::TaskNotFound => "Task not found - it may have expired",
            ErrorCode::TaskFailed => "Image generation failed on the server",
            ErrorCode::ServerError => "Server error - DashScope API is having issues",
            ErrorCode::Unknown => return None,
        })
    }

    /// What the user can do about it.
    pub fn suggestion(&self) -> &'static str {
        match self {
            ErrorCode::InvalidApiKey => {
                "Check your .env file and ensure DASHSCOPE_API_KEY is set correctly"
            }
            ErrorCode::AuthFailed => "Check your API key configuration",
            ErrorCode::RateLimitExceeded => "Wait a few minutes before trying again",
            ErrorCode::QuotaExceeded => "Check your Alibaba Cloud account to add more quota",
            ErrorCode::ContentModerationFailed => {
                "Try rephrasing your prompt. Avoid sensitive or inappropriate content."
            }
            ErrorCode::InvalidRequest => "This is likely a bug - please report it",
            ErrorCode::TaskNotFound => "Try generating the image again",
            ErrorCode::TaskFailed => {
                "Try a different prompt or check the DashScope console for details"
            }
            ErrorCode::ServerError => "Try again in a few minutes",
            ErrorCode::Unknown => "Try again or contact support",
        }
    }
}

const CONNECTION_SUGGESTION: &str = "Check your internet connection and try again";

/// A classified non-2xx reply from the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorInfo {
    pub code: ErrorCode,
    /// Raw `code` field when the body had one.
    pub raw_code: Option<String>,
    pub user_message: String,
    pub technical_message: String,
    pub suggestion: &'static str,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ApiErrorInfo {
    /// Classify an error reply. DashScope bodies carry `code` and `message`;
    /// errors raised by the proxy itself carry `error`. Anything else falls
    /// back on the HTTP status.
    pub fn parse(status: u16, body: &str) -> Self {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(raw_code) = parsed.code {
                let code = ErrorCode::from_code(&raw_code);
                let technical = parsed.message.unwrap_or_default();
                let user = code
                    .user_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| non_empty_or(&technical, "Unknown error"));
                return Self {
                    code,
                    raw_code: Some(raw_code),
                    user_message: user,
                    technical_message: technical,
                    suggestion: code.suggestion(),
                };
            }
            if let Some(error) = parsed.error {
                let code = ErrorCode::from_status(status);
                return Self {
                    code,
                    raw_code: None,
                    user_message: error.clone(),
                    technical_message: error,
                    suggestion: code.suggestion(),
                };
            }
        }

        let code = ErrorCode::from_status(status);
        Self {
            code,
            raw_code: None,
            user_message: code
                .user_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed ({})", status)),
            technical_message: body.to_string(),
            suggestion: match code {
                ErrorCode::Unknown => CONNECTION_SUGGESTION,
                known => known.suggestion(),
            },
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
