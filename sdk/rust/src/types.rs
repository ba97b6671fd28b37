//! Request options and typed views over DashScope replies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options for [`crate::ProxyClient::generate_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateImageOptions {
    /// `1024*1024`, `1328*1328` or `1920*1080`.
    pub size: String,
    pub prompt_extend: bool,
    pub watermark: bool,
}

impl Default for GenerateImageOptions {
    fn default() -> Self {
        Self {
            size: "1328*1328".to_string(),
            prompt_extend: true,
            watermark: false,
        }
    }
}

/// Body sent to `POST /api/qwen/generate`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub prompt: &'a str,
    pub size: &'a str,
    pub prompt_extend: bool,
    pub watermark: bool,
}

/// What a generation call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The upstream answered synchronously with a finished image.
    Image { url: String },
    /// The upstream queued a task; poll it with `get_task_result`.
    Task {
        task_id: String,
        request_id: Option<String>,
    },
}

impl GenerationOutcome {
    /// Classify a successful generation reply. `None` when the reply carries
    /// neither an image nor a task id.
    pub fn from_reply(reply: &Value) -> Option<Self> {
        if let Some(url) = first_image(reply) {
            return Some(GenerationOutcome::Image { url: url.to_string() });
        }

        let task_id = reply.pointer("/output/task_id").and_then(Value::as_str)?;
        Some(GenerationOutcome::Task {
            task_id: task_id.to_string(),
            request_id: reply
                .get("request_id")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

fn first_image(reply: &Value) -> Option<&str> {
    reply
        .pointer("/output/choices/0/message/content/0/image")
        .and_then(Value::as_str)
}

/// DashScope task lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskResult {
    pub output: TaskOutput,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskOutput {
    pub task_id: String,
    pub task_status: TaskStatus,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl TaskResult {
    /// All image URLs in the task output, in order.
    pub fn image_urls(&self) -> Vec<&str> {
        self.output
            .choices
            .iter()
            .flat_map(|choice| choice.message.content.iter())
            .filter_map(|item| item.image.as_deref())
            .collect()
    }
}
