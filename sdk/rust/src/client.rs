use reqwest::{Client, Response, Url};
use serde_json::Value;

use crate::errors::{ApiErrorInfo, SdkError};
use crate::types::{GenerateBody, GenerateImageOptions, GenerationOutcome, TaskResult};

pub struct ProxyClient {
    client: Client,
    proxy_url: String,
}

impl ProxyClient {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a prompt. Returns the image directly when the upstream answered
    /// synchronously, otherwise the task to poll.
    pub async fn generate_image(
        &self,
        prompt: &str,
        options: &GenerateImageOptions,
    ) -> Result<GenerationOutcome, SdkError> {
        let body = GenerateBody {
            prompt,
            size: &options.size,
            prompt_extend: options.prompt_extend,
            watermark: options.watermark,
        };

        let resp = self
            .client
            .post(self.endpoint(&["api", "qwen", "generate"])?)
            .json(&body)
            .send()
            .await?;

        let reply: Value = read_json(resp).await?;
        GenerationOutcome::from_reply(&reply).ok_or_else(|| {
            SdkError::InvalidResponse("API response missing both image URL and task_id".into())
        })
    }

    /// Fetch the current state of a task.
    pub async fn get_task_result(&self, task_id: &str) -> Result<TaskResult, SdkError> {
        let resp = self
            .client
            .get(self.endpoint(&["api", "qwen", "task", task_id])?)
            .send()
            .await?;

        let reply: Value = read_json(resp).await?;
        serde_json::from_value(reply).map_err(|e| SdkError::InvalidResponse(e.to_string()))
    }

    /// Proxy URL plus path segments. Segments are percent-encoded, so a task
    /// id containing `/` or `?` stays one segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SdkError> {
        let invalid = || SdkError::InvalidUrl(self.proxy_url.clone());

        let mut url = Url::parse(&self.proxy_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn read_json(resp: Response) -> Result<Value, SdkError> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(SdkError::Api {
            status: status.as_u16(),
            info: ApiErrorInfo::parse(status.as_u16(), &text),
        });
    }

    serde_json::from_str(&text).map_err(|e| SdkError::InvalidResponse(e.to_string()))
}
