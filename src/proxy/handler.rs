//! The proxy core: validate, resolve configuration, forward once.

use std::sync::Arc;

use crate::config::schema::{DashScopeConfig, ProxyConfig};
use crate::dashscope::{DashScopeClient, GenerationRequest, UpstreamReply};
use crate::error::{ProxyError, ProxyResult};

/// Stateless forwarder for the two DashScope operations.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct ProxyHandler {
    config: Arc<DashScopeConfig>,
    client: DashScopeClient,
}

impl ProxyHandler {
    pub fn new(config: &ProxyConfig) -> ProxyResult<Self> {
        Ok(Self {
            config: Arc::new(config.dashscope.clone()),
            client: DashScopeClient::new(&config.timeouts)?,
        })
    }

    /// Forward a generation request.
    ///
    /// Input is validated before configuration, so a bad request is a 400
    /// even when the proxy is not configured.
    pub async fn submit(&self, request: GenerationRequest) -> ProxyResult<UpstreamReply> {
        if request.prompt.is_empty() {
            return Err(ProxyError::missing_prompt());
        }
        let api_key = self.api_key()?;

        let reply = self
            .client
            .submit_generation(&self.config, api_key, &request)
            .await?;

        log_reply("generate", &reply);
        Ok(reply)
    }

    /// Forward a task status query.
    pub async fn query_status(&self, task_id: &str) -> ProxyResult<UpstreamReply> {
        if task_id.is_empty() {
            return Err(ProxyError::missing_task_id());
        }
        let api_key = self.api_key()?;

        let reply = self.client.query_task(&self.config, api_key, task_id).await?;

        log_reply("task", &reply);
        Ok(reply)
    }

    fn api_key(&self) -> ProxyResult<&str> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => {
                tracing::error!("DASHSCOPE_API_KEY not configured");
                Err(ProxyError::missing_api_key())
            }
        }
    }
}

fn log_reply(operation: &'static str, reply: &UpstreamReply) {
    if reply.is_error() {
        tracing::warn!(
            operation,
            status = %reply.status,
            code = reply.error_code().unwrap_or("unknown"),
            message = reply.error_message().unwrap_or(""),
            request_id = reply.request_id().unwrap_or(""),
            "DashScope reported an error"
        );
    } else {
        tracing::info!(
            operation,
            status = %reply.status,
            task_id = reply.task_id().unwrap_or(""),
            task_status = reply.task_status().unwrap_or(""),
            "DashScope request completed"
        );
    }
}
