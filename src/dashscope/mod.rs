//! DashScope (Alibaba Cloud Model Studio) upstream integration.
//!
//! # Endpoints
//! - `POST {base}/services/aigc/multimodal-generation/generation` (async task)
//! - `GET {base}/tasks/{task_id}`

pub mod client;
pub mod types;

pub use client::DashScopeClient;
pub use types::{GenerationRequest, UpstreamReply, DEFAULT_SIZE};
