//! Qwen image generation proxy.
//!
//! Two endpoints that forward to DashScope's `qwen-image-plus` model:
//! `POST /api/qwen/generate` submits an asynchronous task and
//! `GET /api/qwen/task/{task_id}` polls it. Upstream status codes and bodies
//! are relayed unchanged.

pub mod config;
pub mod dashscope;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::ProxyHandler;
