//! Client for the Qwen image proxy.
//!
//! Submits prompts and reads task state. Polling cadence is left to the
//! caller.

pub mod client;
pub mod errors;
pub mod types;

pub use client::ProxyClient;
pub use errors::{ApiErrorInfo, ErrorCode, SdkError};
pub use types::{GenerateImageOptions, GenerationOutcome, TaskResult, TaskStatus};
