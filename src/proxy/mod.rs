//! Proxy subsystem.
//!
//! # Data Flow
//! ```text
//! http handler (extract body / path)
//!     → handler.rs (validate input, resolve API key)
//!     → dashscope client (one outbound call)
//!     → UpstreamReply (status + original body)
//!     → relayed unchanged to the caller
//! ```
//!
//! # Design Decisions
//! - No retries, caching or queueing; DashScope owns task state
//! - Upstream 4xx/5xx replies are forwarded, not translated
//! - The outbound call lives inside the inbound request future, so a caller
//!   disconnect drops it

pub mod handler;

pub use handler::ProxyHandler;
