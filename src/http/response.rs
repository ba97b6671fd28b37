//! Relaying DashScope replies to the caller.
//!
//! The upstream status and the original body bytes go back unchanged, so key
//! order and formatting survive. Only the content type is pinned to JSON,
//! which the body is known to be after parsing.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::dashscope::UpstreamReply;

pub fn relay(reply: UpstreamReply) -> Response {
    (
        reply.status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        reply.raw,
    )
        .into_response()
}
