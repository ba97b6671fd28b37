//! Axum handlers for the inbound API.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::dashscope::{GenerationRequest, UpstreamReply};
use crate::error::{ProxyError, ProxyResult};
use crate::http::response::relay;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `POST /api/qwen/generate`
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = match payload {
        Ok(Json(request)) => state.proxy.submit(request).await,
        Err(rejection) => Err(ProxyError::from(rejection)),
    };
    respond("generate", result, start)
}

/// `GET /api/qwen/task/{task_id}`
pub async fn task_status(
    State(state): State<AppState>,
    task_id: Result<Path<String>, PathRejection>,
) -> Response {
    let start = Instant::now();
    let result = match task_id {
        Ok(Path(task_id)) => state.proxy.query_status(&task_id).await,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Rejected task id");
            Err(ProxyError::invalid_task_id())
        }
    };
    respond("task", result, start)
}

/// `GET /api/qwen/task/` with nothing after the slash.
pub async fn missing_task_id() -> Response {
    respond("task", Err(ProxyError::missing_task_id()), Instant::now())
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

fn respond(operation: &'static str, result: ProxyResult<UpstreamReply>, start: Instant) -> Response {
    let response = match result {
        Ok(reply) => relay(reply),
        Err(e) => {
            tracing::info!(operation, kind = e.kind(), error = %e, "Request failed");
            e.into_response()
        }
    };
    metrics::record_request(operation, response.status().as_u16(), start);
    response
}
