//! End-to-end tests: real listener, SDK client, mock DashScope.

use std::net::SocketAddr;
use std::time::Duration;

use qwen_image_proxy::lifecycle::Shutdown;
use qwen_image_proxy::{HttpServer, ProxyConfig};
use qwen_image_sdk::{
    ErrorCode, GenerateImageOptions, GenerationOutcome, ProxyClient, SdkError, TaskStatus,
};

mod common;

/// Spawn the proxy on an ephemeral port.
async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

fn dashscope_reply(request: &common::CapturedRequest) -> (u16, String) {
    if request.method == "POST" {
        return (
            200,
            r#"{"output":{"task_status":"PENDING","task_id":"86ecf553"},"request_id":"5143cd04"}"#.into(),
        );
    }
    match request.path.rsplit('/').next() {
        Some("86ecf553") => (
            200,
            r#"{"request_id":"b1","output":{"task_id":"86ecf553","task_status":"SUCCEEDED",
                "choices":[{"finish_reason":"stop","message":{"role":"assistant",
                "content":[{"image":"https://dashscope-result.example/fox.png","type":"image"}]}}]}}"#
                .into(),
        ),
        _ => (
            404,
            r#"{"request_id":"b2","code":"TaskNotFound","message":"task does not exist"}"#.into(),
        ),
    }
}

#[tokio::test]
async fn test_generate_then_poll_through_sdk() {
    let upstream = common::start_programmable_upstream(dashscope_reply).await;
    let (addr, shutdown) = start_proxy(upstream.config(Some("sk-e2e"))).await;
    let client = ProxyClient::new(&format!("http://{}", addr));

    let outcome = client
        .generate_image("a red fox in snow", &GenerateImageOptions::default())
        .await
        .unwrap();
    let task_id = match outcome {
        GenerationOutcome::Task { task_id, request_id } => {
            assert_eq!(request_id.as_deref(), Some("5143cd04"));
            task_id
        }
        other => panic!("expected async task, got {other:?}"),
    };

    let result = client.get_task_result(&task_id).await.unwrap();
    assert_eq!(result.output.task_status, TaskStatus::Succeeded);
    assert_eq!(
        result.image_urls(),
        vec!["https://dashscope-result.example/fox.png"]
    );

    let requests = upstream.requests();
    assert_eq!(requests.len(), 2);
    // SDK defaults: prompt extension on, no watermark.
    assert_eq!(requests[0].json()["parameters"]["prompt_extend"], true);
    assert_eq!(requests[0].json()["parameters"]["watermark"], false);
    assert_eq!(requests[1].path, "/api/v1/tasks/86ecf553");

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_error_classified_by_sdk() {
    let upstream = common::start_programmable_upstream(dashscope_reply).await;
    let (addr, shutdown) = start_proxy(upstream.config(Some("sk-e2e"))).await;
    let client = ProxyClient::new(&format!("http://{}", addr));

    match client.get_task_result("expired").await {
        Err(SdkError::Api { status, info }) => {
            assert_eq!(status, 404);
            assert_eq!(info.code, ErrorCode::TaskNotFound);
            assert!(info.is_retryable());
        }
        other => panic!("expected API error, got {other:?}"),
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_sdk_task_id_with_slash_reaches_upstream() {
    let upstream = common::start_programmable_upstream(dashscope_reply).await;
    let (addr, shutdown) = start_proxy(upstream.config(Some("sk-e2e"))).await;
    let client = ProxyClient::new(&format!("http://{}", addr));

    match client.get_task_result("a/b").await {
        Err(SdkError::Api { status, info }) => {
            assert_eq!(status, 404);
            assert_eq!(info.code, ErrorCode::TaskNotFound);
        }
        other => panic!("expected upstream TaskNotFound, got {other:?}"),
    }

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/v1/tasks/a%2Fb");

    shutdown.trigger();
}

#[tokio::test]
async fn test_proxy_errors_reach_sdk_as_json() {
    let upstream = common::start_programmable_upstream(dashscope_reply).await;
    let (addr, shutdown) = start_proxy(upstream.config(None)).await;
    let client = ProxyClient::new(&format!("http://{}", addr));

    match client.generate_image("a red fox", &GenerateImageOptions::default()).await {
        Err(SdkError::Api { status, info }) => {
            assert_eq!(status, 500);
            assert_eq!(info.user_message, "DASHSCOPE_API_KEY not configured");
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert_eq!(upstream.request_count(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_listener() {
    let upstream = common::start_mock_upstream(200, "{}").await;
    let (addr, shutdown) = start_proxy(upstream.config(None)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client.get(format!("http://{}/health", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    drop(res);
    drop(client);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let fresh = reqwest::Client::builder().no_proxy().build().unwrap();
    assert!(fresh.get(format!("http://{}/health", addr)).send().await.is_err());
}
