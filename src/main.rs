//! Qwen image proxy server.
//!
//! ```text
//!   Browser / client                 proxy                      DashScope
//!   ────────────────   POST /api/qwen/generate   ──────────▶  POST .../multimodal-generation/generation
//!                      GET  /api/qwen/task/{id}  ──────────▶  GET  .../tasks/{id}
//!                      ◀── upstream status + body, unchanged ──
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use qwen_image_proxy::config::{resolve_config, validation::validate_config, ConfigError};
use qwen_image_proxy::lifecycle::{signals::wait_for_signal, Shutdown};
use qwen_image_proxy::observability::{logging, metrics};
use qwen_image_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "qwen-image-proxy")]
#[command(about = "Proxy for DashScope Qwen image generation", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8080).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = resolve_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("qwen-image-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        region = ?config.dashscope.region,
        upstream_timeout_secs = ?config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.dashscope.api_key.is_none() {
        tracing::warn!("DASHSCOPE_API_KEY is not set; upstream calls will answer 500");
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
