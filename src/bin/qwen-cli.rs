use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "qwen-cli")]
#[command(about = "Command line client for the Qwen image proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an image generation task
    Generate {
        prompt: String,

        /// Output size, e.g. 1328*1328 or 1920*1080
        #[arg(short, long)]
        size: Option<String>,

        /// Let the model rewrite the prompt
        #[arg(long)]
        prompt_extend: bool,

        /// Add the DashScope watermark
        #[arg(long)]
        watermark: bool,
    },
    /// Query a task by id
    Task { task_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Generate {
            prompt,
            size,
            prompt_extend,
            watermark,
        } => {
            let mut body = json!({
                "prompt": prompt,
                "prompt_extend": prompt_extend,
                "watermark": watermark,
            });
            if let Some(size) = size {
                body["size"] = Value::String(size);
            }
            client
                .post(endpoint(&cli.url, &["api", "qwen", "generate"])?)
                .json(&body)
                .send()
                .await?
        }
        Commands::Task { task_id } => {
            client
                .get(endpoint(&cli.url, &["api", "qwen", "task", task_id.as_str()])?)
                .send()
                .await?
        }
    };

    print_response(res).await
}

/// Append percent-encoded path segments to the proxy URL.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("Invalid proxy URL '{}'", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: proxy returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}
