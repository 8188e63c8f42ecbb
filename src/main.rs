use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use legalease_backend::api::{create_api, AppState};
use legalease_backend::config::AppConfig;
use legalease_backend::providers::gemini::gemini::GeminiProvider;
use legalease_backend::providers::traits::CompletionProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Legal document analysis API", long_about = None)]
struct Args {
    /// Gemini API key (overrides GOOGLE_API_KEY)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref(), args.verbose))
        .with(tracing_subscriber::fmt::layer())
        .init();

    run_api_server(args).await
}

/// RUST_LOG wins when it parses; --verbose only picks the fallback level.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = if verbose { Level::DEBUG } else { Level::INFO };
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback.as_str().to_lowercase()))
}

async fn run_api_server(args: Args) -> anyhow::Result<()> {
    let config = match args.api_key.clone() {
        Some(key) => AppConfig::from_lookup(|name| match name {
            "GOOGLE_API_KEY" => Some(key.clone()),
            other => std::env::var(other).ok(),
        })?,
        None => AppConfig::from_env()?,
    };

    let provider: Arc<dyn CompletionProvider> = Arc::new(GeminiProvider::new(&config));
    info!("Using model {}", provider.model_name());

    let state = AppState::new(provider).context("Failed to build HTTP client")?;
    let app = create_api(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
