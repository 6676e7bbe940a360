use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use symptom_triage_core::TriageContext;
use symptom_triage_server::{create_router, AppState};

const DEFAULT_LOG_FILTER: &str = "symptom_triage_server=info,symptom_triage_core=info";
const VERBOSE_LOG_FILTER: &str = "symptom_triage_server=debug,symptom_triage_core=debug,tower_http=debug";

/// Symptom triage HTTP server
#[derive(Parser, Debug)]
#[command(name = "triage-server")]
#[command(about = "Predicts a condition and department from free-text symptoms")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Directory holding features.json, synonyms.json, departments.json,
    /// model.json and labels.json
    #[arg(short, long, env = "TRIAGE_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting triage server");

    let ctx = TriageContext::load(&args.config_dir).with_context(|| {
        format!("failed to load config from {}", args.config_dir.display())
    })?;
    let app = create_router(AppState::new(ctx));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!(%addr, "Listening");
    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}

/// RUST_LOG wins over the defaults.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
