use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use sumserve::config::Settings;
use sumserve::server::{ApiServer, AppState};
use sumserve::{client, logging, summarizer};

#[derive(Parser)]
#[command(name = "sumserve", version, about = "Text summarization service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the summarization server (default)
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
        /// Directory holding default.toml / local.toml
        #[arg(long)]
        config_dir: Option<PathBuf>,
    },
    /// Summarize a file (or stdin) using a running server
    Summarize {
        /// Text file to summarize; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        url: String,
    },
    /// Summarize lines typed at a prompt
    Interactive {
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        url: String,
    },
}

/// Entry point. With no subcommand the server is started with the
/// configuration found in `./config`.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { host: None, port: None, config_dir: None }) {
        Command::Serve { host, port, config_dir } => serve(host, port, config_dir).await,
        Command::Summarize { file, url } => client::run_once(&url, file.as_deref()).await,
        Command::Interactive { url } => client::interactive_loop(&url).await,
    }
}

async fn serve(host: Option<String>, port: Option<u16>, config_dir: Option<PathBuf>) -> Result<()> {
    let mut settings = match config_dir {
        Some(dir) => Settings::from_dir(&dir),
        None => Settings::new(),
    }
    .context("failed to load configuration")?;

    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let _guard = logging::init(&settings).map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    info!("sumserve starting up...");
    if settings.server.debug {
        warn!("Debug mode is on; do not expose this server publicly");
    }

    // Loaded exactly once, before the listener accepts connections
    let summarizer = summarizer::initialize(&settings.model);

    let server = ApiServer::new(
        AppState::new(summarizer),
        settings.server.host.clone(),
        settings.server.port,
    );
    server
        .start()
        .await
        .map_err(|e| anyhow!("server error: {}", e))?;

    Ok(())
}
