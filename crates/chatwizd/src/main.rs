//! ChatWizard Daemon - behavior-scoring chat bot.
//!
//! Receives message events from a platform adapter over a Unix socket,
//! scores each message via the configured completion backend, and keeps a
//! per-user ledger of running category totals.

use anyhow::Result;
use chatwizd::backend::OpenAiBackend;
use chatwizd::bot::Bot;
use chatwizd::chatlog::MessageLog;
use chatwizd::config::{Config, CONFIG_PATH};
use chatwizd::engine::ScoreEngine;
use chatwizd::ledger::ScoreLedger;
use chatwizd::server;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatwizd")]
#[command(about = "ChatWizard - behavior-scoring chat bot daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = CONFIG_PATH)]
    config: String,

    /// Override the Unix socket path from the config
    #[arg(long)]
    socket: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    info!("ChatWizard daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&cli.config);
    let socket_path = cli.socket.unwrap_or_else(|| config.bot.socket_path.clone());

    // Startup failures are fatal: a corrupt ledger or missing prompt
    // template must stop the daemon, not be papered over.
    let ledger = match ScoreLedger::load(&config.bot.ledger_path) {
        Ok(ledger) => ledger,
        Err(e) => {
            error!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    let backend = Arc::new(OpenAiBackend::new(&config.backend)?);
    let engine = ScoreEngine::new(backend, &config.bot)?;
    let log = MessageLog::new(&config.bot.log_path);

    let bot = Arc::new(Bot::new(engine, ledger, log));
    info!("Tracking scores for {} users", bot.user_count().await);

    server::start_server(&socket_path, bot).await
}
