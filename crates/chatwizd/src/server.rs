//! Event server - Unix socket endpoint for the platform adapter.
//!
//! Newline-delimited JSON requests in, responses out on the same stream.
//! One task per connection; the bot and its ledger are shared via `Arc`.

use crate::bot::Bot;
use anyhow::{Context, Result};
use chatwiz_common::ipc::{Event, Reply, Request, Response};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{error, info, warn};

/// Bind the socket and serve until the process is stopped.
pub async fn start_server(socket_path: &str, bot: Arc<Bot>) -> Result<()> {
    if let Some(socket_dir) = Path::new(socket_path).parent() {
        tokio::fs::create_dir_all(socket_dir)
            .await
            .context("Failed to create socket directory")?;
    }

    // Remove a stale socket from a previous run
    let _ = tokio::fs::remove_file(socket_path).await;

    let listener = UnixListener::bind(socket_path).context("Failed to bind Unix socket")?;
    info!("Event server listening on {}", socket_path);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let bot = Arc::clone(&bot);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, bot).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a single adapter connection.
async fn handle_connection(stream: UnixStream, bot: Arc<Bot>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .context("Failed to read from socket")?;

        if bytes_read == 0 {
            break;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Invalid request JSON: {}", e);
                continue;
            }
        };

        let response = handle_request(request.id, request.event, &bot).await;

        let response_json = serde_json::to_string(&response)? + "\n";
        writer
            .write_all(response_json.as_bytes())
            .await
            .context("Failed to write response")?;
    }

    Ok(())
}

async fn handle_request(id: u64, event: Event, bot: &Bot) -> Response {
    let result = match event {
        Event::Ping => Ok(Reply::Pong),

        Event::Message {
            author_id,
            author_name,
            content,
        } => bot
            .handle_message(&author_id, &author_name, &content)
            .await
            .map(Reply::Text)
            .map_err(|e| e.to_string()),
    };

    Response { id, result }
}
