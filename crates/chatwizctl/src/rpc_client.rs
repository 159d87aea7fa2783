//! Socket client for talking to the ChatWizard daemon.

use anyhow::{anyhow, Context, Result};
use chatwiz_common::ipc::{Event, Reply, Request, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

const DEFAULT_SOCKET: &str = "/run/chatwizard/chatwiz.sock";

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

pub struct RpcClient {
    reader: BufReader<tokio::net::unix::OwnedReadHalf>,
    writer: tokio::net::unix::OwnedWriteHalf,
}

impl RpcClient {
    /// Discover the socket path.
    ///
    /// Priority:
    /// 1. Explicit --socket flag
    /// 2. $CHATWIZD_SOCKET environment variable
    /// 3. /run/chatwizard/chatwiz.sock (default)
    pub fn discover_socket_path(explicit_path: Option<&str>) -> String {
        if let Some(path) = explicit_path {
            return path.to_string();
        }

        if let Ok(path) = std::env::var("CHATWIZD_SOCKET") {
            return path;
        }

        DEFAULT_SOCKET.to_string()
    }

    pub async fn connect(socket_path: Option<&str>) -> Result<Self> {
        let path = Self::discover_socket_path(socket_path);

        match tokio::time::timeout(Duration::from_millis(500), UnixStream::connect(&path)).await {
            Ok(Ok(stream)) => {
                let (reader, writer) = stream.into_split();
                let reader = BufReader::new(reader);
                Ok(Self { reader, writer })
            }
            Ok(Err(e)) => Err(anyhow!("Daemon unavailable at {}: {}", path, e)),
            Err(_) => Err(anyhow!("Connection to {} timed out", path)),
        }
    }

    /// Send one event and wait for the matching reply.
    pub async fn call(&mut self, event: Event) -> Result<Reply> {
        let request = Request {
            id: REQUEST_ID.fetch_add(1, Ordering::SeqCst),
            event,
        };

        let request_json = serde_json::to_string(&request)? + "\n";
        self.writer
            .write_all(request_json.as_bytes())
            .await
            .context("Failed to write request")?;

        let mut line = String::new();
        let bytes_read = self
            .reader
            .read_line(&mut line)
            .await
            .context("Failed to read response")?;
        if bytes_read == 0 {
            return Err(anyhow!("Daemon closed the connection"));
        }

        let response: Response = serde_json::from_str(&line).context("Invalid response JSON")?;
        if response.id != request.id {
            return Err(anyhow!(
                "Response id {} does not match request id {}",
                response.id,
                request.id
            ));
        }

        response.result.map_err(|e| anyhow!("Daemon error: {}", e))
    }
}
