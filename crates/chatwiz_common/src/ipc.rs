//! IPC protocol between the daemon and a platform adapter.
//!
//! Newline-delimited JSON over a Unix socket. The adapter owns the chat
//! platform connection; the daemon only sees message events and produces
//! reply text.

use serde::{Deserialize, Serialize};

/// Request from adapter to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub event: Event,
}

/// Response from daemon to adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    pub result: Result<Reply, String>,
}

/// Inbound events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Event {
    /// A user posted a message.
    Message {
        author_id: String,
        author_name: String,
        content: String,
    },

    /// Health check.
    Ping,
}

/// Reply to be rendered in the channel the event came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Reply {
    Text(String),
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trip() {
        let request = Request {
            id: 7,
            event: Event::Message {
                author_id: "42".to_string(),
                author_name: "alice".to_string(),
                content: "!me".to_string(),
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, 7);
        match back.event {
            Event::Message { author_id, .. } => assert_eq!(author_id, "42"),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
