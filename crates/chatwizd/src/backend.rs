//! Scoring backend - chat-completion client for category scoring.
//!
//! Production code uses `OpenAiBackend` against a real chat-completion API.
//! Test code uses `FakeBackend` with pre-configured responses.

use crate::config::BackendConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Trait abstraction over one "complete this prompt" round trip.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Backend speaking the OpenAI chat-completions wire format.
pub struct OpenAiBackend {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiBackend {
    /// Build the backend from config. The API key is read from the
    /// environment once; a missing key is reported per request so the
    /// engine can degrade that category instead of failing startup.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let api_key = std::env::var(&config.api_key_env).ok();

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No API key provided"))?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt},
            ],
        });

        let response = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Completion request failed: {}", response.status()));
        }

        let json: serde_json::Value = response.json().await?;
        let text = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| anyhow!("Completion response missing message content"))?
            .to_string();

        Ok(text)
    }
}

/// Deterministic backend for tests: maps a prompt substring to a canned
/// response, or fails when `fail_all` is set.
pub struct FakeBackend {
    pub responses: Vec<(String, String)>,
    pub fail_all: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            fail_all: false,
        }
    }

    pub fn respond(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
        self
    }

    pub fn failing() -> Self {
        Self {
            responses: Vec::new(),
            fail_all: true,
        }
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.fail_all {
            return Err(anyhow!("backend unavailable"));
        }
        for (needle, response) in &self.responses {
            if prompt.contains(needle) {
                return Ok(response.clone());
            }
        }
        Err(anyhow!("no canned response for prompt"))
    }
}
