//! Configuration management for chatwizd.
//!
//! Loads settings from a TOML file or uses defaults. Credentials are never
//! stored in the config file; the backend API key is read from the
//! environment variable named by `backend.api_key_env`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/chatwizard/config.toml";

/// Scoring backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the chat-completion API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for category scoring
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "CHATWIZ_API_KEY".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Bot configuration - file paths and socket location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Prompt template for the grammar category
    #[serde(default = "default_grammar_prompt")]
    pub grammar_prompt_path: String,

    /// Prompt template for the friendliness category
    #[serde(default = "default_friendliness_prompt")]
    pub friendliness_prompt_path: String,

    /// Prompt template for the humor category
    #[serde(default = "default_humor_prompt")]
    pub humor_prompt_path: String,

    /// Persisted user-score ledger (single JSON document)
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,

    /// Append-only message log
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Unix socket the platform adapter connects to
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
}

fn default_grammar_prompt() -> String {
    "prompts/grammar.txt".to_string()
}

fn default_friendliness_prompt() -> String {
    "prompts/friendliness.txt".to_string()
}

fn default_humor_prompt() -> String {
    "prompts/humor.txt".to_string()
}

fn default_ledger_path() -> String {
    "/var/lib/chatwizard/user_scores.json".to_string()
}

fn default_log_path() -> String {
    "/var/lib/chatwizard/log.txt".to_string()
}

fn default_socket_path() -> String {
    "/run/chatwizard/chatwiz.sock".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            grammar_prompt_path: default_grammar_prompt(),
            friendliness_prompt_path: default_friendliness_prompt(),
            humor_prompt_path: default_humor_prompt(),
            ledger_path: default_ledger_path(),
            log_path: default_log_path(),
            socket_path: default_socket_path(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub bot: BotConfig,
}

impl Config {
    /// Load config from the given path, or return defaults when absent.
    pub fn load(path: &str) -> Self {
        Self::load_from_path(path).unwrap_or_else(|e| {
            warn!("Config not found, using defaults: {}", e);
            Config::default()
        })
    }

    fn load_from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.model, "gpt-3.5-turbo");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.bot.grammar_prompt_path, "prompts/grammar.txt");
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[backend]
model = "gpt-4"
timeout_secs = 10

[bot]
ledger_path = "/tmp/scores.json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.model, "gpt-4");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.bot.ledger_path, "/tmp/scores.json");
        // Defaults for missing fields
        assert_eq!(config.backend.base_url, "https://api.openai.com");
        assert_eq!(config.bot.log_path, "/var/lib/chatwizard/log.txt");
    }

    #[test]
    fn test_missing_sections_fall_back() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.api_key_env, "CHATWIZ_API_KEY");
        assert_eq!(config.bot.socket_path, "/run/chatwizard/chatwiz.sock");
    }
}
