//! Error types for ChatWizard.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatWizError {
    #[error("Ledger at {path} is not valid JSON: {source}")]
    LedgerParse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Prompt template error: {0}")]
    PromptTemplate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
