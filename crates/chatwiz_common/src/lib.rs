//! Shared types for ChatWizard - domain model, IPC protocol, errors.

pub mod error;
pub mod ipc;
pub mod score;

pub use error::ChatWizError;
pub use score::{Category, CategoryTotals, MessageScores, Rating};
