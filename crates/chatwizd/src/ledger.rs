//! Score ledger - durable per-user category totals.
//!
//! The whole mapping is one JSON document, loaded once at startup and
//! rewritten in full after every mutation. Callers must serialize mutations
//! through a single writer (the bot holds the ledger behind a mutex).

use chatwiz_common::{CategoryTotals, ChatWizError, MessageScores};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct ScoreLedger {
    path: PathBuf,
    users: HashMap<String, CategoryTotals>,
}

impl ScoreLedger {
    /// Load the ledger from disk. A missing file is an empty ledger; a file
    /// that exists but does not parse is a fatal error - resetting it
    /// silently would discard every user's history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ChatWizError> {
        let path = path.into();
        if !path.exists() {
            info!("No ledger at {}, starting empty", path.display());
            return Ok(Self {
                path,
                users: HashMap::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let users: HashMap<String, CategoryTotals> =
            serde_json::from_str(&content).map_err(|source| ChatWizError::LedgerParse {
                path: path.display().to_string(),
                source,
            })?;

        info!("Loaded ledger with {} users from {}", users.len(), path.display());
        Ok(Self { path, users })
    }

    /// Current totals for a user, if any.
    pub fn get(&self, user_id: &str) -> Option<&CategoryTotals> {
        self.users.get(user_id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Overwrite the user's record with the baseline and persist.
    pub fn reset(&mut self, user_id: &str) -> Result<(), ChatWizError> {
        self.users
            .insert(user_id.to_string(), CategoryTotals::baseline());
        self.persist()
    }

    /// Apply one message's scores to the user's running totals and persist.
    /// A never-seen user starts from the baseline. Unscored categories add
    /// nothing. Returns the updated totals.
    pub fn accumulate(
        &mut self,
        user_id: &str,
        scores: &MessageScores,
    ) -> Result<CategoryTotals, ChatWizError> {
        let totals = self
            .users
            .entry(user_id.to_string())
            .or_insert_with(CategoryTotals::baseline);
        totals.apply(scores);
        let updated = totals.clone();
        self.persist()?;
        Ok(updated)
    }

    /// Rewrite the full document.
    pub fn persist(&self) -> Result<(), ChatWizError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.users)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
