//! Append-only message log: one `name: content` line per inbound message.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct MessageLog {
    path: PathBuf,
}

impl MessageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one line, creating the file with a header line first if it
    /// does not exist yet.
    pub fn append(&self, author_name: &str, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let existed = self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;

        if !existed {
            writeln!(file, "Log file created.")?;
        }
        writeln!(file, "{}: {}", author_name, content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
