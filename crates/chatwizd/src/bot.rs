//! Bot - command dispatch and reply formatting.
//!
//! Driven by the event server through `handle_message`; owns the ledger
//! behind a mutex so every load-mutate-persist cycle runs as one critical
//! section no matter which connection or user triggered it.

use crate::chatlog::MessageLog;
use crate::engine::ScoreEngine;
use crate::ledger::ScoreLedger;
use anyhow::Result;
use chatwiz_common::{Category, CategoryTotals, MessageScores};
use tokio::sync::Mutex;
use tracing::{info, warn};

const HELP_TEXT: &str =
    "**!help:** To get help\n**!me:** To see your stats\n**!reset:** Reset your stats";

pub struct Bot {
    engine: ScoreEngine,
    ledger: Mutex<ScoreLedger>,
    log: MessageLog,
}

impl Bot {
    pub fn new(engine: ScoreEngine, ledger: ScoreLedger, log: MessageLog) -> Self {
        Self {
            engine,
            ledger: Mutex::new(ledger),
            log,
        }
    }

    /// Process one inbound message and produce the reply text.
    pub async fn handle_message(
        &self,
        author_id: &str,
        author_name: &str,
        content: &str,
    ) -> Result<String> {
        // The log is a best-effort sink; a failed append must not take the
        // scoring pipeline down with it.
        if let Err(e) = self.log.append(author_name, content) {
            warn!("Failed to append to message log: {}", e);
        }

        if content.starts_with("!help") {
            Ok(HELP_TEXT.to_string())
        } else if content.starts_with("!me") {
            self.stats_reply(author_id).await
        } else if content.starts_with("!reset") {
            self.reset_reply(author_id).await
        } else {
            self.score_reply(author_id, content).await
        }
    }

    async fn stats_reply(&self, author_id: &str) -> Result<String> {
        let ledger = self.ledger.lock().await;
        match ledger.get(author_id) {
            Some(totals) => Ok(format_totals(totals)),
            None => Ok("Sorry, I couldn't find your scores.".to_string()),
        }
    }

    async fn reset_reply(&self, author_id: &str) -> Result<String> {
        let mut ledger = self.ledger.lock().await;
        ledger.reset(author_id)?;
        info!("Reset scores for user {}", author_id);
        Ok("Your scores have reset!".to_string())
    }

    /// Full pipeline: score every category, format the feedback, then apply
    /// the deltas under the ledger lock. All scoring calls settle before the
    /// ledger is touched.
    async fn score_reply(&self, author_id: &str, content: &str) -> Result<String> {
        let scores = self.engine.score_message(content).await;
        let reply = format_scores(&scores);

        let mut ledger = self.ledger.lock().await;
        ledger.accumulate(author_id, &scores)?;
        Ok(reply)
    }

    /// Current user count, for status logging.
    pub async fn user_count(&self) -> usize {
        self.ledger.lock().await.len()
    }
}

/// One line per category: the rating word, or "Not calculated" when the
/// category could not be scored. Raw sentinel values never reach the user.
fn format_scores(scores: &MessageScores) -> String {
    let mut lines = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        match scores.get(category) {
            Some(rating) => {
                lines.push(format!("{}: **{}**", category.label(), rating.word(category)))
            }
            None => lines.push(format!("{}: **Not calculated**", category.label())),
        }
    }
    lines.join("\n")
}

fn format_totals(totals: &CategoryTotals) -> String {
    Category::ALL
        .iter()
        .map(|&c| format!("{}: **{}**", c.label(), totals.get(c)))
        .collect::<Vec<_>>()
        .join("\n")
}
