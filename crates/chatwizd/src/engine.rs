//! Score engine - turns message text into a tri-state rating per category.
//!
//! One completion round trip per category per message. The three category
//! calls run concurrently; a failure in one never blocks the others. Any
//! unusable backend output is degraded to "not computed" for that category.

use crate::backend::CompletionBackend;
use crate::config::BotConfig;
use anyhow::{Context, Result};
use chatwiz_common::{Category, MessageScores, Rating};
use std::fs;
use std::sync::Arc;
use tracing::warn;

/// Rescaled values outside this band mean the model answered outside the
/// expected 0..10 range.
const SCALE_MIN: f64 = -10.0;
const SCALE_MAX: f64 = 10.0;

pub struct ScoreEngine {
    backend: Arc<dyn CompletionBackend>,
    grammar_prompt: String,
    friendliness_prompt: String,
    humor_prompt: String,
}

impl ScoreEngine {
    /// Load the per-category prompt templates once. A missing template is a
    /// startup error, not a per-message one.
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &BotConfig) -> Result<Self> {
        Ok(Self {
            backend,
            grammar_prompt: read_prompt(&config.grammar_prompt_path)?,
            friendliness_prompt: read_prompt(&config.friendliness_prompt_path)?,
            humor_prompt: read_prompt(&config.humor_prompt_path)?,
        })
    }

    /// Build an engine from in-memory templates. Used by tests.
    pub fn with_prompts(
        backend: Arc<dyn CompletionBackend>,
        grammar: &str,
        friendliness: &str,
        humor: &str,
    ) -> Self {
        Self {
            backend,
            grammar_prompt: grammar.to_string(),
            friendliness_prompt: friendliness.to_string(),
            humor_prompt: humor.to_string(),
        }
    }

    fn prompt_for(&self, category: Category) -> &str {
        match category {
            Category::Grammar => &self.grammar_prompt,
            Category::Friendliness => &self.friendliness_prompt,
            Category::Humor => &self.humor_prompt,
        }
    }

    /// Score one message along all categories.
    pub async fn score_message(&self, text: &str) -> MessageScores {
        let (grammar, friendliness, humor) = tokio::join!(
            self.score_category(Category::Grammar, text),
            self.score_category(Category::Friendliness, text),
            self.score_category(Category::Humor, text),
        );

        MessageScores {
            grammar,
            friendliness,
            humor,
        }
    }

    /// Score a single category. All failures - transport, auth, unusable
    /// output - collapse to `None` here and never propagate.
    async fn score_category(&self, category: Category, text: &str) -> Option<Rating> {
        let prompt = format!("{}{}", self.prompt_for(category), text);

        match self.backend.complete(&prompt).await {
            Ok(raw) => {
                let rating = normalize(&raw);
                if rating.is_none() {
                    warn!(
                        "Backend output for {} was not a usable score: {:?}",
                        category.name(),
                        raw.trim()
                    );
                }
                rating
            }
            Err(e) => {
                warn!("Scoring call for {} failed: {}", category.name(), e);
                None
            }
        }
    }
}

fn read_prompt(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read prompt template {}", path))
}

/// Normalize one raw completion into a tri-state rating.
///
/// Parse as integer, rescale `((v / 5) - 1) * 10` onto -10..10, then bucket.
/// Zero is its own neutral bucket. Anything unparsable or out of range is
/// "not computed".
pub fn normalize(raw: &str) -> Option<Rating> {
    let value: i64 = raw.trim().parse().ok()?;
    let scaled = ((value as f64 / 5.0) - 1.0) * 10.0;

    if !(SCALE_MIN..=SCALE_MAX).contains(&scaled) {
        return None;
    }

    if scaled < 0.0 {
        Some(Rating::Negative)
    } else if scaled == 0.0 {
        Some(Rating::Neutral)
    } else {
        Some(Rating::Positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FakeBackend;

    #[test]
    fn test_normalize_seven_is_positive() {
        // ((7/5)-1)*10 = 4.0
        assert_eq!(normalize("7"), Some(Rating::Positive));
    }

    #[test]
    fn test_normalize_five_is_neutral() {
        assert_eq!(normalize("5"), Some(Rating::Neutral));
    }

    #[test]
    fn test_normalize_low_values_are_negative() {
        for raw in ["0", "1", "2", "3", "4"] {
            assert_eq!(normalize(raw), Some(Rating::Negative), "raw {}", raw);
        }
    }

    #[test]
    fn test_normalize_full_valid_range_stays_in_band() {
        // Every v in 0..=10 rescales into [-10, 10] and gets a rating.
        for v in 0..=10 {
            assert!(normalize(&v.to_string()).is_some(), "v {}", v);
        }
    }

    #[test]
    fn test_normalize_out_of_range_is_sentinel() {
        assert_eq!(normalize("11"), None);
        assert_eq!(normalize("-1"), None);
        assert_eq!(normalize("100"), None);
    }

    #[test]
    fn test_normalize_non_integer_is_sentinel() {
        assert_eq!(normalize("abc"), None);
        assert_eq!(normalize("7.5"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("seven out of ten"), None);
    }

    #[test]
    fn test_normalize_tolerates_whitespace() {
        assert_eq!(normalize(" 8\n"), Some(Rating::Positive));
    }

    fn engine(backend: FakeBackend) -> ScoreEngine {
        ScoreEngine::with_prompts(
            Arc::new(backend),
            "Rate the grammar 0-10: ",
            "Rate the friendliness 0-10: ",
            "Rate the humor 0-10: ",
        )
    }

    #[tokio::test]
    async fn test_score_message_all_categories() {
        let backend = FakeBackend::new()
            .respond("grammar", "7")
            .respond("friendliness", "5")
            .respond("humor", "2");
        let scores = engine(backend).score_message("hello there").await;
        assert_eq!(scores.grammar, Some(Rating::Positive));
        assert_eq!(scores.friendliness, Some(Rating::Neutral));
        assert_eq!(scores.humor, Some(Rating::Negative));
    }

    #[tokio::test]
    async fn test_one_bad_category_does_not_block_others() {
        let backend = FakeBackend::new()
            .respond("grammar", "abc")
            .respond("friendliness", "9")
            .respond("humor", "42");
        let scores = engine(backend).score_message("hi").await;
        assert_eq!(scores.grammar, None);
        assert_eq!(scores.friendliness, Some(Rating::Positive));
        assert_eq!(scores.humor, None);
    }

    #[tokio::test]
    async fn test_backend_failure_degrades_to_sentinel() {
        let scores = engine(FakeBackend::failing()).score_message("hi").await;
        assert_eq!(scores.grammar, None);
        assert_eq!(scores.friendliness, None);
        assert_eq!(scores.humor, None);
    }
}
