//! Scoring domain model - categories, per-message ratings, per-user totals.

use serde::{Deserialize, Serialize};

/// Baseline total every category starts at for a new user.
pub const BASELINE: i64 = 10;

/// Behavioral category being scored. Fixed, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Grammar,
    Friendliness,
    Humor,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Grammar, Category::Friendliness, Category::Humor];

    /// Stable lowercase name, matching the ledger JSON field names.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Grammar => "grammar",
            Category::Friendliness => "friendliness",
            Category::Humor => "humor",
        }
    }

    /// Capitalized label for user-facing reply text.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Grammar => "Grammar",
            Category::Friendliness => "Friendliness",
            Category::Humor => "Humor",
        }
    }
}

/// Tri-state rating for one category on one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Negative,
    Neutral,
    Positive,
}

impl Rating {
    /// Increment applied to the running total.
    pub fn delta(&self) -> i64 {
        match self {
            Rating::Negative => -1,
            Rating::Neutral => 0,
            Rating::Positive => 1,
        }
    }

    /// User-facing word for this rating in the given category.
    pub fn word(&self, category: Category) -> &'static str {
        match category {
            Category::Grammar => match self {
                Rating::Positive => "Appropriate",
                Rating::Neutral => "Mediocre",
                Rating::Negative => "Bad",
            },
            Category::Friendliness => match self {
                Rating::Positive => "Friendly",
                Rating::Neutral => "Natural",
                Rating::Negative => "Not friendly",
            },
            Category::Humor => match self {
                Rating::Positive => "Funny",
                Rating::Neutral => "Mediocre",
                Rating::Negative => "Not funny",
            },
        }
    }
}

/// Per-message scoring result. `None` means the category could not be
/// scored for this message (backend failure or unusable output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageScores {
    pub grammar: Option<Rating>,
    pub friendliness: Option<Rating>,
    pub humor: Option<Rating>,
}

impl MessageScores {
    pub fn get(&self, category: Category) -> Option<Rating> {
        match category {
            Category::Grammar => self.grammar,
            Category::Friendliness => self.friendliness,
            Category::Humor => self.humor,
        }
    }

    pub fn set(&mut self, category: Category, rating: Option<Rating>) {
        match category {
            Category::Grammar => self.grammar = rating,
            Category::Friendliness => self.friendliness = rating,
            Category::Humor => self.humor = rating,
        }
    }
}

fn default_total() -> i64 {
    BASELINE
}

/// Running per-user totals, one signed counter per category.
///
/// Every field defaults to the baseline, so a record persisted before a
/// category existed loads with that category filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    #[serde(default = "default_total")]
    pub grammar: i64,
    #[serde(default = "default_total")]
    pub friendliness: i64,
    #[serde(default = "default_total")]
    pub humor: i64,
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::baseline()
    }
}

impl CategoryTotals {
    /// Starting record for a never-seen user.
    pub fn baseline() -> Self {
        Self {
            grammar: BASELINE,
            friendliness: BASELINE,
            humor: BASELINE,
        }
    }

    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::Grammar => self.grammar,
            Category::Friendliness => self.friendliness,
            Category::Humor => self.humor,
        }
    }

    /// Add each rated category's delta to the running totals.
    /// Unscored categories contribute nothing.
    pub fn apply(&mut self, scores: &MessageScores) {
        for category in Category::ALL {
            if let Some(rating) = scores.get(category) {
                match category {
                    Category::Grammar => self.grammar += rating.delta(),
                    Category::Friendliness => self.friendliness += rating.delta(),
                    Category::Humor => self.humor += rating.delta(),
                }
            }
        }
    }
}
