/*!
# Challenge Schema Definitions

This module defines the column contract of a challenge CSV file and the typed
records that each data row decodes into.

## Column Contract

| column        | required | decoded as                              |
|---------------|----------|-----------------------------------------|
| `identifier`  | yes      | trimmed string                          |
| `name`        | yes      | trimmed string                          |
| `description` | no       | optional string                         |
| `difficulty`  | no       | [`Difficulty`], default `Normal`        |
| `category`    | no       | [`Category`], default `Math`            |
| `question`    | yes      | string, stored verbatim                 |
| `answerKind`  | no       | [`AnswerKind`], default `Text`          |
| `answers`     | yes      | pipe-delimited list, e.g. `42\|42.0`    |
| `hint`        | no       | optional string                         |
| `rewards`     | no       | JSON array of [`RewardEntry`] objects   |
*/

use serde::{Deserialize, Serialize};
use std::fmt;

pub const COL_IDENTIFIER: &str = "identifier";
pub const COL_NAME: &str = "name";
pub const COL_DESCRIPTION: &str = "description";
pub const COL_DIFFICULTY: &str = "difficulty";
pub const COL_CATEGORY: &str = "category";
pub const COL_QUESTION: &str = "question";
pub const COL_ANSWER_KIND: &str = "answerKind";
pub const COL_ANSWERS: &str = "answers";
pub const COL_HINT: &str = "hint";
pub const COL_REWARDS: &str = "rewards";

/// All recognised headers, in export order
pub const CHALLENGE_CSV_HEADERS: &[&str] = &[
    COL_IDENTIFIER,
    COL_NAME,
    COL_DESCRIPTION,
    COL_DIFFICULTY,
    COL_CATEGORY,
    COL_QUESTION,
    COL_ANSWER_KIND,
    COL_ANSWERS,
    COL_HINT,
    COL_REWARDS,
];

/// Headers that must carry a non-blank value on every row
pub const REQUIRED_HEADERS: &[&str] = &[COL_IDENTIFIER, COL_NAME, COL_QUESTION, COL_ANSWERS];

/// Separator inside the `answers` column
pub const ANSWER_SEPARATOR: char = '|';

/// Literal that means "no rewards" in the `rewards` column
pub const EMPTY_REWARDS_TOKEN: &str = "[]";

// ================================================================================================
// Enumerated Columns
// ================================================================================================

/// An enum whose members are spelled out by name in the CSV.
pub trait NamedVariant: Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Case-insensitive match against the member names
    fn from_name(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(token))
    }
}

/// Difficulty tier, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    VeryEasy,
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
}

impl NamedVariant for Difficulty {
    const ALL: &'static [Self] = &[
        Self::VeryEasy,
        Self::Easy,
        Self::Normal,
        Self::Hard,
        Self::VeryHard,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::VeryEasy => "VeryEasy",
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::VeryHard => "VeryHard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Math,
    Logic,
    Memory,
    Quiz,
    Other,
}

impl NamedVariant for Category {
    const ALL: &'static [Self] = &[
        Self::Math,
        Self::Logic,
        Self::Memory,
        Self::Quiz,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Math => "Math",
            Self::Logic => "Logic",
            Self::Memory => "Memory",
            Self::Quiz => "Quiz",
            Self::Other => "Other",
        }
    }
}

/// How the player enters an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnswerKind {
    Number,
    #[default]
    Text,
}

impl NamedVariant for AnswerKind {
    const ALL: &'static [Self] = &[Self::Number, Self::Text];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Text => "Text",
        }
    }
}

macro_rules! display_as_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_name!(Difficulty, Category, AnswerKind);

// ================================================================================================
// Reward Schedule
// ================================================================================================

/// One probabilistic item drop granted when a challenge is cleared
///
/// Decoded from the `rewards` JSON sub-document; field names are camelCase there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RewardEntry {
    pub item_id: String,

    #[serde(default = "default_quantity")]
    pub min_quantity: u32,

    #[serde(default = "default_quantity")]
    pub max_quantity: u32,

    /// Probability in `[0, 1]`
    #[serde(default = "default_drop_rate")]
    pub drop_rate: f64,
}

fn default_quantity() -> u32 {
    1
}

fn default_drop_rate() -> f64 {
    0.5
}

impl RewardEntry {
    /// Constraint violations for this entry, prefixed with its position
    pub fn violations(&self, index: usize) -> Vec<String> {
        let mut problems = Vec::new();
        if self.item_id.trim().is_empty() {
            problems.push(format!("rewards[{}]: itemId is empty", index));
        }
        if self.min_quantity < 1 {
            problems.push(format!(
                "rewards[{}]: minQuantity must be at least 1, found {}",
                index, self.min_quantity
            ));
        }
        if self.max_quantity < self.min_quantity {
            problems.push(format!(
                "rewards[{}]: maxQuantity {} is less than minQuantity {}",
                index, self.max_quantity, self.min_quantity
            ));
        }
        if !(0.0..=1.0).contains(&self.drop_rate) {
            problems.push(format!(
                "rewards[{}]: dropRate must be within [0, 1], found {}",
                index, self.drop_rate
            ));
        }
        problems
    }
}

// ================================================================================================
// Challenge Record
// ================================================================================================

/// A fully decoded and validated challenge definition
///
/// Produced once per data row by [`crate::decode_row`] and handed to the catalog as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    /// Unique key within the catalog (e.g. `challenge_math_001`)
    pub identifier: String,

    /// Display name
    pub name: String,

    pub description: Option<String>,

    pub difficulty: Difficulty,

    pub category: Category,

    /// Question text, kept verbatim (may span several lines)
    pub question: String,

    pub answer_kind: AnswerKind,

    /// Accepted answers; never empty, each entry trimmed and non-blank
    pub answers: Vec<String>,

    pub hint: Option<String>,

    /// Empty when the challenge grants no items
    pub rewards: Vec<RewardEntry>,
}

// ================================================================================================
// Tests
// ================================================================================================
