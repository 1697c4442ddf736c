//! Request and result records exchanged with the UI layer.
//!
//! Field names serialize as camelCase to match the browser client.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VARIATION_COUNT: u32 = 4;
/// Most variations one model call is asked for.
pub const MAX_VARIATION_COUNT: u32 = 20;
/// Most variations one bulk request produces.
pub const MAX_BULK_TOTAL: u32 = 100;

// Deserialized through `FromStr` so "medium" and "Medium" are both accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty '{}', expected Easy, Medium or Hard", other)),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationRequest {
    pub original_question: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variation_count: Option<u32>,
}

impl VariationRequest {
    /// Requested count, with unset or zero meaning the default of 4.
    /// Capped at `MAX_VARIATION_COUNT`.
    pub fn variation_count(&self) -> u32 {
        self.variation_count
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_VARIATION_COUNT)
            .min(MAX_VARIATION_COUNT)
    }

    pub fn with_count(&self, count: u32) -> Self {
        VariationRequest {
            variation_count: Some(count),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationResult {
    pub variations: Vec<String>,
    pub uniqueness_score: u8,
    /// Set when the content was synthesized locally instead of by the model.
    #[serde(default)]
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub question: String,
    pub student_answer: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(default)]
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniquenessQuery {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniquenessResult {
    pub score: u8,
    #[serde(default)]
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkVariationRequest {
    #[serde(flatten)]
    pub request: VariationRequest,
    pub total: u32,
}

/// What one sequential batch of a bulk run asked for and got back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub requested: u32,
    pub received: u32,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkVariationResult {
    pub variations: Vec<String>,
    pub batches: Vec<BatchOutcome>,
    /// How many of the requested variations are missing from `variations`.
    pub shortfall: u32,
    pub degraded: bool,
}
