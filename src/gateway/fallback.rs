//! Locally synthesized results used when the model call fails.
//!
//! Everything here is deterministic except the evaluation score, which is
//! drawn from `60..100` to simulate partial credit.
use once_cell::sync::Lazy;
use rand::Rng;
use regex::{Captures, Regex};

use crate::models::{EvaluationResult, UniquenessResult, VariationRequest, VariationResult};

pub const FALLBACK_VARIATION_COUNT: usize = 4;
pub const FALLBACK_UNIQUENESS_SCORE: u8 = 70;
pub const FALLBACK_UNIQUENESS_QUERY_SCORE: u8 = 75;
pub const FALLBACK_EVALUATION_SCORES: std::ops::Range<u8> = 60..100;

static INTERROGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(what|how|why|when|where)\b").unwrap()
});

/// Whole-word, case-insensitive interrogative swaps. Replacements are lowercase.
pub fn swap_interrogatives(question: &str) -> String {
    INTERROGATIVE
        .replace_all(question, |caps: &Captures| {
            let swapped = match caps[1].to_ascii_lowercase().as_str() {
                "what" => "which",
                "how" => "in what way",
                "why" => "for what reason",
                "when" => "at what time",
                "where" => "in which location",
                _ => return caps[0].to_string(),
            };
            swapped.to_string()
        })
        .into_owned()
}

pub fn variations(request: &VariationRequest) -> VariationResult {
    let question = &request.original_question;
    let lowered = question.to_lowercase();
    let subject = &request.subject;

    let variations = vec![
        format!("Modified version: {}", swap_interrogatives(question)),
        format!("Alternative approach: Considering {} principles, {}", subject, lowered),
        format!("Practical application: In a real-world {} scenario, {}", subject, lowered),
        format!(
            "Analytical perspective: From a {} level understanding, {}",
            request.difficulty, lowered
        ),
    ];
    debug_assert_eq!(variations.len(), FALLBACK_VARIATION_COUNT);

    VariationResult {
        variations,
        uniqueness_score: FALLBACK_UNIQUENESS_SCORE,
        degraded: true,
    }
}

pub fn evaluation() -> EvaluationResult {
    evaluation_with_rng(&mut rand::thread_rng())
}

pub fn evaluation_with_rng<R: Rng + ?Sized>(rng: &mut R) -> EvaluationResult {
    EvaluationResult {
        score: rng.gen_range(FALLBACK_EVALUATION_SCORES),
        feedback: "Good understanding demonstrated. Consider expanding on key concepts.".to_string(),
        strengths: vec!["Shows grasp of fundamental principles".to_string()],
        improvements: vec![
            "Provide more detailed explanations".to_string(),
            "Include specific examples".to_string(),
        ],
        degraded: true,
    }
}

pub fn uniqueness() -> UniquenessResult {
    UniquenessResult { score: FALLBACK_UNIQUENESS_QUERY_SCORE, degraded: true }
}
