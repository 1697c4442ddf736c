//! Turns raw model text into validated results.
//!
//! Model output is decoded into a loose `serde_json::Value` first and each
//! field is then coerced on its own, so a reply that gets one field wrong
//! still contributes the others. Scores always land in `0..=100`.
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{EvaluationResult, VariationResult};

pub const DEFAULT_UNIQUENESS_SCORE: u8 = 75;
pub const DEFAULT_EVALUATION_SCORE: u8 = 75;
pub const DEFAULT_FEEDBACK: &str =
    "Good effort demonstrated. Continue to develop your understanding of the key concepts.";
pub const DEFAULT_STRENGTH: &str = "Shows understanding of basic concepts";
pub const DEFAULT_IMPROVEMENT: &str = "Consider providing more detailed explanations";

// Optional language tag, then the shortest body up to the closing fence.
static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:[A-Za-z][\w+-]*)?[ \t]*\r?\n?([\s\S]*?)```").unwrap()
});

/// Trimmed contents of the first fenced block, or the trimmed text itself.
///
/// A block body never contains a full fence, so applying this twice is the
/// same as applying it once.
pub fn unwrap_code_fence(raw: &str) -> &str {
    match FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => raw.trim(),
    }
}

/// Strict JSON parse of the unwrapped reply.
pub fn parse_json(raw: &str) -> AppResult<Value> {
    let cleaned = unwrap_code_fence(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        tracing::warn!(raw = %raw, cleaned = %cleaned, "JSON parse error: {}", e);
        AppError::Parse(e.to_string())
    })
}

/// Like `parse_json`, but anything other than a JSON object is a parse error.
pub fn parse_object(raw: &str) -> AppResult<Value> {
    let parsed = parse_json(raw)?;
    if parsed.is_object() {
        Ok(parsed)
    } else {
        tracing::warn!(raw = %raw, "Reply is JSON but not an object");
        Err(AppError::Parse(format!("expected a JSON object, got '{}'", parsed)))
    }
}

/// Clamp any finite number into a score.
pub fn clamp_score(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 100.0) as u8)
}

/// Numbers (rounded) and numeric strings are accepted; anything else is `None`.
pub fn coerce_score(value: Option<&Value>) -> Option<u8> {
    match value? {
        Value::Number(n) => n.as_f64().and_then(clamp_score),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(clamp_score),
        _ => None,
    }
}

/// Non-blank string entries of an array; `None` when nothing usable is left.
pub fn coerce_string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if items.is_empty() { None } else { Some(items) }
}

fn coerce_text(value: Option<&Value>) -> Option<String> {
    value?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Variations capped at `requested`; missing fields take their defaults.
pub fn interpret_variations(parsed: &Value, requested: u32) -> VariationResult {
    let mut variations = coerce_string_list(parsed.get("variations")).unwrap_or_default();
    if variations.len() > requested as usize {
        tracing::debug!(
            "Model returned {} variations, keeping the first {}",
            variations.len(),
            requested
        );
        variations.truncate(requested as usize);
    }
    VariationResult {
        variations,
        uniqueness_score: coerce_score(parsed.get("uniquenessScore")).unwrap_or(DEFAULT_UNIQUENESS_SCORE),
        degraded: false,
    }
}

pub fn interpret_evaluation(parsed: &Value) -> EvaluationResult {
    EvaluationResult {
        score: coerce_score(parsed.get("score")).unwrap_or(DEFAULT_EVALUATION_SCORE),
        feedback: coerce_text(parsed.get("feedback")).unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
        strengths: coerce_string_list(parsed.get("strengths"))
            .unwrap_or_else(|| vec![DEFAULT_STRENGTH.to_string()]),
        improvements: coerce_string_list(parsed.get("improvements"))
            .unwrap_or_else(|| vec![DEFAULT_IMPROVEMENT.to_string()]),
        degraded: false,
    }
}

/// Leading integer of `text`: optional sign then digits, the rest ignored.
pub fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Score from a uniqueness reply, which should be a bare integer.
pub fn interpret_uniqueness(raw: &str) -> AppResult<u8> {
    let cleaned = unwrap_code_fence(raw);
    match parse_leading_integer(cleaned) {
        Some(n) => Ok(n.clamp(0, 100) as u8),
        None => {
            tracing::warn!(raw = %raw, "Uniqueness reply has no leading integer");
            Err(AppError::Parse(format!("expected an integer, got '{}'", cleaned)))
        }
    }
}
