use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::SpeechError;

/// Upper bound on grammar fixes, vocabulary upgrades, and filler examples
const MAX_LIST_ENTRIES: usize = 20;

/// Bounds on feedback summary entries
const MIN_SUMMARY_ENTRIES: usize = 1;
const MAX_SUMMARY_ENTRIES: usize = 6;

/// Normalized model output for a rewrite job
///
/// Unknown fields anywhere in the tree are a hard failure; the output
/// contract is exact, never best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImproveResult {
    /// Improved version of the transcript
    pub improved: String,
    /// Rewrites in three distinct styles
    pub alternatives: Alternatives,
    /// Structured coaching feedback
    pub feedback: Feedback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alternatives {
    pub formal: String,
    pub casual: String,
    pub concise: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feedback {
    /// 1-6 overall feedback points
    pub summary: Vec<String>,
    /// Up to 20 grammar corrections
    pub grammar_fixes: Vec<Revision>,
    /// Up to 20 vocabulary improvements
    pub vocabulary_upgrades: Vec<Revision>,
    /// Verbal disfluency count and examples
    pub filler_words: FillerWords,
}

/// A single before/after correction with rationale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Revision {
    pub from: String,
    pub to: String,
    pub why: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FillerWords {
    /// Total filler word occurrences
    pub count: u32,
    /// Up to 20 example filler words
    pub examples: Vec<String>,
}

/// Parse and validate raw rewrite output into an `ImproveResult`
///
/// # Errors
///
/// Returns `MalformedOutput` when the text is not valid JSON or any
/// structural bound is violated. The raw text is never returned to the
/// caller; it is carried only for logging.
pub fn normalize(raw: &str) -> Result<ImproveResult, SpeechError> {
    let result: ImproveResult = serde_json::from_str(raw)
        .map_err(|e| SpeechError::MalformedOutput(format!("output is not schema-conformant JSON: {e}")))?;

    let mut violations = Vec::new();

    if result.improved.is_empty() {
        violations.push("improved is empty");
    }
    if result.alternatives.formal.is_empty() {
        violations.push("alternatives.formal is empty");
    }
    if result.alternatives.casual.is_empty() {
        violations.push("alternatives.casual is empty");
    }
    if result.alternatives.concise.is_empty() {
        violations.push("alternatives.concise is empty");
    }

    let summary_len = result.feedback.summary.len();
    if !(MIN_SUMMARY_ENTRIES..=MAX_SUMMARY_ENTRIES).contains(&summary_len) {
        violations.push("feedback.summary out of bounds");
    }
    if result.feedback.grammar_fixes.len() > MAX_LIST_ENTRIES {
        violations.push("feedback.grammar_fixes exceeds 20 entries");
    }
    if result.feedback.vocabulary_upgrades.len() > MAX_LIST_ENTRIES {
        violations.push("feedback.vocabulary_upgrades exceeds 20 entries");
    }
    if result.feedback.filler_words.examples.len() > MAX_LIST_ENTRIES {
        violations.push("feedback.filler_words.examples exceeds 20 entries");
    }

    if violations.is_empty() {
        Ok(result)
    } else {
        Err(SpeechError::MalformedOutput(violations.join("; ")))
    }
}

/// JSON schema for the provider's structured-output mechanism
///
/// Strict mode requires every property to be listed as required and
/// `additionalProperties: false` at every level.
pub fn json_schema() -> serde_json::Value {
    let revision_list = json!({
        "type": "array",
        "items": {
            "type": "object",
            "additionalProperties": false,
            "required": ["from", "to", "why"],
            "properties": {
                "from": { "type": "string" },
                "to": { "type": "string" },
                "why": { "type": "string" },
            },
        },
        "maxItems": MAX_LIST_ENTRIES,
    });

    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["improved", "alternatives", "feedback"],
        "properties": {
            "improved": { "type": "string" },
            "alternatives": {
                "type": "object",
                "additionalProperties": false,
                "required": ["formal", "casual", "concise"],
                "properties": {
                    "formal": { "type": "string" },
                    "casual": { "type": "string" },
                    "concise": { "type": "string" },
                },
            },
            "feedback": {
                "type": "object",
                "additionalProperties": false,
                "required": ["summary", "grammar_fixes", "vocabulary_upgrades", "filler_words"],
                "properties": {
                    "summary": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": MIN_SUMMARY_ENTRIES,
                        "maxItems": MAX_SUMMARY_ENTRIES,
                    },
                    "grammar_fixes": revision_list,
                    "vocabulary_upgrades": revision_list,
                    "filler_words": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": ["count", "examples"],
                        "properties": {
                            "count": { "type": "integer", "minimum": 0 },
                            "examples": {
                                "type": "array",
                                "items": { "type": "string" },
                                "maxItems": MAX_LIST_ENTRIES,
                            },
                        },
                    },
                },
            },
        },
    })
}
