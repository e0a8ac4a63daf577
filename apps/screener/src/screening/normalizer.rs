//! Response normalizer: turns whatever text the LLM returned into a `CanonicalRecord`.
//!
//! Two steps, both infallible:
//! 1. Recover a JSON object through an ordered list of parse strategies
//!    (direct → fences stripped → outermost brace span). No match means `{}`.
//! 2. Map each key onto a canonical field via the synonym table, then the
//!    catch-all predicates. Unmatched keys pass through untouched.
//!
//! Missing canonical fields are backfilled by `CanonicalRecord::from_fields`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::screening::record::{
    CanonicalRecord, FIELD_EMAIL, FIELD_IS_OKAY, FIELD_IS_PERFECT, FIELD_LACK_OF_KNOWLEDGE,
    FIELD_NAME, FIELD_SCORE, FIELD_STRONG_ZONE,
};

pub type JsonObject = Map<String, Value>;

/// A single parse attempt. Returns `None` when the text does not yield a JSON object.
pub type ParseStrategy = fn(&str) -> Option<JsonObject>;

/// Tried in order; the first strategy that yields an object wins.
pub const PARSE_STRATEGIES: [(&str, ParseStrategy); 3] = [
    ("direct", parse_direct),
    ("fences_stripped", parse_fences_stripped),
    ("brace_span", parse_brace_span),
];

/// Normalized key spelling → canonical field.
const SYNONYMS: [(&str, &str); 12] = [
    ("name", FIELD_NAME),
    ("email", FIELD_EMAIL),
    ("is_perfect", FIELD_IS_PERFECT),
    ("is_okay", FIELD_IS_OKAY),
    ("matching_score", FIELD_SCORE),
    ("matching_score_percentage", FIELD_SCORE),
    ("score", FIELD_SCORE),
    ("strong_zone", FIELD_STRONG_ZONE),
    ("strengths", FIELD_STRONG_ZONE),
    ("lack_of_knowledge", FIELD_LACK_OF_KNOWLEDGE),
    ("weaknesses", FIELD_LACK_OF_KNOWLEDGE),
    ("gaps", FIELD_LACK_OF_KNOWLEDGE),
];

/// Evaluated in order, only when the synonym table has no entry.
const CATCH_ALL_RULES: [(fn(&str) -> bool, &str); 2] = [
    (mentions_score_percentage, FIELD_SCORE),
    (mentions_score, FIELD_SCORE),
];

/// Normalizes a raw LLM response into a fully populated record. Never fails.
pub fn normalize_response(raw: &str) -> CanonicalRecord {
    let object = extract_object(raw).unwrap_or_default();
    CanonicalRecord::from_fields(map_keys(object))
}

/// Runs the parse strategies until one yields a JSON object.
pub fn extract_object(raw: &str) -> Option<JsonObject> {
    let found = PARSE_STRATEGIES.iter().find_map(|(label, strategy)| {
        let object = strategy(raw)?;
        debug!("LLM response parsed via {label} ({} keys)", object.len());
        Some(object)
    });
    if found.is_none() {
        debug!("No JSON object recovered from LLM response; using defaults");
    }
    found
}

pub fn parse_direct(raw: &str) -> Option<JsonObject> {
    parse_object(raw)
}

pub fn parse_fences_stripped(raw: &str) -> Option<JsonObject> {
    parse_object(&strip_fences(raw))
}

pub fn parse_brace_span(raw: &str) -> Option<JsonObject> {
    let stripped = strip_fences(raw);
    outermost_brace_span(&stripped).and_then(parse_object)
}

/// Only objects count; a bare array or scalar is treated as a miss.
fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Removes every ```json and ``` marker, wherever it appears.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// First `{` through last `}`, inclusive.
fn outermost_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Lowercase, with spaces and hyphens folded to underscores.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace([' ', '-'], "_")
}

/// Resolves a raw key to its canonical field, if any.
pub fn canonical_field(key: &str) -> Option<&'static str> {
    let normalized = normalize_key(key);
    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == normalized)
        .map(|(_, field)| *field)
        .or_else(|| {
            CATCH_ALL_RULES
                .iter()
                .find(|(matches, _)| matches(normalized.as_str()))
                .map(|(_, field)| *field)
        })
}

fn map_keys(object: JsonObject) -> JsonObject {
    let mut mapped = JsonObject::new();
    for (key, value) in object {
        match canonical_field(&key) {
            // Later keys overwrite earlier ones for the same field.
            Some(field) => {
                mapped.insert(field.to_string(), value);
            }
            None => {
                mapped.insert(key, value);
            }
        }
    }
    mapped
}

fn mentions_score_percentage(key: &str) -> bool {
    key.contains("score") && key.contains("percentage")
}

fn mentions_score(key: &str) -> bool {
    key.contains("score")
}
