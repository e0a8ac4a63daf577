//! CanonicalRecord: the fixed seven-field row every screened resume ends up as.

use serde::Serialize;
use serde_json::{Map, Value};

pub const FIELD_NAME: &str = "Name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_IS_PERFECT: &str = "is_perfect";
pub const FIELD_IS_OKAY: &str = "is_okay";
pub const FIELD_SCORE: &str = "Matching Score in percentage";
pub const FIELD_STRONG_ZONE: &str = "strong zone";
pub const FIELD_LACK_OF_KNOWLEDGE: &str = "Lack of Knowledge";

/// Fallback value for a canonical field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Flag(bool),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Text(s) => Value::String(s.to_string()),
            DefaultValue::Flag(b) => Value::Bool(b),
        }
    }
}

/// The seven canonical fields, in column order, with the value used when the
/// LLM response does not supply one.
pub const CANONICAL_DEFAULTS: [(&str, DefaultValue); 7] = [
    (FIELD_NAME, DefaultValue::Text("Unknown")),
    (FIELD_EMAIL, DefaultValue::Text("unknown@email.com")),
    (FIELD_IS_PERFECT, DefaultValue::Flag(false)),
    (FIELD_IS_OKAY, DefaultValue::Flag(false)),
    (FIELD_SCORE, DefaultValue::Text("0%")),
    (FIELD_STRONG_ZONE, DefaultValue::Text("Not specified")),
    (FIELD_LACK_OF_KNOWLEDGE, DefaultValue::Text("Not specified")),
];

const ERROR_EMAIL: &str = "error@email.com";

/// One screening result. Always carries the seven canonical keys, plus any
/// pass-through keys the LLM added. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalRecord(Map<String, Value>);

impl CanonicalRecord {
    /// Wraps already-mapped fields, backfilling every missing canonical field.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        for (field, default) in CANONICAL_DEFAULTS {
            if !fields.contains_key(field) {
                fields.insert(field.to_string(), default.to_value());
            }
        }
        Self(fields)
    }

    /// The all-defaults record.
    pub fn defaults() -> Self {
        Self::from_fields(Map::new())
    }

    /// Record for a resume whose PDF yielded no text.
    pub fn extraction_failed(filename: &str) -> Self {
        Self::error_record(
            filename,
            "Could not extract text",
            "PDF text extraction failed".to_string(),
        )
    }

    /// Record for a resume whose analysis call failed.
    pub fn processing_failed(filename: &str, error: &str) -> Self {
        Self::error_record(filename, "Processing failed", format!("Error: {error}"))
    }

    fn error_record(filename: &str, strong_zone: &str, lack_of_knowledge: String) -> Self {
        let mut fields = Map::new();
        fields.insert(FIELD_NAME.into(), Value::String(format!("Error: {filename}")));
        fields.insert(FIELD_EMAIL.into(), Value::String(ERROR_EMAIL.into()));
        fields.insert(FIELD_IS_PERFECT.into(), Value::Bool(false));
        fields.insert(FIELD_IS_OKAY.into(), Value::Bool(false));
        fields.insert(FIELD_SCORE.into(), Value::String("0%".into()));
        fields.insert(FIELD_STRONG_ZONE.into(), Value::String(strong_zone.into()));
        fields.insert(
            FIELD_LACK_OF_KNOWLEDGE.into(),
            Value::String(lack_of_knowledge),
        );
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(FIELD_NAME).and_then(Value::as_str)
    }
}
