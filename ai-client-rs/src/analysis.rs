//! Parse-or-wrap handling of model completions.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Outcome of parsing a model completion as JSON.
///
/// A malformed or non-JSON completion must never abort a request, so the
/// fallback is part of the type rather than an error path: `Structured`
/// serializes as the parsed value verbatim, `Unstructured` as
/// `{ "raw": text }`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    Structured(Value),
    Unstructured(String),
}

impl AnalysisPayload {
    /// Deterministic: the same input always yields the same payload.
    pub fn parse(completion: &str) -> Self {
        match serde_json::from_str::<Value>(completion) {
            Ok(value) => AnalysisPayload::Structured(value),
            Err(_) => AnalysisPayload::Unstructured(completion.to_string()),
        }
    }

    /// The wire representation used as the `data` field of envelopes.
    pub fn into_value(self) -> Value {
        match self {
            AnalysisPayload::Structured(value) => value,
            AnalysisPayload::Unstructured(raw) => serde_json::json!({ "raw": raw }),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, AnalysisPayload::Structured(_))
    }
}

impl Serialize for AnalysisPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnalysisPayload::Structured(value) => value.serialize(serializer),
            AnalysisPayload::Unstructured(raw) => {
                serde_json::json!({ "raw": raw }).serialize(serializer)
            }
        }
    }
}
