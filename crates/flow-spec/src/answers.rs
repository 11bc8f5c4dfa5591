use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Snapshot of collected answers, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    pub answers: BTreeMap<String, Value>,
}

#[derive(Debug, Error)]
pub enum AnswerExportError {
    #[error("json encode error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cbor encode error: {0}")]
    Cbor(#[from] serde_cbor::Error),
}

impl AnswerSet {
    pub fn insert(&mut self, id: impl Into<String>, value: Value) {
        self.answers.insert(id.into(), value);
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.answers.get(id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Build from a JSON object; anything else yields an empty set.
    pub fn from_value(value: &Value) -> Self {
        let answers = value
            .as_object()
            .map(|map| map.clone().into_iter().collect())
            .unwrap_or_default();
        Self { answers }
    }

    pub fn to_json_pretty(&self) -> Result<String, AnswerExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, AnswerExportError> {
        Ok(serde_cbor::to_vec(self)?)
    }
}

/// Human-friendly rendering of an answer value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        Value::Array(entries) => entries
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answer_set_round_trips_through_cbor() {
        let mut answers = AnswerSet::default();
        answers.insert("name", json!("Ada"));
        answers.insert("count", json!(3));
        let bytes = answers.to_cbor().expect("cbor");
        let decoded: AnswerSet = serde_cbor::from_slice(&bytes).expect("decode");
        assert_eq!(decoded, answers);
    }

    #[test]
    fn display_value_flattens_arrays() {
        assert_eq!(display_value(&json!(["a", 2, true])), "a, 2, true");
        assert_eq!(display_value(&json!("plain")), "plain");
    }
}
