use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Date,
    Dropdown,
    Email,
    LongText,
    MultipleChoice,
    MultiplePictureChoice,
    Number,
    Password,
    Phone,
    SectionBreak,
    Text,
    Url,
    Rate,
}

impl QuestionType {
    /// Serialized label, matching the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Date => "date",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Email => "email",
            QuestionType::LongText => "long_text",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::MultiplePictureChoice => "multiple_picture_choice",
            QuestionType::Number => "number",
            QuestionType::Password => "password",
            QuestionType::Phone => "phone",
            QuestionType::SectionBreak => "section_break",
            QuestionType::Text => "text",
            QuestionType::Url => "url",
            QuestionType::Rate => "rate",
        }
    }

    /// Kinds whose answers come from a predefined option list.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::Dropdown
                | QuestionType::MultipleChoice
                | QuestionType::MultiplePictureChoice
        )
    }

    /// Kinds that collect no input of their own.
    pub fn is_informational(&self) -> bool {
        matches!(self, QuestionType::SectionBreak)
    }
}

/// One selectable option in a choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ChoiceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
}

/// Declarative branching rule: answer key to target question id.
///
/// The reserved key `_other` matches any answer without an explicit entry;
/// the reserved target `_submit` ends the flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(transparent)]
pub struct JumpSpec {
    pub targets: BTreeMap<String, String>,
}

impl JumpSpec {
    pub const OTHER_KEY: &'static str = "_other";

    /// Target for an answer key, falling back to the `_other` entry.
    pub fn target_for(&self, key: &str) -> Option<&str> {
        self.targets
            .get(key)
            .or_else(|| self.targets.get(Self::OTHER_KEY))
            .map(String::as_str)
    }

    /// The `_other` fallback entry, if any.
    pub fn other_target(&self) -> Option<&str> {
        self.targets.get(Self::OTHER_KEY).map(String::as_str)
    }
}

/// Declarative definition of one question in a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    /// Explicit identifier; derived as `q_<index>` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Whether several options may be selected at once.
    #[serde(default)]
    pub multiple: bool,
    /// Whether a free-text "other" entry is accepted alongside the options.
    #[serde(default)]
    pub allow_other: bool,
    /// Auto-advance as soon as an option is picked.
    #[serde(default)]
    pub next_step_on_answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump: Option<JumpSpec>,
    /// Pre-seeded answer, mostly useful for resuming a session.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub answer: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_spec_deserializes_with_defaults() {
        let spec: QuestionSpec = serde_json::from_value(json!({
            "type": "text",
            "title": "Your name"
        }))
        .expect("deserialize");
        assert_eq!(spec.kind, QuestionType::Text);
        assert!(!spec.required);
        assert!(!spec.multiple);
        assert!(spec.id.is_none());
        assert!(spec.answer.is_null());
    }

    #[test]
    fn jump_spec_is_a_transparent_map() {
        let spec: QuestionSpec = serde_json::from_value(json!({
            "type": "multiple_choice",
            "title": "Branch",
            "jump": { "yes": "q_detail", "_other": "_submit" }
        }))
        .expect("deserialize");
        let jump = spec.jump.expect("jump");
        assert_eq!(jump.target_for("yes"), Some("q_detail"));
        assert_eq!(jump.target_for("no"), Some("_submit"));
        assert_eq!(jump.other_target(), Some("_submit"));
    }

    #[test]
    fn type_labels_round_trip_through_serde() {
        for kind in [
            QuestionType::Date,
            QuestionType::Dropdown,
            QuestionType::Email,
            QuestionType::LongText,
            QuestionType::MultipleChoice,
            QuestionType::MultiplePictureChoice,
            QuestionType::Number,
            QuestionType::Password,
            QuestionType::Phone,
            QuestionType::SectionBreak,
            QuestionType::Text,
            QuestionType::Url,
            QuestionType::Rate,
        ] {
            let encoded = serde_json::to_value(kind).expect("serialize");
            assert_eq!(encoded, Value::String(kind.label().to_string()));
        }
    }
}
