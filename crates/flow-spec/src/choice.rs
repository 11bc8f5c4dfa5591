use serde_json::Value;

use crate::answers::display_value;
use crate::spec::ChoiceSpec;

/// A selectable choice together with its derived selection state.
///
/// `selected` is a projection of the owning question's answer and is only
/// written by [`crate::Question::reset_options`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub label: Option<String>,
    pub value: Value,
    pub image_src: Option<String>,
    pub image_alt: Option<String>,
    pub selected: bool,
}

impl ChoiceOption {
    pub fn from_spec(spec: &ChoiceSpec) -> Self {
        Self {
            label: spec.label.clone(),
            value: spec.value.clone(),
            image_src: spec.image_src.clone(),
            image_alt: spec.image_alt.clone(),
            selected: false,
        }
    }

    /// The value this choice contributes to an answer: `value`, else the
    /// label, else the image alt text, else the image source.
    pub fn choice_value(&self) -> Value {
        if !self.value.is_null() {
            return self.value.clone();
        }
        if let Some(label) = &self.label {
            return Value::String(label.clone());
        }
        if let Some(alt) = &self.image_alt {
            return Value::String(alt.clone());
        }
        if let Some(src) = &self.image_src {
            return Value::String(src.clone());
        }
        Value::Null
    }

    /// Display text, falling back to the effective value.
    pub fn choice_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => display_value(&self.choice_value()),
        }
    }

    /// Whether this choice is present in the given answer (scalar equality
    /// or array containment).
    pub fn matches(&self, answer: &Value) -> bool {
        let value = self.choice_value();
        match answer {
            Value::Array(entries) => entries.iter().any(|entry| entry == &value),
            other => other == &value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(label: Option<&str>, value: Value) -> ChoiceOption {
        ChoiceOption {
            label: label.map(String::from),
            value,
            image_src: None,
            image_alt: None,
            selected: false,
        }
    }

    #[test]
    fn choice_value_falls_back_from_value_to_label_to_image() {
        assert_eq!(option(Some("A"), json!("a")).choice_value(), json!("a"));
        assert_eq!(option(Some("A"), Value::Null).choice_value(), json!("A"));

        let pictured = ChoiceOption {
            label: None,
            value: Value::Null,
            image_src: Some("cat.png".into()),
            image_alt: Some("a cat".into()),
            selected: false,
        };
        assert_eq!(pictured.choice_value(), json!("a cat"));
        assert_eq!(pictured.choice_label(), "a cat");
    }

    #[test]
    fn matches_supports_scalar_and_array_answers() {
        let choice = option(Some("A"), json!("a"));
        assert!(choice.matches(&json!("a")));
        assert!(!choice.matches(&json!("b")));
        assert!(choice.matches(&json!(["b", "a"])));
        assert!(!choice.matches(&json!(["b", "c"])));
    }
}
