use serde_json::Value;

use crate::answers::display_value;
use crate::choice::ChoiceOption;
use crate::jump::{DynamicJump, JumpRule};
use crate::spec::{QuestionSpec, QuestionType};
use crate::validate::answer_is_valid;

/// Reserved jump target that ends the flow.
pub const SUBMIT_TARGET: &str = "_submit";

const DEFAULT_PHONE_MASK: &str = "(###) ###-####";
const DEFAULT_DATE_PLACEHOLDER: &str = "yyyy-mm-dd";

/// Runtime state of a single question.
///
/// Built once per flow definition and mutated as the user answers; the
/// ordinal `index` is reassigned on every active-path recomputation.
#[derive(Debug, Clone)]
pub struct Question {
    id: Option<String>,
    pub kind: QuestionType,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub multiple: bool,
    pub allow_other: bool,
    pub next_step_on_answer: bool,
    pub placeholder: Option<String>,
    pub mask: Option<String>,
    pub max_length: Option<usize>,
    pub max_rating: Option<u32>,
    pub options: Vec<ChoiceOption>,
    pub jump: JumpRule,
    pub answer: Value,
    /// Free-text value inferred for the "other" entry of a choice question.
    pub other_answer: Option<String>,
    pub answered: bool,
    pub index: usize,
}

impl Question {
    /// Construct from a declarative definition, applying type-specific
    /// normalization. `fallback_index` seeds the derived id for questions
    /// declared without one.
    pub fn from_spec(spec: &QuestionSpec, fallback_index: usize) -> Self {
        let mask = match spec.kind {
            // URL input is never masked.
            QuestionType::Url => None,
            QuestionType::Phone => spec
                .mask
                .clone()
                .or_else(|| Some(DEFAULT_PHONE_MASK.to_string())),
            _ => spec.mask.clone(),
        };
        let placeholder = match spec.kind {
            QuestionType::Date => spec
                .placeholder
                .clone()
                .or_else(|| Some(DEFAULT_DATE_PLACEHOLDER.to_string())),
            _ => spec.placeholder.clone(),
        };

        let answer = if spec.multiple && !spec.answer.is_array() {
            match spec.answer.clone() {
                Value::Null => Value::Array(Vec::new()),
                scalar => Value::Array(vec![scalar]),
            }
        } else {
            spec.answer.clone()
        };

        let mut question = Self {
            id: spec.id.clone(),
            kind: spec.kind,
            title: spec.title.clone(),
            description: spec.description.clone(),
            required: spec.required,
            multiple: spec.multiple,
            allow_other: spec.allow_other,
            next_step_on_answer: spec.next_step_on_answer,
            placeholder,
            mask,
            max_length: spec.max_length,
            max_rating: spec.max_rating,
            options: spec.options.iter().map(ChoiceOption::from_spec).collect(),
            jump: JumpRule::from_spec(spec.jump.as_ref()),
            answer,
            other_answer: None,
            answered: false,
            index: fallback_index,
        };
        question.answered = question.has_content() && question.has_valid_answer();
        question.reset_options();
        question
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Identifier after index assignment; every engine-held question has one.
    pub fn id_or_indexed(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("q_{}", self.index),
        }
    }

    /// Set the ordinal position. Always updates `index`; derives the id as
    /// `q_<i>` only when no explicit id exists.
    pub fn set_index(&mut self, index: usize) {
        self.index = index;
        if self.id.is_none() {
            self.id = Some(format!("q_{index}"));
        }
    }

    /// Store an answer. Number-typed questions coerce parseable strings to
    /// numbers; no validation happens here. Option selection state is
    /// recomputed as a side effect since it is derived from the answer.
    pub fn set_answer(&mut self, value: Value) {
        self.answer = match self.kind {
            QuestionType::Number => coerce_number(value),
            _ => value,
        };
        self.reset_options();
    }

    /// Resolve the id of the next question given the current answer.
    /// `None` means "continue sequentially".
    pub fn jump_id(&self) -> Option<String> {
        match &self.jump {
            JumpRule::None => None,
            JumpRule::Dynamic(rule) => rule(self),
            JumpRule::Targets(spec) => match self.answer_key() {
                Some(key) => spec.target_for(&key).map(str::to_string),
                None => spec.other_target().map(str::to_string),
            },
        }
    }

    /// Attach a programmatic jump rule.
    pub fn set_dynamic_jump(&mut self, rule: DynamicJump) {
        self.jump = JumpRule::Dynamic(rule);
    }

    /// Recompute each option's `selected` flag from the current answer and,
    /// when `allow_other` is set, infer the free-text other value.
    pub fn reset_options(&mut self) {
        let values: Vec<Value> = self.options.iter().map(ChoiceOption::choice_value).collect();
        for (option, value) in self.options.iter_mut().zip(&values) {
            option.selected = match &self.answer {
                Value::Array(entries) => entries.contains(value),
                other => other == value,
            };
        }

        if !self.allow_other {
            self.other_answer = None;
            return;
        }
        self.other_answer = match &self.answer {
            Value::Null => None,
            Value::Array(entries) => {
                let matched = entries.iter().filter(|entry| values.contains(entry)).count();
                if matched == entries.len() {
                    None
                } else {
                    // When several entries are unmatched, the last one is
                    // taken as the other value.
                    entries
                        .iter()
                        .filter(|entry| !values.contains(entry))
                        .next_back()
                        .map(display_value)
                }
            }
            scalar => {
                if values.contains(scalar) {
                    None
                } else {
                    Some(display_value(scalar))
                }
            }
        };
    }

    /// Per-type validity of the current answer.
    pub fn has_valid_answer(&self) -> bool {
        answer_is_valid(self)
    }

    /// Whether any answer content is present at all.
    pub fn has_content(&self) -> bool {
        match &self.answer {
            Value::Null => false,
            Value::String(text) => !text.is_empty(),
            Value::Array(entries) => !entries.is_empty(),
            _ => true,
        }
    }

    /// The key used to look up a declarative jump target.
    ///
    /// Scalars stringify; a single-entry array matches on its sole element;
    /// multi-entry arrays only ever match the `_other` fallback.
    fn answer_key(&self) -> Option<String> {
        fn scalar_key(value: &Value) -> Option<String> {
            match value {
                Value::String(text) => Some(text.clone()),
                Value::Bool(flag) => Some(flag.to_string()),
                Value::Number(num) => Some(num.to_string()),
                _ => None,
            }
        }
        match &self.answer {
            Value::Array(entries) => match entries.as_slice() {
                [single] => scalar_key(single),
                _ => None,
            },
            other => scalar_key(other),
        }
    }
}

/// Coerce a non-empty string that parses as a finite number; anything else
/// is stored as-is.
fn coerce_number(value: Value) -> Value {
    let Value::String(text) = value else {
        return value;
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::String(text);
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(parsed) = trimmed.parse::<f64>()
        && parsed.is_finite()
        && let Some(num) = serde_json::Number::from_f64(parsed)
    {
        return Value::Number(num);
    }
    Value::String(text)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::spec::{ChoiceSpec, JumpSpec};
    use serde_json::json;

    fn spec(kind: QuestionType) -> QuestionSpec {
        serde_json::from_value(json!({
            "type": kind.label(),
            "title": "t"
        }))
        .expect("question spec")
    }

    fn choice(label: &str, value: Value) -> ChoiceSpec {
        ChoiceSpec {
            label: Some(label.to_string()),
            value,
            image_src: None,
            image_alt: None,
        }
    }

    #[test]
    fn set_index_never_overwrites_an_explicit_id() {
        let mut with_id = spec(QuestionType::Text);
        with_id.id = Some("name".into());
        let mut question = Question::from_spec(&with_id, 0);
        question.set_index(3);
        question.set_index(7);
        assert_eq!(question.id(), Some("name"));
        assert_eq!(question.index, 7);
    }

    #[test]
    fn set_index_derives_missing_ids_once() {
        let mut question = Question::from_spec(&spec(QuestionType::Text), 0);
        question.set_index(2);
        assert_eq!(question.id(), Some("q_2"));
        question.set_index(5);
        // index keeps moving, the derived id does not
        assert_eq!(question.id(), Some("q_2"));
        assert_eq!(question.index, 5);
    }

    #[test]
    fn number_answers_coerce_parseable_strings() {
        let mut question = Question::from_spec(&spec(QuestionType::Number), 0);
        question.set_answer(json!("42"));
        assert_eq!(question.answer, json!(42));
        question.set_answer(json!("2.5"));
        assert_eq!(question.answer, json!(2.5));
        question.set_answer(json!("forty-two"));
        assert_eq!(question.answer, json!("forty-two"));
        question.set_answer(json!(""));
        assert_eq!(question.answer, json!(""));
    }

    #[test]
    fn multiple_answers_are_wrapped_at_construction() {
        let mut multi = spec(QuestionType::MultipleChoice);
        multi.multiple = true;
        multi.answer = json!("a");
        let question = Question::from_spec(&multi, 0);
        assert_eq!(question.answer, json!(["a"]));

        let mut empty = spec(QuestionType::MultipleChoice);
        empty.multiple = true;
        let question = Question::from_spec(&empty, 0);
        assert_eq!(question.answer, json!([]));
    }

    #[test]
    fn jump_map_lookup_falls_back_to_other() {
        let mut branching = spec(QuestionType::MultipleChoice);
        branching.jump = Some(JumpSpec {
            targets: [("A".to_string(), "q2".to_string()), ("_other".to_string(), "q3".to_string())]
                .into_iter()
                .collect(),
        });
        let mut question = Question::from_spec(&branching, 0);

        question.set_answer(json!("A"));
        assert_eq!(question.jump_id().as_deref(), Some("q2"));
        question.set_answer(json!("Z"));
        assert_eq!(question.jump_id().as_deref(), Some("q3"));
    }

    #[test]
    fn jump_map_without_other_yields_none_for_unknown_keys() {
        let mut branching = spec(QuestionType::Text);
        branching.jump = Some(JumpSpec {
            targets: [("yes".to_string(), "q9".to_string())].into_iter().collect(),
        });
        let mut question = Question::from_spec(&branching, 0);
        question.set_answer(json!("no"));
        assert_eq!(question.jump_id(), None);
    }

    #[test]
    fn dynamic_jump_wins_regardless_of_answer() {
        let mut question = Question::from_spec(&spec(QuestionType::Text), 0);
        question.set_dynamic_jump(Arc::new(|_| Some("q_end".to_string())));
        question.set_answer(json!("anything"));
        assert_eq!(question.jump_id().as_deref(), Some("q_end"));
    }

    #[test]
    fn single_entry_array_answers_match_jump_keys() {
        let mut branching = spec(QuestionType::MultipleChoice);
        branching.multiple = true;
        branching.jump = Some(JumpSpec {
            targets: [("a".to_string(), "q5".to_string())].into_iter().collect(),
        });
        let mut question = Question::from_spec(&branching, 0);
        question.set_answer(json!(["a"]));
        assert_eq!(question.jump_id().as_deref(), Some("q5"));
        question.set_answer(json!(["a", "b"]));
        assert_eq!(question.jump_id(), None);
    }

    #[test]
    fn reset_options_round_trips_multi_select_answers() {
        let mut multi = spec(QuestionType::MultipleChoice);
        multi.multiple = true;
        multi.options = vec![
            choice("A", json!("a")),
            choice("B", json!("b")),
            choice("C", json!("c")),
        ];
        let mut question = Question::from_spec(&multi, 0);
        question.set_answer(json!(["a", "b"]));
        let selected: Vec<bool> = question.options.iter().map(|option| option.selected).collect();
        assert_eq!(selected, vec![true, true, false]);
    }

    #[test]
    fn other_value_inference_single_select() {
        let mut single = spec(QuestionType::MultipleChoice);
        single.allow_other = true;
        single.options = vec![choice("A", json!("a"))];
        let mut question = Question::from_spec(&single, 0);
        question.set_answer(json!("custom"));
        assert_eq!(question.other_answer.as_deref(), Some("custom"));
        question.set_answer(json!("a"));
        assert_eq!(question.other_answer, None);
    }

    #[test]
    fn other_value_inference_takes_last_unmatched_entry() {
        let mut multi = spec(QuestionType::MultipleChoice);
        multi.multiple = true;
        multi.allow_other = true;
        multi.options = vec![choice("A", json!("a")), choice("B", json!("b"))];
        let mut question = Question::from_spec(&multi, 0);
        question.set_answer(json!(["a", "first", "last"]));
        assert_eq!(question.other_answer.as_deref(), Some("last"));
    }

    #[test]
    fn phone_and_date_normalization_defaults() {
        let phone = Question::from_spec(&spec(QuestionType::Phone), 0);
        assert_eq!(phone.mask.as_deref(), Some(DEFAULT_PHONE_MASK));

        let date = Question::from_spec(&spec(QuestionType::Date), 0);
        assert_eq!(date.placeholder.as_deref(), Some(DEFAULT_DATE_PLACEHOLDER));

        let mut masked_url = spec(QuestionType::Url);
        masked_url.mask = Some("###".into());
        let url = Question::from_spec(&masked_url, 0);
        assert_eq!(url.mask, None);
    }
}
