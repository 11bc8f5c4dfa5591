use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::resolve_active_path;
use crate::question::Question;
use crate::spec::{FlowSpec, QuestionType};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?[\w.-]+\.[A-Za-z]{2,}(/\S*)?$").expect("url pattern compiles")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9 ().-]{7,}$").expect("phone pattern compiles")
});

/// One reportable problem with an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Outcome of validating an answer map against a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub missing_required: Vec<String>,
    pub unknown_fields: Vec<String>,
}

/// Validate a full answer map against a flow definition.
///
/// Only questions reachable on the active path are validated; required
/// questions off the path are not reported as missing.
pub fn validate(spec: &FlowSpec, answers: &Value) -> ValidationResult {
    let answers_map = answers.as_object().cloned().unwrap_or_default();

    let mut questions: Vec<Question> = spec
        .questions
        .iter()
        .enumerate()
        .map(|(position, question)| Question::from_spec(question, position))
        .collect();
    for (position, question) in questions.iter_mut().enumerate() {
        question.set_index(position);
        let id = question.id_or_indexed();
        if let Some(value) = answers_map.get(&id) {
            question.set_answer(value.clone());
        }
        question.answered = question.has_content() && question.has_valid_answer();
    }
    let path = resolve_active_path(&mut questions);

    let mut errors = Vec::new();
    let mut missing_required = Vec::new();
    for &position in &path {
        let question = &questions[position];
        let id = question.id_or_indexed();
        if !question.has_content() {
            if question.required && !question.kind.is_informational() {
                missing_required.push(id);
            }
            continue;
        }
        if let Some(error) = validate_value(question, &id) {
            errors.push(error);
        }
    }

    let known_ids: std::collections::BTreeSet<String> = questions
        .iter()
        .map(Question::id_or_indexed)
        .collect();
    let unknown_fields: Vec<String> = answers_map
        .keys()
        .filter(|key| !known_ids.contains(*key))
        .cloned()
        .collect();

    ValidationResult {
        valid: errors.is_empty() && missing_required.is_empty() && unknown_fields.is_empty(),
        errors,
        missing_required,
        unknown_fields,
    }
}

fn validate_value(question: &Question, id: &str) -> Option<ValidationError> {
    if answer_is_valid(question) {
        return None;
    }
    Some(ValidationError {
        question_id: Some(id.to_string()),
        path: Some(format!("/{id}")),
        message: format!("invalid {} answer", question.kind.label()),
        code: Some(format!("invalid_{}", question.kind.label())),
    })
}

/// Per-type validity of a question's current answer.
pub fn answer_is_valid(question: &Question) -> bool {
    match question.kind {
        QuestionType::SectionBreak => true,
        QuestionType::Number => question.answer.is_number(),
        QuestionType::Rate => rate_in_range(question),
        QuestionType::Email => text_matches(&question.answer, &EMAIL_RE),
        QuestionType::Url => text_matches(&question.answer, &URL_RE),
        QuestionType::Phone => text_matches(&question.answer, &PHONE_RE),
        QuestionType::Date => non_empty_text(&question.answer),
        QuestionType::Text | QuestionType::LongText | QuestionType::Password => {
            non_empty_text(&question.answer) && within_max_length(question)
        }
        QuestionType::Dropdown | QuestionType::MultipleChoice | QuestionType::MultiplePictureChoice => {
            choice_is_valid(question)
        }
    }
}

fn non_empty_text(answer: &Value) -> bool {
    answer.as_str().is_some_and(|text| !text.trim().is_empty())
}

fn text_matches(answer: &Value, pattern: &Regex) -> bool {
    answer.as_str().is_some_and(|text| pattern.is_match(text.trim()))
}

fn within_max_length(question: &Question) -> bool {
    match (question.max_length, question.answer.as_str()) {
        (Some(max), Some(text)) => text.chars().count() <= max,
        _ => true,
    }
}

const DEFAULT_MAX_RATING: u32 = 10;

fn rate_in_range(question: &Question) -> bool {
    let max = question.max_rating.unwrap_or(DEFAULT_MAX_RATING);
    question
        .answer
        .as_u64()
        .is_some_and(|rating| rating >= 1 && rating <= u64::from(max))
}

fn choice_is_valid(question: &Question) -> bool {
    if !question.has_content() {
        return false;
    }
    // Free-text entries are acceptable when the question allows them, or
    // when it carries no predefined options at all.
    if question.allow_other || question.options.is_empty() {
        return true;
    }
    match &question.answer {
        Value::Array(entries) => entries
            .iter()
            .all(|entry| question.options.iter().any(|option| option.matches(entry))),
        scalar => question.options.iter().any(|option| option.matches(scalar)),
    }
}
