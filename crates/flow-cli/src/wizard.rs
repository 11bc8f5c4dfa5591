use std::fmt::Write;

use serde_json::Value;

use flow_engine::{RenderPayload, RenderQuestion, RenderStatus};
use flow_spec::{AnswerSet, Progress, QuestionType};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: status, reachable questions, error details.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints prompts and state once the engine yields a question.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_answers_json: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, show_answers_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_answers_json,
        }
    }

    pub fn show_header(&mut self, payload: &RenderPayload) {
        if self.header_printed {
            return;
        }
        println!("Form: {}", payload.form_title);
        self.header_printed = true;
    }

    pub fn show_status(&self, payload: &RenderPayload) {
        if self.verbosity.is_verbose() {
            println!(
                "Status: {} ({}/{}, {})",
                payload.status.as_str(),
                payload.progress.answered,
                payload.progress.total,
                payload.percent_label,
            );
            self.print_reachable_questions(payload);
        } else if payload.status == RenderStatus::NeedInput && payload.questions.is_empty() {
            println!("No questions are reachable; check the flow's jump rules.");
        }
    }

    fn print_reachable_questions(&self, payload: &RenderPayload) {
        println!("Reachable questions:");
        for question in &payload.questions {
            let mut entry = format!(" - {} ({})", question.id, question.title);
            if question.required {
                entry.push_str(" [required]");
            }
            if question.active {
                entry.push_str(" <- active");
            }
            println!("{}", entry);
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = if prompt.total > 0 {
            format!("{}/{} {}", prompt.index, prompt.total, prompt.title)
        } else {
            format!("{} {}", prompt.index, prompt.title)
        };
        if prompt.required {
            line.push_str(" *");
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
        if let Some(description) = &prompt.description {
            println!("{}", description);
        }
        if self.verbosity.is_verbose() && !prompt.choices.is_empty() {
            println!("Choices: {}", prompt.choices.join(", "));
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_rejection(&self, notice: &str) {
        eprintln!("{}", notice);
    }

    pub fn show_completion(&self, answer_set: &AnswerSet, thank_you: &str) {
        println!("{}", thank_you);
        match answer_set.to_cbor() {
            Ok(bytes) => {
                println!("Answers (CBOR hex): {}", encode_hex(&bytes));
            }
            Err(err) => {
                eprintln!("Failed to serialize answers to CBOR: {}", err);
            }
        }
        if self.show_answers_json {
            match answer_set.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => {
                    eprintln!("Failed to serialize answers to JSON: {}", err);
                }
            }
        }
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub hint: Option<String>,
    pub choices: Vec<String>,
}

impl PromptContext {
    pub fn new(question: &RenderQuestion, progress: &Progress) -> Self {
        Self {
            index: progress.answered + 1,
            total: progress.total,
            title: question.title.clone(),
            description: question.description.clone(),
            required: question.required,
            hint: hint_for(question),
            choices: question.choices.clone(),
        }
    }
}

fn hint_for(question: &RenderQuestion) -> Option<String> {
    if question.multiple {
        return Some("(comma-separated list)".to_string());
    }
    match question.kind {
        QuestionType::Number => Some("(number)".to_string()),
        QuestionType::Rate => Some("(rating, 1 and up)".to_string()),
        QuestionType::Date => question
            .placeholder
            .as_ref()
            .map(|placeholder| format!("({})", placeholder)),
        QuestionType::Email => Some("(email address)".to_string()),
        QuestionType::Url => Some("(web address)".to_string()),
        QuestionType::Phone => Some("(phone number)".to_string()),
        QuestionType::SectionBreak => Some("(press Enter to continue)".to_string()),
        QuestionType::Dropdown if !question.choices.is_empty() => {
            Some(format!("({})", question.choices.join("/")))
        }
        _ => None,
    }
}

/// Parse one line of input into an answer value for the given question.
pub fn parse_answer(question: &RenderQuestion, input: &str) -> Result<Value, AnswerParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnswerParseError::new("an answer is required", None));
    }
    if question.multiple {
        let entries = trimmed
            .split(',')
            .map(|entry| Value::String(entry.trim().to_string()))
            .filter(|entry| entry.as_str().is_some_and(|text| !text.is_empty()))
            .collect();
        return Ok(Value::Array(entries));
    }
    match question.kind {
        QuestionType::Number => parse_number(trimmed),
        QuestionType::Rate => trimmed.parse::<u64>().map(Value::from).map_err(|_| {
            AnswerParseError::new("not a rating", Some("a positive integer".to_string()))
        }),
        _ => Ok(Value::String(trimmed.to_string())),
    }
}

fn parse_number(input: &str) -> Result<Value, AnswerParseError> {
    if let Ok(int) = input.parse::<i64>() {
        return Ok(Value::from(int));
    }
    if let Ok(float) = input.parse::<f64>()
        && float.is_finite()
        && let Some(num) = serde_json::Number::from_f64(float)
    {
        return Ok(Value::Number(num));
    }
    Err(AnswerParseError::new(
        "not a number",
        Some("an integer or decimal".to_string()),
    ))
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_question(kind: QuestionType, multiple: bool) -> RenderQuestion {
        RenderQuestion {
            id: "q".into(),
            title: "t".into(),
            description: None,
            kind,
            required: true,
            multiple,
            answered: false,
            active: true,
            current_value: None,
            placeholder: None,
            choices: Vec::new(),
        }
    }

    #[test]
    fn numbers_parse_to_numeric_values() {
        let question = render_question(QuestionType::Number, false);
        assert_eq!(parse_answer(&question, "42").expect("parse"), Value::from(42));
        assert_eq!(parse_answer(&question, "2.5").expect("parse"), Value::from(2.5));
        assert!(parse_answer(&question, "nope").is_err());
    }

    #[test]
    fn multi_select_input_splits_on_commas() {
        let question = render_question(QuestionType::MultipleChoice, true);
        let parsed = parse_answer(&question, "a, b ,c").expect("parse");
        assert_eq!(parsed, serde_json::json!(["a", "b", "c"]));
    }

    #[test]
    fn empty_input_is_rejected() {
        let question = render_question(QuestionType::Text, false);
        assert!(parse_answer(&question, "   ").is_err());
    }
}
