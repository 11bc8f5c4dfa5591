use serde_json::{Map, Value, json};

use flow_spec::{ChoiceOption, Progress, QuestionType, display_value};

use crate::engine::FlowForm;
use crate::state::FlowState;

/// Status labels exposed to hosts and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// More input is required.
    NeedInput,
    /// Every reachable question is answered; awaiting confirmation.
    Complete,
    /// Final submission confirmed.
    Submitted,
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::NeedInput => "need_input",
            RenderStatus::Complete => "complete",
            RenderStatus::Submitted => "submitted",
        }
    }

    fn from_state(state: FlowState) -> Self {
        match state {
            FlowState::Idle | FlowState::InProgress => RenderStatus::NeedInput,
            FlowState::Completed => RenderStatus::Complete,
            FlowState::Submitted => RenderStatus::Submitted,
        }
    }
}

/// Describes a single reachable question for render outputs.
#[derive(Debug, Clone)]
pub struct RenderQuestion {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: QuestionType,
    pub required: bool,
    pub multiple: bool,
    pub answered: bool,
    pub active: bool,
    pub current_value: Option<Value>,
    pub placeholder: Option<String>,
    pub choices: Vec<String>,
}

/// Collected payload used by both the text and the JSON renderer.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub form_title: String,
    pub status: RenderStatus,
    pub active_question_id: Option<String>,
    pub progress: Progress,
    pub percent_label: String,
    pub questions: Vec<RenderQuestion>,
}

/// Build the renderer payload from the engine's current state.
pub fn build_render_payload(form: &FlowForm) -> RenderPayload {
    let active_id = form.active_question_id();
    let progress = form.progress();
    let percent = progress.percent();
    let percent_label = form
        .language()
        .format_percent(percent)
        .unwrap_or_else(|_| format!("{percent}%"));

    let questions = form
        .path_questions()
        .map(|question| {
            let id = question.id_or_indexed();
            RenderQuestion {
                active: Some(&id) == active_id.as_ref(),
                id,
                title: question.title.clone(),
                description: question.description.clone(),
                kind: question.kind,
                required: question.required,
                multiple: question.multiple,
                answered: question.answered,
                current_value: (!question.answer.is_null()).then(|| question.answer.clone()),
                placeholder: question.placeholder.clone(),
                choices: question.options.iter().map(ChoiceOption::choice_label).collect(),
            }
        })
        .collect();

    RenderPayload {
        form_title: form.title().to_string(),
        status: RenderStatus::from_state(form.state()),
        active_question_id: active_id,
        progress,
        percent_label,
        questions,
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let questions = payload
        .questions
        .iter()
        .map(|question| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(question.id.clone()));
            map.insert("title".into(), Value::String(question.title.clone()));
            map.insert(
                "description".into(),
                question
                    .description
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
            map.insert(
                "type".into(),
                Value::String(question.kind.label().to_string()),
            );
            map.insert("required".into(), Value::Bool(question.required));
            map.insert("multiple".into(), Value::Bool(question.multiple));
            map.insert("answered".into(), Value::Bool(question.answered));
            map.insert("active".into(), Value::Bool(question.active));
            if let Some(current_value) = &question.current_value {
                map.insert("current_value".into(), current_value.clone());
            }
            if !question.choices.is_empty() {
                map.insert(
                    "choices".into(),
                    Value::Array(
                        question
                            .choices
                            .iter()
                            .map(|choice| Value::String(choice.clone()))
                            .collect(),
                    ),
                );
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "form_title": payload.form_title,
        "status": payload.status.as_str(),
        "active_question_id": payload.active_question_id,
        "progress": {
            "answered": payload.progress.answered,
            "total": payload.progress.total,
            "percent": payload.progress.percent(),
            "label": payload.percent_label,
        },
        "questions": questions,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {}", payload.form_title));
    lines.push(format!(
        "Status: {} ({}/{}, {})",
        payload.status.as_str(),
        payload.progress.answered,
        payload.progress.total,
        payload.percent_label,
    ));

    if let Some(active) = &payload.active_question_id {
        lines.push(format!("Active question: {}", active));
        if let Some(question) = payload
            .questions
            .iter()
            .find(|question| &question.id == active)
        {
            lines.push(format!("  Title: {}", question.title));
            if let Some(description) = &question.description {
                lines.push(format!("  Description: {}", description));
            }
            if question.required {
                lines.push("  Required: yes".to_string());
            }
            if !question.choices.is_empty() {
                lines.push(format!("  Choices: {}", question.choices.join(", ")));
            }
        }
    } else {
        lines.push("Every reachable question is answered.".to_string());
    }

    lines.push("Reachable questions:".to_string());
    for question in &payload.questions {
        let mut entry = format!(" - {} ({})", question.id, question.title);
        if question.required {
            entry.push_str(" [required]");
        }
        if let Some(current_value) = &question.current_value {
            entry.push_str(&format!(" = {}", display_value(current_value)));
        }
        lines.push(entry);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_spec::FlowSpec;
    use serde_json::json;

    fn form() -> FlowForm {
        let spec: FlowSpec = serde_json::from_value(json!({
            "title": "Feedback",
            "questions": [
                { "id": "q1", "type": "text", "title": "One", "required": true },
                { "id": "q2", "type": "text", "title": "Two", "required": true }
            ]
        }))
        .expect("flow spec");
        FlowForm::from_spec(&spec).expect("flow form")
    }

    #[test]
    fn payload_reports_the_active_question_and_progress() {
        let form = form();
        let payload = build_render_payload(&form);
        assert_eq!(payload.status, RenderStatus::NeedInput);
        assert_eq!(payload.active_question_id.as_deref(), Some("q1"));
        assert_eq!(payload.progress.total, 2);
        assert_eq!(payload.percent_label, "0% completed");
    }

    #[test]
    fn json_ui_marks_the_active_entry() {
        let form = form();
        let ui = render_json_ui(&build_render_payload(&form));
        assert_eq!(ui["form_title"], "Feedback");
        assert_eq!(ui["questions"][0]["active"], true);
        assert_eq!(ui["questions"][1]["active"], false);
        assert_eq!(ui["progress"]["percent"], 0);
    }

    #[test]
    fn text_render_lists_reachable_questions() {
        let form = form();
        let text = render_text(&build_render_payload(&form));
        assert!(text.contains("Form: Feedback"));
        assert!(text.contains("Active question: q1"));
        assert!(text.contains("Reachable questions:"));
    }
}
