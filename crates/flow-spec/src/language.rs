use handlebars::Handlebars;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Display strings used by hosts and the CLI presenter.
///
/// Entries with `{{named}}` placeholders render through the template
/// engine; everything else is used verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LanguagePack {
    pub continue_label: String,
    pub skip_label: String,
    pub press_enter: String,
    pub multiple_choice_help_text: String,
    pub other_prompt: String,
    pub placeholder: String,
    pub submit_label: String,
    /// Template with a `percent` parameter.
    pub percent_completed: String,
    pub invalid_prompt: String,
    pub thank_you_text: String,
    /// Template with a `time` parameter.
    pub time_label: String,
}

impl Default for LanguagePack {
    fn default() -> Self {
        Self {
            continue_label: "Continue".into(),
            skip_label: "Skip".into(),
            press_enter: "Press Enter".into(),
            multiple_choice_help_text: "Choose as many as you like".into(),
            other_prompt: "Other".into(),
            placeholder: "Type your answer here...".into(),
            submit_label: "Submit".into(),
            percent_completed: "{{percent}}% completed".into(),
            invalid_prompt: "Please fill out the field correctly".into(),
            thank_you_text: "Thank you!".into(),
            time_label: "Time: {{time}}".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("template render failed: {0}")]
    Template(#[from] handlebars::RenderError),
}

impl LanguagePack {
    /// Render the progress label for a whole-percent value.
    pub fn format_percent(&self, percent: u8) -> Result<String, LanguageError> {
        render_template(&self.percent_completed, &json!({ "percent": percent }))
    }

    /// Render the elapsed-time label for an `mm:ss`-style reading.
    pub fn format_time(&self, time: &str) -> Result<String, LanguageError> {
        render_template(&self.time_label, &json!({ "time": time }))
    }
}

fn render_template(template: &str, data: &serde_json::Value) -> Result<String, LanguageError> {
    let registry = Handlebars::new();
    Ok(registry.render_template(template, data)?)
}
