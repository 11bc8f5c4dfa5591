use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::language::LanguagePack;
use crate::spec::question::QuestionSpec;

/// Feature switches and timer triggers for a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FlowOptions {
    pub progressbar: bool,
    pub standalone: bool,
    pub navigation: bool,
    pub timer: bool,
    /// Question id that starts the timer; the first committed answer when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_start_step: Option<String>,
    /// Question id that stops the timer; final submission when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_stop_step: Option<String>,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            progressbar: true,
            standalone: true,
            navigation: true,
            timer: false,
            timer_start_step: None,
            timer_stop_step: None,
        }
    }
}

/// Top-level conversational form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlowSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display-string overrides; English defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguagePack>,
    #[serde(default)]
    pub options: FlowOptions,
    pub questions: Vec<QuestionSpec>,
}
