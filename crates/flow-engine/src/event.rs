use serde_json::Value;

use flow_spec::AnswerSet;

/// Inputs delivered to the engine by its host.
///
/// The engine subscribes to exactly one channel; hosts translate whatever
/// raw key or widget events they have into these messages.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The widget committed a value for a question.
    Answer { id: String, value: Value },
    /// Commit the active question and move forward.
    Enter,
    /// Tab-advance; same commit semantics as Enter.
    Tab,
    /// Move back to the previous question.
    ShiftTab,
    /// Navigation control: forward.
    Next,
    /// Navigation control: backward.
    Previous,
    /// Confirm final submission.
    Submit,
    /// One elapsed second.
    Tick,
}

/// Lifecycle notifications emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// A question was successfully answered.
    Answer { question_id: String },
    /// The active question changed; carries `_submit` once the path is
    /// exhausted.
    Step { question_id: String },
    /// The completed flag flipped.
    Complete {
        completed: bool,
        question_ids: Vec<String>,
    },
    /// Final submission; fired once.
    Submit { answers: AnswerSet },
    /// One second of elapsed time while the timer runs.
    Timer { seconds: u64, formatted: String },
}
