pub mod flow;
pub mod question;

use thiserror::Error;

pub use flow::{FlowOptions, FlowSpec};
pub use question::{ChoiceSpec, JumpSpec, QuestionSpec, QuestionType};

/// Errors surfaced while normalizing a declarative flow definition.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("duplicate question id '{0}'")]
    DuplicateQuestionId(String),
}
