#![allow(missing_docs)]

pub mod answers;
pub mod answers_schema;
pub mod choice;
pub mod jump;
pub mod language;
pub mod path;
pub mod question;
pub mod spec;
pub mod validate;

pub use answers::{AnswerExportError, AnswerSet, display_value};
pub use answers_schema::generate as answers_schema;
pub use choice::ChoiceOption;
pub use jump::{DynamicJump, JumpRule};
pub use language::{LanguageError, LanguagePack};
pub use path::{ActivePath, Progress, rendered_prefix, resolve_active_path};
pub use question::{Question, SUBMIT_TARGET};
pub use spec::{ChoiceSpec, FlowOptions, FlowSpec, JumpSpec, QuestionSpec, QuestionType, SpecError};
pub use validate::{ValidationError, ValidationResult, answer_is_valid, validate};
