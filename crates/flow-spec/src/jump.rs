use std::fmt;
use std::sync::Arc;

use crate::question::Question;
use crate::spec::JumpSpec;

/// Programmatic branching rule evaluated against the question's current state.
pub type DynamicJump = Arc<dyn Fn(&Question) -> Option<String> + Send + Sync>;

/// How a question decides which question comes next.
#[derive(Clone, Default)]
pub enum JumpRule {
    /// Continue sequentially.
    #[default]
    None,
    /// Declarative answer-to-target mapping with an optional `_other` fallback.
    Targets(JumpSpec),
    /// A pure function from the question to the next question id.
    Dynamic(DynamicJump),
}

impl JumpRule {
    pub fn is_none(&self) -> bool {
        matches!(self, JumpRule::None)
    }

    pub fn from_spec(spec: Option<&JumpSpec>) -> Self {
        match spec {
            Some(jump) if !jump.targets.is_empty() => JumpRule::Targets(jump.clone()),
            _ => JumpRule::None,
        }
    }
}

impl fmt::Debug for JumpRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpRule::None => f.write_str("None"),
            JumpRule::Targets(spec) => f.debug_tuple("Targets").field(spec).finish(),
            JumpRule::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
