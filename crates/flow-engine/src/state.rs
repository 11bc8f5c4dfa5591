/// Lifecycle of a running flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    /// No answer has been committed yet.
    #[default]
    Idle,
    /// The user is partway through the active path.
    InProgress,
    /// Every question on the active path is answered; awaiting the final
    /// confirmation.
    Completed,
    /// Final submission confirmed. Terminal.
    Submitted,
}

impl FlowState {
    pub fn label(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::InProgress => "in_progress",
            FlowState::Completed => "completed",
            FlowState::Submitted => "submitted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Submitted)
    }
}
