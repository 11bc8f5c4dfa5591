use crate::question::{Question, SUBMIT_TARGET};

/// Ordered positions (into the full question list) of the questions
/// reachable with the current answers.
pub type ActivePath = Vec<usize>;

/// Resolve the active path over the full question list.
///
/// Walks from the first question, reassigning serial indices as it goes.
/// An answered question with a jump rule forwards the walk to its target;
/// an unanswered question with a jump rule ends the walk, since the branch
/// cannot be resolved yet. The `_submit` sentinel and unknown targets both
/// end the flow.
pub fn resolve_active_path(questions: &mut [Question]) -> ActivePath {
    let mut path = ActivePath::new();
    let mut position = 0usize;
    while position < questions.len() {
        // A revisited question would walk forever; end the flow instead.
        if path.contains(&position) {
            break;
        }
        questions[position].set_index(path.len());
        path.push(position);

        let question = &questions[position];
        if question.jump.is_none() {
            position += 1;
        } else if question.answered {
            match question.jump_id() {
                Some(target) if target == SUBMIT_TARGET => break,
                Some(target) => match position_of(questions, &target) {
                    Some(next) => position = next,
                    // Unknown target: treated as reaching the end of the form.
                    None => break,
                },
                None => position += 1,
            }
        } else {
            break;
        }
    }
    path
}

/// Prefix of the active path up to and including the first unanswered
/// question: everything the user has completed, plus the one they are on.
pub fn rendered_prefix(questions: &[Question], path: &[usize]) -> Vec<usize> {
    let mut prefix = Vec::with_capacity(path.len());
    for &position in path {
        prefix.push(position);
        if !questions[position].answered {
            break;
        }
    }
    prefix
}

fn position_of(questions: &[Question], id: &str) -> Option<usize> {
    questions
        .iter()
        .position(|question| question.id() == Some(id))
}

/// Completion counters over an active path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn over_path(questions: &[Question], path: &[usize]) -> Self {
        let answered = path
            .iter()
            .filter(|&&position| questions[position].answered)
            .count();
        Self {
            answered,
            total: path.len(),
        }
    }

    /// Whole percent completed, floored; 0 when the path is empty.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            0
        } else {
            (self.answered * 100 / self.total) as u8
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.answered == self.total
    }
}
