use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use flow_spec::{
    AnswerSet, DynamicJump, FlowOptions, FlowSpec, LanguagePack, Progress, Question, SUBMIT_TARGET,
    SpecError, rendered_prefix, resolve_active_path,
};

use crate::event::{FlowEvent, InputEvent};
use crate::state::FlowState;
use crate::timer::FlowTimer;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("unknown question id '{0}'")]
    UnknownQuestion(String),
}

/// Conversational form orchestrator.
///
/// Owns the full question list, resolves the active path on every answer
/// change, tracks the cursor, and reports lifecycle changes as
/// [`FlowEvent`]s returned from [`FlowForm::handle`]. All mutation goes
/// through the input channel; hosts read state through the accessors.
#[derive(Debug)]
pub struct FlowForm {
    title: String,
    questions: Vec<Question>,
    options: FlowOptions,
    language: LanguagePack,
    active_path: Vec<usize>,
    question_list: Vec<usize>,
    active_question_index: usize,
    state: FlowState,
    completed: bool,
    submitted: bool,
    reverse: bool,
    timer: FlowTimer,
}

impl FlowForm {
    /// Normalize a declarative definition into a runnable flow.
    pub fn from_spec(spec: &FlowSpec) -> Result<Self, EngineError> {
        let questions = spec
            .questions
            .iter()
            .enumerate()
            .map(|(position, question)| Question::from_spec(question, position))
            .collect();
        Self::new(
            spec.title.clone(),
            questions,
            spec.options.clone(),
            spec.language.clone().unwrap_or_default(),
        )
    }

    pub fn new(
        title: impl Into<String>,
        mut questions: Vec<Question>,
        options: FlowOptions,
        language: LanguagePack,
    ) -> Result<Self, EngineError> {
        for (position, question) in questions.iter_mut().enumerate() {
            question.set_index(position);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            let id = question.id_or_indexed();
            if !seen.insert(id.clone()) {
                return Err(SpecError::DuplicateQuestionId(id).into());
            }
        }

        let mut form = Self {
            title: title.into(),
            questions,
            options,
            language,
            active_path: Vec::new(),
            question_list: Vec::new(),
            active_question_index: 0,
            state: FlowState::Idle,
            completed: false,
            submitted: false,
            reverse: false,
            timer: FlowTimer::default(),
        };
        form.refresh();
        form.completed = form.path_is_complete();
        form.active_question_index = if form.completed {
            form.question_list.len()
        } else {
            form.question_list.len().saturating_sub(1)
        };
        form.transition();
        // An explicit start step that is already active starts timing now.
        if form.options.timer
            && let Some(start) = form.options.timer_start_step.clone()
            && form.active_question_id().as_deref() == Some(start.as_str())
        {
            form.timer.start();
        }
        Ok(form)
    }

    /// Deliver one input; returns the lifecycle events it produced.
    /// All bindings are suppressed once the form is submitted.
    pub fn handle(&mut self, input: InputEvent) -> Vec<FlowEvent> {
        let mut events = Vec::new();
        if self.submitted {
            return events;
        }
        match input {
            InputEvent::Answer { id, value } => self.commit_answer(&id, value, &mut events),
            InputEvent::Enter | InputEvent::Tab => self.commit_active(&mut events),
            InputEvent::ShiftTab | InputEvent::Previous => self.step_back(&mut events),
            InputEvent::Next => self.step_forward(&mut events),
            InputEvent::Submit => self.submit(&mut events),
            InputEvent::Tick => self.tick(&mut events),
        }
        events
    }

    /// Attach a programmatic jump rule to a question.
    pub fn set_dynamic_jump(&mut self, id: &str, rule: DynamicJump) -> Result<(), EngineError> {
        let Some(position) = self.position_of(id) else {
            return Err(EngineError::UnknownQuestion(id.to_string()));
        };
        self.questions[position].set_dynamic_jump(rule);
        self.refresh();
        self.clamp_cursor();
        self.completed = self.path_is_complete();
        self.transition();
        Ok(())
    }

    // --- accessors -------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Whether the last step change moved backwards.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn language(&self) -> &LanguagePack {
        &self.language
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    pub fn timer(&self) -> &FlowTimer {
        &self.timer
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions on the currently resolved active path.
    pub fn path_questions(&self) -> impl Iterator<Item = &Question> {
        self.active_path.iter().map(|&position| &self.questions[position])
    }

    /// The rendered subset: every answered question plus the active one.
    pub fn rendered_questions(&self) -> impl Iterator<Item = &Question> {
        self.question_list.iter().map(|&position| &self.questions[position])
    }

    pub fn active_question_index(&self) -> usize {
        self.active_question_index
    }

    pub fn num_active_questions(&self) -> usize {
        self.active_path.len()
    }

    pub fn active_question(&self) -> Option<&Question> {
        self.question_list
            .get(self.active_question_index)
            .map(|&position| &self.questions[position])
    }

    pub fn active_question_id(&self) -> Option<String> {
        self.active_question().map(Question::id_or_indexed)
    }

    pub fn progress(&self) -> Progress {
        Progress::over_path(&self.questions, &self.active_path)
    }

    pub fn percent_completed(&self) -> u8 {
        self.progress().percent()
    }

    /// Snapshot of the answers collected along the active path.
    pub fn answer_set(&self) -> AnswerSet {
        let mut answers = AnswerSet::default();
        for question in self.path_questions() {
            if question.answered && !question.kind.is_informational() {
                answers.insert(question.id_or_indexed(), question.answer.clone());
            }
        }
        answers
    }

    // --- transitions -----------------------------------------------------

    fn commit_answer(&mut self, id: &str, value: Value, events: &mut Vec<FlowEvent>) {
        let Some(position) = self.position_of(id) else {
            return;
        };
        let question = &mut self.questions[position];
        question.set_answer(value);
        let valid = question.has_valid_answer();
        question.answered = valid;
        if !valid {
            // An invalidating edit reverts the terminal-but-unsubmitted state.
            self.refresh();
            self.clamp_cursor();
            self.sync_completed(events);
            return;
        }
        events.push(FlowEvent::Answer {
            question_id: id.to_string(),
        });
        self.default_timer_start();
        if self.question_list.get(self.active_question_index) == Some(&position) {
            self.advance(events);
        } else {
            self.refresh();
            self.clamp_cursor();
            self.sync_completed(events);
        }
    }

    fn commit_active(&mut self, events: &mut Vec<FlowEvent>) {
        let Some(&position) = self.question_list.get(self.active_question_index) else {
            // Enter on the closing step confirms submission.
            if self.completed {
                self.submit(events);
            }
            return;
        };
        let question = &mut self.questions[position];
        let skippable = !question.required && !question.has_content();
        if !question.has_valid_answer() && !skippable {
            // Invalid answers never advance; the widget keeps focus.
            return;
        }
        if !question.answered {
            question.answered = true;
            events.push(FlowEvent::Answer {
                question_id: question.id_or_indexed(),
            });
        }
        self.default_timer_start();
        self.advance(events);
    }

    /// The answer pathway: recompute the path, then move the cursor, then
    /// report the step. That ordering is load-bearing.
    fn advance(&mut self, events: &mut Vec<FlowEvent>) {
        self.reverse = false;
        self.refresh();
        self.clamp_cursor();
        let current_answered = self
            .question_list
            .get(self.active_question_index)
            .is_some_and(|&position| self.questions[position].answered);
        if current_answered {
            self.active_question_index += 1;
        }

        if let Some(&position) = self.question_list.get(self.active_question_index) {
            self.sync_completed(events);
            let question_id = self.questions[position].id_or_indexed();
            self.timer_on_activate(&question_id);
            events.push(FlowEvent::Step { question_id });
        } else if !self.active_path.is_empty() && self.active_question_index >= self.active_path.len()
        {
            self.sync_completed(events);
            events.push(FlowEvent::Step {
                question_id: SUBMIT_TARGET.to_string(),
            });
        }
    }

    fn step_back(&mut self, events: &mut Vec<FlowEvent>) {
        if self.active_question_index == 0 {
            return;
        }
        // Stepping back off the stop step resumes timing.
        if self.options.timer
            && let Some(stop) = self.options.timer_stop_step.clone()
            && self.active_question_id().as_deref() == Some(stop.as_str())
        {
            self.timer.start();
        }
        self.active_question_index -= 1;
        self.reverse = true;
        if let Some(question_id) = self.active_question_id() {
            events.push(FlowEvent::Step { question_id });
        }
    }

    fn step_forward(&mut self, events: &mut Vec<FlowEvent>) {
        let revisiting = self.active_question_index + 1 < self.question_list.len();
        let optional = self
            .active_question()
            .is_some_and(|question| !question.required);
        let reviewing_completed =
            self.completed && self.active_question_index < self.question_list.len();
        if optional || revisiting || reviewing_completed {
            self.commit_active(events);
        }
    }

    fn submit(&mut self, events: &mut Vec<FlowEvent>) {
        // Guard, not an error: submission is only reachable once completed.
        if !self.completed || self.submitted {
            return;
        }
        self.submitted = true;
        self.timer.stop();
        self.transition();
        events.push(FlowEvent::Submit {
            answers: self.answer_set(),
        });
    }

    fn tick(&mut self, events: &mut Vec<FlowEvent>) {
        if !self.options.timer {
            return;
        }
        if let Some((seconds, formatted)) = self.timer.tick() {
            events.push(FlowEvent::Timer { seconds, formatted });
        }
    }

    // --- internals -------------------------------------------------------

    fn refresh(&mut self) {
        self.active_path = resolve_active_path(&mut self.questions);
        self.question_list = rendered_prefix(&self.questions, &self.active_path);
    }

    fn clamp_cursor(&mut self) {
        if self.active_question_index > self.question_list.len() {
            self.active_question_index = self.question_list.len();
        }
        // The closing pseudo-step is only reachable while completed.
        if !self.path_is_complete() && self.active_question_index >= self.question_list.len() {
            self.active_question_index = self.question_list.len().saturating_sub(1);
        }
    }

    fn path_is_complete(&self) -> bool {
        !self.active_path.is_empty()
            && self
                .active_path
                .iter()
                .all(|&position| self.questions[position].answered)
    }

    fn sync_completed(&mut self, events: &mut Vec<FlowEvent>) {
        let complete = self.path_is_complete();
        if complete != self.completed {
            self.completed = complete;
            self.transition();
            events.push(FlowEvent::Complete {
                completed: complete,
                question_ids: self.path_questions().map(Question::id_or_indexed).collect(),
            });
        } else {
            self.transition();
        }
    }

    fn transition(&mut self) {
        self.state = if self.submitted {
            FlowState::Submitted
        } else if self.completed {
            FlowState::Completed
        } else if self.questions.iter().any(|question| question.answered) {
            FlowState::InProgress
        } else {
            FlowState::Idle
        };
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.questions
            .iter()
            .position(|question| question.id() == Some(id))
    }

    /// Default timer start: the first committed answer begins timing.
    fn default_timer_start(&mut self) {
        if self.options.timer
            && self.options.timer_start_step.is_none()
            && self.state == FlowState::Idle
        {
            self.timer.start();
        }
    }

    fn timer_on_activate(&mut self, question_id: &str) {
        if !self.options.timer {
            return;
        }
        if let Some(start) = &self.options.timer_start_step
            && start == question_id
        {
            self.timer.start();
        }
        if let Some(stop) = &self.options.timer_stop_step
            && stop == question_id
        {
            self.timer.stop();
        }
    }
}
