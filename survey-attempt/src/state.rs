use std::collections::HashMap;

use crate::{
    AttemptId, LoadedAttempt, OptionId, Question, QuestionId, QuestionOption, Responses, SurveyId,
};

/// Where the user should be placed in the question sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub show_submit: bool,
}

/// Work out the resume position from the loaded questions and answers.
///
/// - The first question (in the given order) without an answer becomes current.
/// - If every question is answered and at least one answer exists, the last
///   question is current and the submit affordance is shown.
/// - With no answers at all, the position stays at the first question.
pub fn derive_position(questions: &[Question], responses: &Responses) -> Position {
    if let Some(index) = questions.iter().position(|q| !responses.contains(q.id)) {
        return Position {
            index,
            show_submit: false,
        };
    }

    if responses.is_empty() {
        return Position::default();
    }

    Position {
        index: questions.len().saturating_sub(1),
        show_submit: true,
    }
}

/// Everything the UI needs to render one survey attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttemptState {
    pub(crate) survey_id: Option<SurveyId>,
    pub(crate) attempt_id: Option<AttemptId>,
    pub(crate) questions: Vec<Question>,
    pub(crate) question_options: HashMap<QuestionId, Vec<QuestionOption>>,
    pub(crate) responses: Responses,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) current_question_index: usize,
    pub(crate) show_submit_button: bool,
    pub(crate) completed: bool,
}

impl AttemptState {
    /// Initial state for a survey whose attempt is about to be loaded.
    pub(crate) fn loading(survey_id: SurveyId) -> Self {
        Self {
            survey_id: Some(survey_id),
            loading: true,
            ..Self::default()
        }
    }

    pub(crate) fn apply_loaded(&mut self, loaded: LoadedAttempt) {
        let position = derive_position(&loaded.questions, &loaded.responses);

        self.attempt_id = Some(loaded.attempt_id);
        self.questions = loaded.questions;
        self.question_options = loaded.question_options;
        self.responses = loaded.responses;
        self.current_question_index = position.index;
        self.show_submit_button = position.show_submit;
        self.error = None;
        self.loading = false;
    }

    pub(crate) fn apply_failure(&mut self, message: String) {
        self.attempt_id = None;
        self.questions.clear();
        self.question_options.clear();
        self.responses = Responses::new();
        self.current_question_index = 0;
        self.show_submit_button = false;
        self.error = Some(message);
        self.loading = false;
    }

    pub fn survey_id(&self) -> Option<SurveyId> {
        self.survey_id
    }

    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    /// Questions ascending by id.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Options per multiple-choice question. Other questions have no entry.
    pub fn question_options(&self) -> &HashMap<QuestionId, Vec<QuestionOption>> {
        &self.question_options
    }

    pub fn options_for(&self, question: QuestionId) -> Option<&[QuestionOption]> {
        self.question_options.get(&question).map(Vec::as_slice)
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn show_submit_button(&self) -> bool {
        self.show_submit_button
    }

    /// Whether the attempt was submitted during this session.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// The question at the current index, if the index is in bounds.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    /// Questions without an answer, in question order.
    pub fn unanswered_questions(&self) -> Vec<QuestionId> {
        self.questions
            .iter()
            .filter(|q| !self.responses.contains(q.id))
            .map(|q| q.id)
            .collect()
    }

    /// Every loaded question has an answer. A survey without questions is never complete.
    pub fn is_complete(&self) -> bool {
        !self.questions.is_empty() && self.questions.iter().all(|q| self.responses.contains(q.id))
    }

    /// `(answered, total)` counted over the loaded questions only.
    pub fn progress(&self) -> (usize, usize) {
        let answered = self
            .questions
            .iter()
            .filter(|q| self.responses.contains(q.id))
            .count();
        (answered, self.questions.len())
    }

    pub(crate) fn set_current_question_index(&mut self, index: usize) {
        self.current_question_index = index;
    }

    pub(crate) fn set_show_submit_button(&mut self, show: bool) {
        self.show_submit_button = show;
    }

    pub(crate) fn next_question(&mut self) {
        let last = self.questions.len().saturating_sub(1);
        self.current_question_index = self.current_question_index.saturating_add(1).min(last);
    }

    pub(crate) fn previous_question(&mut self) {
        self.current_question_index = self.current_question_index.saturating_sub(1);
    }

    /// Move to the next unanswered question after the current one, wrapping around
    /// to earlier gaps. With no gaps left, stay on the last question and show submit.
    pub(crate) fn advance_after_answer(&mut self) {
        let len = self.questions.len();
        if len == 0 {
            return;
        }

        let start = self.current_question_index.min(len - 1);
        let next_gap = (1..=len)
            .map(|step| (start + step) % len)
            .find(|&i| !self.responses.contains(self.questions[i].id));

        match next_gap {
            Some(index) => {
                self.current_question_index = index;
                self.show_submit_button = false;
            }
            None => {
                self.current_question_index = len - 1;
                self.show_submit_button = true;
            }
        }
    }

    /// Check that a chosen option belongs to the question it answers.
    ///
    /// Values are stored as given; only the option reference is checked, and only
    /// for questions whose options were loaded.
    pub(crate) fn check_answer(
        &self,
        question_id: QuestionId,
        option_id: Option<OptionId>,
    ) -> Result<(), String> {
        if let (Some(option_id), Some(options)) = (option_id, self.options_for(question_id))
            && !options.iter().any(|o| o.id == option_id)
        {
            return Err(format!("option {option_id} is not one of this question's options"));
        }
        Ok(())
    }
}
