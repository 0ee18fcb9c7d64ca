use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::{
    AttemptId, AttemptKey, AttemptLoader, AttemptState, LoadedAttempt, ManagerConfig, OptionId,
    QuestionId, QuestionStore, ResponseStore, ResponseValue, StoreError, SurveyId, UserId,
};

/// Error type for attempt operations.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    /// Called before an attempt was resolved. No store call was made.
    #[error("No active survey attempt")]
    NoActiveAttempt,

    /// The attempt was already submitted in this session.
    #[error("Survey attempt {0} is already completed")]
    AlreadyCompleted(AttemptId),

    #[error("Survey has unanswered questions: {missing:?}")]
    Incomplete { missing: Vec<QuestionId> },

    #[error("Survey has no questions to submit")]
    NoQuestions,

    #[error("Invalid answer for question {question}: {reason}")]
    InvalidAnswer { question: QuestionId, reason: String },

    /// The store call failed. Local state is unchanged.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AttemptError {
    /// Whether the caller misused the manager, as opposed to the store failing.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// What [`SurveyAttemptManager::apply`] did with a load result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The data now backs the state.
    Applied,

    /// The load failed; the state carries the error message.
    Failed,

    /// The result belongs to a `(survey, user)` pair that is no longer active.
    Stale,
}

/// Clears the loading flag when dropped, including when the load future is
/// dropped before completion.
struct LoadingGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> LoadingGuard<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// Owns one user's attempt at one survey.
///
/// Construct it with the stores to use, call [`initialize`](Self::initialize)
/// whenever the `(survey, user)` pair changes, then record answers and submit.
pub struct SurveyAttemptManager {
    loader: AttemptLoader,
    config: ManagerConfig,
    active: Option<AttemptKey>,
    state: AttemptState,
}

impl SurveyAttemptManager {
    /// Create a manager with the default configuration.
    pub fn new(questions: Arc<dyn QuestionStore>, responses: Arc<dyn ResponseStore>) -> Self {
        Self::with_config(questions, responses, ManagerConfig::default())
    }

    pub fn with_config(
        questions: Arc<dyn QuestionStore>,
        responses: Arc<dyn ResponseStore>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            loader: AttemptLoader::new(questions, responses, config.option_loading),
            config,
            active: None,
            state: AttemptState::default(),
        }
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The pair the state currently belongs to.
    pub fn active_key(&self) -> Option<&AttemptKey> {
        self.active.as_ref()
    }

    /// A handle for running loads outside the manager.
    pub fn loader(&self) -> AttemptLoader {
        self.loader.clone()
    }

    /// Resume or start the user's attempt at the survey and load it.
    ///
    /// Without a user nothing is loaded and the state goes back to its initial
    /// form. Store failures end up in [`AttemptState::error`]; they are not returned.
    pub async fn initialize(&mut self, survey_id: SurveyId, user_id: Option<UserId>) {
        let Some(key) = self.begin(survey_id, user_id) else {
            return;
        };

        let result = {
            let _loading = LoadingGuard::raise(&mut self.state.loading);
            self.loader.load(key.clone()).await
        };

        self.apply(&key, result);
    }

    /// Make `(survey_id, user_id)` the active pair and reset the state for it.
    ///
    /// Returns the key to tag the matching load with, or `None` when there is no
    /// user. Results for any earlier key will be rejected by [`apply`](Self::apply).
    pub fn begin(&mut self, survey_id: SurveyId, user_id: Option<UserId>) -> Option<AttemptKey> {
        let Some(user_id) = user_id else {
            self.active = None;
            self.state = AttemptState::default();
            return None;
        };

        let key = AttemptKey { survey_id, user_id };
        self.active = Some(key.clone());
        self.state = AttemptState::loading(survey_id);
        Some(key)
    }

    /// Store the outcome of a load started for `key`, unless `key` is stale.
    pub fn apply(
        &mut self,
        key: &AttemptKey,
        result: Result<LoadedAttempt, StoreError>,
    ) -> ApplyOutcome {
        let for_key = match &result {
            Ok(loaded) => &loaded.key == key,
            Err(_) => true,
        };
        let is_active = for_key && self.active.as_ref() == Some(key);
        if !is_active {
            warn!(
                survey = %key.survey_id,
                user = %key.user_id,
                "discarding load result for inactive survey attempt"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(loaded) => {
                self.state.apply_loaded(loaded);
                info!(
                    survey = %key.survey_id,
                    attempt = ?self.state.attempt_id(),
                    index = self.state.current_question_index(),
                    show_submit = self.state.show_submit_button(),
                    "survey attempt ready"
                );
                ApplyOutcome::Applied
            }
            Err(err) => {
                error!(
                    survey = %key.survey_id,
                    user = %key.user_id,
                    error = %err,
                    "failed to load survey attempt"
                );
                self.state
                    .apply_failure(self.config.load_error_message.clone());
                ApplyOutcome::Failed
            }
        }
    }

    fn open_attempt(&self) -> Result<AttemptId, AttemptError> {
        let attempt_id = self.state.attempt_id.ok_or(AttemptError::NoActiveAttempt)?;
        if self.state.completed {
            return Err(AttemptError::AlreadyCompleted(attempt_id));
        }
        Ok(attempt_id)
    }

    /// Record an answer, overwriting any previous answer to the same question.
    ///
    /// The local answer changes only once the store accepted it. The position is
    /// left alone; see [`advance_after_answer`](Self::advance_after_answer).
    #[instrument(skip(self, value))]
    pub async fn save_answer(
        &mut self,
        question_id: QuestionId,
        value: impl Into<ResponseValue>,
        option_id: Option<OptionId>,
    ) -> Result<(), AttemptError> {
        let attempt_id = self.open_attempt()?;
        let value = value.into();

        self.state
            .check_answer(question_id, option_id)
            .map_err(|reason| AttemptError::InvalidAnswer {
                question: question_id,
                reason,
            })?;

        self.loader
            .response_store()
            .upsert_response(attempt_id, question_id, &value, option_id)
            .await?;

        self.state.responses.insert(question_id, value);
        Ok(())
    }

    /// Mark the attempt as completed in the store.
    ///
    /// Does not check that every question is answered; use
    /// [`submit_if_complete`](Self::submit_if_complete) for that.
    #[instrument(skip(self))]
    pub async fn submit_survey(&mut self) -> Result<(), AttemptError> {
        let attempt_id = self.open_attempt()?;

        self.loader
            .response_store()
            .complete_attempt(attempt_id)
            .await?;

        self.state.completed = true;
        info!(%attempt_id, "survey attempt submitted");
        Ok(())
    }

    /// Fail with [`AttemptError::Incomplete`] unless every loaded question is answered.
    pub fn ensure_complete(&self) -> Result<(), AttemptError> {
        self.open_attempt()?;
        if self.state.questions.is_empty() {
            return Err(AttemptError::NoQuestions);
        }

        let missing = self.state.unanswered_questions();
        if !missing.is_empty() {
            return Err(AttemptError::Incomplete { missing });
        }
        Ok(())
    }

    /// [`ensure_complete`](Self::ensure_complete) followed by
    /// [`submit_survey`](Self::submit_survey).
    pub async fn submit_if_complete(&mut self) -> Result<(), AttemptError> {
        self.ensure_complete()?;
        self.submit_survey().await
    }

    /// No bounds check; callers keep the index within the question count.
    pub fn set_current_question_index(&mut self, index: usize) {
        self.state.set_current_question_index(index);
    }

    pub fn set_show_submit_button(&mut self, show: bool) {
        self.state.set_show_submit_button(show);
    }

    pub fn next_question(&mut self) {
        self.state.next_question();
    }

    pub fn previous_question(&mut self) {
        self.state.previous_question();
    }

    /// Jump to the next unanswered question, or show submit when none remain.
    pub fn advance_after_answer(&mut self) {
        self.state.advance_after_answer();
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use futures::future::pending;

    use super::*;
    use crate::{BoxFuture, Question, QuestionOption, Responses};

    /// A backend that never answers.
    struct Unresponsive;

    impl QuestionStore for Unresponsive {
        fn list_questions(&self, _: SurveyId) -> BoxFuture<'_, Result<Vec<Question>, StoreError>> {
            Box::pin(pending())
        }

        fn list_options(
            &self,
            _: QuestionId,
        ) -> BoxFuture<'_, Result<Vec<QuestionOption>, StoreError>> {
            Box::pin(pending())
        }
    }

    impl ResponseStore for Unresponsive {
        fn resolve_open_attempt(
            &self,
            _: SurveyId,
            _: &UserId,
        ) -> BoxFuture<'_, Result<AttemptId, StoreError>> {
            Box::pin(pending())
        }

        fn list_responses(&self, _: AttemptId) -> BoxFuture<'_, Result<Responses, StoreError>> {
            Box::pin(pending())
        }

        fn upsert_response(
            &self,
            _: AttemptId,
            _: QuestionId,
            _: &ResponseValue,
            _: Option<OptionId>,
        ) -> BoxFuture<'_, Result<(), StoreError>> {
            Box::pin(pending())
        }

        fn complete_attempt(&self, _: AttemptId) -> BoxFuture<'_, Result<(), StoreError>> {
            Box::pin(pending())
        }
    }

    fn unresponsive_manager() -> SurveyAttemptManager {
        let store = Arc::new(Unresponsive);
        SurveyAttemptManager::new(store.clone(), store)
    }

    #[test]
    fn dropping_an_initialization_clears_the_loading_flag() {
        let mut manager = unresponsive_manager();

        let pending_init = manager
            .initialize(SurveyId(1), Some(UserId::from("u1")))
            .now_or_never();
        assert!(pending_init.is_none());

        assert!(!manager.state().is_loading());
        assert!(manager.state().attempt_id().is_none());
        assert_eq!(manager.state().survey_id(), Some(SurveyId(1)));
    }

    #[test]
    fn begin_marks_the_state_as_loading() {
        let mut manager = unresponsive_manager();

        let key = manager.begin(SurveyId(3), Some(UserId::from("u1"))).unwrap();

        assert_eq!(key, AttemptKey::new(SurveyId(3), "u1"));
        assert_eq!(manager.active_key(), Some(&key));
        assert!(manager.state().is_loading());
    }

    #[test]
    fn begin_without_user_resets_everything() {
        let mut manager = unresponsive_manager();
        manager.begin(SurveyId(3), Some(UserId::from("u1")));

        assert!(manager.begin(SurveyId(3), None).is_none());
        assert_eq!(manager.active_key(), None);
        assert_eq!(manager.state(), &AttemptState::default());
    }

    #[test]
    fn result_for_another_key_is_stale() {
        let mut manager = unresponsive_manager();
        let key = manager.begin(SurveyId(3), Some(UserId::from("u1"))).unwrap();

        let loaded = LoadedAttempt {
            key: AttemptKey::new(SurveyId(4), "u1"),
            attempt_id: AttemptId::new_v4(),
            questions: Vec::new(),
            question_options: Default::default(),
            responses: Responses::new(),
        };

        assert_eq!(manager.apply(&key, Ok(loaded)), ApplyOutcome::Stale);
        assert!(manager.state().is_loading());
    }

    #[test]
    fn store_errors_are_not_input_errors() {
        let err = AttemptError::from(StoreError::Unavailable("down".into()));
        assert!(!err.is_input_error());
        assert!(AttemptError::NoActiveAttempt.is_input_error());
    }
}
