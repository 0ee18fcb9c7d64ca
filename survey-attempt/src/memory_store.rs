//! In-process store for running survey attempts without a backend.
//!
//! `MemoryStore` implements both [`QuestionStore`] and [`ResponseStore`] on top of
//! plain maps. It keeps the same invariants as the hosted backend (one open
//! attempt per user and survey, one answer per question and attempt), records
//! every call it receives, and can be told to fail specific operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use survey_attempt::{MemoryStore, Question, QuestionId, QuestionKind, SurveyId, StoreOp};
//!
//! let store = MemoryStore::new().with_questions(
//!     SurveyId(1),
//!     vec![Question::new(QuestionId(1), SurveyId(1), "How rested do you feel?", QuestionKind::Scale)],
//! );
//! store.fail_next(StoreOp::ListResponses);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;

use crate::{
    AttemptId, AttemptKey, BoxFuture, OptionId, Question, QuestionId, QuestionOption,
    QuestionStore, Response, ResponseStore, ResponseValue, Responses, StoreError, SurveyAttempt,
    SurveyId, UserId,
};

/// The store operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListQuestions,
    ListOptions,
    ResolveOpenAttempt,
    ListResponses,
    UpsertResponse,
    CompleteAttempt,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListQuestions => "list_questions",
            Self::ListOptions => "list_options",
            Self::ResolveOpenAttempt => "resolve_open_attempt",
            Self::ListResponses => "list_responses",
            Self::UpsertResponse => "upsert_response",
            Self::CompleteAttempt => "complete_attempt",
        };
        f.write_str(name)
    }
}

/// One call received by the store, with its identifying arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListQuestions(SurveyId),
    ListOptions(QuestionId),
    ResolveOpenAttempt(SurveyId, UserId),
    ListResponses(AttemptId),
    UpsertResponse(AttemptId, QuestionId),
    CompleteAttempt(AttemptId),
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            Self::ListQuestions(_) => StoreOp::ListQuestions,
            Self::ListOptions(_) => StoreOp::ListOptions,
            Self::ResolveOpenAttempt(..) => StoreOp::ResolveOpenAttempt,
            Self::ListResponses(_) => StoreOp::ListResponses,
            Self::UpsertResponse(..) => StoreOp::UpsertResponse,
            Self::CompleteAttempt(_) => StoreOp::CompleteAttempt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Once,
    Always,
}

#[derive(Debug, Default)]
struct Inner {
    surveys: HashSet<SurveyId>,
    questions: BTreeMap<QuestionId, Question>,
    options: HashMap<QuestionId, Vec<QuestionOption>>,
    attempts: Vec<SurveyAttempt>,
    responses: HashMap<(AttemptId, QuestionId), Response>,
    calls: Vec<StoreCall>,
    failures: HashMap<StoreOp, Failure>,
}

impl Inner {
    /// Log the call, then fail it if a failure was injected for its operation.
    fn enter(&mut self, call: StoreCall) -> Result<(), StoreError> {
        let op = call.op();
        self.calls.push(call);

        match self.failures.get(&op).copied() {
            Some(Failure::Once) => {
                self.failures.remove(&op);
                Err(StoreError::Unavailable(format!("injected failure in {op}")))
            }
            Some(Failure::Always) => Err(StoreError::Unavailable(format!(
                "injected failure in {op}"
            ))),
            None => Ok(()),
        }
    }

    fn attempt_mut(&mut self, attempt_id: AttemptId) -> Result<&mut SurveyAttempt, StoreError> {
        self.attempts
            .iter_mut()
            .find(|a| a.id == attempt_id)
            .ok_or(StoreError::UnknownAttempt(attempt_id))
    }
}

/// A `QuestionStore` and `ResponseStore` backed by in-process maps.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

/// Serializable dump of attempts and answers.
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    attempts: &'a [SurveyAttempt],
    responses: Vec<&'a Response>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Inspection never fails; a poisoned lock still holds consistent data for reading.
    fn read(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Seeding ===

    /// Register a survey and its questions.
    pub fn with_questions(self, survey_id: SurveyId, questions: Vec<Question>) -> Self {
        {
            let mut inner = self.read();
            inner.surveys.insert(survey_id);
            for question in questions {
                inner.questions.insert(question.id, question);
            }
        }
        self
    }

    /// Register the options of a multiple-choice question.
    pub fn with_options(self, question_id: QuestionId, options: Vec<QuestionOption>) -> Self {
        self.read().options.insert(question_id, options);
        self
    }

    /// Store an attempt as if it had been created earlier.
    pub fn insert_attempt(&self, attempt: SurveyAttempt) {
        self.read().attempts.push(attempt);
    }

    /// Store an answer as if it had been given earlier.
    pub fn insert_response(
        &self,
        attempt_id: AttemptId,
        question_id: QuestionId,
        value: impl Into<ResponseValue>,
        option_id: Option<OptionId>,
    ) {
        self.read().responses.insert(
            (attempt_id, question_id),
            Response {
                attempt_id,
                question_id,
                value: value.into(),
                option_id,
                answered_at: Utc::now(),
            },
        );
    }

    // === Failure injection ===

    /// Fail the next call of `op` with `StoreError::Unavailable`.
    pub fn fail_next(&self, op: StoreOp) {
        self.read().failures.insert(op, Failure::Once);
    }

    /// Fail every call of `op` until [`clear_failures`](Self::clear_failures).
    pub fn fail_always(&self, op: StoreOp) {
        self.read().failures.insert(op, Failure::Always);
    }

    pub fn clear_failures(&self) {
        self.read().failures.clear();
    }

    // === Inspection ===

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.read().calls.clone()
    }

    pub fn call_count(&self, op: StoreOp) -> usize {
        self.read().calls.iter().filter(|c| c.op() == op).count()
    }

    pub fn clear_calls(&self) {
        self.read().calls.clear();
    }

    pub fn attempt(&self, attempt_id: AttemptId) -> Option<SurveyAttempt> {
        self.read()
            .attempts
            .iter()
            .find(|a| a.id == attempt_id)
            .cloned()
    }

    /// All attempts of a `(survey, user)` pair, open or completed.
    pub fn attempts_for(&self, key: &AttemptKey) -> Vec<SurveyAttempt> {
        self.read()
            .attempts
            .iter()
            .filter(|a| a.belongs_to(key))
            .cloned()
            .collect()
    }

    /// The stored answer rows of an attempt, ascending by question id.
    pub fn responses_for(&self, attempt_id: AttemptId) -> Vec<Response> {
        let mut rows: Vec<Response> = self
            .read()
            .responses
            .values()
            .filter(|r| r.attempt_id == attempt_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.question_id);
        rows
    }

    /// Attempts and answers as pretty-printed JSON.
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        let inner = self.read();
        let mut responses: Vec<&Response> = inner.responses.values().collect();
        responses.sort_by_key(|r| (r.attempt_id.to_string(), r.question_id));
        serde_json::to_string_pretty(&Snapshot {
            attempts: &inner.attempts,
            responses,
        })
    }
}

impl Inner {
    fn list_questions(&mut self, survey_id: SurveyId) -> Result<Vec<Question>, StoreError> {
        self.enter(StoreCall::ListQuestions(survey_id))?;

        if !self.surveys.contains(&survey_id) {
            return Err(StoreError::UnknownSurvey(survey_id));
        }
        Ok(self
            .questions
            .values()
            .filter(|q| q.survey_id == survey_id)
            .cloned()
            .collect())
    }

    fn list_options(&mut self, question_id: QuestionId) -> Result<Vec<QuestionOption>, StoreError> {
        self.enter(StoreCall::ListOptions(question_id))?;

        if !self.questions.contains_key(&question_id) {
            return Err(StoreError::UnknownQuestion(question_id));
        }
        Ok(self.options.get(&question_id).cloned().unwrap_or_default())
    }

    fn resolve_open_attempt(&mut self, key: AttemptKey) -> Result<AttemptId, StoreError> {
        self.enter(StoreCall::ResolveOpenAttempt(
            key.survey_id,
            key.user_id.clone(),
        ))?;

        if !self.surveys.contains(&key.survey_id) {
            return Err(StoreError::UnknownSurvey(key.survey_id));
        }
        if let Some(open) = self
            .attempts
            .iter()
            .find(|a| a.is_open() && a.belongs_to(&key))
        {
            return Ok(open.id);
        }

        let attempt = SurveyAttempt::open(key.survey_id, key.user_id);
        let id = attempt.id;
        self.attempts.push(attempt);
        Ok(id)
    }

    fn list_responses(&mut self, attempt_id: AttemptId) -> Result<Responses, StoreError> {
        self.enter(StoreCall::ListResponses(attempt_id))?;
        self.attempt_mut(attempt_id)?;

        Ok(self
            .responses
            .values()
            .filter(|r| r.attempt_id == attempt_id)
            .map(|r| (r.question_id, r.value.clone()))
            .collect())
    }

    fn upsert_response(
        &mut self,
        attempt_id: AttemptId,
        question_id: QuestionId,
        value: ResponseValue,
        option_id: Option<OptionId>,
    ) -> Result<(), StoreError> {
        self.enter(StoreCall::UpsertResponse(attempt_id, question_id))?;

        if !self.attempt_mut(attempt_id)?.is_open() {
            return Err(StoreError::Rejected(format!(
                "attempt {attempt_id} is already completed"
            )));
        }
        if !self.questions.contains_key(&question_id) {
            return Err(StoreError::UnknownQuestion(question_id));
        }

        self.responses.insert(
            (attempt_id, question_id),
            Response {
                attempt_id,
                question_id,
                value,
                option_id,
                answered_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn complete_attempt(&mut self, attempt_id: AttemptId) -> Result<(), StoreError> {
        self.enter(StoreCall::CompleteAttempt(attempt_id))?;

        let attempt = self.attempt_mut(attempt_id)?;
        if !attempt.is_open() {
            return Err(StoreError::Rejected(format!(
                "attempt {attempt_id} is already completed"
            )));
        }
        attempt.completed_at = Some(Utc::now());
        Ok(())
    }
}

impl QuestionStore for MemoryStore {
    fn list_questions(
        &self,
        survey_id: SurveyId,
    ) -> BoxFuture<'_, Result<Vec<Question>, StoreError>> {
        Box::pin(async move { self.lock()?.list_questions(survey_id) })
    }

    fn list_options(
        &self,
        question_id: QuestionId,
    ) -> BoxFuture<'_, Result<Vec<QuestionOption>, StoreError>> {
        Box::pin(async move { self.lock()?.list_options(question_id) })
    }
}

impl ResponseStore for MemoryStore {
    fn resolve_open_attempt(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> BoxFuture<'_, Result<AttemptId, StoreError>> {
        let key = AttemptKey::new(survey_id, user_id.clone());
        Box::pin(async move { self.lock()?.resolve_open_attempt(key) })
    }

    fn list_responses(
        &self,
        attempt_id: AttemptId,
    ) -> BoxFuture<'_, Result<Responses, StoreError>> {
        Box::pin(async move { self.lock()?.list_responses(attempt_id) })
    }

    fn upsert_response(
        &self,
        attempt_id: AttemptId,
        question_id: QuestionId,
        value: &ResponseValue,
        option_id: Option<OptionId>,
    ) -> BoxFuture<'_, Result<(), StoreError>> {
        let value = value.clone();
        Box::pin(async move {
            self.lock()?
                .upsert_response(attempt_id, question_id, value, option_id)
        })
    }

    fn complete_attempt(&self, attempt_id: AttemptId) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move { self.lock()?.complete_attempt(attempt_id) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestionKind;

    fn store() -> MemoryStore {
        MemoryStore::new().with_questions(
            SurveyId(1),
            vec![
                Question::new(QuestionId(1), SurveyId(1), "Energy", QuestionKind::Scale),
                Question::new(QuestionId(2), SurveyId(1), "Notes", QuestionKind::Text),
            ],
        )
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        futures::executor::block_on(future)
    }

    #[test]
    fn resolve_is_idempotent_until_completion() {
        let store = store();
        let user = UserId::from("u1");

        let first = block_on(store.resolve_open_attempt(SurveyId(1), &user)).unwrap();
        let second = block_on(store.resolve_open_attempt(SurveyId(1), &user)).unwrap();
        assert_eq!(first, second);

        block_on(store.complete_attempt(first)).unwrap();
        let third = block_on(store.resolve_open_attempt(SurveyId(1), &user)).unwrap();
        assert_ne!(first, third);
        assert_eq!(
            store.attempts_for(&AttemptKey::new(SurveyId(1), "u1")).len(),
            2
        );
    }

    #[test]
    fn upsert_keeps_one_row_per_question() {
        let store = store();
        let attempt = block_on(store.resolve_open_attempt(SurveyId(1), &"u1".into())).unwrap();

        block_on(store.upsert_response(attempt, QuestionId(1), &ResponseValue::Int(2), None))
            .unwrap();
        block_on(store.upsert_response(attempt, QuestionId(1), &ResponseValue::Int(5), None))
            .unwrap();

        let rows = store.responses_for(attempt);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, ResponseValue::Int(5));
    }

    #[test]
    fn completing_twice_is_rejected() {
        let store = store();
        let attempt = block_on(store.resolve_open_attempt(SurveyId(1), &"u1".into())).unwrap();

        block_on(store.complete_attempt(attempt)).unwrap();
        let again = block_on(store.complete_attempt(attempt));
        assert!(matches!(again, Err(StoreError::Rejected(_))));

        let write = block_on(store.upsert_response(attempt, QuestionId(1), &4.into(), None));
        assert!(matches!(write, Err(StoreError::Rejected(_))));
    }

    #[test]
    fn unknown_survey_fails() {
        let store = store();
        let result = block_on(store.list_questions(SurveyId(9)));
        assert!(matches!(result, Err(StoreError::UnknownSurvey(SurveyId(9)))));
    }

    #[test]
    fn injected_failures() {
        let store = store();

        store.fail_next(StoreOp::ListQuestions);
        assert!(block_on(store.list_questions(SurveyId(1))).is_err());
        assert!(block_on(store.list_questions(SurveyId(1))).is_ok());

        store.fail_always(StoreOp::ListQuestions);
        assert!(block_on(store.list_questions(SurveyId(1))).is_err());
        assert!(block_on(store.list_questions(SurveyId(1))).is_err());
        store.clear_failures();
        assert!(block_on(store.list_questions(SurveyId(1))).is_ok());

        assert_eq!(store.call_count(StoreOp::ListQuestions), 5);
    }

    #[test]
    fn snapshot_lists_attempts_and_answers() {
        let store = store();
        let attempt = block_on(store.resolve_open_attempt(SurveyId(1), &"u1".into())).unwrap();
        store.insert_response(attempt, QuestionId(2), "Long weeks", None);

        let json: serde_json::Value =
            serde_json::from_str(&store.snapshot_json().unwrap()).unwrap();
        assert_eq!(json["attempts"].as_array().unwrap().len(), 1);
        assert_eq!(json["responses"][0]["value"], "Long weeks");
    }
}
