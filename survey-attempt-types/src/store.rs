use std::future::Future;
use std::pin::Pin;

use crate::{
    AttemptId, OptionId, Question, QuestionId, QuestionOption, ResponseValue, Responses,
    StoreError, SurveyId, UserId,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read-only catalog of questions and their options.
pub trait QuestionStore: Send + Sync {
    /// All questions of a survey, ascending by question id.
    fn list_questions(
        &self,
        survey_id: SurveyId,
    ) -> BoxFuture<'_, Result<Vec<Question>, StoreError>>;

    /// The options of a multiple-choice question, in display order.
    fn list_options(
        &self,
        question_id: QuestionId,
    ) -> BoxFuture<'_, Result<Vec<QuestionOption>, StoreError>>;
}

/// Create/read/update access to attempts and their responses.
pub trait ResponseStore: Send + Sync {
    /// Return the open attempt for the pair, creating one if none exists.
    ///
    /// Calling this twice before the attempt is completed yields the same id.
    fn resolve_open_attempt(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> BoxFuture<'_, Result<AttemptId, StoreError>>;

    /// Every recorded answer of the attempt, keyed by question.
    fn list_responses(&self, attempt_id: AttemptId)
    -> BoxFuture<'_, Result<Responses, StoreError>>;

    /// Insert or overwrite the answer keyed by `(attempt_id, question_id)`.
    fn upsert_response(
        &self,
        attempt_id: AttemptId,
        question_id: QuestionId,
        value: &ResponseValue,
        option_id: Option<OptionId>,
    ) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Set the attempt's completion timestamp.
    fn complete_attempt(&self, attempt_id: AttemptId) -> BoxFuture<'_, Result<(), StoreError>>;
}
