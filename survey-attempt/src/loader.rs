use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use crate::{
    AttemptId, AttemptKey, OptionLoading, Question, QuestionId, QuestionOption, QuestionStore,
    ResponseStore, Responses, StoreError,
};

/// Everything fetched for one `(survey, user)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAttempt {
    /// The pair this load was started for.
    pub key: AttemptKey,
    pub attempt_id: AttemptId,
    pub questions: Vec<Question>,
    pub question_options: HashMap<QuestionId, Vec<QuestionOption>>,
    pub responses: Responses,
}

/// Fetches attempt data from the injected stores.
///
/// Cheap to clone, so a caller can run a load on its own task and hand the result
/// back to [`SurveyAttemptManager::apply`](crate::SurveyAttemptManager::apply).
#[derive(Clone)]
pub struct AttemptLoader {
    questions: Arc<dyn QuestionStore>,
    responses: Arc<dyn ResponseStore>,
    option_loading: OptionLoading,
}

impl fmt::Debug for AttemptLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptLoader")
            .field("option_loading", &self.option_loading)
            .finish_non_exhaustive()
    }
}

impl AttemptLoader {
    pub fn new(
        questions: Arc<dyn QuestionStore>,
        responses: Arc<dyn ResponseStore>,
        option_loading: OptionLoading,
    ) -> Self {
        Self {
            questions,
            responses,
            option_loading,
        }
    }

    pub(crate) fn response_store(&self) -> &dyn ResponseStore {
        self.responses.as_ref()
    }

    /// Resolve the open attempt, then load questions, options and answers in that order.
    #[instrument(skip(self), fields(survey = %key.survey_id, user = %key.user_id))]
    pub async fn load(&self, key: AttemptKey) -> Result<LoadedAttempt, StoreError> {
        let attempt_id = self
            .responses
            .resolve_open_attempt(key.survey_id, &key.user_id)
            .await?;
        info!(%attempt_id, "resolved open attempt");

        let mut questions = self.questions.list_questions(key.survey_id).await?;
        questions.sort_by_key(|q| q.id);
        debug!(count = questions.len(), "loaded questions");

        let question_options = self.load_options(&questions).await?;

        let responses = self.responses.list_responses(attempt_id).await?;
        debug!(count = responses.len(), "loaded previous answers");

        Ok(LoadedAttempt {
            key,
            attempt_id,
            questions,
            question_options,
            responses,
        })
    }

    async fn load_options(
        &self,
        questions: &[Question],
    ) -> Result<HashMap<QuestionId, Vec<QuestionOption>>, StoreError> {
        let ids: Vec<QuestionId> = questions
            .iter()
            .filter(|q| q.has_options())
            .map(|q| q.id)
            .collect();

        match self.option_loading {
            OptionLoading::Sequential => {
                let mut options = HashMap::with_capacity(ids.len());
                for id in ids {
                    let list = self.questions.list_options(id).await?;
                    options.insert(id, list);
                }
                Ok(options)
            }
            OptionLoading::Concurrent => {
                let store = self.questions.as_ref();
                let loads = ids.into_iter().map(|id| async move {
                    store.list_options(id).await.map(|list| (id, list))
                });
                Ok(try_join_all(loads).await?.into_iter().collect())
            }
        }
    }
}
