use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AttemptId, SurveyId, UserId};

/// One user's pass through one survey.
///
/// An attempt is open while `completed_at` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAttempt {
    pub id: AttemptId,
    pub survey_id: SurveyId,
    pub user_id: UserId,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SurveyAttempt {
    /// A fresh open attempt with a random id.
    pub fn open(survey_id: SurveyId, user_id: UserId) -> Self {
        Self {
            id: AttemptId::new_v4(),
            survey_id,
            user_id,
            completed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Whether this attempt belongs to the given `(survey, user)` pair.
    pub fn belongs_to(&self, key: &AttemptKey) -> bool {
        self.survey_id == key.survey_id && self.user_id == key.user_id
    }
}

/// The `(survey, user)` pair an attempt is resolved for.
///
/// Loads are tagged with the key they were started for so results can be
/// discarded once the active pair changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptKey {
    pub survey_id: SurveyId,
    pub user_id: UserId,
}

impl AttemptKey {
    pub fn new(survey_id: SurveyId, user_id: impl Into<UserId>) -> Self {
        Self {
            survey_id,
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_attempt_is_open() {
        let attempt = SurveyAttempt::open(SurveyId(1), UserId::from("u1"));
        assert!(attempt.is_open());
        assert!(attempt.belongs_to(&AttemptKey::new(SurveyId(1), "u1")));
        assert!(!attempt.belongs_to(&AttemptKey::new(SurveyId(2), "u1")));
    }
}
