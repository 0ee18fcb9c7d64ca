use crate::{AttemptId, QuestionId, SurveyId};

/// Error type for `QuestionStore` and `ResponseStore` operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The survey does not exist.
    #[error("Unknown survey {0}")]
    UnknownSurvey(SurveyId),

    /// The attempt does not exist.
    #[error("Unknown attempt {0}")]
    UnknownAttempt(AttemptId),

    /// The question does not exist.
    #[error("Unknown question {0}")]
    UnknownQuestion(QuestionId),

    /// The backend refused the write.
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// The backend returned rows that do not fit the data model.
    #[error("Malformed data: {0}")]
    Malformed(String),

    /// Backend-specific failure (transport, driver, decoding).
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    /// Whether re-issuing the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Backend(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_trouble_is_transient() {
        assert!(StoreError::Unavailable("timeout".into()).is_transient());
        assert!(StoreError::backend(anyhow::anyhow!("connection reset")).is_transient());
        assert!(!StoreError::UnknownSurvey(SurveyId(9)).is_transient());
        assert!(!StoreError::Rejected("attempt already completed".into()).is_transient());
    }
}
