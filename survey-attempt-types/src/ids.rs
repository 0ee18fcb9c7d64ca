use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a survey in the hosted catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(pub i64);

/// Identifier of a question. Questions are ordered ascending by this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

/// Identifier of a selectable option of a multiple-choice question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub i64);

/// Identifier of a survey attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(pub Uuid);

impl AttemptId {
    /// Generate a fresh random attempt id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Opaque user identifier handed over by the authentication layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

macro_rules! display_inner {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

display_inner!(SurveyId, QuestionId, OptionId, AttemptId, UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_ids_order_numerically() {
        let mut ids = vec![QuestionId(10), QuestionId(2), QuestionId(7)];
        ids.sort();
        assert_eq!(ids, vec![QuestionId(2), QuestionId(7), QuestionId(10)]);
    }

    #[test]
    fn ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&QuestionId(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&UserId::new("user-1")).unwrap(),
            "\"user-1\""
        );
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", SurveyId(4)), "4");
        assert_eq!(format!("{}", UserId::from("abc")), "abc");
    }
}
