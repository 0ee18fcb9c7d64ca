use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AttemptId, OptionId, QuestionId, ResponseValue};

/// Error type for response access operations.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("Missing response for question {0}")]
    MissingAnswer(QuestionId),

    #[error("Type mismatch for question {question}: expected {expected}, got {actual}")]
    TypeMismatch {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A stored answer row: one per `(attempt, question)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub attempt_id: AttemptId,
    pub question_id: QuestionId,
    pub value: ResponseValue,
    pub option_id: Option<OptionId>,
    pub answered_at: DateTime<Utc>,
}

/// The answers of one attempt, keyed by question.
///
/// Keys are unique and insertion order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses {
    values: HashMap<QuestionId, ResponseValue>,
}

impl Responses {
    /// Create a new empty responses collection.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set the answer for a question, replacing any previous one.
    pub fn insert(&mut self, question: QuestionId, value: impl Into<ResponseValue>) {
        self.values.insert(question, value.into());
    }

    pub fn get(&self, question: QuestionId) -> Option<&ResponseValue> {
        self.values.get(&question)
    }

    pub fn contains(&self, question: QuestionId) -> bool {
        self.values.contains_key(&question)
    }

    pub fn remove(&mut self, question: QuestionId) -> Option<ResponseValue> {
        self.values.remove(&question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &ResponseValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge another responses collection into this one. Entries in `other` win.
    pub fn extend(&mut self, other: Responses) {
        self.values.extend(other.values);
    }

    // === Convenience accessors ===

    /// Get a text answer.
    pub fn get_string(&self, question: QuestionId) -> Result<&str, ResponseError> {
        match self.get(question) {
            Some(ResponseValue::String(s)) => Ok(s),
            Some(other) => Err(ResponseError::TypeMismatch {
                question,
                expected: "String",
                actual: other.type_name(),
            }),
            None => Err(ResponseError::MissingAnswer(question)),
        }
    }

    /// Get an integer answer.
    pub fn get_int(&self, question: QuestionId) -> Result<i64, ResponseError> {
        match self.get(question) {
            Some(ResponseValue::Int(i)) => Ok(*i),
            Some(other) => Err(ResponseError::TypeMismatch {
                question,
                expected: "Int",
                actual: other.type_name(),
            }),
            None => Err(ResponseError::MissingAnswer(question)),
        }
    }

    /// Get a boolean answer.
    pub fn get_bool(&self, question: QuestionId) -> Result<bool, ResponseError> {
        match self.get(question) {
            Some(ResponseValue::Bool(b)) => Ok(*b),
            Some(other) => Err(ResponseError::TypeMismatch {
                question,
                expected: "Bool",
                actual: other.type_name(),
            }),
            None => Err(ResponseError::MissingAnswer(question)),
        }
    }
}

impl FromIterator<(QuestionId, ResponseValue)> for Responses {
    fn from_iter<I: IntoIterator<Item = (QuestionId, ResponseValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Responses {
    type Item = (QuestionId, ResponseValue);
    type IntoIter = std::collections::hash_map::IntoIter<QuestionId, ResponseValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Responses {
    type Item = (&'a QuestionId, &'a ResponseValue);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, ResponseValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut responses = Responses::new();
        responses.insert(QuestionId(1), 4);
        responses.insert(QuestionId(3), "Mostly evenings");

        assert_eq!(responses.get_int(QuestionId(1)).unwrap(), 4);
        assert_eq!(
            responses.get_string(QuestionId(3)).unwrap(),
            "Mostly evenings"
        );
    }

    #[test]
    fn insert_overwrites() {
        let mut responses = Responses::new();
        responses.insert(QuestionId(1), 2);
        responses.insert(QuestionId(1), 5);

        assert_eq!(responses.len(), 1);
        assert_eq!(responses.get_int(QuestionId(1)).unwrap(), 5);
    }

    #[test]
    fn type_mismatch_error() {
        let mut responses = Responses::new();
        responses.insert(QuestionId(1), 4);

        let result = responses.get_string(QuestionId(1));
        assert!(matches!(result, Err(ResponseError::TypeMismatch { .. })));
        assert!(matches!(
            responses.get_bool(QuestionId(9)),
            Err(ResponseError::MissingAnswer(QuestionId(9)))
        ));
    }

    #[test]
    fn json_is_a_plain_object() {
        let mut responses = Responses::new();
        responses.insert(QuestionId(2), 3);

        let json = serde_json::to_string(&responses).unwrap();
        assert_eq!(json, r#"{"2":3}"#);
        let back: Responses = serde_json::from_str(&json).unwrap();
        assert_eq!(back, responses);
    }
}
