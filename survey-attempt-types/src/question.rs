use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{OptionId, QuestionId, SurveyId};

/// A named questionnaire. Managed outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub name: String,
}

impl Survey {
    pub fn new(id: SurveyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A single question in a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, also the ordering key within the survey.
    pub id: QuestionId,

    /// The survey this question belongs to.
    pub survey_id: SurveyId,

    /// The prompt text shown to the user.
    pub text: String,

    /// The kind of question (determines input type and whether options exist).
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

impl Question {
    /// Create a new question.
    pub fn new(
        id: QuestionId,
        survey_id: SurveyId,
        text: impl Into<String>,
        kind: QuestionKind,
    ) -> Self {
        Self {
            id,
            survey_id,
            text: text.into(),
            kind,
        }
    }

    /// Whether this question has a list of options to load.
    pub fn has_options(&self) -> bool {
        self.kind.is_multiple_choice()
    }
}

/// The kind of question, as stored in the backend's `type` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    /// Numeric rating (e.g. 1 to 5).
    Scale,

    /// Free-text answer.
    Text,

    /// Pick one of the question's options.
    MultipleChoice,

    /// Any other type the backend knows about. Treated as free input.
    Other(String),
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scale => "scale",
            Self::Text => "text",
            Self::MultipleChoice => "multiple_choice",
            Self::Other(other) => other,
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice)
    }
}

impl From<String> for QuestionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "scale" => Self::Scale,
            "text" => Self::Text,
            "multiple_choice" => Self::MultipleChoice,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for QuestionKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub question_id: QuestionId,
    pub text: String,
}

impl QuestionOption {
    pub fn new(id: OptionId, question_id: QuestionId, text: impl Into<String>) -> Self {
        Self {
            id,
            question_id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_backend_strings() {
        assert_eq!(QuestionKind::from("scale"), QuestionKind::Scale);
        assert_eq!(QuestionKind::from("multiple_choice"), QuestionKind::MultipleChoice);
        assert_eq!(
            QuestionKind::from("date"),
            QuestionKind::Other("date".to_string())
        );
    }

    #[test]
    fn question_row_deserializes() {
        let row = r#"{"id":2,"survey_id":1,"text":"How often do you feel drained?","type":"multiple_choice"}"#;
        let question: Question = serde_json::from_str(row).unwrap();

        assert_eq!(question.id, QuestionId(2));
        assert!(question.has_options());
        assert_eq!(serde_json::to_string(&question).unwrap(), row);
    }

    #[test]
    fn only_multiple_choice_has_options() {
        assert!(!QuestionKind::Scale.is_multiple_choice());
        assert!(!QuestionKind::Text.is_multiple_choice());
        assert!(!QuestionKind::Other("multiple".into()).is_multiple_choice());
    }
}
