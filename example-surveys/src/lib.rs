//! Survey catalogs shared by tests and demos.

use survey_attempt_types::{Question, QuestionId, QuestionOption, Survey};

pub mod burnout;
pub mod three_step;

/// A survey with its questions and the options of its multiple-choice questions.
#[derive(Debug, Clone)]
pub struct SurveyFixture {
    pub survey: Survey,
    pub questions: Vec<Question>,
    pub options: Vec<(QuestionId, Vec<QuestionOption>)>,
}

impl SurveyFixture {
    /// Question ids in survey order.
    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(|q| q.id).collect()
    }

    pub fn options_for(&self, question: QuestionId) -> Option<&[QuestionOption]> {
        self.options
            .iter()
            .find(|(id, _)| *id == question)
            .map(|(_, options)| options.as_slice())
    }
}

pub use burnout::burnout_assessment;
pub use three_step::three_step;
