use survey_attempt_types::{
    OptionId, Question, QuestionId, QuestionKind, QuestionOption, Survey, SurveyId,
};

use crate::SurveyFixture;

pub const SURVEY: SurveyId = SurveyId(1);
pub const Q1: QuestionId = QuestionId(1);
pub const Q2: QuestionId = QuestionId(2);
pub const Q3: QuestionId = QuestionId(3);
pub const O1: OptionId = OptionId(21);
pub const O2: OptionId = OptionId(22);

/// Scale, multiple choice with two options, free text.
pub fn three_step() -> SurveyFixture {
    SurveyFixture {
        survey: Survey::new(SURVEY, "Weekly check-in"),
        questions: vec![
            Question::new(Q1, SURVEY, "How energetic did you feel this week?", QuestionKind::Scale),
            Question::new(
                Q2,
                SURVEY,
                "Did you take a full day off?",
                QuestionKind::MultipleChoice,
            ),
            Question::new(Q3, SURVEY, "What drained you the most?", QuestionKind::Text),
        ],
        options: vec![(
            Q2,
            vec![
                QuestionOption::new(O1, Q2, "Yes"),
                QuestionOption::new(O2, Q2, "No"),
            ],
        )],
    }
}
