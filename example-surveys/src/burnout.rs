use survey_attempt_types::{
    OptionId, Question, QuestionId, QuestionKind, QuestionOption, Survey, SurveyId,
};

use crate::SurveyFixture;

pub const SURVEY: SurveyId = SurveyId(7);

/// Answers to scale questions run from 1 (never) to 5 (always).
pub const SCALE_MIN: i64 = 1;
pub const SCALE_MAX: i64 = 5;

const SCALE_ITEMS: &[(i64, &str)] = &[
    (101, "How often do you feel emotionally drained by your work?"),
    (102, "How often do you feel used up at the end of the workday?"),
    (104, "How often do you dread the next working day?"),
    (105, "How often do you feel you have become more callous towards colleagues?"),
    (107, "How often do you feel you are achieving worthwhile things at work?"),
];

/// The burnout-risk assessment: scale items, two multiple-choice items, a closing note.
pub fn burnout_assessment() -> SurveyFixture {
    let mut questions: Vec<Question> = SCALE_ITEMS
        .iter()
        .map(|&(id, text)| Question::new(QuestionId(id), SURVEY, text, QuestionKind::Scale))
        .collect();

    questions.push(Question::new(
        QuestionId(103),
        SURVEY,
        "How would you describe your workload over the past month?",
        QuestionKind::MultipleChoice,
    ));
    questions.push(Question::new(
        QuestionId(106),
        SURVEY,
        "How many hours of sleep do you usually get?",
        QuestionKind::MultipleChoice,
    ));
    questions.push(Question::new(
        QuestionId(108),
        SURVEY,
        "Is there anything else you would like to share?",
        QuestionKind::Text,
    ));
    questions.sort_by_key(|q| q.id);

    let workload = QuestionId(103);
    let sleep = QuestionId(106);

    SurveyFixture {
        survey: Survey::new(SURVEY, "Burnout risk assessment"),
        questions,
        options: vec![
            (
                workload,
                vec![
                    QuestionOption::new(OptionId(1031), workload, "Manageable"),
                    QuestionOption::new(OptionId(1032), workload, "Heavy but sustainable"),
                    QuestionOption::new(OptionId(1033), workload, "Overwhelming"),
                ],
            ),
            (
                sleep,
                vec![
                    QuestionOption::new(OptionId(1061), sleep, "Less than 5"),
                    QuestionOption::new(OptionId(1062), sleep, "5 to 7"),
                    QuestionOption::new(OptionId(1063), sleep, "More than 7"),
                ],
            ),
        ],
    }
}
