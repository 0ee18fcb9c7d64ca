//! Walk one user through the burnout-risk assessment against an in-memory store.
//!
//! Run with `RUST_LOG=debug` to see every store call, and with
//! `SURVEY_ATTEMPT_OPTION_LOADING=concurrent` to fetch options in one batch.

use std::sync::Arc;

use example_surveys::burnout::{self, SCALE_MAX, SCALE_MIN};
use survey_attempt::{ManagerConfig, MemoryStore, QuestionKind, SurveyAttemptManager, UserId};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).compact().init();

    let fixture = burnout::burnout_assessment();
    let mut store = MemoryStore::new().with_questions(fixture.survey.id, fixture.questions.clone());
    for (question, options) in &fixture.options {
        store = store.with_options(*question, options.clone());
    }

    let config = ManagerConfig::from_env()?;
    let mut manager =
        SurveyAttemptManager::with_config(Arc::new(store.clone()), Arc::new(store.clone()), config);
    let user = UserId::from("demo-user");

    manager.initialize(fixture.survey.id, Some(user.clone())).await;
    if let Some(message) = manager.state().error() {
        anyhow::bail!("{message}");
    }

    // Answer half of the survey, then come back later.
    let half = manager.state().questions().len() / 2;
    for step in 0..half {
        answer_current(&mut manager, step as i64).await?;
    }
    let (answered, total) = manager.state().progress();
    println!("Answered {answered} of {total}, taking a break");

    manager.initialize(fixture.survey.id, Some(user)).await;
    println!(
        "Resumed at question {} of {total}",
        manager.state().current_question_index() + 1
    );

    let mut step = half as i64;
    while !manager.state().show_submit_button() {
        answer_current(&mut manager, step).await?;
        step += 1;
    }

    manager.submit_if_complete().await?;
    println!("Submitted.\n{}", store.snapshot_json()?);
    Ok(())
}

async fn answer_current(manager: &mut SurveyAttemptManager, step: i64) -> anyhow::Result<()> {
    let state = manager.state();
    let Some(question) = state.current_question().cloned() else {
        anyhow::bail!("no question at index {}", state.current_question_index());
    };

    match question.kind {
        QuestionKind::MultipleChoice => {
            let options = state.options_for(question.id).unwrap_or_default();
            let Some(choice) = options.get(step as usize % options.len().max(1)).cloned() else {
                anyhow::bail!("question {} has no options", question.id);
            };
            manager
                .save_answer(question.id, choice.text, Some(choice.id))
                .await?;
        }
        QuestionKind::Scale => {
            let value = SCALE_MIN + step % (SCALE_MAX - SCALE_MIN + 1);
            manager.save_answer(question.id, value, None).await?;
        }
        _ => {
            manager
                .save_answer(question.id, "Mostly the on-call weeks.", None)
                .await?;
        }
    }

    println!("{} -> answered", question.text);
    manager.advance_after_answer();
    Ok(())
}
