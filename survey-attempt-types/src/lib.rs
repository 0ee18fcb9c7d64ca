//! Core types for the survey-attempt crate.
//!
//! This crate provides the foundational types for taking a survey:
//! - `Question`, `QuestionKind` and `QuestionOption` - The read-only survey catalog
//! - `SurveyAttempt` and `AttemptKey` - One user's pass through one survey
//! - `Responses` and `ResponseValue` - Answers keyed by question
//! - `QuestionStore` and `ResponseStore` traits - The ports to the hosted backend

mod ids;
pub use ids::{AttemptId, OptionId, QuestionId, SurveyId, UserId};

mod response_value;
pub use response_value::ResponseValue;

mod responses;
pub use responses::{Response, ResponseError, Responses};

mod question;
pub use question::{Question, QuestionKind, QuestionOption, Survey};

mod attempt;
pub use attempt::{AttemptKey, SurveyAttempt};

mod error;
pub use error::StoreError;

mod store;
pub use store::{BoxFuture, QuestionStore, ResponseStore};
