//! # survey-attempt
//!
//! The lifecycle of one user's attempt at one survey. Store-agnostic.
//!
//! A [`SurveyAttemptManager`] resumes the user's open attempt (or starts one),
//! loads the survey's questions, options and previous answers, works out which
//! question to show, records answers, and finally submits the attempt.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use survey_attempt::{MemoryStore, SurveyAttemptManager, SurveyId, UserId};
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut manager = SurveyAttemptManager::new(store.clone(), store);
//!
//! manager.initialize(SurveyId(1), Some(UserId::from("user-1"))).await;
//! let question = manager.state().current_question().unwrap().id;
//! manager.save_answer(question, 4, None).await?;
//! manager.advance_after_answer();
//!
//! if manager.state().show_submit_button() {
//!     manager.submit_if_complete().await?;
//! }
//! ```
//!
//! ## Stores
//!
//! The manager talks to the hosted backend through two injected ports:
//! - [`QuestionStore`] - read-only questions and options
//! - [`ResponseStore`] - attempts and answers
//!
//! [`MemoryStore`] implements both in process, for tests and demos.
//!
//! ## Logging
//!
//! Everything is reported through `tracing`. The crate never installs a
//! subscriber; that is up to the binary.

// Re-export all types from survey-attempt-types
pub use survey_attempt_types::*;

mod config;
pub use self::config::{ConfigError, ManagerConfig, OptionLoading};

mod state;
pub use state::{AttemptState, Position, derive_position};

mod loader;
pub use loader::{AttemptLoader, LoadedAttempt};

mod manager;
pub use manager::{ApplyOutcome, AttemptError, SurveyAttemptManager};

// In-process store for running attempts without a backend
mod memory_store;
pub use memory_store::{MemoryStore, StoreCall, StoreOp};
