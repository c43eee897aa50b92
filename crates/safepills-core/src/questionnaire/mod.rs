//! Questionnaire engines.
//!
//! Pipeline: Flow fetch → Visible filter → One question at a time → Submission
//!
//! The engines are pure state machines. They never perform I/O: when a
//! submission is due they hand back the request body and wait for the caller
//! to report the outcome.

mod engine;
mod legacy;
mod submission;

pub use engine::*;
pub use legacy::*;
pub use submission::*;

use thiserror::Error;

/// Engine errors.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("Flow already loaded")]
    AlreadyLoaded,

    #[error("No question is awaiting an answer (state: {0})")]
    NotAsking(&'static str),

    #[error("Invalid answer for question {question_id}: {reason}")]
    InvalidAnswer { question_id: String, reason: String },

    #[error("No submission in progress (state: {0})")]
    NotSubmitting(&'static str),
}

pub type EngineResult<T> = Result<T, EngineError>;
