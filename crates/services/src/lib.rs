#![forbid(unsafe_code)]

//! The survey progress tracker: the one stateful component of the app.
//!
//! Every operation takes the visitor's `SessionId` and goes through the
//! injected session store; there is no ambient session state. The store is
//! the single source of progress truth — the next question to present is
//! always the number of answers recorded so far.

pub mod error;
pub mod tracker;

pub use survey_core::Clock;

pub use error::TrackerError;
pub use tracker::{
    AnswerOutcome, ProgressTracker, QuestionPage, StartOutcome, SummaryRow, SurveySummary,
};
