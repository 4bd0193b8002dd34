mod outcome;
mod service;
mod summary;

// Public API of the tracker subsystem.
pub use crate::error::TrackerError;
pub use outcome::{AnswerOutcome, QuestionPage, StartOutcome};
pub use service::ProgressTracker;
pub use summary::{SummaryRow, SurveySummary};
