//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use survey_core::model::{ProgressError, SurveySlug};

/// Errors emitted by `ProgressTracker`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerError {
    /// The requested slug is not in the catalog (404-equivalent).
    #[error("unknown survey: {0}")]
    UnknownSurvey(SurveySlug),

    /// The session has no active survey; callers should send the visitor
    /// back to the survey list instead of failing the request.
    #[error("no survey is active for this session")]
    NoActiveSurvey,

    /// The active survey's run is complete; only the summary remains.
    #[error("survey {0} is already complete")]
    AlreadyComplete(SurveySlug),

    #[error("answer cannot be empty")]
    EmptyAnswer,

    /// The submitted question index does not match the server-computed next
    /// index; replayed or raced submissions land here instead of corrupting
    /// the record.
    #[error("submission targets question {submitted}, expected {expected}")]
    StaleSubmission { submitted: usize, expected: usize },

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
