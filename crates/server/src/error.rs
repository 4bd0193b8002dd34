use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

use services::TrackerError;

/// Request-level error: wraps tracker failures and turns each into the
/// right HTTP reaction (page, redirect, or status).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("survey not found")]
    NotFound,

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, "survey not found").into_response()
            }
            AppError::Tracker(err) => match err {
                TrackerError::UnknownSurvey(_) => {
                    (StatusCode::NOT_FOUND, err.to_string()).into_response()
                }
                // A session without state gets sent back to the survey
                // list, never a server error.
                TrackerError::NoActiveSurvey => Redirect::to("/").into_response(),
                TrackerError::AlreadyComplete(_) => Redirect::to("/thanks").into_response(),
                TrackerError::EmptyAnswer => {
                    (StatusCode::BAD_REQUEST, err.to_string()).into_response()
                }
                // Replayed or raced form posts normalize to the true next
                // question, mirroring the page-request behavior.
                TrackerError::StaleSubmission { expected, .. } => {
                    Redirect::to(&format!("/questions/{expected}")).into_response()
                }
                other => {
                    error!("request failed: {other}");
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
                }
            },
        }
    }
}
