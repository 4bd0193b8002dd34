use thiserror::Error;

use crate::model::{ProgressError, SlugError, SurveyError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Survey(#[from] SurveyError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
