mod catalog;
mod ids;
mod progress;
mod slug;
mod survey;

pub use catalog::{Catalog, CatalogError};
pub use ids::SessionId;
pub use progress::{ProgressError, ProgressRecord, SurveyRun};
pub use slug::{SlugError, SurveySlug};
pub use survey::{Question, QuestionDef, Survey, SurveyDef, SurveyError};
