use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::slug::SurveySlug;
use crate::model::survey::{Survey, SurveyDef, SurveyError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog must contain at least one survey")]
    Empty,

    #[error("duplicate survey slug: {0}")]
    DuplicateSlug(SurveySlug),

    #[error(transparent)]
    Survey(#[from] SurveyError),
}

/// Process-wide read-only lookup table of surveys, loaded once at startup.
///
/// Keyed by slug; iteration order is the slug order so the index page is
/// stable across runs.
#[derive(Debug, Clone)]
pub struct Catalog {
    surveys: BTreeMap<SurveySlug, Survey>,
}

impl Catalog {
    /// Builds a catalog from validated surveys.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list and
    /// `CatalogError::DuplicateSlug` if two surveys share a slug.
    pub fn new(surveys: Vec<Survey>) -> Result<Self, CatalogError> {
        if surveys.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut map = BTreeMap::new();
        for survey in surveys {
            let slug = survey.slug().clone();
            if map.insert(slug.clone(), survey).is_some() {
                return Err(CatalogError::DuplicateSlug(slug));
            }
        }
        Ok(Self { surveys: map })
    }

    /// Builds a catalog from unvalidated file definitions.
    ///
    /// # Errors
    ///
    /// Propagates validation failures for any survey, then the catalog-level
    /// checks from [`Catalog::new`].
    pub fn from_defs(defs: Vec<SurveyDef>) -> Result<Self, CatalogError> {
        let surveys = defs
            .into_iter()
            .map(Survey::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(surveys)
    }

    /// The surveys shipped with the application.
    ///
    /// The customer satisfaction survey plus a short personality survey, so
    /// the survey list page has more than one entry.
    ///
    /// # Panics
    ///
    /// Panics only if the built-in definitions are themselves invalid, which
    /// is a programming error caught by the tests below.
    #[must_use]
    pub fn builtin() -> Self {
        let defs = vec![
            SurveyDef {
                slug: "satisfaction".into(),
                title: "Customer Satisfaction Survey".into(),
                instructions: "Please fill out a survey about your experience with us.".into(),
                questions: vec![
                    builtin_question("Have you shopped here before?", &["Yes", "No"], false),
                    builtin_question(
                        "Did someone else shop with you today?",
                        &["Yes", "No"],
                        true,
                    ),
                    builtin_question(
                        "On average, how much do you spend a month on frisbees?",
                        &["Less than $10,000", "$10,000 or more"],
                        false,
                    ),
                    builtin_question(
                        "Are you likely to shop here again?",
                        &["Yes", "No"],
                        true,
                    ),
                ],
            },
            SurveyDef {
                slug: "personality".into(),
                title: "Rithm Personality Test".into(),
                instructions: "Learn more about yourself with our personality quiz!".into(),
                questions: vec![
                    builtin_question(
                        "Do you ever dream about code?",
                        &["Yes", "No"],
                        false,
                    ),
                    builtin_question(
                        "Do you enjoy standing on one foot?",
                        &["Yes", "No"],
                        true,
                    ),
                    builtin_question(
                        "Have you ever been to Devil's Slide?",
                        &["Yes", "No"],
                        false,
                    ),
                ],
            },
        ];
        Self::from_defs(defs).expect("built-in catalog should be valid")
    }

    #[must_use]
    pub fn get(&self, slug: &SurveySlug) -> Option<&Survey> {
        self.surveys.get(slug)
    }

    /// All surveys in slug order.
    pub fn surveys(&self) -> impl Iterator<Item = &Survey> {
        self.surveys.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }
}

fn builtin_question(text: &str, choices: &[&str], allows_free_text: bool) -> super::QuestionDef {
    super::QuestionDef {
        text: text.into(),
        choices: choices.iter().map(|c| (*c).to_string()).collect(),
        allows_free_text,
    }
}
