use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::slug::{SlugError, SurveySlug};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SurveyError {
    #[error("survey title cannot be empty")]
    EmptyTitle,

    #[error("survey must have at least one question")]
    NoQuestions,

    #[error("question text cannot be empty")]
    EmptyQuestionText,

    #[error("question must offer at least one choice")]
    NoChoices,

    #[error("question choice cannot be empty")]
    EmptyChoice,

    #[error(transparent)]
    Slug(#[from] SlugError),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One survey question: prompt text, the choices offered, and whether a
/// free-text comment may stand in for a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    choices: Vec<String>,
    allows_free_text: bool,
}

impl Question {
    /// Builds a question from its prompt and choices.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError` if the prompt is blank, no choices are given,
    /// or any choice is blank.
    pub fn new(
        text: impl Into<String>,
        choices: Vec<String>,
        allows_free_text: bool,
    ) -> Result<Self, SurveyError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SurveyError::EmptyQuestionText);
        }
        if choices.is_empty() {
            return Err(SurveyError::NoChoices);
        }
        if choices.iter().any(|c| c.trim().is_empty()) {
            return Err(SurveyError::EmptyChoice);
        }
        Ok(Self {
            text,
            choices,
            allows_free_text,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn allows_free_text(&self) -> bool {
        self.allows_free_text
    }
}

//
// ─── SURVEY ────────────────────────────────────────────────────────────────────
//

/// Immutable catalog entry: title, instructions, and the ordered question
/// sequence a visitor steps through one page at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survey {
    slug: SurveySlug,
    title: String,
    instructions: String,
    questions: Vec<Question>,
}

impl Survey {
    /// Builds a survey from its parts.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::EmptyTitle` if the title is blank and
    /// `SurveyError::NoQuestions` if no questions are given.
    pub fn new(
        slug: SurveySlug,
        title: impl Into<String>,
        instructions: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, SurveyError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(SurveyError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(SurveyError::NoQuestions);
        }
        Ok(Self {
            slug,
            title,
            instructions: instructions.into(),
            questions,
        })
    }

    #[must_use]
    pub fn slug(&self) -> &SurveySlug {
        &self.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions a visitor must answer to complete this survey.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

//
// ─── RAW DEFINITIONS ───────────────────────────────────────────────────────────
//

/// Unvalidated question shape as it appears in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDef {
    pub text: String,
    pub choices: Vec<String>,
    #[serde(default)]
    pub allows_free_text: bool,
}

/// Unvalidated survey shape as it appears in a catalog file.
///
/// Deserialization is kept separate from the domain types so invalid files
/// fail loudly through `Survey::new` instead of slipping past `serde`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDef {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    pub questions: Vec<QuestionDef>,
}

impl TryFrom<SurveyDef> for Survey {
    type Error = SurveyError;

    fn try_from(def: SurveyDef) -> Result<Self, Self::Error> {
        let slug = SurveySlug::new(def.slug)?;
        let questions = def
            .questions
            .into_iter()
            .map(|q| Question::new(q.text, q.choices, q.allows_free_text))
            .collect::<Result<Vec<_>, _>>()?;
        Survey::new(slug, def.title, def.instructions, questions)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
