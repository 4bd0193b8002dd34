use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::slug::SurveySlug;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("survey run is already complete ({count} answers)")]
    RunComplete { count: usize },

    #[error("answers ({answers}) and comments ({comments}) lengths differ")]
    LengthMismatch { answers: usize, comments: usize },

    #[error("no run recorded for survey {0}")]
    NoSuchRun(SurveySlug),
}

//
// ─── SURVEY RUN ────────────────────────────────────────────────────────────────
//

/// Accumulated answers and comments for one survey, in submission order.
///
/// The run is the sole source of progress truth: the next question to
/// present is always `answers.len()`. Answers and comments grow in lockstep,
/// one slot per accepted submission, and never shrink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRun {
    answers: Vec<String>,
    comments: Vec<Option<String>>,
}

impl SurveyRun {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates a run from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::LengthMismatch` if the parallel sequences do
    /// not line up.
    pub fn from_parts(
        answers: Vec<String>,
        comments: Vec<Option<String>>,
    ) -> Result<Self, ProgressError> {
        if answers.len() != comments.len() {
            return Err(ProgressError::LengthMismatch {
                answers: answers.len(),
                comments: comments.len(),
            });
        }
        Ok(Self { answers, comments })
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn comments(&self) -> &[Option<String>] {
        &self.comments
    }

    /// Number of answers recorded so far; doubles as the next question index.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Whether all of a survey's questions have been answered.
    #[must_use]
    pub fn is_complete(&self, question_count: usize) -> bool {
        self.answers.len() >= question_count
    }

    /// Appends one answer and its comment slot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::RunComplete` if the run already holds
    /// `question_count` answers; a completed run is read-only.
    pub fn push_answer(
        &mut self,
        answer: String,
        comment: Option<String>,
        question_count: usize,
    ) -> Result<(), ProgressError> {
        if self.is_complete(question_count) {
            return Err(ProgressError::RunComplete {
                count: self.answers.len(),
            });
        }
        self.answers.push(answer);
        self.comments.push(comment);
        Ok(())
    }
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Per-visitor survey state: which survey is active and the run accumulated
/// for each survey the visitor has started.
///
/// Runs are created empty on the first start of a survey and are never
/// removed here; the whole record only goes away when the session store
/// expires it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    active: Option<SurveySlug>,
    runs: BTreeMap<SurveySlug, SurveyRun>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates a record from persisted storage.
    #[must_use]
    pub fn from_parts(active: Option<SurveySlug>, runs: BTreeMap<SurveySlug, SurveyRun>) -> Self {
        Self { active, runs }
    }

    /// The slug currently bound to this visitor's session, if any.
    #[must_use]
    pub fn active(&self) -> Option<&SurveySlug> {
        self.active.as_ref()
    }

    /// Binds the visitor to a survey and ensures an (initially empty) run
    /// exists for it. Existing answers are never reset.
    pub fn activate(&mut self, slug: SurveySlug) {
        self.runs.entry(slug.clone()).or_default();
        self.active = Some(slug);
    }

    #[must_use]
    pub fn run(&self, slug: &SurveySlug) -> Option<&SurveyRun> {
        self.runs.get(slug)
    }

    /// All runs in slug order, for persistence.
    pub fn runs(&self) -> impl Iterator<Item = (&SurveySlug, &SurveyRun)> {
        self.runs.iter()
    }

    /// Appends one answer to the run for `slug`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoSuchRun` if the survey was never started
    /// and `ProgressError::RunComplete` if the run is already full.
    pub fn record_answer(
        &mut self,
        slug: &SurveySlug,
        answer: String,
        comment: Option<String>,
        question_count: usize,
    ) -> Result<(), ProgressError> {
        let run = self
            .runs
            .get_mut(slug)
            .ok_or_else(|| ProgressError::NoSuchRun(slug.clone()))?;
        run.push_answer(answer, comment, question_count)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
