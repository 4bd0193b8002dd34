use std::sync::Arc;

use storage::repository::SessionStore;
use survey_core::model::{Catalog, ProgressRecord, SessionId, Survey, SurveySlug};

use super::outcome::{AnswerOutcome, QuestionPage, StartOutcome};
use super::summary::{SummaryRow, SurveySummary};
use crate::error::TrackerError;

/// Orchestrates a visitor's walk through a survey, one page at a time.
///
/// Holds the read-only catalog and a handle to the session store; each
/// operation loads the visitor's record, applies the state machine
/// `NotStarted → InProgress(k) → … → Complete`, and persists any mutation
/// before returning. Only [`ProgressTracker::submit_answer`] advances the
/// state; everything else is read-only or a redirect signal.
#[derive(Clone)]
pub struct ProgressTracker {
    catalog: Arc<Catalog>,
    sessions: Arc<dyn SessionStore>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { catalog, sessions }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Binds the session to a survey, creating an empty run on first visit.
    ///
    /// Idempotent: restarting a survey with partial progress resumes at the
    /// next unanswered question and never resets answers.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::UnknownSurvey` for a slug not in the catalog
    /// and `TrackerError::Storage` for store failures.
    pub async fn start_survey(
        &self,
        session: SessionId,
        slug: &SurveySlug,
    ) -> Result<StartOutcome, TrackerError> {
        let survey = self.survey(slug)?;

        let mut record = self.sessions.load(session).await?.unwrap_or_default();
        record.activate(slug.clone());
        self.sessions.save(session, &record).await?;

        let run = record
            .run(slug)
            .ok_or_else(|| TrackerError::UnknownSurvey(slug.clone()))?;
        if run.is_complete(survey.question_count()) {
            Ok(StartOutcome::AlreadyComplete)
        } else {
            Ok(StartOutcome::Resume {
                next: run.answered_count(),
            })
        }
    }

    /// Resolves which page a request for question `requested` should see.
    ///
    /// The expected index is always the count of stored answers; anything
    /// else normalizes to a redirect. Never mutates the record.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NoActiveSurvey` if the session has no active
    /// survey (or no record at all).
    pub async fn view_question(
        &self,
        session: SessionId,
        requested: usize,
    ) -> Result<QuestionPage, TrackerError> {
        let record = self.active_record(session).await?;
        let (slug, survey) = self.active_survey(&record)?;

        let expected = record.run(slug).map_or(0, |run| run.answered_count());
        let total = survey.question_count();

        if expected >= total {
            return Ok(QuestionPage::Finished);
        }
        if requested != expected {
            return Ok(QuestionPage::Redirect { next: expected });
        }

        let question = survey
            .question(expected)
            .ok_or(TrackerError::NoActiveSurvey)?
            .clone();
        Ok(QuestionPage::Show {
            index: expected,
            total,
            question,
        })
    }

    /// Records one answer (and optional comment) for the active survey.
    ///
    /// The append position is computed from the record, not the client: a
    /// `submitted_index` that disagrees with the stored answer count is
    /// rejected as stale rather than corrupting the run. Blank answers are
    /// rejected unless the question allows free text and a non-blank
    /// comment stands in for the choice.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NoActiveSurvey`, `TrackerError::AlreadyComplete`,
    /// `TrackerError::StaleSubmission`, or `TrackerError::EmptyAnswer` per
    /// the rules above, and `TrackerError::Storage` for store failures.
    pub async fn submit_answer(
        &self,
        session: SessionId,
        submitted_index: usize,
        answer: &str,
        comment: Option<&str>,
    ) -> Result<AnswerOutcome, TrackerError> {
        let mut record = self.active_record(session).await?;
        let (slug, survey) = self.active_survey(&record)?;
        let slug = slug.clone();
        let total = survey.question_count();

        let run = record.run(&slug).ok_or(TrackerError::NoActiveSurvey)?;
        let expected = run.answered_count();
        if run.is_complete(total) {
            return Err(TrackerError::AlreadyComplete(slug));
        }
        if submitted_index != expected {
            return Err(TrackerError::StaleSubmission {
                submitted: submitted_index,
                expected,
            });
        }

        let question = survey
            .question(expected)
            .ok_or(TrackerError::NoActiveSurvey)?;
        let mut comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToOwned::to_owned);
        let answer = answer.trim();
        let answer_value = if answer.is_empty() {
            // A free-text comment may stand in for the missing choice; it is
            // then consumed as the answer rather than stored twice.
            match (question.allows_free_text(), comment.take()) {
                (true, Some(text)) => text,
                _ => return Err(TrackerError::EmptyAnswer),
            }
        } else {
            answer.to_owned()
        };

        record.record_answer(&slug, answer_value, comment, total)?;
        self.sessions.save(session, &record).await?;

        let next = expected + 1;
        if next < total {
            Ok(AnswerOutcome::Continue { next })
        } else {
            Ok(AnswerOutcome::Complete)
        }
    }

    /// Builds the thank-you summary for the active survey.
    ///
    /// Read-only; completeness is reported, not enforced.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NoActiveSurvey` if the session has no active
    /// survey and `TrackerError::Storage` for store failures.
    pub async fn summary(&self, session: SessionId) -> Result<SurveySummary, TrackerError> {
        let record = self.active_record(session).await?;
        let (slug, survey) = self.active_survey(&record)?;

        let rows = record.run(slug).map_or_else(Vec::new, |run| {
            survey
                .questions()
                .iter()
                .zip(run.answers().iter().zip(run.comments()))
                .map(|(question, (answer, comment))| SummaryRow {
                    question: question.text().to_owned(),
                    answer: answer.clone(),
                    comment: comment.clone(),
                })
                .collect()
        });

        let total_questions = survey.question_count();
        Ok(SurveySummary {
            title: survey.title().to_owned(),
            is_complete: rows.len() >= total_questions,
            total_questions,
            rows,
        })
    }

    fn survey(&self, slug: &SurveySlug) -> Result<&Survey, TrackerError> {
        self.catalog
            .get(slug)
            .ok_or_else(|| TrackerError::UnknownSurvey(slug.clone()))
    }

    async fn active_record(&self, session: SessionId) -> Result<ProgressRecord, TrackerError> {
        self.sessions
            .load(session)
            .await?
            .ok_or(TrackerError::NoActiveSurvey)
    }

    fn active_survey<'a>(
        &'a self,
        record: &'a ProgressRecord,
    ) -> Result<(&'a SurveySlug, &'a Survey), TrackerError> {
        let slug = record.active().ok_or(TrackerError::NoActiveSurvey)?;
        Ok((slug, self.survey(slug)?))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemorySessionStore;
    use survey_core::model::{Question, SessionId, Survey};

    fn three_question_catalog() -> Arc<Catalog> {
        let slug = SurveySlug::new("satisfaction").unwrap();
        let questions = (0..3)
            .map(|i| {
                Question::new(
                    format!("Question {i}"),
                    vec!["yes".into(), "no".into(), "maybe".into()],
                    i == 1,
                )
                .unwrap()
            })
            .collect();
        let survey = Survey::new(slug, "Satisfaction", "Tell us how we did.", questions).unwrap();
        Arc::new(Catalog::new(vec![survey]).unwrap())
    }

    fn tracker() -> ProgressTracker {
        ProgressTracker::new(
            three_question_catalog(),
            Arc::new(InMemorySessionStore::new()),
        )
    }

    fn slug() -> SurveySlug {
        SurveySlug::new("satisfaction").unwrap()
    }

    #[tokio::test]
    async fn first_visit_resumes_at_zero() {
        let tracker = tracker();
        let session = SessionId::random();

        let outcome = tracker.start_survey(session, &slug()).await.unwrap();
        assert_eq!(outcome, StartOutcome::Resume { next: 0 });
    }

    #[tokio::test]
    async fn unknown_slug_is_rejected() {
        let tracker = tracker();
        let err = tracker
            .start_survey(SessionId::random(), &SurveySlug::new("missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::UnknownSurvey(_)));
    }

    #[tokio::test]
    async fn restart_without_answers_is_idempotent() {
        let tracker = tracker();
        let session = SessionId::random();

        tracker.start_survey(session, &slug()).await.unwrap();
        let again = tracker.start_survey(session, &slug()).await.unwrap();
        assert_eq!(again, StartOutcome::Resume { next: 0 });
    }

    #[tokio::test]
    async fn restart_with_progress_resumes() {
        let tracker = tracker();
        let session = SessionId::random();

        tracker.start_survey(session, &slug()).await.unwrap();
        tracker
            .submit_answer(session, 0, "yes", None)
            .await
            .unwrap();

        let outcome = tracker.start_survey(session, &slug()).await.unwrap();
        assert_eq!(outcome, StartOutcome::Resume { next: 1 });
    }

    #[tokio::test]
    async fn view_without_active_survey_fails() {
        let tracker = tracker();
        let err = tracker
            .view_question(SessionId::random(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::NoActiveSurvey));
    }

    #[tokio::test]
    async fn off_index_requests_normalize_to_the_next_question() {
        let tracker = tracker();
        let session = SessionId::random();
        tracker.start_survey(session, &slug()).await.unwrap();
        tracker
            .submit_answer(session, 0, "yes", None)
            .await
            .unwrap();

        // Got ahead and fell behind both redirect to the true next index.
        for requested in [0, 2, 5] {
            let page = tracker.view_question(session, requested).await.unwrap();
            assert_eq!(page, QuestionPage::Redirect { next: 1 });
        }

        let page = tracker.view_question(session, 1).await.unwrap();
        assert!(matches!(page, QuestionPage::Show { index: 1, total: 3, .. }));
    }

    #[tokio::test]
    async fn stale_submission_is_rejected_without_mutation() {
        let tracker = tracker();
        let session = SessionId::random();
        tracker.start_survey(session, &slug()).await.unwrap();
        tracker
            .submit_answer(session, 0, "yes", None)
            .await
            .unwrap();

        // Replay of the same form post.
        let err = tracker
            .submit_answer(session, 0, "yes", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::StaleSubmission {
                submitted: 0,
                expected: 1
            }
        ));

        let summary = tracker.summary(session).await.unwrap();
        assert_eq!(summary.answered_count(), 1);
    }

    #[tokio::test]
    async fn blank_answer_is_rejected() {
        let tracker = tracker();
        let session = SessionId::random();
        tracker.start_survey(session, &slug()).await.unwrap();

        let err = tracker
            .submit_answer(session, 0, "   ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::EmptyAnswer));

        // Question 0 does not allow free text, so a comment cannot stand in.
        let err = tracker
            .submit_answer(session, 0, "", Some("but hear me out"))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::EmptyAnswer));
    }

    #[tokio::test]
    async fn free_text_comment_substitutes_for_missing_choice() {
        let tracker = tracker();
        let session = SessionId::random();
        tracker.start_survey(session, &slug()).await.unwrap();
        tracker
            .submit_answer(session, 0, "yes", None)
            .await
            .unwrap();

        // Question 1 allows free text.
        let outcome = tracker
            .submit_answer(session, 1, "", Some("it depends"))
            .await
            .unwrap();
        assert_eq!(outcome, AnswerOutcome::Continue { next: 2 });

        let summary = tracker.summary(session).await.unwrap();
        assert_eq!(summary.rows[1].answer, "it depends");
        assert_eq!(summary.rows[1].comment, None);
    }

    #[tokio::test]
    async fn answers_are_not_validated_against_choices() {
        // Known gap carried from the source: any non-blank value is stored.
        let tracker = tracker();
        let session = SessionId::random();
        tracker.start_survey(session, &slug()).await.unwrap();

        let outcome = tracker
            .submit_answer(session, 0, "definitely not a choice", None)
            .await
            .unwrap();
        assert_eq!(outcome, AnswerOutcome::Continue { next: 1 });
    }

    #[tokio::test]
    async fn completed_run_only_permits_the_summary() {
        let tracker = tracker();
        let session = SessionId::random();
        tracker.start_survey(session, &slug()).await.unwrap();
        for (i, answer) in ["yes", "no", "maybe"].iter().enumerate() {
            tracker
                .submit_answer(session, i, answer, None)
                .await
                .unwrap();
        }

        let err = tracker
            .submit_answer(session, 3, "extra", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyComplete(_)));

        let page = tracker.view_question(session, 0).await.unwrap();
        assert_eq!(page, QuestionPage::Finished);

        let restart = tracker.start_survey(session, &slug()).await.unwrap();
        assert_eq!(restart, StartOutcome::AlreadyComplete);
    }
}
