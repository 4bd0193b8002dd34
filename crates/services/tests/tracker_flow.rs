use std::sync::Arc;

use services::{AnswerOutcome, ProgressTracker, QuestionPage, StartOutcome};
use storage::repository::InMemorySessionStore;
use survey_core::model::{Catalog, Question, SessionId, Survey, SurveySlug};

fn satisfaction_catalog() -> Arc<Catalog> {
    let slug = SurveySlug::new("satisfaction").unwrap();
    let questions = vec![
        Question::new(
            "Have you shopped here before?",
            vec!["yes".into(), "no".into()],
            false,
        )
        .unwrap(),
        Question::new(
            "Would you recommend us?",
            vec!["yes".into(), "no".into()],
            false,
        )
        .unwrap(),
        Question::new(
            "Will you shop here again?",
            vec!["yes".into(), "no".into(), "maybe".into()],
            false,
        )
        .unwrap(),
    ];
    let survey = Survey::new(slug, "Satisfaction", "How did we do?", questions).unwrap();
    Arc::new(Catalog::new(vec![survey]).unwrap())
}

fn tracker() -> ProgressTracker {
    ProgressTracker::new(
        satisfaction_catalog(),
        Arc::new(InMemorySessionStore::new()),
    )
}

#[tokio::test]
async fn full_satisfaction_walkthrough() {
    let tracker = tracker();
    let session = SessionId::random();
    let slug = SurveySlug::new("satisfaction").unwrap();

    let start = tracker.start_survey(session, &slug).await.unwrap();
    assert_eq!(start, StartOutcome::Resume { next: 0 });

    let page = tracker.view_question(session, 0).await.unwrap();
    match page {
        QuestionPage::Show {
            index,
            total,
            question,
        } => {
            assert_eq!(index, 0);
            assert_eq!(total, 3);
            assert_eq!(question.text(), "Have you shopped here before?");
        }
        other => panic!("expected Show, got {other:?}"),
    }

    let outcome = tracker.submit_answer(session, 0, "yes", None).await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Continue { next: 1 });

    // Jumping ahead normalizes to the true next question, not 5.
    let page = tracker.view_question(session, 5).await.unwrap();
    assert_eq!(page, QuestionPage::Redirect { next: 1 });

    let outcome = tracker.submit_answer(session, 1, "no", None).await.unwrap();
    assert_eq!(outcome, AnswerOutcome::Continue { next: 2 });

    let outcome = tracker
        .submit_answer(session, 2, "maybe", None)
        .await
        .unwrap();
    assert_eq!(outcome, AnswerOutcome::Complete);

    let summary = tracker.summary(session).await.unwrap();
    assert!(summary.is_complete);
    assert_eq!(summary.total_questions, 3);
    let answers: Vec<&str> = summary.rows.iter().map(|r| r.answer.as_str()).collect();
    assert_eq!(answers, ["yes", "no", "maybe"]);
}

#[tokio::test]
async fn record_growth_is_append_only() {
    let tracker = tracker();
    let session = SessionId::random();
    let slug = SurveySlug::new("satisfaction").unwrap();
    tracker.start_survey(session, &slug).await.unwrap();

    for (i, answer) in ["yes", "no", "maybe"].iter().enumerate() {
        let before = tracker.summary(session).await.unwrap().answered_count();
        tracker
            .submit_answer(session, i, answer, None)
            .await
            .unwrap();
        let after = tracker.summary(session).await.unwrap().answered_count();
        assert_eq!(after, before + 1);
    }

    // Length never exceeds the question count.
    assert!(tracker.submit_answer(session, 3, "more", None).await.is_err());
    assert_eq!(tracker.summary(session).await.unwrap().answered_count(), 3);
}

#[tokio::test]
async fn visitors_do_not_share_progress() {
    // Two sessions against one store: answers must stay keyed per visitor,
    // never pooled process-wide.
    let store = Arc::new(InMemorySessionStore::new());
    let tracker = ProgressTracker::new(satisfaction_catalog(), store);
    let slug = SurveySlug::new("satisfaction").unwrap();

    let alice = SessionId::random();
    let bob = SessionId::random();
    tracker.start_survey(alice, &slug).await.unwrap();
    tracker.start_survey(bob, &slug).await.unwrap();

    tracker.submit_answer(alice, 0, "yes", None).await.unwrap();

    let page = tracker.view_question(bob, 0).await.unwrap();
    assert!(matches!(page, QuestionPage::Show { index: 0, .. }));
    assert_eq!(tracker.summary(bob).await.unwrap().answered_count(), 0);
    assert_eq!(tracker.summary(alice).await.unwrap().answered_count(), 1);
}

#[tokio::test]
async fn store_failures_surface_as_storage_errors() {
    use async_trait::async_trait;
    use services::TrackerError;
    use storage::repository::{SessionStore, StorageError};
    use survey_core::model::ProgressRecord;

    struct BrokenStore;

    #[async_trait]
    impl SessionStore for BrokenStore {
        async fn load(&self, _id: SessionId) -> Result<Option<ProgressRecord>, StorageError> {
            Err(StorageError::Connection("store is down".into()))
        }

        async fn save(
            &self,
            _id: SessionId,
            _record: &ProgressRecord,
        ) -> Result<(), StorageError> {
            Err(StorageError::Connection("store is down".into()))
        }
    }

    let tracker = ProgressTracker::new(satisfaction_catalog(), Arc::new(BrokenStore));
    let slug = SurveySlug::new("satisfaction").unwrap();

    let err = tracker
        .start_survey(SessionId::random(), &slug)
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Storage(_)));
}

#[tokio::test]
async fn partial_summary_reflects_submission_order() {
    let tracker = tracker();
    let session = SessionId::random();
    let slug = SurveySlug::new("satisfaction").unwrap();
    tracker.start_survey(session, &slug).await.unwrap();

    tracker
        .submit_answer(session, 0, "yes", Some("first time"))
        .await
        .unwrap();

    let summary = tracker.summary(session).await.unwrap();
    assert!(!summary.is_complete);
    assert_eq!(summary.answered_count(), 1);
    assert_eq!(summary.rows[0].question, "Have you shopped here before?");
    assert_eq!(summary.rows[0].comment.as_deref(), Some("first time"));
}
