use chrono::Duration;

use storage::repository::SessionStore;
use storage::sqlite::SqliteSessionStore;
use survey_core::Clock;
use survey_core::model::{ProgressRecord, SessionId, SurveySlug};
use survey_core::time::fixed_now;

fn slug(s: &str) -> SurveySlug {
    SurveySlug::new(s).unwrap()
}

#[tokio::test]
async fn round_trips_record_with_answers_and_empty_run() {
    let store = SqliteSessionStore::connect(
        "sqlite:file:memdb_roundtrip?mode=memory&cache=shared",
        86_400,
    )
    .await
    .expect("connect");
    let id = SessionId::random();

    let satisfaction = slug("satisfaction");
    let personality = slug("personality");

    let mut record = ProgressRecord::new();
    record.activate(satisfaction.clone());
    record
        .record_answer(&satisfaction, "yes".into(), Some("great store".into()), 3)
        .unwrap();
    record
        .record_answer(&satisfaction, "no".into(), None, 3)
        .unwrap();
    // Started but never answered; must survive the round trip as an empty run.
    record.activate(personality.clone());
    record.activate(satisfaction.clone());

    store.save(id, &record).await.unwrap();
    let loaded = store.load(id).await.unwrap().unwrap();

    assert_eq!(loaded, record);
    assert_eq!(loaded.active(), Some(&satisfaction));
    let run = loaded.run(&satisfaction).unwrap();
    assert_eq!(run.answers(), ["yes", "no"]);
    assert_eq!(run.comments()[0].as_deref(), Some("great store"));
    assert_eq!(run.comments()[1], None);
    assert_eq!(loaded.run(&personality).unwrap().answered_count(), 0);
}

#[tokio::test]
async fn save_replaces_previous_state() {
    let store = SqliteSessionStore::connect(
        "sqlite:file:memdb_replace?mode=memory&cache=shared",
        86_400,
    )
    .await
    .expect("connect");
    let id = SessionId::random();
    let s = slug("satisfaction");

    let mut record = ProgressRecord::new();
    record.activate(s.clone());
    store.save(id, &record).await.unwrap();

    record.record_answer(&s, "yes".into(), None, 3).unwrap();
    store.save(id, &record).await.unwrap();

    let loaded = store.load(id).await.unwrap().unwrap();
    assert_eq!(loaded.run(&s).unwrap().answered_count(), 1);
}

#[tokio::test]
async fn unknown_session_is_none() {
    let store = SqliteSessionStore::connect(
        "sqlite:file:memdb_unknown?mode=memory&cache=shared",
        86_400,
    )
    .await
    .expect("connect");
    assert!(store.load(SessionId::random()).await.unwrap().is_none());
}

#[tokio::test]
async fn expired_session_is_dropped_on_load() {
    let url = "sqlite:file:memdb_expiry?mode=memory&cache=shared";
    let mut clock = Clock::fixed(fixed_now());

    let store = SqliteSessionStore::connect_with_clock(url, 60, clock)
        .await
        .expect("connect");
    let id = SessionId::random();

    let mut record = ProgressRecord::new();
    record.activate(slug("satisfaction"));
    store.save(id, &record).await.unwrap();
    assert!(store.load(id).await.unwrap().is_some());

    // A second store on the same database, observing a clock past the TTL.
    clock.advance(Duration::seconds(61));
    let late = SqliteSessionStore::connect_with_clock(url, 60, clock)
        .await
        .expect("connect");
    assert!(late.load(id).await.unwrap().is_none());

    // Expiry deleted the row, so the first store cannot see it either.
    assert!(store.load(id).await.unwrap().is_none());
}

#[tokio::test]
async fn sessions_are_isolated_per_visitor() {
    let store = SqliteSessionStore::connect(
        "sqlite:file:memdb_isolation?mode=memory&cache=shared",
        86_400,
    )
    .await
    .expect("connect");
    let s = slug("satisfaction");

    let alice = SessionId::random();
    let bob = SessionId::random();

    let mut alice_record = ProgressRecord::new();
    alice_record.activate(s.clone());
    alice_record
        .record_answer(&s, "yes".into(), None, 3)
        .unwrap();
    store.save(alice, &alice_record).await.unwrap();

    let mut bob_record = ProgressRecord::new();
    bob_record.activate(s.clone());
    store.save(bob, &bob_record).await.unwrap();

    let alice_loaded = store.load(alice).await.unwrap().unwrap();
    let bob_loaded = store.load(bob).await.unwrap().unwrap();
    assert_eq!(alice_loaded.run(&s).unwrap().answered_count(), 1);
    assert_eq!(bob_loaded.run(&s).unwrap().answered_count(), 0);
}
