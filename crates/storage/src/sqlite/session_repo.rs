use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use survey_core::model::{ProgressRecord, SessionId, SurveyRun, SurveySlug};

use super::SqliteSessionStore;
use crate::repository::{SessionStore, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn load(&self, id: SessionId) -> Result<Option<ProgressRecord>, StorageError> {
        let key = id.to_string();

        let Some(session_row) =
            sqlx::query("SELECT active_slug, expires_at FROM sessions WHERE id = ?1")
                .bind(&key)
                .fetch_optional(&self.pool)
                .await
                .map_err(conn)?
        else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = session_row.try_get("expires_at").map_err(ser)?;
        if expires_at <= self.clock.now() {
            sqlx::query("DELETE FROM sessions WHERE id = ?1")
                .bind(&key)
                .execute(&self.pool)
                .await
                .map_err(conn)?;
            return Ok(None);
        }

        let active = session_row
            .try_get::<Option<String>, _>("active_slug")
            .map_err(ser)?
            .map(SurveySlug::new)
            .transpose()
            .map_err(ser)?;

        let mut answers: BTreeMap<SurveySlug, (Vec<String>, Vec<Option<String>>)> =
            BTreeMap::new();

        let run_rows = sqlx::query("SELECT slug FROM session_runs WHERE session_id = ?1")
            .bind(&key)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        for row in run_rows {
            let slug = SurveySlug::new(row.try_get::<String, _>("slug").map_err(ser)?)
                .map_err(ser)?;
            answers.entry(slug).or_default();
        }

        let answer_rows = sqlx::query(
            r"
            SELECT slug, answer, comment FROM session_answers
            WHERE session_id = ?1
            ORDER BY slug, position
            ",
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        for row in answer_rows {
            let slug = SurveySlug::new(row.try_get::<String, _>("slug").map_err(ser)?)
                .map_err(ser)?;
            let answer: String = row.try_get("answer").map_err(ser)?;
            let comment: Option<String> = row.try_get("comment").map_err(ser)?;
            let entry = answers.entry(slug).or_default();
            entry.0.push(answer);
            entry.1.push(comment);
        }

        let mut runs = BTreeMap::new();
        for (slug, (run_answers, run_comments)) in answers {
            let run = SurveyRun::from_parts(run_answers, run_comments).map_err(ser)?;
            runs.insert(slug, run);
        }

        Ok(Some(ProgressRecord::from_parts(active, runs)))
    }

    async fn save(&self, id: SessionId, record: &ProgressRecord) -> Result<(), StorageError> {
        let key = id.to_string();
        let expires_at = self.clock.now() + self.ttl;

        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO sessions (id, active_slug, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                active_slug = excluded.active_slug,
                expires_at = excluded.expires_at
            ",
        )
        .bind(&key)
        .bind(record.active().map(ToString::to_string))
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Replace the whole record; cascades clear the answers too.
        sqlx::query("DELETE FROM session_runs WHERE session_id = ?1")
            .bind(&key)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (slug, run) in record.runs() {
            sqlx::query("INSERT INTO session_runs (session_id, slug) VALUES (?1, ?2)")
                .bind(&key)
                .bind(slug.as_str())
                .execute(&mut *tx)
                .await
                .map_err(conn)?;

            for (position, (answer, comment)) in
                run.answers().iter().zip(run.comments()).enumerate()
            {
                let position = i64::try_from(position).map_err(ser)?;
                sqlx::query(
                    r"
                    INSERT INTO session_answers (session_id, slug, position, answer, comment)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ",
                )
                .bind(&key)
                .bind(slug.as_str())
                .bind(position)
                .bind(answer)
                .bind(comment.as_deref())
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)
    }
}
