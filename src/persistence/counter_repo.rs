//! Sequence counter repository for `SQLite` persistence.

use std::sync::Arc;

use crate::models::counter::SequenceCounter;
use crate::{AppError, Result};

use super::db::Database;

/// Repository for the single-row form number counter.
#[derive(Clone)]
pub struct CounterRepo {
    db: Arc<Database>,
}

impl CounterRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Read the current counter, if it has been created.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self) -> Result<Option<SequenceCounter>> {
        let last_id: Option<i64> =
            sqlx::query_scalar("SELECT last_id FROM sequence_counter WHERE id = 1")
                .fetch_optional(self.db.as_ref())
                .await?;
        Ok(last_id.map(|last_id| SequenceCounter { last_id }))
    }

    /// Create the counter at `initial` unless it already exists.
    ///
    /// Returns the stored counter, which is the pre-existing one when the
    /// row was already present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert or read-back fails.
    pub async fn create(&self, initial: i64) -> Result<SequenceCounter> {
        sqlx::query("INSERT OR IGNORE INTO sequence_counter (id, last_id) VALUES (1, ?1)")
            .bind(initial)
            .execute(self.db.as_ref())
            .await?;

        self.get()
            .await?
            .ok_or_else(|| AppError::Db("sequence counter missing after create".into()))
    }

    /// Atomically increment the counter and return the persisted value.
    ///
    /// The read and the write happen in one statement, so two callers can
    /// never be handed the same value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the counter was never created, or
    /// `AppError::Db` if the update fails.
    pub async fn increment_and_fetch(&self) -> Result<SequenceCounter> {
        let last_id: Option<i64> = sqlx::query_scalar(
            "UPDATE sequence_counter SET last_id = last_id + 1 WHERE id = 1 RETURNING last_id",
        )
        .fetch_optional(self.db.as_ref())
        .await?;

        last_id
            .map(|last_id| SequenceCounter { last_id })
            .ok_or_else(|| AppError::NotFound("sequence counter not initialized".into()))
    }
}
