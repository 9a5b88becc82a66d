use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    /// The (recurring event, occurrence) pair is already persisted.
    #[error("Occurrence {occurrence_at} of recurring event {recurring_event_id} is already materialized")]
    DuplicateOccurrence {
        recurring_event_id: Uuid,
        occurrence_at: DateTime<Utc>,
    },
}

impl CoreError {
    /// Maps a sqlx unique-constraint failure on the occurrence index to
    /// [`CoreError::DuplicateOccurrence`]; every other error is kept as is.
    pub(crate) fn from_occurrence_insert(
        err: sqlx::Error,
        recurring_event_id: Uuid,
        occurrence_at: DateTime<Utc>,
    ) -> Self {
        let is_unique_violation = err
            .as_database_error()
            .map(|db_err| db_err.is_unique_violation())
            .unwrap_or(false);

        if is_unique_violation {
            CoreError::DuplicateOccurrence {
                recurring_event_id,
                occurrence_at,
            }
        } else {
            CoreError::Database(err)
        }
    }
}
