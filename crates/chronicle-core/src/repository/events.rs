use crate::error::CoreError;
use crate::models::{Event, EventOrigin, NewEvent};
use crate::repository::{BucketIncrement, SqliteRepository};
use crate::window::TimeWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Sqlite, Transaction};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: Uuid,
    owner_id: Uuid,
    label_id: Option<Uuid>,
    title: String,
    start_at: DateTime<Utc>,
    end_at: Option<DateTime<Utc>>,
    recurring_event_id: Option<Uuid>,
    occurrence_at: Option<DateTime<Utc>>,
    confirmed: bool,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let origin = match (row.recurring_event_id, row.occurrence_at) {
            (Some(recurring_event_id), Some(occurrence_at)) => EventOrigin::Materialized {
                recurring_event_id,
                occurrence_at,
            },
            _ => EventOrigin::Direct,
        };

        Event {
            id: row.id,
            owner_id: row.owner_id,
            label_id: row.label_id,
            title: row.title,
            start_at: row.start_at,
            end_at: row.end_at,
            origin,
            confirmed: row.confirmed,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl super::EventStore for SqliteRepository {
    async fn find_confirmed_events_between(
        &self,
        owner_id: Uuid,
        window: TimeWindow,
    ) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"SELECT * FROM events
            WHERE owner_id = $1
            AND confirmed = 1
            AND start_at >= $2 AND start_at < $3
            ORDER BY start_at"#,
        )
        .bind(owner_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn occurrence_exists(
        &self,
        recurring_event_id: Uuid,
        occurrence_at: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM events WHERE recurring_event_id = $1 AND occurrence_at = $2 LIMIT 1",
        )
        .bind(recurring_event_id)
        .bind(occurrence_at)
        .fetch_optional(self.pool())
        .await?;

        Ok(found.is_some())
    }

    async fn create_event(
        &self,
        event: &Event,
        increments: &[BucketIncrement],
    ) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        let inserted = sqlx::query(
            r#"INSERT INTO events (id, owner_id, label_id, title, start_at, end_at, recurring_event_id, occurrence_at, confirmed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(event.id)
        .bind(event.owner_id)
        .bind(event.label_id)
        .bind(&event.title)
        .bind(event.start_at)
        .bind(event.end_at)
        .bind(event.origin.recurring_event_id())
        .bind(event.origin.occurrence_at())
        .bind(event.confirmed)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            // Dropping the transaction rolls it back
            return Err(match event.origin {
                EventOrigin::Materialized {
                    recurring_event_id,
                    occurrence_at,
                } => CoreError::from_occurrence_insert(err, recurring_event_id, occurrence_at),
                EventOrigin::Direct => CoreError::Database(err),
            });
        }

        for increment in increments {
            Self::apply_bucket_increment(&mut tx, increment).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

impl SqliteRepository {
    /// Insert a directly created event without touching label buckets
    pub async fn add_event(&self, data: NewEvent) -> Result<Event, CoreError> {
        let event = Event {
            id: Uuid::now_v7(),
            owner_id: data.owner_id,
            label_id: data.label_id,
            title: data.title,
            start_at: data.start_at,
            end_at: data.end_at,
            origin: EventOrigin::Direct,
            confirmed: data.confirmed,
            created_at: Utc::now(),
        };

        super::EventStore::create_event(self, &event, &[]).await?;
        Ok(event)
    }

    /// All events materialized from one recurring event, ascending by occurrence
    pub async fn find_materialized_events(
        &self,
        recurring_event_id: Uuid,
    ) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT * FROM events WHERE recurring_event_id = $1 ORDER BY occurrence_at",
        )
        .bind(recurring_event_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Add minutes to the first row matching the increment's key, or insert one.
    pub(crate) async fn apply_bucket_increment<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        increment: &BucketIncrement,
    ) -> Result<(), CoreError> {
        let updated = sqlx::query(
            r#"UPDATE label_time_buckets
            SET duration_minutes = duration_minutes + $1
            WHERE id = (
                SELECT id FROM label_time_buckets
                WHERE owner_id = $2 AND label_id = $3
                AND bucket_type = $4 AND bucket_year = $5 AND bucket_value = $6
                ORDER BY id
                LIMIT 1
            )"#,
        )
        .bind(increment.minutes)
        .bind(increment.owner_id)
        .bind(increment.label_id)
        .bind(increment.key.bucket_type)
        .bind(increment.key.year)
        .bind(increment.key.value)
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() == 0 {
            sqlx::query(
                r#"INSERT INTO label_time_buckets (label_id, owner_id, bucket_type, bucket_year, bucket_value, duration_minutes)
                VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(increment.label_id)
            .bind(increment.owner_id)
            .bind(increment.key.bucket_type)
            .bind(increment.key.year)
            .bind(increment.key.value)
            .bind(increment.minutes)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
