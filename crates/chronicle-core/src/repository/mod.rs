use crate::buckets::BucketKey;
use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{BucketType, Event, LabelTimeBucket, RecurringEvent};
use crate::window::TimeWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

// Re-export domain modules
pub mod buckets;
pub mod events;
pub mod recurring;
pub mod users;

/// Minutes to add to one label bucket when an event is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketIncrement {
    pub owner_id: Uuid,
    pub label_id: Uuid,
    pub key: BucketKey,
    pub minutes: i64,
}

/// Persisted events
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Confirmed events of `owner_id` starting inside `window`, ascending by start
    async fn find_confirmed_events_between(
        &self,
        owner_id: Uuid,
        window: TimeWindow,
    ) -> Result<Vec<Event>, CoreError>;

    async fn occurrence_exists(
        &self,
        recurring_event_id: Uuid,
        occurrence_at: DateTime<Utc>,
    ) -> Result<bool, CoreError>;

    /// Persist `event` and apply `increments` atomically.
    ///
    /// Fails with [`CoreError::DuplicateOccurrence`] when a materialized event
    /// for the same occurrence already exists; nothing is written in that case.
    async fn create_event(
        &self,
        event: &Event,
        increments: &[BucketIncrement],
    ) -> Result<(), CoreError>;
}

/// Label time buckets
#[async_trait]
pub trait LabelBucketStore: Send + Sync {
    async fn find_buckets(
        &self,
        owner_id: Uuid,
        label_ids: &[Uuid],
        bucket_type: BucketType,
        bucket_year: i32,
        bucket_values: &[i32],
    ) -> Result<Vec<LabelTimeBucket>, CoreError>;

    /// Every bucket row of any type for the labels
    async fn find_all_buckets(
        &self,
        owner_id: Uuid,
        label_ids: &[Uuid],
    ) -> Result<Vec<LabelTimeBucket>, CoreError>;
}

/// Recurring event definitions
#[async_trait]
pub trait RecurringEventSource: Send + Sync {
    async fn find_recurring_event(&self, id: Uuid) -> Result<Option<RecurringEvent>, CoreError>;
    async fn find_recurring_events_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<RecurringEvent>, CoreError>;
}

/// Per-user timezone preference
#[async_trait]
pub trait UserZoneSource: Send + Sync {
    async fn find_user_timezone(&self, user_id: Uuid) -> Result<Option<Tz>, CoreError>;
}

/// Everything the engine consumes from storage
pub trait Repository: EventStore + LabelBucketStore + RecurringEventSource + UserZoneSource {}

/// SQLite implementation of the repository pattern
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
