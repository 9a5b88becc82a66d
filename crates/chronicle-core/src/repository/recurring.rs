use crate::error::CoreError;
use crate::models::{NewRecurringEvent, RecurrenceRule, RecurringEvent};
use crate::repository::SqliteRepository;
use crate::timezone::parse_timezone;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
struct RecurringEventRow {
    id: Uuid,
    owner_id: Uuid,
    label_id: Option<Uuid>,
    title: String,
    rule: String,
    start_time: Option<NaiveTime>,
    duration_minutes: Option<i64>,
    valid_from: NaiveDate,
    valid_to: Option<NaiveDate>,
    timezone: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecurringEventRow> for RecurringEvent {
    type Error = CoreError;

    fn try_from(row: RecurringEventRow) -> Result<Self, Self::Error> {
        let rule: RecurrenceRule = serde_json::from_str(&row.rule)?;
        let timezone = parse_timezone(&row.timezone)?;

        Ok(RecurringEvent {
            id: row.id,
            owner_id: row.owner_id,
            label_id: row.label_id,
            title: row.title,
            rule,
            start_time: row.start_time,
            duration_minutes: row.duration_minutes,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            timezone,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl super::RecurringEventSource for SqliteRepository {
    async fn find_recurring_event(&self, id: Uuid) -> Result<Option<RecurringEvent>, CoreError> {
        let row: Option<RecurringEventRow> =
            sqlx::query_as("SELECT * FROM recurring_events WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        row.map(RecurringEvent::try_from).transpose()
    }

    async fn find_recurring_events_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<RecurringEvent>, CoreError> {
        let rows: Vec<RecurringEventRow> = sqlx::query_as(
            "SELECT * FROM recurring_events WHERE owner_id = $1 ORDER BY created_at, id",
        )
        .bind(owner_id)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(RecurringEvent::try_from).collect()
    }
}

impl SqliteRepository {
    pub async fn add_recurring_event(
        &self,
        data: NewRecurringEvent,
    ) -> Result<RecurringEvent, CoreError> {
        if let Some(valid_to) = data.valid_to {
            if valid_to < data.valid_from {
                return Err(CoreError::InvalidInput(format!(
                    "Validity ends ({}) before it starts ({})",
                    valid_to, data.valid_from
                )));
            }
        }
        if data.rule.interval() == 0 {
            return Err(CoreError::InvalidInput(
                "Recurrence interval must be at least 1".to_string(),
            ));
        }

        let event = RecurringEvent {
            id: Uuid::now_v7(),
            owner_id: data.owner_id,
            label_id: data.label_id,
            title: data.title,
            rule: data.rule,
            start_time: data.start_time,
            duration_minutes: data.duration_minutes,
            valid_from: data.valid_from,
            valid_to: data.valid_to,
            timezone: data.timezone,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO recurring_events (id, owner_id, label_id, title, rule, start_time, duration_minutes, valid_from, valid_to, timezone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(event.id)
        .bind(event.owner_id)
        .bind(event.label_id)
        .bind(&event.title)
        .bind(serde_json::to_string(&event.rule)?)
        .bind(event.start_time)
        .bind(event.duration_minutes)
        .bind(event.valid_from)
        .bind(event.valid_to)
        .bind(event.timezone.name())
        .bind(event.created_at)
        .execute(self.pool())
        .await?;

        Ok(event)
    }
}
