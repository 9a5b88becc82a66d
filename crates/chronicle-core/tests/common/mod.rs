#![allow(dead_code)]

use chronicle_core::clock::{UserContext, ZonedClock};
use chronicle_core::db::establish_connection;
use chronicle_core::models::{NewRecurringEvent, RecurrenceRule, RecurringEvent};
use chronicle_core::repository::SqliteRepository;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper function to create a test database
pub async fn setup_test_db() -> (SqliteRepository, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = establish_connection(&db_path.to_string_lossy())
        .await
        .expect("Failed to establish test database connection");

    (SqliteRepository::new(pool), temp_dir)
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn context(user_id: Uuid, now: DateTime<Utc>, tz: Tz) -> UserContext {
    UserContext::new(user_id, ZonedClock::new(now, tz))
}

/// Daily recurring event starting 2025-01-01 in UTC
pub async fn create_daily_event(
    repo: &SqliteRepository,
    owner_id: Uuid,
    label_id: Option<Uuid>,
    title: &str,
    hour: u32,
    duration_minutes: i64,
) -> RecurringEvent {
    repo.add_recurring_event(NewRecurringEvent {
        owner_id,
        label_id,
        title: title.to_string(),
        rule: RecurrenceRule::Daily { interval: 1 },
        start_time: NaiveTime::from_hms_opt(hour, 0, 0),
        duration_minutes: Some(duration_minutes),
        valid_from: date(2025, 1, 1),
        valid_to: None,
        timezone: Tz::UTC,
    })
    .await
    .expect("Failed to create recurring event")
}
