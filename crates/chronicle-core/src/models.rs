use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Recurrence
// ============================================================================

/// Abstract recurrence description consumed by the expander.
///
/// The anchor of every variant is the owning event's validity start date at
/// its local start time; `interval` counts units of the frequency between
/// repetitions (1 = every unit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum RecurrenceRule {
    Daily {
        interval: u16,
    },
    /// An empty `days` list repeats on the anchor's weekday.
    Weekly {
        interval: u16,
        days: Vec<Weekday>,
    },
    MonthlyOnDay {
        interval: u16,
        /// 1..=31, or -1..=-31 counting from the end of the month
        day: i8,
    },
    MonthlyOnWeekday {
        interval: u16,
        /// 1..=5, or -1 for the last such weekday of the month
        ordinal: i8,
        weekday: Weekday,
    },
    Yearly {
        interval: u16,
    },
}

impl RecurrenceRule {
    pub fn interval(&self) -> u16 {
        match self {
            RecurrenceRule::Daily { interval }
            | RecurrenceRule::Weekly { interval, .. }
            | RecurrenceRule::MonthlyOnDay { interval, .. }
            | RecurrenceRule::MonthlyOnWeekday { interval, .. }
            | RecurrenceRule::Yearly { interval } => *interval,
        }
    }
}

/// A recurring event as authored by a user.
#[derive(Debug, Clone)]
pub struct RecurringEvent {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub label_id: Option<Uuid>,
    pub title: String,
    pub rule: RecurrenceRule,
    /// Local start time of each occurrence; `None` for untimed (all-day) events
    pub start_time: Option<NaiveTime>,
    /// `None` means occurrences carry no end instant
    pub duration_minutes: Option<i64>,
    pub valid_from: NaiveDate,
    /// Inclusive, interpreted in `timezone`
    pub valid_to: Option<NaiveDate>,
    /// Authoring timezone
    pub timezone: Tz,
    pub created_at: DateTime<Utc>,
}

impl RecurringEvent {
    pub fn duration(&self) -> Option<Duration> {
        self.duration_minutes.map(Duration::minutes)
    }
}

#[derive(Debug, Clone)]
pub struct NewRecurringEvent {
    pub owner_id: Uuid,
    pub label_id: Option<Uuid>,
    pub title: String,
    pub rule: RecurrenceRule,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub valid_from: NaiveDate,
    pub valid_to: Option<NaiveDate>,
    pub timezone: Tz,
}

// ============================================================================
// Events
// ============================================================================

/// Where a persisted event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventOrigin {
    Direct,
    Materialized {
        recurring_event_id: Uuid,
        occurrence_at: DateTime<Utc>,
    },
}

impl EventOrigin {
    pub fn recurring_event_id(&self) -> Option<Uuid> {
        match self {
            EventOrigin::Direct => None,
            EventOrigin::Materialized {
                recurring_event_id, ..
            } => Some(*recurring_event_id),
        }
    }

    pub fn occurrence_at(&self) -> Option<DateTime<Utc>> {
        match self {
            EventOrigin::Direct => None,
            EventOrigin::Materialized { occurrence_at, .. } => Some(*occurrence_at),
        }
    }
}

/// A persisted calendar fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub label_id: Option<Uuid>,
    pub title: String,
    pub start_at: DateTime<Utc>,
    /// Untimed events have no end
    pub end_at: Option<DateTime<Utc>>,
    pub origin: EventOrigin,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_at.map(|end| (end - self.start_at).num_minutes())
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub owner_id: Uuid,
    pub label_id: Option<Uuid>,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub confirmed: bool,
}

/// Presentation-only projection of a future occurrence. Has no identity and
/// is never written to storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualOccurrence {
    pub recurring_event_id: Uuid,
    pub owner_id: Uuid,
    pub label_id: Option<Uuid>,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Label time buckets
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum BucketType {
    Day,
    Week,
    Month,
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketType::Day => write!(f, "day"),
            BucketType::Week => write!(f, "week"),
            BucketType::Month => write!(f, "month"),
        }
    }
}

impl FromStr for BucketType {
    type Err = ParseBucketTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(BucketType::Day),
            "week" => Ok(BucketType::Week),
            "month" => Ok(BucketType::Month),
            _ => Err(ParseBucketTypeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid bucket type: {0}")]
pub struct ParseBucketTypeError(String);

/// Accumulated minutes for one label in one day/week/month bucket.
///
/// `bucket_value` is `YYYYMMDD` for day buckets, the ISO week number for
/// week buckets (with `bucket_year` holding the ISO week-year) and the month
/// number for month buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LabelTimeBucket {
    pub id: i64,
    pub label_id: Uuid,
    pub owner_id: Uuid,
    pub bucket_type: BucketType,
    pub bucket_year: i32,
    pub bucket_value: i32,
    pub duration_minutes: i64,
}

// ============================================================================
// Badges and statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub label_ids: BTreeSet<Uuid>,
}

/// Minutes per reporting period. Each figure is sourced independently;
/// `all_time` is not the sum of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeStats {
    pub today: i64,
    pub this_week: i64,
    pub last_week: i64,
    pub this_month: i64,
    pub last_month: i64,
    pub all_time: i64,
}

// ============================================================================
// Calendar views
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarEntry {
    Persisted(Event),
    Virtual(VirtualOccurrence),
}

impl CalendarEntry {
    pub fn start_at(&self) -> DateTime<Utc> {
        match self {
            CalendarEntry::Persisted(event) => event.start_at,
            CalendarEntry::Virtual(occurrence) => occurrence.start_at,
        }
    }

    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CalendarEntry::Persisted(event) => event.end_at,
            CalendarEntry::Virtual(occurrence) => occurrence.end_at,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CalendarEntry::Persisted(event) => &event.title,
            CalendarEntry::Virtual(occurrence) => &occurrence.title,
        }
    }

    pub fn label_id(&self) -> Option<Uuid> {
        match self {
            CalendarEntry::Persisted(event) => event.label_id,
            CalendarEntry::Virtual(occurrence) => occurrence.label_id,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, CalendarEntry::Virtual(_))
    }

    pub fn is_untimed(&self) -> bool {
        self.end_at().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub entries: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    /// Seven days, Monday first
    pub days: Vec<DayView>,
    /// All entries of the week, grouped by local day in the same order as `days`
    pub entries: Vec<CalendarEntry>,
}
