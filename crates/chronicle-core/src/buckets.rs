//! Statistical bucket keys for a zoned instant.
//!
//! Week keys follow ISO-8601: week 1 is the week holding the year's first
//! Thursday, so the week-year can differ from the calendar year for dates
//! between Dec 29 and Jan 3.

use crate::models::BucketType;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A `(type, year, value)` bucket identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    pub bucket_type: BucketType,
    pub year: i32,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayKey {
    pub year: i32,
    /// `YYYYMMDD`
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekKey {
    /// ISO week-year
    pub year: i32,
    pub week: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        let value = date.year() * 10_000 + date.month() as i32 * 100 + date.day() as i32;
        Self {
            year: date.year(),
            value,
        }
    }

    pub fn bucket(&self) -> BucketKey {
        BucketKey {
            bucket_type: BucketType::Day,
            year: self.year,
            value: self.value,
        }
    }
}

/// Number of ISO weeks (52 or 53) in an ISO week-year.
/// December 28th always falls in the last ISO week of its year.
pub fn iso_weeks_in_year(iso_year: i32) -> u32 {
    NaiveDate::from_ymd_opt(iso_year, 12, 28)
        .map(|date| date.iso_week().week())
        .unwrap_or(52)
}

impl WeekKey {
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The week before; week 1 rolls over to the last ISO week of the
    /// previous week-year, which may be 52 or 53.
    pub fn previous(&self) -> Self {
        if self.week > 1 {
            Self {
                year: self.year,
                week: self.week - 1,
            }
        } else {
            let year = self.year - 1;
            Self {
                year,
                week: iso_weeks_in_year(year),
            }
        }
    }

    pub fn bucket(&self) -> BucketKey {
        BucketKey {
            bucket_type: BucketType::Week,
            year: self.year,
            value: self.week as i32,
        }
    }
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before; January rolls over to December of the previous year.
    pub fn previous(&self) -> Self {
        if self.month > 1 {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        } else {
            Self {
                year: self.year - 1,
                month: 12,
            }
        }
    }

    pub fn bucket(&self) -> BucketKey {
        BucketKey {
            bucket_type: BucketType::Month,
            year: self.year,
            value: self.month as i32,
        }
    }
}

/// The day, week and month keys containing one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketKeys {
    pub day: DayKey,
    pub week: WeekKey,
    pub month: MonthKey,
}

impl BucketKeys {
    /// Keys for `instant` read as a calendar date in `tz`
    pub fn for_instant(instant: DateTime<Utc>, tz: &Tz) -> Self {
        Self::for_date(instant.with_timezone(tz).date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            day: DayKey::from_date(date),
            week: WeekKey::from_date(date),
            month: MonthKey::from_date(date),
        }
    }

    pub fn all(&self) -> [BucketKey; 3] {
        [self.day.bucket(), self.week.bucket(), self.month.bucket()]
    }
}

/// Keys for the five periodic reporting figures relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodKeys {
    pub today: DayKey,
    pub this_week: WeekKey,
    pub last_week: WeekKey,
    pub this_month: MonthKey,
    pub last_month: MonthKey,
}

impl PeriodKeys {
    pub fn for_instant(now: DateTime<Utc>, tz: &Tz) -> Self {
        let keys = BucketKeys::for_instant(now, tz);
        Self {
            today: keys.day,
            this_week: keys.week,
            last_week: keys.week.previous(),
            this_month: keys.month,
            last_month: keys.month.previous(),
        }
    }
}
