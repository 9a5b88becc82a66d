use crate::error::CoreError;
use crate::window::TimeWindow;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Parse an IANA timezone name
pub fn parse_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone).map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))
}

/// Resolve a local wall-clock time to a UTC instant.
///
/// Ambiguous times (DST fall back) resolve to the earlier instant. Times that
/// do not exist (DST spring forward) are moved forward by one hour.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return dt.with_timezone(&Utc);
    }

    let shifted = local + Duration::hours(1);
    match tz.from_local_datetime(&shifted).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // No zone has a two hour gap; treat the wall time as UTC offset-free
        None => Utc.from_utc_datetime(&local),
    }
}

/// First instant of `date` in `tz`
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Calendar date of `instant` as seen in `tz`
pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// UTC window covering one local calendar day. DST days are 23 or 25 hours long.
pub fn day_window(date: NaiveDate, tz: &Tz) -> TimeWindow {
    TimeWindow::new(start_of_day(date, tz), start_of_day(date + Duration::days(1), tz))
}

/// UTC window covering the Monday-start local week that contains `anchor`
pub fn week_window(anchor: NaiveDate, tz: &Tz) -> TimeWindow {
    let monday = week_start(anchor);
    TimeWindow::new(start_of_day(monday, tz), start_of_day(monday + Duration::days(7), tz))
}

/// Format datetime with timezone-aware display
pub fn format_with_timezone(datetime: DateTime<Utc>, tz: &Tz, format: &str) -> String {
    datetime.with_timezone(tz).format(format).to_string()
}
