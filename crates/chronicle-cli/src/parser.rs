use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_english::{parse_date_string, Dialect};
use chronicle_core::clock::ZonedClock;

/// Parse an ISO date or a natural-language expression relative to the
/// clock's local "now".
pub fn parse_date(input: &str, clock: &ZonedClock) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    parse_date_string(input, clock.local_now(), Dialect::Uk)
        .map(|datetime| datetime.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

pub fn parse_optional_date(input: Option<&str>, clock: &ZonedClock) -> Result<NaiveDate> {
    match input {
        Some(input) => parse_date(input, clock),
        None => Ok(clock.today()),
    }
}

pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&input.to_uppercase(), format).ok())
        .ok_or_else(|| anyhow!("Failed to parse time '{}'. Use e.g. '09:00' or '6:30 pm'", input))
}

pub fn parse_weekday(input: &str) -> Result<Weekday, String> {
    input
        .trim()
        .parse::<Weekday>()
        .map_err(|_| format!("Invalid weekday '{}'. Use mon, tue, wed, thu, fri, sat or sun", input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn clock() -> ZonedClock {
        // Friday
        ZonedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
            chrono_tz::Tz::UTC,
        )
    }

    #[test]
    fn test_iso_dates_parse_directly() {
        assert_eq!(
            parse_date("2025-01-31", &clock()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_natural_language_is_relative_to_clock() {
        assert_eq!(
            parse_date("tomorrow", &clock()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert!(parse_date("not a date at all", &clock()).is_err());
    }

    #[test]
    fn test_missing_date_means_today() {
        assert_eq!(parse_optional_date(None, &clock()).unwrap(), clock().today());
    }

    #[rstest]
    #[case("09:00", 9, 0)]
    #[case("18:45", 18, 45)]
    #[case("6:30 pm", 18, 30)]
    #[case("7:05am", 7, 5)]
    fn test_parse_time(#[case] input: &str, #[case] hour: u32, #[case] minute: u32) {
        assert_eq!(
            parse_time(input).unwrap(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("mon"), Ok(Weekday::Mon));
        assert_eq!(parse_weekday("Friday"), Ok(Weekday::Fri));
        assert!(parse_weekday("someday").is_err());
    }
}
