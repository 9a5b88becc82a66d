use chrono::{DateTime, Duration, NaiveTime, Utc};
use rrule::{Frequency, NWeekday, RRule, RRuleSet, Tz as RRuleTz, Unvalidated};

use crate::error::CoreError;
use crate::models::{RecurrenceRule, RecurringEvent};
use crate::timezone::{resolve_local, start_of_day};
use crate::window::TimeWindow;

/// Default number of occurrences fetched from rrule per page
pub const DEFAULT_EXPANSION_LIMIT: u16 = 1000;

/// A candidate occurrence of a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub start: DateTime<Utc>,
    /// `None` for untimed occurrences
    pub end: Option<DateTime<Utc>>,
}

impl Occurrence {
    /// Whether the occurrence lies entirely before `now`: its end, or its
    /// start when untimed, is strictly earlier.
    #[inline]
    pub fn has_elapsed(&self, now: DateTime<Utc>) -> bool {
        self.end.unwrap_or(self.start) < now
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_minutes())
    }
}

impl RecurrenceRule {
    /// Translate into an unvalidated rrule. Validation happens on build.
    pub fn to_rrule(&self) -> RRule<Unvalidated> {
        match self {
            RecurrenceRule::Daily { interval } => {
                RRule::new(Frequency::Daily).interval(*interval)
            }
            RecurrenceRule::Weekly { interval, days } => {
                let rule = RRule::new(Frequency::Weekly).interval(*interval);
                if days.is_empty() {
                    return rule;
                }
                let mut days = days.clone();
                days.sort_by_key(|day| day.num_days_from_monday());
                days.dedup();
                rule.by_weekday(days.into_iter().map(NWeekday::Every).collect())
            }
            RecurrenceRule::MonthlyOnDay { interval, day } => RRule::new(Frequency::Monthly)
                .interval(*interval)
                .by_month_day(vec![*day]),
            RecurrenceRule::MonthlyOnWeekday {
                interval,
                ordinal,
                weekday,
            } => RRule::new(Frequency::Monthly)
                .interval(*interval)
                .by_weekday(vec![NWeekday::Nth(i16::from(*ordinal), *weekday)]),
            RecurrenceRule::Yearly { interval } => {
                RRule::new(Frequency::Yearly).interval(*interval)
            }
        }
    }
}

/// Expands a recurring event into candidate occurrences.
///
/// A pure function of the event and the requested window: the same inputs
/// always give the same ordered, deduplicated output. `limit` only sets how
/// many occurrences are pulled from rrule per page; expansion pages until the
/// window is exhausted.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceExpander {
    limit: u16,
}

impl Default for RecurrenceExpander {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANSION_LIMIT)
    }
}

impl RecurrenceExpander {
    pub fn new(limit: u16) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u16 {
        self.limit
    }

    /// UTC window during which the event may produce occurrences.
    /// `valid_to` is inclusive, so the window ends at the following midnight.
    pub fn validity_window(event: &RecurringEvent) -> TimeWindow {
        let start = start_of_day(event.valid_from, &event.timezone);
        let end = match event.valid_to {
            Some(valid_to) => start_of_day(valid_to + Duration::days(1), &event.timezone),
            None => DateTime::<Utc>::MAX_UTC,
        };
        TimeWindow::new(start, end)
    }

    /// First occurrence instant in UTC: the validity start date at the local
    /// start time, or local midnight for untimed events.
    pub fn anchor(event: &RecurringEvent) -> DateTime<Utc> {
        let local_time = event.start_time.unwrap_or(NaiveTime::MIN);
        resolve_local(&event.timezone, event.valid_from.and_time(local_time))
    }

    /// Candidate occurrences whose start lies in both the validity window and
    /// `window`, ascending by start with same-instant duplicates collapsed.
    pub fn expand(
        &self,
        event: &RecurringEvent,
        window: TimeWindow,
    ) -> Result<Vec<Occurrence>, CoreError> {
        let Some(effective) = Self::validity_window(event).intersect(&window) else {
            return Ok(Vec::new());
        };

        let rrule_set = self.build_rrule_set(event)?;

        // after/before are inclusive; widen by a second and filter exactly below
        let before = effective
            .end
            .checked_add_signed(Duration::seconds(1))
            .unwrap_or(effective.end)
            .with_timezone(&RRuleTz::UTC);
        let page_size = self.limit.max(1);
        let mut cursor = effective.start - Duration::seconds(1);
        let mut starts: Vec<DateTime<Utc>> = Vec::new();

        loop {
            let page = rrule_set
                .clone()
                .after(cursor.with_timezone(&RRuleTz::UTC))
                .before(before)
                .all(page_size);
            let last = page.dates.last().map(|dt| dt.with_timezone(&Utc));
            starts.extend(page.dates.iter().map(|dt| dt.with_timezone(&Utc)));

            match (page.limited, last) {
                (false, _) => break,
                (true, Some(last)) => {
                    tracing::debug!(
                        recurring_event_id = %event.id,
                        page_size,
                        %last,
                        "Expansion page full, continuing"
                    );
                    cursor = last + Duration::seconds(1);
                }
                (true, None) => {
                    tracing::warn!(
                        recurring_event_id = %event.id,
                        %cursor,
                        window_end = %effective.end,
                        "Recurrence iteration gave up before the window end"
                    );
                    break;
                }
            }
        }

        let duration = event.duration();
        let mut occurrences: Vec<Occurrence> = starts
            .into_iter()
            .filter(|start| effective.contains(*start))
            .map(|start| Occurrence {
                start,
                end: duration.map(|d| start + d),
            })
            .collect();

        occurrences.sort_by_key(|occurrence| occurrence.start);
        occurrences.dedup_by_key(|occurrence| occurrence.start);

        tracing::trace!(
            recurring_event_id = %event.id,
            count = occurrences.len(),
            "Expanded recurring event"
        );

        Ok(occurrences)
    }

    fn build_rrule_set(&self, event: &RecurringEvent) -> Result<RRuleSet, CoreError> {
        if event.rule.interval() == 0 {
            return Err(CoreError::InvalidRecurrence(format!(
                "Recurring event '{}' has a zero interval",
                event.id
            )));
        }

        let rrule_tz: RRuleTz = event.timezone.into();
        let dt_start = Self::anchor(event).with_timezone(&rrule_tz);

        event.rule.to_rrule().build(dt_start).map_err(|e| {
            CoreError::InvalidRecurrence(format!(
                "Failed to build recurrence for event '{}': {}",
                event.id, e
            ))
        })
    }
}
