//! Day and week calendar views.
//!
//! A view merges persisted confirmed events with virtual projections of
//! recurring events. Which of the two sources is consulted depends on where
//! the requested window lies relative to the user's "now":
//!
//! - [`WindowPhase::Elapsed`]: materialize the window, read storage and
//!   project occurrences that started in the window but are still running.
//! - [`WindowPhase::Upcoming`]: project only.
//! - [`WindowPhase::Straddling`]: materialize up to "now", read storage for
//!   the whole window and project whatever has not elapsed yet.

use crate::clock::UserContext;
use crate::error::CoreError;
use crate::materialization::{MaterializationSummary, Materializer};
use crate::models::{CalendarEntry, DayView, Event, RecurringEvent, VirtualOccurrence, WeekView};
use crate::projection::VirtualProjector;
use crate::recurrence::RecurrenceExpander;
use crate::repository::{EventStore, RecurringEventSource};
use crate::timezone::{day_window, local_date, week_start, week_window};
use crate::window::{TimeWindow, WindowPhase};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use uuid::Uuid;

pub struct ViewComposer<'a, S> {
    store: &'a S,
    expander: RecurrenceExpander,
}

impl<'a, S> ViewComposer<'a, S>
where
    S: EventStore + RecurringEventSource,
{
    pub fn new(store: &'a S, expander: RecurrenceExpander) -> Self {
        Self { store, expander }
    }

    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, %date))]
    pub async fn generate_day_view(
        &self,
        ctx: &UserContext,
        date: NaiveDate,
    ) -> Result<DayView, CoreError> {
        let window = day_window(date, ctx.tz());
        let entries = self.compose(ctx, window).await?;
        Ok(DayView { date, entries })
    }

    /// Seven-day view of the Monday-start week containing `anchor`
    #[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, %anchor))]
    pub async fn generate_week_view(
        &self,
        ctx: &UserContext,
        anchor: NaiveDate,
    ) -> Result<WeekView, CoreError> {
        let window = week_window(anchor, ctx.tz());
        let mut entries = self.compose(ctx, window).await?;
        let monday = week_start(anchor);
        entries.sort_by(|a, b| {
            local_date(a.start_at(), ctx.tz())
                .cmp(&local_date(b.start_at(), ctx.tz()))
                .then_with(|| compare_entries(a, b))
        });

        let days = (0..7)
            .map(|offset| {
                let date = monday + Duration::days(offset);
                let entries = entries
                    .iter()
                    .filter(|entry| local_date(entry.start_at(), ctx.tz()) == date)
                    .cloned()
                    .collect();
                DayView { date, entries }
            })
            .collect();

        Ok(WeekView { days, entries })
    }

    /// Sorted entries for `window` after running the phase-specific path
    pub async fn compose(
        &self,
        ctx: &UserContext,
        window: TimeWindow,
    ) -> Result<Vec<CalendarEntry>, CoreError> {
        let recurring = self
            .store
            .find_recurring_events_for_owner(ctx.user_id)
            .await?;

        let phase = WindowPhase::classify(window, ctx.now());
        tracing::debug!(?phase, recurring = recurring.len(), "Composing view window");

        let virtuals = match phase {
            WindowPhase::Elapsed(elapsed) => {
                self.materialize(ctx, &recurring, elapsed).await?;
                // Only occurrences still running at "now" survive projection
                self.project(&recurring, elapsed, ctx.now())?
            }
            WindowPhase::Upcoming(upcoming) => self.project(&recurring, upcoming, ctx.now())?,
            WindowPhase::Straddling { elapsed, .. } => {
                self.materialize(ctx, &recurring, elapsed).await?;
                // Occurrences starting before "now" but still running stay virtual
                self.project(&recurring, window, ctx.now())?
            }
        };

        let persisted = self
            .store
            .find_confirmed_events_between(ctx.user_id, window)
            .await?;

        Ok(merge_entries(persisted, virtuals))
    }

    async fn materialize(
        &self,
        ctx: &UserContext,
        recurring: &[RecurringEvent],
        window: TimeWindow,
    ) -> Result<MaterializationSummary, CoreError> {
        Materializer::new(self.store, self.expander)
            .materialize_all(ctx, recurring, window)
            .await
    }

    fn project(
        &self,
        recurring: &[RecurringEvent],
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<VirtualOccurrence>, CoreError> {
        VirtualProjector::new(self.expander).project_all(recurring, window, now)
    }
}

/// Merge persisted events and virtual occurrences into one ordered list.
///
/// A virtual occurrence already persisted as a materialized event is
/// dropped. Untimed entries come first, then entries ascend by start, with
/// persisted entries ahead of virtual ones on equal starts.
pub fn merge_entries(
    persisted: Vec<Event>,
    virtuals: Vec<VirtualOccurrence>,
) -> Vec<CalendarEntry> {
    let solidified: HashSet<(Uuid, DateTime<Utc>)> = persisted
        .iter()
        .filter_map(|event| {
            event
                .origin
                .recurring_event_id()
                .zip(event.origin.occurrence_at())
        })
        .collect();

    let mut entries: Vec<CalendarEntry> = persisted
        .into_iter()
        .map(CalendarEntry::Persisted)
        .chain(
            virtuals
                .into_iter()
                .filter(|occurrence| {
                    !solidified.contains(&(occurrence.recurring_event_id, occurrence.start_at))
                })
                .map(CalendarEntry::Virtual),
        )
        .collect();

    entries.sort_by(compare_entries);
    entries
}

fn compare_entries(a: &CalendarEntry, b: &CalendarEntry) -> Ordering {
    b.is_untimed()
        .cmp(&a.is_untimed())
        .then_with(|| a.start_at().cmp(&b.start_at()))
        .then_with(|| a.is_virtual().cmp(&b.is_virtual()))
}
