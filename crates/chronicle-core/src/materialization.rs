//! Solidifies elapsed recurring-event occurrences into persisted events.
//!
//! Materialization is idempotent: an occurrence is written at most once,
//! guarded by an existence check and, for concurrent requests, by the
//! storage uniqueness constraint on `(recurring_event_id, occurrence_at)`.

use crate::buckets::BucketKeys;
use crate::clock::UserContext;
use crate::error::CoreError;
use crate::models::{Event, EventOrigin, RecurringEvent};
use crate::recurrence::{Occurrence, RecurrenceExpander};
use crate::repository::{BucketIncrement, EventStore, RecurringEventSource};
use crate::window::TimeWindow;
use chrono::Utc;
use uuid::Uuid;

/// Counters collected during a materialization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializationSummary {
    /// Elapsed occurrences considered
    pub candidates: usize,
    /// Events written by this pass
    pub created: usize,
    /// Occurrences that were already persisted
    pub already_present: usize,
}

impl MaterializationSummary {
    pub fn merge(&mut self, other: MaterializationSummary) {
        self.candidates += other.candidates;
        self.created += other.created;
        self.already_present += other.already_present;
    }
}

/// The persisted form of an elapsed occurrence
pub fn solidify(event: &RecurringEvent, occurrence: &Occurrence) -> Event {
    Event {
        id: Uuid::now_v7(),
        owner_id: event.owner_id,
        label_id: event.label_id,
        title: event.title.clone(),
        start_at: occurrence.start,
        end_at: occurrence.end,
        origin: EventOrigin::Materialized {
            recurring_event_id: event.id,
            occurrence_at: occurrence.start,
        },
        confirmed: true,
        created_at: Utc::now(),
    }
}

/// Day, week and month increments for a solidified event, keyed in the
/// user's timezone. Events without a label or without an end add nothing.
pub fn bucket_increments(ctx: &UserContext, event: &Event) -> Vec<BucketIncrement> {
    let (Some(label_id), Some(minutes)) = (event.label_id, event.duration_minutes()) else {
        return Vec::new();
    };

    BucketKeys::for_instant(event.start_at, ctx.tz())
        .all()
        .into_iter()
        .map(|key| BucketIncrement {
            owner_id: event.owner_id,
            label_id,
            key,
            minutes,
        })
        .collect()
}

pub struct Materializer<'a, S> {
    store: &'a S,
    expander: RecurrenceExpander,
}

impl<'a, S: EventStore> Materializer<'a, S> {
    pub fn new(store: &'a S, expander: RecurrenceExpander) -> Self {
        Self { store, expander }
    }

    /// Persist every occurrence of `event` in `window` that ended before
    /// `ctx.now()`.
    ///
    /// Any storage failure other than a duplicate occurrence stops the pass
    /// and is returned; occurrences written before the failure stay written
    /// and a retry picks up the remainder.
    #[tracing::instrument(skip_all, fields(recurring_event_id = %event.id, window_start = %window.start, window_end = %window.end))]
    pub async fn materialize(
        &self,
        ctx: &UserContext,
        event: &RecurringEvent,
        window: TimeWindow,
    ) -> Result<MaterializationSummary, CoreError> {
        let now = ctx.now();
        let mut summary = MaterializationSummary::default();

        let elapsed = self
            .expander
            .expand(event, window)?
            .into_iter()
            .filter(|occurrence| occurrence.has_elapsed(now));

        for occurrence in elapsed {
            summary.candidates += 1;

            if self.store.occurrence_exists(event.id, occurrence.start).await? {
                summary.already_present += 1;
                continue;
            }

            let solidified = solidify(event, &occurrence);
            let increments = bucket_increments(ctx, &solidified);

            match self.store.create_event(&solidified, &increments).await {
                Ok(()) => {
                    tracing::trace!(occurrence_at = %occurrence.start, "Materialized occurrence");
                    summary.created += 1;
                }
                Err(CoreError::DuplicateOccurrence { occurrence_at, .. }) => {
                    tracing::debug!(%occurrence_at, "Occurrence materialized concurrently");
                    summary.already_present += 1;
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            candidates = summary.candidates,
            created = summary.created,
            already_present = summary.already_present,
            "Materialization pass finished"
        );

        Ok(summary)
    }

    /// Materialize every recurring event owned by the context's user.
    pub async fn materialize_user_window<R: RecurringEventSource>(
        &self,
        source: &R,
        ctx: &UserContext,
        window: TimeWindow,
    ) -> Result<MaterializationSummary, CoreError> {
        let events = source.find_recurring_events_for_owner(ctx.user_id).await?;
        self.materialize_all(ctx, &events, window).await
    }

    pub async fn materialize_all(
        &self,
        ctx: &UserContext,
        events: &[RecurringEvent],
        window: TimeWindow,
    ) -> Result<MaterializationSummary, CoreError> {
        let mut summary = MaterializationSummary::default();
        for event in events {
            summary.merge(self.materialize(ctx, event, window).await?);
        }
        Ok(summary)
    }
}
