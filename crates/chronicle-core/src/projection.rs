//! Read-only projection of upcoming recurring-event occurrences.

use crate::error::CoreError;
use crate::models::{RecurringEvent, VirtualOccurrence};
use crate::recurrence::{Occurrence, RecurrenceExpander};
use crate::window::TimeWindow;
use chrono::{DateTime, Utc};

/// Produces [`VirtualOccurrence`]s for occurrences that have not elapsed.
///
/// Projection never writes; calling it any number of times leaves storage
/// untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualProjector {
    expander: RecurrenceExpander,
}

impl VirtualProjector {
    pub fn new(expander: RecurrenceExpander) -> Self {
        Self { expander }
    }

    /// Occurrences of `event` starting in `window` that are not yet over at
    /// `now`. In-progress occurrences are included.
    pub fn project(
        &self,
        event: &RecurringEvent,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<VirtualOccurrence>, CoreError> {
        let projected: Vec<VirtualOccurrence> = self
            .expander
            .expand(event, window)?
            .into_iter()
            .filter(|occurrence| !occurrence.has_elapsed(now))
            .map(|occurrence| to_virtual(event, &occurrence))
            .collect();

        tracing::trace!(
            recurring_event_id = %event.id,
            count = projected.len(),
            "Projected virtual occurrences"
        );
        Ok(projected)
    }

    pub fn project_all(
        &self,
        events: &[RecurringEvent],
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<VirtualOccurrence>, CoreError> {
        let mut projected = Vec::new();
        for event in events {
            projected.extend(self.project(event, window, now)?);
        }
        Ok(projected)
    }
}

fn to_virtual(event: &RecurringEvent, occurrence: &Occurrence) -> VirtualOccurrence {
    VirtualOccurrence {
        recurring_event_id: event.id,
        owner_id: event.owner_id,
        label_id: event.label_id,
        title: event.title.clone(),
        start_at: occurrence.start,
        end_at: occurrence.end,
    }
}
