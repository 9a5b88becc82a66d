//! Per-badge time statistics from label buckets.

use crate::buckets::{BucketKey, PeriodKeys};
use crate::clock::UserContext;
use crate::error::CoreError;
use crate::models::{Badge, BadgeStats, BucketType, LabelTimeBucket};
use crate::repository::LabelBucketStore;
use std::collections::BTreeSet;
use uuid::Uuid;

fn total_minutes(buckets: &[LabelTimeBucket]) -> i64 {
    buckets.iter().map(|bucket| bucket.duration_minutes).sum()
}

pub struct StatsAggregator<'a, S> {
    store: &'a S,
}

impl<'a, S: LabelBucketStore> StatsAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Statistics of `badge` as seen by its owner.
    ///
    /// Period keys come from `ctx`, so the context must belong to the badge
    /// owner; any other user is rejected with [`CoreError::InvalidInput`].
    pub async fn compute_stats_for_badge(
        &self,
        badge: &Badge,
        ctx: &UserContext,
    ) -> Result<BadgeStats, CoreError> {
        if badge.owner_id != ctx.user_id {
            return Err(CoreError::InvalidInput(format!(
                "Badge '{}' belongs to {}, not {}",
                badge.id, badge.owner_id, ctx.user_id
            )));
        }

        self.compute_stats_for_labels(badge.owner_id, &badge.label_ids, ctx)
            .await
    }

    /// Sum bucket minutes of `label_ids` for the six reporting periods.
    ///
    /// Period keys are resolved from `ctx` in the user's zone. Stored values
    /// are summed as they are, negative ones included. `all_time` is the sum
    /// of every day bucket and is not derived from the other figures.
    #[tracing::instrument(skip_all, fields(%owner_id, labels = label_ids.len()))]
    pub async fn compute_stats_for_labels(
        &self,
        owner_id: Uuid,
        label_ids: &BTreeSet<Uuid>,
        ctx: &UserContext,
    ) -> Result<BadgeStats, CoreError> {
        if label_ids.is_empty() {
            return Ok(BadgeStats::default());
        }

        let labels: Vec<Uuid> = label_ids.iter().copied().collect();
        let keys = PeriodKeys::for_instant(ctx.now(), ctx.tz());

        let today = self.sum_bucket(owner_id, &labels, keys.today.bucket()).await?;
        let this_week = self.sum_bucket(owner_id, &labels, keys.this_week.bucket()).await?;
        let last_week = self.sum_bucket(owner_id, &labels, keys.last_week.bucket()).await?;
        let this_month = self.sum_bucket(owner_id, &labels, keys.this_month.bucket()).await?;
        let last_month = self.sum_bucket(owner_id, &labels, keys.last_month.bucket()).await?;

        let all_buckets = self.store.find_all_buckets(owner_id, &labels).await?;
        let all_time = all_buckets
            .iter()
            .filter(|bucket| bucket.bucket_type == BucketType::Day)
            .map(|bucket| bucket.duration_minutes)
            .sum();

        Ok(BadgeStats {
            today,
            this_week,
            last_week,
            this_month,
            last_month,
            all_time,
        })
    }

    async fn sum_bucket(
        &self,
        owner_id: Uuid,
        labels: &[Uuid],
        key: BucketKey,
    ) -> Result<i64, CoreError> {
        let buckets = self
            .store
            .find_buckets(owner_id, labels, key.bucket_type, key.year, &[key.value])
            .await?;
        Ok(total_minutes(&buckets))
    }
}
