//! "Now" as a zoned instant, resolved per user.
//!
//! Every view and statistics operation receives a [`UserContext`] instead of
//! reading the wall clock or a global timezone, so tests can pin time and zone.

use crate::error::CoreError;
use crate::repository::UserZoneSource;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use uuid::Uuid;

/// An instant paired with the timezone it should be read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedClock {
    pub now: DateTime<Utc>,
    pub tz: Tz,
}

impl ZonedClock {
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self { now, tz }
    }

    pub fn local_now(&self) -> DateTime<Tz> {
        self.now.with_timezone(&self.tz)
    }

    pub fn today(&self) -> NaiveDate {
        self.local_now().date_naive()
    }
}

/// Per-request context threaded through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: Uuid,
    pub clock: ZonedClock,
}

impl UserContext {
    pub fn new(user_id: Uuid, clock: ZonedClock) -> Self {
        Self { user_id, clock }
    }

    /// Resolve the clock for `user_id`. Provider failures are returned unchanged.
    pub async fn resolve<P: ClockProvider + ?Sized>(
        provider: &P,
        user_id: Uuid,
    ) -> Result<Self, CoreError> {
        let clock = provider.clock_for_user(user_id).await?;
        Ok(Self { user_id, clock })
    }

    #[inline]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now
    }

    #[inline]
    pub fn tz(&self) -> &Tz {
        &self.clock.tz
    }
}

#[async_trait]
pub trait ClockProvider: Send + Sync {
    async fn clock_for_user(&self, user_id: Uuid) -> Result<ZonedClock, CoreError>;
    fn clock_for_zone(&self, tz: Tz) -> ZonedClock;
}

/// Wall clock with the zone looked up from the user's stored preference.
pub struct SystemClockProvider<S> {
    zones: S,
    fallback: Tz,
}

impl<S: UserZoneSource> SystemClockProvider<S> {
    /// `fallback` is used for users without a stored zone.
    pub fn new(zones: S, fallback: Tz) -> Self {
        Self { zones, fallback }
    }
}

#[async_trait]
impl<S: UserZoneSource> ClockProvider for SystemClockProvider<S> {
    async fn clock_for_user(&self, user_id: Uuid) -> Result<ZonedClock, CoreError> {
        let tz = self
            .zones
            .find_user_timezone(user_id)
            .await?
            .unwrap_or(self.fallback);
        Ok(ZonedClock::new(Utc::now(), tz))
    }

    fn clock_for_zone(&self, tz: Tz) -> ZonedClock {
        ZonedClock::new(Utc::now(), tz)
    }
}

/// Frozen instant with a fixed user-to-zone table.
#[derive(Debug, Clone)]
pub struct FixedClockProvider {
    now: DateTime<Utc>,
    zones: HashMap<Uuid, Tz>,
    fallback: Tz,
}

impl FixedClockProvider {
    pub fn new(now: DateTime<Utc>, fallback: Tz) -> Self {
        Self {
            now,
            zones: HashMap::new(),
            fallback,
        }
    }

    pub fn with_user_zone(mut self, user_id: Uuid, tz: Tz) -> Self {
        self.zones.insert(user_id, tz);
        self
    }

    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

#[async_trait]
impl ClockProvider for FixedClockProvider {
    async fn clock_for_user(&self, user_id: Uuid) -> Result<ZonedClock, CoreError> {
        let tz = self.zones.get(&user_id).copied().unwrap_or(self.fallback);
        Ok(ZonedClock::new(self.now, tz))
    }

    fn clock_for_zone(&self, tz: Tz) -> ZonedClock {
        ZonedClock::new(self.now, tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_fixed_provider_uses_user_zone() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 3, 0, 0).unwrap();
        let user = Uuid::now_v7();
        let provider = FixedClockProvider::new(now, Tz::UTC)
            .with_user_zone(user, "America/Los_Angeles".parse().unwrap());

        let ctx = UserContext::resolve(&provider, user).await.unwrap();
        assert_eq!(ctx.now(), now);
        // 03:00 UTC on Jan 1 is still Dec 31 in Los Angeles
        assert_eq!(ctx.clock.today(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let other = UserContext::resolve(&provider, Uuid::now_v7()).await.unwrap();
        assert_eq!(*other.tz(), Tz::UTC);
    }

    #[tokio::test]
    async fn test_fixed_provider_can_be_advanced() {
        let user = Uuid::now_v7();
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let mut provider = FixedClockProvider::new(start, Tz::UTC);

        let later = Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap();
        provider.set_now(later);

        let clock = provider.clock_for_user(user).await.unwrap();
        assert_eq!(clock.now, later);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_clock_for_zone_keeps_instant() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let provider = FixedClockProvider::new(now, Tz::UTC);
        let clock = provider.clock_for_zone("Asia/Kolkata".parse().unwrap());
        assert_eq!(clock.now, now);
        assert_eq!(clock.local_now().format("%H:%M").to_string(), "17:30");
    }
}
