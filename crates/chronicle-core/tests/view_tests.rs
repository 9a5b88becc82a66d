mod common;

use chronicle_core::clock::{ClockProvider, SystemClockProvider, UserContext};
use chronicle_core::models::{CalendarEntry, NewEvent};
use chronicle_core::recurrence::RecurrenceExpander;
use chronicle_core::timezone::week_window;
use chronicle_core::view::ViewComposer;
use chrono::{Datelike, Duration, Weekday};
use chrono_tz::Tz;
use common::*;
use uuid::Uuid;

#[tokio::test]
async fn test_elapsed_day_is_fully_materialized() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    let event = create_daily_event(&repo, owner, None, "Standup", 9, 15).await;
    let ctx = context(owner, utc(2025, 1, 20, 0, 0), Tz::UTC);

    let view = ViewComposer::new(&repo, RecurrenceExpander::default())
        .generate_day_view(&ctx, date(2025, 1, 10))
        .await
        .unwrap();

    assert_eq!(view.date, date(2025, 1, 10));
    assert_eq!(view.entries.len(), 1);
    assert!(!view.entries[0].is_virtual());
    assert_eq!(view.entries[0].start_at(), utc(2025, 1, 10, 9, 0));

    let stored = repo.find_materialized_events(event.id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_upcoming_day_is_projected_without_writes() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    let event = create_daily_event(&repo, owner, None, "Standup", 9, 15).await;
    let ctx = context(owner, utc(2025, 1, 1, 0, 0), Tz::UTC);
    let composer = ViewComposer::new(&repo, RecurrenceExpander::default());

    for _ in 0..3 {
        let view = composer
            .generate_day_view(&ctx, date(2025, 1, 10))
            .await
            .unwrap();
        assert_eq!(view.entries.len(), 1);
        assert!(view.entries[0].is_virtual());
    }

    assert!(repo.find_materialized_events(event.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_straddling_day_splits_at_now() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    let morning = create_daily_event(&repo, owner, None, "Run", 7, 60).await;
    let focus = create_daily_event(&repo, owner, None, "Focus", 9, 60).await;
    let evening = create_daily_event(&repo, owner, None, "Read", 18, 60).await;
    repo.add_event(NewEvent {
        owner_id: owner,
        label_id: None,
        title: "Holiday".to_string(),
        start_at: utc(2025, 1, 10, 0, 0),
        end_at: None,
        confirmed: true,
    })
    .await
    .unwrap();
    repo.add_event(NewEvent {
        owner_id: owner,
        label_id: None,
        title: "Tentative lunch".to_string(),
        start_at: utc(2025, 1, 10, 12, 0),
        end_at: Some(utc(2025, 1, 10, 13, 0)),
        confirmed: false,
    })
    .await
    .unwrap();

    // Focus is in progress
    let ctx = context(owner, utc(2025, 1, 10, 9, 30), Tz::UTC);
    let view = ViewComposer::new(&repo, RecurrenceExpander::default())
        .generate_day_view(&ctx, date(2025, 1, 10))
        .await
        .unwrap();

    let summary: Vec<(&str, bool)> = view
        .entries
        .iter()
        .map(|entry| (entry.title(), entry.is_virtual()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Holiday", false),
            ("Run", false),
            ("Focus", true),
            ("Read", true),
        ]
    );

    assert_eq!(repo.find_materialized_events(morning.id).await.unwrap().len(), 1);
    assert!(repo.find_materialized_events(focus.id).await.unwrap().is_empty());
    assert!(repo.find_materialized_events(evening.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_occurrence_running_past_midnight_stays_visible() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    // 23:00 to 00:30 every night
    let event = create_daily_event(&repo, owner, None, "Night shift", 23, 90).await;
    let composer = ViewComposer::new(&repo, RecurrenceExpander::default());

    let during = context(owner, utc(2025, 1, 11, 0, 10), Tz::UTC);
    let yesterday = composer
        .generate_day_view(&during, date(2025, 1, 10))
        .await
        .unwrap();
    let today = composer
        .generate_day_view(&during, date(2025, 1, 11))
        .await
        .unwrap();

    assert_eq!(yesterday.entries.len(), 1);
    assert!(yesterday.entries[0].is_virtual());
    assert_eq!(yesterday.entries[0].start_at(), utc(2025, 1, 10, 23, 0));
    assert_eq!(today.entries.len(), 1);
    assert_eq!(today.entries[0].start_at(), utc(2025, 1, 11, 23, 0));
    assert!(repo.find_materialized_events(event.id).await.unwrap().is_empty());

    // Once it has ended the same day view records it
    let after = context(owner, utc(2025, 1, 11, 1, 0), Tz::UTC);
    let yesterday = composer
        .generate_day_view(&after, date(2025, 1, 10))
        .await
        .unwrap();

    assert_eq!(yesterday.entries.len(), 1);
    assert!(!yesterday.entries[0].is_virtual());
    assert_eq!(repo.find_materialized_events(event.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_week_entries_are_grouped_by_day_before_untimed_first() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    for (title, start_at, end_at) in [
        ("Offsite", utc(2025, 1, 17, 0, 0), None),
        ("Review", utc(2025, 1, 13, 9, 0), Some(utc(2025, 1, 13, 10, 0))),
        ("Retro", utc(2025, 1, 17, 8, 0), Some(utc(2025, 1, 17, 9, 0))),
    ] {
        repo.add_event(NewEvent {
            owner_id: owner,
            label_id: None,
            title: title.to_string(),
            start_at,
            end_at,
            confirmed: true,
        })
        .await
        .unwrap();
    }
    let ctx = context(owner, utc(2025, 1, 1, 0, 0), Tz::UTC);

    let view = ViewComposer::new(&repo, RecurrenceExpander::default())
        .generate_week_view(&ctx, date(2025, 1, 15))
        .await
        .unwrap();

    let titles: Vec<&str> = view.entries.iter().map(CalendarEntry::title).collect();
    assert_eq!(titles, vec!["Review", "Offsite", "Retro"]);
    let friday: Vec<&str> = view.days[4].entries.iter().map(CalendarEntry::title).collect();
    assert_eq!(friday, vec!["Offsite", "Retro"]);
}

#[tokio::test]
async fn test_week_view_partitions_by_local_day() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    create_daily_event(&repo, owner, None, "Standup", 9, 15).await;
    // Wednesday noon of the week Jan 13-19
    let ctx = context(owner, utc(2025, 1, 15, 12, 0), Tz::UTC);

    let view = ViewComposer::new(&repo, RecurrenceExpander::default())
        .generate_week_view(&ctx, date(2025, 1, 17))
        .await
        .unwrap();

    assert_eq!(view.days.len(), 7);
    assert_eq!(view.days[0].date, date(2025, 1, 13));
    assert_eq!(view.days[0].date.weekday(), Weekday::Mon);
    assert_eq!(view.entries.len(), 7);
    for (index, day) in view.days.iter().enumerate() {
        assert_eq!(day.entries.len(), 1, "day {}", day.date);
        assert_eq!(day.entries[0].is_virtual(), index > 2);
    }
}

#[tokio::test]
async fn test_week_view_uses_user_zone_for_day_boundaries() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    let los_angeles: Tz = "America/Los_Angeles".parse().unwrap();
    // 06:00 UTC is 22:00 the previous evening in Los Angeles
    create_daily_event(&repo, owner, None, "Call", 6, 30).await;
    let ctx = context(owner, utc(2025, 1, 1, 0, 0), los_angeles);

    let view = ViewComposer::new(&repo, RecurrenceExpander::default())
        .generate_week_view(&ctx, date(2025, 1, 8))
        .await
        .unwrap();

    assert_eq!(view.days[0].date, date(2025, 1, 6));
    // Monday Jan 6 local holds the Jan 7 06:00 UTC occurrence
    assert_eq!(view.days[0].entries[0].start_at(), utc(2025, 1, 7, 6, 0));
    assert!(view.days.iter().all(|day| day.entries.len() == 1));
}

#[tokio::test]
async fn test_views_cover_every_candidate_exactly_once() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    let event = create_daily_event(&repo, owner, None, "Focus", 9, 90).await;
    let expander = RecurrenceExpander::default();
    let composer = ViewComposer::new(&repo, expander);
    let week = week_window(date(2025, 2, 3), &Tz::UTC);

    // Advance "now" through the week; each step must partition the candidates
    let mut now = utc(2025, 2, 2, 0, 0);
    while now < utc(2025, 2, 11, 0, 0) {
        let ctx = context(owner, now, Tz::UTC);
        let view = composer
            .generate_week_view(&ctx, date(2025, 2, 3))
            .await
            .unwrap();

        let candidates = expander.expand(&event, week).unwrap();
        let mut seen: Vec<_> = view.entries.iter().map(CalendarEntry::start_at).collect();
        seen.sort();
        let expected: Vec<_> = candidates.iter().map(|o| o.start).collect();
        assert_eq!(seen, expected, "now = {}", now);

        for entry in &view.entries {
            let end = entry.end_at().unwrap();
            if entry.is_virtual() {
                assert!(end >= now, "elapsed occurrence projected at {}", now);
            } else {
                assert!(end < now, "future occurrence persisted at {}", now);
            }
        }

        now += Duration::hours(7);
    }
}

#[tokio::test]
async fn test_clock_provider_reads_stored_zone() {
    let (repo, _temp_dir) = setup_test_db().await;
    let owner = Uuid::now_v7();
    let stranger = Uuid::now_v7();
    let berlin: Tz = "Europe/Berlin".parse().unwrap();
    repo.upsert_user(owner, berlin).await.unwrap();

    let provider = SystemClockProvider::new(repo.clone(), Tz::UTC);
    let ctx = UserContext::resolve(&provider, owner).await.unwrap();
    let fallback = provider.clock_for_user(stranger).await.unwrap();

    assert_eq!(ctx.tz(), &berlin);
    assert_eq!(fallback.tz, Tz::UTC);
}
