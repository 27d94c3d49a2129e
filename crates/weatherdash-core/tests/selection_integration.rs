//! Integration tests for the selection engine.
//!
//! These tests drive the bounds, store, interaction surface and presentation
//! together the way a dashboard host would.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use weatherdash_core::clock::ManualClock;
use weatherdash_core::storage::{Config, TimelineConfig};
use weatherdash_core::weather::CurrentReading;
use weatherdash_core::{
    format_duration, BoundsAuthority, Centroid, Clock, Event, Handle, HourlySeries, InteractionSurface,
    RegionOfInterest, SelectionMode, SelectionPanel, SelectionStore, TimeInstant, TimelineBounds,
    TrackView,
};

fn ymd_h(y: i32, m: u32, d: u32, h: u32) -> TimeInstant {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn december() -> TimelineBounds {
    TimelineBounds::new(ymd_h(2024, 12, 1, 0), ymd_h(2025, 1, 1, 0)).unwrap()
}

fn delhi() -> RegionOfInterest {
    RegionOfInterest::from_geometry(Some(1483.0), Centroid::new(77.209, 28.6139))
}

#[test]
fn test_bounds_are_fixed_for_the_session() {
    let clock = ManualClock::shared(ymd_h(2025, 1, 2, 12));
    let authority = BoundsAuthority::new(clock.clone(), &TimelineConfig::default()).unwrap();

    let first = authority.get_bounds();
    assert_eq!(first.upper(), ymd_h(2025, 1, 1, 12));
    assert_eq!(first.lower(), ymd_h(2024, 12, 3, 12));

    clock.advance(Duration::days(3));
    assert_eq!(authority.get_bounds(), first);
    assert!(authority.is_fixed());
}

#[test]
fn test_session_starts_at_now_clamped_in_single_mode() {
    let clock = ManualClock::shared(ymd_h(2025, 1, 2, 12));
    let config = Config::default();
    let authority = BoundsAuthority::new(clock.clone(), &config.timeline).unwrap();
    let store = SelectionStore::from_config(&authority, clock.clone(), &config.timeline);

    assert_eq!(store.mode(), SelectionMode::Single);
    assert_eq!(store.start(), authority.get_bounds().upper());
    assert_eq!(store.end(), authority.get_bounds().upper());
    assert!(store.region().is_none());
}

#[test]
fn test_switching_to_range_keeps_the_timeline_end() {
    let clock = ManualClock::shared(ymd_h(2024, 12, 15, 0));
    let mut store = SelectionStore::new(december(), clock.clone(), Duration::hours(1));
    assert_eq!(store.start(), ymd_h(2024, 12, 15, 0));

    let event = store.set_mode(SelectionMode::Range).unwrap();
    assert!(matches!(event, Event::ModeChanged { to: SelectionMode::Range, .. }));
    assert_eq!(store.start(), ymd_h(2024, 12, 15, 0));
    assert_eq!(store.end(), ymd_h(2025, 1, 1, 0));
}

#[test]
fn test_drag_past_the_track_end_commits_the_upper_bound() {
    let clock = ManualClock::shared(ymd_h(2024, 12, 10, 0));
    let bounds = december();
    let mut store = SelectionStore::new(bounds, clock.clone(), Duration::hours(1));
    let mut surface = InteractionSurface::new(bounds, clock.clone(), Duration::milliseconds(100));

    surface.track_press(30.0, &store);
    surface.pointer_move(150.0);
    let committed = surface.pointer_up(&mut store).unwrap();

    assert!(matches!(committed, Event::DragCommitted { handle: Handle::Start, .. }));
    assert_eq!(store.start(), bounds.upper());
    assert_eq!(store.end(), bounds.upper());
}

#[test]
fn test_range_drag_never_crosses_the_other_handle() {
    let clock = ManualClock::shared(ymd_h(2024, 12, 10, 0));
    let bounds = december();
    let mut store = SelectionStore::new(bounds, clock.clone(), Duration::hours(1));
    let mut surface = InteractionSurface::new(bounds, clock.clone(), Duration::milliseconds(100));
    store.set_mode(SelectionMode::Range);
    store.set_end(ymd_h(2024, 12, 20, 0));

    surface.pointer_down(Handle::End, 50.0, &store);
    surface.pointer_move(0.0);
    assert_eq!(surface.draft().unwrap().end, store.start());
    surface.pointer_up(&mut store);

    assert_eq!(store.end(), store.start());
    assert_eq!(store.start(), ymd_h(2024, 12, 10, 0));
}

#[test]
fn test_clearing_the_region_drops_the_weather_query() {
    let clock = ManualClock::shared(ymd_h(2024, 12, 15, 0));
    let mut store = SelectionStore::new(december(), clock.clone(), Duration::hours(1));
    let weather = Config::default().weather;

    store.set_region_of_interest(Some(delhi()));
    assert!(store.weather_query().is_some());
    assert!(store.weather_url(&weather).is_some());

    store.set_region_of_interest(Some(RegionOfInterest::cleared()));
    assert!(store.region().is_none());
    assert!(store.weather_query().is_none());

    store.set_region_of_interest(Some(delhi()));
    store.clear_region();
    assert!(store.weather_url(&weather).is_none());
}

#[test]
fn test_field_edits_settle_into_the_panel() {
    let clock = ManualClock::shared(ymd_h(2024, 12, 10, 0));
    let bounds = december();
    let mut store = SelectionStore::new(bounds, clock.clone(), Duration::hours(1));
    let mut surface = InteractionSurface::new(bounds, clock.clone(), Duration::milliseconds(100));
    let panel = SelectionPanel::attach(&mut store);

    store.set_mode(SelectionMode::Range);
    let renders_before = panel.render_count();

    let date = NaiveDate::from_ymd_opt(2024, 12, 12).unwrap();
    surface.edit_date(Handle::Start, date, &store);
    surface.edit_time(Handle::Start, "06:00", &store);
    clock.advance_ms(50);
    surface.edit_time(Handle::Start, "09:30", &store);
    assert!(surface.tick(&mut store).is_empty());
    assert_eq!(panel.render_count(), renders_before);

    clock.advance_ms(100);
    let events = surface.tick(&mut store);
    assert_eq!(events.len(), 1);
    assert_eq!(
        store.start(),
        Utc.with_ymd_and_hms(2024, 12, 12, 9, 30, 0).unwrap()
    );
    assert_eq!(panel.render_count(), renders_before + 1);
    assert_eq!(panel.summary().duration, format_duration(store.start(), store.end()));

    assert!(panel.detach(&mut store));
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_track_view_follows_the_draft_during_a_drag() {
    let clock = ManualClock::shared(ymd_h(2024, 12, 10, 0));
    let bounds = december();
    let mut store = SelectionStore::new(bounds, clock.clone(), Duration::hours(1));
    let mut surface = InteractionSurface::new(bounds, clock.clone(), Duration::milliseconds(100));
    store.set_mode(SelectionMode::Range);

    surface.pointer_down(Handle::Start, 25.0, &store);
    let view = TrackView::derive(surface.mapping(), &surface.displayed(&store), clock.now());
    assert!((view.start - 25.0).abs() < 0.01);
    assert_eq!(store.start(), ymd_h(2024, 12, 10, 0));

    surface.pointer_up(&mut store);
    let view = TrackView::derive(surface.mapping(), &surface.displayed(&store), clock.now());
    assert!((view.start - 25.0).abs() < 0.01);
    assert!(view.highlight.is_some());
}

#[test]
fn test_series_reading_follows_the_selection_mode() {
    let json = r#"{
        "latitude": 28.6,
        "longitude": 77.2,
        "hourly": {
            "time": ["2024-12-15T00:00", "2024-12-15T01:00", "2024-12-15T02:00", "2024-12-15T03:00"],
            "temperature_2m": [11.0, 12.5, 14.0, 15.5]
        }
    }"#;
    let series = HourlySeries::from_json(json, "temperature_2m").unwrap();

    let clock = ManualClock::shared(ymd_h(2024, 12, 15, 1));
    let mut store = SelectionStore::new(december(), clock.clone(), Duration::hours(1));
    match series.current(store.selection()) {
        CurrentReading::Point(Some(point)) => assert_eq!(point.value, 12.5),
        other => panic!("unexpected reading: {other:?}"),
    }

    store.set_mode(SelectionMode::Range);
    store.set_end(ymd_h(2024, 12, 15, 2));
    match series.current(store.selection()) {
        CurrentReading::Range(points) => assert_eq!(points.len(), 2),
        other => panic!("unexpected reading: {other:?}"),
    }
}

#[test]
fn test_listeners_see_every_commit_in_order() {
    let clock = ManualClock::shared(ymd_h(2024, 12, 10, 0));
    let mut store = SelectionStore::new(december(), clock.clone(), Duration::hours(1));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |s| sink.borrow_mut().push((s.mode, s.start, s.end)));

    store.set_mode(SelectionMode::Range);
    store.set_end(ymd_h(2024, 12, 12, 0));
    store.set_start(ymd_h(2024, 12, 14, 0));
    store.reset();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[2].1, ymd_h(2024, 12, 12, 0));
    assert_eq!(seen[3], (SelectionMode::Range, ymd_h(2024, 12, 10, 0), ymd_h(2025, 1, 1, 0)));
    for (_, start, end) in seen.iter() {
        assert!(start <= end);
    }
}
