use chrono::{Duration, TimeZone, Utc};

use super::*;

fn window() -> EligibilityWindow {
    EligibilityWindow::new(
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 2, 14, 23, 59, 59).unwrap(),
    )
}

#[test]
fn lock_beats_force_open_inside_window() {
    let w = window().locked(true).forced_open(true);
    let inside = w.opens_at + Duration::days(3);
    assert!(!w.is_open(inside));
    assert_eq!(w.check(inside), Err(ClosedReason::ManuallyLocked));
}

#[test]
fn force_open_extends_past_deadline() {
    let w = window().forced_open(true);
    let after = w.closes_at + Duration::days(10);
    assert!(w.is_open(after));
    assert_eq!(w.status(after), WindowStatus::ForcedOpen);
}

#[test]
fn closed_before_opening_without_overrides() {
    let w = window();
    let before = w.opens_at - Duration::seconds(1);
    assert!(!w.is_open(before));
    assert_eq!(w.check(before), Err(ClosedReason::NotYetOpen));
}

#[test]
fn bounds_are_inclusive() {
    let w = window();
    assert!(w.is_open(w.opens_at));
    assert!(w.is_open(w.closes_at));
    assert_eq!(
        w.check(w.closes_at + Duration::seconds(1)),
        Err(ClosedReason::PastDeadline)
    );
}

#[test]
fn window_deserializes_with_overrides_defaulted() {
    let w: EligibilityWindow = serde_json::from_str(
        r#"{"opens_at":"2026-02-01T00:00:00Z","closes_at":"2026-02-14T23:59:59Z"}"#,
    )
    .expect("deserialize");
    assert_eq!(w, window());
}
