//! Integration tests for the refresh pass over a rendered notes page
//!
//! These tests load `tests/fixtures/notes-page.json` and walk it through
//! successive passes at fixed points in time.

use chrono::{DateTime, Duration, TimeZone, Utc};
use notestamp_core::document::{Document, Element, TooltipState};
use notestamp_core::refresh::{refresh, RefreshOptions, TRIGGER_VALUE};
use notestamp_core::tooltip::{Placement, TooltipHost, TooltipRegistry};
use std::path::PathBuf;

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load_page() -> Document {
    Document::load(&fixture_path("notes-page.json")).expect("fixture should load")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 11, 9, 30, 0).unwrap()
}

fn text<'a>(doc: &'a Document, id: &str) -> &'a str {
    doc.get(id).expect("element should exist").text()
}

// ============================================
// Single Pass
// ============================================

#[test]
fn test_first_pass_over_page() {
    notestamp_core::logging::init_test();

    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();

    let report = refresh(&mut doc, &mut tooltips, now(), &RefreshOptions::default());

    assert_eq!(text(&doc, "note-1-time"), "Now");
    assert_eq!(text(&doc, "note-2-time"), "1hr 15min ago");
    assert_eq!(text(&doc, "note-3-time"), "2d 3hr ago");
    assert_eq!(text(&doc, "note-4-time"), "Mon, 2024-01-01 09:30:00");
    assert_eq!(text(&doc, "note-5-time"), "Jan 1");
    assert_eq!(text(&doc, "note-6-body"), "Hello :wave:");
    assert_eq!(text(&doc, "note-7-time"), "30min ago");

    assert_eq!(report.relabeled, 4);
    assert_eq!(report.terminalized, 1);
    assert_eq!(report.invalidated, 1);
    // note-7 already carried a tooltip from the server-rendered markup
    assert_eq!(report.tooltips_attached, 3);
}

#[test]
fn test_tooltips_carry_absolute_time() {
    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();

    refresh(&mut doc, &mut tooltips, now(), &RefreshOptions::default());

    let tip = tooltips.get("note-2-time").expect("tooltip attached");
    assert_eq!(tip.placement, Placement::Top);
    assert_eq!(tip.title, "Thu, 2024-01-11 08:15:00");

    let ids: Vec<_> = tooltips
        .tooltips()
        .iter()
        .map(|t| t.element_id.as_str())
        .collect();
    assert_eq!(ids, vec!["note-1-time", "note-2-time", "note-3-time"]);

    for id in ["note-1-time", "note-2-time", "note-3-time", "note-7-time"] {
        let el = doc.get(id).unwrap();
        assert_eq!(el.attr("data-bs-toggle"), Some(TRIGGER_VALUE), "{}", id);
        assert_eq!(el.tooltip_state(), TooltipState::Attached, "{}", id);
    }
}

#[test]
fn test_terminal_and_invalid_elements_lose_marker() {
    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();

    refresh(&mut doc, &mut tooltips, now(), &RefreshOptions::default());

    let expired = doc.get("note-4-time").unwrap();
    assert!(!expired.has_attr("iso"));
    assert!(!expired.has_attr("data-bs-toggle"));
    assert!(tooltips.get("note-4-time").is_none());

    let invalid = doc.get("note-5-time").unwrap();
    assert!(!invalid.has_attr("iso"));
    assert!(!invalid.has_attr("data-bs-toggle"));
    assert_eq!(invalid.tooltip_state(), TooltipState::Detached);
    assert!(tooltips.get("note-5-time").is_none());
}

// ============================================
// Repeated Passes
// ============================================

#[test]
fn test_repeated_pass_is_idempotent() {
    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();
    let options = RefreshOptions::default();

    refresh(&mut doc, &mut tooltips, now(), &options);
    let after_first = doc.clone();
    let second = refresh(&mut doc, &mut tooltips, now(), &options);

    assert_eq!(doc, after_first);
    assert_eq!(second.tooltips_attached, 0);
    assert_eq!(second.terminalized, 0);
    assert_eq!(second.invalidated, 0);
    assert_eq!(second.transitions(), 0);
}

#[test]
fn test_labels_advance_with_time() {
    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();
    let options = RefreshOptions::default();

    refresh(&mut doc, &mut tooltips, now(), &options);
    refresh(
        &mut doc,
        &mut tooltips,
        now() + Duration::minutes(90),
        &options,
    );

    assert_eq!(text(&doc, "note-1-time"), "1hr 30min ago");
    assert_eq!(text(&doc, "note-2-time"), "2hr 45min ago");
    assert_eq!(text(&doc, "note-3-time"), "2d 4hr ago");
    // Terminal text does not move
    assert_eq!(text(&doc, "note-4-time"), "Mon, 2024-01-01 09:30:00");
}

#[test]
fn test_week_rollover_terminalizes_remaining() {
    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();
    let options = RefreshOptions::default();

    refresh(&mut doc, &mut tooltips, now(), &options);
    let report = refresh(&mut doc, &mut tooltips, now() + Duration::days(7), &options);

    assert_eq!(report.terminalized, 4);
    assert_eq!(report.relabeled, 0);
    assert!(tooltips.is_empty());
    assert_eq!(text(&doc, "note-1-time"), "Thu, 2024-01-11 09:30:00");
    assert_eq!(text(&doc, "note-3-time"), "Tue, 2024-01-09 06:30:00");

    let none_marked = doc.elements().iter().all(|e| !e.has_attr("iso"));
    assert!(none_marked);
}

#[test]
fn test_injected_elements_picked_up() {
    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();
    let options = RefreshOptions::default();

    refresh(&mut doc, &mut tooltips, now(), &options);

    doc.push(Element::new("note-8-time").with_attr("iso", "2024-01-11T09:25:00Z"));
    let report = refresh(&mut doc, &mut tooltips, now(), &options);

    assert_eq!(text(&doc, "note-8-time"), "5min ago");
    assert_eq!(report.tooltips_attached, 1);
    assert!(tooltips.get("note-8-time").is_some());
}

#[test]
fn test_document_round_trips_through_disk() {
    let mut doc = load_page();
    let mut tooltips = TooltipRegistry::new();
    refresh(&mut doc, &mut tooltips, now(), &RefreshOptions::default());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.json");
    doc.save(&path).unwrap();

    let reloaded = Document::load(&path).unwrap();
    assert_eq!(reloaded, doc);
}
