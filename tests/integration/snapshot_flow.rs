//! Integration tests for window-state capture and restore
//!
//! Covers persistence round-trips, restore permissions, and dormant tabs
//! that only exist as stored window state.

use serde_json::json;

use super::common::fixtures::{item, names, scope_with};
use bufscope::engine::SNAPSHOT_KEY;
use bufscope::host::WindowState;
use bufscope::{
    CallContext, EventOutcome, ItemHost, MemoryHost, RestoreMode, RestoreOutcome, ScopeEngine,
    ScopeEvent, ScopeHost, ScopeId, Settings, Snapshot,
};

fn layout() -> WindowState {
    let mut state = WindowState::new();
    state.insert("arrangement".into(), json!({"split": "row"}));
    state
}

#[test]
fn test_capture_embeds_membership_next_to_host_state() {
    let mut host = MemoryHost::new();
    let s = scope_with(&mut host, ScopeId::new(0, 0), &["A", "B"], &["C"]);
    host.set_layout(s, layout());
    let b = item(&mut host, "B");
    host.destroy(b);

    let state = ScopeEngine::default().capture_state(&host, &CallContext::new(), s);

    insta::assert_json_snapshot!(state, @r###"
    {
      "arrangement": {
        "split": "row"
      },
      "bufscope-items": [
        "A",
        "C"
      ]
    }
    "###);
}

#[test]
fn test_round_trip_into_empty_scope() {
    let mut host = MemoryHost::new();
    let source = scope_with(&mut host, ScopeId::new(0, 0), &["A", "B", "A"], &["C", "B"]);
    let focused = item(&mut host, "F");
    let engine = ScopeEngine::new(Settings {
        include_buried: false,
        ..Settings::default()
    });

    let state = engine.capture_state(&host, &CallContext::new(), source);

    let target = host.add_scope(ScopeId::new(1, 0));
    let ctx = CallContext::with_restore(RestoreMode::Enabled);
    let outcome = engine.restore_state(&mut host, &ctx, &state, target, Some(focused));

    assert!(matches!(outcome, RestoreOutcome::Restored { dropped: 0, .. }));
    assert_eq!(names(&host, &host.active(target)), vec!["F", "A", "B", "C"]);
    assert_eq!(host.buried(target), vec![focused]);
}

#[test]
fn test_restore_collapses_buried_into_active() {
    let mut host = MemoryHost::new();
    let source = scope_with(&mut host, ScopeId::new(0, 0), &["A"], &["B"]);
    let engine = ScopeEngine::default();
    let state = engine.capture_state(&host, &CallContext::new(), source);

    let target = host.add_scope(ScopeId::new(0, 1));
    let ctx = CallContext::with_restore(RestoreMode::Enabled);
    engine.restore_state(&mut host, &ctx, &state, target, None);

    assert_eq!(names(&host, &host.active(target)), vec!["A", "B"]);
    assert!(host.buried(target).is_empty());
}

#[test]
fn test_restore_skips_items_destroyed_since_capture() {
    let mut host = MemoryHost::new();
    let source = scope_with(&mut host, ScopeId::new(0, 0), &["A", "B", "C"], &[]);
    let engine = ScopeEngine::default();
    let state = engine.capture_state(&host, &CallContext::new(), source);

    let b = item(&mut host, "B");
    host.destroy(b);

    let target = host.add_scope(ScopeId::new(0, 1));
    let ctx = CallContext::with_restore(RestoreMode::Enabled);
    let outcome = engine.restore_state(&mut host, &ctx, &state, target, None);

    assert!(matches!(outcome, RestoreOutcome::Restored { dropped: 1, .. }));
    assert_eq!(names(&host, &host.active(target)), vec!["A", "C"]);
}

#[test]
fn test_restore_event_ignored_during_unrelated_window_operations() {
    let mut host = MemoryHost::new();
    let source = scope_with(&mut host, ScopeId::new(0, 0), &["A"], &[]);
    let target = scope_with(&mut host, ScopeId::new(0, 1), &["Z"], &[]);
    let mut engine = ScopeEngine::default();
    let state = engine.capture_state(&host, &CallContext::new(), source);

    let outcome = engine.dispatch(
        &mut host,
        &CallContext::new(),
        ScopeEvent::StateRestored {
            scope: target,
            state,
            focused: None,
        },
    );

    assert_eq!(
        outcome,
        EventOutcome::Restored(RestoreOutcome::NotPermitted)
    );
    assert_eq!(names(&host, &host.active(target)), vec!["Z"]);
}

#[test]
fn test_persisted_state_survives_serialization() {
    let mut host = MemoryHost::new();
    let source = scope_with(&mut host, ScopeId::new(0, 0), &["A", "B"], &[]);
    host.set_layout(source, layout());
    let engine = ScopeEngine::default();

    let state = engine.capture_state(&host, &CallContext::new(), source);
    let persisted = serde_json::to_string(&state).unwrap();
    let reloaded: WindowState = serde_json::from_str(&persisted).unwrap();

    assert_eq!(reloaded.get("arrangement"), state.get("arrangement"));
    assert_eq!(
        Snapshot::extract(&reloaded).unwrap().names(),
        &["A".to_string(), "B".to_string()]
    );
    assert!(reloaded.contains_key(SNAPSHOT_KEY));
}

#[test]
fn test_dormant_tab_counts_as_capture_until_activated() {
    let mut host = MemoryHost::new();
    let s1 = scope_with(&mut host, ScopeId::new(0, 0), &["A"], &[]);
    let a = item(&mut host, "A");
    let b = item(&mut host, "B");
    let mut engine = ScopeEngine::new(Settings::default());
    assert_eq!(engine.orphans(&host), vec![b]);

    // A tab created in the background: its membership only lives in the state
    let tab = ScopeId::new(0, 1);
    let mut state = layout();
    Snapshot::from_names(vec!["B".into()]).embed(&mut state);
    host.add_dormant(tab, state);
    assert!(engine.orphans(&host).is_empty());
    assert_eq!(engine.exclusive(&host, s1, false), vec![a]);

    // Switching to the tab activates it and consumes its stored state
    let outcome = engine.dispatch(
        &mut host,
        &CallContext::new(),
        ScopeEvent::AboutToSwitch {
            from: Some(s1),
            to: tab,
        },
    );
    assert!(matches!(
        outcome,
        EventOutcome::Switched {
            restored: Some(RestoreOutcome::Restored { .. })
        }
    ));
    host.set_current(tab);

    assert_eq!(host.active(tab), vec![b]);
    assert!(host.dormant_states().is_empty());
    assert!(engine.orphans(&host).is_empty());
    assert!(host.is_live(b));
}
