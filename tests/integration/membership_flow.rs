//! Integration tests for scope membership and set algebra
//!
//! Walks scopes through creation, host events, and the destructive
//! operations, checking the captured/orphan/exclusive accounting as it goes.

use std::collections::HashSet;

use super::common::fixtures::{item, names, overlapping_pair, scope_with};
use bufscope::{
    CallContext, EventOutcome, ItemHost, ListOptions, MemoryHost, ScopeEngine, ScopeEvent,
    ScopeHost, ScopeId, ScopeOrigin, Settings,
};

#[test]
fn test_hidden_item_dropped_from_list() {
    let mut host = MemoryHost::new();
    let s = scope_with(&mut host, ScopeId::new(0, 0), &["A", "B"], &["C"]);
    let engine = ScopeEngine::new(Settings {
        hidden: vec!["^B$".into()],
        ..Settings::default()
    });

    let list = engine.compute_list_with(&host, s, ListOptions::new(true, false));

    assert_eq!(names(&host, &list), vec!["A", "C"]);
}

#[test]
fn test_captured_and_exclusive_for_overlapping_scopes() {
    let (mut host, s1, _s2) = overlapping_pair();
    let engine = ScopeEngine::default();
    let b = item(&mut host, "B");
    let c = item(&mut host, "C");
    let a = item(&mut host, "A");

    assert_eq!(engine.captured(&host, Some(s1)), HashSet::from([b, c]));
    assert_eq!(engine.exclusive(&host, s1, false), vec![a]);
    assert_eq!(engine.exclusive(&host, s1, true), vec![b]);
}

#[test]
fn test_kill_exclusive_destroys_only_exclusive_item() {
    let (mut host, s1, s2) = overlapping_pair();
    let engine = ScopeEngine::default();
    let a = item(&mut host, "A");
    let b = item(&mut host, "B");

    let killed = engine.kill_exclusive(&mut host, s1, false);

    assert_eq!(killed, vec![a]);
    assert!(!host.is_live(a));
    assert!(host.is_live(b));
    assert_eq!(names(&host, &engine.compute_list(&host, s1, false)), vec!["B"]);
    assert_eq!(
        names(&host, &engine.compute_list(&host, s2, false)),
        vec!["B", "C"]
    );
}

#[test]
fn test_item_removed_from_only_scope_becomes_orphan() {
    let (mut host, s1, _s2) = overlapping_pair();
    let engine = ScopeEngine::default();
    let a = item(&mut host, "A");
    assert!(engine.orphans(&host).is_empty());

    engine.remove(&mut host, s1, a);

    assert_eq!(engine.orphans(&host), vec![a]);
    let killed = engine.kill_orphans(&mut host);
    assert_eq!(killed, vec![a]);
    assert!(engine.orphans(&host).is_empty());
}

#[test]
fn test_bury_moves_item_out_of_scope_but_keeps_it_live() {
    let (mut host, s1, _s2) = overlapping_pair();
    let engine = ScopeEngine::default();
    let b = item(&mut host, "B");

    assert!(engine.bury(&mut host, s1, b));

    assert!(host.is_live(b));
    assert!(!engine.compute_list(&host, s1, true).contains(&b));
    assert!(engine.exclusive(&host, s1, true).is_empty());
}

#[test]
fn test_new_scope_lifecycle_with_filters() {
    let mut host = MemoryHost::new();
    let main = scope_with(
        &mut host,
        ScopeId::new(0, 0),
        &["main.rs", "server.log", "*shell*"],
        &["notes.md"],
    );
    let shell = item(&mut host, "*shell*");
    let main_rs = item(&mut host, "main.rs");
    host.set_focused(main, main_rs);

    let mut engine = ScopeEngine::new(Settings {
        include: vec![r"^\*shell\*$".into()],
        exclude: vec![r"\.log$".into(), r"^\*".into()],
        ..Settings::default()
    });
    let ctx = CallContext::new();

    // A fresh tab starts from a copy of the current membership
    let fresh = ScopeId::new(0, 1);
    host.add_scope(fresh);
    host.set_active(fresh, host.active(main));
    host.set_buried(fresh, host.buried(main));
    host.set_focused(fresh, main_rs);
    let outcome = engine.dispatch(
        &mut host,
        &ctx,
        ScopeEvent::Created {
            scope: fresh,
            origin: ScopeOrigin::Fresh,
        },
    );

    let EventOutcome::Filtered(active) = outcome else {
        panic!("expected Filtered, got {:?}", outcome);
    };
    assert_eq!(names(&host, &active), vec!["main.rs", "*shell*"]);
    assert!(host.buried(fresh).is_empty());

    // A duplicate keeps everything, filters notwithstanding
    let dup = ScopeId::new(0, 2);
    engine.dispatch(
        &mut host,
        &ctx,
        ScopeEvent::Created {
            scope: dup,
            origin: ScopeOrigin::Duplicated { parent: main },
        },
    );
    assert_eq!(host.active(dup), host.active(main));
    assert_eq!(names(&host, &host.buried(dup)), vec!["notes.md"]);

    // Displaying an item pulls it to the front of the scope
    engine.dispatch(
        &mut host,
        &ctx,
        ScopeEvent::ItemDisplayed {
            scope: fresh,
            item: shell,
        },
    );
    assert_eq!(host.active(fresh).first(), Some(&shell));
}

#[test]
fn test_closing_scope_promotes_members_to_orphans() {
    let (mut host, _s1, s2) = overlapping_pair();
    let engine = ScopeEngine::default();
    let c = item(&mut host, "C");

    host.close_scope(s2);

    assert_eq!(engine.orphans(&host), vec![c]);
    assert_eq!(engine.scopes_capturing(&host, c), Vec::<ScopeId>::new());
}

#[test]
fn test_isolate_by_project_keeps_project_and_included_items() {
    let mut host = MemoryHost::new();
    let s = host.add_scope(ScopeId::new(0, 0));
    host.set_project(s, "alpha");
    let lib = host.add_file_item(
        "lib.rs",
        std::path::Path::new("/src/alpha/lib.rs"),
        Some("alpha"),
    );
    let other = host.add_file_item(
        "other.rs",
        std::path::Path::new("/src/beta/other.rs"),
        Some("beta"),
    );
    let scratch = host.add_item("*scratch*");
    host.set_active(s, vec![lib, other, scratch]);
    host.set_focused(s, other);

    let engine = ScopeEngine::new(Settings {
        include: vec![r"^\*scratch\*$".into()],
        ..Settings::default()
    });
    engine.isolate_by_project(&mut host, s, false);

    assert_eq!(host.active(s), vec![lib, scratch]);
    assert_eq!(host.focused_item(s), Some(lib));
}
