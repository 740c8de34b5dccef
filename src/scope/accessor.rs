//! Scope membership accessor
//!
//! Reads and writes a scope's two ordered sequences (`active`, `buried`)
//! through the host's scope storage, and builds the filtered lists everything
//! else works from.

use std::collections::HashSet;

use crate::filter::Matcher;
use crate::host::{Host, ItemId, ScopeId};

/// Which parts of a scope's membership a computed list covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    pub include_buried: bool,
    pub include_hidden: bool,
}

impl ListOptions {
    pub fn new(include_buried: bool, include_hidden: bool) -> Self {
        Self {
            include_buried,
            include_hidden,
        }
    }

    /// Everything the scope captures, buried and hidden items included
    pub fn everything() -> Self {
        Self::new(true, true)
    }
}

/// Stable de-duplication keeping the first occurrence
pub fn dedup(items: impl IntoIterator<Item = ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(*item)).collect()
}

/// Raw `active` sequence, live or not
pub fn active<H: Host + ?Sized>(host: &H, scope: ScopeId) -> Vec<ItemId> {
    host.active(scope)
}

/// Raw `buried` sequence, live or not
pub fn buried<H: Host + ?Sized>(host: &H, scope: ScopeId) -> Vec<ItemId> {
    host.buried(scope)
}

/// Replace `active`. Duplicates are collapsed to their first occurrence.
pub fn set_active<H: Host + ?Sized>(host: &mut H, scope: ScopeId, items: Vec<ItemId>) {
    host.set_active(scope, dedup(items));
}

/// Replace `buried`. Duplicates are collapsed to their first occurrence.
pub fn set_buried<H: Host + ?Sized>(host: &mut H, scope: ScopeId, items: Vec<ItemId>) {
    host.set_buried(scope, dedup(items));
}

/// Remove an item from both sequences. Returns whether it was present.
pub fn remove_item<H: Host + ?Sized>(host: &mut H, scope: ScopeId, item: ItemId) -> bool {
    let mut active = host.active(scope);
    let mut buried = host.buried(scope);
    let before = active.len() + buried.len();
    active.retain(|i| *i != item);
    buried.retain(|i| *i != item);
    if active.len() + buried.len() == before {
        return false;
    }
    host.set_active(scope, active);
    host.set_buried(scope, buried);
    true
}

/// Append a live item to `active` unless the scope already captures it.
/// Returns whether the scope changed.
pub fn add_item<H: Host + ?Sized>(host: &mut H, scope: ScopeId, item: ItemId) -> bool {
    if !host.is_live(item) {
        return false;
    }
    let mut active = host.active(scope);
    if active.contains(&item) || host.buried(scope).contains(&item) {
        return false;
    }
    active.push(item);
    host.set_active(scope, active);
    true
}

/// Record that an item is shown in the scope: it moves to the front of
/// `active` and leaves `buried`.
pub fn touch_item<H: Host + ?Sized>(host: &mut H, scope: ScopeId, item: ItemId) {
    let active = host.active(scope);
    let mut buried = host.buried(scope);
    let was_buried = buried.len();
    buried.retain(|i| *i != item);
    if active.first() == Some(&item) && buried.len() == was_buried {
        return;
    }
    let mut front = Vec::with_capacity(active.len() + 1);
    front.push(item);
    front.extend(active.into_iter().filter(|i| *i != item));
    host.set_active(scope, front);
    host.set_buried(scope, buried);
}

/// Build the ordered list for a scope.
///
/// `active` first, then `buried` if requested, each in its stored order.
/// Dead items are always dropped; items matching `hidden` are dropped unless
/// `include_hidden` is set. No item appears twice.
pub fn compute_list<H: Host + ?Sized>(
    host: &H,
    scope: ScopeId,
    hidden: &Matcher,
    options: ListOptions,
) -> Vec<ItemId> {
    let mut raw = host.active(scope);
    if options.include_buried {
        raw.extend(host.buried(scope));
    }
    dedup(raw)
        .into_iter()
        .filter(|item| match host.name(*item) {
            None => false,
            Some(name) => options.include_hidden || !hidden.is_match(&name),
        })
        .collect()
}

/// Every live item the scope captures (active then buried, unfiltered)
pub fn raw<H: Host + ?Sized>(host: &H, scope: ScopeId) -> Vec<ItemId> {
    compute_list(host, scope, &Matcher::never(), ListOptions::everything())
}
