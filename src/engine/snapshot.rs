//! Snapshot codec
//!
//! A scope's membership travels inside the host's window state as an ordered
//! list of item names under [`SNAPSHOT_KEY`]. Names rather than handles are
//! stored so the state survives persistence. The active/buried split is not
//! recorded: a restore puts everything into `active`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::ScopeEngine;
use crate::host::{Host, ItemHost, ItemId, ScopeId, WindowState};
use crate::scope::{accessor, dedup, CallContext, Phase};

/// Reserved window-state key holding the membership names
pub const SNAPSHOT_KEY: &str = "bufscope-items";

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Malformed snapshot entry: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Ordered item names captured from a scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    names: Vec<String>,
}

impl Snapshot {
    pub fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Write into the reserved key, leaving every other entry untouched
    pub fn embed(&self, state: &mut WindowState) {
        let names = self
            .names
            .iter()
            .cloned()
            .map(serde_json::Value::String)
            .collect();
        state.insert(SNAPSHOT_KEY.to_string(), serde_json::Value::Array(names));
    }

    /// Read the reserved key. A missing or malformed entry reads as absent.
    pub fn extract(state: &WindowState) -> Option<Self> {
        match Self::try_extract(state) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(error = %e, "Ignoring malformed snapshot entry");
                None
            }
        }
    }

    pub fn try_extract(state: &WindowState) -> Result<Option<Self>, SnapshotError> {
        state
            .get(SNAPSHOT_KEY)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(SnapshotError::from)
    }

    /// Resolve names to live items, dropping unknown names and duplicates
    pub fn resolve<H: ItemHost + ?Sized>(&self, host: &H) -> Vec<ItemId> {
        dedup(self.names.iter().filter_map(|name| host.lookup_by_name(name)))
    }
}

/// What a restore request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The call context does not allow restoring into this scope
    NotPermitted,
    /// A restore is already running further up the stack
    Reentrant,
    /// The state carries no membership entry
    NoSnapshot,
    Restored {
        active: Vec<ItemId>,
        /// Recorded names with no live item
        dropped: usize,
    },
}

impl ScopeEngine {
    /// Capture a scope's membership: live names of `active` then `buried`,
    /// independent of the buried-inclusion setting.
    pub fn capture_snapshot<H: Host + ?Sized>(&self, host: &H, scope: ScopeId) -> Snapshot {
        let names = accessor::raw(host, scope)
            .into_iter()
            .filter_map(|item| host.name(item))
            .collect();
        Snapshot::from_names(names)
    }

    /// The host's window state for `scope` with the membership embedded
    pub fn capture_state<H: Host + ?Sized>(
        &self,
        host: &H,
        ctx: &CallContext,
        scope: ScopeId,
    ) -> WindowState {
        self.embed_into(host, ctx, scope, host.window_state(scope))
    }

    /// Embed `scope`'s membership into a state the host already produced.
    ///
    /// Skipped while another capture is running in the same call.
    pub fn embed_into<H: Host + ?Sized>(
        &self,
        host: &H,
        ctx: &CallContext,
        scope: ScopeId,
        mut state: WindowState,
    ) -> WindowState {
        let Some(_guard) = ctx.enter(Phase::Capturing) else {
            debug!(scope = %scope, "Nested capture; leaving state as is");
            return state;
        };
        let snapshot = self.capture_snapshot(host, scope);
        debug!(scope = %scope, count = snapshot.names().len(), "Captured scope membership");
        snapshot.embed(&mut state);
        state
    }

    /// Apply the membership stored in `state` to `target`.
    ///
    /// `active` becomes the focused item followed by every resolvable name
    /// and `buried` holds only the focused item. Only runs when the call
    /// context enables restores; scopes the host does not yet consider live
    /// additionally need the forced mode.
    pub fn restore_state<H: Host + ?Sized>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        state: &WindowState,
        target: ScopeId,
        focused: Option<ItemId>,
    ) -> RestoreOutcome {
        if !ctx.allows_restore(host.is_scope_live(target)) {
            debug!(scope = %target, mode = ?ctx.restore_mode(), "Restore not permitted");
            return RestoreOutcome::NotPermitted;
        }
        let Some(_guard) = ctx.enter(Phase::Restoring) else {
            return RestoreOutcome::Reentrant;
        };
        let Some(snapshot) = Snapshot::extract(state) else {
            return RestoreOutcome::NoSnapshot;
        };

        let resolved = snapshot.resolve(&*host);
        let dropped = snapshot
            .names()
            .iter()
            .filter(|name| host.lookup_by_name(name).is_none())
            .count();
        let active = dedup(focused.into_iter().chain(resolved));

        accessor::set_active(host, target, active.clone());
        accessor::set_buried(host, target, focused.into_iter().collect());

        debug!(
            scope = %target,
            count = active.len(),
            dropped,
            "Restored scope membership"
        );
        RestoreOutcome::Restored { active, dropped }
    }
}
