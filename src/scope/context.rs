//! Per-call context
//!
//! Capture, restore and the switch-time clearing step can trigger each
//! other through host callbacks. A [`CallContext`] lives for exactly one
//! top-level host call and records which of those phases are in progress, so
//! a nested trigger is recognized and skipped. Nothing here outlives the call.

use std::cell::Cell;

/// Whether window-state restores may touch scope membership during this call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreMode {
    /// Restores are ignored (unrelated host window operations)
    #[default]
    Disabled,
    /// Restores apply to scopes the host reports as live
    Enabled,
    /// Restores also apply to scopes that are not yet fully live
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capturing,
    Restoring,
    Clearing,
}

impl Phase {
    fn index(self) -> usize {
        match self {
            Phase::Capturing => 0,
            Phase::Restoring => 1,
            Phase::Clearing => 2,
        }
    }
}

#[derive(Debug, Default)]
pub struct CallContext {
    restore: Cell<RestoreMode>,
    active: [Cell<bool>; 3],
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restore(restore: RestoreMode) -> Self {
        Self {
            restore: Cell::new(restore),
            ..Self::default()
        }
    }

    pub fn restore_mode(&self) -> RestoreMode {
        self.restore.get()
    }

    /// Use `mode` for restores until the returned guard drops. Phase flags
    /// are shared with the rest of the call.
    pub fn raise_restore(&self, mode: RestoreMode) -> RestoreModeGuard<'_> {
        let previous = self.restore.replace(mode);
        RestoreModeGuard {
            mode: &self.restore,
            previous,
        }
    }

    /// Whether a restore into a scope with the given liveness may proceed
    pub fn allows_restore(&self, target_live: bool) -> bool {
        match self.restore.get() {
            RestoreMode::Disabled => false,
            RestoreMode::Enabled => target_live,
            RestoreMode::Forced => true,
        }
    }

    pub fn is_active(&self, phase: Phase) -> bool {
        self.active[phase.index()].get()
    }

    /// Mark a phase as running until the returned guard drops.
    ///
    /// Returns `None` when the phase is already running further up the stack.
    pub fn enter(&self, phase: Phase) -> Option<PhaseGuard<'_>> {
        let flag = &self.active[phase.index()];
        if flag.replace(true) {
            return None;
        }
        Some(PhaseGuard { flag })
    }
}

/// Clears its phase flag on every exit path
#[derive(Debug)]
pub struct PhaseGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Puts the previous restore mode back on drop
#[derive(Debug)]
pub struct RestoreModeGuard<'a> {
    mode: &'a Cell<RestoreMode>,
    previous: RestoreMode,
}

impl Drop for RestoreModeGuard<'_> {
    fn drop(&mut self) {
        self.mode.set(self.previous);
    }
}
