//! Scope membership engine
//!
//! [`ScopeEngine`] owns the compiled filters and settings and implements the
//! membership operations on top of a [`Host`]. The work is split by concern:
//!
//! - `applier`: inclusion/exclusion at scope creation
//! - `algebra`: captured, orphan and exclusive item sets
//! - `operations`: clear, remove, bury, kill, isolate
//! - `snapshot`: membership embedded in window state
//! - `events`: host lifecycle events and subscriber callbacks

mod algebra;
mod applier;
mod events;
mod operations;
mod snapshot;

pub use events::{EventKind, EventOutcome, EventRegistry, ScopeEvent, ScopeOrigin, SubscriptionId};
pub use operations::IsolateOutcome;
pub use snapshot::{RestoreOutcome, Snapshot, SnapshotError, SNAPSHOT_KEY};

use crate::config::Settings;
use crate::filter::Filters;
use crate::host::{Host, ItemId, ScopeId};
use crate::scope::{accessor, ListOptions};

#[derive(Debug)]
pub struct ScopeEngine {
    settings: Settings,
    filters: Filters,
    events: EventRegistry,
}

impl Default for ScopeEngine {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl ScopeEngine {
    pub fn new(settings: Settings) -> Self {
        let filters = Filters::from_settings(&settings);
        Self {
            settings,
            filters,
            events: EventRegistry::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Swap in new settings, recompiling the filters once
    pub fn reconfigure(&mut self, settings: Settings) {
        self.filters = Filters::from_settings(&settings);
        self.settings = settings;
    }

    pub fn events(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    /// List options following the buried-inclusion setting
    pub fn list_options(&self, include_hidden: bool) -> ListOptions {
        ListOptions::new(self.settings.include_buried, include_hidden)
    }

    /// A scope's list under the configured buried-inclusion toggle
    pub fn compute_list<H: Host + ?Sized>(
        &self,
        host: &H,
        scope: ScopeId,
        include_hidden: bool,
    ) -> Vec<ItemId> {
        self.compute_list_with(host, scope, self.list_options(include_hidden))
    }

    pub fn compute_list_with<H: Host + ?Sized>(
        &self,
        host: &H,
        scope: ScopeId,
        options: ListOptions,
    ) -> Vec<ItemId> {
        accessor::compute_list(host, scope, &self.filters.hidden, options)
    }

    /// Items to offer in a listing for the scope.
    ///
    /// With `prefer_local_items` this is the scope's own list; otherwise every
    /// live, non-hidden item in the host's global order.
    pub fn display_list<H: Host + ?Sized>(&self, host: &H, scope: ScopeId) -> Vec<ItemId> {
        if self.settings.prefer_local_items {
            return self.compute_list(host, scope, false);
        }
        host.items()
            .into_iter()
            .filter(|item| {
                host.name(*item)
                    .is_some_and(|name| !self.filters.hidden.is_match(&name))
            })
            .collect()
    }
}
