use tracing::debug;

use super::ScopeEngine;
use crate::host::{Host, ItemId, ScopeId};
use crate::scope::{accessor, dedup};

impl ScopeEngine {
    /// Apply the include/exclude filters to a freshly created scope.
    ///
    /// Excluded items are dropped from the scope's current list, then every
    /// live item in the host matching the include filter is appended, so an
    /// include match always wins. The focused item is forced to the front:
    /// the host treats an empty `active` sequence as "not customized yet" and
    /// would overwrite it. `buried` is cleared.
    ///
    /// Duplicated scopes must not go through this; they inherit their
    /// parent's membership as is.
    pub fn apply_filters<H: Host + ?Sized>(&self, host: &mut H, scope: ScopeId) -> Vec<ItemId> {
        let current = self.compute_list(&*host, scope, true);
        let before = current.len();

        let survivors = current.into_iter().filter(|item| {
            host.name(*item)
                .is_some_and(|name| !self.filters.exclude.is_match(&name))
        });

        let included: Vec<ItemId> = if self.filters.include.is_empty() {
            Vec::new()
        } else {
            host.items()
                .into_iter()
                .filter(|item| {
                    host.name(*item)
                        .is_some_and(|name| self.filters.include.is_match(&name))
                })
                .collect()
        };

        let focused = host.focused_item(scope);
        let active = dedup(focused.into_iter().chain(survivors).chain(included));

        debug!(
            scope = %scope,
            before,
            after = active.len(),
            "Applied scope filters"
        );

        accessor::set_active(host, scope, active.clone());
        accessor::set_buried(host, scope, Vec::new());
        active
    }
}
