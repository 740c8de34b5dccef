use std::collections::HashSet;

use super::{ScopeEngine, Snapshot};
use crate::host::{Host, ItemId, ScopeId};
use crate::scope::accessor;

impl ScopeEngine {
    /// Items captured by any scope other than `excluding`.
    ///
    /// Buried items always count, whatever the buried-inclusion setting.
    /// Dormant scopes count through the membership stored in their window
    /// state.
    pub fn captured<H: Host + ?Sized>(
        &self,
        host: &H,
        excluding: Option<ScopeId>,
    ) -> HashSet<ItemId> {
        let mut captured: HashSet<ItemId> = host
            .scopes()
            .into_iter()
            .filter(|scope| Some(*scope) != excluding)
            .flat_map(|scope| accessor::raw(host, scope))
            .collect();

        for (scope, state) in host.dormant_states() {
            if Some(scope) == excluding {
                continue;
            }
            if let Some(snapshot) = Snapshot::extract(&state) {
                captured.extend(snapshot.resolve(host));
            }
        }

        captured
    }

    /// Live items no scope captures, in the host's global order
    pub fn orphans<H: Host + ?Sized>(&self, host: &H) -> Vec<ItemId> {
        let captured = self.captured(host, None);
        host.items()
            .into_iter()
            .filter(|item| !captured.contains(item))
            .collect()
    }

    /// Items of `scope` no other scope captures.
    ///
    /// With `invert`, the items of `scope` that some other scope also
    /// captures. The two results partition the scope's raw list.
    pub fn exclusive<H: Host + ?Sized>(
        &self,
        host: &H,
        scope: ScopeId,
        invert: bool,
    ) -> Vec<ItemId> {
        let elsewhere = self.captured(host, Some(scope));
        accessor::raw(host, scope)
            .into_iter()
            .filter(|item| elsewhere.contains(item) == invert)
            .collect()
    }

    /// Every scope, activated or dormant, that captures `item`
    pub fn scopes_capturing<H: Host + ?Sized>(&self, host: &H, item: ItemId) -> Vec<ScopeId> {
        let mut scopes: Vec<ScopeId> = host
            .scopes()
            .into_iter()
            .filter(|scope| accessor::raw(host, *scope).contains(&item))
            .collect();

        scopes.extend(
            host.dormant_states()
                .into_iter()
                .filter(|(_, state)| {
                    Snapshot::extract(state).is_some_and(|s| s.resolve(host).contains(&item))
                })
                .map(|(scope, _)| scope),
        );

        scopes
    }
}
