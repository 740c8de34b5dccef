use tracing::{debug, info};

use super::ScopeEngine;
use crate::filter::Matcher;
use crate::host::{Host, ItemId, ProjectId, ScopeId};
use crate::scope::accessor;

/// Result of [`ScopeEngine::isolate_by_project`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsolateOutcome {
    /// The scope has no current project; nothing was touched
    NoProject,
    Isolated {
        project: ProjectId,
        removed: Vec<ItemId>,
    },
}

impl ScopeEngine {
    /// Reset a scope to just its focused item
    pub fn clear<H: Host + ?Sized>(&self, host: &mut H, scope: ScopeId) {
        let focused = host.focused_item(scope);
        accessor::set_active(host, scope, focused.into_iter().collect());
        accessor::set_buried(host, scope, Vec::new());
        debug!(scope = %scope, "Cleared scope");
    }

    /// Capture a live item in a scope without displaying it
    pub fn add<H: Host + ?Sized>(&self, host: &mut H, scope: ScopeId, item: ItemId) -> bool {
        accessor::add_item(host, scope, item)
    }

    /// Record that `item` is now shown in the scope's focused window
    pub fn touch<H: Host + ?Sized>(&self, host: &mut H, scope: ScopeId, item: ItemId) {
        if host.is_live(item) {
            accessor::touch_item(host, scope, item);
        }
    }

    /// Drop an item from a scope. If the scope's focused window shows it, the
    /// host is asked to switch that window to something else, and whatever it
    /// shows next is moved to the front of `active`.
    pub fn remove<H: Host + ?Sized>(&self, host: &mut H, scope: ScopeId, item: ItemId) -> bool {
        let removed = accessor::remove_item(host, scope, item);
        if host.focused_item(scope) == Some(item) {
            host.switch_away_from(scope, item);
            if let Some(next) = host.focused_item(scope).filter(|next| *next != item) {
                accessor::touch_item(host, scope, next);
            }
        }
        if removed {
            debug!(scope = %scope, item = %item, "Removed item from scope");
        }
        removed
    }

    /// Remove every item the scope shares with another scope
    pub fn remove_non_exclusive<H: Host + ?Sized>(
        &self,
        host: &mut H,
        scope: ScopeId,
    ) -> Vec<ItemId> {
        let shared = self.exclusive(&*host, scope, true);
        for item in &shared {
            self.remove(host, scope, *item);
        }
        shared
    }

    /// Deprioritize an item globally and drop it from this scope. The item
    /// stays live.
    pub fn bury<H: Host + ?Sized>(&self, host: &mut H, scope: ScopeId, item: ItemId) -> bool {
        host.bury(item);
        self.remove(host, scope, item)
    }

    /// Destroy the scope's exclusive items, or all of its items with
    /// `kill_all`. Items matching the kill-exclude filter survive.
    pub fn kill_exclusive<H: Host + ?Sized>(
        &self,
        host: &mut H,
        scope: ScopeId,
        kill_all: bool,
    ) -> Vec<ItemId> {
        let candidates = if kill_all {
            accessor::raw(&*host, scope)
        } else {
            self.exclusive(&*host, scope, false)
        };
        let killed = destroy_unprotected(host, candidates, &self.filters.kill_exclude);
        info!(scope = %scope, kill_all, count = killed.len(), "Killed scope items");
        killed
    }

    /// Destroy every orphan not matching the kill-exclude filter
    pub fn kill_orphans<H: Host + ?Sized>(&self, host: &mut H) -> Vec<ItemId> {
        let orphans = self.orphans(&*host);
        let killed = destroy_unprotected(host, orphans, &self.filters.kill_exclude);
        info!(count = killed.len(), "Killed orphan items");
        killed
    }

    /// Remove items that belong to another project than the scope's current
    /// one. Included items are kept. With `file_only`, only items without an
    /// associated file are removed.
    pub fn isolate_by_project<H: Host + ?Sized>(
        &self,
        host: &mut H,
        scope: ScopeId,
        file_only: bool,
    ) -> IsolateOutcome {
        let Some(project) = host.current_project(scope) else {
            info!(scope = %scope, "No current project; nothing to isolate");
            return IsolateOutcome::NoProject;
        };

        let foreign: Vec<ItemId> = self
            .compute_list(&*host, scope, false)
            .into_iter()
            .filter(|item| {
                let Some(name) = host.name(*item) else {
                    return false;
                };
                !self.filters.include.is_match(&name)
                    && host.project_id(*item).as_ref() != Some(&project)
                    && (!file_only || host.file_path(*item).is_none())
            })
            .collect();

        for item in &foreign {
            self.remove(host, scope, *item);
        }

        info!(
            scope = %scope,
            project = %project,
            count = foreign.len(),
            "Isolated scope to project"
        );
        IsolateOutcome::Isolated {
            project,
            removed: foreign,
        }
    }
}

fn destroy_unprotected<H: Host + ?Sized>(
    host: &mut H,
    candidates: Vec<ItemId>,
    protected: &Matcher,
) -> Vec<ItemId> {
    let mut killed = Vec::new();
    for item in candidates {
        let Some(name) = host.name(item) else {
            continue;
        };
        if protected.is_match(&name) {
            debug!(item = %name, "Kept protected item");
            continue;
        }
        host.destroy(item);
        killed.push(item);
    }
    killed
}
