//! In-memory host
//!
//! A self-contained [`Host`](super::Host) implementation backed by plain
//! vectors. It is serializable so a whole world (items, scopes, stored window
//! states) can be loaded from and saved to JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ItemHost, ItemId, ProjectId, ScopeHost, ScopeId, WindowState};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default = "default_true")]
    pub live: bool,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    #[serde(default)]
    pub project: Option<ProjectId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryScope {
    pub id: ScopeId,
    #[serde(default)]
    pub active: Vec<ItemId>,
    #[serde(default)]
    pub buried: Vec<ItemId>,
    #[serde(default)]
    pub focused: Option<ItemId>,
    #[serde(default)]
    pub project: Option<ProjectId>,
    /// False until the scope has been shown at least once
    #[serde(default = "default_true")]
    pub live: bool,
    /// Layout part of the window state
    #[serde(default)]
    pub layout: WindowState,
}

impl MemoryScope {
    fn new(id: ScopeId, live: bool) -> Self {
        Self {
            id,
            active: Vec::new(),
            buried: Vec::new(),
            focused: None,
            project: None,
            live,
            layout: WindowState::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredState {
    pub scope: ScopeId,
    pub state: WindowState,
}

/// World state for the in-memory host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHost {
    /// Global registry in host order (dead items are kept, flagged)
    #[serde(default)]
    items: Vec<MemoryItem>,
    #[serde(default)]
    scopes: Vec<MemoryScope>,
    /// Stored window states keyed by scope; entries for scopes that are not
    /// activated are dormant tabs
    #[serde(default)]
    stored: Vec<StoredState>,
    #[serde(default)]
    current: Option<ScopeId>,
    #[serde(default)]
    next_id: u64,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new live item with no file or project
    pub fn add_item(&mut self, name: &str) -> ItemId {
        self.push_item(name, None, None)
    }

    /// Register a new live item visiting a file, optionally inside a project
    pub fn add_file_item(&mut self, name: &str, path: &Path, project: Option<&str>) -> ItemId {
        self.push_item(name, Some(path.to_path_buf()), project.map(ProjectId::from))
    }

    /// Register a new live item belonging to a project but not visiting a file
    pub fn add_project_item(&mut self, name: &str, project: &str) -> ItemId {
        self.push_item(name, None, Some(ProjectId::from(project)))
    }

    fn push_item(
        &mut self,
        name: &str,
        file_path: Option<PathBuf>,
        project: Option<ProjectId>,
    ) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(MemoryItem {
            id,
            name: name.to_string(),
            live: true,
            file_path,
            project,
        });
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&MemoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Names of the given items, skipping dead ones
    pub fn names(&self, ids: &[ItemId]) -> Vec<String> {
        ids.iter().filter_map(|id| self.name(*id)).collect()
    }

    /// Activate a live scope. The first scope added becomes current.
    pub fn add_scope(&mut self, id: ScopeId) -> ScopeId {
        match self.scope_mut(id) {
            Some(scope) => scope.live = true,
            None => self.scopes.push(MemoryScope::new(id, true)),
        }
        if self.current.is_none() {
            self.current = Some(id);
        }
        id
    }

    /// Destroy a scope. Its stored window state goes with it.
    pub fn close_scope(&mut self, id: ScopeId) {
        self.scopes.retain(|s| s.id != id);
        self.stored.retain(|s| s.scope != id);
        if self.current == Some(id) {
            self.current = self.scopes.first().map(|s| s.id);
        }
    }

    /// Register a tab that has not been shown yet, carrying only a stored state
    pub fn add_dormant(&mut self, id: ScopeId, state: WindowState) {
        self.store_window_state(id, state);
    }

    pub fn set_current(&mut self, id: ScopeId) {
        self.ensure_scope(id).live = true;
        self.current = Some(id);
    }

    pub fn set_focused(&mut self, scope: ScopeId, item: ItemId) {
        self.ensure_scope(scope).focused = Some(item);
    }

    pub fn set_project(&mut self, scope: ScopeId, project: &str) {
        self.ensure_scope(scope).project = Some(ProjectId::from(project));
    }

    pub fn set_layout(&mut self, scope: ScopeId, layout: WindowState) {
        self.ensure_scope(scope).layout = layout;
    }

    pub fn scope(&self, id: ScopeId) -> Option<&MemoryScope> {
        self.scopes.iter().find(|s| s.id == id)
    }

    fn scope_mut(&mut self, id: ScopeId) -> Option<&mut MemoryScope> {
        self.scopes.iter_mut().find(|s| s.id == id)
    }

    /// Scopes written to before being shown are created not-yet-live
    fn ensure_scope(&mut self, id: ScopeId) -> &mut MemoryScope {
        let index = match self.scopes.iter().position(|s| s.id == id) {
            Some(index) => index,
            None => {
                self.scopes.push(MemoryScope::new(id, false));
                self.scopes.len() - 1
            }
        };
        &mut self.scopes[index]
    }

    fn live_item(&self, id: ItemId) -> Option<&MemoryItem> {
        self.item(id).filter(|i| i.live)
    }
}

impl ItemHost for MemoryHost {
    fn items(&self) -> Vec<ItemId> {
        self.items.iter().filter(|i| i.live).map(|i| i.id).collect()
    }

    fn is_live(&self, item: ItemId) -> bool {
        self.live_item(item).is_some()
    }

    fn name(&self, item: ItemId) -> Option<String> {
        self.live_item(item).map(|i| i.name.clone())
    }

    fn lookup_by_name(&self, name: &str) -> Option<ItemId> {
        self.items
            .iter()
            .find(|i| i.live && i.name == name)
            .map(|i| i.id)
    }

    fn file_path(&self, item: ItemId) -> Option<PathBuf> {
        self.live_item(item).and_then(|i| i.file_path.clone())
    }

    fn project_id(&self, item: ItemId) -> Option<ProjectId> {
        self.live_item(item).and_then(|i| i.project.clone())
    }

    fn destroy(&mut self, item: ItemId) {
        if let Some(entry) = self.items.iter_mut().find(|i| i.id == item) {
            entry.live = false;
        }
        for scope in &mut self.scopes {
            if scope.focused == Some(item) {
                scope.focused = None;
            }
        }
    }

    fn bury(&mut self, item: ItemId) {
        if let Some(index) = self.items.iter().position(|i| i.id == item) {
            let entry = self.items.remove(index);
            self.items.push(entry);
        }
    }
}

impl ScopeHost for MemoryHost {
    fn scopes(&self) -> Vec<ScopeId> {
        self.scopes.iter().map(|s| s.id).collect()
    }

    fn current_scope(&self) -> Option<ScopeId> {
        self.current
    }

    fn is_scope_live(&self, scope: ScopeId) -> bool {
        self.scope(scope).is_some_and(|s| s.live)
    }

    fn active(&self, scope: ScopeId) -> Vec<ItemId> {
        self.scope(scope).map(|s| s.active.clone()).unwrap_or_default()
    }

    fn buried(&self, scope: ScopeId) -> Vec<ItemId> {
        self.scope(scope).map(|s| s.buried.clone()).unwrap_or_default()
    }

    fn set_active(&mut self, scope: ScopeId, items: Vec<ItemId>) {
        self.ensure_scope(scope).active = items;
    }

    fn set_buried(&mut self, scope: ScopeId, items: Vec<ItemId>) {
        self.ensure_scope(scope).buried = items;
    }

    fn focused_item(&self, scope: ScopeId) -> Option<ItemId> {
        self.scope(scope)
            .and_then(|s| s.focused)
            .filter(|item| self.is_live(*item))
    }

    fn current_project(&self, scope: ScopeId) -> Option<ProjectId> {
        self.scope(scope).and_then(|s| s.project.clone())
    }

    fn switch_away_from(&mut self, scope: ScopeId, item: ItemId) {
        let Some(entry) = self.scope(scope) else {
            return;
        };
        let next = entry
            .active
            .iter()
            .chain(entry.buried.iter())
            .copied()
            .find(|candidate| *candidate != item && self.is_live(*candidate));
        if let Some(entry) = self.scope_mut(scope) {
            entry.focused = next;
        }
    }

    fn window_state(&self, scope: ScopeId) -> WindowState {
        self.scope(scope).map(|s| s.layout.clone()).unwrap_or_default()
    }

    fn dormant_states(&self) -> Vec<(ScopeId, WindowState)> {
        self.stored
            .iter()
            .filter(|s| !self.is_scope_live(s.scope))
            .map(|s| (s.scope, s.state.clone()))
            .collect()
    }

    fn store_window_state(&mut self, scope: ScopeId, state: WindowState) {
        match self.stored.iter_mut().find(|s| s.scope == scope) {
            Some(entry) => entry.state = state,
            None => self.stored.push(StoredState { scope, state }),
        }
    }

    fn take_window_state(&mut self, scope: ScopeId) -> Option<WindowState> {
        let index = self.stored.iter().position(|s| s.scope == scope)?;
        Some(self.stored.remove(index).state)
    }
}
