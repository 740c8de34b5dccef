//! Host collaborator contract
//!
//! The core never owns items or scopes. Everything it reads or mutates goes
//! through the traits in this module, which the embedding application
//! implements. [`memory::MemoryHost`] is a complete in-memory implementation.

pub mod memory;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryHost;

/// Opaque handle to a host-managed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A scope is a sub-scope (tab) inside a container (window/frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId {
    pub container: u64,
    pub tab: usize,
}

impl ScopeId {
    pub fn new(container: u64, tab: usize) -> Self {
        Self { container, tab }
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container, self.tab)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScopeIdParseError {
    #[error("Expected `container:tab`, got {0:?}")]
    Malformed(String),
    #[error("Invalid number in scope id {0:?}")]
    InvalidNumber(String),
}

impl FromStr for ScopeId {
    type Err = ScopeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (container, tab) = s
            .split_once(':')
            .ok_or_else(|| ScopeIdParseError::Malformed(s.to_string()))?;
        let container = container
            .trim()
            .parse()
            .map_err(|_| ScopeIdParseError::InvalidNumber(s.to_string()))?;
        let tab = tab
            .trim()
            .parse()
            .map_err(|_| ScopeIdParseError::InvalidNumber(s.to_string()))?;
        Ok(Self { container, tab })
    }
}

/// Either an explicit scope or whichever scope the host reports as current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeRef {
    #[default]
    Current,
    Id(ScopeId),
}

impl ScopeRef {
    pub fn resolve<H: ScopeHost + ?Sized>(self, host: &H) -> Option<ScopeId> {
        match self {
            ScopeRef::Current => host.current_scope(),
            ScopeRef::Id(id) => Some(id),
        }
    }
}

impl From<ScopeId> for ScopeRef {
    fn from(id: ScopeId) -> Self {
        ScopeRef::Id(id)
    }
}

/// Project identifier as reported by the host's project detection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Host-serialized per-window state. The core only touches its own reserved
/// key and passes every other entry through untouched.
pub type WindowState = serde_json::Map<String, serde_json::Value>;

/// Item primitives provided by the host's global registry
pub trait ItemHost {
    /// Every live item, in the host's global order
    fn items(&self) -> Vec<ItemId>;
    fn is_live(&self, item: ItemId) -> bool;
    /// Name of a live item; `None` once destroyed
    fn name(&self, item: ItemId) -> Option<String>;
    fn lookup_by_name(&self, name: &str) -> Option<ItemId>;
    fn file_path(&self, item: ItemId) -> Option<PathBuf>;
    fn project_id(&self, item: ItemId) -> Option<ProjectId>;
    /// Destroy an item. Destroying a dead item must be a no-op.
    fn destroy(&mut self, item: ItemId);
    /// Deprioritize an item in the global order
    fn bury(&mut self, item: ItemId);
}

/// Scope storage, enumeration and window-state plumbing
pub trait ScopeHost {
    /// Every activated scope
    fn scopes(&self) -> Vec<ScopeId>;
    fn current_scope(&self) -> Option<ScopeId>;
    /// Whether the host considers the scope fully live (shown at least once)
    fn is_scope_live(&self, scope: ScopeId) -> bool;

    fn active(&self, scope: ScopeId) -> Vec<ItemId>;
    fn buried(&self, scope: ScopeId) -> Vec<ItemId>;
    fn set_active(&mut self, scope: ScopeId, items: Vec<ItemId>);
    fn set_buried(&mut self, scope: ScopeId, items: Vec<ItemId>);

    /// Item displayed in the scope's focused window
    fn focused_item(&self, scope: ScopeId) -> Option<ItemId>;
    fn current_project(&self, scope: ScopeId) -> Option<ProjectId>;
    /// Make the scope's focused window show something other than `item`
    fn switch_away_from(&mut self, scope: ScopeId, item: ItemId);

    /// Serialize the scope's windows (layout etc.) without membership data
    fn window_state(&self, scope: ScopeId) -> WindowState;
    /// Stored window states of sub-scopes that are not live yet
    fn dormant_states(&self) -> Vec<(ScopeId, WindowState)>;
    fn store_window_state(&mut self, scope: ScopeId, state: WindowState);
    /// Remove and return a scope's stored window state
    fn take_window_state(&mut self, scope: ScopeId) -> Option<WindowState>;
}

/// Everything the engine needs from the embedding application
pub trait Host: ItemHost + ScopeHost {}

impl<T: ItemHost + ScopeHost + ?Sized> Host for T {}
