pub mod config;
pub mod engine;
pub mod filter;
pub mod host;
pub mod scope;
pub mod util;

pub use config::Settings;
pub use engine::{
    EventKind, EventOutcome, IsolateOutcome, RestoreOutcome, ScopeEngine, ScopeEvent,
    ScopeOrigin, Snapshot,
};
pub use filter::{Filters, Matcher};
pub use host::{Host, ItemHost, ItemId, MemoryHost, ProjectId, ScopeHost, ScopeId, ScopeRef};
pub use scope::{CallContext, ListOptions, RestoreMode};
