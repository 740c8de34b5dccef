//! Scope membership
//!
//! `accessor` reads and writes a scope's `active`/`buried` sequences and
//! computes filtered lists; `context` carries the per-call reentrancy state.

pub mod accessor;
mod context;

pub use accessor::{compute_list, dedup, raw, ListOptions};
pub use context::{CallContext, Phase, PhaseGuard, RestoreMode, RestoreModeGuard};
