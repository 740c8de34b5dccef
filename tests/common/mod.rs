//! Shared test utilities for bufscope
//!
//! Builders for in-memory worlds with named items and scopes.
