//! Kung Fu Chess (workspace facade crate).
//!
//! Re-exports the member crates under one roof so binaries, tests and
//! benches can write `kfchess::core::Game` instead of naming each crate.

pub use kfchess_core as core;
pub use kfchess_events as events;
pub use kfchess_input as input;
pub use kfchess_term as term;
pub use kfchess_types as types;
