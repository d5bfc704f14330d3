//! Terminal input module.
//!
//! Maps `crossterm` key events onto per-player [`CursorAction`]s. Both players
//! share one keyboard, so every binding carries the seat it belongs to:
//!
//! | Action | Player 1 | Player 2 |
//! |--------|----------|----------|
//! | Up / Down / Left / Right | `W` `S` `A` `D` | arrow keys |
//! | Select | `Space` | `Enter` |
//!
//! `q` or `Ctrl+C` quits.
//!
//! [`CursorAction`]: crate::types::CursorAction

pub mod map;

pub use kfchess_types as types;

pub use map::{map_key, should_quit};
