//! Terminal front-end for the board.
//!
//! Rendering goes through a small framebuffer rather than a widget library:
//! [`BoardView`] paints a [`GameSnapshot`](crate::core::GameSnapshot) into a
//! [`Frame`], and [`TerminalRenderer`] flushes only the cells that changed
//! since the previous frame.

pub mod board_view;
pub mod frame;
pub mod renderer;

pub use kfchess_core as core;
pub use kfchess_types as types;

pub use board_view::BoardView;
pub use frame::{Cell, CellStyle, Frame, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
