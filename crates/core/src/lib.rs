//! Core game logic - board, pieces, physics and the command pipeline
//!
//! This crate has no dependency on terminals or input devices. Time enters
//! only through a [`Clock`], so every rule can be driven deterministically
//! from tests.
//!
//! # Module Structure
//!
//! - [`physics`]: continuous-time interpolation between tiles
//! - [`piece`]: a piece and its movement state machine
//! - [`board`]: N x N grid with legality checks and mutation
//! - [`rules`]: move-pattern rule sets consulted by the board
//! - [`command`]: move and jump commands
//! - [`player`]: players and cursor-driven selection
//! - [`game`]: match lifecycle, command queue and per-tick update
//! - [`snapshot`]: read-only view for renderers
//!
//! # Movement
//!
//! | State | Entered on | Left when |
//! |-------|------------|-----------|
//! | `IDLE` | spawn, rest over | a command starts a motion |
//! | `MOVE` | move command | physics finishes, into `LONG_REST` |
//! | `JUMP` | jump command | physics finishes, into `SHORT_REST` |
//! | `SHORT_REST` / `LONG_REST` | motion finished | configured rest elapsed |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use kfchess_core::{Game, GameConfig, ManualClock, MoveCommand};
//! use kfchess_core::events::EventBus;
//! use kfchess_core::types::Position;
//!
//! let clock = ManualClock::new();
//! let mut game = Game::standard(&GameConfig::default(), Arc::new(EventBus::new()))
//!     .unwrap()
//!     .with_clock(Arc::new(clock.clone()));
//! game.start();
//!
//! game.add_command(Box::new(MoveCommand::new(Position::new(1, 4), Position::new(3, 4))));
//! let report = game.update();
//! assert_eq!(report.applied, 1);
//!
//! clock.advance_millis(500);
//! assert_eq!(game.update().completed.len(), 1);
//! ```

pub mod board;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod layout;
pub mod physics;
pub mod piece;
pub mod player;
pub mod rules;
pub mod snapshot;

pub use kfchess_events as events;
pub use kfchess_types as types;

pub use board::Board;
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{CapturedPiece, Command, CommandOutcome, ExecContext, JumpCommand, MoveCommand};
pub use config::{GameConfig, RestDurations, RulesMode};
pub use error::{BoardError, ConfigError, Error, LayoutError, PhysicsError, Result};
pub use game::{Game, TickReport};
pub use layout::STANDARD_LAYOUT;
pub use physics::PhysicsData;
pub use piece::{MotionCompleted, Piece};
pub use player::{CursorPlayer, Player, PlayerCursor};
pub use rules::{AnyDestination, ClassicPatterns, MoveRules};
pub use snapshot::{GameSnapshot, PieceSnapshot, PlayerSnapshot};
