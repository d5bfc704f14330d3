//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used throughout the
//! application: board coordinates, players, piece kinds and movement states.
//! Everything here is plain data with serde support, usable from the core
//! simulation, the event bus, and any front-end.
//!
//! # Board Geometry
//!
//! - **Dimension**: 8x8 by default (`BOARD_SIZE`), configurable per game
//! - **Coordinates**: `(row, col)`, row 0 at the top, col 0 at the left
//! - **Pixel space**: a tile index times `TILE_SIZE` gives the tile origin
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `DEFAULT_MOVE_SPEED` | 256.0 | Piece speed in pixel units per second |
//! | `SHORT_REST_MS` | 500 | Cooldown after a jump lands |
//! | `LONG_REST_MS` | 1500 | Cooldown after a move completes |
//!
//! # Examples
//!
//! ```
//! use kfchess_types::{MovementState, PieceKind, PlayerId, Position};
//!
//! let pos = Position::new(2, 3);
//! assert_eq!(pos.offset(1, -1), Some(Position::new(3, 2)));
//! assert_eq!(pos.offset(-3, 0), None);
//!
//! assert_eq!(PieceKind::from_code('n'), Some(PieceKind::Knight));
//! assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
//! assert!(MovementState::Move.is_in_motion());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default board dimension (8x8)
pub const BOARD_SIZE: u8 = 8;

/// Largest supported board dimension
pub const MAX_BOARD_SIZE: u8 = 26;

/// Default tile edge length in pixel units
pub const TILE_SIZE: f64 = 64.0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Default movement speed (pixel units per second, four tiles per second)
pub const DEFAULT_MOVE_SPEED: f64 = 256.0;

/// Rest after a jump lands
pub const SHORT_REST_MS: u64 = 500;

/// Rest after a move completes
pub const LONG_REST_MS: u64 = 1500;

pub const NANOS_PER_SEC: i64 = 1_000_000_000;
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// A tile coordinate on the board.
///
/// Positions are plain values: they carry no knowledge of the board dimension,
/// so bounds are always checked by the board that interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Shift by a signed delta. Returns None when either axis goes negative
    /// or overflows.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Self { row, col })
    }

    /// True when both axes are below `dimension`.
    pub fn within(self, dimension: u8) -> bool {
        self.row < dimension && self.col < dimension
    }

    /// Signed (row, col) delta from `self` to `other`.
    pub fn delta_to(self, other: Position) -> (i16, i16) {
        (
            other.row as i16 - self.row as i16,
            other.col as i16 - self.col as i16,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the two seats at the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Row direction this player's pawns advance in.
    ///
    /// Player one starts at the top (row 0) and advances downwards.
    pub const fn forward(self) -> i8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => -1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::One => f.write_str("player 1"),
            PlayerId::Two => f.write_str("player 2"),
        }
    }
}

/// The six piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    /// Parse a piece code (case-insensitive): K Q R B N P.
    ///
    /// # Examples
    ///
    /// ```
    /// use kfchess_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_code('K'), Some(PieceKind::King));
    /// assert_eq!(PieceKind::from_code('p'), Some(PieceKind::Pawn));
    /// assert_eq!(PieceKind::from_code('x'), None);
    /// ```
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'Q' => Some(PieceKind::Queen),
            'R' => Some(PieceKind::Rook),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            'P' => Some(PieceKind::Pawn),
            _ => None,
        }
    }

    /// Upper-case piece code.
    pub const fn code(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Motion phase of a piece. A piece is always in exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementState {
    #[default]
    Idle,
    Move,
    Jump,
    ShortRest,
    LongRest,
}

impl MovementState {
    /// Travelling between tiles (or airborne).
    pub const fn is_in_motion(self) -> bool {
        matches!(self, MovementState::Move | MovementState::Jump)
    }

    pub const fn is_resting(self) -> bool {
        matches!(self, MovementState::ShortRest | MovementState::LongRest)
    }

    /// The state a completed motion settles into.
    ///
    /// Resting and idle states settle into themselves.
    pub const fn settles_into(self) -> Self {
        match self {
            MovementState::Move => MovementState::LongRest,
            MovementState::Jump => MovementState::ShortRest,
            other => other,
        }
    }
}

/// Outcome reported by `Game::win`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Player1,
    Player2,
    /// Nobody has won: neither player failed, or both did.
    None,
}

impl Winner {
    pub const fn is_decided(self) -> bool {
        !matches!(self, Winner::None)
    }
}

/// Cursor-level input, already routed to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorAction {
    Up,
    Down,
    Left,
    Right,
    Select,
}
