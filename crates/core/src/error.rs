//! Error types for setup and configuration.
//!
//! Gameplay itself has no error path: illegal moves are reported as events,
//! and invariant violations panic.

use thiserror::Error;

use crate::types::Position;

/// Top-level error for building a game.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("board size must be between 1 and {max}, got {size}")]
    BoardSize { size: u8, max: u8 },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("config parse failed: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        ConfigError::Parse(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("movement speed must be a positive finite number, got {0}")]
    NonPositiveSpeed(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("position {at} is outside the {dimension}x{dimension} board")]
    OutOfBounds { at: Position, dimension: u8 },

    #[error("position {at} is already occupied")]
    Occupied { at: Position },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("layout must have between 1 and {max} rows, got {found}")]
    Dimension { found: usize, max: u8 },

    #[error("layout has {found} rows, board needs {expected}")]
    RowCount { expected: usize, found: usize },

    #[error("layout row {row} has {found} squares, board needs {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown piece code {code:?} at {at}")]
    UnknownPiece { code: char, at: Position },

    #[error(transparent)]
    Placement(#[from] BoardError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ConfigError::NonPositive {
            field: "move_speed",
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "move_speed must be a positive finite number, got 0"
        );

        let err = BoardError::OutOfBounds {
            at: Position::new(8, 1),
            dimension: 8,
        };
        assert_eq!(err.to_string(), "position (8, 1) is outside the 8x8 board");

        let err: Error = LayoutError::UnknownPiece {
            code: 'x',
            at: Position::new(0, 2),
        }
        .into();
        assert_eq!(err.to_string(), "unknown piece code 'x' at (0, 2)");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
