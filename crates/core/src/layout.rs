//! Text board layouts.
//!
//! One string per row, one character per square: `.` for an empty square, or
//! a piece code `K Q R B N P`. Upper case belongs to player one, lower case
//! to player two.

use crate::error::LayoutError;
use crate::types::{PieceKind, PlayerId, Position};

/// Chess starting position with player one on rows 0 and 1.
pub const STANDARD_LAYOUT: [&str; 8] = [
    "RNBQKBNR",
    "PPPPPPPP",
    "........",
    "........",
    "........",
    "........",
    "pppppppp",
    "rnbqkbnr",
];

pub const EMPTY_SQUARE: char = '.';

/// Decode a single square.
pub fn parse_square(code: char, at: Position) -> Result<Option<(PieceKind, PlayerId)>, LayoutError> {
    if code == EMPTY_SQUARE {
        return Ok(None);
    }
    let kind = PieceKind::from_code(code).ok_or(LayoutError::UnknownPiece { code, at })?;
    let owner = if code.is_ascii_uppercase() {
        PlayerId::One
    } else {
        PlayerId::Two
    };
    Ok(Some((kind, owner)))
}

/// Decode every square of a layout, checking it is `dimension` x `dimension`.
pub fn parse_layout<S: AsRef<str>>(
    rows: &[S],
    dimension: u8,
) -> Result<Vec<(Position, PieceKind, PlayerId)>, LayoutError> {
    let expected = usize::from(dimension);
    if rows.len() != expected {
        return Err(LayoutError::RowCount {
            expected,
            found: rows.len(),
        });
    }

    let mut pieces = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        let found = line.chars().count();
        if found != expected {
            return Err(LayoutError::RowWidth {
                row,
                expected,
                found,
            });
        }
        for (col, code) in line.chars().enumerate() {
            // Both indices are below `dimension`, which fits in u8.
            let at = Position::new(row as u8, col as u8);
            if let Some((kind, owner)) = parse_square(code, at)? {
                pieces.push((at, kind, owner));
            }
        }
    }
    Ok(pieces)
}
