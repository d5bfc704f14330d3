//! Move-pattern rule sets.
//!
//! The board performs the generic checks itself (occupied source, in-bounds
//! destination, no self-capture) and then asks its [`MoveRules`] whether the
//! piece may travel that way at all.

use std::fmt;

use crate::board::Board;
use crate::piece::Piece;
use crate::types::{PieceKind, PlayerId, Position};

pub trait MoveRules: fmt::Debug + Send + Sync {
    /// Called only after the generic checks passed, so `piece` sits on
    /// `from` and `to` is in bounds and not friendly.
    fn permits(&self, board: &Board, piece: &Piece, from: Position, to: Position) -> bool;
}

/// No geometry at all: any destination the generic checks allow.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyDestination;

impl MoveRules for AnyDestination {
    fn permits(&self, _board: &Board, _piece: &Piece, _from: Position, _to: Position) -> bool {
        true
    }
}

/// Chess movement geometry without check, castling, en passant or promotion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicPatterns;

impl MoveRules for ClassicPatterns {
    fn permits(&self, board: &Board, piece: &Piece, from: Position, to: Position) -> bool {
        let (d_row, d_col) = from.delta_to(to);
        if (d_row, d_col) == (0, 0) {
            return false;
        }
        let straight = d_row == 0 || d_col == 0;
        let diagonal = d_row.abs() == d_col.abs();

        match piece.kind() {
            PieceKind::King => d_row.abs() <= 1 && d_col.abs() <= 1,
            PieceKind::Queen => (straight || diagonal) && board.path_is_clear(from, to),
            PieceKind::Rook => straight && board.path_is_clear(from, to),
            PieceKind::Bishop => diagonal && board.path_is_clear(from, to),
            PieceKind::Knight => matches!((d_row.abs(), d_col.abs()), (1, 2) | (2, 1)),
            PieceKind::Pawn => pawn_permits(board, piece.owner(), from, to, d_row, d_col),
        }
    }
}

fn pawn_permits(
    board: &Board,
    owner: PlayerId,
    from: Position,
    to: Position,
    d_row: i16,
    d_col: i16,
) -> bool {
    let forward = i16::from(owner.forward());
    let target_taken = board.is_occupied(to);

    if d_col == 0 {
        if target_taken {
            return false;
        }
        if d_row == forward {
            return true;
        }
        d_row == 2 * forward
            && from.row == home_row(owner, board.dimension())
            && board.path_is_clear(from, to)
    } else {
        // Diagonal steps only ever capture.
        d_row == forward && d_col.abs() == 1 && target_taken
    }
}

fn home_row(owner: PlayerId, dimension: u8) -> u8 {
    match owner {
        PlayerId::One => 1,
        PlayerId::Two => dimension.saturating_sub(2),
    }
}
