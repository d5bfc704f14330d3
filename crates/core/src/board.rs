//! Board module - owns the grid of pieces
//!
//! The board is an N x N grid where each square holds at most one [`Piece`].
//! Uses a flat vector in row-major order (`row * N + col`).
//!
//! Validation and mutation are separate: [`Board::is_move_legal`] answers
//! whether a move may happen, [`Board::move_piece`] performs it without
//! checking. Every mutation keeps the grid key and the piece's own position in
//! sync; a mismatch is a programming error and panics.

use crate::config::{GameConfig, RestDurations};
use crate::error::{BoardError, ConfigError, LayoutError, PhysicsError};
use crate::layout::parse_layout;
use crate::physics::PhysicsData;
use crate::piece::{MotionCompleted, Piece};
use crate::rules::{AnyDestination, MoveRules};
use crate::types::{PieceKind, PlayerId, Position, MAX_BOARD_SIZE, TILE_SIZE};

#[derive(Debug)]
pub struct Board {
    dimension: u8,
    tile_size: f64,
    /// Flat grid, row-major order
    cells: Vec<Option<Piece>>,
    /// Template every spawned piece clones; its speed is already validated.
    physics: PhysicsData,
    rests: RestDurations,
    rules: Box<dyn MoveRules>,
}

impl Board {
    /// Empty board with default tile size, speed and rests, and no
    /// move-pattern restrictions.
    ///
    /// # Panics
    ///
    /// If `dimension` is zero or above [`MAX_BOARD_SIZE`].
    pub fn new(dimension: u8) -> Self {
        assert!(
            dimension > 0 && dimension <= MAX_BOARD_SIZE,
            "board dimension {dimension} out of range"
        );
        let cells = (0..usize::from(dimension) * usize::from(dimension))
            .map(|_| None)
            .collect();
        Self {
            dimension,
            tile_size: TILE_SIZE,
            cells,
            physics: PhysicsData::default(),
            rests: RestDurations::default(),
            rules: Box::new(AnyDestination),
        }
    }

    /// Empty board shaped and tuned by `config`.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut board = Self::new(config.board_size);
        board.tile_size = config.tile_size;
        board.rests = config.rest_durations();
        board.rules = config.rules.build();
        board
            .physics
            .set_speed(config.move_speed)
            .map_err(|_| ConfigError::NonPositive {
                field: "move_speed",
                value: config.move_speed,
            })?;
        Ok(board)
    }

    /// Board sized to a text layout and populated from it.
    pub fn from_layout<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        if rows.is_empty() || rows.len() > usize::from(MAX_BOARD_SIZE) {
            return Err(LayoutError::Dimension {
                found: rows.len(),
                max: MAX_BOARD_SIZE,
            });
        }
        let mut board = Self::new(rows.len() as u8);
        board.populate(rows)?;
        Ok(board)
    }

    /// Place every piece of a layout. Nothing is placed on error.
    pub fn populate<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<(), LayoutError> {
        let pieces = parse_layout(rows, self.dimension)?;
        for &(at, _, _) in &pieces {
            if self.is_occupied(at) {
                return Err(BoardError::Occupied { at }.into());
            }
        }
        for (at, kind, owner) in pieces {
            self.spawn(kind, owner, at)?;
        }
        Ok(())
    }

    pub fn with_rules(mut self, rules: Box<dyn MoveRules>) -> Self {
        self.rules = rules;
        self
    }

    /// Speed for pieces spawned from now on.
    pub fn with_move_speed(mut self, speed: f64) -> Result<Self, PhysicsError> {
        self.physics.set_speed(speed)?;
        Ok(self)
    }

    pub fn with_rests(mut self, rests: RestDurations) -> Self {
        self.rests = rests;
        self
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, at: Position) -> Option<usize> {
        if !at.within(self.dimension) {
            return None;
        }
        Some(usize::from(at.row) * usize::from(self.dimension) + usize::from(at.col))
    }

    pub fn dimension(&self) -> u8 {
        self.dimension
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn move_speed(&self) -> f64 {
        self.physics.speed()
    }

    pub fn rests(&self) -> RestDurations {
        self.rests
    }

    pub fn rules(&self) -> &dyn MoveRules {
        self.rules.as_ref()
    }

    pub fn is_in_bounds(&self, at: Position) -> bool {
        at.within(self.dimension)
    }

    /// Piece at `at`; None when empty or out of bounds.
    pub fn get(&self, at: Position) -> Option<&Piece> {
        self.index(at).and_then(|idx| self.cells[idx].as_ref())
    }

    pub fn is_occupied(&self, at: Position) -> bool {
        self.get(at).is_some()
    }

    /// Put a piece on the square its own position names.
    pub fn place(&mut self, piece: Piece) -> Result<(), BoardError> {
        let at = piece.position();
        let idx = self.index(at).ok_or(BoardError::OutOfBounds {
            at,
            dimension: self.dimension,
        })?;
        if self.cells[idx].is_some() {
            return Err(BoardError::Occupied { at });
        }
        self.cells[idx] = Some(piece);
        Ok(())
    }

    /// Create an idle piece with this board's speed and tile size.
    pub fn spawn(
        &mut self,
        kind: PieceKind,
        owner: PlayerId,
        at: Position,
    ) -> Result<(), BoardError> {
        let piece = Piece::with_physics(kind, owner, at, self.physics.clone(), self.tile_size);
        self.place(piece)
    }

    /// Take the piece off `at`.
    pub fn remove(&mut self, at: Position) -> Option<Piece> {
        let idx = self.index(at)?;
        self.cells[idx].take()
    }

    /// `from` holds a piece, `to` is on the board and empty or held by the
    /// opponent, and the rule set accepts the geometry.
    pub fn is_move_legal(&self, from: Position, to: Position) -> bool {
        let Some(piece) = self.get(from) else {
            return false;
        };
        if !self.is_in_bounds(to) {
            return false;
        }
        if let Some(occupant) = self.get(to) {
            if !occupant.is_opponent_of(piece) {
                return false;
            }
        }
        self.rules.permits(self, piece, from, to)
    }

    /// Relocate the piece on `from` to `to` and start its motion.
    ///
    /// Performs no legality check. Returns the captured occupant of `to`.
    ///
    /// # Panics
    ///
    /// If `from` is empty or either square is off the board.
    pub fn move_piece(&mut self, from: Position, to: Position, now_nanos: i64) -> Option<Piece> {
        let src = self
            .index(from)
            .unwrap_or_else(|| panic!("move source {from} is off the board"));
        let dst = self
            .index(to)
            .unwrap_or_else(|| panic!("move target {to} is off the board"));
        let mut piece = self.cells[src]
            .take()
            .unwrap_or_else(|| panic!("no piece at {from} to move"));
        let captured = self.cells[dst].take();

        piece.begin_move(to, self.tile_size, now_nanos);
        self.cells[dst] = Some(piece);
        self.debug_check_invariants();
        captured
    }

    /// Start a jump in place for the piece on `at`.
    ///
    /// # Panics
    ///
    /// If `at` is empty.
    pub fn jump_piece(&mut self, at: Position, now_nanos: i64) {
        let tile_size = self.tile_size;
        let piece = self
            .index(at)
            .and_then(|idx| self.cells[idx].as_mut())
            .unwrap_or_else(|| panic!("no piece at {at} to jump"));
        piece.begin_jump(tile_size, now_nanos);
    }

    /// Tick every piece. Returns the motions that finished this tick.
    pub fn update_pieces(&mut self, now_nanos: i64) -> Vec<MotionCompleted> {
        let rests = self.rests;
        self.cells
            .iter_mut()
            .flatten()
            .filter_map(|piece| piece.update(now_nanos, &rests))
            .collect()
    }

    /// Occupied squares in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    pub fn has_king(&self, owner: PlayerId) -> bool {
        self.pieces()
            .any(|piece| piece.owner() == owner && piece.kind() == PieceKind::King)
    }

    /// True when every square strictly between `from` and `to` is empty.
    ///
    /// Only meaningful for straight or diagonal lines; other deltas report
    /// false.
    pub fn path_is_clear(&self, from: Position, to: Position) -> bool {
        let (d_row, d_col) = from.delta_to(to);
        let straight = d_row == 0 || d_col == 0;
        if !straight && d_row.abs() != d_col.abs() {
            return false;
        }
        let steps = d_row.abs().max(d_col.abs());
        let (step_row, step_col) = (d_row.signum() as i8, d_col.signum() as i8);

        let mut at = from;
        for _ in 1..steps {
            at = match at.offset(step_row, step_col) {
                Some(next) => next,
                None => return false,
            };
            if self.is_occupied(at) {
                return false;
            }
        }
        true
    }

    fn debug_check_invariants(&self) {
        if cfg!(debug_assertions) {
            for (idx, cell) in self.cells.iter().enumerate() {
                if let Some(piece) = cell {
                    assert_eq!(
                        self.index(piece.position()),
                        Some(idx),
                        "{} stored under the wrong square",
                        piece.kind()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ClassicPatterns;
    use crate::types::MovementState;

    fn p(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(8);
        assert_eq!(board.dimension(), 8);
        assert_eq!(board.piece_count(), 0);
        assert!(board.get(p(0, 0)).is_none());
        assert!(board.get(p(8, 0)).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn zero_dimension_panics() {
        let _ = Board::new(0);
    }

    #[test]
    fn place_checks_bounds_and_occupancy() {
        let mut board = Board::new(4);
        board.spawn(PieceKind::Rook, PlayerId::One, p(0, 0)).unwrap();
        assert_eq!(
            board.spawn(PieceKind::Pawn, PlayerId::Two, p(0, 0)),
            Err(BoardError::Occupied { at: p(0, 0) })
        );
        assert_eq!(
            board.spawn(PieceKind::Pawn, PlayerId::Two, p(4, 0)),
            Err(BoardError::OutOfBounds {
                at: p(4, 0),
                dimension: 4
            })
        );
    }

    #[test]
    fn generic_legality() {
        let board = Board::from_layout(&["RP..", "....", "..r.", "...."]).unwrap();
        assert!(board.is_move_legal(p(0, 0), p(3, 3)));
        assert!(board.is_move_legal(p(0, 0), p(2, 2)));
        assert!(!board.is_move_legal(p(0, 0), p(0, 1)));
        assert!(!board.is_move_legal(p(0, 0), p(0, 4)));
        assert!(!board.is_move_legal(p(1, 1), p(2, 2)));
        assert!(!board.is_move_legal(p(0, 0), p(0, 0)));
    }

    #[test]
    fn move_relocates_and_syncs_position() {
        let mut board = Board::from_layout(&["R...", "....", "....", "...r"]).unwrap();
        let captured = board.move_piece(p(0, 0), p(3, 3), 0).unwrap();
        assert_eq!(captured.kind(), PieceKind::Rook);
        assert_eq!(captured.owner(), PlayerId::Two);

        assert!(board.get(p(0, 0)).is_none());
        let piece = board.get(p(3, 3)).unwrap();
        assert_eq!(piece.position(), p(3, 3));
        assert_eq!(piece.owner(), PlayerId::One);
        assert_eq!(piece.state(), MovementState::Move);
        assert_eq!(board.piece_count(), 1);
    }

    #[test]
    #[should_panic(expected = "no piece at")]
    fn moving_an_empty_square_panics() {
        let mut board = Board::new(4);
        board.move_piece(p(1, 1), p(2, 2), 0);
    }

    #[test]
    fn update_pieces_reports_completions() {
        let mut board = Board::from_layout(&["R...", "....", "....", "...."])
            .unwrap()
            .with_move_speed(64.0)
            .unwrap();
        board.move_piece(p(0, 0), p(0, 1), 0);
        assert!(board.update_pieces(500_000_000).is_empty());
        let done = board.update_pieces(1_000_000_000);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].to, p(0, 1));
        assert_eq!(board.get(p(0, 1)).unwrap().state(), MovementState::LongRest);
    }

    #[test]
    fn populate_rejects_overlap_without_partial_placement() {
        let mut board = Board::new(2);
        board.spawn(PieceKind::King, PlayerId::One, p(1, 1)).unwrap();
        let err = board.populate(&["Q.", ".k"]).unwrap_err();
        assert_eq!(err, LayoutError::Placement(BoardError::Occupied { at: p(1, 1) }));
        assert_eq!(board.piece_count(), 1);
    }

    #[test]
    fn from_config_applies_rules_and_speed() {
        let config = GameConfig {
            move_speed: 32.0,
            ..GameConfig::default()
        };
        let mut board = Board::from_config(&config).unwrap();
        assert_eq!(board.move_speed(), 32.0);
        board.spawn(PieceKind::Rook, PlayerId::One, p(0, 0)).unwrap();
        assert!(!board.is_move_legal(p(0, 0), p(1, 1)));
        assert_eq!(board.get(p(0, 0)).unwrap().physics().speed(), 32.0);
    }

    #[test]
    fn path_is_clear_ignores_endpoints() {
        let board = Board::from_layout(&["R.r.", "....", "....", "...."])
            .unwrap()
            .with_rules(Box::new(ClassicPatterns));
        assert!(board.path_is_clear(p(0, 0), p(0, 2)));
        assert!(!board.path_is_clear(p(0, 0), p(0, 3)));
        assert!(!board.path_is_clear(p(0, 0), p(1, 2)));
        assert!(!board.has_king(PlayerId::One));
    }
}
