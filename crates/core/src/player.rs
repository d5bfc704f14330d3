//! Players turn selections into commands.
//!
//! A [`Player`] is asked for at most one command per selection. The bundled
//! [`CursorPlayer`] drives a [`PlayerCursor`] over the board: the first
//! selection picks up one of its own pieces, the second says where it goes.

use crate::board::Board;
use crate::command::{Command, JumpCommand, MoveCommand};
use crate::types::{CursorAction, PlayerId, Position};

pub trait Player: Send {
    fn id(&self) -> PlayerId;

    fn name(&self) -> &str;

    /// Zero or one command for the current selection.
    fn handle_selection(&mut self, board: &Board) -> Option<Box<dyn Command>>;

    fn is_failed(&self) -> bool;

    fn mark_failed(&mut self);

    fn cursor(&self) -> Option<&PlayerCursor> {
        None
    }

    fn cursor_mut(&mut self) -> Option<&mut PlayerCursor> {
        None
    }

    /// The square picked by a first selection, if any.
    fn selection(&self) -> Option<Position> {
        None
    }
}

/// Cursor clamped to an N x N board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCursor {
    position: Position,
    dimension: u8,
}

impl PlayerCursor {
    /// `start` is clamped onto the board.
    pub fn new(start: Position, dimension: u8) -> Self {
        let last = dimension.saturating_sub(1);
        Self {
            position: Position::new(start.row.min(last), start.col.min(last)),
            dimension,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn move_up(&mut self) {
        self.position.row = self.position.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.position.row + 1 < self.dimension {
            self.position.row += 1;
        }
    }

    pub fn move_left(&mut self) {
        self.position.col = self.position.col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.position.col + 1 < self.dimension {
            self.position.col += 1;
        }
    }

    /// Apply a directional action; `Select` leaves the cursor in place.
    pub fn apply(&mut self, action: CursorAction) {
        match action {
            CursorAction::Up => self.move_up(),
            CursorAction::Down => self.move_down(),
            CursorAction::Left => self.move_left(),
            CursorAction::Right => self.move_right(),
            CursorAction::Select => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct CursorPlayer {
    id: PlayerId,
    name: String,
    cursor: PlayerCursor,
    selected: Option<Position>,
    failed: bool,
}

impl CursorPlayer {
    pub fn new(id: PlayerId, name: impl Into<String>, cursor: PlayerCursor) -> Self {
        Self {
            id,
            name: name.into(),
            cursor,
            selected: None,
            failed: false,
        }
    }

    /// Cursor on the player's own back-rank corner.
    pub fn for_board(id: PlayerId, board: &Board) -> Self {
        let dimension = board.dimension();
        let row = match id {
            PlayerId::One => 0,
            PlayerId::Two => dimension.saturating_sub(1),
        };
        let name = match id {
            PlayerId::One => "Player 1",
            PlayerId::Two => "Player 2",
        };
        Self::new(id, name, PlayerCursor::new(Position::new(row, 0), dimension))
    }

    fn owns(&self, board: &Board, at: Position) -> bool {
        board.get(at).is_some_and(|piece| piece.owner() == self.id)
    }

    /// Own piece that is not travelling or jumping.
    fn can_pick(&self, board: &Board, at: Position) -> bool {
        board
            .get(at)
            .is_some_and(|piece| piece.owner() == self.id && !piece.is_in_motion())
    }
}

impl Player for CursorPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn handle_selection(&mut self, board: &Board) -> Option<Box<dyn Command>> {
        let at = self.cursor.position();
        // The selected piece may have been captured since it was picked up.
        if let Some(source) = self.selected {
            if !self.owns(board, source) {
                tracing::trace!(player = %self.id, %source, "selection lost");
                self.selected = None;
            }
        }
        match self.selected {
            None => {
                if self.can_pick(board, at) {
                    tracing::trace!(player = %self.id, %at, "selected");
                    self.selected = Some(at);
                }
                None
            }
            Some(source) if source == at => {
                self.selected = None;
                Some(Box::new(JumpCommand::new(at)))
            }
            Some(_) if self.owns(board, at) => {
                // Switch to another of our own pieces.
                if self.can_pick(board, at) {
                    self.selected = Some(at);
                }
                None
            }
            Some(source) => {
                self.selected = None;
                Some(Box::new(MoveCommand::new(source, at)))
            }
        }
    }

    fn is_failed(&self) -> bool {
        self.failed
    }

    fn mark_failed(&mut self) {
        self.failed = true;
    }

    fn cursor(&self) -> Option<&PlayerCursor> {
        Some(&self.cursor)
    }

    fn cursor_mut(&mut self) -> Option<&mut PlayerCursor> {
        Some(&mut self.cursor)
    }

    fn selection(&self) -> Option<Position> {
        self.selected
    }
}
