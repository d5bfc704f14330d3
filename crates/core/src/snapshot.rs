use serde::Serialize;

use crate::game::Game;
use crate::piece::Piece;
use crate::types::{MovementState, PieceKind, PlayerId, Position, Winner};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub position: Position,
    /// Interpolated pixel position.
    pub x: f64,
    pub y: f64,
    pub state: MovementState,
}

impl From<&Piece> for PieceSnapshot {
    fn from(piece: &Piece) -> Self {
        let (x, y) = piece.pixel_position();
        Self {
            kind: piece.kind(),
            owner: piece.owner(),
            position: piece.position(),
            x,
            y,
            state: piece.state(),
        }
    }
}

impl PieceSnapshot {
    /// Tile nearest the drawn position.
    pub fn drawn_tile(&self, tile_size: f64, dimension: u8) -> Position {
        let last = f64::from(dimension.saturating_sub(1));
        let snap = |px: f64| (px / tile_size).round().clamp(0.0, last) as u8;
        Position::new(snap(self.y), snap(self.x))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub failed: bool,
    pub cursor: Option<Position>,
    pub selection: Option<Position>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub dimension: u8,
    pub tile_size: f64,
    pub pieces: Vec<PieceSnapshot>,
    pub players: [PlayerSnapshot; 2],
    pub winner: Winner,
    pub started: bool,
    pub ended: bool,
}

impl GameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let board = game.board();
        let player = |id: PlayerId| {
            let player = game.player(id);
            PlayerSnapshot {
                id,
                name: player.name().to_string(),
                failed: player.is_failed(),
                cursor: player.cursor().map(|cursor| cursor.position()),
                selection: player.selection(),
            }
        };
        Self {
            dimension: board.dimension(),
            tile_size: board.tile_size(),
            pieces: board.pieces().map(PieceSnapshot::from).collect(),
            players: [player(PlayerId::One), player(PlayerId::Two)],
            winner: game.win(),
            started: game.is_started(),
            ended: game.is_ended(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerSnapshot {
        match id {
            PlayerId::One => &self.players[0],
            PlayerId::Two => &self.players[1],
        }
    }

    pub fn piece_at(&self, at: Position) -> Option<&PieceSnapshot> {
        self.pieces.iter().find(|piece| piece.position == at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use kfchess_events::EventBus;
    use std::sync::Arc;

    #[test]
    fn standard_snapshot() {
        let game = Game::standard(&GameConfig::default(), Arc::new(EventBus::new())).unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.dimension, 8);
        assert_eq!(snap.pieces.len(), 32);
        assert_eq!(snap.winner, Winner::None);
        assert_eq!(snap.player(PlayerId::Two).cursor, Some(Position::new(7, 0)));

        let king = snap.piece_at(Position::new(7, 4)).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.owner, PlayerId::Two);
        assert_eq!((king.x, king.y), (256.0, 448.0));
    }

    #[test]
    fn drawn_tile_rounds_to_nearest() {
        let piece = PieceSnapshot {
            kind: PieceKind::Rook,
            owner: PlayerId::One,
            position: Position::new(0, 3),
            x: 100.0,
            y: 20.0,
            state: MovementState::Move,
        };
        assert_eq!(piece.drawn_tile(64.0, 8), Position::new(0, 2));
    }

    #[test]
    fn serializes_to_json() {
        let game = Game::standard(&GameConfig::default(), Arc::new(EventBus::new())).unwrap();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["dimension"], 8);
        assert_eq!(json["players"][0]["id"], "one");
        assert_eq!(json["pieces"][0]["state"], "IDLE");
    }
}
