//! Event records published on the bus.
//!
//! Records are immutable once built: listeners only ever see `&Event`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::types::{MovementState, PieceKind, Position};

/// Registry key. Every listener declares exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    PieceMoved,
    PieceJump,
    PieceCaptured,
    GameStarted,
    GameEnded,
    Movement,
    Collision,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::PieceMoved,
        EventKind::PieceJump,
        EventKind::PieceCaptured,
        EventKind::GameStarted,
        EventKind::GameEnded,
        EventKind::Movement,
        EventKind::Collision,
    ];

}

/// The kinds carried by [`GameEvent`]: a human-readable message only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEventKind {
    PieceMoved,
    PieceJump,
    PieceCaptured,
    GameStarted,
    GameEnded,
}

impl From<GameEventKind> for EventKind {
    fn from(kind: GameEventKind) -> Self {
        match kind {
            GameEventKind::PieceMoved => EventKind::PieceMoved,
            GameEventKind::PieceJump => EventKind::PieceJump,
            GameEventKind::PieceCaptured => EventKind::PieceCaptured,
            GameEventKind::GameStarted => EventKind::GameStarted,
            GameEventKind::GameEnded => EventKind::GameEnded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementPhase {
    Started,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollisionKind {
    PieceToPiece,
    /// Reserved for motions stopped by the board edge. Moves are bounds-checked
    /// before they start, so nothing publishes it yet.
    PieceToBoardEdge,
    JumpLanding,
}

/// Generic game notification: a kind plus a message for logs and move lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameEvent {
    pub timestamp_nanos: u64,
    pub kind: GameEventKind,
    pub message: String,
}

impl GameEvent {
    pub fn new(kind: GameEventKind, message: impl Into<String>) -> Self {
        Self {
            timestamp_nanos: now_nanos(),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementEvent {
    pub timestamp_nanos: u64,
    pub piece: PieceKind,
    pub from: Position,
    pub to: Position,
    pub movement: MovementState,
    pub phase: MovementPhase,
}

impl MovementEvent {
    pub fn new(
        piece: PieceKind,
        from: Position,
        to: Position,
        movement: MovementState,
        phase: MovementPhase,
    ) -> Self {
        Self {
            timestamp_nanos: now_nanos(),
            piece,
            from,
            to,
            movement,
            phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionEvent {
    pub timestamp_nanos: u64,
    pub first: PieceKind,
    pub second: PieceKind,
    pub at: Position,
    pub collision: CollisionKind,
}

impl CollisionEvent {
    pub fn new(first: PieceKind, second: PieceKind, at: Position, collision: CollisionKind) -> Self {
        Self {
            timestamp_nanos: now_nanos(),
            first,
            second,
            at,
            collision,
        }
    }
}

/// Closed set of everything that can travel over the bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Game(GameEvent),
    Movement(MovementEvent),
    Collision(CollisionEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Game(e) => e.kind.into(),
            Event::Movement(_) => EventKind::Movement,
            Event::Collision(_) => EventKind::Collision,
        }
    }

    pub fn timestamp_nanos(&self) -> u64 {
        match self {
            Event::Game(e) => e.timestamp_nanos,
            Event::Movement(e) => e.timestamp_nanos,
            Event::Collision(e) => e.timestamp_nanos,
        }
    }

    pub fn as_game(&self) -> Option<&GameEvent> {
        match self {
            Event::Game(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_movement(&self) -> Option<&MovementEvent> {
        match self {
            Event::Movement(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_collision(&self) -> Option<&CollisionEvent> {
        match self {
            Event::Collision(e) => Some(e),
            _ => None,
        }
    }

    /// Single-line JSON rendering for log sinks.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<GameEvent> for Event {
    fn from(value: GameEvent) -> Self {
        Event::Game(value)
    }
}

impl From<MovementEvent> for Event {
    fn from(value: MovementEvent) -> Self {
        Event::Movement(value)
    }
}

impl From<CollisionEvent> for Event {
    fn from(value: CollisionEvent) -> Self {
        Event::Collision(value)
    }
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_follows_record() {
        let moved: Event = GameEvent::new(GameEventKind::PieceMoved, "Moving").into();
        assert_eq!(moved.kind(), EventKind::PieceMoved);

        let movement: Event = MovementEvent::new(
            PieceKind::Pawn,
            Position::new(1, 1),
            Position::new(2, 1),
            MovementState::Move,
            MovementPhase::Started,
        )
        .into();
        assert_eq!(movement.kind(), EventKind::Movement);
        assert!(movement.as_movement().is_some());
        assert!(movement.as_game().is_none());

        let collision: Event = CollisionEvent::new(
            PieceKind::Rook,
            PieceKind::Knight,
            Position::new(3, 3),
            CollisionKind::PieceToPiece,
        )
        .into();
        assert_eq!(collision.kind(), EventKind::Collision);
    }

    #[test]
    fn timestamps_are_stamped_at_construction() {
        let event = GameEvent::new(GameEventKind::GameStarted, "start");
        assert!(event.timestamp_nanos > 0);
    }

    #[test]
    fn generic_kinds_map_onto_registry_kinds() {
        let kinds = [
            GameEventKind::PieceMoved,
            GameEventKind::PieceJump,
            GameEventKind::PieceCaptured,
            GameEventKind::GameStarted,
            GameEventKind::GameEnded,
        ];
        for kind in kinds {
            let event: Event = GameEvent::new(kind, "msg").into();
            assert_ne!(event.kind(), EventKind::Movement);
            assert_ne!(event.kind(), EventKind::Collision);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::to_value(event.kind()).unwrap()
            );
        }
    }

    #[test]
    fn json_rendering_is_tagged() {
        let event: Event = MovementEvent::new(
            PieceKind::Queen,
            Position::new(0, 3),
            Position::new(4, 7),
            MovementState::Move,
            MovementPhase::Completed,
        )
        .into();
        let json = event.to_json().unwrap();
        assert!(json.contains("\"type\":\"movement\""));
        assert!(json.contains("\"phase\":\"COMPLETED\""));
        assert!(json.contains("\"movement\":\"MOVE\""));
    }
}
