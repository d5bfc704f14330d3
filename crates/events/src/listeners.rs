//! Bundled log listeners for the move list.
//!
//! Both keep a bounded tail of messages: the oldest entry is dropped once
//! `capacity` is reached.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::bus::{Listener, ListenerError};
use crate::event::{Event, EventKind, GameEvent};

/// Messages kept by a logger built with `new()`.
pub const DEFAULT_LOG_CAPACITY: usize = 256;

#[derive(Debug)]
struct MessageLog {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl MessageLog {
    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY))),
            capacity,
        }
    }

    fn push(&self, message: String) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(message);
    }

    fn all(&self) -> Vec<String> {
        self.entries.lock().iter().cloned().collect()
    }

    fn recent(&self, n: usize) -> Vec<String> {
        let entries = self.entries.lock();
        let start = entries.len().saturating_sub(n);
        entries.range(start..).cloned().collect()
    }
}

fn game_record(event: &Event) -> Result<&GameEvent, ListenerError> {
    event
        .as_game()
        .ok_or_else(|| ListenerError::Rejected(format!("unexpected {:?} record", event.kind())))
}

/// Records `PieceMoved` messages in arrival order.
#[derive(Debug)]
pub struct MovesLogger {
    moves: MessageLog,
}

impl MovesLogger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Keep at most `capacity` messages (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            moves: MessageLog::with_capacity(capacity),
        }
    }

    /// Copy of the retained messages, oldest first.
    pub fn moves(&self) -> Vec<String> {
        self.moves.all()
    }

    /// The most recent `n` messages, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.moves.recent(n)
    }
}

impl Default for MovesLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for MovesLogger {
    fn kind(&self) -> EventKind {
        EventKind::PieceMoved
    }

    fn on_event(&self, event: &Event) -> Result<(), ListenerError> {
        let game = game_record(event)?;
        tracing::info!(target: "kfchess::moves", "Move: {}", game.message);
        self.moves.push(game.message.clone());
        Ok(())
    }
}

/// Records `PieceJump` messages.
#[derive(Debug)]
pub struct JumpsLogger {
    jumps: MessageLog,
}

impl JumpsLogger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jumps: MessageLog::with_capacity(capacity),
        }
    }

    pub fn jumps(&self) -> Vec<String> {
        self.jumps.all()
    }
}

impl Default for JumpsLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for JumpsLogger {
    fn kind(&self) -> EventKind {
        EventKind::PieceJump
    }

    fn on_event(&self, event: &Event) -> Result<(), ListenerError> {
        let game = game_record(event)?;
        tracing::info!(target: "kfchess::moves", "Jump: {}", game.message);
        self.jumps.push(game.message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{GameEvent, GameEventKind};
    use crate::EventBus;
    use std::sync::Arc;

    #[test]
    fn moves_logger_keeps_order_and_tail() {
        let bus = EventBus::new();
        let logger = Arc::new(MovesLogger::new());
        bus.subscribe(logger.clone());

        for i in 0..5 {
            bus.publish(GameEvent::new(GameEventKind::PieceMoved, format!("move {i}")));
        }

        assert_eq!(logger.moves().len(), 5);
        assert_eq!(logger.recent(2), vec!["move 3".to_string(), "move 4".to_string()]);
        assert_eq!(logger.recent(10).len(), 5);
    }

    #[test]
    fn jumps_logger_ignores_other_kinds() {
        let bus = EventBus::new();
        let logger = Arc::new(JumpsLogger::new());
        bus.subscribe(logger.clone());

        bus.publish(GameEvent::new(GameEventKind::PieceMoved, "not a jump"));
        bus.publish(GameEvent::new(GameEventKind::PieceJump, "Jump at (1, 1)"));

        assert_eq!(logger.jumps(), vec!["Jump at (1, 1)".to_string()]);
    }

    #[test]
    fn moves_logger_drops_oldest_past_capacity() {
        let bus = EventBus::new();
        let logger = Arc::new(MovesLogger::with_capacity(3));
        bus.subscribe(logger.clone());

        for i in 0..10 {
            bus.publish(GameEvent::new(GameEventKind::PieceMoved, format!("move {i}")));
        }

        assert_eq!(logger.moves(), vec!["move 7", "move 8", "move 9"]);
        assert_eq!(logger.recent(1), vec!["move 9".to_string()]);
    }
}
