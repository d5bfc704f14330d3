//! Commands - one intended action each, executed at most once
//!
//! A command is created by a player, queued on the game, and consumed by
//! [`Command::execute`] during the next `Game::update`. Execution checks
//! legality against the board, mutates it when legal, and publishes what
//! happened. Illegal commands are not errors: they are reported as events and
//! leave the board untouched.

use std::fmt;

use kfchess_events::{
    CollisionEvent, CollisionKind, EventBus, GameEvent, GameEventKind, MovementEvent,
    MovementPhase,
};

use crate::board::Board;
use crate::types::{MovementState, PieceKind, PlayerId, Position};

/// What a command needs while it runs.
pub struct ExecContext<'a> {
    pub board: &'a mut Board,
    pub bus: &'a EventBus,
    pub now_nanos: i64,
}

/// A piece removed from the board by a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedPiece {
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub at: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Illegal; the board is unchanged.
    Rejected,
    Applied { captured: Option<CapturedPiece> },
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied { .. })
    }

    pub fn captured(&self) -> Option<CapturedPiece> {
        match self {
            CommandOutcome::Applied { captured } => *captured,
            CommandOutcome::Rejected => None,
        }
    }
}

pub trait Command: fmt::Debug + Send {
    fn execute(self: Box<Self>, ctx: &mut ExecContext<'_>) -> CommandOutcome;
}

/// Move the piece on `from` to `to`, capturing any opponent there.
///
/// Rejected while the piece is still travelling or jumping: its drawn position
/// has not reached `from` yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub from: Position,
    pub to: Position,
}

impl MoveCommand {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl Command for MoveCommand {
    fn execute(self: Box<Self>, ctx: &mut ExecContext<'_>) -> CommandOutcome {
        let MoveCommand { from, to } = *self;

        let mover = match ctx.board.get(from) {
            Some(piece) if !piece.is_in_motion() && ctx.board.is_move_legal(from, to) => {
                piece.kind()
            }
            _ => {
                let message = format!("Illegal move from {from} to {to}");
                tracing::debug!("{message}");
                ctx.bus.publish(GameEvent::new(GameEventKind::PieceMoved, message));
                return CommandOutcome::Rejected;
            }
        };

        ctx.bus.publish(GameEvent::new(
            GameEventKind::PieceMoved,
            format!("Moving {mover} from {from} to {to}"),
        ));
        ctx.bus.publish(MovementEvent::new(
            mover,
            from,
            to,
            MovementState::Move,
            MovementPhase::Started,
        ));

        let captured = ctx
            .board
            .move_piece(from, to, ctx.now_nanos)
            .map(|victim| CapturedPiece {
                kind: victim.kind(),
                owner: victim.owner(),
                at: to,
            });

        if let Some(victim) = captured {
            tracing::debug!(attacker = %mover, victim = %victim.kind, at = %to, "capture");
            ctx.bus.publish(GameEvent::new(
                GameEventKind::PieceCaptured,
                format!("{mover} captured {} {} at {to}", victim.owner, victim.kind),
            ));
            ctx.bus.publish(CollisionEvent::new(
                mover,
                victim.kind,
                to,
                CollisionKind::PieceToPiece,
            ));
        }

        CommandOutcome::Applied { captured }
    }
}

/// Jump the piece on `at` in place. Rejected while the piece is in motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpCommand {
    pub at: Position,
}

impl JumpCommand {
    pub fn new(at: Position) -> Self {
        Self { at }
    }
}

impl Command for JumpCommand {
    fn execute(self: Box<Self>, ctx: &mut ExecContext<'_>) -> CommandOutcome {
        let at = self.at;
        let idle_kind = ctx
            .board
            .get(at)
            .filter(|piece| !piece.is_in_motion())
            .map(|piece| piece.kind());
        let Some(kind) = idle_kind else {
            let message = format!("Illegal jump at {at}");
            tracing::debug!("{message}");
            ctx.bus.publish(GameEvent::new(GameEventKind::PieceJump, message));
            return CommandOutcome::Rejected;
        };

        ctx.bus.publish(GameEvent::new(
            GameEventKind::PieceJump,
            format!("Jump at {at} by {kind}"),
        ));
        ctx.bus.publish(MovementEvent::new(
            kind,
            at,
            at,
            MovementState::Jump,
            MovementPhase::Started,
        ));
        ctx.board.jump_piece(at, ctx.now_nanos);
        CommandOutcome::Applied { captured: None }
    }
}
