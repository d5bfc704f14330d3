//! Game module - match lifecycle and the tick pipeline
//!
//! # Tick
//!
//! `update()` is called once per frame by the driver and never concurrently
//! with itself. Each call:
//!
//! 1. reads the clock once
//! 2. ticks every piece; finished motions publish `Movement/Completed` (and
//!    `Collision/JumpLanding` for jumps)
//! 3. drains the command queue in FIFO order, executing each command
//! 4. marks a player failed when its last king was captured, and publishes
//!    `GameEnded` the first time a winner exists
//!
//! Once the match has ended, queued commands are dropped unexecuted and
//! selections queue nothing, so the decided winner stands. Pieces keep
//! ticking until their motions settle.
//!
//! Pieces are ticked before commands run, so a motion started this tick is
//! first advanced on the next one.

use std::collections::VecDeque;
use std::sync::Arc;

use kfchess_events::{
    CollisionEvent, CollisionKind, EventBus, GameEvent, GameEventKind, MovementEvent,
    MovementPhase,
};

use crate::board::Board;
use crate::clock::{Clock, SystemClock};
use crate::command::{CapturedPiece, Command, CommandOutcome, ExecContext};
use crate::config::GameConfig;
use crate::error::Result;
use crate::layout::STANDARD_LAYOUT;
use crate::piece::MotionCompleted;
use crate::player::{CursorPlayer, Player};
use crate::snapshot::GameSnapshot;
use crate::types::{CursorAction, MovementState, PieceKind, PlayerId, Winner};

/// What a single `update` did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub now_nanos: i64,
    pub applied: usize,
    pub rejected: usize,
    /// Commands discarded because the match was already over.
    pub dropped: usize,
    pub captures: Vec<CapturedPiece>,
    pub completed: Vec<MotionCompleted>,
    /// Set on the tick the match ended.
    pub ended: Option<Winner>,
}

pub struct Game {
    board: Board,
    player1: Box<dyn Player>,
    player2: Box<dyn Player>,
    commands: VecDeque<Box<dyn Command>>,
    bus: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    started: bool,
    ended: bool,
}

impl Game {
    pub fn new(
        board: Board,
        player1: Box<dyn Player>,
        player2: Box<dyn Player>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            board,
            player1,
            player2,
            commands: VecDeque::new(),
            bus,
            clock: Arc::new(SystemClock::new()),
            started: false,
            ended: false,
        }
    }

    /// Standard chess start on a board tuned by `config`, with two cursor
    /// players.
    ///
    /// Fails when `config` is invalid or its board size does not fit the
    /// 8x8 layout.
    pub fn standard(config: &GameConfig, bus: Arc<EventBus>) -> Result<Self> {
        let mut board = Board::from_config(config)?;
        board.populate(&STANDARD_LAYOUT)?;
        let player1 = Box::new(CursorPlayer::for_board(PlayerId::One, &board));
        let player2 = Box::new(CursorPlayer::for_board(PlayerId::Two, &board));
        Ok(Self::new(board, player1, player2, bus))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Publish `GameStarted`. Returns false if the game was already started.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        tracing::info!(
            player1 = self.player1.name(),
            player2 = self.player2.name(),
            "game started"
        );
        self.bus.publish(GameEvent::new(
            GameEventKind::GameStarted,
            format!(
                "Game started: {} vs {}",
                self.player1.name(),
                self.player2.name()
            ),
        ));
        true
    }

    /// Queue a command for the next `update`.
    pub fn add_command(&mut self, command: Box<dyn Command>) {
        self.commands.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Ask `id` for a command and queue it if one comes back. Does nothing
    /// after the match has ended.
    pub fn handle_selection(&mut self, id: PlayerId) {
        if self.ended {
            return;
        }
        let player = match id {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        };
        if let Some(command) = player.handle_selection(&self.board) {
            tracing::debug!(player = %id, ?command, "command queued");
            self.commands.push_back(command);
        }
    }

    /// Route cursor input to a player. `Select` goes through
    /// [`handle_selection`](Self::handle_selection).
    pub fn apply_cursor_action(&mut self, id: PlayerId, action: CursorAction) {
        if action == CursorAction::Select {
            self.handle_selection(id);
        } else if let Some(cursor) = self.player_mut(id).cursor_mut() {
            cursor.apply(action);
        }
    }

    pub fn update(&mut self) -> TickReport {
        let now_nanos = self.clock.now_nanos();
        let mut report = TickReport {
            now_nanos,
            ..TickReport::default()
        };

        report.completed = self.board.update_pieces(now_nanos);
        for done in &report.completed {
            self.publish_completion(done);
        }

        if self.ended {
            report.dropped = self.commands.len();
            if report.dropped > 0 {
                tracing::debug!(dropped = report.dropped, "match over, commands dropped");
            }
            self.commands.clear();
            return report;
        }

        let mut ctx = ExecContext {
            board: &mut self.board,
            bus: &self.bus,
            now_nanos,
        };
        while let Some(command) = self.commands.pop_front() {
            match command.execute(&mut ctx) {
                CommandOutcome::Rejected => report.rejected += 1,
                CommandOutcome::Applied { captured } => {
                    report.applied += 1;
                    report.captures.extend(captured);
                }
            }
        }

        for captured in &report.captures {
            if captured.kind == PieceKind::King && !self.board.has_king(captured.owner) {
                tracing::info!(player = %captured.owner, at = %captured.at, "king captured");
                self.player_mut(captured.owner).mark_failed();
            }
        }

        let winner = self.win();
        if winner.is_decided() {
            self.ended = true;
            report.ended = Some(winner);
            tracing::info!(?winner, "game ended");
            self.bus.publish(GameEvent::new(
                GameEventKind::GameEnded,
                format!("Game over: {winner:?} wins"),
            ));
        }

        report
    }

    fn publish_completion(&self, done: &MotionCompleted) {
        self.bus.publish(MovementEvent::new(
            done.kind,
            done.from,
            done.to,
            done.movement,
            MovementPhase::Completed,
        ));
        if done.movement == MovementState::Jump {
            self.bus.publish(CollisionEvent::new(
                done.kind,
                done.kind,
                done.to,
                CollisionKind::JumpLanding,
            ));
        }
    }

    /// Player two wins iff player one failed, and vice versa.
    ///
    /// When both players have failed this reports `Winner::None`, the same as
    /// when neither has.
    pub fn win(&self) -> Winner {
        match (self.player1.is_failed(), self.player2.is_failed()) {
            (true, false) => Winner::Player2,
            (false, true) => Winner::Player1,
            _ => Winner::None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn player(&self, id: PlayerId) -> &dyn Player {
        match id {
            PlayerId::One => self.player1.as_ref(),
            PlayerId::Two => self.player2.as_ref(),
        }
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut dyn Player {
        match id {
            PlayerId::One => self.player1.as_mut(),
            PlayerId::Two => self.player2.as_mut(),
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }
}
