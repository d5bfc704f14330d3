//! A single piece and its movement state machine.
//!
//! ```text
//!   IDLE ──move──▶ MOVE ──arrive──▶ LONG_REST ──rest over──▶ IDLE
//!   IDLE ──jump──▶ JUMP ──land────▶ SHORT_REST ─rest over──▶ IDLE
//! ```
//!
//! Motion is driven only by explicit `begin_*` calls and by physics
//! completion observed in [`Piece::update`].

use crate::config::RestDurations;
use crate::error::PhysicsError;
use crate::physics::PhysicsData;
use crate::types::{MovementState, PieceKind, PlayerId, Position};

/// Reported by [`Piece::update`] on the tick a motion finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionCompleted {
    pub kind: PieceKind,
    pub owner: PlayerId,
    pub from: Position,
    pub to: Position,
    /// The motion that finished (`Move` or `Jump`).
    pub movement: MovementState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    kind: PieceKind,
    owner: PlayerId,
    position: Position,
    state: MovementState,
    physics: PhysicsData,
    rest_started_nanos: i64,
}

impl Piece {
    pub fn new(
        kind: PieceKind,
        owner: PlayerId,
        position: Position,
        tile_size: f64,
        speed: f64,
    ) -> Result<Self, PhysicsError> {
        let physics = PhysicsData::new(speed, MovementState::Idle)?;
        Ok(Self::with_physics(kind, owner, position, physics, tile_size))
    }

    /// Build from already-validated physics, parked idle at `position`.
    pub fn with_physics(
        kind: PieceKind,
        owner: PlayerId,
        position: Position,
        mut physics: PhysicsData,
        tile_size: f64,
    ) -> Self {
        physics.reset(MovementState::Idle, position, position, tile_size, 0);
        Self {
            kind,
            owner,
            position,
            state: MovementState::Idle,
            physics,
            rest_started_nanos: 0,
        }
    }

    /// Start travelling from the current tile to `to`. The logical position
    /// switches to `to` immediately; only the drawn position interpolates.
    pub(crate) fn begin_move(&mut self, to: Position, tile_size: f64, now_nanos: i64) {
        let from = self.position;
        self.position = to;
        self.start_motion(MovementState::Move, from, to, tile_size, now_nanos);
    }

    /// Jump in place.
    pub(crate) fn begin_jump(&mut self, tile_size: f64, now_nanos: i64) {
        let at = self.position;
        self.start_motion(MovementState::Jump, at, at, tile_size, now_nanos);
    }

    fn start_motion(
        &mut self,
        state: MovementState,
        from: Position,
        to: Position,
        tile_size: f64,
        now_nanos: i64,
    ) {
        self.state = state;
        self.physics
            .set_next_state_when_finished(state.settles_into());
        self.physics.reset(state, from, to, tile_size, now_nanos);
    }

    /// Advance physics and apply any state transition that is due.
    pub fn update(&mut self, now_nanos: i64, rests: &RestDurations) -> Option<MotionCompleted> {
        match self.state {
            MovementState::Move | MovementState::Jump => {
                self.physics.update(now_nanos);
                if !self.physics.is_movement_finished() {
                    return None;
                }
                let movement = self.state;
                let (from, to) = (self.physics.start(), self.physics.target());
                let next = self.physics.next_state_when_finished();
                // A motion never chains straight into another motion.
                let settled = if next.is_in_motion() {
                    MovementState::Idle
                } else {
                    next
                };
                self.settle(settled, now_nanos);
                self.rest_started_nanos = now_nanos;
                Some(MotionCompleted {
                    kind: self.kind,
                    owner: self.owner,
                    from,
                    to,
                    movement,
                })
            }
            MovementState::ShortRest | MovementState::LongRest => {
                let rested = now_nanos.saturating_sub(self.rest_started_nanos);
                if rested >= rests.for_state(self.state) {
                    self.settle(MovementState::Idle, now_nanos);
                }
                None
            }
            MovementState::Idle => None,
        }
    }

    /// Park on the current tile in `state`, clearing the finished motion.
    fn settle(&mut self, state: MovementState, now_nanos: i64) {
        let at = self.position;
        let tile_size = self.physics.tile_size();
        self.state = state;
        self.physics.set_next_state_when_finished(MovementState::Idle);
        self.physics.reset(state, at, at, tile_size, now_nanos);
    }

    /// True while travelling or jumping. Such a piece cannot take a new command.
    pub fn is_in_motion(&self) -> bool {
        self.state.is_in_motion()
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn physics(&self) -> &PhysicsData {
        &self.physics
    }

    /// Drawn position in pixel units.
    pub fn pixel_position(&self) -> (f64, f64) {
        (self.physics.current_x(), self.physics.current_y())
    }

    pub fn is_opponent_of(&self, other: &Piece) -> bool {
        self.owner != other.owner
    }

    /// Piece code, upper case for player one and lower case for player two.
    pub fn code(&self) -> char {
        match self.owner {
            PlayerId::One => self.kind.code(),
            PlayerId::Two => self.kind.code().to_ascii_lowercase(),
        }
    }
}
