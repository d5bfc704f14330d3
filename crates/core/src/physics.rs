//! Physics module - continuous-time movement between tiles
//!
//! A piece does not teleport: when a move is issued its [`PhysicsData`] is
//! reset with a start tile, a target tile and the current clock time. Each
//! tick `update(now)` recomputes the travelled fraction from elapsed time and
//! speed, and interpolates the pixel position along the straight line between
//! the two tiles.
//!
//! Coordinates: `x = col * tile_size`, `y = row * tile_size`.
//!
//! Invariants:
//! - the fraction is clamped to `[0, 1]`, so the position never overshoots
//! - once finished, the position equals the target exactly (no float drift)
//! - a zero-distance reset (`from == to`) is finished immediately

use crate::error::PhysicsError;
use crate::types::{MovementState, Position, DEFAULT_MOVE_SPEED, NANOS_PER_SEC};

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsData {
    speed: f64,
    state: MovementState,
    next_state_when_finished: MovementState,
    start: Position,
    target: Position,
    tile_size: f64,
    start_time_nanos: i64,
    progress: f64,
    current_x: f64,
    current_y: f64,
}

impl PhysicsData {
    /// `speed` is in pixel units per second and must be positive and finite.
    pub fn new(speed: f64, state: MovementState) -> Result<Self, PhysicsError> {
        check_speed(speed)?;
        Ok(Self {
            speed,
            state,
            ..Self::default()
        })
    }

    /// Start a new motion from scratch. Any motion in flight is discarded.
    pub fn reset(
        &mut self,
        state: MovementState,
        from: Position,
        to: Position,
        tile_size: f64,
        now_nanos: i64,
    ) {
        self.state = state;
        self.start = from;
        self.target = to;
        self.tile_size = tile_size;
        self.start_time_nanos = now_nanos;
        self.progress = if self.total_distance() > 0.0 { 0.0 } else { 1.0 };
        self.apply_progress();
    }

    /// Advance the interpolation to `now_nanos`.
    pub fn update(&mut self, now_nanos: i64) {
        self.progress = self.progress_at(now_nanos);
        self.apply_progress();
    }

    /// Fraction of the path covered at `now_nanos`, in `[0, 1]`.
    ///
    /// Pure: depends only on elapsed time, speed and distance. Times before the
    /// start of the motion count as zero elapsed.
    pub fn progress_at(&self, now_nanos: i64) -> f64 {
        let total = self.total_distance();
        if total <= 0.0 {
            return 1.0;
        }
        let elapsed_nanos = now_nanos.saturating_sub(self.start_time_nanos).max(0);
        let elapsed_secs = elapsed_nanos as f64 / NANOS_PER_SEC as f64;
        (elapsed_secs * self.speed / total).min(1.0)
    }

    pub fn is_movement_finished(&self) -> bool {
        self.progress >= 1.0
    }

    /// Same as [`is_movement_finished`](Self::is_movement_finished) evaluated
    /// at an arbitrary time, without mutating.
    pub fn is_finished_at(&self, now_nanos: i64) -> bool {
        self.progress_at(now_nanos) >= 1.0
    }

    /// Straight-line distance between the start and target tiles in pixel units.
    pub fn total_distance(&self) -> f64 {
        let (d_row, d_col) = self.start.delta_to(self.target);
        (d_row as f64 * self.tile_size).hypot(d_col as f64 * self.tile_size)
    }

    /// Time the current motion takes from reset to completion.
    pub fn duration_nanos(&self) -> i64 {
        let secs = self.total_distance() / self.speed;
        (secs * NANOS_PER_SEC as f64).ceil() as i64
    }

    fn apply_progress(&mut self) {
        let (sx, sy) = self.pixel(self.start);
        let (tx, ty) = self.pixel(self.target);
        if self.progress >= 1.0 {
            self.current_x = tx;
            self.current_y = ty;
        } else {
            self.current_x = sx + (tx - sx) * self.progress;
            self.current_y = sy + (ty - sy) * self.progress;
        }
    }

    fn pixel(&self, at: Position) -> (f64, f64) {
        (at.col as f64 * self.tile_size, at.row as f64 * self.tile_size)
    }

    pub fn current_x(&self) -> f64 {
        self.current_x
    }

    pub fn current_y(&self) -> f64 {
        self.current_y
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn start_time_nanos(&self) -> i64 {
        self.start_time_nanos
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Takes effect for the motion in flight too.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PhysicsError> {
        check_speed(speed)?;
        self.speed = speed;
        Ok(())
    }

    pub fn next_state_when_finished(&self) -> MovementState {
        self.next_state_when_finished
    }

    pub fn set_next_state_when_finished(&mut self, state: MovementState) {
        self.next_state_when_finished = state;
    }
}

impl Default for PhysicsData {
    /// Idle at the origin, moving at [`DEFAULT_MOVE_SPEED`] once reset.
    fn default() -> Self {
        Self {
            speed: DEFAULT_MOVE_SPEED,
            state: MovementState::Idle,
            next_state_when_finished: MovementState::Idle,
            start: Position::new(0, 0),
            target: Position::new(0, 0),
            tile_size: 0.0,
            start_time_nanos: 0,
            progress: 1.0,
            current_x: 0.0,
            current_y: 0.0,
        }
    }
}

fn check_speed(speed: f64) -> Result<(), PhysicsError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::NonPositiveSpeed(speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: i64 = NANOS_PER_SEC;

    fn moving(speed: f64, from: Position, to: Position, tile: f64) -> PhysicsData {
        let mut p = PhysicsData::new(speed, MovementState::Idle).unwrap();
        p.reset(MovementState::Move, from, to, tile, 0);
        p
    }

    #[test]
    fn initial_position_is_start_tile() {
        let p = moving(1.0, Position::new(0, 0), Position::new(0, 3), 100.0);
        assert_eq!(p.current_x(), 0.0);
        assert_eq!(p.current_y(), 0.0);
        assert!(!p.is_movement_finished());
        assert_eq!(p.next_state_when_finished(), MovementState::Idle);
    }

    #[test]
    fn update_moves_along_column_axis_only() {
        let mut p = moving(300.0, Position::new(0, 0), Position::new(0, 3), 100.0);
        p.update(SEC / 20);
        assert!(p.current_x() > 0.0);
        assert_eq!(p.current_y(), 0.0);
        assert!((p.current_x() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_move_finishes_exactly_on_target() {
        // 300 units at 300 units/s.
        let mut p = moving(300.0, Position::new(2, 3), Position::new(5, 3), 100.0);
        assert_eq!(p.total_distance(), 300.0);
        assert_eq!(p.duration_nanos(), SEC);

        p.update(SEC / 2);
        assert!(!p.is_movement_finished());
        assert!((p.current_y() - 350.0).abs() < 1e-9);
        assert_eq!(p.current_x(), 300.0);

        p.update(SEC - 1);
        assert!(!p.is_movement_finished());

        p.update(SEC);
        assert!(p.is_movement_finished());
        assert_eq!(p.current_y(), 500.0);
        assert_eq!(p.current_x(), 300.0);
    }

    #[test]
    fn never_overshoots() {
        let mut p = moving(1000.0, Position::new(0, 0), Position::new(2, 2), 64.0);
        let mut last = (0.0, 0.0);
        for ms in (0..2000).step_by(7) {
            p.update(ms * 1_000_000);
            assert!(p.current_x() <= 128.0 && p.current_y() <= 128.0);
            assert!(p.current_x() >= last.0 && p.current_y() >= last.1);
            last = (p.current_x(), p.current_y());
        }
        assert!(p.is_movement_finished());
        assert_eq!((p.current_x(), p.current_y()), (128.0, 128.0));
    }

    #[test]
    fn backward_motion_approaches_from_above() {
        let mut p = moving(64.0, Position::new(4, 4), Position::new(4, 1), 64.0);
        p.update(SEC);
        assert_eq!(p.current_x(), 192.0);
        p.update(10 * SEC);
        assert_eq!(p.current_x(), 64.0);
    }

    #[test]
    fn zero_distance_is_finished_immediately() {
        let mut p = moving(5.0, Position::new(3, 3), Position::new(3, 3), 64.0);
        assert!(p.is_movement_finished());
        assert_eq!(p.duration_nanos(), 0);
        p.update(0);
        assert!(p.is_movement_finished());
        assert_eq!((p.current_x(), p.current_y()), (192.0, 192.0));
    }

    #[test]
    fn reset_discards_motion_in_flight() {
        let mut p = moving(100.0, Position::new(0, 0), Position::new(0, 4), 100.0);
        p.update(2 * SEC);
        assert_eq!(p.current_x(), 200.0);

        p.reset(MovementState::Move, Position::new(0, 2), Position::new(3, 2), 100.0, 2 * SEC);
        assert_eq!((p.current_x(), p.current_y()), (200.0, 0.0));
        assert_eq!(p.start_time_nanos(), 2 * SEC);
        p.update(3 * SEC);
        assert_eq!(p.current_y(), 100.0);
    }

    #[test]
    fn time_before_start_counts_as_zero() {
        let mut p = PhysicsData::new(10.0, MovementState::Idle).unwrap();
        p.reset(MovementState::Move, Position::new(0, 0), Position::new(1, 0), 10.0, 5 * SEC);
        p.update(SEC);
        assert_eq!(p.progress(), 0.0);
        assert_eq!(p.current_y(), 0.0);
    }

    #[test]
    fn finished_is_a_function_of_time_and_speed() {
        let p = moving(1_000_000.0, Position::new(0, 0), Position::new(0, 3), 100.0);
        assert!(!p.is_finished_at(0));
        assert!(p.is_finished_at(SEC / 1000));
        // Querying does not mutate.
        assert!(!p.is_movement_finished());
    }

    #[test]
    fn rejects_non_positive_speed() {
        assert_eq!(
            PhysicsData::new(0.0, MovementState::Idle),
            Err(PhysicsError::NonPositiveSpeed(0.0))
        );
        assert!(PhysicsData::new(-1.0, MovementState::Idle).is_err());
        assert!(PhysicsData::new(f64::INFINITY, MovementState::Idle).is_err());

        let mut p = PhysicsData::new(1.0, MovementState::Idle).unwrap();
        assert!(p.set_speed(f64::NAN).is_err());
        assert_eq!(p.speed(), 1.0);
        p.set_speed(5.5).unwrap();
        assert_eq!(p.speed(), 5.5);
    }

    #[test]
    fn next_state_is_configurable() {
        let mut p = PhysicsData::new(1.0, MovementState::Idle).unwrap();
        p.set_next_state_when_finished(MovementState::LongRest);
        assert_eq!(p.next_state_when_finished(), MovementState::LongRest);
        p.reset(MovementState::Jump, Position::new(1, 1), Position::new(1, 1), 64.0, 0);
        assert_eq!(p.next_state_when_finished(), MovementState::LongRest);
    }
}
