//! Event bus module - decouples game state changes from their consumers
//!
//! Producers (commands, the game loop) publish immutable [`Event`] records;
//! consumers (move lists, audio, UI) register a [`Listener`] for one
//! [`EventKind`]. The bus is an explicit instance, built once at startup and
//! shared as `Arc<EventBus>` with everything that publishes or subscribes.
//!
//! # Event Kinds
//!
//! | Kind | Record | Emitted when |
//! |------|--------|--------------|
//! | `PieceMoved` | [`GameEvent`] | a move command is accepted or rejected |
//! | `PieceJump` | [`GameEvent`] | a jump command is accepted |
//! | `PieceCaptured` | [`GameEvent`] | a move lands on an opponent piece |
//! | `GameStarted` / `GameEnded` | [`GameEvent`] | match lifecycle |
//! | `Movement` | [`MovementEvent`] | a motion starts or completes |
//! | `Collision` | [`CollisionEvent`] | capture contact or jump landing |
//!
//! # Threading
//!
//! `subscribe`, `unsubscribe` and `publish` may be called from any thread.
//! See [`bus`] for the snapshot-per-publish strategy.

pub mod bus;
pub mod event;
pub mod listeners;

pub use kfchess_types as types;

pub use bus::{
    listener_fn, DispatchOutcome, EventBus, FnListener, Listener, ListenerError, PublishReport,
    Subscription,
};
pub use event::{
    CollisionEvent, CollisionKind, Event, EventKind, GameEvent, GameEventKind, MovementEvent,
    MovementPhase,
};
pub use listeners::{JumpsLogger, MovesLogger, DEFAULT_LOG_CAPACITY};
