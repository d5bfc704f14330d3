//! EventBus tests - delivery, isolation and concurrency

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use kfchess::events::{
    listener_fn, Event, EventBus, EventKind, GameEvent, GameEventKind, Listener, ListenerError,
    MovementEvent, MovementPhase,
};
use kfchess::types::{MovementState, PieceKind, Position};

/// Counts deliveries of one kind.
struct Counter {
    kind: EventKind,
    hits: AtomicUsize,
}

impl Counter {
    fn new(kind: EventKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            hits: AtomicUsize::new(0),
        })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Listener for Counter {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn on_event(&self, _event: &Event) -> Result<(), ListenerError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn moved(message: &str) -> GameEvent {
    GameEvent::new(GameEventKind::PieceMoved, message)
}

#[test]
fn test_each_listener_gets_each_publish_once() {
    let bus = EventBus::new();
    let a = Counter::new(EventKind::PieceMoved);
    let b = Counter::new(EventKind::PieceMoved);
    bus.subscribe(a.clone());
    bus.subscribe(b.clone());

    for i in 0..3 {
        let report = bus.publish(moved(&format!("move {i}")));
        assert_eq!(report.delivered(), 2);
    }
    assert_eq!(a.hits(), 3);
    assert_eq!(b.hits(), 3);
}

#[test]
fn test_unsubscribe_stops_later_deliveries() {
    let bus = EventBus::new();
    let counter = Counter::new(EventKind::PieceMoved);
    let sub = bus.subscribe(counter.clone());

    bus.publish(moved("first"));
    assert!(bus.unsubscribe(&sub));
    assert!(!bus.unsubscribe(&sub));
    bus.publish(moved("second"));

    assert_eq!(counter.hits(), 1);
    assert_eq!(bus.listener_count(EventKind::PieceMoved), 0);
}

#[test]
fn test_unsubscribe_by_listener_identity() {
    let bus = EventBus::new();
    let counter = Counter::new(EventKind::GameStarted);
    bus.subscribe(counter.clone());
    bus.subscribe(counter.clone());
    assert_eq!(bus.listener_count(EventKind::GameStarted), 2);

    assert_eq!(bus.unsubscribe_listener(&counter), 2);
    bus.publish(GameEvent::new(GameEventKind::GameStarted, "go"));
    assert_eq!(counter.hits(), 0);
}

#[test]
fn test_failing_listener_does_not_block_others() {
    let bus = EventBus::new();
    bus.subscribe(Arc::new(listener_fn(EventKind::PieceMoved, |_| {
        Err(ListenerError::Rejected("disk full".into()))
    })));
    bus.subscribe(Arc::new(listener_fn(EventKind::PieceMoved, |_| {
        panic!("listener bug")
    })));
    let survivor = Counter::new(EventKind::PieceMoved);
    bus.subscribe(survivor.clone());

    let report = bus.publish(moved("e2e4"));

    assert_eq!(survivor.hits(), 1);
    assert_eq!(report.listener_count(), 3);
    assert_eq!(report.delivered(), 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 2);
    assert!(matches!(
        failures[0].result,
        Err(ListenerError::Rejected(_))
    ));
    assert!(matches!(
        failures[1].result,
        Err(ListenerError::Panicked(_))
    ));
}

#[test]
fn test_kinds_are_routed_separately() {
    let bus = EventBus::new();
    let movement = Counter::new(EventKind::Movement);
    let moved_counter = Counter::new(EventKind::PieceMoved);
    bus.subscribe(movement.clone());
    bus.subscribe(moved_counter.clone());

    bus.publish(MovementEvent::new(
        PieceKind::Knight,
        Position::new(0, 1),
        Position::new(2, 2),
        MovementState::Move,
        MovementPhase::Started,
    ));
    assert_eq!(movement.hits(), 1);
    assert_eq!(moved_counter.hits(), 0);
}

#[test]
fn test_concurrent_publishers_lose_nothing() {
    const THREADS: usize = 8;
    const EVENTS: usize = 500;

    let bus = Arc::new(EventBus::new());
    let counter = Counter::new(EventKind::PieceMoved);
    bus.subscribe(counter.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let bus = bus.clone();
            thread::spawn(move || {
                for i in 0..EVENTS {
                    bus.publish(moved(&format!("t{t} #{i}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counter.hits(), THREADS * EVENTS);
}

#[test]
fn test_subscribe_churn_during_publish() {
    let bus = Arc::new(EventBus::new());
    let steady = Counter::new(EventKind::PieceMoved);
    bus.subscribe(steady.clone());

    let churn = {
        let bus = bus.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                let extra = Counter::new(EventKind::PieceMoved);
                let sub = bus.subscribe(extra);
                bus.unsubscribe(&sub);
            }
        })
    };
    for i in 0..200 {
        bus.publish(moved(&format!("{i}")));
    }
    churn.join().unwrap();

    assert_eq!(steady.hits(), 200);
    assert_eq!(bus.listener_count(EventKind::PieceMoved), 1);
}
