//! Typed publish/subscribe registry.
//!
//! The registry maps each [`EventKind`] to an immutable, reference-counted
//! listener list. Writers (subscribe/unsubscribe) build a new list and swap it
//! in under a short write lock; `publish` clones the current `Arc` under a read
//! lock and dispatches from that snapshot with no lock held. Consequences:
//!
//! - a slow listener never blocks subscribe/unsubscribe or other publishers
//! - listeners may subscribe/unsubscribe from inside `on_event`
//! - a listener added during a dispatch does not see the in-flight event
//!
//! Delivery is synchronous, on the publishing thread, in registration order.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::event::{Event, EventKind};

/// Failure reported by a single listener. Never propagates to the publisher.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("listener rejected event: {0}")]
    Rejected(String),

    #[error("listener panicked: {0}")]
    Panicked(String),
}

/// A subscriber for one event kind.
pub trait Listener: Send + Sync {
    /// The kind this listener is registered under.
    fn kind(&self) -> EventKind;

    fn on_event(&self, event: &Event) -> Result<(), ListenerError>;
}

/// Closure-backed listener, see [`listener_fn`].
pub struct FnListener<F> {
    kind: EventKind,
    f: F,
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync,
{
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn on_event(&self, event: &Event) -> Result<(), ListenerError> {
        (self.f)(event)
    }
}

/// Wrap a closure as a listener for `kind`.
///
/// ```
/// use std::sync::Arc;
/// use kfchess_events::{listener_fn, EventBus, EventKind, GameEvent, GameEventKind};
///
/// let bus = EventBus::new();
/// let sub = bus.subscribe(Arc::new(listener_fn(EventKind::GameStarted, |_| Ok(()))));
/// let report = bus.publish(GameEvent::new(GameEventKind::GameStarted, "go"));
/// assert_eq!(report.delivered(), 1);
/// assert!(bus.unsubscribe(&sub));
/// ```
pub fn listener_fn<F>(kind: EventKind, f: F) -> FnListener<F>
where
    F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync,
{
    FnListener { kind, f }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// Result of delivering one event to one listener.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub subscription: Subscription,
    pub result: Result<(), ListenerError>,
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-listener outcomes of a single `publish` call.
#[derive(Debug)]
pub struct PublishReport {
    kind: EventKind,
    outcomes: Vec<DispatchOutcome>,
}

impl PublishReport {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Number of listeners in the dispatch snapshot.
    pub fn listener_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DispatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_delivered())
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(DispatchOutcome::is_delivered)
    }

    pub fn outcomes(&self) -> &[DispatchOutcome] {
        &self.outcomes
    }
}

#[derive(Clone)]
struct Entry {
    id: u64,
    listener: Arc<dyn Listener>,
}

type Slot = Arc<Vec<Entry>>;

/// Thread-safe event bus. Construct once and share it as `Arc<EventBus>`.
pub struct EventBus {
    slots: RwLock<HashMap<EventKind, Slot>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `listener` under the kind it declares. Registration order is
    /// delivery order.
    pub fn subscribe(&self, listener: Arc<dyn Listener>) -> Subscription {
        let kind = listener.kind();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut slots = self.slots.write();
        let slot = slots.entry(kind).or_default();
        let mut next = Vec::with_capacity(slot.len() + 1);
        next.extend(slot.iter().cloned());
        next.push(Entry { id, listener });
        *slot = Arc::new(next);
        drop(slots);

        tracing::debug!(?kind, id, "listener subscribed");
        Subscription { id, kind }
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let removed = self.remove_where(subscription.kind, |e| e.id == subscription.id);
        if removed > 0 {
            tracing::debug!(kind = ?subscription.kind, id = subscription.id, "listener unsubscribed");
        }
        removed > 0
    }

    /// Remove every registration of this exact listener instance (pointer
    /// identity). Returns how many registrations were removed.
    pub fn unsubscribe_listener<L>(&self, listener: &Arc<L>) -> usize
    where
        L: Listener + ?Sized,
    {
        let target = Arc::as_ptr(listener).cast::<()>();
        let kind = listener.kind();
        let removed = self.remove_where(kind, |e| Arc::as_ptr(&e.listener).cast::<()>() == target);
        if removed > 0 {
            tracing::debug!(?kind, removed, "listener unsubscribed");
        }
        removed
    }

    fn remove_where(&self, kind: EventKind, pred: impl Fn(&Entry) -> bool) -> usize {
        let mut slots = self.slots.write();
        let Some(slot) = slots.get_mut(&kind) else {
            return 0;
        };

        let before = slot.len();
        let next: Vec<Entry> = slot.iter().filter(|e| !pred(e)).cloned().collect();
        let removed = before - next.len();
        if removed == 0 {
            return 0;
        }

        if next.is_empty() {
            slots.remove(&kind);
        } else {
            *slot = Arc::new(next);
        }
        removed
    }

    /// Deliver `event` to every listener registered for its kind.
    ///
    /// Listener errors and panics are caught, logged and reported in the
    /// returned [`PublishReport`]; delivery continues with the next listener.
    pub fn publish(&self, event: impl Into<Event>) -> PublishReport {
        let event = event.into();
        let kind = event.kind();

        let snapshot = self.slots.read().get(&kind).cloned();
        let Some(snapshot) = snapshot else {
            return PublishReport {
                kind,
                outcomes: Vec::new(),
            };
        };

        tracing::debug!(?kind, listeners = snapshot.len(), "publishing event");

        let outcomes = snapshot
            .iter()
            .map(|entry| {
                let subscription = Subscription { id: entry.id, kind };
                let result = dispatch(entry.listener.as_ref(), &event);
                if let Err(err) = &result {
                    tracing::warn!(?kind, id = entry.id, error = %err, "listener failed");
                }
                DispatchOutcome {
                    subscription,
                    result,
                }
            })
            .collect();

        PublishReport { kind, outcomes }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.slots.read().get(&kind).map_or(0, |slot| slot.len())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.read();
        let mut map = f.debug_map();
        for (kind, slot) in slots.iter() {
            map.entry(kind, &slot.len());
        }
        map.finish()
    }
}

fn dispatch(listener: &dyn Listener, event: &Event) -> Result<(), ListenerError> {
    match panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
        Ok(result) => result,
        Err(payload) => Err(ListenerError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
