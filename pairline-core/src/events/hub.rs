//! Typed publish/subscribe registry.
//!
//! Each event type names a closed set of kinds; listeners are registered per
//! kind and invoked synchronously, in subscription order, by [`EventHub::publish`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An event that can travel through an [`EventHub`].
pub trait HubEvent {
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// What a listener wants to happen after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    /// Skip the listeners registered after this one.
    Stop,
}

impl From<()> for Propagation {
    fn from(_: ()) -> Self {
        Propagation::Continue
    }
}

/// Outcome of [`EventHub::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Complete,
    /// A listener returned [`Propagation::Stop`].
    Halted,
}

impl Delivery {
    pub fn is_complete(self) -> bool {
        self == Delivery::Complete
    }
}

/// A shareable callback. Clones are the *same* listener: subscription
/// de-duplication and removal compare identity, not behaviour.
pub struct Listener<E>(Arc<dyn Fn(&E) -> Propagation + Send + Sync>);

impl<E> Listener<E> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&E) -> Propagation + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// A listener that never stops propagation.
    pub fn observer<F>(callback: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        Self(Arc::new(move |event: &E| {
            callback(event);
            Propagation::Continue
        }))
    }

    fn call(&self, event: &E) -> Propagation {
        (self.0)(event)
    }

    fn is(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl<E> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> PartialEq for Listener<E> {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl<E> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

pub struct EventHub<E: HubEvent> {
    listeners: Mutex<HashMap<E::Kind, Vec<Listener<E>>>>,
}

impl<E: HubEvent> EventHub<E> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
        }
    }

    // Listeners never run under the lock, so a poisoned map is still consistent.
    fn registry(&self) -> MutexGuard<'_, HashMap<E::Kind, Vec<Listener<E>>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `listener` for `kind` unless it is already registered there.
    pub fn subscribe(&self, kind: E::Kind, listener: Listener<E>) -> &Self {
        let mut registry = self.registry();
        let listeners = registry.entry(kind).or_default();
        if !listeners.iter().any(|l| l.is(&listener)) {
            listeners.push(listener);
        }
        self
    }

    pub fn unsubscribe(&self, kind: E::Kind, listener: &Listener<E>) -> &Self {
        if let Some(listeners) = self.registry().get_mut(&kind) {
            listeners.retain(|l| !l.is(listener));
        }
        self
    }

    /// Drops every listener of `kind`, or of every kind when `None`.
    pub fn clear(&self, kind: Option<E::Kind>) -> &Self {
        let mut registry = self.registry();
        match kind {
            Some(kind) => {
                registry.remove(&kind);
            }
            None => registry.clear(),
        }
        self
    }

    /// Invokes the listeners of `event.kind()` in subscription order.
    ///
    /// Runs on a snapshot of the registry, so listeners may subscribe or
    /// unsubscribe while being invoked; the change applies to the next
    /// publish. A panicking listener unwinds into the caller.
    pub fn publish(&self, event: &E) -> Delivery {
        let snapshot = match self.registry().get(&event.kind()) {
            Some(listeners) => listeners.clone(),
            None => return Delivery::Complete,
        };

        for listener in &snapshot {
            if listener.call(event) == Propagation::Stop {
                return Delivery::Halted;
            }
        }
        Delivery::Complete
    }

    /// False both for a kind nobody ever subscribed to and for an empty one.
    pub fn has_listener(&self, kind: E::Kind, listener: &Listener<E>) -> bool {
        self.registry()
            .get(&kind)
            .is_some_and(|listeners| listeners.iter().any(|l| l.is(listener)))
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.registry().get(&kind).map_or(0, Vec::len)
    }
}

impl<E: HubEvent> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: HubEvent> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry();
        let mut map = f.debug_map();
        for (kind, listeners) in registry.iter() {
            map.entry(kind, &listeners.len());
        }
        map.finish()
    }
}
