use crate::State;
use parking_lot::RwLock;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct Registry<P> {
    next_id: AtomicU64,
    subscribers: RwLock<Vec<(u64, Callback<P>)>>,
}

/// A named, fireable channel carrying payloads of type `P`.
///
/// Firing notifies every subscriber registered at that moment, synchronously
/// and in registration order, before [`fire`](EventStream::fire) returns.
/// Nothing is buffered: a payload fired with no subscribers is dropped.
///
/// Cloning yields another handle to the same stream.
pub struct EventStream<P: State> {
    name: Arc<str>,
    registry: Arc<Registry<P>>,
}

impl<P: State> Clone for EventStream<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<P: State> Debug for EventStream<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<P: State> EventStream<P> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                subscribers: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.subscribers.read().len()
    }

    /// Registers `callback` to run on every subsequent firing.
    pub fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .subscribers
            .write()
            .push((id, Arc::new(callback)));
        let registry: Weak<Registry<P>> = Arc::downgrade(&self.registry);
        Subscription {
            unsubscribe: Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.subscribers.write().retain(|(sid, _)| *sid != id);
                }
            }),
        }
    }

    /// Notifies the current subscribers with `payload`.
    ///
    /// The subscriber list is snapshotted first, so callbacks may fire other
    /// streams, this one included, or register new subscribers; those
    /// registrations only see later firings.
    pub fn fire(&self, payload: P) {
        let subscribers: Vec<Callback<P>> = self
            .registry
            .subscribers
            .read()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        trace!(event = %self.name, subscribers = subscribers.len(), "fire");
        for callback in subscribers {
            callback(&payload);
        }
    }

    /// A derived stream that fires `f(payload)` whenever this one fires.
    pub fn map<Q, F>(&self, name: impl Into<String>, f: F) -> EventStream<Q>
    where
        Q: State,
        F: Fn(&P) -> Q + Send + Sync + 'static,
    {
        let derived = EventStream::new(name);
        let target = derived.clone();
        self.watch(move |payload| target.fire(f(payload)));
        derived
    }

    /// A derived stream that fires only for payloads `f` maps to `Some`.
    pub fn filter_map<Q, F>(&self, name: impl Into<String>, f: F) -> EventStream<Q>
    where
        Q: State,
        F: Fn(&P) -> Option<Q> + Send + Sync + 'static,
    {
        let derived = EventStream::new(name);
        let target = derived.clone();
        self.watch(move |payload| {
            if let Some(mapped) = f(payload) {
                target.fire(mapped);
            }
        });
        derived
    }

    /// A derived stream that forwards the payloads accepted by `predicate`.
    pub fn filter<F>(&self, name: impl Into<String>, predicate: F) -> EventStream<P>
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.filter_map(name, move |payload| {
            predicate(payload).then(|| payload.clone())
        })
    }

    /// Merges several streams into one that fires whenever any of them does.
    pub fn merge<'a, I>(name: impl Into<String>, sources: I) -> EventStream<P>
    where
        I: IntoIterator<Item = &'a EventStream<P>>,
    {
        let merged = EventStream::new(name);
        for source in sources {
            let target = merged.clone();
            source.watch(move |payload| target.fire(payload.clone()));
        }
        merged
    }
}

/// Handle returned by `watch`. Dropping it keeps the subscription alive;
/// call [`unsubscribe`](Subscription::unsubscribe) to detach.
pub struct Subscription {
    unsubscribe: Box<dyn FnOnce() + Send + Sync>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        (self.unsubscribe)()
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subscription")
    }
}
