use crate::{EventStream, State, Subscription};
use futures::StreamExt;
use futures_signals::signal::{Mutable, MutableSignalCloned, MutableSignalRef, SignalExt};
use parking_lot::ReentrantMutex;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

struct CellInner<T: State> {
    name: Arc<str>,
    initial: T,
    value: Mutable<T>,
    version: AtomicU64,
    updates: EventStream<T>,
    /// Held across write and dispatch so watchers see writes in write order.
    dispatch: ReentrantMutex<()>,
}

/// A named, versioned mutable value.
///
/// Writes are synchronous: by the time [`set`](StateCell::set) returns the
/// new value is readable and every watcher has run. Async consumers can
/// follow the value through [`signal`](StateCell::signal); like any
/// futures-signals signal it may skip intermediate values.
///
/// Writes from different threads are serialized together with their
/// notification: a second writer waits until the watchers of the first write
/// have returned. A watcher may write the same cell again on its own thread.
pub struct StateCell<T: State> {
    inner: Arc<CellInner<T>>,
}

impl<T: State> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: State + Debug> Debug for StateCell<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("name", &self.name())
            .field("version", &self.version())
            .field("value", &*self.inner.value.lock_ref())
            .finish()
    }
}

impl<T: State> StateCell<T> {
    pub fn new(name: impl Into<String>, initial: T) -> Self {
        let name = name.into();
        StateCell {
            inner: Arc::new(CellInner {
                name: Arc::from(name.as_str()),
                value: Mutable::new(initial.clone()),
                initial,
                version: AtomicU64::new(0),
                updates: EventStream::new(format!("{name}.updates")),
                dispatch: ReentrantMutex::new(()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn get(&self) -> T {
        self.inner.value.get_cloned()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.lock_ref())
    }

    /// Number of writes since construction, resets included.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    pub fn initial(&self) -> &T {
        &self.inner.initial
    }

    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    /// Replaces the value with `reducer(current)` as one atomic step and
    /// returns what was written.
    pub fn update<F>(&self, reducer: F) -> T
    where
        F: FnOnce(&T) -> T,
    {
        let _dispatch = self.inner.dispatch.lock();
        let written = {
            let mut guard = self.inner.value.lock_mut();
            let next = reducer(&guard);
            *guard = next.clone();
            self.inner.version.fetch_add(1, Ordering::AcqRel);
            next
        };
        trace!(cell = %self.name(), version = self.version(), "write");
        self.inner.updates.fire(written.clone());
        written
    }

    pub fn reset(&self) {
        self.set(self.inner.initial.clone());
    }

    /// Every write, in order, as an event stream.
    pub fn updates(&self) -> EventStream<T> {
        self.inner.updates.clone()
    }

    pub fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.updates.watch(callback)
    }

    /// Applies `reducer` to the current value each time `event` fires.
    pub fn on<P, F>(&self, event: &EventStream<P>, reducer: F) -> Subscription
    where
        P: State,
        F: Fn(&T, &P) -> T + Send + Sync + 'static,
    {
        let cell = self.clone();
        event.watch(move |payload| {
            cell.update(|current| reducer(current, payload));
        })
    }

    /// Restores the initial value each time `event` fires.
    pub fn reset_on<P: State>(&self, event: &EventStream<P>) -> Subscription {
        let cell = self.clone();
        event.watch(move |_| cell.reset())
    }

    pub fn signal(&self) -> MutableSignalCloned<T> {
        self.inner.value.signal_cloned()
    }

    pub fn signal_ref<B, F>(&self, f: F) -> MutableSignalRef<T, F>
    where
        F: FnMut(&T) -> B,
    {
        self.inner.value.signal_ref(f)
    }

    /// Resolves with the first observed value accepted by `predicate`,
    /// starting with the current one.
    pub async fn wait_until<F>(&self, mut predicate: F) -> T
    where
        F: FnMut(&T) -> bool,
    {
        let mut values = self.signal().to_stream();
        while let Some(value) = values.next().await {
            if predicate(&value) {
                return value;
            }
        }
        self.get()
    }
}

impl<T: State + PartialEq> StateCell<T> {
    /// Whether the cell still holds its construction-time value.
    pub fn is_initial(&self) -> bool {
        self.with(|value| value == &self.inner.initial)
    }
}
