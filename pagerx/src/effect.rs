use crate::{AsyncError, EventStream, ExecutionResult, State, StateCell};
use futures::future::BoxFuture;
use futures::FutureExt;
use futures_signals::signal::{MutableSignalRef, Signal};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Handler<P, T> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<T, AsyncError>> + Send + Sync>;

struct EffectInner<P: State, T: State> {
    name: String,
    handler: Handler<P, T>,
    in_flight: StateCell<usize>,
    done_data: EventStream<T>,
    fail_data: EventStream<AsyncError>,
    last_success: StateCell<Option<T>>,
    last_failure: StateCell<Option<AsyncError>>,
}

/// A fallible asynchronous operation with reactive bookkeeping.
///
/// Every [`run`](Effect::run) is spawned on the current tokio runtime and
/// counted as in flight until it settles. Overlapping runs are neither
/// deduplicated nor cancelled; each one publishes its own outcome when it
/// settles.
pub struct Effect<P: State, T: State> {
    inner: Arc<EffectInner<P, T>>,
}

impl<P: State, T: State> Clone for Effect<P, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: State, T: State> Effect<P, T> {
    pub fn new<F, Fut, R>(name: impl Into<String>, computation: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: ExecutionResult<T> + Send + 'static,
    {
        let name = name.into();
        let handler: Handler<P, T> = Arc::new(move |params| {
            computation(params)
                .map(<R as ExecutionResult<T>>::into_result)
                .boxed()
        });
        Effect {
            inner: Arc::new(EffectInner {
                in_flight: StateCell::new(format!("{name}.in_flight"), 0),
                done_data: EventStream::new(format!("{name}.done_data")),
                fail_data: EventStream::new(format!("{name}.fail_data")),
                last_success: StateCell::new(format!("{name}.last_success"), None),
                last_failure: StateCell::new(format!("{name}.last_failure"), None),
                handler,
                name,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Starts one invocation and returns a handle resolving to its outcome.
    ///
    /// The invocation counts as pending from this call until its outcome has
    /// been published on `done_data` or `fail_data`. A panic inside the
    /// operation is reported as [`AsyncError::Panicked`].
    pub fn run(&self, params: P) -> JoinHandle<Result<T, AsyncError>> {
        let inner = self.inner.clone();
        inner.in_flight.update(|count| count + 1);
        debug!(effect = %inner.name, "started");
        let operation = (inner.handler)(params);
        tokio::spawn(async move {
            let outcome = match tokio::spawn(operation).await {
                Ok(result) => result,
                Err(join_error) => Err(AsyncError::Panicked(join_error.to_string())),
            };
            match &outcome {
                Ok(value) => {
                    debug!(effect = %inner.name, "succeeded");
                    inner.last_success.set(Some(value.clone()));
                    inner.done_data.fire(value.clone());
                }
                Err(error) => {
                    warn!(effect = %inner.name, %error, "failed");
                    inner.last_failure.set(Some(error.clone()));
                    inner.fail_data.fire(error.clone());
                }
            }
            inner.in_flight.update(|count| count.saturating_sub(1));
            outcome
        })
    }

    pub fn is_pending(&self) -> bool {
        self.inner.in_flight.with(|count| *count > 0)
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.get()
    }

    pub fn pending_signal(&self) -> MutableSignalRef<usize, fn(&usize) -> bool> {
        self.inner.in_flight.signal_ref(is_positive as fn(&usize) -> bool)
    }

    /// Resolves once no invocation is outstanding.
    pub async fn settled(&self) {
        self.inner.in_flight.wait_until(|count| *count == 0).await;
    }

    pub fn done_data(&self) -> EventStream<T> {
        self.inner.done_data.clone()
    }

    pub fn fail_data(&self) -> EventStream<AsyncError> {
        self.inner.fail_data.clone()
    }

    pub fn last_success(&self) -> StateCell<Option<T>> {
        self.inner.last_success.clone()
    }

    pub fn last_failure(&self) -> StateCell<Option<AsyncError>> {
        self.inner.last_failure.clone()
    }

    /// The in-flight counter, for callers that need to watch every change.
    pub fn in_flight_cell(&self) -> StateCell<usize> {
        self.inner.in_flight.clone()
    }
}

fn is_positive(count: &usize) -> bool {
    *count > 0
}

/// Combines two pending signals into "either is pending".
pub fn either_pending<A, B>(a: A, b: B) -> impl Signal<Item = bool>
where
    A: Signal<Item = bool>,
    B: Signal<Item = bool>,
{
    futures_signals::map_ref! {
        let a = a,
        let b = b =>
        *a || *b
    }
}
