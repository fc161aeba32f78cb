use crate::{Async, AsyncError, Effect, EventStream, ExecutionResult, State, StateCell};
use futures_signals::map_ref;
use futures_signals::signal::{Signal, SignalExt};
use std::future::Future;

/// Snapshot of a [`QueryModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<AsyncError>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T: Clone> QueryState<T> {
    /// Folds the triple into a single lifecycle value. Loading wins over a
    /// pending error, which wins over data.
    pub fn status(&self) -> Async<T> {
        match (self.loading, &self.error, &self.data) {
            (true, _, data) => Async::loading(data.clone()),
            (false, Some(error), data) => Async::fail(error.clone(), data.clone()),
            (false, None, Some(data)) => Async::success(data.clone()),
            (false, None, None) => Async::Uninitialized,
        }
    }
}

/// One remote operation exposed as `{data, loading, error}`.
///
/// Firing `fetch` clears this query's error and starts the wrapped effect.
/// Success replaces `data` and clears `error`; failure sets `error` and
/// leaves `data` alone. Concurrent fetches all run to completion and
/// whichever settles last wins.
pub struct QueryModel<P: State, T: State> {
    name: String,
    effect: Effect<P, T>,
    fetch: EventStream<P>,
    reset: EventStream<()>,
    data: StateCell<Option<T>>,
    error: StateCell<Option<AsyncError>>,
}

impl<P: State, T: State> Clone for QueryModel<P, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            effect: self.effect.clone(),
            fetch: self.fetch.clone(),
            reset: self.reset.clone(),
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

impl<P: State, T: State> QueryModel<P, T> {
    pub fn new<F, Fut, R>(name: impl Into<String>, query_fn: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: ExecutionResult<T> + Send + 'static,
    {
        let name = name.into();
        let effect: Effect<P, T> = Effect::new(format!("{name}.fx"), query_fn);
        let fetch: EventStream<P> = EventStream::new(format!("{name}.fetch"));
        let reset: EventStream<()> = EventStream::new(format!("{name}.reset"));
        let data: StateCell<Option<T>> = StateCell::new(format!("{name}.data"), None);
        let error: StateCell<Option<AsyncError>> =
            StateCell::new(format!("{name}.error"), None);

        {
            let effect = effect.clone();
            let error = error.clone();
            fetch.watch(move |params: &P| {
                if error.with(Option::is_some) {
                    error.set(None);
                }
                // Detached: the outcome is delivered through done/fail.
                drop(effect.run(params.clone()));
            });
        }
        data.on(&effect.done_data(), |_, value| Some(value.clone()));
        error.on(&effect.done_data(), |_, _| None);
        error.on(&effect.fail_data(), |_, failure| Some(failure.clone()));
        data.reset_on(&reset);
        error.reset_on(&reset);

        QueryModel {
            name,
            effect,
            fetch,
            reset,
            data,
            error,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fetch(&self, params: P) {
        self.fetch.fire(params)
    }

    /// Clears `data` and `error`. Fetches still in flight will write their
    /// outcome when they settle.
    pub fn reset(&self) {
        self.reset.fire(())
    }

    pub fn data(&self) -> Option<T> {
        self.data.get()
    }

    pub fn error(&self) -> Option<AsyncError> {
        self.error.get()
    }

    pub fn is_loading(&self) -> bool {
        self.effect.is_pending()
    }

    pub fn state(&self) -> QueryState<T> {
        QueryState {
            data: self.data(),
            loading: self.is_loading(),
            error: self.error(),
        }
    }

    /// Resolves once no fetch of this query is outstanding.
    pub async fn settled(&self) {
        self.effect.settled().await
    }

    pub fn fetch_event(&self) -> EventStream<P> {
        self.fetch.clone()
    }

    pub fn reset_event(&self) -> EventStream<()> {
        self.reset.clone()
    }

    pub fn data_cell(&self) -> StateCell<Option<T>> {
        self.data.clone()
    }

    pub fn error_cell(&self) -> StateCell<Option<AsyncError>> {
        self.error.clone()
    }

    pub fn effect(&self) -> &Effect<P, T> {
        &self.effect
    }

    pub fn loading_signal(&self) -> impl Signal<Item = bool> {
        self.effect.pending_signal().dedupe()
    }

    pub fn state_signal(&self) -> impl Signal<Item = QueryState<T>> {
        map_ref! {
            let data = self.data.signal(),
            let loading = self.loading_signal(),
            let error = self.error.signal() =>
            QueryState {
                data: data.clone(),
                loading: *loading,
                error: error.clone(),
            }
        }
    }
}
