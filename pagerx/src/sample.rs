use crate::{EventStream, State, StateCell, Subscription};

/// Anything a rule can write its result into.
pub trait Target<T>: Clone + Send + Sync + 'static {
    fn dispatch(&self, value: T);
}

impl<T: State> Target<T> for EventStream<T> {
    fn dispatch(&self, value: T) {
        self.fire(value)
    }
}

impl<T: State> Target<T> for StateCell<T> {
    fn dispatch(&self, value: T) {
        self.set(value)
    }
}

/// When `clock` fires, reads `source`, computes `f(source, payload)` and
/// dispatches the result into `target`.
///
/// `source` is read once per firing, so a rule sees whatever the cell holds
/// after the subscribers registered before it on the same clock have run.
pub fn sample<C, S, R, F, X>(
    clock: &EventStream<C>,
    source: &StateCell<S>,
    f: F,
    target: &X,
) -> Subscription
where
    C: State,
    S: State,
    F: Fn(&S, &C) -> R + Send + Sync + 'static,
    X: Target<R>,
{
    sample_filter(clock, source, move |state, payload| Some(f(state, payload)), target)
}

/// Like [`sample`], but only dispatches when `f` returns `Some`.
pub fn sample_filter<C, S, R, F, X>(
    clock: &EventStream<C>,
    source: &StateCell<S>,
    f: F,
    target: &X,
) -> Subscription
where
    C: State,
    S: State,
    F: Fn(&S, &C) -> Option<R> + Send + Sync + 'static,
    X: Target<R>,
{
    let source = source.clone();
    let target = target.clone();
    clock.watch(move |payload| {
        if let Some(result) = source.with(|state| f(state, payload)) {
            target.dispatch(result);
        }
    })
}

/// Dispatches every payload of `clock` into `target` unchanged.
pub fn forward<T, X>(clock: &EventStream<T>, target: &X) -> Subscription
where
    T: State,
    X: Target<T>,
{
    let target = target.clone();
    clock.watch(move |payload| target.dispatch(payload.clone()))
}
