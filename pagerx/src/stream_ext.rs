use futures_core::stream::{FusedStream, Stream};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream combinators used to observe signals until some state is reached.
pub trait PagerxStreamExt: Stream {
    /// Yields items up to and including the first one accepted by `test`,
    /// then ends.
    ///
    /// ```
    /// use futures_signals::signal::{always, SignalExt};
    /// use pagerx::PagerxStreamExt;
    ///
    /// let _settled = always(false).to_stream().stop_if(|loading| !*loading);
    /// ```
    fn stop_if<F>(self, test: F) -> StopIf<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        StopIf {
            stream: self,
            test: Some(test),
        }
    }
}

impl<T: ?Sized> PagerxStreamExt for T where T: Stream {}

/// Stream returned by [`PagerxStreamExt::stop_if`].
#[pin_project]
#[derive(Debug)]
#[must_use = "Streams do nothing unless polled"]
pub struct StopIf<S, F> {
    #[pin]
    stream: S,
    // Dropped once the stream has ended.
    test: Option<F>,
}

impl<S, F> Stream for StopIf<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let Some(test) = this.test.as_mut() else {
            return Poll::Ready(None);
        };
        let item = match this.stream.poll_next(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(item) => item,
        };
        match item {
            Some(value) if !test(&value) => Poll::Ready(Some(value)),
            last => {
                *this.test = None;
                Poll::Ready(last)
            }
        }
    }
}

impl<S, F> FusedStream for StopIf<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.test.is_none()
    }
}
