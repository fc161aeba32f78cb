use crate::AsyncError;

/// The lifecycle of a single remote value, as a view would render it.
///
/// Produced by [`QueryState::status`](crate::QueryState::status). Loading
/// and failed states keep the last successful value so a view can keep
/// showing stale data.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Async<T: Clone> {
    Uninitialized,
    Loading(Option<T>),
    Success { value: T },
    Fail { error: AsyncError, value: Option<T> },
}

impl<T: Clone> Async<T> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Async::Success { .. } | Async::Fail { .. })
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Async::Uninitialized)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Async::Loading(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Async::Success { .. })
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Async::Fail { .. })
    }

    pub fn error(&self) -> Option<&AsyncError> {
        match self {
            Async::Fail { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn value_ref(&self) -> Option<&T> {
        match self {
            Async::Loading(value) | Async::Fail { value, .. } => value.as_ref(),
            Async::Success { value } => Some(value),
            Async::Uninitialized => None,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Async::Uninitialized => None,
            Async::Loading(value) => value,
            Async::Success { value } => Some(value),
            Async::Fail { value, .. } => value,
        }
    }

    pub fn loading(value: Option<T>) -> Self {
        Async::Loading(value)
    }

    pub fn success(value: T) -> Self {
        Async::Success { value }
    }

    pub fn fail(error: AsyncError, value: Option<T>) -> Self {
        Async::Fail { error, value }
    }
}

impl<T: Clone> Default for Async<T> {
    fn default() -> Self {
        Async::Uninitialized
    }
}

impl<T: Clone> From<Result<T, AsyncError>> for Async<T> {
    fn from(result: Result<T, AsyncError>) -> Self {
        match result {
            Ok(value) => Async::success(value),
            Err(error) => Async::fail(error, None),
        }
    }
}
