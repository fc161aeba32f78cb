use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents the ways an asynchronous operation wrapped by an
/// [`Effect`](crate::Effect) can fail.
///
/// Remote failures (transport errors, non-success statuses, malformed
/// payloads) all arrive as [`AsyncError::Error`] carrying the collaborator's
/// message; the core never inspects them further.
#[derive(Error, Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum AsyncError {
    /// A general error with a message describing what went wrong.
    #[error("{0}")]
    Error(String),

    /// An operation returned None when a value was expected.
    #[error("Operation returned None!")]
    None,

    /// The task running the operation panicked.
    #[error("Task panicked: {0}")]
    Panicked(String),
}

impl AsyncError {
    /// Builds a general error from anything printable.
    pub fn message(message: impl Into<String>) -> Self {
        AsyncError::Error(message.into())
    }

    /// Returns true if this error represents a None result.
    pub fn is_none(&self) -> bool {
        matches!(self, AsyncError::None)
    }

    /// Returns true if this error is a general error with a message.
    pub fn is_error(&self) -> bool {
        matches!(self, AsyncError::Error { .. })
    }

    /// Returns true if the operation panicked instead of settling.
    pub fn is_panicked(&self) -> bool {
        matches!(self, AsyncError::Panicked(_))
    }
}
