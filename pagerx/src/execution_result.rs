use crate::AsyncError;

/// Conversion from whatever a query function returns into the settled
/// outcome of an effect.
///
/// Plain values always succeed, `Result`s keep their error message and
/// `Option`s fail with [`AsyncError::None`] when empty.
pub trait ExecutionResult<T: Clone> {
    fn into_result(self) -> Result<T, AsyncError>;
}

impl<T: Clone> ExecutionResult<T> for T {
    fn into_result(self) -> Result<T, AsyncError> {
        Ok(self)
    }
}

impl<T: Clone, E> ExecutionResult<T> for Result<T, E>
where
    E: ToString,
{
    fn into_result(self) -> Result<T, AsyncError> {
        self.map_err(|error| AsyncError::Error(error.to_string()))
    }
}

impl<T: Clone> ExecutionResult<T> for Option<T> {
    fn into_result(self) -> Result<T, AsyncError> {
        self.ok_or(AsyncError::None)
    }
}
