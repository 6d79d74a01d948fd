//! Response objects and handler return normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};

/// One text response produced by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// The text to send back.
    pub content: String,
}

impl Response {
    /// Creates a text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl From<String> for Response {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl From<&str> for Response {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

/// Anything a handler can return.
///
/// A single string becomes one response, a list is flattened with each bare
/// string wrapped, `()` and `None` produce nothing, and an `Err` fails the
/// dispatch with [`DispatchError::Handler`].
pub trait IntoResponses {
    /// Normalizes `self` into a list of responses.
    fn into_responses(self) -> DispatchResult<Vec<Response>>;
}

impl IntoResponses for Response {
    fn into_responses(self) -> DispatchResult<Vec<Response>> {
        Ok(vec![self])
    }
}

impl IntoResponses for String {
    fn into_responses(self) -> DispatchResult<Vec<Response>> {
        Ok(vec![Response::from(self)])
    }
}

impl IntoResponses for &'static str {
    fn into_responses(self) -> DispatchResult<Vec<Response>> {
        Ok(vec![Response::from(self)])
    }
}

impl<T: Into<Response>> IntoResponses for Vec<T> {
    fn into_responses(self) -> DispatchResult<Vec<Response>> {
        Ok(self.into_iter().map(Into::into).collect())
    }
}

impl IntoResponses for () {
    fn into_responses(self) -> DispatchResult<Vec<Response>> {
        Ok(Vec::new())
    }
}

impl<T: IntoResponses> IntoResponses for Option<T> {
    fn into_responses(self) -> DispatchResult<Vec<Response>> {
        match self {
            Some(inner) => inner.into_responses(),
            None => Ok(Vec::new()),
        }
    }
}

impl<T, E> IntoResponses for Result<T, E>
where
    T: IntoResponses,
    E: fmt::Display,
{
    fn into_responses(self) -> DispatchResult<Vec<Response>> {
        match self {
            Ok(inner) => inner.into_responses(),
            Err(e) => Err(DispatchError::handler(e.to_string())),
        }
    }
}
