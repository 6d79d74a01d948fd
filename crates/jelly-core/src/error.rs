//! Per-message error types.
//!
//! Construction errors for the command tree live in `jelly-framework`; the
//! errors here can occur while handling a single message and are recovered
//! into a response by the runtime.

use thiserror::Error;

use crate::value::ParamKind;

/// A raw token could not be turned into the declared parameter type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot read '{raw}' as {kind}: {reason}")]
pub struct CoercionError {
    /// The declared parameter type.
    pub kind: ParamKind,
    /// The token as it appeared in the message.
    pub raw: String,
    /// Why the token was rejected.
    pub reason: String,
}

impl CoercionError {
    /// Creates a coercion error.
    pub fn new(kind: ParamKind, raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}

/// A handler asked for an argument that does not exist or has another type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// Index past the end of the argument list.
    #[error("argument #{index} is missing (got {len})")]
    Missing {
        /// Requested index.
        index: usize,
        /// Number of arguments available.
        len: usize,
    },

    /// The argument holds another type.
    #[error("argument #{index} is {actual}, not {expected}")]
    TypeMismatch {
        /// Requested index.
        index: usize,
        /// Requested type.
        expected: ParamKind,
        /// Type actually stored.
        actual: ParamKind,
    },
}

/// Errors that fail the dispatch of one message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// An argument token did not match its declared type.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// The handler itself reported a failure.
    ///
    /// Handlers returning `Err` of any displayable type, an [`ArgumentError`]
    /// included, end up here.
    #[error("handler failed: {message}")]
    Handler {
        /// The handler's error message.
        message: String,
    },
}

impl DispatchError {
    /// Creates a handler failure.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }
}

/// Result type for dispatching one message.
pub type DispatchResult<T> = Result<T, DispatchError>;
