//! Runtime error types.

use thiserror::Error;

pub use crate::config::{ConfigError, ConfigResult};
use jelly_framework::TreeError;

/// Errors that can occur while starting the runtime.
///
/// Per-message failures never surface here; [`JellyRuntime::handle`] turns
/// them into a reply.
///
/// [`JellyRuntime::handle`]: crate::JellyRuntime::handle
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The command tree failed to assemble.
    #[error("Failed to assemble command tree: {0}")]
    Tree(#[from] TreeError),

    /// Usage recording needs a tokio runtime to spawn its worker on.
    #[error("Usage recording requires a running tokio runtime")]
    NoAsyncRuntime,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
