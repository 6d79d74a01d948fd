//! Error types for assembling a command tree.

use thiserror::Error;

use crate::command::NodeId;

/// Errors raised while building a command tree.
///
/// These are startup errors: a tree that fails to assemble must abort the
/// process rather than run with missing commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The root was declared without a prefix or delimiters.
    #[error("malformed root declaration: {reason}")]
    MalformedRoot {
        /// What is missing.
        reason: String,
    },

    /// A child node was declared without any code.
    #[error("a command node requires at least one code")]
    EmptyCodes,

    /// A code is blank.
    #[error("command codes must not be blank")]
    BlankCode,

    /// The referenced node is not part of this tree.
    #[error("command node {0} does not exist in this tree")]
    NodeNotFound(NodeId),
}

impl TreeError {
    /// Creates a malformed root error.
    pub fn malformed_root(reason: impl Into<String>) -> Self {
        Self::MalformedRoot {
            reason: reason.into(),
        }
    }
}

/// Result type for tree assembly.
pub type TreeResult<T> = Result<T, TreeError>;
