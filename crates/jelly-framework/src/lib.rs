//! # Jelly Framework
//!
//! The command tree and the dispatcher that routes text through it.
//!
//! This layer provides:
//! - A prefix tree of command nodes with arity-keyed handlers
//! - Quote-aware tokenization of command text
//! - Usage strings rebuilt from the tree, cached after first use
//! - A [`Dispatcher`] that resolves, checks scope, coerces and invokes
//!
//! Trees are assembled once at startup, then shared read-only between any
//! number of concurrent dispatches.

pub mod command;
pub mod dispatcher;
pub mod error;

pub use command::{
    CommandContext, CommandHandler, CommandNode, CommandTree, HandlerDescriptor, HandlerListing,
    HandlerSpec, NodeId, NodeSpec, Resolution, RootSpec,
};
pub use dispatcher::Dispatcher;
pub use error::{TreeError, TreeResult};
