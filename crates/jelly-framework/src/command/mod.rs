//! The command tree.
//!
//! Commands form a prefix tree. Each [`CommandNode`] answers to one or more
//! codes and owns an arity-keyed set of handlers; the root additionally holds
//! the command prefix and the delimiters text is split on.
//!
//! ```rust,ignore
//! use jelly_framework::command::{CommandTree, HandlerSpec, NodeId, NodeSpec, RootSpec};
//! use jelly_core::{Args, Param};
//!
//! let mut tree = CommandTree::new(RootSpec::new("!", ["/"]))?;
//! let echo = tree.add_child(NodeId::ROOT, NodeSpec::new(["echo", "e"]))?;
//! tree.register(
//!     echo,
//!     HandlerSpec::new().param(Param::text("text")),
//!     |_ctx, args: Args| async move { args.text(0).map(str::to_string) },
//! )?;
//!
//! // `!/echo/hello` now resolves to the handler above.
//! ```

pub mod handler;
pub mod listing;
pub mod node;
pub mod resolve;
pub mod split;
pub mod tree;
pub mod usage;

pub use handler::{
    BoxedCommandHandler, CommandContext, CommandHandler, DEFAULT_DESCRIPTION, HandlerDescriptor,
    HandlerSpec,
};
pub use listing::HandlerListing;
pub use node::{CommandNode, NodeId, NodeSpec, RootSpec};
pub use resolve::{Resolution, out_of_scope_message};
pub use split::{split_args, split_first};
pub use tree::CommandTree;
