//! # Jelly
//!
//! A command dispatch engine for chat bots.
//!
//! ## Overview
//!
//! Inbound text is routed through a tree of commands. Each command node
//! answers to one or more codes and holds handlers keyed by how many
//! arguments they take, so `calc 1` and `calc 1 2` can run different code.
//!
//! ```text
//! "JC ar add hi hello"
//!   │  │  │   └──────── 2 tokens ──► handler(keyword, response) on `add`
//!   │  │  └──────────── child code
//!   │  └─────────────── child code
//!   └────────────────── prefix, then the first matching delimiter
//! ```
//!
//! - **Core** (`jelly-core`): channel kinds, scopes, responses, argument values
//! - **Framework** (`jelly-framework`): the command tree and the dispatcher
//! - **Runtime** (`jelly-runtime`): configuration, logging, usage recording
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jelly::prelude::*;
//!
//! async fn echo(_ctx: CommandContext, args: Args) -> Result<String, ArgumentError> {
//!     Ok(args.text(0)?.to_string())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = JellyRuntime::builder().with_logging().build(|tree| {
//!         let node = tree.add_child(NodeId::ROOT, NodeSpec::new(["echo", "e"]))?;
//!         tree.register(node, HandlerSpec::new().param(Param::text("text")), echo)
//!     })?;
//!
//!     let event = TextEvent::new("JC echo hello", ChannelKind::PrivateText, "c", "u");
//!     assert_eq!(runtime.handle(event).await, vec![Response::text("hello")]);
//!
//!     runtime.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `json-log`: JSON log output

pub use jelly_core as core;
pub use jelly_framework as framework;
pub use jelly_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use jelly::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use jelly_runtime::{JellyConfig, JellyRuntime, RuntimeError, RuntimeResult};

    // Command tree
    pub use jelly_framework::{
        CommandContext, CommandTree, Dispatcher, HandlerSpec, NodeId, NodeSpec, RootSpec,
        TreeError, TreeResult,
    };

    // Messages, arguments and replies
    pub use jelly_core::{
        ArgumentError, Args, ChannelKind, CommandScope, DispatchError, DispatchResult, FeatureTag,
        Param, ParamKind, Response, TextEvent, Value,
    };

    // Logging macros
    pub use jelly_runtime::prelude::*;
}
