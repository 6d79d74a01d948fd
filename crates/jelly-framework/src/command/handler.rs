//! Command handlers and their registration metadata.
//!
//! A handler is any async function taking a [`CommandContext`] and the coerced
//! [`Args`], returning something that implements [`IntoResponses`]:
//!
//! ```rust,ignore
//! async fn echo(_ctx: CommandContext, args: Args) -> Result<String, ArgumentError> {
//!     Ok(args.text(0)?.to_string())
//! }
//!
//! tree.register(node, HandlerSpec::new().param(Param::text("text")), echo);
//! ```
//!
//! The [`HandlerSpec`] states everything the dispatcher needs to know up front:
//! the declared parameters (and therefore the arity), help text, scope, and
//! feature tag. Nothing is discovered from the function signature.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use futures::FutureExt;
use futures::future::BoxFuture;

use jelly_core::{
    Args, ChannelKind, CommandScope, DispatchResult, FeatureTag, IntoResponses, Param, Response,
    TextEvent,
};

use super::node::NodeId;
use super::tree::CommandTree;

/// Description used when a handler declares neither a description nor a feature.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// What a handler sees of the message that triggered it.
#[derive(Clone)]
pub struct CommandContext {
    event: Arc<TextEvent>,
    tree: Arc<CommandTree>,
    node: NodeId,
}

impl CommandContext {
    pub(crate) fn new(event: Arc<TextEvent>, tree: Arc<CommandTree>, node: NodeId) -> Self {
        Self { event, tree, node }
    }

    /// The message being handled.
    pub fn event(&self) -> &TextEvent {
        &self.event
    }

    /// Kind of channel the message came from.
    pub fn channel_kind(&self) -> ChannelKind {
        self.event.channel_kind
    }

    /// Identity of the channel the message came from.
    pub fn channel_id(&self) -> &str {
        &self.event.channel_id
    }

    /// Identity of the sender.
    pub fn user_id(&self) -> &str {
        &self.event.user_id
    }

    /// The whole command tree, e.g. for help listings.
    pub fn tree(&self) -> &Arc<CommandTree> {
        &self.tree
    }

    /// The node whose handler is running.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("event", &self.event)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

/// Type-erased command handler.
///
/// Implemented for every `Fn(CommandContext, Args) -> impl Future` whose output
/// implements [`IntoResponses`].
pub trait CommandHandler: Send + Sync + 'static {
    /// Runs the handler.
    fn call(&self, ctx: CommandContext, args: Args) -> BoxFuture<'static, DispatchResult<Vec<Response>>>;
}

impl<F, Fut, R> CommandHandler for F
where
    F: Fn(CommandContext, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponses + 'static,
{
    fn call(&self, ctx: CommandContext, args: Args) -> BoxFuture<'static, DispatchResult<Vec<Response>>> {
        (self)(ctx, args).map(IntoResponses::into_responses).boxed()
    }
}

/// A shareable, type-erased handler.
pub type BoxedCommandHandler = Arc<dyn CommandHandler>;

/// Registration metadata for one handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerSpec {
    params: Vec<Param>,
    arg_help: Vec<String>,
    scope: CommandScope,
    feature: Option<FeatureTag>,
    description: Option<String>,
}

impl HandlerSpec {
    /// Starts a spec for a bare (zero argument) handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the next parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Declares several parameters in order.
    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }

    /// Sets the help text of each parameter, in order.
    pub fn arg_help<S: Into<String>>(mut self, help: impl IntoIterator<Item = S>) -> Self {
        self.arg_help = help.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts where the handler may run.
    pub fn scope(mut self, scope: CommandScope) -> Self {
        self.scope = scope;
        self
    }

    /// Tags the handler with a feature. The feature's description wins over
    /// [`description`](Self::description).
    pub fn feature(mut self, feature: FeatureTag) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Describes the handler.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A handler bound to a node at a fixed arity.
pub struct HandlerDescriptor {
    pub(crate) node: NodeId,
    params: Vec<Param>,
    arg_help: Vec<String>,
    scope: CommandScope,
    feature: Option<FeatureTag>,
    description: String,
    handler: BoxedCommandHandler,
    pub(crate) usage: OnceLock<String>,
    pub(crate) all_usages: OnceLock<Vec<String>>,
}

impl HandlerDescriptor {
    pub(crate) fn new(node: NodeId, spec: HandlerSpec, handler: BoxedCommandHandler) -> Self {
        let HandlerSpec {
            params,
            mut arg_help,
            scope,
            feature,
            description,
        } = spec;

        arg_help.resize(params.len(), String::new());

        let description = match feature {
            Some(feature) => feature.description().to_string(),
            None => description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        };

        Self {
            node,
            params,
            arg_help,
            scope,
            feature,
            description,
            handler,
            usage: OnceLock::new(),
            all_usages: OnceLock::new(),
        }
    }

    /// The exact number of arguments this handler answers to.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The node this handler is registered on.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Declared parameters.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Help text per parameter; always as long as [`params`](Self::params).
    pub fn arg_help(&self) -> &[String] {
        &self.arg_help
    }

    /// Each declared parameter with its help text.
    pub fn params_with_help(&self) -> impl Iterator<Item = (&Param, &str)> {
        self.params
            .iter()
            .zip(self.arg_help.iter().map(String::as_str))
    }

    /// Where the handler may run.
    pub fn scope(&self) -> &CommandScope {
        &self.scope
    }

    /// The feature tag, if any.
    pub fn feature(&self) -> Option<FeatureTag> {
        self.feature
    }

    /// Description for help listings.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn handler(&self) -> &BoxedCommandHandler {
        &self.handler
    }
}

impl std::fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("node", &self.node)
            .field("arity", &self.arity())
            .field("scope", &self.scope)
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}
