//! Command dispatcher for the Jelly framework.
//!
//! The [`Dispatcher`] is the single entry point for inbound text. For each
//! message it:
//!
//! 1. Strips the root prefix; text without it is not a command
//! 2. Picks the first root delimiter the remaining text starts with
//! 3. Resolves the rest against the command tree
//! 4. Reports usage, coerces the arguments and runs the matched handler
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(tree)
//!     .with_usage_recorder(recorder);
//!
//! let responses = dispatcher
//!     .handle(TextEvent::new("!/echo/hello", ChannelKind::PrivateText, "c1", "u1"))
//!     .await?;
//! ```
//!
//! # Tower Service Integration
//!
//! `Dispatcher` implements `tower::Service<TextEvent>`, so middleware such as
//! timeouts or concurrency limits can be layered around it.

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::Service;
use tracing::{Instrument, debug, debug_span, trace};

use jelly_core::{
    ArgumentCoercion, Args, DispatchError, DispatchResult, NoopUsageRecorder, Response,
    ScopeChecker, ScopeMembership, StandardCoercion, TextEvent, UsageRecord, UsageRecorder,
};

use crate::command::{CommandContext, CommandTree, HandlerListing, NodeId, Resolution};
use crate::error::TreeResult;

/// Routes inbound text to command handlers.
///
/// # Thread Safety
///
/// `Dispatcher` is cheap to clone and `Send + Sync`; any number of messages
/// may be handled concurrently. The tree is only ever read.
#[derive(Clone)]
pub struct Dispatcher {
    tree: Arc<CommandTree>,
    scope_checker: Arc<dyn ScopeChecker>,
    coercion: Arc<dyn ArgumentCoercion>,
    recorder: Arc<dyn UsageRecorder>,
}

impl Dispatcher {
    /// Creates a dispatcher over an assembled tree.
    ///
    /// Scopes are checked by membership, arguments use
    /// [`StandardCoercion`], and usage is not recorded until a recorder is set.
    pub fn new(tree: CommandTree) -> Self {
        Self::from_shared(Arc::new(tree))
    }

    /// Creates a dispatcher over a tree that is already shared.
    pub fn from_shared(tree: Arc<CommandTree>) -> Self {
        Self {
            tree,
            scope_checker: Arc::new(ScopeMembership),
            coercion: Arc::new(StandardCoercion),
            recorder: Arc::new(NoopUsageRecorder),
        }
    }

    /// Replaces the scope checker.
    pub fn with_scope_checker(mut self, checker: impl ScopeChecker + 'static) -> Self {
        self.scope_checker = Arc::new(checker);
        self
    }

    /// Replaces the argument coercion.
    pub fn with_coercion(mut self, coercion: impl ArgumentCoercion + 'static) -> Self {
        self.coercion = Arc::new(coercion);
        self
    }

    /// Replaces the usage recorder.
    pub fn with_usage_recorder(mut self, recorder: Arc<dyn UsageRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// The command tree.
    pub fn tree(&self) -> &Arc<CommandTree> {
        &self.tree
    }

    /// Computes every usage string now instead of on first request.
    pub fn warm_usage(&self) {
        self.tree.warm_usage();
    }

    /// Lists handlers under `node`; see [`CommandTree::list_handlers`].
    pub fn list_handlers(&self, node: NodeId, recursive: bool) -> TreeResult<Vec<HandlerListing>> {
        self.tree.list_handlers(node, recursive)
    }

    /// Strips the prefix and the first matching delimiter from `content`.
    ///
    /// Returns the delimiter and the remaining text, or `None` if `content` is
    /// not a command for this dispatcher.
    pub fn strip_command<'a>(&self, content: &'a str) -> Option<(&str, &'a str)> {
        let rest = content.strip_prefix(self.tree.prefix())?;

        self.tree
            .delimiters()
            .iter()
            .find_map(|delimiter| Some((delimiter.as_str(), rest.strip_prefix(delimiter.as_str())?)))
    }

    /// Resolves `event` without running anything.
    pub fn resolve(&self, event: &TextEvent) -> Resolution {
        let Some((delimiter, rest)) = self.strip_command(&event.content) else {
            trace!("Message is not a command");
            return Resolution::NoMatch;
        };

        self.tree.resolve(
            NodeId::ROOT,
            rest,
            delimiter,
            event.channel_kind,
            self.scope_checker.as_ref(),
        )
    }

    /// Handles one message.
    ///
    /// Returns an empty list if the message is not a command, a single
    /// rejection if the matched handler is out of scope, and the handler's
    /// responses otherwise. Fails if an argument cannot be coerced or the
    /// handler reports an error; the handler is never run with partial
    /// arguments.
    pub async fn handle(&self, event: TextEvent) -> DispatchResult<Vec<Response>> {
        let span = debug_span!(
            "handle",
            channel_kind = %event.channel_kind,
            channel_id = %event.channel_id,
            user_id = %event.user_id,
        );

        self.handle_inner(event).instrument(span).await
    }

    async fn handle_inner(&self, event: TextEvent) -> DispatchResult<Vec<Response>> {
        let (node, tokens) = match self.resolve(&event) {
            Resolution::NoMatch => return Ok(Vec::new()),
            Resolution::OutOfScope { response, .. } => return Ok(vec![response]),
            Resolution::Matched { node, tokens } => (node, tokens),
        };

        let Some(descriptor) = self.tree.handler(node, tokens.len()) else {
            return Ok(Vec::new());
        };

        self.recorder.record(UsageRecord::now(
            descriptor.feature(),
            &event.channel_id,
            &event.user_id,
        ));

        let values = descriptor
            .params()
            .iter()
            .zip(&tokens)
            .map(|(param, token)| self.coercion.coerce(param.kind, token))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| debug!(error = %e, "Argument coercion failed"))?;

        debug!(
            node = %node,
            arity = descriptor.arity(),
            usage = self.tree.handler_usage(descriptor),
            "Invoking command handler"
        );

        let ctx = CommandContext::new(Arc::new(event), Arc::clone(&self.tree), node);
        descriptor.handler().call(ctx, Args::new(values)).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("prefix", &self.tree.prefix())
            .field("delimiters", &self.tree.delimiters())
            .field("node_count", &self.tree.len())
            .finish_non_exhaustive()
    }
}

impl Service<TextEvent> for Dispatcher {
    type Response = Vec<Response>;
    type Error = DispatchError;
    type Future = BoxFuture<'static, DispatchResult<Vec<Response>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, event: TextEvent) -> Self::Future {
        let dispatcher = self.clone();
        async move { dispatcher.handle(event).await }.boxed()
    }
}
