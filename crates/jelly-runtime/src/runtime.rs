//! Runtime orchestration.
//!
//! [`JellyRuntime`] owns everything a running bot needs around the command
//! tree: the loaded configuration, the dispatcher, and the usage worker.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use jelly_runtime::JellyRuntime;
//!
//! let runtime = JellyRuntime::builder()
//!     .config_file("jelly.toml")
//!     .with_logging()
//!     .build(|tree| {
//!         let echo = tree.add_child(NodeId::ROOT, NodeSpec::new(["echo"]))?;
//!         tree.register(echo, HandlerSpec::new().param(Param::text("text")), echo_handler)
//!     })?;
//!
//! let replies = runtime.handle(event).await;
//! runtime.shutdown().await;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jelly_core::{Response, TextEvent};
use jelly_framework::{CommandTree, Dispatcher, RootSpec, TreeResult};

use crate::config::{ConfigLoader, JellyConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use crate::usage::{QueuedUsageRecorder, TracingUsageSink, UsageSink};

/// A configured dispatcher plus the background services around it.
pub struct JellyRuntime {
    config: JellyConfig,
    dispatcher: Dispatcher,
    usage_worker: Option<UsageWorker>,
}

struct UsageWorker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl JellyRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration, logging usage
    /// through `tracing`.
    ///
    /// `assemble` receives a tree whose root follows `config.command` and
    /// adds the commands.
    pub fn from_config<F>(config: JellyConfig, assemble: F) -> RuntimeResult<Self>
    where
        F: FnOnce(&mut CommandTree) -> TreeResult<()>,
    {
        Self::assemble(config, Arc::new(TracingUsageSink), assemble)
    }

    fn assemble<F>(config: JellyConfig, sink: Arc<dyn UsageSink>, assemble: F) -> RuntimeResult<Self>
    where
        F: FnOnce(&mut CommandTree) -> TreeResult<()>,
    {
        validate_config(&config)?;

        let root = RootSpec::new(
            config.command.prefix.clone(),
            config.command.delimiters.iter().cloned(),
        )
        .case_insensitive(config.command.case_insensitive);

        let mut tree = CommandTree::new(root)?;
        assemble(&mut tree)?;

        let mut dispatcher = Dispatcher::new(tree);
        dispatcher.warm_usage();

        let usage_worker = if config.usage.enabled {
            tokio::runtime::Handle::try_current().map_err(|_| RuntimeError::NoAsyncRuntime)?;

            let cancel = CancellationToken::new();
            let (recorder, handle) =
                QueuedUsageRecorder::spawn(sink, config.usage.queue_capacity, cancel.clone());
            dispatcher = dispatcher.with_usage_recorder(Arc::new(recorder));
            Some(UsageWorker { cancel, handle })
        } else {
            None
        };

        info!(
            prefix = %config.command.prefix,
            nodes = dispatcher.tree().len(),
            usage_recording = config.usage.enabled,
            "Runtime initialized"
        );

        Ok(Self {
            config,
            dispatcher,
            usage_worker,
        })
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &JellyConfig {
        &self.config
    }

    /// The dispatcher, e.g. to layer tower middleware around it.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The assembled command tree.
    pub fn tree(&self) -> &Arc<CommandTree> {
        self.dispatcher.tree()
    }

    /// Handles one message and returns the replies to send.
    ///
    /// Never fails: a dispatch error is logged and answered with the
    /// configured failure message. At most `replies.max_responses` replies
    /// are returned.
    pub async fn handle(&self, event: TextEvent) -> Vec<Response> {
        match self.dispatcher.handle(event).await {
            Ok(mut responses) => {
                let cap = self.config.replies.max_responses;
                if responses.len() > cap {
                    debug!(
                        produced = responses.len(),
                        cap, "Dropping responses over the per-message cap"
                    );
                    responses.truncate(cap);
                }
                responses
            }
            Err(e) => {
                warn!(error = %e, "Command failed");
                vec![Response::text(self.config.replies.failure_message.as_str())]
            }
        }
    }

    /// Stops the usage worker after it stores what is already queued.
    pub async fn shutdown(self) {
        let Some(worker) = self.usage_worker else {
            return;
        };

        worker.cancel.cancel();
        if let Err(e) = worker.handle.await {
            warn!(error = %e, "Usage worker ended abnormally");
        }
        info!("Runtime shut down");
    }
}

impl std::fmt::Debug for JellyRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JellyRuntime")
            .field("config", &self.config)
            .field("dispatcher", &self.dispatcher)
            .field("usage_worker", &self.usage_worker.is_some())
            .finish()
    }
}

/// Builder for creating a `JellyRuntime` with custom configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    config: Option<JellyConfig>,
    usage_sink: Arc<dyn UsageSink>,
    init_logging: bool,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            config: None,
            usage_sink: Arc::new(TracingUsageSink),
            init_logging: false,
        }
    }

    /// Uses this configuration as is; nothing is loaded.
    pub fn config(mut self, config: JellyConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: JellyConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Stores usage records in `sink` instead of logging them.
    pub fn usage_sink(mut self, sink: impl UsageSink) -> Self {
        self.usage_sink = Arc::new(sink);
        self
    }

    /// Installs the global subscriber from the loaded logging configuration.
    pub fn with_logging(mut self) -> Self {
        self.init_logging = true;
        self
    }

    /// Loads the configuration and assembles the runtime.
    ///
    /// Must run inside a tokio runtime when usage recording is enabled.
    pub fn build<F>(self, assemble: F) -> RuntimeResult<JellyRuntime>
    where
        F: FnOnce(&mut CommandTree) -> TreeResult<()>,
    {
        let config = match self.config {
            Some(config) => config,
            None => self.config_loader.load()?,
        };

        if self.init_logging {
            logging::init_from_config(&config.logging);
        }

        JellyRuntime::assemble(config, self.usage_sink, assemble)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::usage::MemoryUsageSink;
    use jelly_core::{Args, ChannelKind, FeatureTag, Param};
    use jelly_framework::{CommandContext, HandlerSpec, NodeId, NodeSpec, TreeError};

    const ECHO: FeatureTag = FeatureTag::new("txt_echo", "Repeat the given text.");

    fn test_config() -> JellyConfig {
        let mut config = JellyConfig::default();
        config.command.prefix = "!".to_string();
        config.command.delimiters = vec!["/".to_string()];
        config.replies.max_responses = 2;
        config
    }

    fn event(content: &str) -> TextEvent {
        TextEvent::new(content, ChannelKind::PrivateText, "c1", "u1")
    }

    fn commands(tree: &mut CommandTree) -> TreeResult<()> {
        let echo = tree.add_child(NodeId::ROOT, NodeSpec::new(["echo"]))?;
        tree.register(
            echo,
            HandlerSpec::new().param(Param::text("text")).feature(ECHO),
            |_ctx: CommandContext, args: Args| async move { args.text(0).map(str::to_string) },
        )?;

        let many = tree.add_child(NodeId::ROOT, NodeSpec::new(["many"]))?;
        tree.register(many, HandlerSpec::new(), |_ctx: CommandContext, _args: Args| async {
            vec!["one", "two", "three"]
        })?;

        let sq = tree.add_child(NodeId::ROOT, NodeSpec::new(["sq"]))?;
        tree.register(
            sq,
            HandlerSpec::new().param(Param::integer("n")),
            |_ctx: CommandContext, args: Args| async move { args.integer(0).map(|n| (n * n).to_string()) },
        )
    }

    #[tokio::test]
    async fn test_handle_and_record_usage() {
        let sink = MemoryUsageSink::new();
        let runtime = JellyRuntime::builder()
            .config(test_config())
            .usage_sink(sink.clone())
            .build(commands)
            .unwrap();

        let out = runtime.handle(event("!/echo/hi")).await;
        assert_eq!(out, vec![Response::text("hi")]);
        assert!(runtime.handle(event("JC echo hi")).await.is_empty());

        runtime.shutdown().await;

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].feature, Some(ECHO));
        assert_eq!(records[0].user_id, "u1");
    }

    #[tokio::test]
    async fn test_failure_becomes_reply() {
        let runtime = JellyRuntime::builder()
            .config(test_config())
            .build(commands)
            .unwrap();

        let out = runtime.handle(event("!/sq/seven")).await;
        assert_eq!(
            out,
            vec![Response::text(runtime.config().replies.failure_message.as_str())]
        );

        let out = runtime.handle(event("!/sq/7")).await;
        assert_eq!(out, vec![Response::text("49")]);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_responses_are_capped() {
        let runtime = JellyRuntime::from_config(test_config(), commands).unwrap();

        let out = runtime.handle(event("!/many")).await;
        assert_eq!(out, vec![Response::text("one"), Response::text("two")]);

        runtime.shutdown().await;
    }

    #[test]
    fn test_usage_disabled_needs_no_async_runtime() {
        let mut config = test_config();
        config.usage.enabled = false;

        let runtime = JellyRuntime::from_config(config, commands).unwrap();
        assert_eq!(runtime.tree().prefix(), "!");
        assert!(runtime.tree().find(&["echo"]).is_some());

        let out = tokio_test::block_on(runtime.handle(event("!/echo/sync")));
        assert_eq!(out, vec![Response::text("sync")]);
    }

    #[test]
    fn test_usage_enabled_outside_async_runtime() {
        let result = JellyRuntime::from_config(test_config(), commands);
        assert!(matches!(result, Err(RuntimeError::NoAsyncRuntime)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = test_config();
        config.command.delimiters.clear();
        config.usage.enabled = false;

        let result = JellyRuntime::from_config(config, commands);
        assert!(matches!(
            result,
            Err(RuntimeError::Config(ConfigError::ValidationError { .. }))
        ));
    }

    #[test]
    fn test_tree_error_is_reported() {
        let mut config = test_config();
        config.usage.enabled = false;

        let result = JellyRuntime::from_config(config, |tree| {
            tree.add_child(NodeId::ROOT, NodeSpec::new(Vec::<String>::new()))
                .map(|_| ())
        });
        assert!(matches!(result, Err(RuntimeError::Tree(TreeError::EmptyCodes))));
    }
}
