//! Jelly Runtime - the layer that turns a command tree into a running bot.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `JellyConfig`)
//! - Logging setup from configuration (`logging::init_from_config`)
//! - Background usage recording (`QueuedUsageRecorder`, `UsageSink`)
//! - `JellyRuntime`, which assembles the dispatcher from configuration and
//!   answers every message, failures included
//!
//! ```ignore
//! use jelly_runtime::JellyRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = JellyRuntime::builder().with_logging().build(register_commands)?;
//!
//!     for reply in runtime.handle(event).await {
//!         send(reply).await;
//!     }
//!
//!     runtime.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod usage;

pub use config::{ConfigError, ConfigLoader, ConfigResult, JellyConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{init_from_config, try_init_from_config};
pub use runtime::{JellyRuntime, RuntimeBuilder};
pub use usage::{MemoryUsageSink, QueuedUsageRecorder, TracingUsageSink, UsageSink, UsageSinkError};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
