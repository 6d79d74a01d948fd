//! Configuration module for the Jelly runtime.
//!
//! Configuration is layered with figment: built-in defaults, TOML files,
//! `JELLY_*` environment variables, then programmatic overrides.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    CommandConfig, JellyConfig, LogFormat, LogOutput, LoggingConfig, ReplyConfig, SpanEventConfig,
    UsageConfig,
};
pub use validation::validate_config;
