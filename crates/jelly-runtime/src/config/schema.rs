//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct JellyConfig {
    /// Command root settings.
    #[serde(default)]
    pub command: CommandConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Usage recording settings.
    #[serde(default)]
    pub usage: UsageConfig,

    /// Reply shaping settings.
    #[serde(default)]
    pub replies: ReplyConfig,
}

/// Settings for the root of the command tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandConfig {
    /// Text every command must start with.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Candidate delimiters, tried in order after the prefix.
    #[serde(default = "default_delimiters")]
    pub delimiters: Vec<String>,

    /// Whether command codes match regardless of case.
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            delimiters: default_delimiters(),
            case_insensitive: true,
        }
    }
}

fn default_prefix() -> String {
    "JC".to_string()
}

fn default_delimiters() -> Vec<String> {
    vec!["\n".to_string(), " ".to_string()]
}

fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Include thread IDs.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    /// Span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Per-module levels, e.g. `jelly_framework = "trace"`.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            thread_ids: false,
            file_location: false,
            span_events: SpanEventConfig::default(),
            filters: BTreeMap::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One short line per event.
    #[default]
    Compact,
    /// The default `tracing-subscriber` format.
    Full,
    /// Multi-line, human oriented.
    Pretty,
    /// Newline-delimited JSON. Needs the `json-log` feature.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Usage recording configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageConfig {
    /// Whether usage records are collected at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Records buffered before new ones are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

/// How dispatch results are turned into replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyConfig {
    /// Sent in place of the handler's output when dispatch fails.
    #[serde(default = "default_failure_message")]
    pub failure_message: String,

    /// Most responses sent for one message; the rest are dropped.
    #[serde(default = "default_max_responses")]
    pub max_responses: usize,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            failure_message: default_failure_message(),
            max_responses: default_max_responses(),
        }
    }
}

fn default_failure_message() -> String {
    "Something went wrong while running this command.".to_string()
}

fn default_max_responses() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: JellyConfig = serde_json::from_str(
            r#"{"command": {"prefix": "!"}, "logging": {"format": "pretty", "output": "stderr"}}"#,
        )
        .unwrap();

        assert_eq!(config.command.prefix, "!");
        assert_eq!(config.command.delimiters, vec!["\n", " "]);
        assert!(config.command.case_insensitive);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.output, LogOutput::Stderr);
        assert_eq!(config.replies, ReplyConfig::default());
    }
}
