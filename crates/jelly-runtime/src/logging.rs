//! Logging setup for Jelly.
//!
//! One `tracing-subscriber` registry with an [`EnvFilter`] and a single fmt
//! layer, both derived from [`LoggingConfig`]. `RUST_LOG`, when set, replaces
//! the configured base level; module filters are added on top either way.
//!
//! ```rust,ignore
//! let config = jelly_runtime::config::load_config()?;
//! jelly_runtime::logging::init_from_config(&config.logging);
//! ```

use std::ffi::OsStr;
use std::path::Path;

use tracing::{Level, Subscriber, warn};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig, SpanEventConfig};

const DEFAULT_LOG_FILE: &str = "jelly.log";

/// Initializes logging from `config`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = try_init_from_config(config);
}

/// Initializes logging from `config`, failing if a global subscriber is
/// already installed.
///
/// An unparsable level falls back to `info`; run [`validate_config`] first to
/// reject it instead.
///
/// [`validate_config`]: crate::config::validate_config
pub fn try_init_from_config(config: &LoggingConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer(config, make_writer(config)))
        .try_init()
}

fn base_level(config: &LoggingConfig) -> Level {
    config.level.parse().unwrap_or(Level::INFO)
}

fn module_directives(config: &LoggingConfig) -> Vec<String> {
    config
        .filters
        .iter()
        .map(|(module, level)| format!("{module}={}", level.to_lowercase()))
        .collect()
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    let base = base_level(config).to_string().to_lowercase();
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base));

    for directive in module_directives(config) {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => warn!(directive = %directive, error = %e, "Ignoring invalid log directive"),
        }
    }

    filter
}

fn fmt_span(events: &SpanEventConfig) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, span)| acc | span)
}

/// Splits a configured log file path into the directory and file name the
/// appender expects. A bare file name lives in the working directory.
fn log_file_location(path: &Path) -> (&Path, &OsStr) {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
    (directory, file_name)
}

fn make_writer(config: &LoggingConfig) -> BoxMakeWriter {
    match (config.output, &config.file_path) {
        (LogOutput::Stdout, _) => BoxMakeWriter::new(std::io::stdout),
        (LogOutput::Stderr, _) => BoxMakeWriter::new(std::io::stderr),
        (LogOutput::File, Some(path)) => {
            let (directory, file_name) = log_file_location(path);
            BoxMakeWriter::new(tracing_appender::rolling::never(directory, file_name))
        }
        (LogOutput::File, None) => {
            warn!("File output requested but no file path configured, falling back to stdout");
            BoxMakeWriter::new(std::io::stdout)
        }
    }
}

fn effective_format(format: LogFormat) -> LogFormat {
    match format {
        #[cfg(not(feature = "json-log"))]
        LogFormat::Json => {
            warn!("JSON log format requires the json-log feature, using full format");
            LogFormat::Full
        }
        other => other,
    }
}

fn fmt_layer<S>(config: &LoggingConfig, writer: BoxMakeWriter) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_span_events(fmt_span(&config.span_events))
        .with_thread_ids(config.thread_ids)
        .with_file(config.file_location)
        .with_line_number(config.file_location);

    match effective_format(config.format) {
        #[cfg(feature = "json-log")]
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        _ => layer.boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_and_module_filters() {
        let mut config = LoggingConfig::default();
        config.level = "debug".to_string();
        config
            .filters
            .insert("jelly_framework".to_string(), "TRACE".to_string());

        assert_eq!(base_level(&config), Level::DEBUG);
        assert_eq!(module_directives(&config), vec!["jelly_framework=trace"]);
    }

    #[test]
    fn test_bad_level_falls_back() {
        let mut config = LoggingConfig::default();
        config.level = "loud".to_string();
        assert_eq!(base_level(&config), Level::INFO);
    }

    #[test]
    fn test_span_events() {
        let mut events = SpanEventConfig::default();
        assert_eq!(fmt_span(&events), FmtSpan::NONE);

        events.new = true;
        events.close = true;
        assert_eq!(fmt_span(&events), FmtSpan::NEW | FmtSpan::CLOSE);

        events.enter = true;
        events.exit = true;
        assert_eq!(fmt_span(&events), FmtSpan::FULL);
    }

    #[test]
    fn test_log_file_location() {
        let (dir, name) = log_file_location(Path::new("logs/bot.log"));
        assert_eq!(dir, Path::new("logs"));
        assert_eq!(name, "bot.log");

        let (dir, name) = log_file_location(Path::new("bot.log"));
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "bot.log");

        let (dir, name) = log_file_location(Path::new(".."));
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, DEFAULT_LOG_FILE);
    }

    #[test]
    fn test_file_output_writes_to_resolved_path() {
        let dir = std::env::temp_dir().join(format!("jelly-log-{}", std::process::id()));
        let mut config = LoggingConfig::default();
        config.output = LogOutput::File;
        config.file_path = Some(dir.join("bot.log"));

        let subscriber = tracing_subscriber::registry().with(fmt_layer(&config, make_writer(&config)));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("written to file");
        });

        let written = std::fs::read_to_string(dir.join("bot.log")).unwrap();
        assert!(written.contains("written to file"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(not(feature = "json-log"))]
    #[test]
    fn test_json_without_feature_falls_back() {
        assert_eq!(effective_format(LogFormat::Json), LogFormat::Full);
        assert_eq!(effective_format(LogFormat::Pretty), LogFormat::Pretty);
    }
}
