//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{CommandConfig, JellyConfig, LogOutput, LoggingConfig, ReplyConfig, UsageConfig};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validates the entire configuration.
pub fn validate_config(config: &JellyConfig) -> ConfigResult<()> {
    validate_command_config(&config.command)?;
    validate_logging_config(&config.logging)?;
    validate_usage_config(&config.usage)?;
    validate_reply_config(&config.replies)?;
    Ok(())
}

fn validate_command_config(command: &CommandConfig) -> ConfigResult<()> {
    if command.prefix.is_empty() {
        return Err(ConfigError::validation("Command prefix must not be empty"));
    }

    if command.delimiters.is_empty() {
        return Err(ConfigError::validation(
            "At least one command delimiter is required",
        ));
    }

    if command.delimiters.iter().any(String::is_empty) {
        return Err(ConfigError::validation(
            "Command delimiters must not be empty strings",
        ));
    }

    Ok(())
}

fn validate_log_level(level: &str) -> ConfigResult<()> {
    if !VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(ConfigError::validation(format!(
            "Invalid log level: {level}. Valid values are: {VALID_LOG_LEVELS:?}"
        )));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    validate_log_level(&logging.level)?;

    for (module, level) in &logging.filters {
        validate_log_level(level)
            .map_err(|_| ConfigError::validation(format!("Invalid log level for {module}: {level}")))?;
    }

    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "File log output requires logging.file_path",
        ));
    }

    Ok(())
}

fn validate_usage_config(usage: &UsageConfig) -> ConfigResult<()> {
    if usage.queue_capacity == 0 {
        return Err(ConfigError::validation(
            "Usage queue capacity must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_reply_config(replies: &ReplyConfig) -> ConfigResult<()> {
    if replies.max_responses == 0 {
        return Err(ConfigError::validation(
            "Max responses must be greater than 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&JellyConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_command_root() {
        let mut config = JellyConfig::default();
        config.command.prefix.clear();
        assert!(validate_config(&config).is_err());

        let mut config = JellyConfig::default();
        config.command.delimiters.clear();
        assert!(validate_config(&config).is_err());

        let mut config = JellyConfig::default();
        config.command.delimiters.push(String::new());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = JellyConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = JellyConfig::default();
        config.logging.level = "DEBUG".to_string();
        config
            .logging
            .filters
            .insert("jelly_framework".to_string(), "loud".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_file_output_needs_path() {
        let mut config = JellyConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("jelly.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_capacities() {
        let mut config = JellyConfig::default();
        config.usage.queue_capacity = 0;
        assert!(validate_config(&config).is_err());

        let mut config = JellyConfig::default();
        config.replies.max_responses = 0;
        assert!(validate_config(&config).is_err());
    }
}
