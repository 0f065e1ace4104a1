//! # Logging
//!
//! The library only emits `tracing` events. Applications and tests that want
//! to see them install a subscriber with [`init_logging`].

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (default: INFO)
    pub level: Level,
    /// Extra filter directive for this crate, e.g. `minidb=trace`
    pub directive: Option<String>,
    pub include_thread_ids: bool,
    pub include_file_line: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            directive: None,
            include_thread_ids: false,
            include_file_line: true,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    #[must_use]
    pub fn with_thread_ids(mut self, include: bool) -> Self {
        self.include_thread_ids = include;
        self
    }

    #[must_use]
    pub fn with_file_line(mut self, include: bool) -> Self {
        self.include_file_line = include;
        self
    }

    /// Config for a `RUST_LOG`-style value: either a bare level or a
    /// comma-separated list of directives such as `info,minidb=trace`.
    #[must_use]
    pub fn from_rust_log(value: &str) -> Self {
        match value.trim().parse::<Level>() {
            Ok(level) => Self::default().with_level(level),
            Err(_) => Self::default().with_directive(value.trim()),
        }
    }

    /// Build the env filter for this config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Logging`] if any directive does not parse.
    pub fn filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::new(self.level.to_string());
        let directives = self.directive.as_deref().unwrap_or_default();
        for part in directives.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let directive = part
                .parse()
                .map_err(|e| Error::Logging(format!("invalid directive '{}': {}", part, e)))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

/// Install a global fmt subscriber.
///
/// # Errors
///
/// Returns [`Error::Logging`] if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter()?)
        .with_target(true)
        .with_thread_ids(config.include_thread_ids)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::debug!(?config, "logging initialized");
    Ok(())
}

/// Install a subscriber configured from `RUST_LOG`, or the defaults when unset.
pub fn init_logging_from_env() -> Result<()> {
    let config = match std::env::var("RUST_LOG") {
        Ok(value) => LogConfig::from_rust_log(&value),
        Err(_) => LogConfig::default(),
    };
    init_logging(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_crate_directive() {
        let config = LogConfig::new()
            .with_level(Level::WARN)
            .with_directive("minidb=trace");
        assert!(config.filter().is_ok());
    }

    #[test]
    fn filter_accepts_directive_lists() {
        let config = LogConfig::new().with_directive("info, minidb=trace,rusqlite=warn");
        assert!(config.filter().is_ok());

        let config = LogConfig::new().with_directive("info,minidb=notalevel");
        assert!(matches!(config.filter(), Err(Error::Logging(msg)) if msg.contains("minidb=notalevel")));
    }

    #[test]
    fn rust_log_values() {
        let config = LogConfig::from_rust_log("debug");
        assert_eq!(config.level, Level::DEBUG);
        assert!(config.directive.is_none());

        let config = LogConfig::from_rust_log("info,minidb=trace");
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.directive.as_deref(), Some("info,minidb=trace"));
        assert!(config.filter().is_ok());
    }

    #[test]
    fn filter_rejects_bad_directive() {
        let config = LogConfig::new().with_directive("minidb=notalevel");
        assert!(matches!(config.filter(), Err(Error::Logging(_))));
    }
}
