//! Logging configuration for the default tracing backend.
//!
//! # Design
//! - A single `LoggingConfig` describes the console sink; the environment is read
//!   through a lookup function so parsing stays testable.
//! - Unknown formats fall back to the build-inferred default; an unknown console
//!   target is a construction failure.

use std::env;

use crate::console::ConsoleTarget;
use crate::error::{FacadeError, FacadeResult};

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "HERALD_LOG_FORMAT";
/// Environment variable selecting the console stream.
pub const CONSOLE_ENV: &str = "HERALD_LOG_CONSOLE";
/// Presence disables ANSI colours (see <https://no-color.org>).
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Console sink configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format selection for the sink.
    pub format: LogFormat,
    /// Stream the sink writes to.
    pub console: ConsoleTarget,
    /// Emit ANSI colour codes in human-readable formats.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::infer(),
            console: ConsoleTarget::Stdout,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidSetting`] when `HERALD_LOG_CONSOLE` names an
    /// unknown stream.
    pub fn from_env() -> FacadeResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::InvalidSetting`] when the console setting names an
    /// unknown stream.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FacadeResult<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(FORMAT_ENV) {
            config.format = LogFormat::parse(&value).unwrap_or_else(LogFormat::infer);
        }
        if let Some(value) = lookup(CONSOLE_ENV) {
            config.console =
                ConsoleTarget::parse(&value).ok_or(FacadeError::InvalidSetting {
                    name: CONSOLE_ENV,
                    value,
                })?;
        }
        if lookup(NO_COLOR_ENV).is_some_and(|value| !value.is_empty()) {
            config.ansi = false;
        }

        Ok(config)
    }
}

/// Available output formats for the console sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable, multi-line logs.
    Pretty,
    /// Emit human-readable single-line logs.
    Compact,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Parse a format name (`json`, `pretty`, `compact`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> FacadeResult<LoggingConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        LoggingConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = LoggingConfig::from_lookup(|_| None).expect("defaults parse");
        assert_eq!(config, LoggingConfig::default());
        assert_eq!(config.format, LogFormat::infer());
        assert!(config.ansi);
    }

    #[test]
    fn settings_are_read_from_lookup() {
        let config = from_pairs(&[
            (FORMAT_ENV, "JSON"),
            (CONSOLE_ENV, "stderr"),
            (NO_COLOR_ENV, "1"),
        ])
        .expect("valid settings");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.console, ConsoleTarget::Stderr);
        assert!(!config.ansi);
    }

    #[test]
    fn unknown_format_falls_back_to_inferred() {
        let config = from_pairs(&[(FORMAT_ENV, "xml")]).expect("format fallback");
        assert_eq!(config.format, LogFormat::infer());
    }

    #[test]
    fn unknown_console_is_rejected() {
        let err = from_pairs(&[(CONSOLE_ENV, "printer")]).expect_err("console must be validated");
        match err {
            FacadeError::InvalidSetting { name, value } => {
                assert_eq!(name, CONSOLE_ENV);
                assert_eq!(value, "printer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
