//! # Logging & Tracing Infrastructure
//!
//! Structured diagnostics with the `tracing` crate.
//!
//! ## Overview
//!
//! Diagnostics always go to **stderr** so that operator-facing output printed
//! on stdout (progress lines, verdicts, the authorization URL) stays clean and
//! can be piped. The verbosity is driven by the `--debug` flag of each binary:
//!
//! | `--debug` | level |
//! |-----------|-------|
//! | 0         | warn  |
//! | 1         | info  |
//! | 2         | debug |
//! | 3         | trace |
//!
//! `RUST_LOG`, when set, replaces the computed filter entirely.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogLevel, LoggingConfig};
//!
//! let config = LoggingConfig::default().with_level(LogLevel::from_debug_level(2));
//! init_logging(config)?;
//! tracing::debug!(folder_id = "0", "Walking folder");
//! ```

use crate::error::{Error, Result};
use std::io;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Highest value accepted by `--debug`
pub const MAX_DEBUG_LEVEL: u8 = 3;

/// Minimum severity that is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Map a `--debug` count onto a level. Values above
    /// [`MAX_DEBUG_LEVEL`] saturate at `Trace`; callers reject them earlier.
    pub fn from_debug_level(debug: u8) -> Self {
        match debug {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Single-line format, the default for CLI use
    #[default]
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Minimum log level for firebreak crates
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_auth=trace,provider_box=debug")
    pub filter: Option<String>,
    /// Display target module in logs
    pub display_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Warn,
            filter: None,
            display_target: false,
        }
    }
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set minimum log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Enable or disable target display
    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }
}

/// Initialize the logging system
///
/// Call once during startup. A second call returns [`Error::Config`].
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(from_env) if !from_env.is_empty() => EnvFilter::try_new(from_env)
            .map_err(|e| Error::Config(format!("Invalid RUST_LOG: {}", e)))?,
        _ => build_filter(&config)?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.display_target)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(config.display_target)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .without_time()
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = if let Some(custom_filter) = &config.filter {
        custom_filter.clone()
    } else {
        // Our crates at the requested level, HTTP stack only when tracing
        let level = config.level.as_directive();
        let deps = if config.level == LogLevel::Trace {
            "debug"
        } else {
            "warn"
        };
        format!(
            "warn,firebreak_cli={level},core_runtime={level},core_auth={level},\
             provider_box={level},provider_wildfire={level},bridge_desktop={level},\
             h2={deps},hyper={deps},hyper_util={deps},reqwest={deps}"
        )
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

/// Helper function to redact sensitive field values
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("refresh_token", "abc"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("folder_id", "0"), "0");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    const SENSITIVE_FIELDS: &[&str] = &[
        "token",
        "password",
        "secret",
        "api_key",
        "apikey",
        "authorization",
        "bearer",
        "code",
    ];

    let field_lower = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|&f| field_lower.contains(f)) {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_level(LogLevel::Debug)
            .with_filter("core_auth=trace")
            .with_target(true);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.filter, Some("core_auth=trace".to_string()));
        assert!(config.display_target);
    }

    #[test]
    fn test_debug_level_mapping() {
        assert_eq!(LogLevel::from_debug_level(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_debug_level(1), LogLevel::Info);
        assert_eq!(LogLevel::from_debug_level(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_debug_level(3), LogLevel::Trace);
        assert_eq!(LogLevel::from_debug_level(9), LogLevel::Trace);
    }

    #[test]
    fn test_build_filter() {
        let config = LoggingConfig::default().with_level(LogLevel::Debug);
        let filter = build_filter(&config).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("provider_box=debug"));
        assert!(rendered.contains("reqwest=warn"));
    }

    #[test]
    fn test_trace_opens_http_stack() {
        let config = LoggingConfig::default().with_level(LogLevel::Trace);
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("reqwest=debug"));
    }

    #[test]
    fn test_build_custom_filter() {
        let config = LoggingConfig::default().with_filter("core_auth=trace,provider_box=debug");
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("core_auth=trace"));
    }

    #[test]
    fn test_redact_if_sensitive() {
        assert_eq!(
            redact_if_sensitive("access_token", "secret123"),
            "[REDACTED]"
        );
        assert_eq!(redact_if_sensitive("client_secret", "s"), "[REDACTED]");
        assert_eq!(redact_if_sensitive("api_key", "k"), "[REDACTED]");
        assert_eq!(redact_if_sensitive("code", "c"), "[REDACTED]");
        assert_eq!(redact_if_sensitive("file_id", "12345"), "12345");
    }
}
