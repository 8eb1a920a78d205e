//! Telemetry and tracing utilities
//!
//! The pipeline core only emits `trace`/`debug` events. Applications that
//! want to see them install a subscriber, either their own or the one built
//! here.
//!
//! ## Example
//!
//! ```rust,ignore
//! use asynq::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! init_subscriber(SubscriberConfig::default())?;
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::TRACE)
//!     .output_format(OutputFormat::JsonCompact)
//!     .build();
//! init_subscriber(config)?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "ASYNQ_LOG";
/// Environment variable holding the output format.
pub const LOG_FORMAT_ENV: &str = "ASYNQ_LOG_FORMAT";

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON with the current span attached
    Json,
    /// Flat JSON without span context
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "compact" | "json-compact" => Ok(Self::JsonCompact),
            other => Err(Error::TelemetryInit(format!(
                "Invalid output format: {other}. Valid options: text, json, compact"
            ))),
        }
    }
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Log level
    pub log_level: tracing::Level,
    /// Output format
    pub output_format: OutputFormat,
    /// Colored output
    pub ansi: bool,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            ansi: true,
        }
    }
}

impl SubscriberConfig {
    /// Create a new builder for SubscriberConfig
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Everything the pipeline core emits, as text
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::TRACE,
            ..Self::default()
        }
    }

    /// Read `ASYNQ_LOG` and `ASYNQ_LOG_FORMAT`, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            builder = builder.log_level_str(&level)?;
        }
        if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
            builder = builder.output_format(format.parse()?);
        }
        Ok(builder.build())
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    ansi: Option<bool>,
}

impl SubscriberConfigBuilder {
    /// Set the log level
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self> {
        let level = level.trim().parse::<tracing::Level>().map_err(|_| {
            Error::TelemetryInit(format!(
                "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
            ))
        })?;
        self.log_level = Some(level);
        Ok(self)
    }

    /// Set the output format
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Enable or disable colored output
    pub fn ansi(mut self, ansi: bool) -> Self {
        self.ansi = Some(ansi);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SubscriberConfig {
        let defaults = SubscriberConfig::default();
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(defaults.log_level),
            output_format: self.output_format.unwrap_or(defaults.output_format),
            ansi: self.ansi.unwrap_or(defaults.ansi),
        }
    }
}

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level when set. Fails if
/// a global subscriber is already installed.
pub fn init_subscriber(config: SubscriberConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(true);

    let installed = match config.output_format {
        OutputFormat::Text => builder.try_init(),
        OutputFormat::Json => builder.json().with_current_span(true).try_init(),
        OutputFormat::JsonCompact => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
    };

    installed.map_err(|e| Error::TelemetryInit(e.to_string()))
}
