//! Logging setup for pocketlink binaries.
//!
//! Events go to stderr through `tracing-subscriber` (text or JSON, filtered
//! by `RUST_LOG` or the configured level) and, unfiltered, into an in-memory
//! [`LogBuffer`] holding the most recent entries.

pub mod ring_buffer;

pub use ring_buffer::{LogBuffer, LogEntry, LogLevel, RingBufferLayer, DEFAULT_CAPACITY};

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use typed_builder::TypedBuilder;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetrySettings {
    #[builder(default)]
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is not set.
    #[builder(default = "warn".to_string(), setter(into))]
    pub default_level: String,
    #[builder(default = DEFAULT_CAPACITY)]
    pub buffer_capacity: usize,
}

fn env_filter(default_level: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| TelemetryError::InvalidFilter {
            filter: default_level.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Installs the global subscriber and returns the buffer it feeds.
///
/// Call once at startup.
pub fn init(settings: &TelemetrySettings) -> Result<LogBuffer, TelemetryError> {
    let filter = env_filter(&settings.default_level)?;
    let buffer = LogBuffer::with_capacity(settings.buffer_capacity);
    let registry = tracing_subscriber::registry().with(buffer.layer());

    let installed = match settings.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .try_init(),
    };
    installed.map_err(|e| TelemetryError::Install(e.to_string()))?;

    Ok(buffer)
}
