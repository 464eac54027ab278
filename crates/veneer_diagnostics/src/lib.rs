//! Tracing configuration for Veneer.
//!
//! Veneer crates only emit events through [`tracing`]; installing a
//! subscriber is left to the application. [`TracingConfig`] builds the usual
//! one: an [`EnvFilter`] plus a `fmt` layer in one of three formats.
//!
//! # Example
//!
//! ```
//! use tracing::Level;
//! use veneer_diagnostics::{TracingConfig, TracingFormat};
//!
//! TracingConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .with_env_filter("veneer_styles=trace,veneer_render=debug")
//!     .init();
//!
//! tracing::debug!("subscriber installed");
//! ```
//!
//! # Environment Filter
//!
//! [`TracingConfig::from_env`] reads the filter from an environment variable
//! and keeps the default level when the variable is unset:
//!
//! ```
//! use veneer_diagnostics::TracingConfig;
//!
//! let config = TracingConfig::from_env("VENEER_LOG");
//! # let _ = config;
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable multi-line output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Errors raised while building the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosticsError {
    /// The filter directive string could not be parsed.
    #[error("invalid tracing filter '{filter}'")]
    InvalidFilter {
        /// The rejected directive string.
        filter: String,
        /// Parser error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the process-wide tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    level: Level,
    format: TracingFormat,
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a config with default settings: `INFO`, pretty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a default config whose filter is read from `var`.
    ///
    /// An unset or non-unicode variable leaves the filter unset.
    #[must_use]
    pub fn from_env(var: &str) -> Self {
        let config = Self::default();
        match std::env::var(var) {
            Ok(filter) if !filter.trim().is_empty() => config.with_env_filter(filter),
            _ => config,
        }
    }

    /// Sets the maximum log level used when no filter is given.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a filter directive string, `target=level,target=level,...`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured level.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the configured format.
    #[must_use]
    pub fn format(&self) -> TracingFormat {
        self.format
    }

    /// Returns the filter directive string, if set.
    #[must_use]
    pub fn env_filter(&self) -> Option<&str> {
        self.env_filter.as_deref()
    }

    /// Builds the [`EnvFilter`] for this config.
    ///
    /// # Errors
    ///
    /// Returns [`DiagnosticsError::InvalidFilter`] if the directive string
    /// does not parse.
    pub fn build_filter(&self) -> Result<EnvFilter, DiagnosticsError> {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).map_err(|source| DiagnosticsError::InvalidFilter {
                    filter: filter.clone(),
                    source,
                })
            }
            None => Ok(EnvFilter::new(self.level.as_str())),
        }
    }

    /// Installs the global subscriber.
    ///
    /// An invalid filter falls back to the configured level. Returns `false`
    /// if a global subscriber was already installed, which leaves the
    /// existing one in place.
    pub fn init(&self) -> bool {
        let (filter, rejected) = match self.build_filter() {
            Ok(filter) => (filter, None),
            Err(err) => (EnvFilter::new(self.level.as_str()), Some(err)),
        };

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let registry = tracing_subscriber::registry().with(filter);
        let installed = match self.format {
            TracingFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Compact => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init(),
            TracingFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init(),
        }
        .is_ok();

        if let Some(err) = rejected {
            tracing::warn!(error = %err, level = %self.level, "falling back to level filter");
        }
        if installed {
            tracing::debug!(level = %self.level, format = ?self.format, "tracing initialized");
        }
        installed
    }
}
