//! Default backend built on `tracing` and `tracing-subscriber`.
//!
//! # Design
//! - Each backend owns a private `Dispatch`, so the facade neither installs nor
//!   depends on a process-global subscriber.
//! - Exactly one console sink; registering another replaces the first.
//! - Records are emitted under the `Global` target.

use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{Layer, fmt};

use crate::backend::{BackendFactory, ExceptionDetail, LogBackend};
use crate::console::{ConsoleMakeWriter, ConsoleTarget, TAP_CAPACITY};
use crate::error::{FacadeError, FacadeResult};
use crate::init::{LogFormat, LoggingConfig};
use crate::level::Level;
use crate::template::render_template;

/// Logical logger name, used as the tracing target of every record.
pub const LOGGER_NAME: &str = "Global";

macro_rules! emit_at {
    ($level:expr, $($rest:tt)+) => {
        match $level {
            Level::Trace => tracing::trace!(target: LOGGER_NAME, $($rest)+),
            Level::Debug => tracing::debug!(target: LOGGER_NAME, $($rest)+),
            Level::Info => tracing::info!(target: LOGGER_NAME, $($rest)+),
            Level::Warning => tracing::warn!(target: LOGGER_NAME, $($rest)+),
            Level::Error => tracing::error!(target: LOGGER_NAME, $($rest)+),
        }
    };
}

/// Console sink registered on a [`BackendBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSink {
    /// Stream written to.
    pub target: ConsoleTarget,
    /// Rendering format.
    pub format: LogFormat,
    /// ANSI colours for human-readable formats.
    pub ansi: bool,
}

impl From<&LoggingConfig> for ConsoleSink {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            target: config.console,
            format: config.format,
            ansi: config.ansi,
        }
    }
}

/// Builder for [`TracingBackend`].
#[derive(Debug, Clone)]
pub struct BackendBuilder {
    min_level: Level,
    sink: Option<ConsoleSink>,
}

impl Default for BackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendBuilder {
    /// Start a builder with minimum level `Info` and no sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_level: Level::Info,
            sink: None,
        }
    }

    /// Set the most verbose level the backend emits.
    #[must_use]
    pub const fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Register the console sink, replacing any previously registered one.
    #[must_use]
    pub fn console_sink(mut self, sink: ConsoleSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the backend.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::MissingSink`] when no sink was registered.
    pub fn build(self) -> FacadeResult<TracingBackend> {
        let sink = self.sink.ok_or(FacadeError::MissingSink)?;
        let (tap, _) = broadcast::channel(TAP_CAPACITY);
        let writer = ConsoleMakeWriter::new(sink.target, tap.clone());

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match sink.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(false)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_writer(writer)
                .with_ansi(sink.ansi)
                .with_target(true)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(sink.ansi)
                .with_target(true)
                .boxed(),
        };
        let filter = LevelFilter::from_level(self.min_level.as_tracing());
        let subscriber = tracing_subscriber::registry().with(layer.with_filter(filter));

        Ok(TracingBackend {
            dispatch: Dispatch::new(subscriber),
            min_level: self.min_level,
            sink,
            tap,
        })
    }
}

/// Backend rendering records through a private tracing subscriber.
pub struct TracingBackend {
    dispatch: Dispatch,
    min_level: Level,
    sink: ConsoleSink,
    tap: broadcast::Sender<String>,
}

impl TracingBackend {
    /// Build the standard backend: minimum level `Trace`, one console sink.
    ///
    /// # Errors
    ///
    /// Propagates builder failures.
    pub fn from_config(config: &LoggingConfig) -> FacadeResult<Self> {
        BackendBuilder::new()
            .min_level(Level::Trace)
            .console_sink(ConsoleSink::from(config))
            .build()
    }

    /// Subscribe to the rendered console lines emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tap.subscribe()
    }

    /// The registered console sink.
    #[must_use]
    pub const fn sink(&self) -> &ConsoleSink {
        &self.sink
    }
}

impl LogBackend for TracingBackend {
    fn log(&self, level: Level, template: &str, args: &[&dyn Display]) {
        if level < self.min_level {
            return;
        }
        let message = render_template(template, args);
        tracing::dispatcher::with_default(&self.dispatch, || {
            emit_at!(level, "{message}");
        });
    }

    fn log_exception(&self, level: Level, message: &str, detail: &ExceptionDetail) {
        if level < self.min_level {
            return;
        }
        let location = detail.location.as_deref().unwrap_or("unknown");
        let backtrace = detail.backtrace.as_deref().unwrap_or("");
        tracing::dispatcher::with_default(&self.dispatch, || {
            emit_at!(
                level,
                exception_kind = %detail.kind,
                exception_sources = ?detail.sources,
                exception_location = location,
                exception_backtrace = backtrace,
                "{message}"
            );
        });
    }

    fn min_level(&self) -> Level {
        self.min_level
    }
}

/// Factory that builds a [`TracingBackend`] from the process environment.
#[must_use]
pub fn env_backend_factory() -> BackendFactory {
    Box::new(|| {
        let config = LoggingConfig::from_env()?;
        let backend: Arc<dyn LogBackend> = Arc::new(TracingBackend::from_config(&config)?);
        Ok(backend)
    })
}

/// Factory that builds a [`TracingBackend`] from a fixed configuration.
#[must_use]
pub fn config_backend_factory(config: LoggingConfig) -> BackendFactory {
    Box::new(move || {
        let backend: Arc<dyn LogBackend> = Arc::new(TracingBackend::from_config(&config)?);
        Ok(backend)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact_sink() -> ConsoleSink {
        ConsoleSink {
            target: ConsoleTarget::Stderr,
            format: LogFormat::Compact,
            ansi: false,
        }
    }

    #[test]
    fn builder_without_sink_fails() {
        let err = BackendBuilder::new()
            .min_level(Level::Trace)
            .build()
            .err()
            .expect("missing sink must fail");
        assert!(matches!(err, FacadeError::MissingSink));
    }

    #[test]
    fn registering_a_sink_twice_keeps_one() {
        let json = ConsoleSink {
            format: LogFormat::Json,
            ..compact_sink()
        };
        let backend = BackendBuilder::new()
            .console_sink(json)
            .console_sink(compact_sink())
            .build()
            .expect("backend builds");
        assert_eq!(backend.sink(), &compact_sink());
        assert_eq!(backend.min_level(), Level::Info);
    }

    #[test]
    fn from_config_enables_every_level() {
        let config = LoggingConfig {
            format: LogFormat::Compact,
            console: ConsoleTarget::Stderr,
            ansi: false,
        };
        let backend = TracingBackend::from_config(&config).expect("backend builds");
        assert_eq!(LogBackend::min_level(&backend), Level::Trace);

        let mut lines = backend.subscribe();
        backend.log(Level::Trace, "tick {0}", &[&1]);
        let line = lines.try_recv().expect("trace line rendered");
        assert!(line.contains("tick 1"), "line: {line}");
        assert!(line.contains(LOGGER_NAME), "line: {line}");
    }

    #[test]
    fn records_below_min_level_are_dropped() {
        let backend = BackendBuilder::new()
            .min_level(Level::Warning)
            .console_sink(compact_sink())
            .build()
            .expect("backend builds");
        let mut lines = backend.subscribe();
        backend.log(Level::Info, "quiet", &[]);
        backend.log(Level::Error, "loud", &[]);
        let line = lines.try_recv().expect("error line rendered");
        assert!(line.contains("loud"), "line: {line}");
        assert!(lines.try_recv().is_err());
    }
}
