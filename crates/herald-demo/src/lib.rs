#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Demo host for the herald logging facade.
//!
//! The host owns bootstrap: it reads the logging configuration, installs the global
//! facade, registers the fatal handler and then logs from concurrent worker tasks.
//! Set `HERALD_DEMO_PANIC=<worker id>` to make one worker panic and watch the
//! failure get recorded before the task unwinds.

pub mod error;

use std::env;

use herald_log::{LogFacade, LoggingConfig, config_backend_factory};
use serde::Serialize;
use tokio::task::JoinSet;

pub use error::{DemoError, DemoResult};

/// Environment variable naming the worker that should panic.
pub const DEMO_PANIC_ENV: &str = "HERALD_DEMO_PANIC";

/// Number of concurrent workers started by the demo.
pub const WORKERS: usize = 4;

/// Tag for messages emitted by the bootstrap code.
pub struct Demo;

/// Tag for messages emitted by worker tasks.
pub struct Worker;

/// Summary each worker logs through `log_serialized`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WorkerReport {
    /// Worker identifier.
    pub worker: usize,
    /// Items the worker processed.
    pub processed: usize,
    /// Whether the worker hit a recoverable error.
    pub degraded: bool,
}

/// Configure logging and run the demo workers to completion.
///
/// # Errors
///
/// Returns an error if logging cannot be configured, a report cannot be
/// serialized or a worker task panics.
pub async fn run_demo() -> DemoResult<()> {
    let config = LoggingConfig::from_env().map_err(|source| DemoError::Logging {
        operation: "config.from_env",
        source,
    })?;
    let facade = herald_log::init_global(LogFacade::new(config_backend_factory(config)))
        .map_err(|source| DemoError::Logging {
            operation: "facade.init_global",
            source,
        })?;
    herald_log::install_fatal_handler().persist();

    let panicking_worker = env::var(DEMO_PANIC_ENV)
        .ok()
        .and_then(|value| value.parse::<usize>().ok());

    facade.info_for::<Demo>("starting {0} workers", &[&WORKERS]);

    let mut tasks = JoinSet::new();
    for worker in 0..WORKERS {
        let should_panic = panicking_worker == Some(worker);
        tasks.spawn(async move { run_worker(worker, should_panic) });
    }

    let mut reports = Vec::with_capacity(WORKERS);
    while let Some(joined) = tasks.join_next().await {
        let report = joined.map_err(|source| DemoError::Join { source })??;
        reports.push(report);
    }

    let degraded = reports.iter().filter(|report| report.degraded).count();
    facade.assert(degraded == 0, "some workers finished degraded");
    facade.info_for::<Demo>(
        "finished {0} workers, {1} degraded",
        &[&reports.len(), &degraded],
    );
    Ok(())
}

/// Simulate one unit of work, logging through the global facade.
///
/// # Errors
///
/// Returns an error if the worker report cannot be serialized.
///
/// # Panics
///
/// Panics when `should_panic` is set.
pub fn run_worker(worker: usize, should_panic: bool) -> DemoResult<WorkerReport> {
    herald_log::debug_for::<Worker>("worker {0} picked up its batch", &[&worker]);

    assert!(!should_panic, "worker {worker} was asked to panic");

    let report = WorkerReport {
        worker,
        processed: (worker + 1) * 10,
        degraded: worker % 2 == 1,
    };
    if report.degraded {
        herald_log::warning_for::<Worker>("worker {0} retried a flaky item", &[&worker]);
        herald_log::error_exception(&std::io::Error::other(format!(
            "worker {worker} lost its connection"
        )));
    }
    herald_log::info_value(&ReportLine(&report));
    herald_log::log_serialized(&report).map_err(|source| DemoError::Report { worker, source })?;
    Ok(report)
}

struct ReportLine<'a>(&'a WorkerReport);

impl std::fmt::Display for ReportLine<'_> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "worker {} processed {} items",
            self.0.worker, self.0.processed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_reports_degraded_odd_workers() {
        let report = run_worker(1, false).expect("worker completes");
        assert_eq!(
            report,
            WorkerReport {
                worker: 1,
                processed: 20,
                degraded: true,
            }
        );
    }

    #[test]
    fn report_line_reads_naturally() {
        let report = WorkerReport {
            worker: 2,
            processed: 30,
            degraded: false,
        };
        assert_eq!(
            ReportLine(&report).to_string(),
            "worker 2 processed 30 items"
        );
    }
}
