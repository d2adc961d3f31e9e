//! Recording backend and factories that count backend construction.

use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use herald_log::{
    BackendFactory, ExceptionDetail, FacadeError, Level, LogBackend, LogFacade, render_template,
};

/// A record captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// Level the record was emitted at.
    pub level: Level,
    /// Template as received from the facade.
    pub template: String,
    /// Rendered arguments, in order.
    pub args: Vec<String>,
    /// Final text after template rendering.
    pub text: String,
    /// Failure detail for exception records.
    pub exception: Option<ExceptionDetail>,
}

/// Backend that keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    records: Mutex<Vec<CapturedRecord>>,
}

impl RecordingBackend {
    /// Shared, empty recorder.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the records captured so far.
    #[must_use]
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().clone()
    }

    /// Rendered text of every captured record.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.lock().iter().map(|record| record.text.clone()).collect()
    }

    /// Number of captured records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogBackend for RecordingBackend {
    fn log(&self, level: Level, template: &str, args: &[&dyn Display]) {
        let record = CapturedRecord {
            level,
            template: template.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            text: render_template(template, args),
            exception: None,
        };
        self.lock().push(record);
    }

    fn log_exception(&self, level: Level, message: &str, detail: &ExceptionDetail) {
        let record = CapturedRecord {
            level,
            template: message.to_string(),
            args: Vec::new(),
            text: message.to_string(),
            exception: Some(detail.clone()),
        };
        self.lock().push(record);
    }
}

/// Factory handing out one shared [`RecordingBackend`] and counting invocations.
#[derive(Debug, Clone)]
pub struct CountingFactory {
    backend: Arc<RecordingBackend>,
    constructed: Arc<AtomicUsize>,
}

impl Default for CountingFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingFactory {
    /// New factory with a fresh recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: RecordingBackend::new(),
            constructed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The recorder every construction returns.
    #[must_use]
    pub fn backend(&self) -> Arc<RecordingBackend> {
        Arc::clone(&self.backend)
    }

    /// How many times the factory ran.
    #[must_use]
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    /// Boxed factory suitable for [`LogFacade::new`].
    #[must_use]
    pub fn factory(&self) -> BackendFactory {
        let backend = Arc::clone(&self.backend);
        let constructed = Arc::clone(&self.constructed);
        Box::new(move || {
            constructed.fetch_add(1, Ordering::SeqCst);
            let backend: Arc<dyn LogBackend> = backend.clone();
            Ok(backend)
        })
    }

    /// Facade wired to this factory.
    #[must_use]
    pub fn facade(&self) -> LogFacade {
        LogFacade::new(self.factory())
    }
}

/// Factory that always fails to construct a backend.
#[must_use]
pub fn failing_factory() -> BackendFactory {
    Box::new(|| Err(FacadeError::MissingSink))
}
