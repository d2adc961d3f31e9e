//! The logging facade: lazy backend construction plus leveled, tagged operations.
//!
//! # Design
//! - The backend is built once, on first use, through an injected factory guarded by
//!   a once-only initializer; concurrent first calls construct exactly one backend.
//! - A failed construction is not cached, so a later call retries.
//! - Logging from the constructing thread while the factory runs (including from a
//!   panic hook fired by the factory) reports an error instead of waiting on itself.
//! - Level operations never return errors: a backend that cannot be built is fatal
//!   and panics on the logging call that needed it.

use std::error::Error;
use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::backend::{BackendFactory, ExceptionDetail, LogBackend};
use crate::error::{FacadeError, FacadeResult};
use crate::level::Level;
use crate::serializer::{JsonSerializer, StructuredSerializer};
use crate::tag::{OriginTag, format_for_context};

/// Process-wide entry point for application logging.
pub struct LogFacade<S = JsonSerializer> {
    backend: OnceCell<Arc<dyn LogBackend>>,
    factory: BackendFactory,
    constructing: Mutex<Option<ThreadId>>,
    serializer: S,
}

/// Marks the current thread as running the factory until dropped, unwinding included.
struct ConstructionMarker<'a> {
    slot: &'a Mutex<Option<ThreadId>>,
}

impl<'a> ConstructionMarker<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>) -> Self {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(thread::current().id());
        Self { slot }
    }
}

impl Drop for ConstructionMarker<'_> {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl LogFacade<JsonSerializer> {
    /// Facade that builds its backend with `factory` on first use.
    #[must_use]
    pub fn new(factory: BackendFactory) -> Self {
        Self {
            backend: OnceCell::new(),
            factory,
            constructing: Mutex::new(None),
            serializer: JsonSerializer::default(),
        }
    }

    /// Facade around an already constructed backend.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn LogBackend>) -> Self {
        let shared = Arc::clone(&backend);
        Self {
            backend: OnceCell::with_value(backend),
            factory: Box::new(move || Ok(Arc::clone(&shared))),
            constructing: Mutex::new(None),
            serializer: JsonSerializer::default(),
        }
    }
}

macro_rules! level_operations {
    ($level:expr, $plain:ident, $typed:ident, $value:ident, $name:literal) => {
        #[doc = concat!("Log a ", $name, " message, formatting `args` into `message`.")]
        ///
        /// # Panics
        ///
        /// Panics if the backend has never been built and cannot be built now.
        pub fn $plain(&self, message: &str, args: &[&dyn Display]) {
            self.log($level, message, args);
        }

        #[doc = concat!("Log a ", $name, " message prefixed with the name of `T`.")]
        ///
        /// # Panics
        ///
        /// Panics if the backend has never been built and cannot be built now.
        pub fn $typed<T: ?Sized>(&self, message: &str, args: &[&dyn Display]) {
            self.log_tagged($level, &OriginTag::of::<T>(), message, args);
        }

        #[doc = concat!("Log a value at ", $name, " level, prefixed with its type name.")]
        ///
        /// # Panics
        ///
        /// Panics if the backend has never been built and cannot be built now.
        pub fn $value<V: Display + ?Sized>(&self, value: &V) {
            self.log_value($level, value);
        }
    };
}

impl<S: StructuredSerializer> LogFacade<S> {
    /// Replace the serializer used by [`LogFacade::log_serialized`].
    #[must_use]
    pub fn with_serializer<T: StructuredSerializer>(self, serializer: T) -> LogFacade<T> {
        LogFacade {
            backend: self.backend,
            factory: self.factory,
            constructing: self.constructing,
            serializer,
        }
    }

    /// Access the backend, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns the factory's error when the backend cannot be constructed, or
    /// [`FacadeError::ConstructionInProgress`] when called from the thread that is
    /// currently running the factory.
    pub fn core_logger(&self) -> FacadeResult<&Arc<dyn LogBackend>> {
        if let Some(backend) = self.backend.get() {
            return Ok(backend);
        }
        if self.constructing_here() {
            return Err(FacadeError::ConstructionInProgress);
        }
        self.backend.get_or_try_init(|| {
            let _marker = ConstructionMarker::enter(&self.constructing);
            (self.factory)()
        })
    }

    fn constructing_here(&self) -> bool {
        let owner = *self
            .constructing
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        owner == Some(thread::current().id())
    }

    /// Whether the backend has been constructed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.backend.get().is_some()
    }

    fn backend(&self) -> &dyn LogBackend {
        match self.core_logger() {
            Ok(backend) => backend.as_ref(),
            Err(err) => panic!("logging backend construction failed: {err}"),
        }
    }

    /// Log `message` at `level`, formatting `args` into it.
    ///
    /// # Panics
    ///
    /// Panics if the backend has never been built and cannot be built now.
    pub fn log(&self, level: Level, message: &str, args: &[&dyn Display]) {
        self.backend().log(level, message, args);
    }

    /// Log `message` at `level` prefixed with `tag`.
    ///
    /// # Panics
    ///
    /// Panics if the backend has never been built and cannot be built now.
    pub fn log_tagged(&self, level: Level, tag: &OriginTag, message: &str, args: &[&dyn Display]) {
        self.backend().log(level, &format_for_context(tag, message), args);
    }

    /// Log the text of `value` at `level`, prefixed with the value's type name.
    ///
    /// The value text is emitted verbatim, never interpreted as a template.
    ///
    /// # Panics
    ///
    /// Panics if the backend has never been built and cannot be built now.
    pub fn log_value<V: Display + ?Sized>(&self, level: Level, value: &V) {
        let text = format_for_context(&OriginTag::of_val(value), &value.to_string());
        self.backend().log(level, &text, &[]);
    }

    level_operations!(Level::Debug, debug, debug_for, debug_value, "debug");
    level_operations!(Level::Info, info, info_for, info_value, "info");
    level_operations!(Level::Warning, warning, warning_for, warning_value, "warning");
    level_operations!(Level::Error, error, error_for, error_value, "error");

    /// Record an error with its type, source chain and a backtrace.
    ///
    /// # Panics
    ///
    /// Panics if the backend has never been built and cannot be built now.
    pub fn error_exception<E: Error + ?Sized>(&self, err: &E) {
        self.error_detail(&ExceptionDetail::from_error(err));
    }

    /// Record a prepared failure description at `Error` level.
    ///
    /// # Panics
    ///
    /// Panics if the backend has never been built and cannot be built now.
    pub fn error_detail(&self, detail: &ExceptionDetail) {
        self.backend()
            .log_exception(Level::Error, &detail.message, detail);
    }

    /// Record a prepared failure description without panicking.
    ///
    /// # Errors
    ///
    /// Returns the construction error when no backend is available.
    pub fn try_error_detail(&self, detail: &ExceptionDetail) -> FacadeResult<()> {
        self.core_logger()?
            .log_exception(Level::Error, &detail.message, detail);
        Ok(())
    }

    /// Log `message` at `Error` level when `condition` is false.
    ///
    /// # Panics
    ///
    /// Panics if the condition fails and the backend cannot be built.
    pub fn assert(&self, condition: bool, message: &str) {
        if !condition {
            self.backend().log(Level::Error, message, &[]);
        }
    }

    /// Serialize `value` and log the text at `Debug` level.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error unchanged; nothing is logged in that case.
    ///
    /// # Panics
    ///
    /// Panics if the backend has never been built and cannot be built now.
    pub fn log_serialized<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), S::Error> {
        let text = self.serializer.serialize(value)?;
        self.backend().log(Level::Debug, &text, &[]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::template::render_template;

    #[derive(Default)]
    struct Capture {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl Capture {
        fn take(&self) -> Vec<(Level, String)> {
            std::mem::take(&mut *self.lines.lock().expect("capture lock"))
        }
    }

    impl LogBackend for Capture {
        fn log(&self, level: Level, template: &str, args: &[&dyn Display]) {
            self.lines
                .lock()
                .expect("capture lock")
                .push((level, render_template(template, args)));
        }

        fn log_exception(&self, level: Level, message: &str, _detail: &ExceptionDetail) {
            self.lines
                .lock()
                .expect("capture lock")
                .push((level, message.to_string()));
        }
    }

    struct Scheduler;

    fn capture_facade() -> (LogFacade, Arc<Capture>) {
        let capture = Arc::new(Capture::default());
        let facade = LogFacade::with_backend(capture.clone());
        (facade, capture)
    }

    #[test]
    fn level_operations_map_to_levels() {
        let (facade, capture) = capture_facade();
        facade.debug("d {0}", &[&1]);
        facade.info("i", &[]);
        facade.warning("w", &[]);
        facade.error("e", &[]);
        facade.log(Level::Trace, "t", &[]);
        assert_eq!(
            capture.take(),
            vec![
                (Level::Debug, "d 1".to_string()),
                (Level::Info, "i".to_string()),
                (Level::Warning, "w".to_string()),
                (Level::Error, "e".to_string()),
                (Level::Trace, "t".to_string()),
            ]
        );
    }

    #[test]
    fn typed_operations_prefix_the_type_name() {
        let (facade, capture) = capture_facade();
        let _scheduler = Scheduler;
        facade.info_for::<Scheduler>("tick {0}", &[&3]);
        facade.log_tagged(Level::Warning, &OriginTag::new("Pool"), "drained", &[]);
        assert_eq!(
            capture.take(),
            vec![
                (Level::Info, "Scheduler - tick 3".to_string()),
                (Level::Warning, "Pool - drained".to_string()),
            ]
        );
    }

    #[test]
    fn value_operations_are_not_templated() {
        let (facade, capture) = capture_facade();
        facade.error_value("{0} braces stay");
        assert_eq!(
            capture.take(),
            vec![(Level::Error, "str - {0} braces stay".to_string())]
        );
    }

    #[test]
    fn assert_logs_only_on_failure() {
        let (facade, capture) = capture_facade();
        facade.assert(true, "fine");
        facade.assert(false, "broken");
        assert_eq!(capture.take(), vec![(Level::Error, "broken".to_string())]);
    }

    #[test]
    fn backend_is_built_once() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let facade = LogFacade::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let backend: Arc<dyn LogBackend> = Arc::new(Capture::default());
            Ok(backend)
        }));
        assert!(!facade.is_initialized());

        let first = Arc::clone(facade.core_logger().expect("backend builds"));
        facade.info("one", &[]);
        let second = Arc::clone(facade.core_logger().expect("backend cached"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert!(facade.is_initialized());
    }

    #[test]
    fn failed_construction_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let facade = LogFacade::new(Box::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(FacadeError::MissingSink);
            }
            let backend: Arc<dyn LogBackend> = Arc::new(Capture::default());
            Ok(backend)
        }));

        assert!(matches!(facade.core_logger(), Err(FacadeError::MissingSink)));
        assert!(facade.core_logger().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn factory_logging_through_its_own_facade_is_refused() {
        let facade: Arc<OnceCell<LogFacade>> = Arc::new(OnceCell::new());
        let inner = Arc::clone(&facade);
        let nested = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&nested);
        let built = facade.get_or_init(|| {
            LogFacade::new(Box::new(move || {
                if let Some(facade) = inner.get() {
                    let refused = matches!(
                        facade.core_logger(),
                        Err(FacadeError::ConstructionInProgress)
                    );
                    *seen.lock().expect("nested lock") = Some(refused);
                }
                let backend: Arc<dyn LogBackend> = Arc::new(Capture::default());
                Ok(backend)
            }))
        });

        assert!(built.core_logger().is_ok());
        assert_eq!(*nested.lock().expect("nested lock"), Some(true));
    }
}
