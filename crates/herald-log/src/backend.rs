//! Contract between the facade and the logging pipeline that renders records.

use std::any::{self, Any};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::Display;
use std::panic::PanicHookInfo;
use std::sync::Arc;

use crate::error::FacadeResult;
use crate::level::Level;
use crate::tag::short_type_name;

/// Logging pipeline the facade forwards records to.
pub trait LogBackend: Send + Sync {
    /// Render `template` with `args` and emit it at `level`.
    fn log(&self, level: Level, template: &str, args: &[&dyn Display]);

    /// Emit `message` at `level` with structured failure detail attached.
    fn log_exception(&self, level: Level, message: &str, detail: &ExceptionDetail);

    /// Most verbose level this backend emits.
    fn min_level(&self) -> Level {
        Level::Trace
    }
}

/// Builds the backend the first time the facade is used.
pub type BackendFactory = Box<dyn Fn() -> FacadeResult<Arc<dyn LogBackend>> + Send + Sync>;

/// Structured description of a failure handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionDetail {
    /// Short type name of the failure (`"panic"` for panics).
    pub kind: Cow<'static, str>,
    /// Human-readable failure message.
    pub message: String,
    /// Messages of the underlying `source()` chain, outermost first.
    pub sources: Vec<String>,
    /// `file:line:column` where the failure was raised, when known.
    pub location: Option<String>,
    /// Captured stack trace.
    pub backtrace: Option<String>,
}

impl ExceptionDetail {
    /// Describe an error value. The backtrace is captured at the call site.
    #[must_use]
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        let mut sources = Vec::new();
        let mut current = err.source();
        while let Some(source) = current {
            sources.push(source.to_string());
            current = source.source();
        }

        Self {
            kind: Cow::Owned(short_type_name(any::type_name::<E>())),
            message: err.to_string(),
            sources,
            location: None,
            backtrace: render_backtrace(&Backtrace::force_capture()),
        }
    }

    /// Describe a panic observed by the panic hook.
    #[must_use]
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        Self {
            kind: Cow::Borrowed(PANIC_KIND),
            message: panic_message(info.payload()),
            sources: Vec::new(),
            location: info
                .location()
                .map(|location| format!("{}:{}:{}", location.file(), location.line(), location.column())),
            backtrace: render_backtrace(&Backtrace::force_capture()),
        }
    }
}

/// Failure kind recorded for panics.
pub const PANIC_KIND: &str = "panic";

/// Extract the text of a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

fn render_backtrace(backtrace: &Backtrace) -> Option<String> {
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
