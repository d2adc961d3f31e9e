//! Interception of unhandled failures (panics) before the process unwinds or aborts.
//!
//! # Design
//! - Hosts call [`register_fatal_handler`] during bootstrap; the handler runs inside
//!   the process panic hook and the previously installed hook runs right after it,
//!   so the platform's termination behaviour is unchanged.
//! - The returned guard reinstates the previous hook when dropped; `persist` keeps
//!   the handler for the rest of the process.
//! - The panic hook fires for every panic, so panics later caught with
//!   `catch_unwind` (or contained by a task runtime) are recorded too.
//! - [`facade_handler`] never waits on a backend its own thread is still building;
//!   in that case the failure goes to stderr.

use std::ops::Deref;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::thread;

use crate::backend::ExceptionDetail;
use crate::facade::LogFacade;
use crate::serializer::StructuredSerializer;

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static>;

/// Install `handler` as the process-wide unhandled failure handler.
///
/// # Panics
///
/// Panics if called from a panicking thread.
#[must_use = "dropping the guard uninstalls the handler; call `persist` to keep it"]
pub fn register_fatal_handler<F>(handler: F) -> FatalHookGuard
where
    F: Fn(&ExceptionDetail) + Send + Sync + 'static,
{
    let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
    let chained = Arc::clone(&previous);
    panic::set_hook(Box::new(move |info| {
        handler(&ExceptionDetail::from_panic(info));
        (**chained)(info);
    }));
    FatalHookGuard {
        previous: Some(previous),
    }
}

/// Handler that records failures through `facade` at `Error` level.
///
/// When the facade has no usable backend the failure is written to stderr instead.
pub fn facade_handler<F, S>(facade: F) -> impl Fn(&ExceptionDetail) + Send + Sync + 'static
where
    F: Deref<Target = LogFacade<S>> + Send + Sync + 'static,
    S: StructuredSerializer + 'static,
{
    move |detail: &ExceptionDetail| {
        if let Err(err) = facade.try_error_detail(detail) {
            eprintln!(
                "unhandled failure could not be logged ({err}): {}: {}",
                detail.kind, detail.message
            );
        }
    }
}

/// Keeps a fatal handler installed; dropping it reinstates the previous hook.
pub struct FatalHookGuard {
    previous: Option<Arc<PanicHook>>,
}

impl FatalHookGuard {
    /// Keep the handler installed for the lifetime of the process.
    pub fn persist(mut self) {
        self.previous = None;
    }
}

impl Drop for FatalHookGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }
        if let Some(previous) = self.previous.take() {
            drop(panic::take_hook());
            panic::set_hook(Box::new(move |info| (**previous)(info)));
        }
    }
}
