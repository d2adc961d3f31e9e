//! Process-wide facade instance and free-function shortcuts.
//!
//! The global facade is created on first use with a backend configured from the
//! environment, unless the host injects its own through [`init_global`] first.

use std::error::Error;
use std::fmt::Display;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::error::{FacadeError, FacadeResult};
use crate::facade::LogFacade;
use crate::fatal::{FatalHookGuard, facade_handler, register_fatal_handler};
use crate::tracing_backend::env_backend_factory;

static GLOBAL: OnceCell<LogFacade> = OnceCell::new();

/// The process-wide facade.
pub fn global() -> &'static LogFacade {
    GLOBAL.get_or_init(|| LogFacade::new(env_backend_factory()))
}

/// Install `facade` as the process-wide facade.
///
/// # Errors
///
/// Returns [`FacadeError::AlreadyInitialized`] when the global facade already exists.
pub fn init_global(facade: LogFacade) -> FacadeResult<&'static LogFacade> {
    GLOBAL
        .set(facade)
        .map_err(|_| FacadeError::AlreadyInitialized)?;
    Ok(global())
}

/// Route unhandled failures (panics) to the global facade.
#[must_use = "dropping the guard uninstalls the handler; call `persist` to keep it"]
pub fn install_fatal_handler() -> FatalHookGuard {
    register_fatal_handler(facade_handler(global()))
}

macro_rules! global_level_functions {
    ($plain:ident, $typed:ident, $value:ident, $name:literal) => {
        #[doc = concat!("Log a ", $name, " message through the global facade.")]
        pub fn $plain(message: &str, args: &[&dyn Display]) {
            global().$plain(message, args);
        }

        #[doc = concat!("Log a ", $name, " message tagged with `T` through the global facade.")]
        pub fn $typed<T: ?Sized>(message: &str, args: &[&dyn Display]) {
            global().$typed::<T>(message, args);
        }

        #[doc = concat!("Log a value at ", $name, " level through the global facade.")]
        pub fn $value<V: Display + ?Sized>(value: &V) {
            global().$value(value);
        }
    };
}

global_level_functions!(debug, debug_for, debug_value, "debug");
global_level_functions!(info, info_for, info_value, "info");
global_level_functions!(warning, warning_for, warning_value, "warning");
global_level_functions!(error, error_for, error_value, "error");

/// Record an error with its detail through the global facade.
pub fn error_exception<E: Error + ?Sized>(err: &E) {
    global().error_exception(err);
}

/// Log `message` at `Error` level through the global facade when `condition` is false.
pub fn assert(condition: bool, message: &str) {
    global().assert(condition, message);
}

/// Serialize `value` as JSON and log it at `Debug` level through the global facade.
///
/// # Errors
///
/// Returns the `serde_json` error when `value` cannot be serialized.
pub fn log_serialized<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    global().log_serialized(value)
}
