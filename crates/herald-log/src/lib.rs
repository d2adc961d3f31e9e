#![forbid(unsafe_code)]
#![deny(missing_docs, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]

//! Process-wide logging facade.
//!
//! Application code logs through [`LogFacade`] (or the global free functions), which
//! builds its backend lazily on first use, prefixes messages with origin tags and
//! forwards records to a pluggable [`LogBackend`]. The default backend renders
//! through `tracing`/`tracing-subscriber` to a single console sink.
//!
//! Layout: `facade.rs` (the facade), `tag.rs` (origin tags), `template.rs`
//! (positional templates), `backend.rs` (backend contract and failure detail),
//! `tracing_backend.rs` + `console.rs` (default backend and sink), `init.rs`
//! (configuration), `fatal.rs` (unhandled failure hook), `global.rs` (process
//! instance).

pub mod backend;
pub mod console;
pub mod error;
pub mod facade;
pub mod fatal;
pub mod global;
pub mod init;
pub mod level;
pub mod serializer;
pub mod tag;
pub mod template;
pub mod tracing_backend;

pub use backend::{BackendFactory, ExceptionDetail, LogBackend, PANIC_KIND, panic_message};
pub use console::ConsoleTarget;
pub use error::{FacadeError, FacadeResult};
pub use facade::LogFacade;
pub use fatal::{FatalHookGuard, facade_handler, register_fatal_handler};
pub use global::{
    assert, debug, debug_for, debug_value, error, error_exception, error_for, error_value,
    global, info, info_for, info_value, init_global, install_fatal_handler, log_serialized,
    warning, warning_for, warning_value,
};
pub use init::{LogFormat, LoggingConfig};
pub use level::Level;
pub use serializer::{JsonSerializer, StructuredSerializer};
pub use tag::{OriginTag, format_for_context, short_type_name};
pub use template::render_template;
pub use tracing_backend::{
    BackendBuilder, ConsoleSink, LOGGER_NAME, TracingBackend, config_backend_factory,
    env_backend_factory,
};
