//! Diagnostic logging: label-scoped lines routed through `tracing`.

mod logger;
mod subscriber;
mod types;

pub use logger::{ERROR_MARKER, Logger, SEPARATOR, WARN_MARKER};
pub use subscriber::init_subscriber;
pub use types::{HandlerEntry, HandlerStatus};
