//! Label-scoped logger that renders `::`-joined diagnostic lines.
use std::sync::{Arc, Mutex, PoisonError};

use super::types::{HandlerEntry, HandlerStatus};

/// Separator between labels and columns in a rendered line.
pub const SEPARATOR: &str = " :: ";

/// Marker column inserted in front of error messages.
pub const ERROR_MARKER: &str = "ERROR";

/// Marker column inserted in front of warnings.
pub const WARN_MARKER: &str = "WARN";

/// State shared by a root logger and every scope derived from it.
#[derive(Debug, Default)]
struct Shared {
    lines: Mutex<Vec<String>>,
    handlers: Mutex<Vec<HandlerEntry>>,
}

/// Diagnostic logger carrying an immutable stack of context labels.
///
/// [`scope`](Self::scope) returns a child logger with one more label; the
/// parent is untouched, so leaving a scope is simply dropping the child.
/// All scopes share the line history and the handler summary.
///
/// ```
/// use bootconfig::logging::Logger;
///
/// let run = Logger::new().scope("run");
/// let wifi = run.scope("wifi");
/// assert_eq!(wifi.render(&["wlan0", "ok"]), "run :: wifi :: wlan0 :: ok");
/// assert_eq!(run.render(&["done"]), "run :: done");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Logger {
    labels: Vec<String>,
    shared: Arc<Shared>,
}

impl Logger {
    /// Create a root logger with an empty label stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a child logger with `label` pushed onto the stack.
    #[must_use]
    pub fn scope(&self, label: &str) -> Self {
        let mut labels = self.labels.clone();
        labels.push(label.to_string());
        Self {
            labels,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Current label stack, outermost first.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Join the label stack and `columns` with [`SEPARATOR`].
    #[must_use]
    pub fn render(&self, columns: &[&str]) -> String {
        self.labels
            .iter()
            .map(String::as_str)
            .chain(columns.iter().copied())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    fn remember(&self, line: &str) {
        self.shared
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    /// Print one line made of the label stack followed by `columns`.
    pub fn log(&self, columns: &[&str]) {
        let line = self.render(columns);
        self.remember(&line);
        tracing::info!("{line}");
    }

    /// Log a single-column informational message.
    pub fn info(&self, msg: &str) {
        self.log(&[msg]);
    }

    /// Log a debug message (console only with `--verbose`).
    pub fn debug(&self, msg: &str) {
        let line = self.render(&[msg]);
        self.remember(&line);
        tracing::debug!("{line}");
    }

    /// Log a warning with the [`WARN_MARKER`] column.
    pub fn warn(&self, msg: &str) {
        let line = self.render(&[WARN_MARKER, msg]);
        self.remember(&line);
        tracing::warn!("{line}");
    }

    /// Log an error with the [`ERROR_MARKER`] column.
    pub fn error(&self, msg: &str) {
        self.error_columns(&[msg]);
    }

    /// Log an error made of several columns after the [`ERROR_MARKER`].
    pub fn error_columns(&self, columns: &[&str]) {
        let mut all = Vec::with_capacity(columns.len() + 1);
        all.push(ERROR_MARKER);
        all.extend_from_slice(columns);
        let line = self.render(&all);
        self.remember(&line);
        tracing::error!("{line}");
    }

    /// Log a change that a dry run would have made.
    pub fn dry_run(&self, msg: &str) {
        let line = self.render(&["dry run", msg]);
        self.remember(&line);
        tracing::info!(target: "bootconfig::dry_run", "{line}");
    }

    /// Every line emitted so far through this logger or any related scope.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.shared
            .lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record a handler result for the summary.
    pub fn record_handler(&self, name: &str, status: HandlerStatus, message: Option<&str>) {
        self.shared
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(HandlerEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
    }

    /// Recorded handler results in execution order.
    #[must_use]
    pub fn handler_entries(&self) -> Vec<HandlerEntry> {
        self.shared
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Count the handlers that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.handler_entries()
            .iter()
            .filter(|h| h.status == HandlerStatus::Failed)
            .count()
    }

    /// Log one summary line covering every recorded handler.
    pub fn print_summary(&self) {
        let entries = self.handler_entries();
        if entries.is_empty() {
            return;
        }
        let count = |status: HandlerStatus| entries.iter().filter(|e| e.status == status).count();
        let totals = [
            HandlerStatus::Ok,
            HandlerStatus::Skipped,
            HandlerStatus::DryRun,
            HandlerStatus::Failed,
        ]
        .iter()
        .map(|s| format!("{} {}", count(*s), s.label()))
        .collect::<Vec<_>>()
        .join(", ");
        self.log(&["summary", &format!("{} handlers", entries.len()), &totals]);
    }
}
