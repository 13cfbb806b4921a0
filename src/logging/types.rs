//! Core logging types: handler entries and their status.

/// Handler execution result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerEntry {
    /// Handler name.
    pub name: String,
    /// Final status of the handler.
    pub status: HandlerStatus,
    /// Optional detail message (skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerStatus {
    /// Handler completed and returned its log lines.
    Ok,
    /// Handler had nothing to do (key absent, hardware missing).
    Skipped,
    /// Handler ran in dry-run mode; no changes were applied.
    DryRun,
    /// Handler returned an error.
    Failed,
}

impl HandlerStatus {
    /// Lowercase label used in the run summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}
