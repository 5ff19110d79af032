use crate::upload::types::FileStatus;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Write-only observer of messages, progress and per-file state.
pub trait StatusSink: Send + Sync {
    fn report(&self, message: &str, severity: Severity);

    /// Overall progress of the running pass, `0..=100`.
    fn report_progress(&self, percent: f64);

    fn file_status_changed(&self, _status: &FileStatus) {}
}

#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn report(&self, _message: &str, _severity: Severity) {}

    fn report_progress(&self, _percent: f64) {}
}

/// Asks whether to retry the failed files of a pass that ended with failures.
#[async_trait]
pub trait RetryConfirmer: Send + Sync {
    async fn confirm_retry(&self, failed: usize, succeeded: usize) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl RetryConfirmer for AutoConfirm {
    async fn confirm_retry(&self, _failed: usize, _succeeded: usize) -> bool {
        self.0
    }
}
