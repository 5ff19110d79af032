use crate::error::{SubmitError, TransportError};
use crate::i18n::{messages, Translator};
use crate::selection::{FileIdentity, PendingFile, SelectionSet, UploadStatus};
use crate::upload::collaborators::{RetryConfirmer, Severity, StatusSink};
use crate::upload::transport::UploadTransport;
use crate::upload::types::{BatchOutcome, FileStatus, UploadOutcome, UploadResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// Overall progress after `index` finished files of `total`, with the current
/// file at `percent`.
pub fn overall_progress(index: usize, total: usize, percent: f64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    ((index as f64 * 100.0 + percent) / total as f64).clamp(0.0, 100.0)
}

/// Forwards overall progress to the sink, dropping values that would go backwards.
struct ProgressTracker<'a> {
    sink: &'a dyn StatusSink,
    last: Mutex<f64>,
}

impl<'a> ProgressTracker<'a> {
    fn start(sink: &'a dyn StatusSink) -> Self {
        sink.report_progress(0.0);
        Self {
            sink,
            last: Mutex::new(0.0),
        }
    }

    fn file_progress(&self, index: usize, total: usize, percent: f64) {
        self.advance(overall_progress(index, total, percent));
    }

    fn file_done(&self, index: usize, total: usize) {
        self.advance(overall_progress(index + 1, total, 0.0));
    }

    fn advance(&self, value: f64) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if value > *last {
            *last = value;
            self.sink.report_progress(value);
        }
    }
}

struct PassGuard<'a>(&'a AtomicBool);

impl<'a> PassGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct UploadOrchestrator {
    transport: Arc<dyn UploadTransport>,
    confirmer: Arc<dyn RetryConfirmer>,
    sink: Arc<dyn StatusSink>,
    translator: Arc<dyn Translator>,
    max_rounds: u32,
    in_flight: AtomicBool,
}

impl UploadOrchestrator {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        confirmer: Arc<dyn RetryConfirmer>,
        sink: Arc<dyn StatusSink>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            transport,
            confirmer,
            sink,
            translator,
            max_rounds: DEFAULT_MAX_ROUNDS,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Caps the number of passes per run, the first one included. Zero is treated as one.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Uploads every `Ready` or `Failed` file in insertion order, then asks whether
    /// to retry what failed, up to the round cap.
    pub async fn run_pass(&self, selection: &mut SelectionSet) -> Result<BatchOutcome, SubmitError> {
        let _guard = PassGuard::acquire(&self.in_flight).ok_or(SubmitError::PassInProgress)?;
        let translator = self.translator.as_ref();

        if selection.is_empty() {
            return Ok(BatchOutcome::AllSucceeded { urls: Vec::new() });
        }

        let mut pending: Vec<usize> = selection
            .iter()
            .enumerate()
            .filter(|(_, f)| f.status().is_eligible())
            .map(|(i, _)| i)
            .collect();
        let mut round = 1;

        loop {
            tracing::info!(round, files = pending.len(), "starting upload pass");
            let results = self.upload_round(selection, &pending).await;
            let uploaded_this_round = results.iter().filter(|r| r.is_success()).count();

            pending.retain(|&index| {
                selection
                    .get(index)
                    .map_or(false, |f| f.status() == UploadStatus::Failed)
            });

            let succeeded = count_with_status(selection, UploadStatus::Uploaded);
            let failed = pending.len();
            tracing::info!(
                round,
                uploaded_this_round,
                succeeded,
                failed,
                "upload pass finished"
            );

            if failed == 0 {
                if succeeded > 0 {
                    self.sink
                        .report(&messages::upload_complete(translator), Severity::Success);
                }
                return Ok(BatchOutcome::AllSucceeded {
                    urls: collect_urls(selection),
                });
            }

            if round < self.max_rounds && self.confirmer.confirm_retry(failed, succeeded).await {
                tracing::info!(round, failed, "retrying failed uploads");
                round += 1;
                continue;
            }

            if succeeded == 0 {
                tracing::warn!(round, failed, "no file could be uploaded, aborting");
                self.sink
                    .report(&messages::upload_aborted(translator), Severity::Error);
                return Ok(BatchOutcome::AbortedNoSuccess);
            }

            self.sink.report(
                &messages::partial_complete(translator, succeeded, failed),
                Severity::Warning,
            );
            return Ok(BatchOutcome::PartialSuccess {
                urls: collect_urls(selection),
                failed: selection
                    .iter()
                    .filter(|f| f.status() == UploadStatus::Failed)
                    .map(PendingFile::identity)
                    .collect(),
            });
        }
    }

    async fn upload_round(&self, selection: &mut SelectionSet, indices: &[usize]) -> Vec<UploadResult> {
        let total = indices.len();
        let mut results = Vec::with_capacity(total);
        if total == 0 {
            return results;
        }

        let translator = self.translator.as_ref();
        let tracker = ProgressTracker::start(self.sink.as_ref());

        for (position, &index) in indices.iter().enumerate() {
            let Some(file) = selection.get_mut(index) else {
                continue;
            };
            let identity = file.identity();

            file.mark_uploading();
            self.emit(&identity, UploadStatus::Uploading, None);
            self.sink.report(
                &messages::uploading_status(translator, position + 1, total),
                Severity::Info,
            );
            tracing::debug!(file = %file.name, position = position + 1, total, "uploading file");

            let on_progress = |percent: f64| tracker.file_progress(position, total, percent);
            let result = self.transport.upload(file, &on_progress).await;
            let outcome = match result {
                Ok(url) => {
                    tracing::info!(file = %file.name, url = %url, "upload successful");
                    file.mark_uploaded(url.clone());
                    self.emit(&identity, UploadStatus::Uploaded, None);
                    UploadOutcome::Success(url)
                }
                Err(error) => {
                    tracing::warn!(file = %file.name, error = %error, "upload failed");
                    file.mark_failed();
                    self.emit(&identity, UploadStatus::Failed, Some(error.clone()));
                    self.sink.report(
                        &messages::upload_failed(translator, &file.name),
                        Severity::Error,
                    );
                    UploadOutcome::Failure(error)
                }
            };

            tracker.file_done(position, total);
            results.push(UploadResult {
                file: identity,
                outcome,
            });
        }

        results
    }

    fn emit(&self, file: &FileIdentity, status: UploadStatus, error: Option<TransportError>) {
        self.sink.file_status_changed(&FileStatus {
            file: file.clone(),
            status,
            error,
        });
    }
}

fn count_with_status(selection: &SelectionSet, status: UploadStatus) -> usize {
    selection.iter().filter(|f| f.status() == status).count()
}

fn collect_urls(selection: &SelectionSet) -> Vec<String> {
    selection
        .iter()
        .filter_map(|f| f.location().map(str::to_string))
        .collect()
}
