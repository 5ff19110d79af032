mod collaborators;
mod state;

pub use collaborators::{
    ConsoleConfirmer, ConsoleSink, HttpFormSubmitter, RequiredFieldsValidator, StdoutSubmitter,
};
pub use state::{ActionProgress, UploadState};

use crate::config::UploaderConfig;
use crate::error::{RejectReason, SubmitError};
use crate::i18n::{messages, Translator};
use crate::selection::{Admission, FileIdentity, PreviewStore, RawFile, SelectionSet};
use crate::upload::{
    BatchOutcome, RetryConfirmer, Severity, StatusSink, UploadOrchestrator, UploadTransport,
};
use async_trait::async_trait;
use std::sync::Arc;

pub trait FormValidator: Send + Sync {
    fn is_form_valid(&self) -> bool;

    fn minimum_file_count(&self) -> usize;
}

#[async_trait]
pub trait FormSubmitter: Send + Sync {
    async fn submit(&self, hidden_field_value: &str) -> Result<(), SubmitError>;
}

pub struct Collaborators {
    pub transport: Arc<dyn UploadTransport>,
    pub confirmer: Arc<dyn RetryConfirmer>,
    pub validator: Arc<dyn FormValidator>,
    pub submitter: Arc<dyn FormSubmitter>,
    pub sink: Arc<dyn StatusSink>,
    pub translator: Arc<dyn Translator>,
    pub previews: Arc<dyn PreviewStore>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(BatchOutcome),
    NotEnoughFiles { required: usize, selected: usize },
    InvalidForm,
    /// No file could be uploaded; the form was not submitted.
    Aborted,
}

pub struct UploadForm {
    selection: SelectionSet,
    orchestrator: UploadOrchestrator,
    validator: Arc<dyn FormValidator>,
    submitter: Arc<dyn FormSubmitter>,
    sink: Arc<dyn StatusSink>,
    translator: Arc<dyn Translator>,
}

impl UploadForm {
    pub fn new(config: &UploaderConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            transport,
            confirmer,
            validator,
            submitter,
            sink,
            translator,
            previews,
        } = collaborators;

        let orchestrator =
            UploadOrchestrator::new(transport, confirmer, sink.clone(), translator.clone())
                .with_max_rounds(config.max_rounds);

        Self {
            selection: SelectionSet::with_previews(config.limits.clone(), previews),
            orchestrator,
            validator,
            submitter,
            sink,
            translator,
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn add_files(&mut self, candidates: Vec<RawFile>) -> Admission {
        let translator = self.translator.as_ref();
        let remaining = self.selection.remaining();
        let admission = self.selection.admit(candidates);
        let mut capacity_reported = false;

        for rejection in &admission.rejections {
            let name = rejection.file.name.as_str();
            tracing::warn!(file = %name, reason = %rejection.reason, "file rejected");

            let (message, severity) = match &rejection.reason {
                RejectReason::CapacityExceeded { max_files } => {
                    if capacity_reported {
                        continue;
                    }
                    capacity_reported = true;
                    (
                        messages::max_files_error(translator, *max_files, remaining),
                        Severity::Error,
                    )
                }
                RejectReason::InvalidType { .. } => {
                    (messages::invalid_type_error(translator, name), Severity::Error)
                }
                RejectReason::TooLarge { .. } => (
                    messages::file_too_large_error(
                        translator,
                        name,
                        self.selection.limits().max_size_mb(),
                    ),
                    Severity::Error,
                ),
                RejectReason::Duplicate => {
                    (messages::duplicate_file_error(translator, name), Severity::Warning)
                }
            };
            self.sink.report(&message, severity);
        }

        if !admission.accepted.is_empty() {
            tracing::info!(
                added = admission.accepted.len(),
                total = self.selection.len(),
                "files added to selection"
            );
            self.sink.report(
                &messages::added_files(translator, admission.accepted.len(), self.selection.len()),
                Severity::Success,
            );
        }

        admission
    }

    pub fn remove_file(&mut self, identity: &FileIdentity) -> bool {
        let removed = self.selection.remove(identity);
        if removed {
            tracing::info!(file = %identity, "file removed from selection");
            self.sink.report(
                &messages::file_removed(self.translator.as_ref(), &identity.name),
                Severity::Info,
            );
        }
        removed
    }

    /// Count line for the selection, `None` when nothing is selected.
    pub fn summary(&self) -> Option<String> {
        if self.selection.is_empty() {
            return None;
        }
        Some(messages::file_summary(
            self.translator.as_ref(),
            self.selection.len(),
        ))
    }

    pub fn file_labels(&self) -> Vec<String> {
        let translator = self.translator.as_ref();
        self.selection
            .iter()
            .map(|f| {
                let state = messages::status_label(translator, f.status());
                messages::file_label(translator, &f.name, f.byte_size, &state)
            })
            .collect()
    }

    pub fn is_submitting(&self) -> bool {
        self.orchestrator.is_running()
    }

    /// Uploads the selection and submits the form with the resulting URLs.
    ///
    /// The form is only submitted when at least one file was uploaded (or nothing
    /// needed uploading); the selection is cleared once it has been.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        let translator = self.translator.as_ref();
        let required = self.validator.minimum_file_count();
        let selected = self.selection.len();

        if selected < required {
            tracing::info!(selected, required, "not enough files selected");
            self.sink.report(
                &messages::min_images_error(translator, required),
                Severity::Error,
            );
            return Ok(SubmitOutcome::NotEnoughFiles { required, selected });
        }

        if self.orchestrator.is_running() {
            tracing::debug!("form already being submitted, ignoring");
            self.sink
                .report(&messages::upload_in_progress(translator), Severity::Warning);
            return Err(SubmitError::PassInProgress);
        }

        if !self.validator.is_form_valid() {
            tracing::info!("form validation failed");
            self.sink.report(
                &messages::invalid_form_error(translator, required),
                Severity::Error,
            );
            return Ok(SubmitOutcome::InvalidForm);
        }

        tracing::info!(files = selected, "uploading images before form submission");
        let outcome = self.orchestrator.run_pass(&mut self.selection).await?;

        let Some(hidden_field_value) = outcome.hidden_field_value() else {
            tracing::warn!("image upload failed, aborting form submission");
            return Ok(SubmitOutcome::Aborted);
        };

        self.submitter.submit(&hidden_field_value).await?;
        tracing::info!(
            urls = outcome.urls().map_or(0, <[String]>::len),
            "form submitted"
        );
        self.selection.clear();

        Ok(SubmitOutcome::Submitted(outcome))
    }
}
