use crate::i18n::{messages, Translator};
use crate::selection::UploadStatus;
use crate::upload::{FileStatus, Severity};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionProgress {
    #[default]
    NotStarted,
    Uploading {
        percent: f64,
    },
    Completed,
}

/// What a front end shows while a form is being filled and uploaded,
/// rebuilt from the events the uploader emits.
#[derive(Debug, Default)]
pub struct UploadState {
    pub progress: ActionProgress,
    pub current_file: Option<String>,
    pub file_statuses: Vec<FileStatus>,
    pub last_message: Option<(String, Severity)>,
    pub error_message: Option<String>,
}

impl UploadState {
    pub fn clear(&mut self) {
        *self = UploadState::default();
    }

    pub fn apply_message(&mut self, message: &str, severity: Severity) {
        if severity == Severity::Error {
            self.error_message = Some(message.to_string());
        }
        self.last_message = Some((message.to_string(), severity));
    }

    pub fn apply_progress(&mut self, percent: f64) {
        self.progress = if percent >= 100.0 {
            ActionProgress::Completed
        } else {
            ActionProgress::Uploading { percent }
        };
    }

    /// Keeps only the latest status per file, in first-seen order.
    pub fn apply_status(&mut self, status: &FileStatus) {
        if status.status == UploadStatus::Uploading {
            self.current_file = Some(status.file.name.clone());
        }

        match self
            .file_statuses
            .iter_mut()
            .find(|existing| existing.file == status.file)
        {
            Some(existing) => *existing = status.clone(),
            None => self.file_statuses.push(status.clone()),
        }
    }

    pub fn count(&self, status: UploadStatus) -> usize {
        self.file_statuses
            .iter()
            .filter(|s| s.status == status)
            .count()
    }

    pub fn get_progress_percentage(&self) -> f64 {
        match &self.progress {
            ActionProgress::NotStarted => 0.0,
            ActionProgress::Uploading { percent } => *percent,
            ActionProgress::Completed => 100.0,
        }
    }

    pub fn get_status_text(&self, translator: &dyn Translator) -> String {
        match &self.progress {
            ActionProgress::NotStarted => String::new(),
            _ => messages::progress_status(
                translator,
                self.get_progress_percentage(),
                self.count(UploadStatus::Uploaded),
                self.count(UploadStatus::Failed),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::i18n::DefaultText;
    use crate::selection::FileIdentity;

    fn status(name: &str, status: UploadStatus) -> FileStatus {
        FileStatus {
            file: FileIdentity {
                name: name.to_string(),
                byte_size: 1,
            },
            status,
            error: (status == UploadStatus::Failed)
                .then(|| TransportError::Timeout(std::time::Duration::from_secs(120))),
        }
    }

    #[test]
    fn retried_file_is_counted_once() {
        let mut state = UploadState::default();
        state.apply_status(&status("a.jpg", UploadStatus::Uploading));
        state.apply_status(&status("a.jpg", UploadStatus::Failed));
        state.apply_status(&status("b.jpg", UploadStatus::Uploading));
        state.apply_status(&status("b.jpg", UploadStatus::Uploaded));
        state.apply_status(&status("a.jpg", UploadStatus::Uploading));
        state.apply_status(&status("a.jpg", UploadStatus::Uploaded));

        assert_eq!(state.file_statuses.len(), 2);
        assert_eq!(state.count(UploadStatus::Uploaded), 2);
        assert_eq!(state.count(UploadStatus::Failed), 0);
        assert_eq!(state.current_file.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn status_text_follows_progress() {
        let mut state = UploadState::default();
        assert_eq!(state.get_status_text(&DefaultText), "");

        state.apply_progress(50.0);
        state.apply_status(&status("a.jpg", UploadStatus::Uploaded));
        state.apply_status(&status("b.jpg", UploadStatus::Failed));
        assert_eq!(
            state.get_status_text(&DefaultText),
            "Progress: 50% | Uploaded: 1 | Failed: 1"
        );

        state.apply_progress(100.0);
        assert_eq!(state.progress, ActionProgress::Completed);
        assert_eq!(state.get_progress_percentage(), 100.0);
    }

    #[test]
    fn errors_are_kept_until_cleared() {
        let mut state = UploadState::default();
        state.apply_message("boom", Severity::Error);
        state.apply_message("later", Severity::Info);
        assert_eq!(state.error_message.as_deref(), Some("boom"));
        assert_eq!(state.last_message, Some(("later".to_string(), Severity::Info)));

        state.clear();
        assert!(state.error_message.is_none());
        assert_eq!(state.progress, ActionProgress::NotStarted);
    }
}
