use crate::error::TransportError;
use crate::selection::{FileIdentity, UploadStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct FileStatus {
    pub file: FileIdentity,
    pub status: UploadStatus,
    pub error: Option<TransportError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success(String),
    Failure(TransportError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub file: FileIdentity,
    pub outcome: UploadOutcome,
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, UploadOutcome::Success(_))
    }
}

/// Terminal result of an orchestration run, handed to the form submission step.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    AllSucceeded {
        urls: Vec<String>,
    },
    PartialSuccess {
        urls: Vec<String>,
        failed: Vec<FileIdentity>,
    },
    AbortedNoSuccess,
}

impl BatchOutcome {
    /// URLs to embed in the form, or `None` when the form must not be submitted.
    pub fn urls(&self) -> Option<&[String]> {
        match self {
            BatchOutcome::AllSucceeded { urls } | BatchOutcome::PartialSuccess { urls, .. } => {
                Some(urls)
            }
            BatchOutcome::AbortedNoSuccess => None,
        }
    }

    /// Newline-separated URL list for the hidden form field.
    pub fn hidden_field_value(&self) -> Option<String> {
        self.urls().map(|urls| urls.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_field_joins_urls_with_newlines() {
        let outcome = BatchOutcome::PartialSuccess {
            urls: vec!["https://a".to_string(), "https://b".to_string()],
            failed: vec![FileIdentity {
                name: "c.jpg".to_string(),
                byte_size: 3,
            }],
        };
        assert_eq!(outcome.hidden_field_value().as_deref(), Some("https://a\nhttps://b"));
        assert_eq!(
            BatchOutcome::AllSucceeded { urls: vec![] }.hidden_field_value().as_deref(),
            Some("")
        );
        assert_eq!(BatchOutcome::AbortedNoSuccess.hidden_field_value(), None);
    }
}
