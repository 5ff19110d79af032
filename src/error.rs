use std::time::Duration;

/// Why a candidate file was refused admission into the selection set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("selection is full: at most {max_files} files")]
    CapacityExceeded { max_files: usize },

    #[error("unsupported file type: {mime_type}")]
    InvalidType { mime_type: String },

    #[error("file too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("file already selected")]
    Duplicate,
}

/// Failure of a single file upload. Every variant leaves the file `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error during upload: {0}")]
    Network(String),

    #[error("upload timed out after {0:?}")]
    Timeout(Duration),

    #[error("upload failed with status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("invalid response from server: {0}")]
    MalformedResponse(String),

    #[error("could not read file: {0}")]
    Source(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("an upload pass is already in progress")]
    PassInProgress,

    #[error("form submission failed: {0}")]
    Submission(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("failed to read translation file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse translation file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("translation resource must be a JSON object")]
    NotAnObject,
}
