use crate::error::TransportError;
use crate::selection::PendingFile;
use async_trait::async_trait;

/// Receives the current file's progress as a percentage in `0..=100`.
pub type ProgressFn<'a> = dyn Fn(f64) + Send + Sync + 'a;

/// Uploads a single file and yields its remote URL.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(
        &self,
        file: &PendingFile,
        on_progress: &ProgressFn<'_>,
    ) -> Result<String, TransportError>;
}
