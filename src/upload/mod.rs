mod cloudinary;
mod collaborators;
mod orchestrator;
mod transport;
mod types;

pub use cloudinary::{CloudinaryConfig, CloudinaryTransport};
pub use collaborators::{AutoConfirm, NullSink, RetryConfirmer, Severity, StatusSink};
pub use orchestrator::{overall_progress, UploadOrchestrator, DEFAULT_MAX_ROUNDS};
pub use transport::{ProgressFn, UploadTransport};
pub use types::{BatchOutcome, FileStatus, UploadOutcome, UploadResult};
