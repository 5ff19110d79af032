//! Multi-photo upload for web forms: a validated selection of files, uploaded one
//! by one to an asset host, with the resulting URLs handed to the form submission.

pub mod app;
pub mod config;
pub mod error;
pub mod i18n;
pub mod selection;
pub mod upload;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use app::{Collaborators, FormSubmitter, FormValidator, SubmitOutcome, UploadForm};
pub use config::UploaderConfig;
pub use selection::{FileIdentity, RawFile, SelectionSet};
pub use upload::{BatchOutcome, UploadOrchestrator, UploadTransport};
