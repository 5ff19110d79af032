mod set;
mod types;

pub use set::{Admission, AdmissionLimits, Rejection, SelectionSet};
pub use types::{
    DetachedPreviews, FileIdentity, FileSource, PendingFile, PreviewHandle, PreviewStore, RawFile,
    UploadStatus,
};
