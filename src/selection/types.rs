use derivative::Derivative;
use std::fmt;
use std::path::PathBuf;

/// Where a file's bytes come from.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub enum FileSource {
    Memory(#[derivative(Debug = "ignore")] Vec<u8>),
    Path(PathBuf),
}

impl FileSource {
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileSource::Memory(bytes) => Ok(bytes.clone()),
            FileSource::Path(path) => tokio::fs::read(path).await,
        }
    }
}

/// A file offered for admission, before any check has run.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub source: FileSource,
}

impl RawFile {
    pub fn in_memory(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            byte_size: bytes.len() as u64,
            mime_type: mime_type.into(),
            source: FileSource::Memory(bytes),
        }
    }

    pub fn identity(&self) -> FileIdentity {
        FileIdentity {
            name: self.name.clone(),
            byte_size: self.byte_size,
        }
    }
}

/// Weak identity of a file: two files with the same name and size are the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub name: String,
    pub byte_size: u64,
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.byte_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Ready,
    Uploading,
    Uploaded,
    Failed,
}

impl UploadStatus {
    /// Whether a pass should (re)upload a file in this state.
    pub fn is_eligible(self) -> bool {
        matches!(self, UploadStatus::Ready | UploadStatus::Failed)
    }
}

/// Revocable display handle for a file preview. Not `Clone`: releasing it consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Creates and revokes preview handles for admitted files.
pub trait PreviewStore: Send + Sync {
    fn create(&self, file: &RawFile) -> Option<PreviewHandle>;

    fn release(&self, handle: PreviewHandle);
}

/// Store for front ends that render no previews.
#[derive(Debug, Default)]
pub struct DetachedPreviews;

impl PreviewStore for DetachedPreviews {
    fn create(&self, _file: &RawFile) -> Option<PreviewHandle> {
        None
    }

    fn release(&self, _handle: PreviewHandle) {}
}

/// One entry of the selection set.
#[derive(Debug)]
pub struct PendingFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub source: FileSource,
    status: UploadStatus,
    location: Option<String>,
    pub(crate) preview: Option<PreviewHandle>,
}

impl PendingFile {
    pub(crate) fn admitted(raw: RawFile, preview: Option<PreviewHandle>) -> Self {
        Self {
            name: raw.name,
            byte_size: raw.byte_size,
            mime_type: raw.mime_type,
            source: raw.source,
            status: UploadStatus::Ready,
            location: None,
            preview,
        }
    }

    pub fn identity(&self) -> FileIdentity {
        FileIdentity {
            name: self.name.clone(),
            byte_size: self.byte_size,
        }
    }

    pub fn matches(&self, name: &str, byte_size: u64) -> bool {
        self.name == name && self.byte_size == byte_size
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// Remote URL, set once the file is `Uploaded`.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub(crate) fn mark_uploading(&mut self) {
        self.status = UploadStatus::Uploading;
    }

    pub(crate) fn mark_uploaded(&mut self, url: String) {
        self.status = UploadStatus::Uploaded;
        self.location = Some(url);
    }

    pub(crate) fn mark_failed(&mut self) {
        self.status = UploadStatus::Failed;
        self.location = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_file_bytes() {
        let raw = RawFile::in_memory("car.jpg", "image/jpeg", vec![0xAB; 64]);
        let rendered = format!("{:?}", raw);
        assert!(rendered.contains("car.jpg"));
        assert!(!rendered.contains("171"));
    }

    #[test]
    fn only_ready_and_failed_are_eligible() {
        assert!(UploadStatus::Ready.is_eligible());
        assert!(UploadStatus::Failed.is_eligible());
        assert!(!UploadStatus::Uploading.is_eligible());
        assert!(!UploadStatus::Uploaded.is_eligible());
    }

    #[test]
    fn failing_clears_location() {
        let mut file = PendingFile::admitted(RawFile::in_memory("a.png", "image/png", vec![1]), None);
        file.mark_uploading();
        file.mark_uploaded("https://cdn/a.png".to_string());
        assert_eq!(file.location(), Some("https://cdn/a.png"));
        file.mark_failed();
        assert_eq!(file.status(), UploadStatus::Failed);
        assert_eq!(file.location(), None);
    }

    #[tokio::test]
    async fn memory_source_reads_back_bytes() {
        let source = FileSource::Memory(vec![1, 2, 3]);
        assert_eq!(source.read().await.unwrap(), vec![1, 2, 3]);
    }
}
