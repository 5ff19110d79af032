use super::types::{DetachedPreviews, FileIdentity, PendingFile, PreviewStore, RawFile};
use crate::error::RejectReason;
use serde::Deserialize;
use std::sync::Arc;

const MIB: u64 = 1024 * 1024;

/// Admission rules applied to every candidate file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdmissionLimits {
    pub max_files: usize,
    pub max_size_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for AdmissionLimits {
    fn default() -> Self {
        Self {
            max_files: 8,
            max_size_bytes: 10 * MIB,
            allowed_types: ["image/jpeg", "image/jpg", "image/png", "image/webp"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl AdmissionLimits {
    fn allows_type(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t.eq_ignore_ascii_case(mime_type))
    }

    /// Size ceiling in megabytes, as shown to users.
    pub fn max_size_mb(&self) -> f64 {
        self.max_size_bytes as f64 / MIB as f64
    }
}

#[derive(Debug)]
pub struct Rejection {
    pub file: RawFile,
    pub reason: RejectReason,
}

/// Result of one `admit` call.
#[derive(Debug, Default)]
pub struct Admission {
    pub accepted: Vec<FileIdentity>,
    pub rejections: Vec<Rejection>,
}

/// Ordered set of files waiting to be uploaded.
pub struct SelectionSet {
    limits: AdmissionLimits,
    files: Vec<PendingFile>,
    previews: Arc<dyn PreviewStore>,
}

impl SelectionSet {
    pub fn new(limits: AdmissionLimits) -> Self {
        Self::with_previews(limits, Arc::new(DetachedPreviews))
    }

    pub fn with_previews(limits: AdmissionLimits, previews: Arc<dyn PreviewStore>) -> Self {
        Self {
            limits,
            files: Vec::new(),
            previews,
        }
    }

    pub fn limits(&self) -> &AdmissionLimits {
        &self.limits
    }

    /// Checks each candidate in order (capacity, type, size, duplicate) and appends
    /// the accepted ones as `Ready`. Rejected candidates leave the set untouched.
    pub fn admit(&mut self, candidates: Vec<RawFile>) -> Admission {
        let mut admission = Admission::default();

        for candidate in candidates {
            match self.check(&candidate) {
                Ok(()) => {
                    let preview = self.previews.create(&candidate);
                    admission.accepted.push(candidate.identity());
                    self.files.push(PendingFile::admitted(candidate, preview));
                }
                Err(reason) => admission.rejections.push(Rejection {
                    file: candidate,
                    reason,
                }),
            }
        }

        admission
    }

    fn check(&self, candidate: &RawFile) -> Result<(), RejectReason> {
        if self.files.len() >= self.limits.max_files {
            return Err(RejectReason::CapacityExceeded {
                max_files: self.limits.max_files,
            });
        }

        if !self.limits.allows_type(&candidate.mime_type) {
            return Err(RejectReason::InvalidType {
                mime_type: candidate.mime_type.clone(),
            });
        }

        if candidate.byte_size > self.limits.max_size_bytes {
            return Err(RejectReason::TooLarge {
                size: candidate.byte_size,
                max: self.limits.max_size_bytes,
            });
        }

        if self.contains(&candidate.name, candidate.byte_size) {
            return Err(RejectReason::Duplicate);
        }

        Ok(())
    }

    /// Removes the file with this identity and releases its preview.
    /// Returns `false` when no such file is selected.
    pub fn remove(&mut self, identity: &FileIdentity) -> bool {
        let Some(position) = self
            .files
            .iter()
            .position(|f| f.matches(&identity.name, identity.byte_size))
        else {
            return false;
        };

        let mut file = self.files.remove(position);
        if let Some(handle) = file.preview.take() {
            self.previews.release(handle);
        }
        true
    }

    /// Empties the set, releasing every preview.
    pub fn clear(&mut self) {
        for mut file in self.files.drain(..) {
            if let Some(handle) = file.preview.take() {
                self.previews.release(handle);
            }
        }
    }

    pub fn contains(&self, name: &str, byte_size: u64) -> bool {
        self.files.iter().any(|f| f.matches(name, byte_size))
    }

    pub fn remaining(&self) -> usize {
        self.limits.max_files.saturating_sub(self.files.len())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingFile> {
        self.files.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PendingFile> {
        self.files.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut PendingFile> {
        self.files.get_mut(index)
    }
}

impl Drop for SelectionSet {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::types::{PreviewHandle, UploadStatus};
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingPreviews {
        next: Mutex<u64>,
        live: Mutex<HashSet<u64>>,
    }

    impl TrackingPreviews {
        fn live(&self) -> usize {
            self.live.lock().unwrap().len()
        }
    }

    impl PreviewStore for TrackingPreviews {
        fn create(&self, _file: &RawFile) -> Option<PreviewHandle> {
            let mut next = self.next.lock().unwrap();
            *next += 1;
            self.live.lock().unwrap().insert(*next);
            Some(PreviewHandle::new(*next))
        }

        fn release(&self, handle: PreviewHandle) {
            assert!(self.live.lock().unwrap().remove(&handle.id()));
        }
    }

    fn jpeg(name: &str, size: usize) -> RawFile {
        RawFile::in_memory(name, "image/jpeg", vec![0; size])
    }

    fn limits(max_files: usize) -> AdmissionLimits {
        AdmissionLimits {
            max_files,
            max_size_bytes: 1000,
            ..AdmissionLimits::default()
        }
    }

    #[test]
    fn accepts_valid_files_in_order_as_ready() {
        let mut set = SelectionSet::new(limits(8));
        let admission = set.admit(vec![jpeg("a.jpg", 10), jpeg("b.jpg", 20)]);

        assert_eq!(admission.accepted.len(), 2);
        assert!(admission.rejections.is_empty());
        let names: Vec<_> = set.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
        assert!(set.iter().all(|f| f.status() == UploadStatus::Ready));
    }

    #[test]
    fn rejects_overflow_beyond_max_files() {
        let mut set = SelectionSet::new(limits(3));
        set.admit(vec![jpeg("a.jpg", 1), jpeg("b.jpg", 2)]);

        let admission = set.admit(vec![jpeg("c.jpg", 3), jpeg("d.jpg", 4), jpeg("e.jpg", 5)]);

        assert_eq!(set.len(), 3);
        assert_eq!(admission.accepted.len(), 1);
        assert_eq!(admission.rejections.len(), 2);
        assert!(admission.rejections.iter().all(|r| matches!(
            r.reason,
            RejectReason::CapacityExceeded { max_files: 3 }
        )));
    }

    #[test]
    fn rejected_candidates_do_not_consume_capacity() {
        let mut set = SelectionSet::new(limits(2));
        let gif = RawFile::in_memory("x.gif", "image/gif", vec![0; 5]);

        let admission = set.admit(vec![gif, jpeg("a.jpg", 1), jpeg("b.jpg", 2)]);

        assert_eq!(admission.accepted.len(), 2);
        assert!(matches!(
            admission.rejections[0].reason,
            RejectReason::InvalidType { .. }
        ));
    }

    #[test]
    fn type_check_ignores_case() {
        let mut set = SelectionSet::new(limits(8));
        let admission = set.admit(vec![RawFile::in_memory("a.PNG", "Image/PNG", vec![1])]);
        assert_eq!(admission.accepted.len(), 1);
    }

    #[test]
    fn too_large_file_leaves_set_untouched() {
        let mut set = SelectionSet::new(limits(8));
        set.admit(vec![jpeg("a.jpg", 10)]);

        let admission = set.admit(vec![jpeg("huge.jpg", 1001)]);

        assert_eq!(set.len(), 1);
        assert_eq!(
            admission.rejections[0].reason,
            RejectReason::TooLarge { size: 1001, max: 1000 }
        );
    }

    #[test]
    fn duplicates_rejected_against_existing_and_same_call() {
        let mut set = SelectionSet::new(limits(8));
        set.admit(vec![jpeg("a.jpg", 10)]);

        let admission = set.admit(vec![
            jpeg("a.jpg", 10),
            jpeg("a.jpg", 11),
            jpeg("b.jpg", 5),
            jpeg("b.jpg", 5),
        ]);

        assert_eq!(admission.accepted.len(), 2);
        assert_eq!(admission.rejections.len(), 2);
        assert!(admission
            .rejections
            .iter()
            .all(|r| r.reason == RejectReason::Duplicate));
        let identities: HashSet<_> = set.iter().map(|f| f.identity()).collect();
        assert_eq!(identities.len(), set.len());
    }

    #[test]
    fn size_never_exceeds_max_files() {
        let mut set = SelectionSet::new(limits(4));
        for round in 0..5 {
            let batch = (0..3).map(|i| jpeg(&format!("{}-{}.jpg", round, i), i + 1)).collect();
            set.admit(batch);
            assert!(set.len() <= 4);
        }
    }

    #[test]
    fn remove_is_idempotent_and_releases_preview() {
        let previews = Arc::new(TrackingPreviews::default());
        let mut set = SelectionSet::with_previews(limits(8), previews.clone());
        set.admit(vec![jpeg("a.jpg", 1), jpeg("b.jpg", 2)]);
        assert_eq!(previews.live(), 2);

        let identity = FileIdentity {
            name: "a.jpg".to_string(),
            byte_size: 1,
        };
        assert!(set.remove(&identity));
        assert!(!set.remove(&identity));
        assert_eq!(set.len(), 1);
        assert_eq!(previews.live(), 1);
    }

    #[test]
    fn clear_and_drop_release_all_previews() {
        let previews = Arc::new(TrackingPreviews::default());
        let mut set = SelectionSet::with_previews(limits(8), previews.clone());
        set.admit(vec![jpeg("a.jpg", 1), jpeg("b.jpg", 2)]);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(previews.live(), 0);

        set.admit(vec![jpeg("c.jpg", 3)]);
        assert_eq!(previews.live(), 1);
        drop(set);
        assert_eq!(previews.live(), 0);
    }

    #[test]
    fn size_ceiling_is_not_truncated_to_whole_megabytes() {
        let limits = AdmissionLimits {
            max_size_bytes: 5 * MIB + MIB / 2,
            ..AdmissionLimits::default()
        };
        assert_eq!(limits.max_size_mb(), 5.5);
        assert_eq!(AdmissionLimits::default().max_size_mb(), 10.0);
    }
}
