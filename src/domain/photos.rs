//! Bounded, ordered collection of selected photos.
use thiserror::Error;

use crate::domain::FileHandle;
use crate::{DEFAULT_MAX_PHOTO_BYTES, MIB};

/// Per-file size rule applied when photos are added.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhotoSizePolicy {
    Capped(u64),
    Unbounded,
}

impl PhotoSizePolicy {
    pub fn from_limit(max_bytes: Option<u64>) -> Self {
        match max_bytes {
            Some(bytes) => PhotoSizePolicy::Capped(bytes),
            None => PhotoSizePolicy::Unbounded,
        }
    }

    pub fn accepts(&self, file: &FileHandle) -> bool {
        match self {
            PhotoSizePolicy::Capped(limit) => file.size() <= *limit,
            PhotoSizePolicy::Unbounded => true,
        }
    }
}

impl Default for PhotoSizePolicy {
    fn default() -> Self {
        PhotoSizePolicy::Capped(DEFAULT_MAX_PHOTO_BYTES)
    }
}

/// Reasons a batch of photos was refused.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PhotoError {
    #[error("You can upload up to {max} photos only.")]
    TooMany { max: usize },
    #[error("Each photo must be {} MB or smaller.", format_megabytes(.limit_bytes))]
    OversizedFile { limit_bytes: u64 },
}

/// Whole mebibytes print as integers, anything else with one decimal.
fn format_megabytes(bytes: &u64) -> String {
    if *bytes % MIB == 0 {
        (*bytes / MIB).to_string()
    } else {
        format!("{:.1}", *bytes as f64 / MIB as f64)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhotoCollection {
    files: Vec<FileHandle>,
    size_policy: PhotoSizePolicy,
}

impl PhotoCollection {
    pub fn new(size_policy: PhotoSizePolicy) -> Self {
        Self {
            files: Vec::new(),
            size_policy,
        }
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn size_policy(&self) -> PhotoSizePolicy {
        self.size_policy
    }

    /// Add a batch of photos, all or nothing.
    ///
    /// The count bound is checked against the files that pass the size rule and
    /// wins over the size error when both apply.
    pub fn add_files(
        &mut self,
        candidates: &[FileHandle],
        max_photos: usize,
    ) -> Result<(), PhotoError> {
        let accepted: Vec<FileHandle> = candidates
            .iter()
            .filter(|file| self.size_policy.accepts(file))
            .cloned()
            .collect();

        if self.files.len() + accepted.len() > max_photos {
            return Err(PhotoError::TooMany { max: max_photos });
        }

        if accepted.len() != candidates.len() {
            let limit_bytes = match self.size_policy {
                PhotoSizePolicy::Capped(limit) => limit,
                PhotoSizePolicy::Unbounded => 0,
            };
            return Err(PhotoError::OversizedFile { limit_bytes });
        }

        self.files.extend(accepted);
        Ok(())
    }

    /// Remove the photo at `index`; out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<FileHandle> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileName;

    fn photo(name: &str, size: usize) -> FileHandle {
        FileHandle::new(FileName::try_from_str(name).unwrap(), vec![0u8; size])
    }

    #[test]
    fn adds_batch_in_order() {
        let mut photos = PhotoCollection::default();
        let batch = [photo("a.jpg", 10), photo("b.jpg", 20)];

        photos.add_files(&batch, 3).unwrap();
        photos.add_files(&[photo("c.jpg", 5)], 3).unwrap();

        let names: Vec<&str> = photos.files().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn rejects_whole_batch_over_count() {
        let mut photos = PhotoCollection::default();
        photos.add_files(&[photo("a.jpg", 1)], 2).unwrap();

        let err = photos
            .add_files(&[photo("b.jpg", 1), photo("c.jpg", 1)], 2)
            .unwrap_err();

        assert_eq!(err, PhotoError::TooMany { max: 2 });
        assert_eq!(err.to_string(), "You can upload up to 2 photos only.");
        assert_eq!(photos.len(), 1);
    }

    #[test]
    fn rejects_whole_batch_with_oversized_file() {
        let mut photos = PhotoCollection::new(PhotoSizePolicy::Capped(5 * MIB));
        let batch = [photo("ok.jpg", MIB as usize), photo("big.jpg", 6 * MIB as usize)];

        let err = photos.add_files(&batch, 3).unwrap_err();

        assert_eq!(err.to_string(), "Each photo must be 5 MB or smaller.");
        assert!(photos.is_empty());
    }

    #[test]
    fn fractional_cap_is_reported_precisely() {
        let mut photos = PhotoCollection::new(PhotoSizePolicy::Capped(1_500_000));
        let err = photos
            .add_files(&[photo("big.jpg", 1_600_000)], 1)
            .unwrap_err();
        assert_eq!(err.to_string(), "Each photo must be 1.4 MB or smaller.");

        let mut photos = PhotoCollection::new(PhotoSizePolicy::Capped(512 * 1024));
        let err = photos.add_files(&[photo("big.jpg", MIB as usize)], 1).unwrap_err();
        assert_eq!(err.to_string(), "Each photo must be 0.5 MB or smaller.");
    }

    #[test]
    fn count_error_wins_over_size_error() {
        let mut photos = PhotoCollection::new(PhotoSizePolicy::Capped(100));
        let batch = [
            photo("a.jpg", 10),
            photo("b.jpg", 10),
            photo("huge.jpg", 1000),
        ];

        let err = photos.add_files(&batch, 1).unwrap_err();
        assert_eq!(err, PhotoError::TooMany { max: 1 });
    }

    #[test]
    fn oversized_files_within_count_report_size() {
        let mut photos = PhotoCollection::new(PhotoSizePolicy::Capped(100));
        let batch = [photo("a.jpg", 10), photo("huge.jpg", 1000)];

        let err = photos.add_files(&batch, 2).unwrap_err();
        assert!(matches!(err, PhotoError::OversizedFile { .. }));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let mut photos = PhotoCollection::new(PhotoSizePolicy::Capped(100));
        photos.add_files(&[photo("edge.jpg", 100)], 1).unwrap();
        assert_eq!(photos.len(), 1);
    }

    #[test]
    fn unbounded_policy_accepts_any_size() {
        let mut photos = PhotoCollection::new(PhotoSizePolicy::from_limit(None));
        photos
            .add_files(&[photo("big.jpg", 6 * MIB as usize)], 1)
            .unwrap();
        assert_eq!(photos.len(), 1);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut photos = PhotoCollection::default();
        photos
            .add_files(&[photo("a.jpg", 1), photo("b.jpg", 1)], 3)
            .unwrap();
        let before = photos.clone();

        assert!(photos.remove_at(2).is_none());
        assert!(photos.remove_at(usize::MAX).is_none());
        assert_eq!(photos, before);

        let removed = photos.remove_at(0).unwrap();
        assert_eq!(removed.name().as_str(), "a.jpg");
        assert_eq!(photos.files()[0].name().as_str(), "b.jpg");
    }

    #[test]
    fn reset_clears_everything() {
        let mut photos = PhotoCollection::default();
        photos.add_files(&[photo("a.jpg", 1)], 1).unwrap();
        photos.reset();
        assert!(photos.is_empty());
    }
}
