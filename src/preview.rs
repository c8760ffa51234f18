//! Transient display handles for selected photos.
//!
//! A handle is acquired when a photo enters the collection and handed back for
//! revocation once the photo leaves it or the form goes away.
use std::collections::HashMap;

use crate::domain::{FileHandle, FileId};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PreviewHandle {
    file: FileId,
    url: String,
}

impl PreviewHandle {
    fn acquire(file: &FileHandle) -> Self {
        Self {
            file: file.id(),
            url: format!("blob:listing/{}", file.id()),
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Default)]
pub struct PreviewCache {
    active: HashMap<FileId, PreviewHandle>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the live handles to `photos`, returning the ones to revoke.
    pub fn sync(&mut self, photos: &[FileHandle]) -> Vec<PreviewHandle> {
        for photo in photos {
            self.active
                .entry(photo.id())
                .or_insert_with(|| PreviewHandle::acquire(photo));
        }

        let stale: Vec<FileId> = self
            .active
            .keys()
            .filter(|id| !photos.iter().any(|photo| photo.id() == **id))
            .copied()
            .collect();

        let released: Vec<PreviewHandle> = stale
            .into_iter()
            .filter_map(|id| self.active.remove(&id))
            .collect();
        for handle in &released {
            log::debug!("Releasing preview {}", handle.url());
        }
        released
    }

    pub fn get(&self, file: FileId) -> Option<&PreviewHandle> {
        self.active.get(&file)
    }

    /// Preview urls in collection order.
    pub fn urls_for<'a>(&'a self, photos: &'a [FileHandle]) -> impl Iterator<Item = &'a str> + 'a {
        photos
            .iter()
            .filter_map(|photo| self.active.get(&photo.id()).map(PreviewHandle::url))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Release everything, e.g. when the form unmounts.
    pub fn clear(&mut self) -> Vec<PreviewHandle> {
        self.active.drain().map(|(_, handle)| handle).collect()
    }
}
