//! Strongly-typed domain structures for listing drafts.
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bytes::Bytes;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::DEFAULT_MAX_PHOTOS;

pub mod photos;

pub use photos::{PhotoCollection, PhotoError, PhotoSizePolicy};

/// Form field addressed by validation messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Field {
    CarModel,
    Price,
    Phone,
    City,
    MaxPhotos,
    Photos,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::CarModel,
        Field::Price,
        Field::Phone,
        Field::City,
        Field::MaxPhotos,
        Field::Photos,
    ];

    /// Name used both on the wire and as the error path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::CarModel => "carModel",
            Field::Price => "price",
            Field::Phone => "phone",
            Field::City => "city",
            Field::MaxPhotos => "maxPhotos",
            Field::Photos => "photos",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// City a car is offered in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum City {
    #[default]
    Lahore,
    Karachi,
}

impl City {
    pub const ALL: [City; 2] = [City::Lahore, City::Karachi];

    pub fn as_str(&self) -> &'static str {
        match self {
            City::Lahore => "Lahore",
            City::Karachi => "Karachi",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for City {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|city| city.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| TypeConstraintError::UnknownCity(value.to_string()))
    }
}

/// Identity of a selected photo, stable for as long as the handle lives.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sanitized file name (single path component).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FileName(String);

impl FileName {
    pub fn try_new(value: String) -> Result<Self, TypeConstraintError> {
        let path = Path::new(&value);
        let mut components = path.components();
        match (components.next(), components.next()) {
            (Some(std::path::Component::Normal(component)), None) => {
                Ok(Self(component.to_string_lossy().to_string()))
            }
            _ => Err(TypeConstraintError::InvalidFileName),
        }
    }

    pub fn try_from_str(value: &str) -> Result<Self, TypeConstraintError> {
        Self::try_new(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type guessed from the extension.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.0)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Reference to a selected image blob.
///
/// Cloning shares the underlying bytes; the collection never copies photo data.
#[derive(Clone, Debug)]
pub struct FileHandle {
    id: FileId,
    name: FileName,
    data: Bytes,
}

impl FileHandle {
    pub fn new(name: FileName, data: impl Into<Bytes>) -> Self {
        Self {
            id: FileId::new(),
            name,
            data: data.into(),
        }
    }

    /// Read a photo from disk, keeping only its final path component as name.
    pub fn from_path(path: &Path) -> Result<Self, TypeConstraintError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or(TypeConstraintError::InvalidFileName)?;
        let name = FileName::try_new(name)?;
        let data = std::fs::read(path).map_err(TypeConstraintError::ReadPhoto)?;
        Ok(Self::new(name, data))
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &FileName {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn content_type(&self) -> String {
        self.name.content_type()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }
}

/// Only the name and size are exposed; photo bytes never end up in error params.
impl Serialize for FileHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileHandle", 2)?;
        state.serialize_field("name", self.name.as_str())?;
        state.serialize_field("size", &self.size())?;
        state.end()
    }
}

impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FileHandle {}

/// In-progress, unsaved listing form state.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingDraft {
    pub car_model: String,
    pub price: Option<f64>,
    pub phone: String,
    pub city: Option<City>,
    pub max_photos: Option<u8>,
    pub photos: PhotoCollection,
}

impl ListingDraft {
    /// Initial values shown when the form mounts.
    pub fn new(size_policy: PhotoSizePolicy) -> Self {
        Self {
            car_model: String::new(),
            price: None,
            phone: String::new(),
            city: Some(City::default()),
            max_photos: Some(DEFAULT_MAX_PHOTOS),
            photos: PhotoCollection::new(size_policy),
        }
    }

    /// Photo bound enforced at add time; an unset maximum admits nothing.
    pub fn photo_limit(&self) -> usize {
        self.max_photos.map(usize::from).unwrap_or(0)
    }
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self::new(PhotoSizePolicy::default())
    }
}

/// Field path to message; a missing key means valid or not yet validated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationErrorSet(BTreeMap<Field, String>);

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Keeps the first message recorded for a field.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    /// Replace the entry for `field` with whatever `other` holds for it.
    pub fn refresh_from(&mut self, other: &ValidationErrorSet, field: Field) {
        match other.get(field) {
            Some(message) => {
                self.0.insert(field, message.to_string());
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}


#[derive(Debug, Error)]
pub enum TypeConstraintError {
    #[error("invalid file name")]
    InvalidFileName,
    #[error("unknown city: {0}")]
    UnknownCity(String),
    #[error("failed to read photo")]
    ReadPhoto(#[source] std::io::Error),
}
