//! Immutable image catalog

use crate::config::{GalleryConfig, ImageEntry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable image identity from the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub String);

impl ImageId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One image of the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: ImageId,
    pub thumbnail: String,
    pub fullsize: String,
    pub alt: String,
    pub caption: Option<String>,
}

impl ImageRecord {
    pub fn new(id: &str, thumbnail: &str, fullsize: &str) -> Self {
        Self {
            id: ImageId::new(id),
            thumbnail: thumbnail.to_string(),
            fullsize: fullsize.to_string(),
            alt: String::new(),
            caption: None,
        }
    }

    pub fn with_alt(mut self, alt: &str) -> Self {
        self.alt = alt.to_string();
        self
    }

    pub fn with_caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    /// Accessible label for the grid cell
    pub fn label(&self) -> String {
        if self.alt.is_empty() {
            "View image".to_string()
        } else {
            format!("View {}", self.alt)
        }
    }
}

impl From<&ImageEntry> for ImageRecord {
    fn from(entry: &ImageEntry) -> Self {
        Self {
            id: ImageId::new(&entry.id),
            thumbnail: entry.thumbnail.clone(),
            fullsize: entry.fullsize.clone(),
            alt: entry.alt.clone().unwrap_or_default(),
            caption: entry.caption.clone().filter(|c| !c.is_empty()),
        }
    }
}

/// Ordered, index-addressable list of images; length fixed after construction
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    records: Vec<ImageRecord>,
}

impl ImageCatalog {
    pub fn new(records: Vec<ImageRecord>) -> Self {
        Self { records }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.images.iter().map(ImageRecord::from).collect())
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    /// Index of the first record with this id
    pub fn position(&self, id: &ImageId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.records.len()
    }
}
