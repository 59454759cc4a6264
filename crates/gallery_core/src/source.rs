//! Retrieval backends for images and gallery documents

use crate::{GalleryError, Result};
use async_trait::async_trait;
use image::ImageReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// A retrieved image, probed but not decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
    pub hash: u64,
}

impl LoadedImage {
    /// Probe dimensions and hash raw image bytes
    pub fn probe(url: &str, data: &[u8]) -> Result<Self> {
        let (width, height) = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .into_dimensions()?;

        Ok(Self {
            url: url.to_string(),
            width,
            height,
            byte_len: data.len(),
            hash: xxh3_64(data),
        })
    }
}

/// Transport for image bytes
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<LoadedImage>;
}

/// Reads images from the local file system
#[derive(Debug, Clone)]
pub struct FsImageSource {
    base_dir: PathBuf,
}

impl FsImageSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Map a document URL to a path: `file://` prefix stripped, relative paths joined to the base
    pub fn resolve(&self, url: &str) -> PathBuf {
        let raw = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[async_trait]
impl ImageSource for FsImageSource {
    async fn fetch(&self, url: &str) -> Result<LoadedImage> {
        let path = self.resolve(url);
        tracing::debug!("Fetching image: {}", path.display());

        let data = tokio::fs::read(&path).await?;
        LoadedImage::probe(url, &data)
    }
}

/// Where the gallery document comes from
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Raw document text
    async fn load(&self) -> Result<String>;

    /// Directory that relative image URLs are resolved against
    fn base_dir(&self) -> PathBuf {
        PathBuf::from(".")
    }

    fn describe(&self) -> String;
}

/// Document stored in a file
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            GalleryError::ConfigUnreachable(format!("{}: {}", self.path.display(), e))
        })
    }

    fn base_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document held in memory
#[derive(Debug, Clone)]
pub struct StaticConfigSource {
    raw: String,
}

impl StaticConfigSource {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load(&self) -> Result<String> {
        Ok(self.raw.clone())
    }

    fn describe(&self) -> String {
        "<inline>".to_string()
    }
}
