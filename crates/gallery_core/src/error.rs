//! Gallery error types

use thiserror::Error;

/// Main gallery error type
#[derive(Error, Debug)]
pub enum GalleryError {
    // ===== Widget-level (abort the current initialize) =====
    #[error("Configuration unreachable: {0}")]
    ConfigUnreachable(String),

    #[error("Gallery not initialized")]
    NotInitialized,

    // ===== Recoverable (contained, widget keeps running) =====
    #[error("Malformed configuration: {0}")]
    ConfigMalformed(String),

    #[error("Thumbnail load failed: {0}")]
    ThumbnailLoadFailed(String),

    #[error("Full-size load failed: {0}")]
    FullsizeLoadFailed(String),

    #[error("Image index {index} out of range (catalog has {len} images)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl GalleryError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            GalleryError::ConfigUnreachable(_) | GalleryError::NotInitialized
        )
    }

    /// Is this a widget-level failure?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Text for the transient on-surface notice
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::ConfigUnreachable(_) | GalleryError::NotInitialized => {
                "Failed to initialize gallery".to_string()
            }
            GalleryError::FullsizeLoadFailed(_) => "Failed to load image".to_string(),
            GalleryError::ThumbnailLoadFailed(_) => "Failed to load thumbnail".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<image::ImageError> for GalleryError {
    fn from(e: image::ImageError) -> Self {
        GalleryError::ImageDecode(e.to_string())
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(e: serde_json::Error) -> Self {
        GalleryError::ConfigMalformed(e.to_string())
    }
}

impl From<toml::de::Error> for GalleryError {
    fn from(e: toml::de::Error) -> Self {
        GalleryError::Settings(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(GalleryError::ConfigUnreachable("x".into()).is_fatal());
        assert!(GalleryError::NotInitialized.is_fatal());
        assert!(GalleryError::ConfigMalformed("x".into()).is_recoverable());
        assert!(GalleryError::FullsizeLoadFailed("x".into()).is_recoverable());
        assert!(GalleryError::IndexOutOfRange { index: 0, len: 0 }.is_recoverable());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            GalleryError::ConfigUnreachable("404".into()).user_message(),
            "Failed to initialize gallery"
        );
        assert_eq!(
            GalleryError::FullsizeLoadFailed("a.jpg".into()).user_message(),
            "Failed to load image"
        );
    }
}
