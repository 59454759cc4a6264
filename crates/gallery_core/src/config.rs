//! Gallery document and engine tuning configuration

use crate::{GalleryError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level gallery document (`{ "gallery": { ... } }`)
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryDocument {
    pub gallery: GalleryConfig,
}

/// The `gallery` object of the document
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub settings: Option<HeightOverrides>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            settings: None,
            images: Vec::new(),
        }
    }
}

fn default_title() -> String {
    "Gallery".to_string()
}

/// One entry of the `images` array
#[derive(Debug, Clone, Deserialize)]
pub struct ImageEntry {
    pub id: String,
    pub thumbnail: String,
    pub fullsize: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl GalleryDocument {
    /// Parse a raw document
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse a raw document, falling back to an empty gallery when it is malformed
    pub fn parse_lenient(raw: &str) -> GalleryConfig {
        match Self::parse(raw) {
            Ok(doc) => doc.gallery,
            Err(e) => {
                tracing::warn!("Treating gallery as empty: {}", e);
                GalleryConfig::default()
            }
        }
    }
}

/// How the surface sizes itself
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HeightMode {
    #[default]
    Responsive,
    Fixed,
    Auto,
    Other(String),
}

impl From<String> for HeightMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "responsive" => HeightMode::Responsive,
            "fixed" => HeightMode::Fixed,
            "auto" => HeightMode::Auto,
            _ => HeightMode::Other(s),
        }
    }
}

impl From<HeightMode> for String {
    fn from(mode: HeightMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for HeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightMode::Responsive => f.write_str("responsive"),
            HeightMode::Fixed => f.write_str("fixed"),
            HeightMode::Auto => f.write_str("auto"),
            HeightMode::Other(s) => f.write_str(s),
        }
    }
}

/// Presentation height of the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightSettings {
    pub height: String,
    pub max_height: String,
    pub min_height: String,
    pub height_mode: HeightMode,
}

impl Default for HeightSettings {
    fn default() -> Self {
        Self {
            height: "80vh".to_string(),
            max_height: "90vh".to_string(),
            min_height: "400px".to_string(),
            height_mode: HeightMode::Responsive,
        }
    }
}

impl HeightSettings {
    /// Overlay every field that is present in `overrides`
    pub fn merge(&mut self, overrides: &HeightOverrides) {
        if let Some(height) = &overrides.height {
            self.height = height.clone();
        }
        if let Some(max_height) = &overrides.max_height {
            self.max_height = max_height.clone();
        }
        if let Some(min_height) = &overrides.min_height {
            self.min_height = min_height.clone();
        }
        if let Some(mode) = &overrides.height_mode {
            self.height_mode = mode.clone();
        }
    }
}

/// Partial height settings, as found in the document or passed by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightOverrides {
    pub height: Option<String>,
    pub max_height: Option<String>,
    pub min_height: Option<String>,
    pub height_mode: Option<HeightMode>,
}

/// Options passed to `initialize` by the host trigger
pub type InitOptions = HeightOverrides;

impl HeightOverrides {
    pub fn with_height(mut self, height: &str) -> Self {
        self.height = Some(height.to_string());
        self
    }
}

/// Engine tuning constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryTuning {
    /// Proximity window around the viewport for eager thumbnail loads
    pub preload_margin: f32,
    /// Margin added to the viewport when reporting visibility
    pub visibility_margin: f32,
    /// Minimum horizontal travel for a swipe
    pub swipe_threshold: f32,
    pub scroll_debounce_ms: u64,
    pub notice_duration_ms: u64,
    pub thumbnail_size: f32,
    pub grid_gap: f32,
    pub grid_columns: usize,
    /// Visible grid height assumed until the host reports a scroll position
    pub viewport_height: f32,
    /// Host provides a viewport-intersection primitive
    pub intersection_supported: bool,
}

impl Default for GalleryTuning {
    fn default() -> Self {
        Self {
            preload_margin: 360.0, // two rows of 180
            visibility_margin: 50.0,
            swipe_threshold: 50.0,
            scroll_debounce_ms: 100,
            notice_duration_ms: 3000,
            thumbnail_size: 180.0,
            grid_gap: 0.0,
            grid_columns: 4,
            viewport_height: 720.0,
            intersection_supported: true,
        }
    }
}

impl GalleryTuning {
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    /// Load tuning from the config directory
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let tuning = Self::from_toml(&content)?;
            tracing::info!("Tuning loaded from {:?}", path);
            Ok(tuning)
        } else {
            tracing::info!("Using default tuning");
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save tuning to the config directory
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| GalleryError::Settings(e.to_string()))?;
        std::fs::write(&path, content)?;

        tracing::info!("Tuning saved to {:?}", path);
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "PopupGallery", "PopupGallery")
            .map(|dirs| dirs.config_dir().join("tuning.toml"))
            .unwrap_or_else(|| PathBuf::from("./tuning.toml"))
    }
}
