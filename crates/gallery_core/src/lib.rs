//! PopupGallery Core
//!
//! This crate contains:
//! - Gallery document parsing and engine tuning
//! - Image catalog
//! - Deduplicating two-tier image loading
//! - Visibility notification and proximity preloading
//! - Grid / detail navigation
//! - Input normalization
//! - The widget facade tying a session together

pub mod error;
pub mod config;
pub mod catalog;
pub mod source;
pub mod layout;
pub mod surface;
pub mod loader;
pub mod visibility;
pub mod thumbnails;
pub mod preload;
pub mod notice;
pub mod navigation;
pub mod input;
pub mod widget;

#[cfg(test)]
mod testing;

pub use error::{GalleryError, Result};
pub use config::{
    GalleryConfig, GalleryDocument, GalleryTuning, HeightMode, HeightOverrides, HeightSettings,
    ImageEntry, InitOptions,
};
pub use catalog::{ImageCatalog, ImageId, ImageRecord};
pub use source::{
    ConfigSource, FileConfigSource, FsImageSource, ImageSource, LoadedImage, StaticConfigSource,
};
pub use layout::{Extent, GridLayout, Viewport};
pub use surface::{GallerySurface, NavButtons};
pub use loader::{LoadCoordinator, LoadKey, LoadOutcome, LoadState, LoadTicket, LoadTier};
pub use visibility::{EagerVisibility, ViewportVisibility, VisibilityListener, VisibilityNotifier};
pub use thumbnails::ThumbnailPipeline;
pub use preload::PreloadScheduler;
pub use notice::NoticeBoard;
pub use navigation::{GalleryState, NavigationController, ViewMode};
pub use input::{InputDispatcher, InputEvent, Key, NavAction, PointerTarget};
pub use widget::{GalleryWidget, InputSubscription, ListenerChannel};
