//! Rendering collaborator interface
//!
//! The engine never draws anything itself. Everything visual (overlay,
//! grid, detail view, captions, notices) is delegated to a `GallerySurface`
//! supplied by the host.

use crate::{HeightSettings, ImageCatalog, ImageRecord, LoadedImage};

/// Enabled state of the detail-view arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButtons {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl NavButtons {
    pub fn at(index: usize, len: usize) -> Self {
        Self {
            prev_enabled: index > 0,
            next_enabled: index + 1 < len,
        }
    }
}

pub trait GallerySurface: Send + Sync {
    /// (Re)build the grid with one placeholder per record
    fn build(&self, title: &str, catalog: &ImageCatalog, height: &HeightSettings);
    fn apply_height(&self, height: &HeightSettings);

    fn show_overlay(&self);
    fn hide_overlay(&self);

    fn show_grid(&self);
    fn show_detail(&self, index: usize, record: &ImageRecord, buttons: NavButtons);

    fn show_fullsize_loading(&self, index: usize);
    fn apply_fullsize(&self, index: usize, record: &ImageRecord, image: &LoadedImage);
    fn clear_fullsize_loading(&self, index: usize);

    fn thumbnail_loaded(&self, index: usize, image: &LoadedImage);
    /// Flag the placeholder as broken
    fn thumbnail_failed(&self, index: usize, reason: &str);

    fn show_notice(&self, id: u64, message: &str);
    fn dismiss_notice(&self, id: u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_buttons() {
        assert_eq!(NavButtons::at(0, 1), NavButtons { prev_enabled: false, next_enabled: false });
        assert_eq!(NavButtons::at(0, 3), NavButtons { prev_enabled: false, next_enabled: true });
        assert_eq!(NavButtons::at(2, 3), NavButtons { prev_enabled: true, next_enabled: false });
    }
}
