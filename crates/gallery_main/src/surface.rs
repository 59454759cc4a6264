//! Surface that reports every presentation change to the log

use gallery_core::{GallerySurface, HeightSettings, ImageCatalog, ImageRecord, LoadedImage, NavButtons};
use tracing::info;

pub struct LogSurface;

impl GallerySurface for LogSurface {
    fn build(&self, title: &str, catalog: &ImageCatalog, height: &HeightSettings) {
        info!(images = catalog.len(), "Built gallery \"{}\"", title);
        for (index, record) in catalog.iter().enumerate() {
            info!(index, id = %record.id, "Placeholder: {}", record.label());
        }
        info!(
            height = %height.height,
            max = %height.max_height,
            min = %height.min_height,
            mode = %height.height_mode,
            "Initial height"
        );
    }

    fn apply_height(&self, height: &HeightSettings) {
        info!(
            height = %height.height,
            max = %height.max_height,
            min = %height.min_height,
            mode = %height.height_mode,
            "Height applied"
        );
    }

    fn show_overlay(&self) {
        info!("Overlay shown");
    }

    fn hide_overlay(&self) {
        info!("Overlay hidden");
    }

    fn show_grid(&self) {
        info!("Grid view");
    }

    fn show_detail(&self, index: usize, record: &ImageRecord, buttons: NavButtons) {
        info!(
            index,
            prev = buttons.prev_enabled,
            next = buttons.next_enabled,
            caption = record.caption.as_deref().unwrap_or(""),
            "Detail view: {}",
            record.label()
        );
    }

    fn show_fullsize_loading(&self, index: usize) {
        info!(index, "Loading full-size image...");
    }

    fn apply_fullsize(&self, index: usize, record: &ImageRecord, image: &LoadedImage) {
        info!(
            index,
            width = image.width,
            height = image.height,
            bytes = image.byte_len,
            hash = %format!("{:016x}", image.hash),
            "Full-size shown: {}",
            record.fullsize
        );
    }

    fn clear_fullsize_loading(&self, index: usize) {
        info!(index, "Loading indicator cleared");
    }

    fn thumbnail_loaded(&self, index: usize, image: &LoadedImage) {
        info!(index, width = image.width, height = image.height, "Thumbnail shown: {}", image.url);
    }

    fn thumbnail_failed(&self, index: usize, reason: &str) {
        info!(index, "Thumbnail placeholder kept: {}", reason);
    }

    fn show_notice(&self, id: u64, message: &str) {
        info!(notice = id, "Notice: {}", message);
    }

    fn dismiss_notice(&self, id: u64) {
        info!(notice = id, "Notice dismissed");
    }
}
