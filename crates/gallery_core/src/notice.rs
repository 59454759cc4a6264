//! Transient, auto-dismissing user notices

use crate::{GalleryError, GallerySurface};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct NoticeBoard {
    surface: Arc<dyn GallerySurface>,
    duration: Duration,
    next_id: Arc<AtomicU64>,
}

impl NoticeBoard {
    pub fn new(surface: Arc<dyn GallerySurface>, duration: Duration) -> Self {
        Self {
            surface,
            duration,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Show `message` and dismiss it once the display duration has passed
    pub fn show(&self, message: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::error!(notice = id, "PopupGallery error: {}", message);
        self.surface.show_notice(id, message);

        let surface = self.surface.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            surface.dismiss_notice(id);
        });

        id
    }

    /// Log `error` and surface its user-facing text
    pub fn report(&self, error: &GalleryError) -> u64 {
        tracing::debug!("Reporting: {:?}", error);
        self.show(&error.user_message())
    }
}
