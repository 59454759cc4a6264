//! Fakes shared by the unit tests

use crate::{
    GallerySurface, GalleryError, HeightSettings, ImageCatalog, ImageRecord, ImageSource,
    LoadedImage, NavButtons, Result,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Image source with per-URL gates, failures and call counting
#[derive(Default)]
pub(crate) struct FakeSource {
    calls: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold fetches of `url` until `release`
    pub fn gate(&self, url: &str) {
        self.gates.lock().insert(url.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, url: &str) {
        if let Some(gate) = self.gates.lock().get(url) {
            gate.notify_one();
        }
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().insert(url.to_string());
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl ImageSource for FakeSource {
    async fn fetch(&self, url: &str) -> Result<LoadedImage> {
        *self.calls.lock().entry(url.to_string()).or_default() += 1;

        let gate = self.gates.lock().get(url).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().contains(url) {
            return Err(GalleryError::ImageDecode(format!("cannot load {}", url)));
        }

        Ok(LoadedImage {
            url: url.to_string(),
            width: 1,
            height: 1,
            byte_len: 0,
            hash: 0,
        })
    }
}

/// Everything the engine asked the surface to do
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceEvent {
    Build { title: String, count: usize },
    Height(HeightSettings),
    ShowOverlay,
    HideOverlay,
    ShowGrid,
    ShowDetail { index: usize, buttons: NavButtons },
    FullsizeLoading(usize),
    Fullsize { index: usize, url: String },
    FullsizeLoadingCleared(usize),
    ThumbnailLoaded(usize),
    ThumbnailFailed(usize),
    Notice { id: u64, message: String },
    NoticeDismissed(u64),
}

#[derive(Default)]
pub(crate) struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&SurfaceEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn fullsize_applied(&self) -> Vec<usize> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Fullsize { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn thumbnails_loaded(&self) -> Vec<usize> {
        let mut loaded: Vec<usize> = self
            .events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::ThumbnailLoaded(i) => Some(*i),
                _ => None,
            })
            .collect();
        loaded.sort_unstable();
        loaded.dedup();
        loaded
    }

    pub fn notices(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notice { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

impl GallerySurface for RecordingSurface {
    fn build(&self, title: &str, catalog: &ImageCatalog, _height: &HeightSettings) {
        self.push(SurfaceEvent::Build {
            title: title.to_string(),
            count: catalog.len(),
        });
    }

    fn apply_height(&self, height: &HeightSettings) {
        self.push(SurfaceEvent::Height(height.clone()));
    }

    fn show_overlay(&self) {
        self.push(SurfaceEvent::ShowOverlay);
    }

    fn hide_overlay(&self) {
        self.push(SurfaceEvent::HideOverlay);
    }

    fn show_grid(&self) {
        self.push(SurfaceEvent::ShowGrid);
    }

    fn show_detail(&self, index: usize, _record: &ImageRecord, buttons: NavButtons) {
        self.push(SurfaceEvent::ShowDetail { index, buttons });
    }

    fn show_fullsize_loading(&self, index: usize) {
        self.push(SurfaceEvent::FullsizeLoading(index));
    }

    fn apply_fullsize(&self, index: usize, _record: &ImageRecord, image: &LoadedImage) {
        self.push(SurfaceEvent::Fullsize {
            index,
            url: image.url.clone(),
        });
    }

    fn clear_fullsize_loading(&self, index: usize) {
        self.push(SurfaceEvent::FullsizeLoadingCleared(index));
    }

    fn thumbnail_loaded(&self, index: usize, _image: &LoadedImage) {
        self.push(SurfaceEvent::ThumbnailLoaded(index));
    }

    fn thumbnail_failed(&self, index: usize, _reason: &str) {
        self.push(SurfaceEvent::ThumbnailFailed(index));
    }

    fn show_notice(&self, id: u64, message: &str) {
        self.push(SurfaceEvent::Notice {
            id,
            message: message.to_string(),
        });
    }

    fn dismiss_notice(&self, id: u64) {
        self.push(SurfaceEvent::NoticeDismissed(id));
    }
}

/// `n` records named `img{i}` with `t{i}` / `f{i}` URLs
pub(crate) fn catalog(n: usize) -> Arc<ImageCatalog> {
    Arc::new(ImageCatalog::new(
        (0..n)
            .map(|i| {
                ImageRecord::new(&format!("img{}", i), &format!("t{}", i), &format!("f{}", i))
            })
            .collect(),
    ))
}

/// Let every runnable task finish; needs a paused clock
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
