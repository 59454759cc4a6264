//! Thumbnail tier loading shared by visibility and preload triggers

use crate::{GalleryError, GallerySurface, LoadCoordinator, LoadKey, LoadOutcome, LoadState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct ThumbnailPipeline {
    loader: LoadCoordinator,
    surface: Arc<dyn GallerySurface>,
    active: Arc<AtomicBool>,
}

impl ThumbnailPipeline {
    pub fn new(loader: LoadCoordinator, surface: Arc<dyn GallerySurface>) -> Self {
        Self {
            loader,
            surface,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Start loading the thumbnail at `index` unless it was already started
    pub fn load(&self, index: usize) {
        let key = LoadKey::thumbnail(index);
        if self.loader.state(key) != LoadState::Pending {
            return;
        }

        let ticket = self.loader.request(key);
        let surface = self.surface.clone();
        let active = self.active.clone();

        tokio::spawn(async move {
            let outcome = ticket.outcome().await;
            if !active.load(Ordering::Acquire) {
                tracing::debug!(index, "Dropping thumbnail for retired session");
                return;
            }
            match outcome {
                LoadOutcome::Loaded(image) => surface.thumbnail_loaded(index, &image),
                LoadOutcome::Failed(reason) => {
                    tracing::error!(index, "{}", GalleryError::ThumbnailLoadFailed(reason.clone()));
                    surface.thumbnail_failed(index, &reason);
                }
            }
        });
    }

    /// Stop applying results to the surface
    pub fn retire(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn loader(&self) -> &LoadCoordinator {
        &self.loader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, settle, FakeSource, RecordingSurface, SurfaceEvent};

    fn pipeline(n: usize) -> (ThumbnailPipeline, Arc<FakeSource>, Arc<RecordingSurface>) {
        let source = FakeSource::new();
        let surface = RecordingSurface::new();
        let loader = LoadCoordinator::new(catalog(n), source.clone());
        (ThumbnailPipeline::new(loader, surface.clone()), source, surface)
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_renders_once() {
        let (pipeline, source, surface) = pipeline(3);
        pipeline.load(1);
        pipeline.load(1);
        settle().await;
        pipeline.load(1);
        settle().await;

        assert_eq!(surface.events(), vec![SurfaceEvent::ThumbnailLoaded(1)]);
        assert_eq!(source.calls("t1"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_thumbnail_is_flagged() {
        let (pipeline, source, surface) = pipeline(2);
        source.fail("t0");
        pipeline.load(0);
        settle().await;
        pipeline.load(0);
        settle().await;

        assert_eq!(surface.events(), vec![SurfaceEvent::ThumbnailFailed(0)]);
        assert_eq!(pipeline.loader().state(LoadKey::thumbnail(0)), LoadState::Failed);
        assert_eq!(source.calls("t0"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retired_pipeline_is_silent() {
        let (pipeline, source, surface) = pipeline(2);
        source.gate("t0");
        pipeline.load(0);
        settle().await;
        pipeline.retire();
        source.release("t0");
        settle().await;

        assert!(surface.events().is_empty());
    }
}
