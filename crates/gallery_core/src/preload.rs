//! Proximity preloading driven by scroll position

use crate::{GridLayout, ThumbnailPipeline, Viewport};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Requests thumbnails near the viewport; scroll bursts are debounced
/// (trailing edge, most recent bounds win)
#[derive(Clone)]
pub struct PreloadScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    layout: GridLayout,
    margin: f32,
    quiet: Duration,
    item_count: usize,
    pipeline: ThumbnailPipeline,
    pending: Mutex<Option<JoinHandle<()>>>,
    evaluations: AtomicUsize,
    last_evaluated: Mutex<Option<Viewport>>,
}

impl PreloadScheduler {
    pub fn new(
        layout: GridLayout,
        margin: f32,
        quiet: Duration,
        item_count: usize,
        pipeline: ThumbnailPipeline,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                layout,
                margin,
                quiet,
                item_count,
                pipeline,
                pending: Mutex::new(None),
                evaluations: AtomicUsize::new(0),
                last_evaluated: Mutex::new(None),
            }),
        }
    }

    /// Schedule an evaluation after the quiet interval, replacing any pending one
    pub fn on_scroll(&self, viewport: Viewport) {
        let this = self.clone();
        let quiet = self.inner.quiet;
        let task = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            this.inner.pending.lock().take();
            this.evaluate_now(viewport);
        });

        if let Some(previous) = self.inner.pending.lock().replace(task) {
            previous.abort();
        }
    }

    /// Request every thumbnail inside the proximity window right away
    pub fn evaluate_now(&self, viewport: Viewport) {
        let inner = &self.inner;
        let window = viewport.expand(inner.margin);
        let indices = inner.layout.items_in(window, inner.item_count);

        tracing::debug!(
            top = viewport.top,
            bottom = viewport.bottom,
            "Preloading {} thumbnails",
            indices.len()
        );

        for index in indices {
            inner.pipeline.load(index);
        }

        inner.evaluations.fetch_add(1, Ordering::Relaxed);
        *inner.last_evaluated.lock() = Some(viewport);
    }

    /// Drop a scheduled evaluation that has not run yet
    pub fn cancel(&self) {
        if let Some(pending) = self.inner.pending.lock().take() {
            pending.abort();
        }
    }

    pub fn evaluations(&self) -> usize {
        self.inner.evaluations.load(Ordering::Relaxed)
    }

    pub fn last_evaluated(&self) -> Option<Viewport> {
        *self.inner.last_evaluated.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, settle, FakeSource, RecordingSurface};
    use crate::LoadCoordinator;

    const QUIET: Duration = Duration::from_millis(100);

    // 2 columns of 180: row r spans [180r, 180r + 180)
    fn scheduler(n: usize) -> (PreloadScheduler, Arc<FakeSource>, Arc<RecordingSurface>) {
        let source = FakeSource::new();
        let surface = RecordingSurface::new();
        let loader = LoadCoordinator::new(catalog(n), source.clone());
        let pipeline = ThumbnailPipeline::new(loader, surface.clone());
        let scheduler =
            PreloadScheduler::new(GridLayout::new(2, 180.0, 0.0), 360.0, QUIET, n, pipeline);
        (scheduler, source, surface)
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluate_now_loads_proximity_window() {
        let (scheduler, source, surface) = scheduler(20);
        scheduler.evaluate_now(Viewport::new(0.0, 180.0));
        settle().await;

        // [-360, 540) covers rows 0..=2
        assert_eq!(surface.thumbnails_loaded(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(source.total_calls(), 6);
        assert_eq!(scheduler.evaluations(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_bounds() {
        let (scheduler, _source, surface) = scheduler(40);
        let a = Viewport::new(0.0, 180.0);
        let b = Viewport::new(720.0, 900.0);
        let c = Viewport::new(1800.0, 1980.0);

        scheduler.on_scroll(a);
        scheduler.on_scroll(b);
        scheduler.on_scroll(c);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(scheduler.evaluations(), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.evaluations(), 1);
        assert_eq!(scheduler.last_evaluated(), Some(c));

        // [1440, 2340) covers rows 8..=12
        settle().await;
        assert_eq!(surface.thumbnails_loaded(), (16..26).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_scrolls_each_evaluate() {
        let (scheduler, _source, _surface) = scheduler(10);
        scheduler.on_scroll(Viewport::new(0.0, 100.0));
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.on_scroll(Viewport::new(100.0, 200.0));
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(scheduler.evaluations(), 2);
        assert_eq!(scheduler.last_evaluated(), Some(Viewport::new(100.0, 200.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (scheduler, source, _surface) = scheduler(10);
        scheduler.on_scroll(Viewport::new(0.0, 100.0));
        scheduler.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(scheduler.evaluations(), 0);
        assert_eq!(source.total_calls(), 0);
    }
}
