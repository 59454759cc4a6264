//! Deduplicated asynchronous image loading
//!
//! Every (image, tier) pair walks `Pending -> InFlight -> Loaded | Failed`
//! exactly once per session. A request for a pair that is already in flight
//! subscribes to the running retrieval instead of starting another one, and
//! a request for a settled pair resolves immediately with the cached outcome.

use crate::{ImageCatalog, ImageSource, LoadedImage, VisibilityNotifier};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Resolution level, tracked independently per image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadTier {
    Thumbnail,
    Fullsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadKey {
    pub index: usize,
    pub tier: LoadTier,
}

impl LoadKey {
    pub fn thumbnail(index: usize) -> Self {
        Self { index, tier: LoadTier::Thumbnail }
    }

    pub fn fullsize(index: usize) -> Self {
        Self { index, tier: LoadTier::Fullsize }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    InFlight,
    Loaded,
    Failed,
}

/// Terminal result of one retrieval
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(Arc<LoadedImage>),
    Failed(String),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }

    pub fn image(&self) -> Option<&Arc<LoadedImage>> {
        match self {
            LoadOutcome::Loaded(image) => Some(image),
            LoadOutcome::Failed(_) => None,
        }
    }
}

enum Slot {
    InFlight(broadcast::Sender<LoadOutcome>),
    Done(LoadOutcome),
}

/// Handle to the outcome of a `request`
pub struct LoadTicket {
    inner: TicketInner,
}

enum TicketInner {
    Ready(LoadOutcome),
    Waiting(broadcast::Receiver<LoadOutcome>),
}

impl LoadTicket {
    fn ready(outcome: LoadOutcome) -> Self {
        Self { inner: TicketInner::Ready(outcome) }
    }

    fn waiting(rx: broadcast::Receiver<LoadOutcome>) -> Self {
        Self { inner: TicketInner::Waiting(rx) }
    }

    /// Settled before the call returned
    pub fn is_ready(&self) -> bool {
        matches!(self.inner, TicketInner::Ready(_))
    }

    pub async fn outcome(self) -> LoadOutcome {
        match self.inner {
            TicketInner::Ready(outcome) => outcome,
            TicketInner::Waiting(mut rx) => rx
                .recv()
                .await
                .unwrap_or_else(|_| LoadOutcome::Failed("load abandoned".to_string())),
        }
    }
}

/// Owns every per-(image, tier) load state of one session
#[derive(Clone)]
pub struct LoadCoordinator {
    catalog: Arc<ImageCatalog>,
    source: Arc<dyn ImageSource>,
    slots: Arc<DashMap<LoadKey, Slot>>,
    retrievals: Arc<AtomicUsize>,
    visibility: Arc<RwLock<Option<Arc<dyn VisibilityNotifier>>>>,
}

impl LoadCoordinator {
    pub fn new(catalog: Arc<ImageCatalog>, source: Arc<dyn ImageSource>) -> Self {
        Self {
            catalog,
            source,
            slots: Arc::new(DashMap::new()),
            retrievals: Arc::new(AtomicUsize::new(0)),
            visibility: Arc::new(RwLock::new(None)),
        }
    }

    /// Notifier to release once a thumbnail is loaded
    pub fn attach_visibility(&self, visibility: Arc<dyn VisibilityNotifier>) {
        *self.visibility.write() = Some(visibility);
    }

    pub fn detach_visibility(&self) {
        self.visibility.write().take();
    }

    /// Make sure `key` is loaded; at most one retrieval per key ever runs
    pub fn request(&self, key: LoadKey) -> LoadTicket {
        let Some(record) = self.catalog.get(key.index) else {
            tracing::warn!("Load requested for missing image {}", key.index);
            return LoadTicket::ready(LoadOutcome::Failed(format!(
                "no image at index {}",
                key.index
            )));
        };

        let url = match key.tier {
            LoadTier::Thumbnail => record.thumbnail.clone(),
            LoadTier::Fullsize => record.fullsize.clone(),
        };

        let rx = match self.slots.entry(key) {
            Entry::Occupied(entry) => {
                return match entry.get() {
                    Slot::InFlight(tx) => LoadTicket::waiting(tx.subscribe()),
                    Slot::Done(outcome) => LoadTicket::ready(outcome.clone()),
                };
            }
            Entry::Vacant(entry) => {
                let (tx, rx) = broadcast::channel(1);
                entry.insert(Slot::InFlight(tx.clone()));

                let this = self.clone();
                tokio::spawn(async move { this.retrieve(key, url, tx).await });
                rx
            }
        };

        self.retrievals.fetch_add(1, Ordering::Relaxed);
        LoadTicket::waiting(rx)
    }

    async fn retrieve(&self, key: LoadKey, url: String, tx: broadcast::Sender<LoadOutcome>) {
        tracing::debug!(index = key.index, tier = ?key.tier, "Retrieving {}", url);

        let outcome = match self.source.fetch(&url).await {
            Ok(image) => LoadOutcome::Loaded(Arc::new(image)),
            Err(e) => {
                tracing::warn!(index = key.index, tier = ?key.tier, "Failed to load {}: {}", url, e);
                LoadOutcome::Failed(e.to_string())
            }
        };

        // Settle before broadcasting so new callers see the cached outcome
        self.slots.insert(key, Slot::Done(outcome.clone()));
        let _ = tx.send(outcome.clone());

        if key.tier == LoadTier::Thumbnail && outcome.is_loaded() {
            let visibility = self.visibility.read().clone();
            if let Some(visibility) = visibility {
                visibility.unwatch(key.index);
            }
        }
    }

    pub fn state(&self, key: LoadKey) -> LoadState {
        match self.slots.get(&key).as_deref() {
            None => LoadState::Pending,
            Some(Slot::InFlight(_)) => LoadState::InFlight,
            Some(Slot::Done(LoadOutcome::Loaded(_))) => LoadState::Loaded,
            Some(Slot::Done(LoadOutcome::Failed(_))) => LoadState::Failed,
        }
    }

    /// Number of retrievals actually issued
    pub fn retrievals(&self) -> usize {
        self.retrievals.load(Ordering::Relaxed)
    }

    pub fn catalog(&self) -> &Arc<ImageCatalog> {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, settle, FakeSource};
    use crate::{GridLayout, ViewportVisibility};

    fn coordinator(n: usize) -> (LoadCoordinator, Arc<FakeSource>) {
        let source = FakeSource::new();
        (LoadCoordinator::new(catalog(n), source.clone()), source)
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_retrieval() {
        let (loader, source) = coordinator(3);
        source.gate("t1");

        let first = loader.request(LoadKey::thumbnail(1));
        let second = loader.request(LoadKey::thumbnail(1));
        settle().await;

        assert_eq!(loader.state(LoadKey::thumbnail(1)), LoadState::InFlight);
        assert_eq!(loader.retrievals(), 1);
        assert_eq!(source.calls("t1"), 1);

        source.release("t1");
        let (a, b) = tokio::join!(first.outcome(), second.outcome());
        let (a, b) = (a.image().cloned().unwrap(), b.image().cloned().unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loader.state(LoadKey::thumbnail(1)), LoadState::Loaded);
        assert_eq!(source.calls("t1"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loaded_resolves_immediately() {
        let (loader, source) = coordinator(2);
        assert!(loader.request(LoadKey::fullsize(0)).outcome().await.is_loaded());

        let again = loader.request(LoadKey::fullsize(0));
        assert!(again.is_ready());
        assert!(again.outcome().await.is_loaded());
        assert_eq!(source.calls("f0"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_terminal() {
        let (loader, source) = coordinator(2);
        source.fail("t0");

        let outcome = loader.request(LoadKey::thumbnail(0)).outcome().await;
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(loader.state(LoadKey::thumbnail(0)), LoadState::Failed);

        let again = loader.request(LoadKey::thumbnail(0));
        assert!(again.is_ready());
        assert!(!again.outcome().await.is_loaded());
        assert_eq!(source.calls("t0"), 1);
        assert_eq!(loader.catalog().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tiers_are_independent() {
        let (loader, source) = coordinator(1);
        source.fail("f0");

        assert!(loader.request(LoadKey::thumbnail(0)).outcome().await.is_loaded());
        assert_eq!(loader.state(LoadKey::fullsize(0)), LoadState::Pending);
        assert!(!loader.request(LoadKey::fullsize(0)).outcome().await.is_loaded());

        assert_eq!(loader.state(LoadKey::thumbnail(0)), LoadState::Loaded);
        assert_eq!(loader.state(LoadKey::fullsize(0)), LoadState::Failed);
        assert_eq!(loader.retrievals(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_index_fails_without_retrieval() {
        let (loader, source) = coordinator(1);
        let outcome = loader.request(LoadKey::thumbnail(5)).outcome().await;
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(source.total_calls(), 0);
        assert_eq!(loader.retrievals(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loaded_thumbnail_is_unwatched() {
        let (loader, source) = coordinator(2);
        source.fail("t1");
        let visibility = Arc::new(ViewportVisibility::new(GridLayout::default(), 50.0));
        visibility.watch(0);
        visibility.watch(1);
        loader.attach_visibility(visibility.clone());

        loader.request(LoadKey::thumbnail(0)).outcome().await;
        loader.request(LoadKey::thumbnail(1)).outcome().await;
        loader.request(LoadKey::fullsize(1)).outcome().await;
        settle().await;

        assert!(!visibility.is_watching(0));
        assert!(visibility.is_watching(1));
    }
}
