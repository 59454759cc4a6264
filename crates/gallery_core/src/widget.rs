//! Public widget facade
//!
//! One long-lived `GalleryWidget` per gallery. `initialize` may be called
//! again at any time: the previous session (catalog, load states, timers,
//! listeners) is torn down before the new one is built.

use crate::{
    ConfigSource, EagerVisibility, FsImageSource, GalleryDocument, GalleryError, GallerySurface,
    GalleryState, GalleryTuning, GridLayout, HeightMode, HeightSettings, ImageCatalog,
    ImageSource, InitOptions, InputDispatcher, InputEvent, LoadCoordinator, NavAction,
    NavigationController, NoticeBoard, PreloadScheduler, Result, ThumbnailPipeline, Viewport,
    ViewportVisibility, VisibilityNotifier,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Document/window level listener channels held while the overlay is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerChannel {
    Keyboard,
    Backdrop,
    Resize,
}

/// Attached global listeners; dropping the handle detaches them
#[derive(Debug)]
pub struct InputSubscription {
    channels: Vec<ListenerChannel>,
}

impl InputSubscription {
    fn attach() -> Self {
        let channels = vec![
            ListenerChannel::Keyboard,
            ListenerChannel::Backdrop,
            ListenerChannel::Resize,
        ];
        tracing::debug!(?channels, "Input listeners attached");
        Self { channels }
    }

    pub fn channels(&self) -> &[ListenerChannel] {
        &self.channels
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        tracing::debug!(channels = ?self.channels, "Input listeners detached");
    }
}

/// Everything built by one `initialize`
struct Session {
    title: String,
    catalog: Arc<ImageCatalog>,
    loader: LoadCoordinator,
    visibility: Arc<dyn VisibilityNotifier>,
    pipeline: ThumbnailPipeline,
    scheduler: PreloadScheduler,
    navigation: NavigationController,
    dispatcher: InputDispatcher,
    viewport: Viewport,
}

impl Session {
    fn teardown(&mut self) {
        self.scheduler.cancel();
        self.pipeline.retire();
        self.loader.detach_visibility();
        self.visibility.clear();
        self.dispatcher.reset();
    }
}

pub struct GalleryWidget {
    surface: Arc<dyn GallerySurface>,
    tuning: GalleryTuning,
    image_source: Option<Arc<dyn ImageSource>>,
    notices: NoticeBoard,
    height: Mutex<HeightSettings>,
    session: Mutex<Option<Session>>,
    subscription: Mutex<Option<InputSubscription>>,
}

impl GalleryWidget {
    pub fn new(surface: Arc<dyn GallerySurface>, tuning: GalleryTuning) -> Self {
        let notices = NoticeBoard::new(surface.clone(), tuning.notice_duration());
        Self {
            surface,
            tuning,
            image_source: None,
            notices,
            height: Mutex::new(HeightSettings::default()),
            session: Mutex::new(None),
            subscription: Mutex::new(None),
        }
    }

    /// Fetch images through `source` instead of the file system next to the document
    pub fn with_image_source(mut self, source: Arc<dyn ImageSource>) -> Self {
        self.image_source = Some(source);
        self
    }

    /// Load the document and (re)build the catalog, loaders and listeners
    pub async fn initialize(&self, source: &dyn ConfigSource, options: InitOptions) -> Result<()> {
        self.teardown();
        tracing::info!("Initializing gallery from {}", source.describe());

        let raw = match source.load().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("PopupGallery initialization error: {}", e);
                self.notices.report(&e);
                return Err(e);
            }
        };

        let config = GalleryDocument::parse_lenient(&raw);

        let height = {
            let mut height = HeightSettings::default();
            if let Some(settings) = &config.settings {
                height.merge(settings);
            }
            height.merge(&options);
            *self.height.lock() = height.clone();
            height
        };

        let catalog = Arc::new(ImageCatalog::from_config(&config));
        let image_source = self
            .image_source
            .clone()
            .unwrap_or_else(|| Arc::new(FsImageSource::new(source.base_dir())));

        let layout = GridLayout::from_tuning(&self.tuning);
        let loader = LoadCoordinator::new(catalog.clone(), image_source);
        let visibility: Arc<dyn VisibilityNotifier> = if self.tuning.intersection_supported {
            Arc::new(ViewportVisibility::new(layout, self.tuning.visibility_margin))
        } else {
            tracing::info!("No intersection support, loading every thumbnail");
            Arc::new(EagerVisibility::new())
        };
        loader.attach_visibility(visibility.clone());

        let pipeline = ThumbnailPipeline::new(loader.clone(), self.surface.clone());
        let scheduler = PreloadScheduler::new(
            layout,
            self.tuning.preload_margin,
            self.tuning.scroll_debounce(),
            catalog.len(),
            pipeline.clone(),
        );
        let navigation =
            NavigationController::new(loader.clone(), self.surface.clone(), self.notices.clone());

        self.surface.build(&config.title, &catalog, &height);
        self.surface.apply_height(&height);

        let on_visible = pipeline.clone();
        visibility.set_listener(Arc::new(move |index| on_visible.load(index)));
        for index in 0..catalog.len() {
            visibility.watch(index);
        }

        tracing::info!(images = catalog.len(), "Gallery \"{}\" ready", config.title);

        *self.session.lock() = Some(Session {
            title: config.title,
            catalog,
            loader,
            visibility,
            pipeline,
            scheduler,
            navigation,
            dispatcher: InputDispatcher::new(self.tuning.swipe_threshold),
            viewport: Viewport::new(0.0, self.tuning.viewport_height),
        });

        Ok(())
    }

    /// Show the overlay, attach global listeners and preload the visible grid
    pub fn open(&self) -> Result<()> {
        let session = self.session.lock();
        let Some(session) = session.as_ref() else {
            tracing::error!("Gallery not initialized");
            return Err(GalleryError::NotInitialized);
        };

        self.surface.show_overlay();
        {
            let mut subscription = self.subscription.lock();
            if subscription.is_none() {
                *subscription = Some(InputSubscription::attach());
            }
        }

        session.visibility.update_viewport(session.viewport);
        session.scheduler.evaluate_now(session.viewport);
        Ok(())
    }

    /// Hide the overlay, detach global listeners and go back to the grid
    pub fn close(&self) {
        let mut session = self.session.lock();
        let Some(session) = session.as_mut() else {
            return;
        };

        self.surface.hide_overlay();
        self.subscription.lock().take();
        session.scheduler.cancel();
        session.dispatcher.reset();
        session.navigation.reset();
    }

    /// Feed one input event; returns the navigation action it produced
    pub fn handle_input(&self, event: InputEvent) -> Option<NavAction> {
        if event.is_global() && self.subscription.lock().is_none() {
            tracing::trace!(?event, "Ignoring input while closed");
            return None;
        }

        if matches!(event, InputEvent::Resize) {
            self.on_resize();
            return None;
        }

        let action = {
            let mut session = self.session.lock();
            let session = session.as_mut()?;
            let navigation = session.navigation.clone();
            session.dispatcher.dispatch(&event, &navigation)
        };

        if action == Some(NavAction::Close) {
            self.close();
        }
        action
    }

    /// Grid scrolled: visibility is updated at once, preloading is debounced
    pub fn on_scroll(&self, viewport: Viewport) {
        let mut session = self.session.lock();
        let Some(session) = session.as_mut() else {
            return;
        };
        session.viewport = viewport;
        session.visibility.update_viewport(viewport);
        session.scheduler.on_scroll(viewport);
    }

    pub fn set_height(&self, value: &str) {
        let height = {
            let mut height = self.height.lock();
            height.height = value.to_string();
            height.clone()
        };
        if self.session.lock().is_some() {
            self.surface.apply_height(&height);
        }
    }

    pub fn get_height(&self) -> String {
        self.height.lock().height.clone()
    }

    pub fn height_settings(&self) -> HeightSettings {
        self.height.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        self.subscription.lock().is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.session.lock().is_some()
    }

    pub fn gallery_state(&self) -> GalleryState {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.navigation.state())
            .unwrap_or_default()
    }

    pub fn navigation(&self) -> Option<NavigationController> {
        self.session.lock().as_ref().map(|s| s.navigation.clone())
    }

    pub fn catalog(&self) -> Option<Arc<ImageCatalog>> {
        self.session.lock().as_ref().map(|s| s.catalog.clone())
    }

    pub fn title(&self) -> Option<String> {
        self.session.lock().as_ref().map(|s| s.title.clone())
    }

    pub fn preload_evaluations(&self) -> usize {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.scheduler.evaluations())
            .unwrap_or(0)
    }

    fn on_resize(&self) {
        let height = self.height.lock().clone();
        if height.height_mode == HeightMode::Responsive {
            self.surface.apply_height(&height);
        }
    }

    fn teardown(&self) {
        if self.is_open() {
            self.close();
        }
        if let Some(mut session) = self.session.lock().take() {
            tracing::debug!("Tearing down previous session");
            session.teardown();
        }
    }
}
