//! Grid / detail navigation state machine

use crate::{
    GalleryError, GallerySurface, ImageCatalog, LoadCoordinator, LoadKey, LoadOutcome,
    NavButtons, NoticeBoard, Result,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Detail,
}

/// Which view is showing; a detail view always carries a valid index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GalleryState {
    #[default]
    Grid,
    Detail(usize),
}

impl GalleryState {
    pub fn view_mode(&self) -> ViewMode {
        match self {
            GalleryState::Grid => ViewMode::Grid,
            GalleryState::Detail(_) => ViewMode::Detail,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self {
            GalleryState::Grid => None,
            GalleryState::Detail(index) => Some(*index),
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, GalleryState::Detail(_))
    }
}

/// Owns `GalleryState` and drives the surface between grid and detail views
#[derive(Clone)]
pub struct NavigationController {
    catalog: Arc<ImageCatalog>,
    loader: LoadCoordinator,
    surface: Arc<dyn GallerySurface>,
    notices: NoticeBoard,
    state: Arc<Mutex<GalleryState>>,
}

impl NavigationController {
    pub fn new(
        loader: LoadCoordinator,
        surface: Arc<dyn GallerySurface>,
        notices: NoticeBoard,
    ) -> Self {
        Self {
            catalog: loader.catalog().clone(),
            loader,
            surface,
            notices,
            state: Arc::new(Mutex::new(GalleryState::Grid)),
        }
    }

    pub fn state(&self) -> GalleryState {
        *self.state.lock()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state().current_index()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state().view_mode()
    }

    /// Show image `index` in the detail view
    pub fn open(&self, index: usize) -> Result<()> {
        let len = self.catalog.len();
        if index >= len {
            tracing::debug!(index, len, "Rejected open");
            return Err(GalleryError::IndexOutOfRange { index, len });
        }

        *self.state.lock() = GalleryState::Detail(index);
        self.show(index);
        Ok(())
    }

    /// Advance one image; clamped at the last one
    pub fn next(&self) -> bool {
        let target = {
            let mut state = self.state.lock();
            let current = *state;
            match current {
                GalleryState::Detail(i) if i + 1 < self.catalog.len() => {
                    *state = GalleryState::Detail(i + 1);
                    i + 1
                }
                _ => return false,
            }
        };
        self.show(target);
        true
    }

    /// Step back one image; clamped at the first one
    pub fn prev(&self) -> bool {
        let target = {
            let mut state = self.state.lock();
            let current = *state;
            match current {
                GalleryState::Detail(i) if i > 0 => {
                    *state = GalleryState::Detail(i - 1);
                    i - 1
                }
                _ => return false,
            }
        };
        self.show(target);
        true
    }

    pub fn return_to_grid(&self) -> bool {
        {
            let mut state = self.state.lock();
            if !state.is_detail() {
                return false;
            }
            *state = GalleryState::Grid;
        }
        self.surface.show_grid();
        true
    }

    /// Back to the grid regardless of the current view
    pub fn reset(&self) {
        *self.state.lock() = GalleryState::Grid;
        self.surface.show_grid();
    }

    fn show(&self, index: usize) {
        let Some(record) = self.catalog.get(index) else {
            return;
        };
        self.surface
            .show_detail(index, record, NavButtons::at(index, self.catalog.len()));
        self.load_fullsize(index);
    }

    fn load_fullsize(&self, index: usize) {
        self.surface.show_fullsize_loading(index);

        let ticket = self.loader.request(LoadKey::fullsize(index));
        let this = self.clone();

        tokio::spawn(async move {
            let outcome = ticket.outcome().await;

            // Hold the state while applying so navigation cannot interleave
            let state = this.state.lock();
            if state.current_index() != Some(index) {
                tracing::debug!(index, current = ?state.current_index(), "Discarding stale full-size result");
                return;
            }

            match outcome {
                LoadOutcome::Loaded(image) => {
                    if let Some(record) = this.catalog.get(index) {
                        this.surface.apply_fullsize(index, record, &image);
                    }
                }
                LoadOutcome::Failed(reason) => {
                    this.surface.clear_fullsize_loading(index);
                    this.notices.report(&GalleryError::FullsizeLoadFailed(reason));
                }
            }
        });
    }
}
