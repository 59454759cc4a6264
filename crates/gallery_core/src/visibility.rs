//! Visibility notification for grid placeholders

use crate::{GridLayout, Viewport};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Called with the index of a placeholder that just became visible
pub type VisibilityListener = Arc<dyn Fn(usize) + Send + Sync>;

pub trait VisibilityNotifier: Send + Sync {
    fn set_listener(&self, listener: VisibilityListener);
    fn watch(&self, index: usize);
    fn unwatch(&self, index: usize);
    fn is_watching(&self, index: usize) -> bool;
    /// Scroll position changed
    fn update_viewport(&self, viewport: Viewport);
    /// Stop watching everything and drop the listener
    fn clear(&self);
}

#[derive(Default)]
struct ViewportState {
    watched: BTreeSet<usize>,
    visible: HashSet<usize>,
    viewport: Option<Viewport>,
    listener: Option<VisibilityListener>,
}

/// Geometry-driven notifier: reports not-visible -> visible transitions
/// against the viewport grown by `margin`
pub struct ViewportVisibility {
    layout: GridLayout,
    margin: f32,
    state: Mutex<ViewportState>,
}

impl ViewportVisibility {
    pub fn new(layout: GridLayout, margin: f32) -> Self {
        Self {
            layout,
            margin,
            state: Mutex::new(ViewportState::default()),
        }
    }

    fn in_view(&self, viewport: Viewport, index: usize) -> bool {
        viewport
            .expand(self.margin)
            .intersects(self.layout.item_extent(index))
    }

    pub fn watched_count(&self) -> usize {
        self.state.lock().watched.len()
    }
}

impl VisibilityNotifier for ViewportVisibility {
    fn set_listener(&self, listener: VisibilityListener) {
        self.state.lock().listener = Some(listener);
    }

    fn watch(&self, index: usize) {
        let fire = {
            let mut state = self.state.lock();
            if !state.watched.insert(index) {
                return;
            }
            // Already on screen when first observed counts as a transition
            let viewport = state.viewport;
            match viewport {
                Some(viewport) if self.in_view(viewport, index) => {
                    state.visible.insert(index);
                    state.listener.clone()
                }
                _ => None,
            }
        };

        if let Some(listener) = fire {
            listener(index);
        }
    }

    fn unwatch(&self, index: usize) {
        let mut state = self.state.lock();
        state.watched.remove(&index);
        state.visible.remove(&index);
    }

    fn is_watching(&self, index: usize) -> bool {
        self.state.lock().watched.contains(&index)
    }

    fn update_viewport(&self, viewport: Viewport) {
        let (entered, listener) = {
            let mut state = self.state.lock();
            state.viewport = Some(viewport);

            let now_visible: HashSet<usize> = state
                .watched
                .iter()
                .copied()
                .filter(|&i| self.in_view(viewport, i))
                .collect();

            let mut entered: Vec<usize> = now_visible
                .iter()
                .copied()
                .filter(|i| !state.visible.contains(i))
                .collect();
            entered.sort_unstable();

            state.visible = now_visible;
            (entered, state.listener.clone())
        };

        if let Some(listener) = listener {
            for index in entered {
                listener(index);
            }
        }
    }

    fn clear(&self) {
        *self.state.lock() = ViewportState::default();
    }
}

/// Fallback for hosts without an intersection primitive: every watched
/// placeholder is reported visible at once
#[derive(Default)]
pub struct EagerVisibility {
    watched: Mutex<BTreeSet<usize>>,
    listener: Mutex<Option<VisibilityListener>>,
}

impl EagerVisibility {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisibilityNotifier for EagerVisibility {
    fn set_listener(&self, listener: VisibilityListener) {
        *self.listener.lock() = Some(listener.clone());
        let pending: Vec<usize> = self.watched.lock().iter().copied().collect();
        for index in pending {
            listener(index);
        }
    }

    fn watch(&self, index: usize) {
        if !self.watched.lock().insert(index) {
            return;
        }
        let listener = self.listener.lock().clone();
        if let Some(listener) = listener {
            listener(index);
        }
    }

    fn unwatch(&self, index: usize) {
        self.watched.lock().remove(&index);
    }

    fn is_watching(&self, index: usize) -> bool {
        self.watched.lock().contains(&index)
    }

    fn update_viewport(&self, _viewport: Viewport) {}

    fn clear(&self) {
        self.watched.lock().clear();
        self.listener.lock().take();
    }
}
