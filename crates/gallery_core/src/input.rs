//! Input normalization: pointer, keyboard and touch into navigation actions

use crate::{GalleryState, NavigationController};

/// Keys the gallery reacts to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Other(String),
}

impl Key {
    /// Parse a key name as reported by the host (`"Escape"`, `"ArrowLeft"`, `" "`, ...)
    pub fn parse(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Enter" | "Return" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            other => Key::Other(other.to_string()),
        }
    }
}

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Thumbnail(usize),
    FullsizeImage,
    /// The dimmed area around the container
    Backdrop,
    /// The container itself (not the backdrop)
    Container,
    PrevButton,
    NextButton,
    CloseButton,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Click(PointerTarget),
    Key {
        key: Key,
        /// Thumbnail holding keyboard focus, if any
        focused_thumbnail: Option<usize>,
    },
    TouchStart { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
    Resize,
}

impl InputEvent {
    pub fn key(name: &str) -> Self {
        InputEvent::Key {
            key: Key::parse(name),
            focused_thumbnail: None,
        }
    }

    /// Delivered through document/window level listeners rather than gallery elements
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            InputEvent::Key { focused_thumbnail: None, .. }
                | InputEvent::Click(PointerTarget::Backdrop)
                | InputEvent::Resize
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Open(usize),
    Next,
    Prev,
    ReturnToGrid,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureStart {
    x: f32,
    y: f32,
}

/// Maps raw input to navigation actions; owns the in-progress touch gesture
#[derive(Debug)]
pub struct InputDispatcher {
    swipe_threshold: f32,
    gesture: Option<GestureStart>,
}

impl InputDispatcher {
    pub fn new(swipe_threshold: f32) -> Self {
        Self {
            swipe_threshold,
            gesture: None,
        }
    }

    pub fn gesture_in_progress(&self) -> bool {
        self.gesture.is_some()
    }

    /// Forget a half-finished gesture
    pub fn reset(&mut self) {
        self.gesture = None;
    }

    /// Translate `event` into an action given the current view
    pub fn resolve(&mut self, event: &InputEvent, state: GalleryState) -> Option<NavAction> {
        match event {
            InputEvent::Click(target) => Self::resolve_click(*target),
            InputEvent::Key { key, focused_thumbnail } => {
                Self::resolve_key(key, *focused_thumbnail, state)
            }
            InputEvent::TouchStart { x, y } => {
                self.gesture = Some(GestureStart { x: *x, y: *y });
                None
            }
            InputEvent::TouchEnd { x, y } => {
                let start = self.gesture.take()?;
                self.resolve_swipe(x - start.x, y - start.y)
            }
            InputEvent::Resize => None,
        }
    }

    /// Resolve `event` and apply it to `nav`. `Close` is returned but not
    /// applied: closing tears down more than navigation state.
    pub fn dispatch(&mut self, event: &InputEvent, nav: &NavigationController) -> Option<NavAction> {
        let action = self.resolve(event, nav.state())?;
        tracing::debug!(?event, ?action, "Input resolved");

        match action {
            NavAction::Open(index) => {
                if let Err(e) = nav.open(index) {
                    tracing::debug!("Ignoring open: {}", e);
                    return None;
                }
            }
            NavAction::Next => {
                nav.next();
            }
            NavAction::Prev => {
                nav.prev();
            }
            NavAction::ReturnToGrid => {
                nav.return_to_grid();
            }
            NavAction::Close => {}
        }

        Some(action)
    }

    fn resolve_click(target: PointerTarget) -> Option<NavAction> {
        match target {
            PointerTarget::Thumbnail(index) => Some(NavAction::Open(index)),
            PointerTarget::FullsizeImage => Some(NavAction::ReturnToGrid),
            PointerTarget::Backdrop | PointerTarget::CloseButton => Some(NavAction::Close),
            PointerTarget::PrevButton => Some(NavAction::Prev),
            PointerTarget::NextButton => Some(NavAction::Next),
            PointerTarget::Container => None,
        }
    }

    fn resolve_key(
        key: &Key,
        focused_thumbnail: Option<usize>,
        state: GalleryState,
    ) -> Option<NavAction> {
        match key {
            Key::Escape => Some(NavAction::Close),
            Key::ArrowLeft if state.is_detail() => Some(NavAction::Prev),
            Key::ArrowRight if state.is_detail() => Some(NavAction::Next),
            Key::Enter | Key::Space => focused_thumbnail.map(NavAction::Open),
            _ => None,
        }
    }

    fn resolve_swipe(&self, dx: f32, dy: f32) -> Option<NavAction> {
        if dx.abs() <= dy.abs() || dx.abs() <= self.swipe_threshold {
            tracing::debug!(dx, dy, "Gesture abandoned");
            return None;
        }
        if dx > 0.0 {
            Some(NavAction::Prev)
        } else {
            Some(NavAction::Next)
        }
    }
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(50.0)
    }
}
