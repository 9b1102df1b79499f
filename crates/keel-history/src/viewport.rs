//! Viewport scroll access

use parking_lot::RwLock;

use crate::scroll::ScrollPosition;

/// Read access to the viewport's current scroll offsets.
pub trait Viewport: Send + Sync {
    fn scroll_position(&self) -> ScrollPosition;
}

/// In-process viewport with a settable position.
#[derive(Default)]
pub struct MemoryViewport {
    position: RwLock<ScrollPosition>,
}

impl MemoryViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scroll(&self, position: ScrollPosition) {
        *self.position.write() = position;
    }
}

impl Viewport for MemoryViewport {
    fn scroll_position(&self) -> ScrollPosition {
        *self.position.read()
    }
}
