//! Tracks the drawable size so camera aspect and surface stay in sync.

/// Current drawable size in physical pixels. Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Width / height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Record a new size. Zero dimensions are clamped to 1.
    ///
    /// Returns the clamped size if it differs from the current one, `None`
    /// when nothing changed, so callers can skip rebuilding GPU resources.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let next = Self::new(width, height);
        if next == *self {
            return None;
        }
        *self = next;
        Some(self.size())
    }
}
