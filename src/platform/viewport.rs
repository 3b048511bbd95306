//! Logical viewport size
//!
//! The host owns the real canvas. It refits the viewport on resize and hands
//! the logical size to the simulation every frame.

use serde::{Deserialize, Serialize};

use crate::config::ScreenConfig;

/// Logical width/height of the visible play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Larger of width and height
    #[inline]
    pub fn max_side(&self) -> f32 {
        self.width.max(self.height)
    }

    /// Fit a window into the configured screen.
    ///
    /// The larger fixed dimension drives the scale; a fixed dimension of 0 is
    /// "flexible" and takes whatever the window provides at that scale.
    /// Returns the logical viewport and the window-to-logical scale.
    pub fn fit(screen: &ScreenConfig, window_width: f32, window_height: f32) -> (Self, f32) {
        let scale = if screen.width > screen.height {
            window_width / screen.width
        } else if screen.height > 0.0 {
            window_height / screen.height
        } else {
            1.0
        };
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };

        let width = if screen.width > 0.0 {
            screen.width
        } else {
            window_width / scale
        };
        let height = if screen.height > 0.0 {
            screen.height
        } else {
            window_height / scale
        };

        (Self { width, height }, scale)
    }
}
