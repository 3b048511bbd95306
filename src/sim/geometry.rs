//! Axis-aligned rectangles
//!
//! All bounds in the simulation are screen-space boxes with y growing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Box centered on a point
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    /// Box spanning two arbitrary corners (order does not matter)
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        Self {
            min,
            size: a.max(b) - min,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            size: self.size,
        }
    }

    /// Half-open point test: left/top edges are inside, right/bottom are not.
    /// Empty boxes contain nothing.
    pub fn contains(&self, p: Vec2) -> bool {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return false;
        }
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// The four corners, each moved `margin` toward the center
    pub fn inset_corners(&self, margin: f32) -> [Vec2; 4] {
        let (l, t) = (self.left() + margin, self.top() + margin);
        let (r, b) = (self.right() - margin, self.bottom() - margin);
        [
            Vec2::new(l, t),
            Vec2::new(r, t),
            Vec2::new(l, b),
            Vec2::new(r, b),
        ]
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(self.min.min(other.min), self.max().max(other.max()))
    }
}
