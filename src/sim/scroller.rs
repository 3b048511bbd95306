//! Full-width tiling background layer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::emitter::Frame;
use super::geometry::Rect;
use crate::config::EmitterConfig;
use crate::platform::{Texture, TextureProvider, Viewport};

/// A texture repeated across the screen whose tile offset scrolls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scroller {
    texture: Option<Texture>,
    offset: Vec2,
    velocity: Vec2,
    /// Scroll position inside the texture, kept within one texture size
    tile: Vec2,
    width: f32,
    moving: bool,
}

impl Scroller {
    pub fn new(config: &EmitterConfig, textures: &dyn TextureProvider, viewport: &Viewport) -> Self {
        let texture = match config.texture.as_deref() {
            Some(name) => {
                let texture = textures.texture(name);
                if texture.is_none() {
                    log::warn!("Unknown scroller texture '{}'", name);
                }
                texture
            }
            None => {
                log::warn!("Scroller has no texture");
                None
            }
        };
        Self {
            texture,
            offset: config.offset(),
            velocity: config.velocity(),
            tile: Vec2::ZERO,
            width: viewport.width,
            moving: true,
        }
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn texture(&self) -> Option<Texture> {
        self.texture
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn tile_position(&self) -> Vec2 {
        self.tile
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.texture.map(|t| t.height).unwrap_or(0.0)
    }

    /// Screen-space area covered by the layer
    pub fn bounds(&self) -> Rect {
        Rect::new(self.offset.x, self.offset.y, self.width, self.height())
    }

    pub fn update(&mut self, frame: &Frame) {
        if self.moving {
            let size = self.texture.map(|t| t.size()).unwrap_or(Vec2::ZERO);
            self.tile += self.velocity * frame.elapsed;
            self.tile.x = wrap_tile(self.tile.x, size.x, self.velocity.x);
            self.tile.y = wrap_tile(self.tile.y, size.y, self.velocity.y);
        }
        self.width = frame.viewport.width;
    }
}

/// Pull the tile offset back by one texture size once it reaches a full
/// texture, so it never grows without bound
fn wrap_tile(tile: f32, size: f32, speed: f32) -> f32 {
    if size > 0.0 && speed != 0.0 && tile.abs() >= size {
        tile - size * speed.signum()
    } else {
        tile
    }
}
