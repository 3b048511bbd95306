//! Scene nodes and their recycling pool
//!
//! A `Sprite` is the minimal drawable the host mirrors: position, scale,
//! anchor, texture, visibility, alpha and angle. The simulation owns the
//! data; the renderer only reads it.
//!
//! `SpritePool` is a dense slot arena with a LIFO free-index stack. A slot is
//! either active or pooled, never both, and pooled slots are hidden and
//! parked at the origin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::platform::Texture;

/// Index of a slot inside one emitter's pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

impl SpriteId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A positioned, textured scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Local position (relative to the owning emitter)
    pub pos: Vec2,
    /// Signed scale; a negative x mirrors the sprite around its anchor
    pub scale: Vec2,
    /// Normalized pivot (0,0 = top-left, 0.5,0.5 = center)
    pub anchor: Vec2,
    pub texture: Option<Texture>,
    pub visible: bool,
    pub alpha: f32,
    /// Rotation in degrees (cosmetic, not part of the bounds)
    pub angle: f32,
    /// Obstacle halves only: already counted toward the score
    pub scored: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
            anchor: Vec2::ZERO,
            texture: None,
            visible: false,
            alpha: 1.0,
            angle: 0.0,
            scored: false,
        }
    }
}

impl Sprite {
    /// Unsigned on-screen size (texture size times |scale|)
    pub fn size(&self) -> Vec2 {
        self.texture
            .map(|t| t.size() * self.scale.abs())
            .unwrap_or(Vec2::ZERO)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size().x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size().y
    }

    /// Bounds in the emitter's local space (mirroring flips the box around x)
    pub fn local_bounds(&self) -> Rect {
        let signed = self
            .texture
            .map(|t| t.size() * self.scale)
            .unwrap_or(Vec2::ZERO);
        let origin = self.pos - self.anchor * signed;
        Rect::from_corners(origin, origin + signed)
    }

    /// Scale uniformly to `factor` of the texture size, keeping any mirroring
    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.scale = Vec2::new(factor * self.scale.x.signum(), factor * self.scale.y.signum());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot {
    sprite: Sprite,
    pooled: bool,
}

/// Slot arena with a LIFO free list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpritePool {
    slots: Vec<Slot>,
    free: Vec<SpriteId>,
}

impl SpritePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the most recently pooled slot, or allocate a new one.
    /// The returned sprite is reset to defaults (hidden, at the origin).
    pub fn acquire(&mut self) -> SpriteId {
        if let Some(id) = self.free.pop() {
            let slot = &mut self.slots[id.index()];
            slot.pooled = false;
            slot.sprite = Sprite::default();
            return id;
        }

        let id = SpriteId(self.slots.len() as u32);
        self.slots.push(Slot {
            sprite: Sprite::default(),
            pooled: false,
        });
        log::debug!("Sprite pool grew to {} slots", self.slots.len());
        id
    }

    /// Hide the sprite, park it at the origin and push it on the free list.
    /// Returns false (and does nothing) if it was already pooled.
    pub fn release(&mut self, id: SpriteId) -> bool {
        let slot = &mut self.slots[id.index()];
        if slot.pooled {
            return false;
        }
        slot.sprite.visible = false;
        slot.sprite.pos = Vec2::ZERO;
        slot.pooled = true;
        self.free.push(id);
        true
    }

    #[inline]
    pub fn get(&self, id: SpriteId) -> &Sprite {
        &self.slots[id.index()].sprite
    }

    #[inline]
    pub fn get_mut(&mut self, id: SpriteId) -> &mut Sprite {
        &mut self.slots[id.index()].sprite
    }

    pub fn is_pooled(&self, id: SpriteId) -> bool {
        self.slots[id.index()].pooled
    }

    /// Every slot id ever allocated, in allocation order
    pub fn ids(&self) -> impl Iterator<Item = SpriteId> + use<> {
        (0..self.slots.len() as u32).map(SpriteId)
    }

    /// Active (non-pooled) sprites
    pub fn active(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.pooled)
            .map(|(i, slot)| (SpriteId(i as u32), &slot.sprite))
    }

    /// Active sprites that are currently shown
    pub fn visible(&self) -> impl Iterator<Item = &Sprite> {
        self.active().map(|(_, s)| s).filter(|s| s.visible)
    }

    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    pub fn pooled(&self) -> usize {
        self.free.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
