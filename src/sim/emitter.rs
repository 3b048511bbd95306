//! Pooled sprite emitter
//!
//! An emitter keeps a horizontal stream of sprites moving across the screen.
//! Every frame it advances each visible child, recycles the ones that are
//! done, and spawns at most one new child when its emit policy says so.
//!
//! The engine (`EmitterCore`) is shared; the policy hooks live in an
//! `EmitterBehavior`. `Scenery` keeps every default, `Obstacles` and
//! `Particles` override the hooks they need and carry their own state.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::corner_hit;
use super::events::GameEvent;
use super::geometry::Rect;
use super::sprite::{Sprite, SpriteId, SpritePool};
use crate::config::EmitterConfig;
use crate::platform::{Texture, TextureProvider, Viewport};

/// Per-frame inputs shared by every element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Frame delta (1.0 == one 60 Hz frame)
    pub elapsed: f32,
    pub viewport: Viewport,
}

impl Frame {
    pub fn new(elapsed: f32, viewport: Viewport) -> Self {
        Self { elapsed, viewport }
    }
}

/// Shared spawn/move/recycle engine
#[derive(Debug, Clone)]
pub struct EmitterCore {
    pub(crate) pool: SpritePool,
    textures: Vec<Texture>,
    velocity: Vec2,
    min_spacing: f32,
    spacing_range: f32,
    random_flip: bool,
    /// Position of the emitter; children are relative to it
    offset: Vec2,
    emitting: bool,
    moving: bool,
    pub(crate) rng: Pcg32,
}

impl EmitterCore {
    pub fn new(config: &EmitterConfig, textures: &dyn TextureProvider, rng: Pcg32) -> Self {
        let resolved = textures.resolve_all(&config.textures);
        if resolved.is_empty() {
            log::warn!("Emitter has no usable textures; it will spawn empty sprites");
        }
        let (min_spacing, spacing_range) = config.spacing_bounds();
        Self {
            pool: SpritePool::new(),
            textures: resolved,
            velocity: config.velocity(),
            min_spacing,
            spacing_range,
            random_flip: config.random_flip(),
            offset: config.offset(),
            emitting: true,
            moving: true,
            rng,
        }
    }

    pub fn set_emitting(&mut self, emitting: bool) {
        self.emitting = emitting;
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn min_spacing(&self) -> f32 {
        self.min_spacing
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn pool(&self) -> &SpritePool {
        &self.pool
    }

    pub fn sprite(&self, id: SpriteId) -> &Sprite {
        self.pool.get(id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> &mut Sprite {
        self.pool.get_mut(id)
    }

    /// Visible children, for the renderer
    pub fn visible_sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.pool.visible()
    }

    /// Width/height spanned by the visible children (zero when none)
    pub fn extent(&self) -> Vec2 {
        self.pool
            .visible()
            .map(|s| s.local_bounds())
            .reduce(|a, b| a.union(&b))
            .map(|r| r.size)
            .unwrap_or(Vec2::ZERO)
    }

    #[inline]
    pub fn active_width(&self) -> f32 {
        self.extent().x
    }

    /// Default emit policy: keep spawning until the stream covers twice the
    /// larger viewport side
    pub fn needs_fill(&self, viewport: &Viewport) -> bool {
        self.active_width() <= viewport.max_side() * 2.0
    }

    /// Uniformly random texture from the configured set
    pub fn random_texture(&mut self) -> Option<Texture> {
        if self.textures.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.textures.len());
        Some(self.textures[index])
    }

    /// Spacing in [min, min + range), floored to whole units
    pub fn random_spacing(&mut self) -> f32 {
        self.min_spacing + (self.rng.random::<f32>() * self.spacing_range).floor()
    }

    /// Default spawn: next free sprite, random texture and spacing, optional
    /// mirror, placed after the current stream
    pub fn spawn_one(&mut self) -> SpriteId {
        let width = self.active_width();
        let texture = self.random_texture();
        let spacing = self.random_spacing();
        let flip = self.random_flip && self.rng.random_bool(0.5);

        let id = self.pool.acquire();
        let sprite = self.pool.get_mut(id);
        sprite.texture = texture;
        if flip {
            sprite.scale.x = -1.0;
        }
        sprite.visible = true;
        sprite.pos = Vec2::new(width + spacing, 0.0);
        id
    }

    /// Default motion: integrate velocity while moving
    pub fn advance(&mut self, id: SpriteId, elapsed: f32) {
        if self.moving {
            let velocity = self.velocity;
            self.pool.get_mut(id).pos += velocity * elapsed;
        }
    }

    /// Default removal policy: the child has left the screen on the side it
    /// is travelling toward.
    ///
    /// Leftward/upward children go at `-2 * size`. Rightward/downward ones are
    /// measured against the stream's current extent, which grows as new
    /// children spawn.
    pub fn is_offscreen(&self, id: SpriteId) -> bool {
        let sprite = self.pool.get(id);
        let size = sprite.size();
        let v = self.velocity;

        if (v.x < 0.0 && sprite.pos.x < -size.x * 2.0) || (v.y < 0.0 && sprite.pos.y < -size.y * 2.0) {
            return true;
        }
        if v.x > 0.0 || v.y > 0.0 {
            let extent = self.extent();
            return (v.x > 0.0 && sprite.pos.x > extent.x + size.x)
                || (v.y > 0.0 && sprite.pos.y > extent.y + size.y);
        }
        false
    }

    /// Hide the child and return it to the pool
    pub fn recycle(&mut self, id: SpriteId) -> bool {
        self.pool.release(id)
    }

    /// Screen-space bounds of a child
    pub fn world_bounds(&self, id: SpriteId) -> Rect {
        self.pool.get(id).local_bounds().translate(self.offset)
    }

    /// Inset-corner test of `target` against every visible child
    pub fn check_collision(&self, target: &Rect, margin: f32) -> bool {
        self.pool
            .visible()
            .any(|s| corner_hit(target, margin, &s.local_bounds().translate(self.offset)))
    }
}

/// Policy hooks an emitter variant can override
pub trait EmitterBehavior {
    fn should_emit(&mut self, core: &EmitterCore, viewport: &Viewport) -> bool {
        core.needs_fill(viewport)
    }

    /// Spawn one unit (a sprite, or a group of sprites) and return the
    /// primary sprite
    fn emit(&mut self, core: &mut EmitterCore, _viewport: &Viewport) -> SpriteId {
        core.spawn_one()
    }

    fn should_remove(&self, core: &EmitterCore, id: SpriteId) -> bool {
        core.is_offscreen(id)
    }

    fn on_remove(&mut self, core: &mut EmitterCore, id: SpriteId) {
        core.recycle(id);
    }

    fn child_update(
        &mut self,
        core: &mut EmitterCore,
        id: SpriteId,
        elapsed: f32,
        _events: &mut Vec<GameEvent>,
    ) {
        core.advance(id, elapsed);
    }

    /// Runs once per update after children and emission
    fn after_update(&mut self, _elapsed: f32) {}
}

/// Plain decorative stream (trees, flowers)
#[derive(Debug, Clone, Copy, Default)]
pub struct Scenery;

impl EmitterBehavior for Scenery {}

/// Engine plus policy
#[derive(Debug, Clone)]
pub struct Emitter<B> {
    core: EmitterCore,
    behavior: B,
}

pub type SceneryEmitter = Emitter<Scenery>;

impl SceneryEmitter {
    pub fn scenery(config: &EmitterConfig, textures: &dyn TextureProvider, rng: Pcg32) -> Self {
        Self::with_behavior(EmitterCore::new(config, textures, rng), Scenery)
    }
}

impl<B: EmitterBehavior> Emitter<B> {
    pub fn with_behavior(core: EmitterCore, behavior: B) -> Self {
        Self { core, behavior }
    }

    pub fn core(&self) -> &EmitterCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EmitterCore {
        &mut self.core
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    pub fn set_emitting(&mut self, emitting: bool) {
        self.core.set_emitting(emitting);
    }

    pub fn set_moving(&mut self, moving: bool) {
        self.core.set_moving(moving);
    }

    pub fn should_emit(&mut self, viewport: &Viewport) -> bool {
        self.behavior.should_emit(&self.core, viewport)
    }

    /// Spawn one unit regardless of policy
    pub fn spawn_one(&mut self, viewport: &Viewport) -> SpriteId {
        self.behavior.emit(&mut self.core, viewport)
    }

    /// Spawn until the emit policy is satisfied, so play starts with a full
    /// screen. Stops early on a zero-width spawn, which would never fill.
    pub fn pre_fill(&mut self, viewport: &Viewport) {
        let mut spawned = 0usize;
        while self.behavior.should_emit(&self.core, viewport) {
            let id = self.behavior.emit(&mut self.core, viewport);
            spawned += 1;
            if self.core.sprite(id).width() <= 0.0 {
                log::warn!("Pre-fill spawned a zero-width sprite; stopping after {}", spawned);
                break;
            }
        }
        log::debug!(
            "Pre-filled {} sprites, extent {:.0}",
            spawned,
            self.core.active_width()
        );
    }

    pub fn check_collision(&self, target: &Rect, margin: f32) -> bool {
        self.core.check_collision(target, margin)
    }

    /// Move, recycle, then spawn at most once
    pub fn update(&mut self, frame: &Frame, events: &mut Vec<GameEvent>) {
        let Self { core, behavior } = self;

        for id in core.pool.ids() {
            if !core.pool.get(id).visible {
                continue;
            }
            behavior.child_update(core, id, frame.elapsed, events);
            if behavior.should_remove(core, id) {
                behavior.on_remove(core, id);
            }
        }

        if core.emitting && behavior.should_emit(core, &frame.viewport) {
            behavior.emit(core, &frame.viewport);
        }

        behavior.after_update(frame.elapsed);
    }
}
