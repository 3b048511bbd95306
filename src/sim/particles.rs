//! Fading particle trails
//!
//! Particles spawn on a timer around an anchor (the player), drift with the
//! emitter velocity, spin, and fade out. A particle is recycled on the frame
//! its alpha reaches zero.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::emitter::{Emitter, EmitterBehavior, EmitterCore};
use super::events::GameEvent;
use super::geometry::Rect;
use super::sprite::SpriteId;
use crate::config::EmitterConfig;
use crate::consts::PARTICLE_SPIN_RATE;
use crate::platform::{TextureProvider, Viewport};
use crate::wrap_degrees;

/// Where new particles appear: at the anchor's x, spread over its height
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub pos: Vec2,
    pub height: f32,
}

impl Anchor {
    pub fn from_bounds(bounds: &Rect) -> Self {
        Self {
            pos: bounds.min + bounds.size / 2.0,
            height: bounds.size.y,
        }
    }
}

/// Particle policy state
#[derive(Debug, Clone)]
pub struct Particles {
    anchor: Anchor,
    scale: f32,
    /// Emission interval
    interval: f32,
    /// Time banked toward the next emission
    banked: f32,
    /// Alpha lost per elapsed unit
    alpha_step: f32,
    max_particles: usize,
}

impl Particles {
    pub fn new(config: &EmitterConfig) -> Self {
        let alpha_step = if config.steps > 0 {
            1.0 / config.steps as f32
        } else {
            0.0
        };
        Self {
            anchor: Anchor::default(),
            scale: config.scale(),
            interval: config.time,
            banked: 0.0,
            alpha_step,
            max_particles: config.max_particles,
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn alpha_step(&self) -> f32 {
        self.alpha_step
    }
}

impl EmitterBehavior for Particles {
    /// Timer-driven: one interval is consumed whenever enough time has
    /// banked, even if the cap then blocks the emission. The cap counts
    /// every live sprite in the pool, however it was spawned.
    fn should_emit(&mut self, core: &EmitterCore, _viewport: &Viewport) -> bool {
        let time_passed = self.banked >= self.interval;
        if time_passed {
            self.banked -= self.interval;
        }
        time_passed && core.pool().active_count() < self.max_particles
    }

    fn emit(&mut self, core: &mut EmitterCore, _viewport: &Viewport) -> SpriteId {
        let id = core.spawn_one();
        let spread = core.rng.random::<f32>();
        let angle = core.rng.random::<f32>() * 360.0;
        let anchor = self.anchor;

        let sprite = core.sprite_mut(id);
        sprite.anchor = Vec2::splat(0.5);
        sprite.visible = true;
        sprite.alpha = 1.0;
        sprite.set_uniform_scale(self.scale);
        sprite.pos = Vec2::new(
            anchor.pos.x,
            anchor.pos.y + anchor.height / 2.0 - spread * anchor.height,
        );
        sprite.angle = wrap_degrees(angle);
        id
    }

    fn should_remove(&self, core: &EmitterCore, id: SpriteId) -> bool {
        let sprite = core.sprite(id);
        sprite.visible && sprite.alpha <= 0.0
    }

    fn child_update(
        &mut self,
        core: &mut EmitterCore,
        id: SpriteId,
        elapsed: f32,
        _events: &mut Vec<GameEvent>,
    ) {
        core.advance(id, elapsed);
        let sprite = core.sprite_mut(id);
        sprite.alpha -= self.alpha_step * elapsed;
        sprite.angle = wrap_degrees(sprite.angle + PARTICLE_SPIN_RATE * elapsed);
    }

    fn after_update(&mut self, elapsed: f32) {
        self.banked += elapsed;
    }
}

pub type ParticleEmitter = Emitter<Particles>;

impl ParticleEmitter {
    /// Particle emitters start idle; the owner switches them on
    pub fn particles(config: &EmitterConfig, textures: &dyn TextureProvider, rng: Pcg32) -> Self {
        let mut core = EmitterCore::new(config, textures, rng);
        core.set_emitting(false);
        Self::with_behavior(core, Particles::new(config))
    }

    /// Move the spawn anchor (call before `update`)
    pub fn follow(&mut self, anchor: Anchor) {
        self.behavior_mut().anchor = anchor;
    }

    pub fn particle_count(&self) -> usize {
        self.core().pool().active_count()
    }
}
