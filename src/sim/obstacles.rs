//! Paired obstacles
//!
//! Each spawn produces a top and a bottom column sharing one x and one
//! texture, separated by a fixed gap whose vertical position is randomized.
//! Only the top half starts unscored, so a pair scores exactly once when it
//! crosses the score line.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::emitter::{Emitter, EmitterBehavior, EmitterCore};
use super::events::GameEvent;
use super::sprite::{Sprite, SpriteId};
use crate::config::EmitterConfig;
use crate::platform::{TextureProvider, Viewport};

/// Obstacle policy state
#[derive(Debug, Clone)]
pub struct Obstacles {
    /// Top half of the most recent pair, for chained spacing
    last_top: Option<SpriteId>,
    gap: f32,
    /// Half the column height
    max_displacement: f32,
    /// Top column y before displacement
    top_origin: f32,
    score_x: f32,
}

impl Obstacles {
    /// Derive the layout from the first texture of the emitter
    pub fn new(config: &EmitterConfig, core: &EmitterCore) -> Self {
        let height = core.textures().first().map(|t| t.height).unwrap_or(0.0);
        Self {
            last_top: None,
            gap: config.gap,
            max_displacement: height / 2.0,
            top_origin: -height + config.gap / 2.0,
            score_x: config.score_x,
        }
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn max_displacement(&self) -> f32 {
        self.max_displacement
    }

    pub fn score_x(&self) -> f32 {
        self.score_x
    }

    /// Top half of the last pair, if it is still on screen
    pub fn last_top(&self, core: &EmitterCore) -> Option<SpriteId> {
        self.last_top.filter(|&id| !core.pool().is_pooled(id))
    }

    /// Top halves never sit below the largest displacement; bottom halves
    /// always start a full column plus the gap lower
    pub fn is_top(&self, sprite: &Sprite) -> bool {
        sprite.pos.y <= self.top_origin + self.max_displacement
    }
}

impl EmitterBehavior for Obstacles {
    fn emit(&mut self, core: &mut EmitterCore, viewport: &Viewport) -> SpriteId {
        let texture = core.textures().first().copied();
        let width = texture.map(|t| t.width).unwrap_or(0.0);
        let height = texture.map(|t| t.height).unwrap_or(0.0);

        let origin = match self.last_top(core) {
            Some(id) => core.sprite(id).pos.x,
            None => viewport.max_side() + width,
        };
        let x = origin + width + core.min_spacing();
        let displacement = (core.rng.random::<f32>() * self.max_displacement).floor();
        let top_y = self.top_origin + displacement;

        let top = core.pool.acquire();
        let bottom = core.pool.acquire();
        {
            let sprite = core.sprite_mut(top);
            sprite.texture = texture;
            sprite.visible = true;
            sprite.pos = Vec2::new(x, top_y);
            sprite.scored = false;
        }
        {
            let sprite = core.sprite_mut(bottom);
            sprite.texture = texture;
            sprite.visible = true;
            sprite.pos = Vec2::new(x, top_y + height + self.gap);
            // The top half carries the score for the pair
            sprite.scored = true;
        }

        self.last_top = Some(top);
        top
    }

    fn child_update(
        &mut self,
        core: &mut EmitterCore,
        id: SpriteId,
        elapsed: f32,
        events: &mut Vec<GameEvent>,
    ) {
        core.advance(id, elapsed);
        let score_x = self.score_x;
        let sprite = core.sprite_mut(id);
        if sprite.visible && !sprite.scored && sprite.pos.x <= score_x {
            sprite.scored = true;
            events.push(GameEvent::ObstaclePassed);
        }
    }
}

pub type ObstacleEmitter = Emitter<Obstacles>;

impl ObstacleEmitter {
    pub fn obstacles(config: &EmitterConfig, textures: &dyn TextureProvider, rng: Pcg32) -> Self {
        let core = EmitterCore::new(config, textures, rng);
        let behavior = Obstacles::new(config, &core);
        Self::with_behavior(core, behavior)
    }

    /// Recycle every pair immediately and forget the chain, so the next pair
    /// spawns at the first-spawn position
    pub fn remove_obstacles(&mut self) {
        let core = self.core_mut();
        let removed = core.pool().ids().filter(|&id| core.recycle(id)).count();
        self.behavior_mut().last_top = None;
        log::debug!("Removed {} obstacle sprites", removed);
    }

    /// Screen-space center of the gap of every pair still on screen
    pub fn gap_centers(&self) -> impl Iterator<Item = Vec2> + '_ {
        let core = self.core();
        let obstacles = self.behavior();
        core.pool()
            .active()
            .filter(move |(_, s)| s.visible && obstacles.is_top(s))
            .map(move |(_, s)| {
                core.offset()
                    + Vec2::new(
                        s.pos.x + s.width() / 2.0,
                        s.pos.y + s.height() + obstacles.gap / 2.0,
                    )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ElementKind, SpeedConfig, Spacing};
    use crate::platform::texture::stock_atlas;
    use crate::sim::emitter::Frame;
    use crate::sim::events::RngState;
    use proptest::prelude::*;

    fn config() -> EmitterConfig {
        EmitterConfig {
            kind: ElementKind::Obstacles,
            collidable: true,
            textures: vec!["column.png".to_string()],
            speed: SpeedConfig {
                x: Some(-2.75),
                y: None,
            },
            spacing: Some(Spacing::Fixed(300.0)),
            gap: 200.0,
            score_x: 0.0,
            ..Default::default()
        }
    }

    fn emitter(seed: u64) -> ObstacleEmitter {
        ObstacleEmitter::obstacles(&config(), &stock_atlas(), RngState::new(seed).to_rng())
    }

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    /// The other active half sharing `top`'s x
    fn partner(core: &EmitterCore, top: SpriteId) -> SpriteId {
        let x = core.sprite(top).pos.x;
        core.pool()
            .active()
            .find(|&(id, s)| id != top && s.pos.x == x)
            .map(|(id, _)| id)
            .unwrap()
    }

    #[test]
    fn test_layout_from_texture() {
        let e = emitter(1);
        // column.png is 300px tall
        assert_eq!(e.behavior().max_displacement(), 150.0);
        assert_eq!(e.behavior().gap(), 200.0);
        assert_eq!(e.behavior().score_x(), 0.0);
    }

    #[test]
    fn test_pair_gap_is_exact() {
        for seed in 0..50 {
            let mut e = emitter(seed);
            let top = e.spawn_one(&viewport());
            let bottom = partner(e.core(), top);
            let top_y = e.core().sprite(top).pos.y;
            let bottom_y = e.core().sprite(bottom).pos.y;
            assert_eq!(bottom_y - top_y, 300.0 + 200.0);
            assert!((-200.0..-50.0).contains(&top_y));
            assert_eq!(e.core().sprite(top).texture, e.core().sprite(bottom).texture);
        }
    }

    #[test]
    fn test_first_pair_placement() {
        let mut e = emitter(3);
        let top = e.spawn_one(&viewport());
        // max side 1280 + width 100, then + width + spacing
        assert_eq!(e.core().sprite(top).pos.x, 1280.0 + 100.0 + 100.0 + 300.0);
    }

    #[test]
    fn test_only_top_half_is_unscored() {
        let mut e = emitter(3);
        let top = e.spawn_one(&viewport());
        let bottom = partner(e.core(), top);
        assert!(!e.core().sprite(top).scored);
        assert!(e.core().sprite(bottom).scored);
    }

    #[test]
    fn test_consecutive_pairs_are_spaced() {
        let mut e = emitter(11);
        let mut last_x = None;
        for _ in 0..10 {
            let top = e.spawn_one(&viewport());
            let x = e.core().sprite(top).pos.x;
            if let Some(prev) = last_x {
                assert!(x - prev >= 100.0 + 300.0);
            }
            last_x = Some(x);
        }
    }

    #[test]
    fn test_gap_centers() {
        let mut e = emitter(4);
        let top = e.spawn_one(&viewport());
        let sprite = e.core().sprite(top).clone();
        let centers: Vec<Vec2> = e.gap_centers().collect();
        assert_eq!(
            centers,
            vec![Vec2::new(sprite.pos.x + 50.0, sprite.pos.y + 300.0 + 100.0)]
        );
        assert!(e.behavior().is_top(&sprite));
        let bottom = partner(e.core(), top);
        assert!(!e.behavior().is_top(e.core().sprite(bottom)));
    }

    #[test]
    fn test_remove_obstacles_resets_chain() {
        let mut e = emitter(5);
        for _ in 0..4 {
            e.spawn_one(&viewport());
        }
        assert_eq!(e.core().pool().active_count(), 8);

        e.remove_obstacles();
        let pool = e.core().pool();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.pooled(), 8);
        assert_eq!(e.core().active_width(), 0.0);

        let top = e.spawn_one(&viewport());
        assert_eq!(e.core().sprite(top).pos.x, 1780.0);
        assert_eq!(e.core().pool().allocated(), 8);
    }

    #[test]
    fn test_remove_obstacles_twice_does_not_duplicate() {
        let mut e = emitter(5);
        e.spawn_one(&viewport());
        e.remove_obstacles();
        e.remove_obstacles();
        assert_eq!(e.core().pool().pooled(), 2);
    }

    #[test]
    fn test_fills_stream_over_frames() {
        let mut e = emitter(8);
        e.set_moving(false);
        let mut events = Vec::new();
        for _ in 0..50 {
            e.update(&Frame::new(1.0, viewport()), &mut events);
        }
        // Stops once the pairs span more than twice the max side
        assert!(e.core().active_width() > 2560.0);
        let spawned = e.core().pool().allocated();
        e.update(&Frame::new(1.0, viewport()), &mut events);
        assert_eq!(e.core().pool().allocated(), spawned);
        assert!(events.is_empty());
    }

    fn count_scores(elapsed: f32) -> usize {
        let mut e = emitter(21);
        e.spawn_one(&viewport());
        e.set_emitting(false);
        let mut events = Vec::new();
        // 1780px at 2.75 per unit, plus time to leave the screen
        let mut time = 0.0;
        while time < 1000.0 {
            e.update(&Frame::new(elapsed, viewport()), &mut events);
            time += elapsed;
        }
        events
            .iter()
            .filter(|&&ev| ev == GameEvent::ObstaclePassed)
            .count()
    }

    #[test]
    fn test_single_score_per_pair_regardless_of_frame_rate() {
        assert_eq!(count_scores(1.0), 1);
        assert_eq!(count_scores(100.0), 1);
    }

    #[test]
    fn test_pair_is_recycled_after_leaving() {
        let mut e = emitter(21);
        e.spawn_one(&viewport());
        e.set_emitting(false);
        let mut events = Vec::new();
        for _ in 0..1000 {
            e.update(&Frame::new(1.0, viewport()), &mut events);
        }
        assert_eq!(e.core().pool().active_count(), 0);
        assert!(e.behavior().last_top(e.core()).is_none());
    }

    proptest! {
        #[test]
        fn prop_one_score_per_pair(elapsed in 0.25f32..150.0) {
            prop_assert_eq!(count_scores(elapsed), 1);
        }

        #[test]
        fn prop_pairs_keep_their_gap(seed in any::<u64>(), frames in 1usize..300) {
            let mut e = emitter(seed);
            let mut events = Vec::new();
            for _ in 0..frames {
                e.update(&Frame::new(3.0, viewport()), &mut events);
            }
            let core = e.core();
            // Top halves sit above the screen edge, bottom halves below it
            for (id, top) in core.pool().active().filter(|(_, s)| s.pos.y < 0.0) {
                let bottom = core.sprite(partner(core, id));
                prop_assert_eq!(bottom.pos.y - top.pos.y, 500.0);
            }
            prop_assert_eq!(core.pool().active_count() % 2, 0);
        }
    }
}
