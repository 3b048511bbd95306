//! The named set of background elements, obstacles included
//!
//! Built once from `GameConfig::background`. Each config entry's `type`
//! picks the constructor; the collection keeps a list of the collidable
//! ones for the player and knows where the floor is.

use std::collections::BTreeMap;

use glam::Vec2;

use super::emitter::{Frame, SceneryEmitter};
use super::events::{GameEvent, RngState};
use super::geometry::Rect;
use super::obstacles::ObstacleEmitter;
use super::particles::ParticleEmitter;
use super::scroller::Scroller;
use crate::config::{ElementKind, EmitterConfig, GameConfig};
use crate::platform::{TextureProvider, Viewport};

/// One constructed background element
#[derive(Debug, Clone)]
pub enum BackgroundElement {
    Scroller(Scroller),
    Scenery(SceneryEmitter),
    Obstacles(ObstacleEmitter),
    /// Idle until the host anchors it and switches it on
    Particles(ParticleEmitter),
}

impl BackgroundElement {
    /// Construct the variant named by `config.kind`
    pub fn build(
        config: &EmitterConfig,
        textures: &dyn TextureProvider,
        viewport: &Viewport,
        rng: RngState,
    ) -> Self {
        match config.kind {
            ElementKind::Scroller => Self::Scroller(Scroller::new(config, textures, viewport)),
            ElementKind::Sprites => {
                let mut emitter = SceneryEmitter::scenery(config, textures, rng.to_rng());
                emitter.pre_fill(viewport);
                Self::Scenery(emitter)
            }
            ElementKind::Obstacles => {
                Self::Obstacles(ObstacleEmitter::obstacles(config, textures, rng.to_rng()))
            }
            ElementKind::Particles => {
                Self::Particles(ParticleEmitter::particles(config, textures, rng.to_rng()))
            }
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Scroller(_) => ElementKind::Scroller,
            Self::Scenery(_) => ElementKind::Sprites,
            Self::Obstacles(_) => ElementKind::Obstacles,
            Self::Particles(_) => ElementKind::Particles,
        }
    }

    /// Scrollers are a single tile layer and cannot be hit
    pub fn can_collide(&self) -> bool {
        !matches!(self, Self::Scroller(_))
    }

    pub fn set_moving(&mut self, moving: bool) {
        match self {
            Self::Scroller(s) => s.set_moving(moving),
            Self::Scenery(e) => e.set_moving(moving),
            Self::Obstacles(e) => e.set_moving(moving),
            Self::Particles(e) => e.set_moving(moving),
        }
    }

    pub fn is_moving(&self) -> bool {
        match self {
            Self::Scroller(s) => s.is_moving(),
            Self::Scenery(e) => e.core().is_moving(),
            Self::Obstacles(e) => e.core().is_moving(),
            Self::Particles(e) => e.core().is_moving(),
        }
    }

    pub fn check_collision(&self, target: &Rect, margin: f32) -> bool {
        match self {
            Self::Scroller(_) => false,
            Self::Scenery(e) => e.check_collision(target, margin),
            Self::Obstacles(e) => e.check_collision(target, margin),
            Self::Particles(e) => e.check_collision(target, margin),
        }
    }

    pub fn update(&mut self, frame: &Frame, events: &mut Vec<GameEvent>) {
        match self {
            Self::Scroller(s) => s.update(frame),
            Self::Scenery(e) => e.update(frame, events),
            Self::Obstacles(e) => e.update(frame, events),
            Self::Particles(e) => e.update(frame, events),
        }
    }
}

/// All background elements keyed by name
#[derive(Debug, Clone)]
pub struct Background {
    elements: BTreeMap<String, BackgroundElement>,
    /// Names of the elements the player can hit, in name order
    collidable: Vec<String>,
    floor_y: Option<f32>,
    collision_margin: f32,
}

impl Background {
    /// Build every configured element. Element `i` (in name order) draws
    /// from RNG stream `i` of the seed. The collection starts frozen.
    pub fn new(config: &GameConfig, textures: &dyn TextureProvider, viewport: &Viewport, rng: RngState) -> Self {
        let mut elements = BTreeMap::new();
        let mut collidable = Vec::new();

        for (index, (name, element_config)) in config.background.iter().enumerate() {
            let element = BackgroundElement::build(
                element_config,
                textures,
                viewport,
                rng.with_stream(index as u64),
            );
            if element_config.collidable {
                if element.can_collide() {
                    collidable.push(name.clone());
                } else {
                    log::warn!("Background element '{}' is a scroller and cannot be collidable", name);
                }
            }
            log::debug!("Built background element '{}' ({:?})", name, element.kind());
            elements.insert(name.clone(), element);
        }

        let floor_y = config
            .background
            .get(&config.floor_element)
            .map(|floor| floor.position.y);
        if floor_y.is_none() {
            log::warn!(
                "No floor element '{}'; the player can never hit the floor",
                config.floor_element
            );
        }

        let mut background = Self {
            elements,
            collidable,
            floor_y,
            collision_margin: config.player.collision_margin,
        };
        background.set_moving(false);
        log::info!(
            "Background ready: {} elements, {} collidable",
            background.elements.len(),
            background.collidable.len()
        );
        background
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&BackgroundElement> {
        self.elements.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BackgroundElement> {
        self.elements.get_mut(name)
    }

    /// Every element, in name order
    pub fn elements(&self) -> impl Iterator<Item = (&str, &BackgroundElement)> {
        self.elements.iter().map(|(name, e)| (name.as_str(), e))
    }

    /// The elements the player collides with
    pub fn collidable(&self) -> impl Iterator<Item = (&str, &BackgroundElement)> {
        self.collidable
            .iter()
            .filter_map(|name| self.elements.get(name).map(|e| (name.as_str(), e)))
    }

    /// Name of the first collidable element hit by `target`, if any
    pub fn check_collision(&self, target: &Rect, margin: f32) -> Option<&str> {
        self.collidable()
            .find(|(_, e)| e.check_collision(target, margin))
            .map(|(name, _)| name)
    }

    /// y at which the player touches the floor
    pub fn floor_position(&self) -> f32 {
        self.floor_y
            .map(|y| y + self.collision_margin)
            .unwrap_or(f32::INFINITY)
    }

    pub fn set_moving(&mut self, moving: bool) {
        for element in self.elements.values_mut() {
            element.set_moving(moving);
        }
    }

    /// True when any element is moving
    pub fn is_moving(&self) -> bool {
        self.elements.values().any(|e| e.is_moving())
    }

    /// Clear every obstacle emitter for a new round
    pub fn remove_obstacles(&mut self) {
        for element in self.elements.values_mut() {
            if let BackgroundElement::Obstacles(e) = element {
                e.remove_obstacles();
            }
        }
    }

    /// Gap centers of every obstacle pair still on screen
    pub fn obstacle_gaps(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.elements
            .values()
            .filter_map(|element| match element {
                BackgroundElement::Obstacles(e) => Some(e.gap_centers()),
                _ => None,
            })
            .flatten()
    }

    pub fn update(&mut self, frame: &Frame, events: &mut Vec<GameEvent>) {
        for element in self.elements.values_mut() {
            element.update(frame, events);
        }
    }
}
