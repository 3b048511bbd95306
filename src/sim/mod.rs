//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `elapsed` passed to `update`
//! - Seeded RNG only (one stream per emitter)
//! - Stable iteration order (elements by name, sprites by slot)
//! - No rendering or platform dependencies; side effects leave as `GameEvent`s

pub mod background;
pub mod collision;
pub mod countdown;
pub mod emitter;
pub mod events;
pub mod geometry;
pub mod obstacles;
pub mod particles;
pub mod player;
pub mod scroller;
pub mod session;
pub mod sprite;

pub use background::{Background, BackgroundElement};
pub use collision::corner_hit;
pub use countdown::Countdown;
pub use emitter::{Emitter, EmitterBehavior, EmitterCore, Frame, Scenery, SceneryEmitter};
pub use events::{GameEvent, RngState, SoundEffect};
pub use geometry::Rect;
pub use obstacles::{ObstacleEmitter, Obstacles};
pub use particles::{Anchor, ParticleEmitter, Particles};
pub use player::{Player, PlayerState};
pub use scroller::Scroller;
pub use session::{Game, GamePhase, TickInput, tick};
pub use sprite::{Sprite, SpriteId, SpritePool};
