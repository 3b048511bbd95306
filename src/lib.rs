//! Pixie Dash - runtime core of a side-scrolling avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (emitters, obstacles, particles, player FSM, round flow)
//! - `platform`: Host-facing abstractions (viewport, texture lookup)
//! - `config`: Data-driven element and player tuning
//! - `scoreboard`: Current and best score bookkeeping

pub mod config;
pub mod platform;
pub mod scoreboard;
pub mod sim;

pub use config::{EmitterConfig, ElementKind, GameConfig, PlayerConfig};
pub use platform::{Texture, TextureAtlas, TextureProvider, Viewport};
pub use scoreboard::Scoreboard;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the `elapsed` unit is calibrated against (1.0 == one 60 Hz frame)
    pub const FRAMES_PER_SECOND: f32 = 60.0;

    /// Particle spin rate (degrees per elapsed unit)
    pub const PARTICLE_SPIN_RATE: f32 = 2.5;

    /// Default horizontal speed for emitters and scrollers with no `speed.x`
    pub const DEFAULT_SPEED_X: f32 = -1.0;

    /// Default countdown start value
    pub const COUNTDOWN_START: i32 = 3;
    /// Default countdown step (one second of frames)
    pub const COUNTDOWN_STEP: f32 = FRAMES_PER_SECOND;

    /// Stream ids for the player's particle emitters (background uses 0..n)
    pub const STARS_STREAM: u64 = 1000;
    pub const SMOKE_STREAM: u64 = 1001;
}

/// Wrap an angle in degrees into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
