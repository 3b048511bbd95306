//! Events raised by the simulation and the seeded RNG streams behind it
//!
//! The host drains `GameEvent`s after each tick and turns them into sound,
//! UI and persistence side effects. Nothing the host does with them flows
//! back into the simulation.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Sound cues the host should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Flap on tap
    Fly,
    /// Obstacle passed
    Score,
    /// Play button pressed
    Button,
    /// Player hit an obstacle
    Hit,
    /// Player hit the floor
    Crash,
    /// Countdown tick
    Countdown,
    /// Countdown reached zero
    Go,
}

impl SoundEffect {
    /// Asset key the host's loader registers the sound under
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Fly => "fly",
            SoundEffect::Score => "score",
            SoundEffect::Button => "button",
            SoundEffect::Hit => "hit",
            SoundEffect::Crash => "crash",
            SoundEffect::Countdown => "countdown",
            SoundEffect::Go => "go",
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An obstacle pair crossed its score line
    ObstaclePassed,
    /// The player finished crashing and came to rest
    PlayerCrashed,
    /// Play a sound effect
    Sound(SoundEffect),
    /// Start the looping music track
    MusicStarted,
    /// Countdown step: n > 0 is a number, 0 is "GO", -1 hides the countdown
    CountDown(i32),
    /// Score changed to the given value
    Scored(u32),
    /// Round over
    GameOver { score: u32, best: u32 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Same seed, independent sequence
    pub fn with_stream(self, stream: u64) -> Self {
        Self { stream, ..self }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}
