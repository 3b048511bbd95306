//! Round flow and the per-frame tick
//!
//! `Game` wires the background, player, countdown and scoreboard together
//! and turns their signals into host-facing `GameEvent`s.

use serde::{Deserialize, Serialize};

use super::background::Background;
use super::countdown::Countdown;
use super::emitter::Frame;
use super::events::{GameEvent, RngState, SoundEffect};
use super::player::Player;
use crate::config::GameConfig;
use crate::platform::{TextureProvider, Viewport};
use crate::scoreboard::Scoreboard;

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Play button shown (also after a round ends)
    StartScreen,
    /// Counting down to the round start
    Countdown,
    /// Round in progress
    Playing,
}

/// Input gathered since the last tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Play button pressed
    pub button_tapped: bool,
    /// Screen pressed anywhere
    pub screen_tapped: bool,
}

/// One play session
#[derive(Debug, Clone)]
pub struct Game {
    pub phase: GamePhase,
    pub background: Background,
    pub player: Player,
    pub countdown: Countdown,
    pub scoreboard: Scoreboard,
    pub viewport: Viewport,
    pub seed: u64,
    /// Frames simulated so far
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: &GameConfig, textures: &dyn TextureProvider, viewport: Viewport, seed: u64) -> Self {
        let rng = RngState::new(seed);
        let background = Background::new(config, textures, &viewport, rng);
        let player = Player::new(&config.player, textures, &viewport, rng);
        log::info!("Game created with seed {}", seed);
        Self {
            phase: GamePhase::StartScreen,
            background,
            player,
            countdown: Countdown::new(&config.countdown),
            scoreboard: Scoreboard::new(),
            viewport,
            seed,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Play button. Starts the countdown for a new round; ignored unless the
    /// start screen is showing.
    pub fn on_button_tapped(&mut self) -> bool {
        if self.phase != GamePhase::StartScreen {
            return false;
        }
        self.events.push(GameEvent::Sound(SoundEffect::Button));
        self.events.push(GameEvent::MusicStarted);
        self.background.remove_obstacles();
        self.background.set_moving(true);
        self.player.reset_position(&self.viewport);
        log::info!("Round starting, best score {}", self.scoreboard.best());

        // The first value may already start the round
        self.phase = GamePhase::Countdown;
        let first = self.countdown.start();
        self.on_count_down(first);
        true
    }

    /// Anywhere on screen: flap if the player is falling
    pub fn on_screen_tapped(&mut self) -> bool {
        self.player.on_screen_tapped(&mut self.events)
    }

    fn on_count_down(&mut self, value: i32) {
        self.events.push(GameEvent::CountDown(value));
        if value > 0 {
            self.events.push(GameEvent::Sound(SoundEffect::Countdown));
        } else if value == 0 {
            self.events.push(GameEvent::Sound(SoundEffect::Go));
        } else {
            self.scoreboard.reset();
            self.events.push(GameEvent::Scored(0));
            self.player.on_game_started();
            self.phase = GamePhase::Playing;
            log::info!("Round started");
        }
    }

    /// Obstacles keep flowing past a crashed player, so nothing scores on the
    /// start screen
    fn on_obstacle_passed(&mut self) {
        if self.phase == GamePhase::StartScreen {
            return;
        }
        let score = self.scoreboard.increment();
        self.events.push(GameEvent::Sound(SoundEffect::Score));
        self.events.push(GameEvent::Scored(score));
    }

    fn on_game_ended(&mut self) {
        self.phase = GamePhase::StartScreen;
        self.background.set_moving(false);
        let (score, best) = (self.scoreboard.score(), self.scoreboard.best());
        self.events.push(GameEvent::GameOver { score, best });
        log::info!("Game over: score {}, best {}", score, best);
    }

    /// Advance one frame: countdown, then background, then player
    pub fn update(&mut self, frame: &Frame) {
        self.viewport = frame.viewport;
        self.time_ticks += 1;

        if self.phase == GamePhase::Countdown {
            if let Some(value) = self.countdown.update(frame.elapsed) {
                self.on_count_down(value);
            }
        }

        let first_new = self.events.len();
        self.background.update(frame, &mut self.events);
        self.player.update(frame, &self.background, &mut self.events);

        let signals: Vec<GameEvent> = self.events[first_new..]
            .iter()
            .copied()
            .filter(|e| matches!(e, GameEvent::ObstaclePassed | GameEvent::PlayerCrashed))
            .collect();
        for signal in signals {
            match signal {
                GameEvent::ObstaclePassed => self.on_obstacle_passed(),
                GameEvent::PlayerCrashed => self.on_game_ended(),
                _ => {}
            }
        }
    }
}

/// Apply one frame of input, then advance the game
pub fn tick(game: &mut Game, input: &TickInput, frame: &Frame) {
    if input.button_tapped {
        game.on_button_tapped();
    }
    if input.screen_tapped {
        game.on_screen_tapped();
    }
    game.update(frame);
}
