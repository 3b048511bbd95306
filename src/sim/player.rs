//! Player physics state machine
//!
//! ```text
//! Entering --game started--> Falling <--same tick-- Flying
//!    |                        |   \--tap--------------^ |
//!    |                        v                         |
//!    +--floor-------------> Crashing <--floor / hit-----+
//!                             |
//!                             v
//!                          Crashed
//! ```
//!
//! The player reads the background (floor height, collidable elements) but
//! never mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::background::Background;
use super::emitter::Frame;
use super::events::{GameEvent, RngState, SoundEffect};
use super::geometry::Rect;
use super::particles::{Anchor, ParticleEmitter};
use crate::config::PlayerConfig;
use crate::consts::{SMOKE_STREAM, STARS_STREAM};
use crate::platform::{TextureProvider, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Gliding in from the left edge before the round starts
    Entering,
    /// Under gravity, taps flap
    Falling,
    /// Flap impulse, resolved back to Falling within the same update
    Flying,
    /// Hit something, tumbling to rest on the floor
    Crashing,
    /// At rest; the round is over
    Crashed,
}

impl PlayerState {
    /// Edges of the state graph (reset back to `Entering` is not a transition)
    pub fn can_transition_to(self, next: PlayerState) -> bool {
        use PlayerState::*;
        matches!(
            (self, next),
            (Entering, Falling)
                | (Falling, Flying)
                | (Flying, Falling)
                | (Entering | Falling | Flying, Crashing)
                | (Crashing, Crashed)
        )
    }

    /// States in which touching the floor starts a crash
    pub fn is_airborne(self) -> bool {
        matches!(self, Self::Entering | Self::Falling | Self::Flying)
    }
}

/// The controlled entity
#[derive(Debug, Clone)]
pub struct Player {
    /// Center of the hitbox
    pos: Vec2,
    /// Vertical velocity; reused as the slide speed once grounded
    gravity: f32,
    /// Pitch in degrees
    angle: f32,
    state: PlayerState,
    config: PlayerConfig,
    stars: ParticleEmitter,
    smoke: ParticleEmitter,
}

impl Player {
    pub fn new(config: &PlayerConfig, textures: &dyn TextureProvider, viewport: &Viewport, rng: RngState) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            gravity: 0.0,
            angle: 0.0,
            state: PlayerState::Entering,
            config: config.clone(),
            stars: ParticleEmitter::particles(&config.stars, textures, rng.with_stream(STARS_STREAM).to_rng()),
            smoke: ParticleEmitter::particles(&config.smoke, textures, rng.with_stream(SMOKE_STREAM).to_rng()),
        };
        player.reset_position(viewport);
        player
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn size(&self) -> Vec2 {
        self.config.size
    }

    pub fn stars(&self) -> &ParticleEmitter {
        &self.stars
    }

    pub fn smoke(&self) -> &ParticleEmitter {
        &self.smoke
    }

    /// Hitbox centered on the player
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.config.size)
    }

    /// Back off-screen left, vertically centered, entering again
    pub fn reset_position(&mut self, viewport: &Viewport) {
        self.gravity = 0.0;
        self.pos = Vec2::new(-self.config.size.x, viewport.height / 2.0);
        if self.state != PlayerState::Entering {
            log::debug!("Player reset from {:?}", self.state);
        }
        self.state = PlayerState::Entering;
    }

    /// Countdown finished. Returns false if the player was not entering.
    pub fn on_game_started(&mut self) -> bool {
        if self.state != PlayerState::Entering {
            return false;
        }
        self.transition(PlayerState::Falling);
        true
    }

    /// Flap. Only has an effect while falling.
    pub fn on_screen_tapped(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.state != PlayerState::Falling {
            return false;
        }
        events.push(GameEvent::Sound(SoundEffect::Fly));
        self.transition(PlayerState::Flying);
        true
    }

    fn transition(&mut self, next: PlayerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal player transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("Player {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub fn update(&mut self, frame: &Frame, background: &Background, events: &mut Vec<GameEvent>) {
        let elapsed = frame.elapsed;

        let anchor = Anchor::from_bounds(&self.bounds());
        self.stars.follow(anchor);
        self.smoke.follow(anchor);
        self.stars.update(frame, events);
        self.smoke.update(frame, events);

        let floor = background.floor_position();
        if self.state.is_airborne() && self.pos.y >= floor {
            self.transition(PlayerState::Crashing);
            events.push(GameEvent::Sound(SoundEffect::Crash));
        } else if matches!(self.state, PlayerState::Falling | PlayerState::Flying) {
            let hit = background.check_collision(&self.bounds(), self.config.collision_margin);
            if let Some(name) = hit {
                log::debug!("Player hit '{}'", name);
                self.transition(PlayerState::Crashing);
                events.push(GameEvent::Sound(SoundEffect::Hit));
            }
        }

        match self.state {
            PlayerState::Entering => {
                let entrance = self.config.entrance;
                self.stars.set_emitting(true);
                self.angle = entrance.angle;
                if self.pos.x < self.config.size.x {
                    self.pos.x += entrance.speed * elapsed;
                }
            }
            PlayerState::Falling => {
                let falling = self.config.falling;
                self.gravity += falling.gravity_step;
                self.pos.y += self.gravity * elapsed;
                if self.pos.y <= 0.0 {
                    self.pos.y = 0.0;
                }
                if self.angle < falling.angle_max && self.gravity > falling.gravity_max {
                    self.angle += falling.angle_step * elapsed;
                }
            }
            PlayerState::Flying => {
                self.angle = self.config.flying.angle;
                self.gravity = self.config.flying.gravity;
                self.transition(PlayerState::Falling);
            }
            PlayerState::Crashing => self.crash_step(floor, elapsed, events),
            PlayerState::Crashed => {}
        }
    }

    /// Tumble down to the floor, then slide to a stop
    fn crash_step(&mut self, floor: f32, elapsed: f32, events: &mut Vec<GameEvent>) {
        let crash = self.config.crashing;
        let ground = floor + crash.ground_offset;

        if self.pos.y < ground {
            self.gravity += crash.fall_gravity;
            self.pos.y += self.gravity * elapsed;
            self.pos.x += crash.fall_speed * elapsed;
        } else {
            self.pos.y = ground;
            self.stars.set_emitting(false);
            self.smoke.set_emitting(true);
            self.gravity -= crash.decelerate;
            if self.gravity > 0.0 {
                self.pos.x += self.gravity * elapsed;
            } else {
                self.transition(PlayerState::Crashed);
                self.smoke.set_emitting(false);
                events.push(GameEvent::PlayerCrashed);
            }
        }

        if self.angle < crash.angle_max {
            self.angle += crash.angle_step * elapsed;
        } else {
            self.angle = crash.angle_max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::platform::texture::stock_atlas;
    use crate::sim::background::BackgroundElement;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    fn frame() -> Frame {
        Frame::new(1.0, viewport())
    }

    fn setup(config: &GameConfig) -> (Player, Background) {
        let rng = RngState::new(17);
        let background = Background::new(config, &stock_atlas(), &viewport(), rng);
        let player = Player::new(&config.player, &stock_atlas(), &viewport(), rng);
        (player, background)
    }

    /// Stock scene without the obstacle columns
    fn open_sky() -> (Player, Background) {
        let mut config = GameConfig::default();
        config.background.remove("columns");
        setup(&config)
    }

    fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
        events.iter().filter(|&&e| e == wanted).count()
    }

    #[test]
    fn test_starts_entering_off_screen() {
        let (player, _) = open_sky();
        assert_eq!(player.state(), PlayerState::Entering);
        assert_eq!(player.pos(), Vec2::new(-110.0, 360.0));
        assert_eq!(player.bounds(), Rect::new(-165.0, 315.0, 110.0, 90.0));
    }

    #[test]
    fn test_entrance_glides_until_on_screen() {
        let (mut player, bg) = open_sky();
        let mut events = Vec::new();
        for _ in 0..400 {
            player.update(&frame(), &bg, &mut events);
        }
        assert_eq!(player.state(), PlayerState::Entering);
        assert_eq!(player.pos().x, 110.0);
        assert_eq!(player.angle(), 30.0);
        assert!(player.stars().core().is_emitting());
        assert!(player.stars().particle_count() > 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_taps_only_flap_while_falling() {
        let (mut player, bg) = open_sky();
        let mut events = Vec::new();
        assert!(!player.on_screen_tapped(&mut events));
        assert!(events.is_empty());

        assert!(player.on_game_started());
        assert!(!player.on_game_started());
        assert!(player.on_screen_tapped(&mut events));
        assert_eq!(events, vec![GameEvent::Sound(SoundEffect::Fly)]);
        assert_eq!(player.state(), PlayerState::Flying);
        assert!(!player.on_screen_tapped(&mut events));

        player.update(&frame(), &bg, &mut events);
        assert_eq!(player.state(), PlayerState::Falling);
        assert_eq!(player.gravity(), -9.0);
        assert_eq!(player.angle(), 30.0);
    }

    #[test]
    fn test_falling_accelerates_and_clamps_at_top() {
        let (mut player, bg) = open_sky();
        player.on_game_started();
        let mut events = Vec::new();
        player.update(&frame(), &bg, &mut events);
        assert_eq!(player.gravity(), 0.5);
        assert_eq!(player.pos().y, 360.5);

        player.pos.y = 5.0;
        player.gravity = -20.0;
        player.update(&frame(), &bg, &mut events);
        assert_eq!(player.pos().y, 0.0);
    }

    #[test]
    fn test_nose_drops_past_gravity_threshold() {
        let (mut player, bg) = open_sky();
        player.on_game_started();
        player.angle = 0.0;
        let mut events = Vec::new();
        // gravity 0.5 .. 3.0 keeps the nose level
        for _ in 0..6 {
            player.update(&frame(), &bg, &mut events);
        }
        assert_eq!(player.angle(), 0.0);
        player.update(&frame(), &bg, &mut events);
        assert_eq!(player.angle(), 3.0);
    }

    #[test]
    fn test_floor_crash_runs_to_rest() {
        let (mut player, bg) = open_sky();
        player.on_game_started();
        let mut events = Vec::new();
        let mut seen_crashing = false;
        for _ in 0..2000 {
            player.update(&frame(), &bg, &mut events);
            seen_crashing |= player.state() == PlayerState::Crashing;
        }
        assert!(seen_crashing);
        assert_eq!(player.state(), PlayerState::Crashed);
        assert_eq!(count(&events, GameEvent::Sound(SoundEffect::Crash)), 1);
        assert_eq!(count(&events, GameEvent::PlayerCrashed), 1);
        assert_eq!(count(&events, GameEvent::Sound(SoundEffect::Hit)), 0);
        // Resting on floor (562) + margin (30) + ground offset (10)
        assert_eq!(player.pos().y, 602.0);
        // Tumbled and slid forward from the start line
        assert!(player.pos().x > -110.0);
        assert!(player.angle() <= 120.0);
        assert!(!player.smoke().core().is_emitting());
        assert!(!player.stars().core().is_emitting());
    }

    #[test]
    fn test_crashed_is_terminal() {
        let (mut player, bg) = open_sky();
        player.on_game_started();
        let mut events = Vec::new();
        for _ in 0..2000 {
            player.update(&frame(), &bg, &mut events);
        }
        let rest = player.pos();
        assert!(!player.on_game_started());
        assert!(!player.on_screen_tapped(&mut events));
        for _ in 0..100 {
            player.update(&frame(), &bg, &mut events);
        }
        assert_eq!(player.state(), PlayerState::Crashed);
        assert_eq!(player.pos(), rest);
        assert_eq!(count(&events, GameEvent::PlayerCrashed), 1);
    }

    fn bg_with_columns() -> (Player, Background, Vec2) {
        let (player, mut bg) = setup(&GameConfig::default());
        if let Some(BackgroundElement::Obstacles(columns)) = bg.get_mut("columns") {
            columns.spawn_one(&viewport());
        }
        let gap = bg.obstacle_gaps().next().unwrap_or(Vec2::ZERO);
        (player, bg, gap)
    }

    #[test]
    fn test_obstacle_hit_starts_crash() {
        let (mut player, bg, gap) = bg_with_columns();
        player.on_game_started();
        player.pos = gap - Vec2::new(0.0, 145.0);
        let mut events = Vec::new();
        player.update(&frame(), &bg, &mut events);
        assert_eq!(player.state(), PlayerState::Crashing);
        assert_eq!(count(&events, GameEvent::Sound(SoundEffect::Hit)), 1);

        // No further hit checks while crashing
        player.update(&frame(), &bg, &mut events);
        assert_eq!(count(&events, GameEvent::Sound(SoundEffect::Hit)), 1);
    }

    #[test]
    fn test_gap_is_safe() {
        let (mut player, bg, gap) = bg_with_columns();
        player.on_game_started();
        player.pos = gap;
        player.update(&frame(), &bg, &mut Vec::new());
        assert_eq!(player.state(), PlayerState::Falling);
    }

    #[test]
    fn test_entering_ignores_obstacles() {
        let (mut player, bg, gap) = bg_with_columns();
        player.pos = gap - Vec2::new(0.0, 145.0);
        player.update(&frame(), &bg, &mut Vec::new());
        assert_eq!(player.state(), PlayerState::Entering);
    }

    #[test]
    fn test_reset_after_crash() {
        let (mut player, bg) = open_sky();
        player.on_game_started();
        for _ in 0..2000 {
            player.update(&frame(), &bg, &mut Vec::new());
        }
        player.reset_position(&viewport());
        assert_eq!(player.state(), PlayerState::Entering);
        assert_eq!(player.gravity(), 0.0);
        assert_eq!(player.pos(), Vec2::new(-110.0, 360.0));
        assert!(player.on_game_started());
    }

    #[test]
    fn test_transition_graph() {
        use PlayerState::*;
        assert!(Entering.can_transition_to(Falling));
        assert!(Flying.can_transition_to(Crashing));
        assert!(!Crashed.can_transition_to(Entering));
        assert!(!Crashing.can_transition_to(Falling));
        assert!(!Entering.can_transition_to(Flying));
    }

    #[derive(Debug, Clone, Copy)]
    enum Action {
        Tap,
        Start,
        Update(f32),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Tap),
            Just(Action::Start),
            (0.25f32..3.0).prop_map(Action::Update),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_state_sequence_follows_graph(actions in prop::collection::vec(action(), 1..400)) {
            let (mut player, mut bg) = setup(&GameConfig::default());
            bg.set_moving(true);
            let mut events = Vec::new();
            let mut crashed_signals = 0;
            for action in actions {
                let before = player.state();
                match action {
                    Action::Tap => {
                        player.on_screen_tapped(&mut events);
                    }
                    Action::Start => {
                        player.on_game_started();
                    }
                    Action::Update(elapsed) => {
                        let frame = Frame::new(elapsed, viewport());
                        bg.update(&frame, &mut events);
                        player.update(&frame, &bg, &mut events);
                        // Flying never survives an update
                        prop_assert_ne!(player.state(), PlayerState::Flying);
                    }
                }
                let after = player.state();
                // One update may chain Crashing -> Crashed
                let legal = before == after
                    || before.can_transition_to(after)
                    || (before.can_transition_to(PlayerState::Crashing) && after == PlayerState::Crashed);
                prop_assert!(legal, "{:?} -> {:?}", before, after);
                if before == PlayerState::Crashed {
                    prop_assert_eq!(after, PlayerState::Crashed);
                }
                crashed_signals = count(&events, GameEvent::PlayerCrashed);
                prop_assert!(crashed_signals <= 1);
            }
            prop_assert_eq!(crashed_signals == 1, player.state() == PlayerState::Crashed);
        }
    }
}
