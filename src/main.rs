//! Pixie Dash headless demo
//!
//! Plays a few seeded rounds with an autopilot and logs what happens.
//!
//! Usage: `pixie-dash [seed] [rounds]` (set `RUST_LOG=debug` for FSM and
//! pool traces)

use pixie_dash::GameConfig;
use pixie_dash::consts::FRAMES_PER_SECOND;
use pixie_dash::platform::{Viewport, stock_atlas};
use pixie_dash::sim::{Frame, Game, GameEvent, PlayerState, TickInput, tick};

/// Give up on a round after two minutes of play
const MAX_ROUND_FRAMES: u32 = 120 * FRAMES_PER_SECOND as u32;

/// Keep the player near the center of the next gap: flap when sinking
/// below it
fn autopilot(game: &Game) -> bool {
    let player = &game.player;
    if player.state() != PlayerState::Falling || player.gravity() <= 0.0 {
        return false;
    }
    let pos = player.pos();
    let half_width = player.size().x / 2.0;
    let target = game
        .background
        .obstacle_gaps()
        .filter(|gap| gap.x + half_width >= pos.x - half_width)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|gap| gap.y)
        .unwrap_or(game.viewport.height / 2.0);
    pos.y > target + 10.0
}

/// Play one round; returns the final score, or None if it never ended
fn play_round(game: &mut Game, round: u32) -> Option<u32> {
    let frame = Frame::new(1.0, game.viewport);
    let start = TickInput {
        button_tapped: true,
        ..Default::default()
    };
    tick(game, &start, &frame);

    for _ in 0..MAX_ROUND_FRAMES {
        let input = TickInput {
            screen_tapped: autopilot(game),
            ..Default::default()
        };
        tick(game, &input, &frame);

        for event in game.drain_events() {
            match event {
                GameEvent::Scored(score) if score > 0 => log::info!("Round {}: score {}", round, score),
                GameEvent::GameOver { score, best } => {
                    log::info!("Round {} over: score {}, best {}", round, score, best);
                    return Some(score);
                }
                other => log::debug!("{:?}", other),
            }
        }
    }
    log::warn!("Round {} still running after {} frames", round, MAX_ROUND_FRAMES);
    None
}

fn run(seed: u64, rounds: u32) {
    let config = GameConfig::default();
    let atlas = stock_atlas();
    let mut game = Game::new(&config, &atlas, Viewport::default(), seed);

    let scores: Vec<u32> = (1..=rounds).filter_map(|round| play_round(&mut game, round)).collect();
    log::info!(
        "Played {} rounds in {} frames, scores {:?}, best {}",
        scores.len(),
        game.time_ticks,
        scores,
        game.scoreboard.best()
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pixie Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let rounds = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
    run(seed, rounds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    run(12345, 3);
}
