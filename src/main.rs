//! Monkey Siege entry point
//!
//! Headless harness: runs a scripted bot session against the simulation and
//! prints the final state snapshot a HUD collaborator would read.
//!
//! Usage: `monkey-siege [seed] [waves]`

use glam::Vec2;

use monkey_siege::angle_to;
use monkey_siege::consts::SIM_DT;
use monkey_siege::sim::{GameState, TickInput, tick};

/// Hard stop so a stuck bot cannot spin forever (30 minutes of sim time)
const MAX_TICKS: u64 = 60 * 60 * 30;

fn main() {
    env_logger::init();

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let waves: u32 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);

    log::info!("scripted session: seed {seed}, target {waves} waves");
    let mut state = GameState::new(seed);

    while !state.game_over && state.wave <= waves && state.time_ticks < MAX_TICKS {
        let input = bot_input(&state);
        tick(&mut state, &input, SIM_DT);
    }

    match serde_json::to_string_pretty(&state) {
        Ok(snapshot) => println!("{snapshot}"),
        Err(err) => eprintln!("snapshot serialization failed: {err}"),
    }
}

/// Minimal bot: starts waves when idle, reloads when dry, aims at the
/// nearest monkey, fires, and backs away from anything that closes in.
fn bot_input(state: &GameState) -> TickInput {
    let mut input = TickInput::default();

    if !state.wave_active() && state.monkeys.is_empty() {
        input.request_start_wave();
    }

    if state.player.ammo == 0 {
        input.request_reload();
    }

    let nearest = state.monkeys.iter().min_by(|a, b| {
        let da = a.pos.distance_squared(state.player.pos);
        let db = b.pos.distance_squared(state.player.pos);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });

    match nearest {
        Some(monkey) => {
            input.set_aim_angle(angle_to(state.player.pos, monkey.pos));
            input.request_fire();

            if monkey.pos.distance(state.player.pos) < 120.0 {
                let away = state.player.pos - monkey.pos;
                input.set_move_intent(away.x, away.y);
            }
        }
        None => {
            // Drift back toward the center between waves
            let home = Vec2::new(400.0, 300.0) - state.player.pos;
            if home.length() > 5.0 {
                input.set_move_intent(home.x, home.y);
            }
        }
    }

    input
}
