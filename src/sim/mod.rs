//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod state;
pub mod tick;

pub use arena::{Obstacle, ObstacleKind, default_layout};
pub use collision::{first_monkey_hit, within_pickup_range};
pub use state::{
    Bullet, GameState, Monkey, MonkeyKind, Player, Powerup, PowerupKind, WavePhase,
};
pub use tick::{TickInput, start_wave, tick};
