//! Monkey Siege - a top-down wave-survival arena shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, wave spawning, combat)
//! - `persistence`: Reserved save path (not implemented)
//!
//! Rendering, HUD text, and input capture are external collaborators: they
//! feed a [`sim::TickInput`] per frame and read the resulting
//! [`sim::GameState`] between ticks.

pub mod persistence;
pub mod sim;

pub use sim::{GameState, TickInput};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Player movement is clamped this far inside the arena edges
    pub const PLAYER_MARGIN: f32 = 20.0;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    pub const PLAYER_SPEED: f32 = 180.0;
    pub const PLAYER_BASE_DAMAGE: f32 = 10.0;
    pub const PLAYER_MAX_AMMO: u32 = 30;
    /// Minimum delay between shots (seconds)
    pub const FIRE_COOLDOWN: f32 = 0.15;
    /// Full reload duration (seconds); the magazine refills in one step
    pub const RELOAD_TIME: f32 = 2.0;

    /// Bullet speed (units/sec), fixed for every shot
    pub const BULLET_SPEED: f32 = 500.0;

    /// Monkeys stop approaching and melee inside this range
    pub const MELEE_RANGE: f32 = 35.0;
    /// Delay between melee attacks (seconds)
    pub const ATTACK_COOLDOWN: f32 = 1.0;

    /// Powerup lifetime on the ground (seconds)
    pub const POWERUP_LIFETIME: f32 = 15.0;
    /// Powerup spawner period (seconds)
    pub const POWERUP_SPAWN_INTERVAL: f32 = 15.0;
    /// Concurrently-alive powerup cap
    pub const MAX_POWERUPS: usize = 3;
    /// Collection radius around the player
    pub const PICKUP_RADIUS: f32 = 25.0;
    /// Health restored by a health powerup
    pub const HEAL_AMOUNT: i32 = 30;
    /// Health restored on wave completion
    pub const WAVE_CLEAR_HEAL: i32 = 20;
    /// Duration of speed/damage boosts (seconds, refresh-on-reacquire)
    pub const BOOST_DURATION: f32 = 10.0;
    pub const SPEED_BOOST_MULT: f32 = 1.5;
    pub const DAMAGE_BOOST_MULT: f32 = 2.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector pointing from `from` to `to` (zero when the points coincide)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Angle (radians) of the ray from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}
