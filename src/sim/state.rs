//! Entity models and the owning game-state aggregate
//!
//! All gameplay state lives here; `tick` mutates it in a fixed per-frame
//! order. Collections keep spawn order, which doubles as collision scan
//! order.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{self, Obstacle};
use crate::consts::*;
use crate::{direction_to, distance};

/// The player-controlled defender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Aim direction (radians)
    pub angle: f32,
    pub health: i32,
    pub max_health: i32,
    pub points: u64,
    pub kills: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Seconds left on the current reload; 0 when not reloading
    pub reload_time: f32,
    pub fire_cooldown: f32,
    /// Base damage per bullet, before the damage boost multiplier
    pub damage: f32,
    pub speed: f32,
    pub speed_boost: f32,
    pub speed_boost_time: f32,
    pub damage_boost: f32,
    pub damage_boost_time: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
            angle: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            points: 0,
            kills: 0,
            ammo: PLAYER_MAX_AMMO,
            max_ammo: PLAYER_MAX_AMMO,
            reload_time: 0.0,
            fire_cooldown: 0.0,
            damage: PLAYER_BASE_DAMAGE,
            speed: PLAYER_SPEED,
            speed_boost: 1.0,
            speed_boost_time: 0.0,
            damage_boost: 1.0,
            damage_boost_time: 0.0,
        }
    }
}

impl Player {
    /// Fire one bullet along the current aim. Requires ammo and a cold
    /// trigger; otherwise silently does nothing.
    pub fn shoot(&mut self, id: u32) -> Option<Bullet> {
        if self.ammo > 0 && self.fire_cooldown <= 0.0 {
            self.ammo -= 1;
            self.fire_cooldown = FIRE_COOLDOWN;
            return Some(Bullet::new(
                id,
                self.pos,
                self.angle,
                self.damage * self.damage_boost,
            ));
        }
        None
    }

    /// Begin a reload; no-op while already reloading or with a full magazine
    pub fn reload(&mut self) {
        if self.reload_time <= 0.0 && self.ammo < self.max_ammo {
            self.reload_time = RELOAD_TIME;
        }
    }

    /// Apply a collected powerup
    pub fn pickup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Health => {
                self.health = (self.health + HEAL_AMOUNT).min(self.max_health);
            }
            PowerupKind::Ammo => self.ammo = self.max_ammo,
            PowerupKind::Speed => {
                // Refresh-on-reacquire: duration resets, multiplier never stacks
                self.speed_boost = SPEED_BOOST_MULT;
                self.speed_boost_time = BOOST_DURATION;
            }
            PowerupKind::Damage => {
                self.damage_boost = DAMAGE_BOOST_MULT;
                self.damage_boost_time = BOOST_DURATION;
            }
        }
    }

    /// Advance cooldowns, reload completion, and boost expiry
    pub fn update(&mut self, dt: f32) {
        if self.reload_time > 0.0 {
            self.reload_time -= dt;
            if self.reload_time <= 0.0 {
                // Reload completes atomically: the whole magazine in one step
                self.ammo = self.max_ammo;
            }
        }

        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }

        if self.speed_boost_time > 0.0 {
            self.speed_boost_time -= dt;
            if self.speed_boost_time <= 0.0 {
                self.speed_boost = 1.0;
            }
        }

        if self.damage_boost_time > 0.0 {
            self.damage_boost_time -= dt;
            if self.damage_boost_time <= 0.0 {
                self.damage_boost = 1.0;
            }
        }
    }
}

/// A fired projectile; travels on a fixed heading until it leaves the arena
/// or hits a monkey
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    /// Captured at fire time, damage boost included
    pub damage: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, angle: f32, damage: f32) -> Self {
        Self {
            id,
            pos,
            angle,
            speed: BULLET_SPEED,
            damage,
            alive: true,
        }
    }

    /// Linear motion; dies the first tick it exits the arena
    pub fn update(&mut self, dt: f32) {
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed * dt;
        if !arena::in_bounds(self.pos) {
            self.alive = false;
        }
    }
}

/// Enemy variants, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonkeyKind {
    Normal,
    Fast,
    Tank,
}

impl MonkeyKind {
    /// Points per kill, multiplied by the wave number at scoring time
    pub fn score_value(self) -> u64 {
        match self {
            MonkeyKind::Normal => 10,
            MonkeyKind::Fast => 20,
            MonkeyKind::Tank => 30,
        }
    }
}

/// An enemy. Walks straight at the player and melees from stand-off range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monkey {
    pub id: u32,
    pub pos: Vec2,
    pub kind: MonkeyKind,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Damage dealt to the player per landed melee attack
    pub damage: i32,
    /// Hit-circle radius for bullet collision
    pub radius: f32,
    pub attack_cooldown: f32,
    /// Walk-cycle phase for the renderer, wraps in [0, 4)
    pub animation_frame: f32,
    pub alive: bool,
}

impl Monkey {
    /// Stat-table constructor; every stat is a linear function of the wave
    pub fn new(id: u32, pos: Vec2, wave: u32, kind: MonkeyKind) -> Self {
        let w = wave as f32;
        let (health, speed, damage, radius) = match kind {
            MonkeyKind::Normal => (30.0 + 10.0 * w, 50.0 + 5.0 * w, (5 + wave) as i32, 20.0),
            MonkeyKind::Fast => (20.0 + 5.0 * w, 100.0 + 8.0 * w, (3 + wave) as i32, 15.0),
            MonkeyKind::Tank => (60.0 + 20.0 * w, 30.0 + 2.0 * w, (10 + 2 * wave) as i32, 30.0),
        };
        Self {
            id,
            pos,
            kind,
            health,
            max_health: health,
            speed,
            damage,
            radius,
            attack_cooldown: 0.0,
            animation_frame: 0.0,
            alive: true,
        }
    }

    /// Walk toward the player, or melee once inside stand-off range.
    /// Returns true when an attack lands this tick; the caller applies the
    /// damage.
    pub fn move_towards_player(&mut self, target: Vec2, dt: f32) -> bool {
        let mut attacked = false;
        if distance(self.pos, target) > MELEE_RANGE {
            self.pos += direction_to(self.pos, target) * self.speed * dt;
        } else if self.attack_cooldown <= 0.0 {
            self.attack_cooldown = ATTACK_COOLDOWN;
            attacked = true;
        }

        // Cooldown runs every tick, including the one the attack lands on
        self.attack_cooldown -= dt;
        self.animation_frame = (self.animation_frame + dt * 10.0) % 4.0;
        attacked
    }

    /// Returns true when this damage kills the monkey; the caller awards
    /// points and removes it
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        if self.health <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Timed pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    Ammo,
    Speed,
    Damage,
}

/// A pickup on the ground; vanishes if not collected within its lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub lifetime: f32,
    pub alive: bool,
}

impl Powerup {
    pub fn new(id: u32, pos: Vec2, kind: PowerupKind) -> Self {
        Self {
            id,
            pos,
            kind,
            lifetime: POWERUP_LIFETIME,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.alive = false;
        }
    }
}

/// Wave state machine: externally triggered, runs to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave running; waiting for a start request
    Idle,
    /// Spawning and/or clearing the current wave
    Active,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live RNG stream; reseeded from zero when deserialized
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current wave number (1-based, the number players see)
    pub wave: u32,
    pub wave_phase: WavePhase,
    /// Enemies left to spawn in the active wave
    pub monkeys_to_spawn: u32,
    pub spawn_timer: f32,
    pub powerup_spawn_timer: f32,
    /// Gating flags checked at the top of each tick
    pub paused: bool,
    pub game_over: bool,
    pub player: Player,
    pub monkeys: Vec<Monkey>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<Powerup>,
    /// Static scenery, never consulted for collision
    pub obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            wave: 1,
            wave_phase: WavePhase::Idle,
            monkeys_to_spawn: 0,
            spawn_timer: 0.0,
            powerup_spawn_timer: 0.0,
            paused: false,
            game_over: false,
            player: Player::default(),
            monkeys: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            obstacles: arena::default_layout(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn wave_active(&self) -> bool {
        self.wave_phase == WavePhase::Active
    }
}
