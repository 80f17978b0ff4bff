//! Circle-overlap collision queries shared by the tick pipeline
//!
//! Bullet hits resolve by scan order, not proximity: the first monkey in
//! the collection whose hit circle contains the bullet takes the damage.

use glam::Vec2;

use super::state::Monkey;
use crate::consts::PICKUP_RADIUS;
use crate::distance;

/// Index of the first monkey (in scan order) whose hit circle contains
/// `pos`. Spawn order wins ties, not distance. The test is strict: a bullet
/// exactly on the circle misses.
pub fn first_monkey_hit(pos: Vec2, monkeys: &[Monkey]) -> Option<usize> {
    monkeys.iter().position(|m| distance(pos, m.pos) < m.radius)
}

/// True when the player is close enough to collect a powerup
#[inline]
pub fn within_pickup_range(player_pos: Vec2, powerup_pos: Vec2) -> bool {
    distance(player_pos, powerup_pos) < PICKUP_RADIUS
}
