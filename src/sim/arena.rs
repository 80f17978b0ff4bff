//! Static arena geometry: bounds and the obstacle registry.
//!
//! Obstacles are advisory scenery for the rendering collaborator; the
//! simulation never tests entities against them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, PLAYER_MARGIN};

/// Obstacle categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Bunker,
    Fort,
    Crate,
    Wall,
}

/// An axis-aligned rectangle, centered on `pos`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, w: f32, h: f32, kind: ObstacleKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            kind,
        }
    }
}

/// The fixed obstacle map: central bunker, corner forts, scattered crates,
/// and cover walls along each arena edge.
pub fn default_layout() -> Vec<Obstacle> {
    use ObstacleKind::*;
    vec![
        Obstacle::new(400.0, 300.0, 120.0, 120.0, Bunker),
        Obstacle::new(150.0, 150.0, 100.0, 100.0, Fort),
        Obstacle::new(650.0, 150.0, 100.0, 100.0, Fort),
        Obstacle::new(150.0, 450.0, 100.0, 100.0, Fort),
        Obstacle::new(650.0, 450.0, 100.0, 100.0, Fort),
        Obstacle::new(300.0, 200.0, 60.0, 60.0, Crate),
        Obstacle::new(500.0, 200.0, 60.0, 60.0, Crate),
        Obstacle::new(300.0, 400.0, 60.0, 60.0, Crate),
        Obstacle::new(500.0, 400.0, 60.0, 60.0, Crate),
        Obstacle::new(400.0, 100.0, 150.0, 30.0, Wall),
        Obstacle::new(400.0, 500.0, 150.0, 30.0, Wall),
        Obstacle::new(100.0, 300.0, 30.0, 150.0, Wall),
        Obstacle::new(700.0, 300.0, 30.0, 150.0, Wall),
    ]
}

/// True while `pos` lies inside the arena rectangle (edges inclusive)
#[inline]
pub fn in_bounds(pos: Vec2) -> bool {
    pos.x >= 0.0 && pos.x <= ARENA_WIDTH && pos.y >= 0.0 && pos.y <= ARENA_HEIGHT
}

/// Clamp a position to the player's movement region
#[inline]
pub fn clamp_player(pos: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(PLAYER_MARGIN, ARENA_WIDTH - PLAYER_MARGIN),
        pos.y.clamp(PLAYER_MARGIN, ARENA_HEIGHT - PLAYER_MARGIN),
    )
}
