//! Player motion model
//!
//! The player chases a target point through a damped spring. The raw CoB
//! signal is never filtered; the spring itself smooths it, and per-frame
//! displacement is bounded by `v*dt + F*dt^2`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::field_center;

/// Fixed-capacity ring of recent player positions
#[derive(Debug, Clone)]
pub struct Trail {
    points: [Vec2; TRAIL_LENGTH],
    /// Next write slot
    head: usize,
    len: usize,
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            points: [Vec2::ZERO; TRAIL_LENGTH],
            head: 0,
            len: 0,
        }
    }
}

impl Trail {
    pub fn push(&mut self, pos: Vec2) {
        self.points[self.head] = pos;
        self.head = (self.head + 1) % TRAIL_LENGTH;
        self.len = (self.len + 1).min(TRAIL_LENGTH);
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn newest(&self) -> Option<Vec2> {
        self.iter().next()
    }

    /// Positions from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.len).map(move |i| self.points[(self.head + TRAIL_LENGTH - 1 - i) % TRAIL_LENGTH])
    }
}

/// The on-screen avatar steered by weight shifts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    #[serde(skip)]
    pub trail: Trail,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: field_center(),
            vel: Vec2::ZERO,
            trail: Trail::default(),
        }
    }
}

impl Player {
    /// Back to the centre, at rest, with an empty trail
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Half-extent used for clamping and collision boxes
    #[inline]
    pub fn half_size() -> f32 {
        GAME_OBJECT_SIZE / 2.0
    }

    /// Top-left corner of the player's bounding square
    pub fn rect_min(&self) -> Vec2 {
        self.pos - Vec2::splat(Self::half_size())
    }
}

/// Advance the player one frame toward `target`.
///
/// Semi-implicit Euler on a damped spring, then clamp to the field. An axis
/// that hits the border loses its velocity.
pub fn update(player: &mut Player, target: Vec2, dt: f32) {
    let force = (target - player.pos) * SPRING_CONSTANT - player.vel * DAMPING_FACTOR;
    player.vel += force * dt;
    player.pos += player.vel * dt;

    let half = Player::half_size();
    let max = Vec2::new(FIELD_WIDTH - half, FIELD_HEIGHT - half);

    if player.pos.x < half {
        player.pos.x = half;
        player.vel.x = 0.0;
    } else if player.pos.x > max.x {
        player.pos.x = max.x;
        player.vel.x = 0.0;
    }
    if player.pos.y < half {
        player.pos.y = half;
        player.vel.y = 0.0;
    } else if player.pos.y > max.y {
        player.pos.y = max.y;
        player.vel.y = 0.0;
    }

    player.trail.push(player.pos);
}
