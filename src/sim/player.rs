//! Player payload and movement

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Direction};
use super::world::World;
use crate::consts::SIM_DT;
use crate::tuning::PlayerTuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub health: f32,
    pub max_health: f32,
    pub xp: u32,
    pub level: u32,
}

impl PlayerData {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            health: tuning.max_health,
            max_health: tuning.max_health,
            xp: 0,
            level: 1,
        }
    }

    /// Subtract health, floored at zero. Returns the health left.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount).max(0.0);
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Add XP and recompute the level. Returns true on level-up.
    pub fn award_xp(&mut self, amount: u32, xp_per_level: u32) -> bool {
        self.xp = self.xp.saturating_add(amount);
        let level = 1 + self.xp / xp_per_level.max(1);
        if level > self.level {
            log::info!("Player reached level {} ({} xp)", level, self.xp);
            self.level = level;
            return true;
        }
        false
    }
}

/// Accelerate toward `move_dir`, decelerate idle axes, cap per axis, then move
/// one axis at a time, cancelling the axis that would end inside a wall.
pub fn step(body: &mut Body, move_dir: Vec2, world: &World, tuning: &PlayerTuning, dt: f32) {
    let steps = dt / SIM_DT;
    let prev = body.pos;

    body.vel += move_dir * tuning.accel * dt;

    if move_dir.x == 0.0 {
        body.vel.x = decelerate(body.vel.x, tuning.decel * dt);
    }
    if move_dir.y == 0.0 {
        body.vel.y = decelerate(body.vel.y, tuning.decel * dt);
    }

    body.vel = body.vel.clamp(Vec2::splat(-tuning.max_speed), Vec2::splat(tuning.max_speed));

    body.pos.x += body.vel.x * steps;
    if world.is_wall_at(body.pos) {
        body.pos.x = prev.x;
        body.vel.x = 0.0;
    }

    body.pos.y += body.vel.y * steps;
    if world.is_wall_at(body.pos) {
        body.pos.y = prev.y;
        body.vel.y = 0.0;
    }

    if body.vel.x.abs() > body.vel.y.abs() {
        body.facing = if body.vel.x > 0.0 { Direction::Right } else { Direction::Left };
    } else if body.vel.y != 0.0 {
        body.facing = if body.vel.y > 0.0 { Direction::Down } else { Direction::Up };
    }
}

#[inline]
fn decelerate(speed: f32, amount: f32) -> f32 {
    if speed > 0.0 {
        (speed - amount).max(0.0)
    } else if speed < 0.0 {
        (speed + amount).min(0.0)
    } else {
        0.0
    }
}

/// Move to `pos` at rest, facing down
pub fn reset(body: &mut Body, pos: Vec2) {
    body.pos = pos;
    body.vel = Vec2::ZERO;
    body.facing = Direction::Down;
}
