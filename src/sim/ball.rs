//! Ball payload, physics step and ownership
//!
//! Ownership (neutral / player / enemy) decides who gets credit when the ball
//! reaches a hole or goal. It changes only at the collision that causes it:
//! a player touch makes it player-owned, the snake eating it makes it
//! enemy-owned, and the hole's hold state resets it to neutral.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::{circle_circle, reflect_velocity};
use super::entity::Body;
use super::world::World;
use crate::consts::{SIM_DT, TILE_HEIGHT, TILE_WIDTH};
use crate::tuning::{BallTuning, Tuning};
use crate::{clamp_speed, world_to_cell};

/// Cosmetic ball variety; only the physics coefficients differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallKind {
    #[default]
    Normal,
    Fire,
    Ice,
    Lightning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ownership {
    #[default]
    Neutral,
    /// Last struck by the player; damages the boss
    Player,
    /// Last kicked by the boss; damages the player
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallData {
    pub kind: BallKind,
    pub ownership: Ownership,
    pub radius: f32,
    pub bounce: f32,
    pub friction: f32,
    pub damage: f32,
}

impl BallData {
    pub fn new(kind: BallKind, tuning: &Tuning) -> Self {
        let coeffs = tuning.ball_kinds.get(kind);
        Self {
            kind,
            ownership: Ownership::Neutral,
            radius: tuning.ball.radius,
            bounce: coeffs.bounce,
            friction: coeffs.friction,
            damage: coeffs.damage,
        }
    }

    /// Returns true if the ownership actually changed
    pub fn set_ownership(&mut self, ownership: Ownership) -> bool {
        if self.ownership == ownership {
            return false;
        }
        log::info!("Ball ownership {:?} -> {:?}", self.ownership, ownership);
        self.ownership = ownership;
        true
    }
}

/// Advance the ball one step: integrate, apply friction, resolve walls and the
/// player, clamp speed and drop residual creep.
///
/// Velocity is in world units per simulation tick, so `dt` other than
/// [`SIM_DT`] scales both the motion and the friction.
/// Returns true if the player touched the ball this step.
pub fn step(
    body: &mut Body,
    ball: &mut BallData,
    world: &World,
    player: Option<&Body>,
    tuning: &BallTuning,
    dt: f32,
) -> bool {
    if !body.active {
        return false;
    }

    let steps = dt / SIM_DT;
    let prev = body.pos;

    body.pos += body.vel * steps;
    body.vel *= ball.friction.powf(steps);

    resolve_walls(body, ball, world, prev);

    let touched = match player {
        Some(player) => resolve_player(body, ball, player, tuning),
        None => false,
    };

    body.vel = clamp_speed(body.vel, tuning.max_speed);

    if body.vel.x.abs() < tuning.rest_threshold {
        body.vel.x = 0.0;
    }
    if body.vel.y.abs() < tuning.rest_threshold {
        body.vel.y = 0.0;
    }

    touched
}

/// Per-axis wall response against the 3x3 tile neighbourhood, then the world edge
fn resolve_walls(body: &mut Body, ball: &BallData, world: &World, prev: Vec2) {
    let r = ball.radius;
    let center = world_to_cell(body.pos);

    for dy in -1..=1 {
        for dx in -1..=1 {
            let cell = center + IVec2::new(dx, dy);
            if !world.is_wall_cell(cell) {
                continue;
            }

            let left = cell.x as f32 * TILE_WIDTH;
            let right = left + TILE_WIDTH;
            let top = cell.y as f32 * TILE_HEIGHT;
            let bottom = top + TILE_HEIGHT;

            // Horizontal faces: only when the centre is within the tile's rows
            if body.pos.y > top && body.pos.y < bottom {
                if prev.x + r <= left && body.pos.x + r > left {
                    body.pos.x = left - r;
                    body.vel.x = -body.vel.x * ball.bounce;
                } else if prev.x - r >= right && body.pos.x - r < right {
                    body.pos.x = right + r;
                    body.vel.x = -body.vel.x * ball.bounce;
                }
            }

            if body.pos.x > left && body.pos.x < right {
                if prev.y + r <= top && body.pos.y + r > top {
                    body.pos.y = top - r;
                    body.vel.y = -body.vel.y * ball.bounce;
                } else if prev.y - r >= bottom && body.pos.y - r < bottom {
                    body.pos.y = bottom + r;
                    body.vel.y = -body.vel.y * ball.bounce;
                }
            }
        }
    }

    let size = world.size();
    if body.pos.x - r < 0.0 {
        body.pos.x = r;
        body.vel.x = -body.vel.x * ball.bounce;
    } else if body.pos.x + r > size.x {
        body.pos.x = size.x - r;
        body.vel.x = -body.vel.x * ball.bounce;
    }
    if body.pos.y - r < 0.0 {
        body.pos.y = r;
        body.vel.y = -body.vel.y * ball.bounce;
    } else if body.pos.y + r > size.y {
        body.pos.y = size.y - r;
        body.vel.y = -body.vel.y * ball.bounce;
    }
}

/// Collision radius used for a rectangular body treated as a circle
#[inline]
pub fn body_radius(body: &Body) -> f32 {
    (body.half_extents.x + body.half_extents.y) / 2.0
}

/// Push the ball out of the player and kick it along the contact normal plus
/// a share of the player's own velocity. A touch makes the ball player-owned.
fn resolve_player(
    body: &mut Body,
    ball: &mut BallData,
    player: &Body,
    tuning: &BallTuning,
) -> bool {
    let player_radius = body_radius(player);
    let result = circle_circle(body.pos, ball.radius, player.pos, player_radius);
    if !result.hit {
        return false;
    }

    body.pos = player.pos + result.normal * (ball.radius + player_radius);
    body.vel = result.normal * tuning.player_push_force + player.vel * tuning.player_momentum_share;
    body.vel = clamp_speed(body.vel, tuning.max_speed);
    ball.set_ownership(Ownership::Player);
    true
}

/// Add an impulse then clamp to the speed cap. Inactive balls ignore forces.
pub fn apply_force(body: &mut Body, force: Vec2, max_speed: f32) {
    if !body.active {
        return;
    }
    body.vel = clamp_speed(body.vel + force, max_speed);
}

/// Reposition at rest and reactivate; ownership is untouched
pub fn reset(body: &mut Body, pos: Vec2) {
    body.pos = pos;
    body.vel = Vec2::ZERO;
    body.active = true;
}

/// Reflect along `normal` scaled by the ball's bounce factor, but only when
/// the ball is moving into the surface
pub fn reflect_if_approaching(body: &mut Body, ball: &BallData, normal: Vec2) -> bool {
    if body.vel.dot(normal) < 0.0 {
        body.vel = reflect_velocity(body.vel, normal) * ball.bounce;
        true
    } else {
        false
    }
}

/// Bounce off a generic circular enemy. Returns true on contact.
pub fn bounce_off_circle(body: &mut Body, ball: &BallData, center: Vec2, radius: f32) -> bool {
    let result = circle_circle(body.pos, ball.radius, center, radius);
    if !result.hit {
        return false;
    }
    body.pos = center + result.normal * (ball.radius + radius);
    reflect_if_approaching(body, ball, result.normal);
    true
}
