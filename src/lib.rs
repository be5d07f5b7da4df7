//! Snakeball - a top-down arena game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball ownership, snake boss, win-hole / goal resolution)
//! - `renderer`: Read-only render hooks that turn state into shape lists
//! - `persistence`: Versioned JSON snapshots of the game state
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

use glam::{IVec2, Vec2};

/// Structural constants (not balance knobs - those live in [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one logical update per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Tile size in world units
    pub const TILE_WIDTH: f32 = 8.0;
    pub const TILE_HEIGHT: f32 = 8.0;

    /// Arena dimensions in tiles
    pub const WORLD_WIDTH: i32 = 76;
    pub const WORLD_HEIGHT: i32 = 120;

    /// Player sprite bounds
    pub const PLAYER_WIDTH: f32 = 16.0;
    pub const PLAYER_HEIGHT: f32 = 16.0;
}

/// Grid cell containing a world position (floor division, so negatives map below zero)
#[inline]
pub fn world_to_cell(pos: Vec2) -> IVec2 {
    IVec2::new(
        (pos.x / consts::TILE_WIDTH).floor() as i32,
        (pos.y / consts::TILE_HEIGHT).floor() as i32,
    )
}

/// Centre of a grid cell in world coordinates
#[inline]
pub fn cell_center(cell: IVec2) -> Vec2 {
    Vec2::new(
        cell.x as f32 * consts::TILE_WIDTH + consts::TILE_WIDTH / 2.0,
        cell.y as f32 * consts::TILE_HEIGHT + consts::TILE_HEIGHT / 2.0,
    )
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Scale `vel` down to `max_speed` if it is faster
#[inline]
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max_speed {
        vel * (max_speed / speed)
    } else {
        vel
    }
}
