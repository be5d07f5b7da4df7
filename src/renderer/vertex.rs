//! Vertex types for 2D rendering

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const WATER: [f32; 4] = [0.2, 0.4, 0.9, 1.0];
    pub const LAVA: [f32; 4] = [0.9, 0.3, 0.1, 1.0];
    pub const ICE: [f32; 4] = [0.7, 0.9, 1.0, 1.0];
    pub const DOOR: [f32; 4] = [0.6, 0.4, 0.2, 1.0];
    pub const SWITCH: [f32; 4] = [0.9, 0.85, 0.3, 1.0];
    pub const PLAYER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const BALL_NEUTRAL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BALL_PLAYER: [f32; 4] = [0.3, 0.5, 1.0, 1.0];
    pub const BALL_ENEMY: [f32; 4] = [1.0, 0.25, 0.25, 1.0];
    pub const SNAKE_HEAD: [f32; 4] = [0.1, 0.7, 0.2, 1.0];
    pub const SNAKE_BODY: [f32; 4] = [0.2, 0.55, 0.2, 1.0];
    pub const SNAKE_DEFEATED: [f32; 4] = [0.35, 0.35, 0.35, 1.0];
    pub const GROW_RING: [f32; 4] = [1.0, 0.8, 0.2, 0.8];
    pub const SHRINK_RING: [f32; 4] = [1.0, 0.2, 0.2, 0.8];
    pub const HOLE: [f32; 4] = [0.05, 0.0, 0.1, 1.0];
    pub const HOLE_RING: [f32; 4] = [0.6, 0.2, 0.8, 1.0];
    pub const BEAM: [f32; 4] = [1.0, 0.9, 0.4, 1.0];
    pub const GOAL_NET: [f32; 4] = [0.9, 0.9, 0.9, 0.35];
}
