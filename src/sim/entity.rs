//! Generic entity container
//!
//! Every game object shares a [`Body`] (position, velocity, extents, facing) and
//! carries exactly one kind-specific [`Payload`]. Kind-specific accessors return
//! `None` for the wrong kind, so callers never see a mismatched payload.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::ball::BallData;
use super::player::PlayerData;
use super::snake::SnakeBoss;

/// Cardinal facing / movement direction (grid y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Right,
    Down,
    Left,
}

impl Direction {
    /// Evaluation order for path selection; earlier entries win ties
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// One-cell grid offset
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        self.delta().as_vec2()
    }
}

/// Fields shared by every entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre in world units
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Vec2,
    pub active: bool,
    pub facing: Direction,
}

impl Body {
    pub fn new(pos: Vec2, half_extents: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half_extents,
            active: true,
            facing: Direction::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Ball,
    SnakeBoss,
}

/// Kind-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    Player(PlayerData),
    Ball(BallData),
    Snake(SnakeBoss),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub body: Body,
    pub payload: Payload,
}

impl Entity {
    pub fn new(id: u32, body: Body, payload: Payload) -> Self {
        Self { id, body, payload }
    }

    pub fn kind(&self) -> EntityKind {
        match self.payload {
            Payload::Player(_) => EntityKind::Player,
            Payload::Ball(_) => EntityKind::Ball,
            Payload::Snake(_) => EntityKind::SnakeBoss,
        }
    }

    pub fn as_ball(&self) -> Option<(&Body, &BallData)> {
        match &self.payload {
            Payload::Ball(data) => Some((&self.body, data)),
            _ => None,
        }
    }

    pub fn as_ball_mut(&mut self) -> Option<(&mut Body, &mut BallData)> {
        match &mut self.payload {
            Payload::Ball(data) => Some((&mut self.body, data)),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<(&Body, &PlayerData)> {
        match &self.payload {
            Payload::Player(data) => Some((&self.body, data)),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<(&mut Body, &mut PlayerData)> {
        match &mut self.payload {
            Payload::Player(data) => Some((&mut self.body, data)),
            _ => None,
        }
    }

    pub fn as_snake(&self) -> Option<(&Body, &SnakeBoss)> {
        match &self.payload {
            Payload::Snake(boss) => Some((&self.body, boss)),
            _ => None,
        }
    }

    pub fn as_snake_mut(&mut self) -> Option<(&mut Body, &mut SnakeBoss)> {
        match &mut self.payload {
            Payload::Snake(boss) => Some((&mut self.body, boss)),
            _ => None,
        }
    }
}
