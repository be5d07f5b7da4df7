//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies by entity ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod entity;
pub mod goal;
pub mod hole;
pub mod player;
pub mod snake;
pub mod state;
pub mod tick;
pub mod world;

pub use ball::{BallData, BallKind, Ownership};
pub use collision::{CollisionResult, Rect, circle_circle, circle_rect, reflect_velocity};
pub use entity::{Body, Direction, Entity, EntityKind, Payload};
pub use goal::{Goal, Match, MatchState, Scorer, format_clock};
pub use hole::{HoleState, WinHole};
pub use player::PlayerData;
pub use snake::{BallHit, PlayerContact, Segment, SnakeBoss, SnakeState};
pub use state::{ContactKind, GameEvent, GameMode, GamePhase, GameState, Scoring};
pub use tick::{TickInput, tick};
pub use world::{TileKind, World};
