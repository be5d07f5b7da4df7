//! Data-driven game balance
//!
//! Every gameplay knob lives here as one named set. `Tuning::DEFAULT` is the
//! build-time balance; a JSON override can replace any subset of it.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::ball::BallKind;

/// Ball physics shared by every ball kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub radius: f32,
    /// Speed cap (world units per tick)
    pub max_speed: f32,
    /// Residual per-axis speed below which the ball stops
    pub rest_threshold: f32,
    /// Speed given by a player touch along the contact normal
    pub player_push_force: f32,
    /// Share of the player's own velocity transferred on contact
    pub player_momentum_share: f32,
}

impl BallTuning {
    pub const DEFAULT: Self = Self {
        radius: 4.0,
        max_speed: 8.0,
        rest_threshold: 0.1,
        player_push_force: 5.0,
        player_momentum_share: 0.5,
    };
}

impl Default for BallTuning {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-kind coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallKindTuning {
    pub bounce: f32,
    pub friction: f32,
    pub damage: f32,
}

impl BallKindTuning {
    pub const NORMAL: Self = Self { bounce: 0.8, friction: 0.98, damage: 10.0 };
    pub const FIRE: Self = Self { bounce: 0.8, friction: 0.98, damage: 15.0 };
    pub const ICE: Self = Self { bounce: 0.95, friction: 0.99, damage: 8.0 };
    pub const LIGHTNING: Self = Self { bounce: 0.7, friction: 0.98, damage: 20.0 };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallKindTable {
    pub normal: BallKindTuning,
    pub fire: BallKindTuning,
    pub ice: BallKindTuning,
    pub lightning: BallKindTuning,
}

impl BallKindTable {
    pub const DEFAULT: Self = Self {
        normal: BallKindTuning::NORMAL,
        fire: BallKindTuning::FIRE,
        ice: BallKindTuning::ICE,
        lightning: BallKindTuning::LIGHTNING,
    };

    pub fn get(&self, kind: BallKind) -> BallKindTuning {
        match kind {
            BallKind::Normal => self.normal,
            BallKind::Fire => self.fire,
            BallKind::Ice => self.ice,
            BallKind::Lightning => self.lightning,
        }
    }
}

impl Default for BallKindTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub accel: f32,
    pub decel: f32,
    pub max_speed: f32,
    pub xp_per_level: u32,
}

impl PlayerTuning {
    pub const DEFAULT: Self = Self {
        max_health: 100.0,
        accel: 7.0,
        decel: 2.5,
        max_speed: 1.5,
        xp_per_level: 100,
    };
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    /// Seconds between grid steps at spawn (also the slowest the boss gets)
    pub initial_move_interval: f32,
    pub min_move_interval: f32,
    /// Interval change per segment gained or lost
    pub interval_step: f32,
    pub grow_duration: f32,
    pub shrink_duration: f32,
    pub head_radius: f32,
    /// Half the side of a body segment's bounding box
    pub segment_half_size: f32,
    /// Refresh the target from the live ball every N successful moves
    pub refresh_every_moves: u32,
    /// Offset multiplier for the bounce after a player-owned hit
    pub hit_push: f32,
    /// Offset multiplier for the kick after eating the ball
    pub eat_kick: f32,
    pub head_contact_damage: f32,
    pub body_contact_damage: f32,
    pub head_knockback: f32,
    pub body_knockback: f32,
    pub xp_per_hit: u32,
}

impl SnakeTuning {
    pub const DEFAULT: Self = Self {
        initial_move_interval: 0.2,
        min_move_interval: 0.05,
        interval_step: 0.05,
        grow_duration: 2.0,
        shrink_duration: 2.0,
        head_radius: 6.0,
        segment_half_size: 4.0,
        refresh_every_moves: 3,
        hit_push: 0.5,
        eat_kick: 6.0,
        head_contact_damage: 10.0,
        body_contact_damage: 5.0,
        head_knockback: 5.0,
        body_knockback: 3.0,
        xp_per_hit: 25,
    };
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleTuning {
    pub radius: f32,
    /// Share of the ball radius the centre must clear to count as inside
    pub capture_fraction: f32,
    pub hold_duration: f32,
    pub eject_speed: f32,
    pub enemy_score_damage: f32,
    pub player_score_shrinks: u32,
    pub beam_particles: usize,
    pub beam_particle_speed: f32,
    pub beam_particle_size: f32,
    pub flash_duration: f32,
}

impl HoleTuning {
    pub const DEFAULT: Self = Self {
        radius: 15.0,
        capture_fraction: 0.8,
        hold_duration: 2.0,
        eject_speed: 3.0,
        enemy_score_damage: 20.0,
        player_score_shrinks: 3,
        beam_particles: 30,
        beam_particle_speed: 40.0,
        beam_particle_size: 2.0,
        flash_duration: 1.5,
    };
}

impl Default for HoleTuning {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalTuning {
    pub width_tiles: i32,
    pub height_tiles: i32,
    pub match_duration: f32,
    pub celebration_duration: f32,
    /// Boss shrinks once per 10 points of this
    pub player_goal_damage: f32,
    pub enemy_goal_damage: f32,
}

impl GoalTuning {
    pub const DEFAULT: Self = Self {
        width_tiles: 10,
        height_tiles: 6,
        match_duration: 180.0,
        celebration_duration: 3.0,
        player_goal_damage: 20.0,
        enemy_goal_damage: 15.0,
    };
}

impl Default for GoalTuning {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The complete balance set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ball: BallTuning,
    pub ball_kinds: BallKindTable,
    pub player: PlayerTuning,
    pub snake: SnakeTuning,
    pub hole: HoleTuning,
    pub goal: GoalTuning,
}

impl Tuning {
    pub const DEFAULT: Self = Self {
        ball: BallTuning::DEFAULT,
        ball_kinds: BallKindTable::DEFAULT,
        player: PlayerTuning::DEFAULT,
        snake: SnakeTuning::DEFAULT,
        hole: HoleTuning::DEFAULT,
        goal: GoalTuning::DEFAULT,
    };

    /// Parse a (possibly partial) override; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning override");
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("ball.radius", self.ball.radius),
            ("ball.max_speed", self.ball.max_speed),
            ("snake.initial_move_interval", self.snake.initial_move_interval),
            ("snake.min_move_interval", self.snake.min_move_interval),
            ("snake.head_radius", self.snake.head_radius),
            ("snake.segment_half_size", self.snake.segment_half_size),
            ("hole.radius", self.hole.radius),
            ("hole.hold_duration", self.hole.hold_duration),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SimError::InvalidTuning(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.snake.min_move_interval > self.snake.initial_move_interval {
            return Err(SimError::InvalidTuning(
                "snake.min_move_interval exceeds snake.initial_move_interval".to_string(),
            ));
        }
        if self.snake.refresh_every_moves == 0 {
            return Err(SimError::InvalidTuning(
                "snake.refresh_every_moves must be at least 1".to_string(),
            ));
        }
        if self.goal.width_tiles < 3 || self.goal.height_tiles < 3 {
            return Err(SimError::InvalidTuning(format!(
                "goal must be at least 3x3 tiles, got {}x{}",
                self.goal.width_tiles, self.goal.height_tiles
            )));
        }
        Ok(())
    }
}
