//! Game state and orchestration types
//!
//! Everything needed to continue a game or replay it deterministically lives here.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{BallData, BallKind, Ownership};
use super::entity::{Body, Direction, Entity, Payload};
use super::goal::{Match, Scorer};
use super::hole::{HoleState, WinHole};
use super::player::PlayerData;
use super::snake::SnakeBoss;
use super::world::World;
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::error::SimError;
use crate::tuning::Tuning;
use crate::world_to_cell;

/// Segments the boss starts a game with
pub const BOSS_START_SEGMENTS: usize = 5;

/// Win-hole centre in the fixed arena
pub const HOLE_POS: Vec2 = Vec2::new(304.0, 320.0);

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    /// Every boss defeated
    Victory,
    /// Player health ran out
    GameOver,
}

/// Which scoring target a game is played with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    WinHole,
    Match,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scoring {
    Hole(WinHole),
    Match(Match),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Head,
    Body,
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    OwnershipChanged { from: Ownership, to: Ownership },
    /// Boss grew by swallowing a non-player ball
    BallEaten { boss: u32, segments: usize },
    /// Player-owned ball shrank the boss
    BossStruck { boss: u32, segments: usize },
    BossDefeated { boss: u32 },
    PlayerHit { contact: ContactKind, health: f32 },
    LevelUp { level: u32 },
    HoleCaptured(HoleState),
    BallEjected { angle: f32 },
    GoalScored(Scorer),
    NeutralBallReset,
    MatchFinished { player: u32, enemy: u32 },
    PhaseChanged(GamePhase),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub world: World,
    /// Game RNG; drives ejection angles and effect jitter
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Entity,
    pub ball: Option<Entity>,
    /// Enemies in spawn order
    pub enemies: Vec<Entity>,
    pub scoring: Scoring,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Win-hole game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default(), GameMode::WinHole)
    }

    /// Build the arena, player, ball, boss and scoring target. A ball or boss
    /// that cannot be spawned is logged and left out.
    pub fn with_tuning(seed: u64, tuning: Tuning, mode: GameMode) -> Self {
        let mut world = World::arena();
        let scoring = match mode {
            GameMode::WinHole => Scoring::Hole(WinHole::new(HOLE_POS, &tuning.hole)),
            GameMode::Match => Scoring::Match(Match::new(&mut world, &tuning.goal)),
        };

        let center = world.center();
        let player = Entity::new(
            1,
            Body::new(center - Vec2::new(100.0, 0.0), Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT) / 2.0),
            Payload::Player(PlayerData::new(&tuning.player)),
        );

        let mut state = Self {
            seed,
            tuning,
            world,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            player,
            ball: None,
            enemies: Vec::new(),
            scoring,
            events: Vec::new(),
            next_id: 2,
        };

        if let Err(err) = state.spawn_ball(center - Vec2::new(0.0, 50.0), BallKind::Normal) {
            log::error!("Failed to create ball: {}", err);
        }
        let boss_cell = world_to_cell(center + Vec2::new(50.0, 100.0));
        if let Err(err) = state.spawn_snake_boss(boss_cell, BOSS_START_SEGMENTS, Direction::Right) {
            log::error!("Failed to create snake boss, continuing without it: {}", err);
        }

        log::info!("Game created (seed {}, {:?})", seed, mode);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place the game ball at `pos`, replacing any existing one
    pub fn spawn_ball(&mut self, pos: Vec2, kind: BallKind) -> Result<u32, SimError> {
        if self.world.is_wall_at(pos) {
            let cell = world_to_cell(pos);
            return Err(SimError::BlockedSpawn { x: cell.x, y: cell.y });
        }

        let id = self.next_entity_id();
        let data = BallData::new(kind, &self.tuning);
        let body = Body::new(pos, Vec2::splat(data.radius));
        self.ball = Some(Entity::new(id, body, Payload::Ball(data)));

        log::info!("Ball {} ({:?}) created at ({:.1}, {:.1})", id, kind, pos.x, pos.y);
        Ok(id)
    }

    /// Add a boss with its head at `head` and the body trailing along `body_dir`.
    /// Fails without touching the enemy list if any segment would sit in a wall.
    pub fn spawn_snake_boss(
        &mut self,
        head: IVec2,
        length: usize,
        body_dir: Direction,
    ) -> Result<u32, SimError> {
        let mut boss = SnakeBoss::new(head, length, &self.tuning.snake)?;
        boss.lay_out(head, body_dir);

        if let Some(blocked) = boss.segments().iter().find(|s| self.world.is_wall_cell(s.cell)) {
            return Err(SimError::BlockedSpawn { x: blocked.cell.x, y: blocked.cell.y });
        }

        let id = self.next_entity_id();
        let radius = self.tuning.snake.head_radius;
        let body = Body::new(boss.head().pos, Vec2::splat(radius));
        self.enemies.push(Entity::new(id, body, Payload::Snake(boss)));
        Ok(id)
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        self.player.as_player().map(|(_, data)| data)
    }

    pub fn ball_data(&self) -> Option<(&Body, &BallData)> {
        self.ball.as_ref().and_then(Entity::as_ball)
    }

    /// Grid cell of the active ball, if any
    pub fn ball_cell(&self) -> Option<IVec2> {
        self.ball_data().filter(|(body, _)| body.active).map(|(body, _)| world_to_cell(body.pos))
    }

    pub fn bosses(&self) -> impl Iterator<Item = (u32, &SnakeBoss)> {
        self.enemies.iter().filter_map(|e| e.as_snake().map(|(_, boss)| (e.id, boss)))
    }

    /// At least one boss was spawned and every boss is defeated
    pub fn all_bosses_defeated(&self) -> bool {
        let mut bosses = self.bosses().peekable();
        bosses.peek().is_some() && bosses.all(|(_, boss)| boss.is_defeated())
    }

    /// Keep enemies in ID order for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}
