//! Rectangular goal and timed match
//!
//! Alternate scoring mode to the win-hole. The goal frame is stamped into the
//! world as wall tiles (crossbar along the top, a post either side, open at
//! the bottom) and the ball scores by entering the net behind the posts.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::ball::{self, Ownership};
use super::collision::{Rect, circle_rect};
use super::entity::{Direction, Entity};
use super::player;
use super::world::{TileKind, World};
use crate::consts::{TILE_HEIGHT, TILE_WIDTH};
use crate::tuning::{GoalTuning, Tuning};
use crate::world_to_cell;

/// Tile row of the goal's crossbar
const GOAL_TOP_ROW: i32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    Playing,
    /// Celebrating a goal; positions reset when it ends
    Goal,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scorer {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Top-left tile of the frame
    pub cell: IVec2,
    pub width: i32,
    pub height: i32,
    /// Whole frame in world units
    pub area: Rect,
    /// Inside of the frame, where the ball must go
    pub net_entrance: Rect,
}

impl Goal {
    /// Centre the goal horizontally near the top of `world` and stamp its frame
    pub fn new(world: &mut World, tuning: &GoalTuning) -> Self {
        let width = tuning.width_tiles;
        let height = tuning.height_tiles;
        let cell = IVec2::new((world.width - width) / 2, GOAL_TOP_ROW);
        let tile = Vec2::new(TILE_WIDTH, TILE_HEIGHT);
        let min = cell.as_vec2() * tile;

        let goal = Self {
            cell,
            width,
            height,
            area: Rect { min, size: IVec2::new(width, height).as_vec2() * tile },
            net_entrance: Rect {
                min: (cell + IVec2::ONE).as_vec2() * tile,
                size: IVec2::new(width - 2, height - 2).as_vec2() * tile,
            },
        };
        goal.stamp(world);

        log::info!("Goal at tile ({}, {}) size {}x{}", cell.x, cell.y, width, height);
        goal
    }

    fn stamp(&self, world: &mut World) {
        let right = self.cell.x + self.width - 1;
        let bottom = self.cell.y + self.height - 1;

        for y in self.cell.y..=bottom {
            for x in self.cell.x..=right {
                world.set_tile(IVec2::new(x, y), TileKind::Empty);
            }
        }
        for x in self.cell.x..=right {
            world.set_tile(IVec2::new(x, self.cell.y), TileKind::Wall);
        }
        for y in self.cell.y..=bottom {
            world.set_tile(IVec2::new(self.cell.x, y), TileKind::Wall);
            world.set_tile(IVec2::new(right, y), TileKind::Wall);
        }
    }

    pub fn center(&self) -> Vec2 {
        self.area.center()
    }

    /// How close to the centre the ball must get to count
    pub fn capture_distance(&self) -> f32 {
        self.area.size.element_sum() / 5.0
    }

    /// Ball overlaps the net and is deep enough inside
    pub fn contains_ball(&self, pos: Vec2, radius: f32) -> bool {
        circle_rect(pos, radius, &self.net_entrance).hit
            && pos.distance(self.center()) < self.capture_distance()
    }
}

/// What a single match update did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchUpdate {
    pub scored: Option<Scorer>,
    /// A neutral ball entered the goal and was sent back to the kick-off spot
    pub neutral_reset: bool,
    pub positions_reset: bool,
    pub finished: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub state: MatchState,
    pub last_scorer: Option<Scorer>,
    pub goal: Goal,
    pub player_score: u32,
    pub enemy_score: u32,
    pub match_time: f32,
    /// Countdown in seconds
    pub time_left: f32,
    pub celebration_timer: f32,
}

impl Match {
    pub fn new(world: &mut World, tuning: &GoalTuning) -> Self {
        let goal = Goal::new(world, tuning);
        log::info!("Match created, {:.0} seconds on the clock", tuning.match_duration);
        Self {
            state: MatchState::Playing,
            last_scorer: None,
            goal,
            player_score: 0,
            enemy_score: 0,
            match_time: tuning.match_duration,
            time_left: tuning.match_duration,
            celebration_timer: 0.0,
        }
    }

    pub fn update(
        &mut self,
        ball: Option<&mut Entity>,
        player: &mut Entity,
        enemies: &mut [Entity],
        arena_center: Vec2,
        tuning: &Tuning,
        dt: f32,
    ) -> MatchUpdate {
        let mut outcome = MatchUpdate::default();

        match self.state {
            MatchState::Playing => {
                self.time_left -= dt;
                if self.time_left <= 0.0 {
                    self.time_left = 0.0;
                    self.state = MatchState::Finished;
                    log::info!(
                        "Match finished, final score {} - {}",
                        self.player_score,
                        self.enemy_score
                    );
                    outcome.finished = true;
                    return outcome;
                }

                let Some(ball) = ball else {
                    return outcome;
                };
                match self.check_goal(ball, arena_center) {
                    GoalCheck::Scored(scorer) => {
                        self.handle_goal(scorer, player, enemies, tuning);
                        outcome.scored = Some(scorer);
                    }
                    GoalCheck::NeutralReset => outcome.neutral_reset = true,
                    GoalCheck::None => {}
                }
            }
            MatchState::Goal => {
                self.celebration_timer += dt;
                if self.celebration_timer >= tuning.goal.celebration_duration {
                    self.celebration_timer = 0.0;
                    self.state = MatchState::Playing;
                    self.reset_positions(ball, player, enemies, arena_center);
                    outcome.positions_reset = true;
                }
            }
            MatchState::Finished => {}
        }

        outcome
    }

    /// Attribute a ball in the goal to whoever owns it. A neutral ball is
    /// sent back to the kick-off spot instead.
    pub fn check_goal(&self, ball: &mut Entity, arena_center: Vec2) -> GoalCheck {
        if self.state != MatchState::Playing {
            return GoalCheck::None;
        }
        let Some((body, data)) = ball.as_ball_mut() else {
            return GoalCheck::None;
        };
        if !body.active || !self.goal.contains_ball(body.pos, data.radius) {
            return GoalCheck::None;
        }

        match data.ownership {
            Ownership::Player => GoalCheck::Scored(Scorer::Player),
            Ownership::Enemy => GoalCheck::Scored(Scorer::Enemy),
            Ownership::Neutral => {
                log::info!("Neutral ball in goal, back to kick-off");
                ball::reset(body, kick_off(arena_center));
                GoalCheck::NeutralReset
            }
        }
    }

    /// Record the goal, start the celebration and apply the scorer's effect
    pub fn handle_goal(
        &mut self,
        scorer: Scorer,
        player: &mut Entity,
        enemies: &mut [Entity],
        tuning: &Tuning,
    ) {
        self.state = MatchState::Goal;
        self.last_scorer = Some(scorer);
        self.celebration_timer = 0.0;

        match scorer {
            Scorer::Player => {
                self.player_score += 1;
                let shrinks = (tuning.goal.player_goal_damage / 10.0) as u32;
                for enemy in enemies.iter_mut() {
                    if let Some((_, boss)) = enemy.as_snake_mut() {
                        if boss.is_defeated() {
                            continue;
                        }
                        let removed = boss.trim(shrinks, &tuning.snake);
                        log::info!("Goal shrank snake boss by {} segments", removed);
                    }
                }
            }
            Scorer::Enemy => {
                self.enemy_score += 1;
                if let Some((_, data)) = player.as_player_mut() {
                    let health = data.take_damage(tuning.goal.enemy_goal_damage);
                    log::info!("Player took goal damage, health {:.1}", health);
                }
            }
        }

        log::info!("Goal by {:?}, score {} - {}", scorer, self.player_score, self.enemy_score);
    }

    /// Kick-off layout: ball above centre, player left of centre, boss below
    /// and to the right with its body trailing right
    pub fn reset_positions(
        &self,
        ball: Option<&mut Entity>,
        player: &mut Entity,
        enemies: &mut [Entity],
        arena_center: Vec2,
    ) {
        if let Some((body, _)) = ball.and_then(Entity::as_ball_mut) {
            ball::reset(body, kick_off(arena_center));
        }
        player::reset(&mut player.body, arena_center - Vec2::new(100.0, 0.0));

        let boss_cell = world_to_cell(arena_center + Vec2::new(50.0, 100.0));
        for enemy in enemies.iter_mut() {
            if let Some((body, boss)) = enemy.as_snake_mut() {
                boss.lay_out(boss_cell, Direction::Right);
                body.pos = boss.head().pos;
                body.vel = Vec2::ZERO;
            }
        }
        log::info!("Positions reset after goal");
    }

    pub fn clock(&self) -> String {
        format_clock(self.time_left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalCheck {
    None,
    Scored(Scorer),
    NeutralReset,
}

#[inline]
fn kick_off(arena_center: Vec2) -> Vec2 {
    arena_center - Vec2::new(0.0, 50.0)
}

/// Whole seconds as MM:SS
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::consts::SIM_DT;
    use crate::sim::ball::{BallData, BallKind};
    use crate::sim::entity::{Body, Payload};
    use crate::sim::player::PlayerData;
    use crate::sim::snake::{SnakeBoss, SnakeState};

    struct Fixture {
        world: World,
        game: Match,
        ball: Entity,
        player: Entity,
        enemies: Vec<Entity>,
        tuning: Tuning,
    }

    fn fixture(ownership: Ownership, boss_length: usize) -> Fixture {
        let tuning = Tuning::default();
        let mut world = World::arena();
        let game = Match::new(&mut world, &tuning.goal);

        let mut data = BallData::new(BallKind::Normal, &tuning);
        data.ownership = ownership;
        let ball =
            Entity::new(1, Body::new(game.goal.center(), Vec2::splat(4.0)), Payload::Ball(data));
        let player = Entity::new(
            2,
            Body::new(Vec2::new(200.0, 400.0), Vec2::splat(8.0)),
            Payload::Player(PlayerData::new(&tuning.player)),
        );
        let boss = SnakeBoss::new(IVec2::new(30, 80), boss_length, &tuning.snake).unwrap();
        let boss_body = Body::new(boss.head().pos, Vec2::splat(4.0));
        let enemies = vec![Entity::new(3, boss_body, Payload::Snake(boss))];

        Fixture { world, game, ball, player, enemies, tuning }
    }

    impl Fixture {
        fn tick(&mut self, dt: f32) -> MatchUpdate {
            let center = self.world.center();
            self.game.update(
                Some(&mut self.ball),
                &mut self.player,
                &mut self.enemies,
                center,
                &self.tuning,
                dt,
            )
        }

        fn boss(&self) -> &SnakeBoss {
            self.enemies[0].as_snake().map(|(_, b)| b).unwrap()
        }

        fn health(&self) -> f32 {
            self.player.as_player().map(|(_, p)| p.health).unwrap()
        }
    }

    #[test]
    fn test_goal_geometry_in_arena() {
        let f = fixture(Ownership::Neutral, 3);
        let goal = &f.game.goal;
        assert_eq!(goal.cell, IVec2::new(33, 21));
        assert_eq!(goal.center(), Vec2::new(304.0, 192.0));
        assert!((goal.capture_distance() - 25.6).abs() < 0.001);
        assert_eq!(goal.net_entrance.min, Vec2::new(272.0, 176.0));
        assert_eq!(goal.net_entrance.size, Vec2::new(64.0, 32.0));
    }

    #[test]
    fn test_goal_frame_is_stamped() {
        let f = fixture(Ownership::Neutral, 3);
        assert!(f.world.is_wall_cell(IVec2::new(33, 21)));
        assert!(f.world.is_wall_cell(IVec2::new(38, 21)));
        assert!(f.world.is_wall_cell(IVec2::new(33, 26)));
        assert!(f.world.is_wall_cell(IVec2::new(42, 26)));
        // Mouth and net stay open
        assert!(!f.world.is_wall_cell(IVec2::new(38, 26)));
        assert!(!f.world.is_wall_cell(IVec2::new(38, 23)));
    }

    #[test]
    fn test_player_goal_trims_boss() {
        let mut f = fixture(Ownership::Player, 5);
        let outcome = f.tick(SIM_DT);

        assert_eq!(outcome.scored, Some(Scorer::Player));
        assert_eq!(f.game.state, MatchState::Goal);
        assert_eq!(f.game.player_score, 1);
        assert_eq!(f.boss().segment_count(), 3);
    }

    #[test]
    fn test_player_goal_never_defeats_boss() {
        let mut f = fixture(Ownership::Player, 2);
        f.tick(SIM_DT);
        assert_eq!(f.boss().segment_count(), 1);
        assert_ne!(f.boss().state, SnakeState::Defeated);
    }

    #[test]
    fn test_enemy_goal_damages_player() {
        let mut f = fixture(Ownership::Enemy, 3);
        let outcome = f.tick(SIM_DT);

        assert_eq!(outcome.scored, Some(Scorer::Enemy));
        assert_eq!(f.game.enemy_score, 1);
        assert!((f.health() - 85.0).abs() < 0.001);
        assert_eq!(f.game.last_scorer, Some(Scorer::Enemy));
    }

    #[test]
    fn test_neutral_ball_goes_back_to_kick_off() {
        let mut f = fixture(Ownership::Neutral, 3);
        let outcome = f.tick(SIM_DT);

        assert!(outcome.neutral_reset);
        assert_eq!(outcome.scored, None);
        assert_eq!(f.game.player_score + f.game.enemy_score, 0);
        assert_eq!(f.ball.body.pos, Vec2::new(304.0, 430.0));
        assert_eq!(f.game.state, MatchState::Playing);
    }

    #[test]
    fn test_ball_outside_net_does_not_score() {
        let mut f = fixture(Ownership::Player, 3);
        f.ball.body.pos = Vec2::new(304.0, 260.0);
        assert_eq!(f.tick(SIM_DT), MatchUpdate::default());
    }

    #[test]
    fn test_celebration_resets_positions() {
        let mut f = fixture(Ownership::Player, 4);
        f.tick(SIM_DT);
        assert!(!f.tick(2.0).positions_reset);

        let outcome = f.tick(1.5);
        assert!(outcome.positions_reset);
        assert_eq!(f.game.state, MatchState::Playing);
        assert_eq!(f.ball.body.pos, Vec2::new(304.0, 430.0));
        assert_eq!(f.ball.body.vel, Vec2::ZERO);
        assert_eq!(f.player.body.pos, Vec2::new(204.0, 480.0));

        let boss = f.boss();
        assert_eq!(boss.head().cell, IVec2::new(44, 72));
        assert_eq!(boss.segments()[1].cell, IVec2::new(45, 72));
        assert_eq!(boss.state, SnakeState::Tracking);
        assert_eq!(f.enemies[0].body.pos, boss.head().pos);
    }

    #[test]
    fn test_clock_runs_out() {
        let mut f = fixture(Ownership::Neutral, 3);
        f.ball.body.pos = Vec2::new(304.0, 430.0);
        let outcome = f.tick(f.tuning.goal.match_duration + 1.0);

        assert!(outcome.finished);
        assert_eq!(f.game.state, MatchState::Finished);
        assert_eq!(f.game.time_left, 0.0);
        assert_eq!(f.game.clock(), "00:00");
        assert_eq!(f.tick(SIM_DT), MatchUpdate::default());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180.0), "03:00");
        assert_eq!(format_clock(65.9), "01:05");
        assert_eq!(format_clock(-3.0), "00:00");
    }
}
