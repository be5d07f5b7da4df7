//! Snake boss controller
//!
//! A segmented enemy that moves one grid cell at a time toward the ball.
//! Pathing is a greedy one-step choice: of the four neighbour cells that are
//! free (no wall, no body segment, not a reversal) take the one with the
//! smallest Manhattan distance to the target.
//!
//! State machine:
//! ```text
//! Idle -> Moving -> Tracking -> Moving -> ...
//!            \-> Growing / Shrinking (timed) -> Tracking
//!            \-> Defeated (terminal)
//! ```

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::ball::{self, BallData, Ownership};
use super::collision::{Rect, circle_circle, circle_rect};
use super::entity::{Body, Direction};
use super::player::PlayerData;
use super::world::World;
use crate::cell_center;
use crate::error::SimError;
use crate::tuning::{SnakeTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnakeState {
    /// Not yet targeting anything
    #[default]
    Idle,
    /// Re-acquiring the ball and planning the next step
    Tracking,
    Moving,
    Growing,
    Shrinking,
    Defeated,
}

/// One body unit; index 0 is the head
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub cell: IVec2,
    /// Centre of `cell` in world units
    pub pos: Vec2,
}

impl Segment {
    fn at(cell: IVec2) -> Self {
        Self { cell, pos: cell_center(cell) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeBoss {
    segments: Vec<Segment>,
    pub state: SnakeState,
    pub current_dir: Direction,
    pub next_dir: Direction,
    pub target: IVec2,
    pub has_target: bool,
    pub move_timer: f32,
    pub move_interval: f32,
    /// Time spent in the current Growing/Shrinking state
    pub state_timer: f32,
    /// Successful moves since the target was last refreshed
    pub moves_since_refresh: u32,
}

/// Outcome of a ball/boss overlap check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallHit {
    None,
    /// Overlap ignored (boss already mid grow/shrink)
    Ignored,
    /// Non-player ball swallowed; boss grew and kicked it away
    Eaten,
    /// Player-owned ball struck the head or a body segment
    Struck { defeated: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerContact {
    None,
    Head,
    Body,
}

impl SnakeBoss {
    /// Create a boss with its head at `head` and the body trailing to the left
    pub fn new(head: IVec2, length: usize, tuning: &SnakeTuning) -> Result<Self, SimError> {
        if length == 0 {
            return Err(SimError::InvalidSegmentCount(length));
        }

        let segments = (0..length as i32)
            .map(|i| Segment::at(head - IVec2::new(i, 0)))
            .collect();

        log::info!("Snake boss created at ({}, {}) with {} segments", head.x, head.y, length);

        Ok(Self {
            segments,
            state: SnakeState::Idle,
            current_dir: Direction::Right,
            next_dir: Direction::Right,
            target: head,
            has_target: false,
            move_timer: 0.0,
            move_interval: tuning.initial_move_interval,
            state_timer: 0.0,
            moves_since_refresh: 0,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn head(&self) -> Segment {
        self.segments[0]
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_defeated(&self) -> bool {
        self.state == SnakeState::Defeated
    }

    /// A cell the head may enter: not solid and not covered by a body segment
    pub fn is_valid_cell(&self, cell: IVec2, world: &World) -> bool {
        if world.is_wall_at(cell_center(cell)) {
            return false;
        }
        !self.segments[1..].iter().any(|s| s.cell == cell)
    }

    /// Greedy one-step choice toward `target`. `None` if every neighbour is blocked.
    pub fn choose_direction(&self, target: IVec2, world: &World) -> Option<Direction> {
        let head = self.head().cell;
        let reverse = self.current_dir.opposite();

        let mut best: Option<(Direction, i32)> = None;
        for dir in Direction::ALL {
            if dir == reverse {
                continue;
            }
            let cell = head + dir.delta();
            if !self.is_valid_cell(cell, world) {
                continue;
            }
            let dist = manhattan(cell, target);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((dir, dist));
            }
        }
        best.map(|(dir, _)| dir)
    }

    /// Queue the next direction toward `target`, keeping the current one when boxed in
    pub fn find_path(&mut self, target: IVec2, world: &World) {
        let head = self.head().cell;
        match self.choose_direction(target, world) {
            Some(dir) => {
                log::debug!(
                    "Snake at ({}, {}) -> target ({}, {}): {:?}, distance {} -> {}",
                    head.x,
                    head.y,
                    target.x,
                    target.y,
                    dir,
                    manhattan(head, target),
                    manhattan(head + dir.delta(), target)
                );
                self.next_dir = dir;
            }
            None => {
                log::warn!(
                    "Snake at ({}, {}) has no valid direction, keeping {:?}",
                    head.x,
                    head.y,
                    self.current_dir
                );
                self.next_dir = self.current_dir;
            }
        }
    }

    /// Step the head one cell along `current_dir`, shifting the body forward.
    /// Returns false (and changes nothing) if the cell is blocked.
    pub fn try_move(&mut self, world: &World) -> bool {
        let next = self.head().cell + self.current_dir.delta();
        if !self.is_valid_cell(next, world) {
            return false;
        }

        for i in (1..self.segments.len()).rev() {
            self.segments[i].cell = self.segments[i - 1].cell;
        }
        self.segments[0].cell = next;
        self.sync_segments();
        true
    }

    /// Recompute world coordinates from grid cells
    pub fn sync_segments(&mut self) {
        for segment in &mut self.segments {
            segment.pos = cell_center(segment.cell);
        }
    }

    /// Append a copy of the tail and speed up (bounded)
    pub fn grow(&mut self, tuning: &SnakeTuning) {
        let tail = self.segments[self.segments.len() - 1];
        self.segments.push(tail);
        self.move_interval =
            (self.move_interval - tuning.interval_step).max(tuning.min_move_interval);
        log::info!(
            "Snake grew to {} segments (interval {:.3}s)",
            self.segments.len(),
            self.move_interval
        );
    }

    /// Drop the tail and slow down (bounded). Returns false when only the head
    /// remains; the head is never removed.
    pub fn shrink(&mut self, tuning: &SnakeTuning) -> bool {
        if self.segments.len() <= 1 {
            return false;
        }
        self.segments.pop();
        self.move_interval =
            (self.move_interval + tuning.interval_step).min(tuning.initial_move_interval);
        log::info!(
            "Snake shrank to {} segments (interval {:.3}s)",
            self.segments.len(),
            self.move_interval
        );
        true
    }

    /// Shrink `count` times, marking the boss defeated if it runs out.
    /// Returns true if the boss is defeated afterwards.
    pub fn take_shrinks(&mut self, count: u32, tuning: &SnakeTuning) -> bool {
        if self.is_defeated() {
            return true;
        }
        for _ in 0..count {
            if !self.shrink(tuning) {
                self.defeat();
                return true;
            }
        }
        false
    }

    /// Shrink up to `count` times but never below one segment and never defeat
    pub fn trim(&mut self, count: u32, tuning: &SnakeTuning) -> u32 {
        let mut removed = 0;
        while removed < count && self.segments.len() > 1 {
            self.shrink(tuning);
            removed += 1;
        }
        removed
    }

    fn defeat(&mut self) {
        log::info!("Snake boss defeated");
        self.state = SnakeState::Defeated;
    }

    pub fn set_state(&mut self, state: SnakeState) {
        self.state = state;
        self.state_timer = 0.0;
    }

    /// Place the head at `head` with the body laid out along `body_dir`,
    /// facing away from the body, and force a replan
    pub fn lay_out(&mut self, head: IVec2, body_dir: Direction) {
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.cell = head + body_dir.delta() * i as i32;
        }
        self.sync_segments();
        self.current_dir = body_dir.opposite();
        self.next_dir = self.current_dir;
        self.move_timer = 0.0;
        self.moves_since_refresh = 0;
        self.has_target = false;
        if !self.is_defeated() {
            self.set_state(SnakeState::Tracking);
        }
    }

    /// Advance the state machine by `dt`. `ball_cell` is the ball's current
    /// grid cell, `None` when there is no ball to chase.
    pub fn update(
        &mut self,
        world: &World,
        ball_cell: Option<IVec2>,
        tuning: &SnakeTuning,
        dt: f32,
    ) {
        match self.state {
            SnakeState::Idle | SnakeState::Tracking => {
                if let Some(cell) = ball_cell {
                    self.target = cell;
                    self.has_target = true;
                    self.find_path(cell, world);
                    self.state = SnakeState::Moving;
                }
            }
            SnakeState::Moving => self.update_moving(world, ball_cell, tuning, dt),
            SnakeState::Growing => {
                self.state_timer += dt;
                if self.state_timer >= tuning.grow_duration {
                    self.set_state(SnakeState::Tracking);
                    self.has_target = false;
                }
            }
            SnakeState::Shrinking => {
                self.state_timer += dt;
                if self.state_timer >= tuning.shrink_duration {
                    self.set_state(SnakeState::Tracking);
                    self.has_target = false;
                }
            }
            SnakeState::Defeated => {}
        }
    }

    fn update_moving(
        &mut self,
        world: &World,
        ball_cell: Option<IVec2>,
        tuning: &SnakeTuning,
        dt: f32,
    ) {
        self.move_timer += dt;
        if self.move_timer < self.move_interval {
            return;
        }
        self.move_timer = 0.0;
        self.current_dir = self.next_dir;

        let moved = self.try_move(world);
        if self.head().cell == self.target {
            self.has_target = false;
            self.state = SnakeState::Tracking;
        } else if !moved {
            self.has_target = false;
            self.state = SnakeState::Tracking;
        }

        if !moved {
            return;
        }

        // Bound target staleness between discrete steps
        self.moves_since_refresh += 1;
        if self.moves_since_refresh >= tuning.refresh_every_moves {
            self.moves_since_refresh = 0;
            if let Some(cell) = ball_cell.filter(|&cell| cell != self.target) {
                self.target = cell;
                self.find_path(cell, world);
            }
        }
    }

    /// Bounding box of a body segment
    pub fn segment_rect(&self, index: usize, tuning: &SnakeTuning) -> Option<Rect> {
        self.segments
            .get(index)
            .map(|s| Rect::from_center(s.pos, Vec2::splat(tuning.segment_half_size)))
    }

    /// Register a struck hit: shrink (or defeat) and enter the Shrinking window
    fn register_hit(&mut self, tuning: &SnakeTuning) -> bool {
        self.set_state(SnakeState::Shrinking);
        if !self.shrink(tuning) {
            self.defeat();
            return true;
        }
        false
    }
}

#[inline]
fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a - b).abs().element_sum()
}

/// Resolve the ball against the boss.
///
/// Head contact with a player-owned ball shrinks the boss, bounces the ball and
/// awards XP; head contact with any other ball grows the boss, kicks the ball
/// away and makes it enemy-owned. Body segments only react to a player-owned ball.
pub fn handle_ball(
    boss: &mut SnakeBoss,
    ball_body: &mut Body,
    ball: &mut BallData,
    player: Option<&mut PlayerData>,
    tuning: &Tuning,
) -> BallHit {
    if boss.is_defeated() || !ball_body.active {
        return BallHit::None;
    }

    let snake = &tuning.snake;
    let head = boss.head().pos;

    if circle_circle(ball_body.pos, ball.radius, head, snake.head_radius).hit {
        let offset = ball_body.pos - head;

        if ball.ownership == Ownership::Player {
            if matches!(boss.state, SnakeState::Shrinking | SnakeState::Defeated) {
                return BallHit::Ignored;
            }
            let defeated = boss.register_hit(snake);
            ball::reflect_if_approaching(ball_body, ball, offset.normalize_or_zero());
            ball::apply_force(ball_body, offset * snake.hit_push, tuning.ball.max_speed);
            award_hit_xp(player, tuning);
            log::info!("Player ball hit the snake head, {} segments left", boss.segment_count());
            return BallHit::Struck { defeated };
        }

        if boss.state == SnakeState::Growing {
            return BallHit::Ignored;
        }
        boss.set_state(SnakeState::Growing);
        boss.grow(snake);

        // Ball dead-centre on the head: kick along the heading instead
        let kick_dir = if offset.length_squared() > 0.0001 {
            offset
        } else {
            boss.current_dir.as_vec2()
        };
        ball::apply_force(ball_body, kick_dir * snake.eat_kick, tuning.ball.max_speed);
        ball.set_ownership(Ownership::Enemy);
        return BallHit::Eaten;
    }

    if ball.ownership != Ownership::Player {
        return BallHit::None;
    }

    for index in 1..boss.segment_count() {
        let Some(rect) = boss.segment_rect(index, snake) else {
            continue;
        };
        if !circle_rect(ball_body.pos, ball.radius, &rect).hit {
            continue;
        }
        if matches!(boss.state, SnakeState::Shrinking | SnakeState::Defeated) {
            return BallHit::Ignored;
        }
        let offset = ball_body.pos - rect.center();
        let defeated = boss.register_hit(snake);
        ball::reflect_if_approaching(ball_body, ball, offset.normalize_or_zero());
        ball::apply_force(ball_body, offset * snake.hit_push, tuning.ball.max_speed);
        award_hit_xp(player, tuning);
        log::info!(
            "Player ball hit snake segment {}, {} segments left",
            index,
            boss.segment_count()
        );
        return BallHit::Struck { defeated };
    }

    BallHit::None
}

fn award_hit_xp(player: Option<&mut PlayerData>, tuning: &Tuning) {
    if let Some(player) = player {
        player.award_xp(tuning.snake.xp_per_hit, tuning.player.xp_per_level);
    }
}

/// Damage and knock back the player on contact with the head or a body segment
pub fn handle_player(
    boss: &SnakeBoss,
    player_body: &mut Body,
    player: &mut PlayerData,
    tuning: &SnakeTuning,
) -> PlayerContact {
    if boss.is_defeated() {
        return PlayerContact::None;
    }

    let player_radius = ball::body_radius(player_body);
    let head = boss.head().pos;

    if circle_circle(player_body.pos, player_radius, head, tuning.head_radius).hit {
        player.take_damage(tuning.head_contact_damage);
        player_body.vel += (player_body.pos - head).normalize_or_zero() * tuning.head_knockback;
        return PlayerContact::Head;
    }

    for index in 1..boss.segment_count() {
        let Some(rect) = boss.segment_rect(index, tuning) else {
            continue;
        };
        if circle_rect(player_body.pos, player_radius, &rect).hit {
            player.take_damage(tuning.body_contact_damage);
            let away = (player_body.pos - rect.center()).normalize_or_zero();
            player_body.vel += away * tuning.body_knockback;
            return PlayerContact::Body;
        }
    }

    PlayerContact::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallKind;
    use crate::sim::world::TileKind;
    use proptest::prelude::*;

    fn open_world() -> World {
        World::new(40, 40).unwrap()
    }

    fn boss_at(head: IVec2, length: usize) -> SnakeBoss {
        SnakeBoss::new(head, length, &SnakeTuning::DEFAULT).unwrap()
    }

    fn ball_at(pos: Vec2, vel: Vec2, ownership: Ownership) -> (Body, BallData) {
        let tuning = Tuning::default();
        let mut body = Body::new(pos, Vec2::splat(tuning.ball.radius));
        body.vel = vel;
        let mut data = BallData::new(BallKind::Normal, &tuning);
        data.ownership = ownership;
        (body, data)
    }

    #[test]
    fn test_new_lays_body_left() {
        let boss = boss_at(IVec2::new(10, 10), 4);
        assert_eq!(boss.segment_count(), 4);
        assert_eq!(boss.segments()[3].cell, IVec2::new(7, 10));
        assert_eq!(boss.head().pos, Vec2::new(84.0, 84.0));
        assert_eq!(boss.state, SnakeState::Idle);
        assert!(SnakeBoss::new(IVec2::ZERO, 0, &SnakeTuning::DEFAULT).is_err());
    }

    #[test]
    fn test_path_prefers_target_axis() {
        let boss = boss_at(IVec2::new(10, 10), 3);
        let dir = boss.choose_direction(IVec2::new(15, 10), &open_world());
        assert_eq!(dir, Some(Direction::Right));
    }

    #[test]
    fn test_path_tie_breaks_up_first() {
        // Target diagonal up-right: Up and Right both reduce distance by one
        let boss = boss_at(IVec2::new(10, 10), 3);
        let dir = boss.choose_direction(IVec2::new(12, 8), &open_world());
        assert_eq!(dir, Some(Direction::Up));
    }

    #[test]
    fn test_path_never_reverses() {
        // Target directly behind: Left is the reverse, so go around
        let boss = boss_at(IVec2::new(10, 10), 1);
        let dir = boss.choose_direction(IVec2::new(5, 10), &open_world());
        assert_eq!(dir, Some(Direction::Up));
    }

    #[test]
    fn test_path_avoids_walls_and_body() {
        let mut world = open_world();
        world.set_tile(IVec2::new(11, 10), TileKind::Wall);
        let boss = boss_at(IVec2::new(10, 10), 3);
        let dir = boss.choose_direction(IVec2::new(15, 10), &world);
        assert_eq!(dir, Some(Direction::Up));
    }

    #[test]
    fn test_boxed_in_keeps_current_direction() {
        let mut world = open_world();
        for cell in [IVec2::new(11, 10), IVec2::new(10, 9), IVec2::new(10, 11)] {
            world.set_tile(cell, TileKind::Wall);
        }
        let mut boss = boss_at(IVec2::new(10, 10), 3);
        boss.next_dir = Direction::Down;
        assert_eq!(boss.choose_direction(IVec2::new(15, 10), &world), None);
        boss.find_path(IVec2::new(15, 10), &world);
        assert_eq!(boss.next_dir, Direction::Right);
        assert!(!boss.try_move(&world));
    }

    #[test]
    fn test_move_shifts_body() {
        let mut boss = boss_at(IVec2::new(10, 10), 3);
        boss.current_dir = Direction::Down;
        assert!(boss.try_move(&open_world()));
        let cells: Vec<IVec2> = boss.segments().iter().map(|s| s.cell).collect();
        assert_eq!(cells, vec![IVec2::new(10, 11), IVec2::new(10, 10), IVec2::new(9, 10)]);
        assert_eq!(boss.segments()[0].pos, cell_center(IVec2::new(10, 11)));
    }

    #[test]
    fn test_grow_and_shrink_adjust_interval() {
        let tuning = SnakeTuning::DEFAULT;
        let mut boss = boss_at(IVec2::new(10, 10), 2);
        boss.grow(&tuning);
        assert_eq!(boss.segment_count(), 3);
        assert_eq!(boss.segments()[2].cell, boss.segments()[1].cell);
        assert!((boss.move_interval - 0.15).abs() < 0.0001);

        for _ in 0..10 {
            boss.grow(&tuning);
        }
        assert!((boss.move_interval - tuning.min_move_interval).abs() < 0.0001);

        for _ in 0..20 {
            boss.shrink(&tuning);
        }
        assert_eq!(boss.segment_count(), 1);
        assert!((boss.move_interval - tuning.initial_move_interval).abs() < 0.0001);
    }

    #[test]
    fn test_shrink_at_one_segment_defeats() {
        let tuning = Tuning::default();
        let mut boss = boss_at(IVec2::new(10, 10), 1);
        let head = boss.head().pos;
        let (mut body, mut ball) =
            ball_at(head + Vec2::new(3.0, 0.0), Vec2::new(-2.0, 0.0), Ownership::Player);

        let hit = handle_ball(&mut boss, &mut body, &mut ball, None, &tuning);

        assert_eq!(hit, BallHit::Struck { defeated: true });
        assert_eq!(boss.state, SnakeState::Defeated);
        assert_eq!(boss.segment_count(), 1);

        // No further moves once defeated
        let world = open_world();
        let before = boss.head().cell;
        for _ in 0..120 {
            boss.update(&world, Some(IVec2::new(30, 30)), &tuning.snake, 1.0 / 60.0);
        }
        assert_eq!(boss.head().cell, before);
        assert_eq!(boss.state, SnakeState::Defeated);
    }

    #[test]
    fn test_player_ball_head_hit_shrinks_and_bounces() {
        let tuning = Tuning::default();
        let mut boss = boss_at(IVec2::new(10, 10), 4);
        let head = boss.head().pos;
        let (mut body, mut ball) =
            ball_at(head + Vec2::new(3.0, 0.0), Vec2::new(-2.0, 0.0), Ownership::Player);
        let mut player = PlayerData::new(&tuning.player);

        let hit = handle_ball(&mut boss, &mut body, &mut ball, Some(&mut player), &tuning);

        assert_eq!(hit, BallHit::Struck { defeated: false });
        assert_eq!(boss.segment_count(), 3);
        assert_eq!(boss.state, SnakeState::Shrinking);
        assert!(body.vel.x > 0.0);
        assert_eq!(ball.ownership, Ownership::Player);
        assert_eq!(player.xp, tuning.snake.xp_per_hit);

        // Cooldown while shrinking
        let hit = handle_ball(&mut boss, &mut body, &mut ball, Some(&mut player), &tuning);
        assert_eq!(hit, BallHit::Ignored);
        assert_eq!(boss.segment_count(), 3);
    }

    #[test]
    fn test_neutral_ball_is_eaten() {
        let tuning = Tuning::default();
        let mut boss = boss_at(IVec2::new(10, 10), 3);
        let head = boss.head().pos;
        let (mut body, mut ball) =
            ball_at(head + Vec2::new(0.0, 4.0), Vec2::ZERO, Ownership::Neutral);

        let hit = handle_ball(&mut boss, &mut body, &mut ball, None, &tuning);

        assert_eq!(hit, BallHit::Eaten);
        assert_eq!(boss.segment_count(), 4);
        assert_eq!(boss.state, SnakeState::Growing);
        assert_eq!(ball.ownership, Ownership::Enemy);
        assert!(body.vel.y > 0.0);
        assert!(body.vel.length() > 0.0);
    }

    #[test]
    fn test_enemy_ball_is_eaten_again() {
        let tuning = Tuning::default();
        let mut boss = boss_at(IVec2::new(10, 10), 3);
        let head = boss.head().pos;
        let (mut body, mut ball) =
            ball_at(head + Vec2::new(-4.0, 0.0), Vec2::ZERO, Ownership::Enemy);

        let hit = handle_ball(&mut boss, &mut body, &mut ball, None, &tuning);

        assert_eq!(hit, BallHit::Eaten);
        assert_eq!(boss.segment_count(), 4);
        assert_eq!(ball.ownership, Ownership::Enemy);
        assert!(body.vel.x < 0.0);
    }

    #[test]
    fn test_body_ignores_non_player_ball() {
        let tuning = Tuning::default();
        let mut boss = boss_at(IVec2::new(10, 10), 4);
        let segment = boss.segments()[2].pos;
        let (mut body, mut ball) =
            ball_at(segment + Vec2::new(0.0, 6.0), Vec2::ZERO, Ownership::Enemy);
        assert_eq!(handle_ball(&mut boss, &mut body, &mut ball, None, &tuning), BallHit::None);

        ball.ownership = Ownership::Player;
        let hit = handle_ball(&mut boss, &mut body, &mut ball, None, &tuning);
        assert_eq!(hit, BallHit::Struck { defeated: false });
        assert_eq!(boss.segment_count(), 3);
    }

    #[test]
    fn test_player_contact_damage() {
        let tuning = SnakeTuning::DEFAULT;
        let boss = boss_at(IVec2::new(10, 10), 4);
        let mut player = PlayerData::new(&crate::tuning::PlayerTuning::DEFAULT);

        let mut body = Body::new(boss.head().pos + Vec2::new(0.0, -10.0), Vec2::splat(8.0));
        assert_eq!(handle_player(&boss, &mut body, &mut player, &tuning), PlayerContact::Head);
        assert!((player.health - 90.0).abs() < 0.001);
        assert!(body.vel.y < 0.0);

        let mut body = Body::new(boss.segments()[3].pos + Vec2::new(0.0, 10.0), Vec2::splat(8.0));
        assert_eq!(handle_player(&boss, &mut body, &mut player, &tuning), PlayerContact::Body);
        assert!((player.health - 85.0).abs() < 0.001);

        let mut body = Body::new(Vec2::new(250.0, 250.0), Vec2::splat(8.0));
        assert_eq!(handle_player(&boss, &mut body, &mut player, &tuning), PlayerContact::None);
    }

    #[test]
    fn test_update_walks_toward_ball() {
        let tuning = SnakeTuning::DEFAULT;
        let world = open_world();
        let mut boss = boss_at(IVec2::new(10, 10), 3);
        let ball = Some(IVec2::new(15, 10));

        boss.update(&world, ball, &tuning, 1.0 / 60.0);
        assert_eq!(boss.state, SnakeState::Moving);
        assert_eq!(boss.next_dir, Direction::Right);

        // 0.2s interval at 60 Hz: one step every 12 or 13 ticks
        for _ in 0..13 {
            boss.update(&world, ball, &tuning, 1.0 / 60.0);
        }
        assert_eq!(boss.head().cell, IVec2::new(11, 10));

        let mut reached = false;
        for _ in 0..120 {
            boss.update(&world, ball, &tuning, 1.0 / 60.0);
            if boss.head().cell == IVec2::new(15, 10) {
                reached = true;
                break;
            }
        }
        assert!(reached);
    }

    #[test]
    fn test_reaching_target_returns_to_tracking() {
        let tuning = SnakeTuning::DEFAULT;
        let world = open_world();
        let mut boss = boss_at(IVec2::new(10, 10), 2);
        boss.update(&world, Some(IVec2::new(11, 10)), &tuning, 1.0 / 60.0);
        boss.update(&world, Some(IVec2::new(11, 10)), &tuning, 0.25);
        assert_eq!(boss.head().cell, IVec2::new(11, 10));
        assert_eq!(boss.state, SnakeState::Tracking);
        assert!(!boss.has_target);
    }

    #[test]
    fn test_grow_window_expires() {
        let tuning = SnakeTuning::DEFAULT;
        let mut boss = boss_at(IVec2::new(10, 10), 2);
        boss.set_state(SnakeState::Growing);
        boss.update(&open_world(), None, &tuning, 1.0);
        assert_eq!(boss.state, SnakeState::Growing);
        boss.update(&open_world(), None, &tuning, 1.0);
        assert_eq!(boss.state, SnakeState::Tracking);
    }

    #[test]
    fn test_take_shrinks_and_trim() {
        let tuning = SnakeTuning::DEFAULT;
        let mut boss = boss_at(IVec2::new(10, 10), 3);
        assert_eq!(boss.trim(5, &tuning), 2);
        assert_eq!(boss.segment_count(), 1);
        assert!(!boss.is_defeated());

        let mut boss = boss_at(IVec2::new(10, 10), 5);
        assert!(!boss.take_shrinks(3, &tuning));
        assert_eq!(boss.segment_count(), 2);
        assert!(boss.take_shrinks(3, &tuning));
        assert_eq!(boss.segment_count(), 1);
    }

    #[test]
    fn test_lay_out_body_to_the_right() {
        let mut boss = boss_at(IVec2::new(10, 10), 3);
        boss.lay_out(IVec2::new(20, 30), Direction::Right);
        let cells: Vec<IVec2> = boss.segments().iter().map(|s| s.cell).collect();
        assert_eq!(cells, vec![IVec2::new(20, 30), IVec2::new(21, 30), IVec2::new(22, 30)]);
        assert_eq!(boss.current_dir, Direction::Left);
    }

    proptest! {
        #[test]
        fn prop_eating_adds_one_segment(
            enemy_owned in any::<bool>(),
            length in 1usize..8,
            angle in 0.0f32..std::f32::consts::TAU,
            dist in 0.0f32..9.0,
        ) {
            let tuning = Tuning::default();
            let ownership = if enemy_owned { Ownership::Enemy } else { Ownership::Neutral };
            let mut boss = boss_at(IVec2::new(10, 10), length);
            let head = boss.head().pos;
            let offset = Vec2::new(angle.cos(), angle.sin()) * dist;
            let (mut body, mut ball) = ball_at(head + offset, Vec2::ZERO, ownership);

            let hit = handle_ball(&mut boss, &mut body, &mut ball, None, &tuning);

            prop_assert_eq!(hit, BallHit::Eaten);
            prop_assert_eq!(boss.segment_count(), length + 1);
            prop_assert_eq!(boss.state, SnakeState::Growing);
            prop_assert_eq!(ball.ownership, Ownership::Enemy);
        }

        #[test]
        fn prop_segment_count_never_below_one(
            ops in proptest::collection::vec(any::<bool>(), 0..64),
            start in 1usize..6,
        ) {
            let tuning = SnakeTuning::DEFAULT;
            let mut boss = boss_at(IVec2::new(10, 10), start);
            for grow in ops {
                if grow {
                    boss.grow(&tuning);
                } else {
                    let before = boss.segment_count();
                    let ok = boss.shrink(&tuning);
                    prop_assert_eq!(ok, before > 1);
                }
                prop_assert!(boss.segment_count() >= 1);
                prop_assert!(boss.move_interval >= tuning.min_move_interval - 0.0001);
                prop_assert!(boss.move_interval <= tuning.initial_move_interval + 0.0001);
            }
        }

        #[test]
        fn prop_path_never_reverses(
            tx in 0i32..40,
            ty in 0i32..40,
            dir_index in 0usize..4,
            walls in proptest::collection::vec((8i32..13, 8i32..13), 0..6),
        ) {
            let mut world = open_world();
            for (x, y) in walls {
                if (x, y) != (10, 10) {
                    world.set_tile(IVec2::new(x, y), TileKind::Wall);
                }
            }
            let mut boss = boss_at(IVec2::new(10, 10), 3);
            boss.current_dir = Direction::ALL[dir_index];
            if let Some(dir) = boss.choose_direction(IVec2::new(tx, ty), &world) {
                prop_assert_ne!(dir, boss.current_dir.opposite());
                prop_assert!(boss.is_valid_cell(boss.head().cell + dir.delta(), &world));
            }
        }
    }
}
