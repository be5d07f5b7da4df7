//! Circular win-hole
//!
//! The ball scores by settling fully inside the hole. Who benefits depends on
//! its ownership: a player-owned ball shrinks every enemy, an enemy-owned ball
//! damages the player, a neutral ball is simply held. Every capture ends in a
//! timed hold, after which the ball is ejected neutral in a random direction.
//!
//! ```text
//! Idle -> PlayerScored | EnemyScored -> NeutralHold -> Idle
//!      \-----------------------------/
//! ```

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{self, Ownership};
use super::collision::circle_inside_circle;
use super::entity::Entity;
use super::snake::SnakeState;
use crate::polar_to_cartesian;
use crate::tuning::{HoleTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoleState {
    #[default]
    Idle,
    PlayerScored,
    EnemyScored,
    NeutralHold,
}

/// Spark along a beam between the hole and whoever was hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
}

/// Flashing banner shown after a score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashText {
    pub active: bool,
    pub timer: f32,
    pub alpha: f32,
}

impl FlashText {
    pub fn trigger(&mut self) {
        self.active = true;
        self.timer = 0.0;
        self.alpha = 1.0;
    }

    pub fn update(&mut self, dt: f32, duration: f32) {
        if !self.active {
            return;
        }
        self.timer += dt;
        self.alpha = 0.5 + 0.5 * (self.timer * 10.0).sin();
        if self.timer >= duration {
            self.active = false;
        }
    }
}

/// What a single hole update did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoleUpdate {
    /// State entered on capture this tick (the scored state, or NeutralHold for a neutral ball)
    pub captured: Option<HoleState>,
    /// Ejection angle if the ball left the hole this tick
    pub ejected: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinHole {
    pub pos: Vec2,
    pub radius: f32,
    pub state: HoleState,
    /// Hold timer while in NeutralHold
    pub state_timer: f32,
    pub player_score: u32,
    pub enemy_score: u32,
    #[serde(default)]
    pub particles: Vec<BeamParticle>,
    #[serde(default)]
    pub flash: FlashText,
}

impl WinHole {
    pub fn new(pos: Vec2, tuning: &HoleTuning) -> Self {
        log::info!("Win hole at ({:.1}, {:.1}) radius {:.1}", pos.x, pos.y, tuning.radius);
        Self {
            pos,
            radius: tuning.radius,
            state: HoleState::Idle,
            state_timer: 0.0,
            player_score: 0,
            enemy_score: 0,
            particles: Vec::new(),
            flash: FlashText::default(),
        }
    }

    /// Ball centre lies far enough inside that it visibly sits in the hole
    pub fn contains_ball(&self, ball_pos: Vec2, ball_radius: f32, tuning: &HoleTuning) -> bool {
        circle_inside_circle(ball_pos, ball_radius * tuning.capture_fraction, self.pos, self.radius)
    }

    /// Advance effects and the capture state machine by one tick
    pub fn update(
        &mut self,
        ball: Option<&mut Entity>,
        player: &mut Entity,
        enemies: &mut [Entity],
        rng: &mut Pcg32,
        tuning: &Tuning,
        dt: f32,
    ) -> HoleUpdate {
        self.update_particles(dt);
        self.flash.update(dt, tuning.hole.flash_duration);

        let mut outcome = HoleUpdate::default();
        let Some((body, data)) = ball.and_then(Entity::as_ball_mut) else {
            return outcome;
        };

        match self.state {
            HoleState::Idle => {
                if !body.active || !self.contains_ball(body.pos, data.radius, &tuning.hole) {
                    return outcome;
                }

                let entered = match data.ownership {
                    Ownership::Player => {
                        self.state = HoleState::PlayerScored;
                        self.player_score += 1;
                        self.score_against_enemies(enemies, rng, tuning);
                        HoleState::PlayerScored
                    }
                    Ownership::Enemy => {
                        self.state = HoleState::EnemyScored;
                        self.enemy_score += 1;
                        self.score_against_player(player, rng, tuning);
                        HoleState::EnemyScored
                    }
                    Ownership::Neutral => HoleState::NeutralHold,
                };

                body.pos = self.pos;
                body.vel = Vec2::ZERO;

                // Scored states are transitional: fall through to the hold
                self.state = HoleState::NeutralHold;
                self.state_timer = 0.0;
                outcome.captured = Some(entered);
            }
            HoleState::PlayerScored | HoleState::EnemyScored => {
                self.state = HoleState::NeutralHold;
                self.state_timer = 0.0;
            }
            HoleState::NeutralHold => {
                self.state_timer += dt;
                body.pos = self.pos;
                body.vel = Vec2::ZERO;
                data.set_ownership(Ownership::Neutral);

                if self.state_timer >= tuning.hole.hold_duration {
                    let angle = rng.random_range(0.0..TAU);
                    let dir = polar_to_cartesian(1.0, angle);
                    ball::apply_force(body, dir * tuning.hole.eject_speed, tuning.ball.max_speed);
                    body.pos = self.pos + dir * (self.radius + data.radius);
                    self.state = HoleState::Idle;
                    self.state_timer = 0.0;
                    log::info!("Ball ejected from hole at {:.1} degrees", angle.to_degrees());
                    outcome.ejected = Some(angle);
                }
            }
        }

        outcome
    }

    fn score_against_enemies(&mut self, enemies: &mut [Entity], rng: &mut Pcg32, tuning: &Tuning) {
        self.flash.trigger();
        let mut hit = 0;
        for enemy in enemies.iter_mut() {
            let Some((_, boss)) = enemy.as_snake_mut() else {
                continue;
            };
            if boss.is_defeated() {
                continue;
            }
            if !boss.take_shrinks(tuning.hole.player_score_shrinks, &tuning.snake) {
                boss.set_state(SnakeState::Shrinking);
            }
            let target = boss.head().pos;
            self.trigger_beam(target, rng, &tuning.hole);
            hit += 1;
        }
        log::info!("Player scored in the hole, {} enemies hit", hit);
    }

    fn score_against_player(&mut self, player: &mut Entity, rng: &mut Pcg32, tuning: &Tuning) {
        self.flash.trigger();
        let Some((body, data)) = player.as_player_mut() else {
            return;
        };
        let health = data.take_damage(tuning.hole.enemy_score_damage);
        let target = body.pos;
        self.trigger_beam(target, rng, &tuning.hole);
        log::info!("Enemy scored in the hole, player health {:.1}", health);
    }

    /// Seed every third particle slot along the hole-to-target line with jitter
    pub fn trigger_beam(&mut self, target: Vec2, rng: &mut Pcg32, tuning: &HoleTuning) {
        let offset = target - self.pos;
        let distance = offset.length();
        let dir = offset.normalize_or_zero();
        let count = tuning.beam_particles.max(1);

        for i in (0..count).step_by(3) {
            let progress = i as f32 / count as f32;
            let jitter = Vec2::new(
                rng.random_range(-10..=10) as f32,
                rng.random_range(-10..=10) as f32,
            );
            let drift = Vec2::new(
                rng.random_range(-20..=20) as f32 / 10.0,
                rng.random_range(-20..=20) as f32 / 10.0,
            );
            self.particles.push(BeamParticle {
                pos: self.pos + dir * distance * progress + jitter,
                vel: dir * tuning.beam_particle_speed + drift,
                size: tuning.beam_particle_size * (1.0 - rng.random_range(0..=5) as f32 / 10.0),
                alpha: 1.0,
            });
        }
    }

    fn update_particles(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.pos += particle.vel * dt;
            particle.alpha -= 2.0 * dt;
        }
        self.particles.retain(|p| p.alpha > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use proptest::prelude::*;
    use rand::SeedableRng;

    use crate::consts::SIM_DT;
    use crate::sim::ball::{BallData, BallKind};
    use crate::sim::entity::{Body, Payload};
    use crate::sim::player::PlayerData;
    use crate::sim::snake::SnakeBoss;

    struct Fixture {
        hole: WinHole,
        ball: Entity,
        player: Entity,
        enemies: Vec<Entity>,
        rng: Pcg32,
        tuning: Tuning,
    }

    fn fixture(ball_offset: Vec2, ownership: Ownership, boss_length: usize) -> Fixture {
        let tuning = Tuning::default();
        let hole = WinHole::new(Vec2::new(200.0, 200.0), &tuning.hole);

        let mut data = BallData::new(BallKind::Normal, &tuning);
        data.ownership = ownership;
        let ball_body = Body::new(hole.pos + ball_offset, Vec2::splat(4.0));
        let ball = Entity::new(1, ball_body, Payload::Ball(data));
        let player = Entity::new(
            2,
            Body::new(Vec2::new(100.0, 100.0), Vec2::splat(8.0)),
            Payload::Player(PlayerData::new(&tuning.player)),
        );
        let boss = SnakeBoss::new(IVec2::new(10, 40), boss_length, &tuning.snake).unwrap();
        let enemies = vec![Entity::new(
            3,
            Body::new(boss.head().pos, Vec2::splat(4.0)),
            Payload::Snake(boss),
        )];

        Fixture { hole, ball, player, enemies, rng: Pcg32::seed_from_u64(7), tuning }
    }

    impl Fixture {
        fn tick(&mut self, dt: f32) -> HoleUpdate {
            self.hole.update(
                Some(&mut self.ball),
                &mut self.player,
                &mut self.enemies,
                &mut self.rng,
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

        fn ownership(&self) -> Ownership {
            self.ball.as_ball().map(|(_, b)| b.ownership).unwrap()
        }
    }

    #[test]
    fn test_enemy_ball_damages_player_and_falls_through() {
        let mut f = fixture(Vec2::ZERO, Ownership::Enemy, 5);
        let outcome = f.tick(SIM_DT);

        assert_eq!(outcome.captured, Some(HoleState::EnemyScored));
        assert_eq!(f.hole.state, HoleState::NeutralHold);
        assert!((f.health() - 80.0).abs() < 0.001);
        assert_eq!(f.hole.enemy_score, 1);
        assert!(f.hole.flash.active);
        assert!(!f.hole.particles.is_empty());
        assert_eq!(f.ball.body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_enemy_score_damage_floors_at_zero() {
        let mut f = fixture(Vec2::ZERO, Ownership::Enemy, 5);
        if let Some((_, p)) = f.player.as_player_mut() {
            p.health = 5.0;
        }
        f.tick(SIM_DT);
        assert_eq!(f.health(), 0.0);
    }

    #[test]
    fn test_player_ball_shrinks_enemies() {
        let mut f = fixture(Vec2::new(5.0, 0.0), Ownership::Player, 5);
        let outcome = f.tick(SIM_DT);

        assert_eq!(outcome.captured, Some(HoleState::PlayerScored));
        assert_eq!(f.boss().segment_count(), 2);
        assert_eq!(f.boss().state, SnakeState::Shrinking);
        assert_eq!(f.hole.player_score, 1);
        assert_eq!(f.ball.body.pos, f.hole.pos);
    }

    #[test]
    fn test_player_ball_defeats_short_boss() {
        let mut f = fixture(Vec2::ZERO, Ownership::Player, 2);
        f.tick(SIM_DT);
        assert_eq!(f.boss().state, SnakeState::Defeated);
        assert_eq!(f.boss().segment_count(), 1);
    }

    #[test]
    fn test_neutral_ball_scores_nothing() {
        let mut f = fixture(Vec2::ZERO, Ownership::Neutral, 5);
        let outcome = f.tick(SIM_DT);

        assert_eq!(outcome.captured, Some(HoleState::NeutralHold));
        assert_eq!(f.hole.player_score, 0);
        assert_eq!(f.hole.enemy_score, 0);
        assert!((f.health() - 100.0).abs() < 0.001);
        assert_eq!(f.boss().segment_count(), 5);
        assert!(!f.hole.flash.active);
    }

    #[test]
    fn test_edge_overlap_is_not_a_capture() {
        // 12 + 0.8 * 4 > 15: touching but not inside
        let mut f = fixture(Vec2::new(12.0, 0.0), Ownership::Enemy, 5);
        let outcome = f.tick(SIM_DT);
        assert_eq!(outcome.captured, None);
        assert_eq!(f.hole.state, HoleState::Idle);
    }

    #[test]
    fn test_hold_then_eject() {
        let mut f = fixture(Vec2::ZERO, Ownership::Enemy, 5);
        f.tick(SIM_DT);
        f.tick(SIM_DT);
        assert_eq!(f.ownership(), Ownership::Neutral);

        f.tick(1.0);
        assert_eq!(f.hole.state, HoleState::NeutralHold);
        assert_eq!(f.ball.body.pos, f.hole.pos);

        let outcome = f.tick(1.0);
        assert!(outcome.ejected.is_some());
        assert_eq!(f.hole.state, HoleState::Idle);
        assert!(f.ball.body.pos.distance(f.hole.pos) > f.hole.radius);
        assert!((f.ball.body.vel.length() - f.tuning.hole.eject_speed).abs() < 0.001);
        assert_eq!(f.ownership(), Ownership::Neutral);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut f = fixture(Vec2::ZERO, Ownership::Enemy, 5);
        f.tick(SIM_DT);
        assert_eq!(f.hole.particles.len(), 10);
        f.tick(0.3);
        assert_eq!(f.hole.particles.len(), 10);
        f.tick(0.3);
        assert!(f.hole.particles.is_empty());
    }

    #[test]
    fn test_flash_expires() {
        let mut flash = FlashText::default();
        flash.trigger();
        flash.update(1.0, 1.5);
        assert!(flash.active);
        assert!(flash.alpha >= 0.0 && flash.alpha <= 1.0);
        flash.update(0.6, 1.5);
        assert!(!flash.active);
    }

    proptest! {
        #[test]
        fn prop_ejection_clears_the_hole(seed in any::<u64>(), owner in 0u8..3) {
            let ownership = match owner {
                0 => Ownership::Neutral,
                1 => Ownership::Player,
                _ => Ownership::Enemy,
            };
            let mut f = fixture(Vec2::ZERO, ownership, 6);
            f.rng = Pcg32::seed_from_u64(seed);
            f.tick(SIM_DT);
            let mut ejected = false;
            for _ in 0..200 {
                if f.tick(SIM_DT).ejected.is_some() {
                    ejected = true;
                    break;
                }
            }
            prop_assert!(ejected);
            prop_assert!(f.ball.body.pos.distance(f.hole.pos) > f.hole.radius);
            prop_assert_eq!(f.ownership(), Ownership::Neutral);
        }
    }
}
