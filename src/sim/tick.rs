//! Fixed timestep simulation tick
//!
//! One call advances every state machine once, in a fixed order:
//! player, ball, enemies (boss pathing and contacts), then the scoring target.

use glam::Vec2;

use super::ball::{self, Ownership};
use super::entity::Entity;
use super::hole::HoleState;
use super::player;
use super::snake::{self, BallHit, PlayerContact};
use super::state::{ContactKind, GameEvent, GamePhase, GameState, Scoring};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction; longer than one is clamped
    pub move_dir: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI steers the player
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                set_phase(state, GamePhase::Paused);
                return;
            }
            GamePhase::Paused => set_phase(state, GamePhase::Playing),
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    let move_dir = if input.idle_mode {
        idle_steering(state)
    } else {
        input.move_dir.clamp_length_max(1.0)
    };

    let mut owner = ownership(state);
    let level = state.player_data().map_or(1, |p| p.level);
    let defeated_before: Vec<u32> =
        state.bosses().filter(|(_, b)| b.is_defeated()).map(|(id, _)| id).collect();

    // Player
    player::step(&mut state.player.body, move_dir, &state.world, &state.tuning.player, dt);

    // Ball
    if let Some((body, data)) = state.ball.as_mut().and_then(Entity::as_ball_mut) {
        ball::step(body, data, &state.world, Some(&state.player.body), &state.tuning.ball, dt);
    }
    note_ownership(state, &mut owner);

    // Enemies
    update_enemies(state, dt);
    note_ownership(state, &mut owner);

    // Scoring target
    update_scoring(state, dt);
    note_ownership(state, &mut owner);

    let new_level = state.player_data().map_or(level, |p| p.level);
    if new_level > level {
        state.events.push(GameEvent::LevelUp { level: new_level });
    }

    let newly_defeated: Vec<u32> = state
        .bosses()
        .filter(|(id, b)| b.is_defeated() && !defeated_before.contains(id))
        .map(|(id, _)| id)
        .collect();
    for boss in newly_defeated {
        state.events.push(GameEvent::BossDefeated { boss });
    }

    if state.player_data().is_some_and(|p| p.is_dead()) {
        log::info!("Player defeated at tick {}", state.time_ticks);
        set_phase(state, GamePhase::GameOver);
    } else if state.all_bosses_defeated() {
        log::info!("All bosses defeated at tick {}", state.time_ticks);
        set_phase(state, GamePhase::Victory);
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let ball_cell = state.ball_cell();
    let tuning = &state.tuning;

    for enemy in &mut state.enemies {
        let id = enemy.id;
        let Some((body, boss)) = enemy.as_snake_mut() else {
            continue;
        };

        boss.update(&state.world, ball_cell, &tuning.snake, dt);
        body.pos = boss.head().pos;

        if let Some((ball_body, ball_data)) = state.ball.as_mut().and_then(Entity::as_ball_mut) {
            if boss.is_defeated() {
                // What is left of the head stays in the arena as a bumper
                let head = boss.head().pos;
                ball::bounce_off_circle(ball_body, ball_data, head, tuning.snake.head_radius);
            } else {
                let player = state.player.as_player_mut().map(|(_, data)| data);
                match snake::handle_ball(boss, ball_body, ball_data, player, tuning) {
                    BallHit::Eaten => state.events.push(GameEvent::BallEaten {
                        boss: id,
                        segments: boss.segment_count(),
                    }),
                    BallHit::Struck { .. } => state.events.push(GameEvent::BossStruck {
                        boss: id,
                        segments: boss.segment_count(),
                    }),
                    BallHit::Ignored | BallHit::None => {}
                }
            }
        }

        if let Some((player_body, player_data)) = state.player.as_player_mut() {
            let hit = snake::handle_player(boss, player_body, player_data, &tuning.snake);
            let contact = match hit {
                PlayerContact::Head => Some(ContactKind::Head),
                PlayerContact::Body => Some(ContactKind::Body),
                PlayerContact::None => None,
            };
            if let Some(contact) = contact {
                log::debug!(
                    "Snake {} hit the player ({:?}), health {:.1}",
                    id,
                    contact,
                    player_data.health
                );
                state.events.push(GameEvent::PlayerHit { contact, health: player_data.health });
            }
        }
    }
}

fn update_scoring(state: &mut GameState, dt: f32) {
    let center = state.world.center();
    let mut finished = None;

    match &mut state.scoring {
        Scoring::Hole(hole) => {
            let outcome = hole.update(
                state.ball.as_mut(),
                &mut state.player,
                &mut state.enemies,
                &mut state.rng,
                &state.tuning,
                dt,
            );
            if let Some(captured) = outcome.captured {
                state.events.push(GameEvent::HoleCaptured(captured));
            }
            if let Some(angle) = outcome.ejected {
                state.events.push(GameEvent::BallEjected { angle });
            }
        }
        Scoring::Match(game) => {
            let outcome = game.update(
                state.ball.as_mut(),
                &mut state.player,
                &mut state.enemies,
                center,
                &state.tuning,
                dt,
            );
            if let Some(scorer) = outcome.scored {
                state.events.push(GameEvent::GoalScored(scorer));
            }
            if outcome.neutral_reset {
                state.events.push(GameEvent::NeutralBallReset);
            }
            if outcome.finished {
                let (player, enemy) = (game.player_score, game.enemy_score);
                state.events.push(GameEvent::MatchFinished { player, enemy });
                let phase = if player > enemy { GamePhase::Victory } else { GamePhase::GameOver };
                finished = Some(phase);
            }
        }
    }

    if let Some(phase) = finished {
        set_phase(state, phase);
    }
}

fn set_phase(state: &mut GameState, phase: GamePhase) {
    if state.phase == phase {
        return;
    }
    log::info!("Phase {:?} -> {:?}", state.phase, phase);
    state.phase = phase;
    state.events.push(GameEvent::PhaseChanged(phase));
}

fn ownership(state: &GameState) -> Option<Ownership> {
    state.ball_data().map(|(_, data)| data.ownership)
}

fn note_ownership(state: &mut GameState, owner: &mut Option<Ownership>) {
    let now = ownership(state);
    if let (Some(from), Some(to)) = (*owner, now)
        && from != to
    {
        state.events.push(GameEvent::OwnershipChanged { from, to });
    }
    *owner = now;
}

/// Demo AI: line up behind the ball so the next touch pushes it toward the
/// scoring target
fn idle_steering(state: &GameState) -> Vec2 {
    let Some((ball, _)) = state.ball_data().filter(|(b, _)| b.active) else {
        return Vec2::ZERO;
    };

    let target = match &state.scoring {
        Scoring::Hole(hole) => {
            if hole.state != HoleState::Idle {
                return Vec2::ZERO;
            }
            hole.pos
        }
        Scoring::Match(game) => game.goal.center(),
    };

    let shot = (target - ball.pos).normalize_or_zero();
    let aim = ball.pos - shot * 6.0;
    let to_aim = aim - state.player.body.pos;
    if to_aim.length() < 1.0 {
        return shot;
    }
    to_aim.normalize_or_zero()
}
