//! Shape generation for 2D primitives
//!
//! Component hooks read simulation state and return [`Shape`]s; the
//! tessellation helpers turn shapes into triangle lists.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::{TILE_HEIGHT, TILE_WIDTH};
use crate::sim::ball::{BallData, Ownership};
use crate::sim::collision::Rect;
use crate::sim::entity::Body;
use crate::sim::goal::Goal;
use crate::sim::hole::WinHole;
use crate::sim::snake::{SnakeBoss, SnakeState};
use crate::sim::world::{TileKind, World};
use crate::tuning::SnakeTuning;

/// Triangles per full circle when tessellating
const CIRCLE_SEGMENTS: u32 = 24;

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32, color: [f32; 4] },
    Ring { center: Vec2, inner: f32, outer: f32, color: [f32; 4] },
    Rect { rect: Rect, color: [f32; 4] },
}

impl Shape {
    pub fn color(&self) -> [f32; 4] {
        match self {
            Shape::Circle { color, .. } | Shape::Ring { color, .. } | Shape::Rect { color, .. } => {
                *color
            }
        }
    }

    pub fn tessellate(&self) -> Vec<Vertex> {
        match self {
            Shape::Circle { center, radius, color } => {
                circle(*center, *radius, *color, CIRCLE_SEGMENTS)
            }
            Shape::Ring { center, inner, outer, color } => {
                ring(*center, *inner, *outer, *color, CIRCLE_SEGMENTS)
            }
            Shape::Rect { rect, color } => quad(rect, *color),
        }
    }
}

#[inline]
fn with_alpha(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] *= alpha.clamp(0.0, 1.0);
    color
}

fn tile_color(kind: TileKind) -> Option<[f32; 4]> {
    match kind {
        TileKind::Empty => None,
        TileKind::Wall => Some(colors::WALL),
        TileKind::Water => Some(colors::WATER),
        TileKind::Lava => Some(colors::LAVA),
        TileKind::Ice => Some(colors::ICE),
        TileKind::Door => Some(colors::DOOR),
        TileKind::Switch => Some(colors::SWITCH),
    }
}

/// One rect per non-empty tile
pub fn tiles(world: &World) -> Vec<Shape> {
    let tile = Vec2::new(TILE_WIDTH, TILE_HEIGHT);
    let mut shapes = Vec::new();
    for y in 0..world.height {
        for x in 0..world.width {
            let cell = glam::IVec2::new(x, y);
            let Some(color) = world.tile(cell).and_then(tile_color) else {
                continue;
            };
            shapes.push(Shape::Rect {
                rect: Rect { min: cell.as_vec2() * tile, size: tile },
                color,
            });
        }
    }
    shapes
}

/// Ball coloured by who owns it
pub fn ball(body: &Body, data: &BallData) -> Vec<Shape> {
    if !body.active {
        return Vec::new();
    }
    let color = match data.ownership {
        Ownership::Neutral => colors::BALL_NEUTRAL,
        Ownership::Player => colors::BALL_PLAYER,
        Ownership::Enemy => colors::BALL_ENEMY,
    };
    vec![Shape::Circle { center: body.pos, radius: data.radius, color }]
}

pub fn player(body: &Body) -> Vec<Shape> {
    vec![Shape::Rect {
        rect: Rect::from_center(body.pos, body.half_extents),
        color: colors::PLAYER,
    }]
}

/// Body rects tail first, head circle on top, plus a ring while growing or shrinking
pub fn snake(boss: &SnakeBoss, tuning: &SnakeTuning) -> Vec<Shape> {
    let defeated = boss.is_defeated();
    let body_color = if defeated { colors::SNAKE_DEFEATED } else { colors::SNAKE_BODY };
    let head_color = if defeated { colors::SNAKE_DEFEATED } else { colors::SNAKE_HEAD };

    let mut shapes: Vec<Shape> = (1..boss.segment_count())
        .rev()
        .filter_map(|i| boss.segment_rect(i, tuning))
        .map(|rect| Shape::Rect { rect, color: body_color })
        .collect();

    let head = boss.head().pos;
    shapes.push(Shape::Circle { center: head, radius: tuning.head_radius, color: head_color });

    let ring_color = match boss.state {
        SnakeState::Growing => Some(colors::GROW_RING),
        SnakeState::Shrinking => Some(colors::SHRINK_RING),
        _ => None,
    };
    if let Some(color) = ring_color {
        // Pulse outward over the transition
        let pulse = (boss.state_timer * 8.0).sin().abs() * 3.0;
        shapes.push(Shape::Ring {
            center: head,
            inner: tuning.head_radius + 1.0,
            outer: tuning.head_radius + 2.0 + pulse,
            color,
        });
    }

    shapes
}

/// Hole disc, rim and beam particles
pub fn hole(hole: &WinHole) -> Vec<Shape> {
    let mut shapes = vec![
        Shape::Circle { center: hole.pos, radius: hole.radius, color: colors::HOLE },
        Shape::Ring {
            center: hole.pos,
            inner: hole.radius - 1.5,
            outer: hole.radius,
            color: colors::HOLE_RING,
        },
    ];
    shapes.extend(hole.particles.iter().map(|p| Shape::Circle {
        center: p.pos,
        radius: p.size,
        color: with_alpha(colors::BEAM, p.alpha),
    }));
    shapes
}

/// Net behind the posts; the frame itself is drawn with the wall tiles
pub fn goal(goal: &Goal) -> Vec<Shape> {
    vec![Shape::Rect { rect: goal.net_entrance, color: colors::GOAL_NET }]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Two triangles covering `rect`
pub fn quad(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let min = rect.min;
    let max = rect.max();
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}
