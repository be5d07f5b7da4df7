//! Read-only render hooks
//!
//! Turns a [`GameState`] into a back-to-front list of shapes. Nothing here
//! mutates simulation state; a backend only has to fill the triangles.

pub mod shapes;
pub mod vertex;

pub use shapes::Shape;
pub use vertex::{Vertex, colors};

use crate::sim::entity::Payload;
use crate::sim::state::{GameState, Scoring};

/// Every shape for the current frame, back to front
pub fn scene(state: &GameState) -> Vec<Shape> {
    let mut out = shapes::tiles(&state.world);

    match &state.scoring {
        Scoring::Hole(hole) => out.extend(shapes::hole(hole)),
        Scoring::Match(game) => out.extend(shapes::goal(&game.goal)),
    }

    for enemy in &state.enemies {
        if let Payload::Snake(boss) = &enemy.payload {
            out.extend(shapes::snake(boss, &state.tuning.snake));
        }
    }

    out.extend(shapes::player(&state.player.body));

    if let Some((body, data)) = state.ball_data() {
        out.extend(shapes::ball(body, data));
    }

    out
}

/// Triangle list for a whole scene
pub fn tessellate(shapes: &[Shape]) -> Vec<Vertex> {
    shapes.iter().flat_map(Shape::tessellate).collect()
}
