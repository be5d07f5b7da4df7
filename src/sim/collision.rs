//! Collision detection and response for circles and axis-aligned boxes
//!
//! The ball, the player and the snake head are circles; snake body segments and
//! the goal entrance are boxes. Tile walls are handled per-axis in `ball.rs`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner plus size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { min: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self { min: center - half_extents, size: half_extents * 2.0 }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max()).all()
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the obstacle surface
    pub point: Vec2,
    /// Unit normal from the obstacle toward the circle centre
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle vs circle; the normal points from `b` toward `a`
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let offset = a_pos - b_pos;
    let dist = offset.length();
    let radii = a_radius + b_radius;

    if dist >= radii {
        return CollisionResult::miss();
    }

    // Concentric circles have no defined normal; push straight up
    let normal = if dist > 0.0001 { offset / dist } else { Vec2::NEG_Y };
    CollisionResult {
        hit: true,
        point: b_pos + normal * b_radius,
        normal,
        penetration: radii - dist,
    }
}

/// Circle vs axis-aligned box; the normal points from the box toward the circle
pub fn circle_rect(pos: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = pos.clamp(rect.min, rect.max());
    let offset = pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    if dist > 0.0001 {
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Centre inside the box: push out through the nearest face
    let to_min = pos - rect.min;
    let to_max = rect.max() - pos;
    let faces = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec2::NEG_Y));
    CollisionResult {
        hit: true,
        point: pos - normal * depth,
        normal,
        penetration: radius + depth,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Circle fully inside a larger circle, with `slack` of the inner radius allowed to poke out
pub fn circle_inside_circle(
    inner_pos: Vec2,
    slack: f32,
    outer_pos: Vec2,
    outer_radius: f32,
) -> bool {
    inner_pos.distance(outer_pos) < outer_radius - slack
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_hit_and_miss() {
        let result = circle_circle(Vec2::new(3.0, 0.0), 4.0, Vec2::ZERO, 6.0);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
        assert!((result.penetration - 7.0).abs() < 0.001);

        let result = circle_circle(Vec2::new(11.0, 0.0), 4.0, Vec2::ZERO, 6.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_circle_concentric() {
        let result = circle_circle(Vec2::ONE, 1.0, Vec2::ONE, 1.0);
        assert!(result.hit);
        assert!((result.normal.length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_rect_edge() {
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        let result = circle_rect(Vec2::new(10.0, 4.0), 4.0, &rect);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
        assert!((result.penetration - 2.0).abs() < 0.001);

        assert!(!circle_rect(Vec2::new(13.0, 4.0), 4.0, &rect).hit);
    }

    #[test]
    fn test_circle_rect_centre_inside() {
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        let result = circle_rect(Vec2::new(7.0, 4.0), 2.0, &rect);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_circle_inside_circle() {
        assert!(circle_inside_circle(Vec2::ZERO, 3.2, Vec2::ZERO, 15.0));
        assert!(circle_inside_circle(Vec2::new(11.0, 0.0), 3.2, Vec2::ZERO, 15.0));
        assert!(!circle_inside_circle(Vec2::new(12.0, 0.0), 3.2, Vec2::ZERO, 15.0));
    }

    #[test]
    fn test_rect_helpers() {
        let rect = Rect::from_center(Vec2::new(10.0, 10.0), Vec2::splat(4.0));
        assert_eq!(rect.min, Vec2::splat(6.0));
        assert_eq!(rect.center(), Vec2::splat(10.0));
        assert!(rect.contains(Vec2::new(14.0, 6.0)));
        assert!(!rect.contains(Vec2::new(14.1, 6.0)));
    }
}
