//! Collision detection and response
//!
//! Everything here is circle-vs-axis-aligned-rectangle or circle-vs-circle.
//! Response is positional push-out only; velocities are never reflected.

use glam::Vec2;

use super::arena::Obstacle;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle to the circle center
    pub point: Vec2,
    /// Unit vector from the contact point toward the circle center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
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

/// Closest point of the rectangle to `p` (p itself when inside)
#[inline]
pub fn nearest_point(p: Vec2, rect: &Obstacle) -> Vec2 {
    p.clamp(rect.min(), rect.max())
}

/// Overlap test only: nearest-point distance strictly below the radius
#[inline]
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Obstacle) -> bool {
    center.distance(nearest_point(center, rect)) < radius
}

/// Check collision between a circle and a rectangle
///
/// The normal points from the rectangle toward the circle. When the center
/// lies inside the rectangle the normal exits through the nearest edge.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Obstacle) -> CollisionResult {
    let point = nearest_point(center, rect);
    let offset = center - point;
    let dist = offset.length();

    if dist >= radius {
        return CollisionResult::miss();
    }

    if dist > 0.0 {
        return CollisionResult {
            hit: true,
            point,
            normal: offset / dist,
            penetration: radius - dist,
        };
    }

    // Center is inside the rectangle - exit through the closest edge
    let min = rect.min();
    let max = rect.max();
    let exits = [
        (center.x - min.x, Vec2::NEG_X, Vec2::new(min.x, center.y)),
        (max.x - center.x, Vec2::X, Vec2::new(max.x, center.y)),
        (center.y - min.y, Vec2::NEG_Y, Vec2::new(center.x, min.y)),
        (max.y - center.y, Vec2::Y, Vec2::new(center.x, max.y)),
    ];
    let mut best = exits[0];
    for exit in &exits[1..] {
        if exit.0 < best.0 {
            best = *exit;
        }
    }
    let (depth, normal, point) = best;
    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: depth + radius,
    }
}

/// Move a circle out of a rectangle along the contact normal
pub fn push_out_of_rect(center: Vec2, radius: f32, rect: &Obstacle) -> Vec2 {
    let result = circle_rect_collision(center, radius, rect);
    if result.hit {
        center + result.normal * result.penetration
    } else {
        center
    }
}

/// Resolve a circle against every obstacle in order
pub fn resolve_obstacles(mut center: Vec2, radius: f32, obstacles: &[Obstacle]) -> Vec2 {
    for obstacle in obstacles {
        center = push_out_of_rect(center, radius, obstacle);
    }
    center
}

/// Circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Obstacle {
        Obstacle::new(100.0, 100.0, 50.0, 50.0)
    }

    #[test]
    fn test_circle_rect_miss() {
        let result = circle_rect_collision(Vec2::new(50.0, 125.0), 20.0, &block());
        assert!(!result.hit);
        assert!(!circle_overlaps_rect(Vec2::new(50.0, 125.0), 20.0, &block()));
    }

    #[test]
    fn test_circle_rect_side_hit() {
        // 10 units left of the left edge, radius 20
        let center = Vec2::new(90.0, 125.0);
        let result = circle_rect_collision(center, 20.0, &block());
        assert!(result.hit);
        assert_eq!(result.point, Vec2::new(100.0, 125.0));
        assert!((result.normal - Vec2::NEG_X).length() < 1e-6);
        assert!((result.penetration - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_push_out_lands_on_surface() {
        let center = Vec2::new(90.0, 125.0);
        let pushed = push_out_of_rect(center, 20.0, &block());
        assert!((pushed.x - 80.0).abs() < 1e-4);
        assert!((pushed.y - 125.0).abs() < 1e-4);
        assert!(!circle_overlaps_rect(pushed, 19.9, &block()));
    }

    #[test]
    fn test_push_out_corner_is_diagonal() {
        // Near the top-left corner
        let center = Vec2::new(95.0, 95.0);
        let pushed = push_out_of_rect(center, 20.0, &block());
        let corner = Vec2::new(100.0, 100.0);
        assert!((pushed.distance(corner) - 20.0).abs() < 1e-3);
        assert!((pushed.x - pushed.y).abs() < 1e-4);
    }

    #[test]
    fn test_center_inside_exits_nearest_edge() {
        // 5 units inside the top edge
        let center = Vec2::new(125.0, 105.0);
        let result = circle_rect_collision(center, 10.0, &block());
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        let pushed = push_out_of_rect(center, 10.0, &block());
        assert!((pushed.y - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }
}
