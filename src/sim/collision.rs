//! Collision detection and response for the Plinko board
//!
//! Pegs are circles, the side walls are vertical lines at x = 0 and
//! x = width. Screen coordinates: +y points down.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at contact, pointing from the obstacle toward the ball
    pub normal: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
        }
    }
}

/// Check collision between a ball and a circular peg
///
/// A hit requires strict overlap: a ball resting exactly at
/// `ball_radius + peg_radius` is not colliding.
pub fn ball_peg_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    peg_pos: Vec2,
    peg_radius: f32,
) -> CollisionResult {
    let contact_dist = ball_radius + peg_radius;
    let offset = ball_pos - peg_pos;
    let dist = offset.length();

    if dist >= contact_dist {
        return CollisionResult::miss();
    }

    // Ball centered on the peg has no direction; pop it straight up
    let normal = if dist > f32::EPSILON {
        offset / dist
    } else {
        Vec2::NEG_Y
    };

    CollisionResult { hit: true, normal }
}

/// Position that puts the ball exactly in contact with the peg along `normal`
#[inline]
pub fn resolve_peg_contact(peg_pos: Vec2, normal: Vec2, ball_radius: f32, peg_radius: f32) -> Vec2 {
    peg_pos + normal * (ball_radius + peg_radius)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Whether the ball pokes through either side wall
#[inline]
pub fn ball_wall_collision(ball_x: f32, ball_radius: f32, width: f32) -> bool {
    ball_x - ball_radius < 0.0 || ball_x + ball_radius > width
}

/// Clamp the ball center so it sits inside the walls
#[inline]
pub fn clamp_to_walls(ball_x: f32, ball_radius: f32, width: f32) -> f32 {
    ball_x.max(ball_radius).min(width - ball_radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_peg_collision_overlap() {
        let peg = Vec2::new(100.0, 100.0);
        let ball = Vec2::new(100.0, 90.0);

        let result = ball_peg_collision(ball, 10.0, peg, 5.0);
        assert!(result.hit);
        // Ball is above the peg, normal points up
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_ball_peg_collision_touching_is_miss() {
        let peg = Vec2::new(0.0, 0.0);
        let ball = Vec2::new(15.0, 0.0);
        assert!(!ball_peg_collision(ball, 10.0, peg, 5.0).hit);
    }

    #[test]
    fn test_ball_peg_collision_concentric() {
        let peg = Vec2::new(40.0, 40.0);
        let result = ball_peg_collision(peg, 10.0, peg, 5.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_resolve_peg_contact_distance() {
        let peg = Vec2::new(50.0, 50.0);
        let ball = Vec2::new(57.0, 44.0);
        let result = ball_peg_collision(ball, 10.0, peg, 5.0);
        assert!(result.hit);

        let resolved = resolve_peg_contact(peg, result.normal, 10.0, 5.0);
        assert!(((resolved - peg).length() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving down, hits top of peg (normal pointing up)
        let velocity = Vec2::new(0.0, 100.0);
        let normal = Vec2::new(0.0, -1.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!(reflected.x.abs() < 0.001);
        assert!((reflected.y - (-100.0)).abs() < 0.001);
    }

    #[test]
    fn test_reflect_preserves_speed() {
        let velocity = Vec2::new(30.0, 80.0);
        let normal = Vec2::new(1.0, -1.0).normalize();
        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.length() - velocity.length()).abs() < 1e-3);
    }

    #[test]
    fn test_wall_collision() {
        let width = 400.0;
        assert!(!ball_wall_collision(200.0, 10.0, width));
        assert!(ball_wall_collision(5.0, 10.0, width));
        assert!(ball_wall_collision(395.0, 10.0, width));
        assert!(!ball_wall_collision(10.0, 10.0, width));
    }

    #[test]
    fn test_clamp_to_walls() {
        assert_eq!(clamp_to_walls(-4.0, 10.0, 400.0), 10.0);
        assert_eq!(clamp_to_walls(420.0, 10.0, 400.0), 390.0);
        assert_eq!(clamp_to_walls(200.0, 10.0, 400.0), 200.0);
    }
}
