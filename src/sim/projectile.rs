//! Projectiles
//!
//! Velocity is fixed at spawn. A projectile dies on lifetime expiry, on the
//! first obstacle it touches, or when the orchestrator registers a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Obstacle;
use super::collision::circle_overlaps_rect;
use super::combatant::{Combatant, Side};
use crate::consts::PROJECTILE_MAX_LIFETIME_MS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub owner: Side,
    pub damage: f32,
    pub size: f32,
    pub color: u32,
    /// Milliseconds since spawn
    pub age_ms: f64,
    pub max_lifetime_ms: f64,
    pub alive: bool,
    /// Explosive special shot
    pub special: bool,
}

impl Projectile {
    /// Spawn heading along `angle` at `speed` units/s
    pub fn new(
        pos: Vec2,
        angle: f32,
        speed: f32,
        owner: Side,
        damage: f32,
        size: f32,
        color: u32,
    ) -> Self {
        Self {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            owner,
            damage,
            size,
            color,
            age_ms: 0.0,
            max_lifetime_ms: PROJECTILE_MAX_LIFETIME_MS,
            alive: true,
            special: false,
        }
    }

    /// Heading of the velocity vector (radians)
    #[inline]
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    /// Advance by `dt` seconds, expiring on age or obstacle contact
    pub fn step(&mut self, dt: f32, obstacles: &[Obstacle]) {
        if !self.alive {
            return;
        }

        self.age_ms += dt as f64 * 1000.0;
        if self.age_ms >= self.max_lifetime_ms {
            self.alive = false;
            return;
        }

        self.pos += self.vel * dt;

        if obstacles
            .iter()
            .any(|o| circle_overlaps_rect(self.pos, self.size, o))
        {
            self.alive = false;
        }
    }

    /// Circle-circle test against a combatant; owner filtering is the caller's job
    pub fn check_hit(&self, target: &Combatant) -> bool {
        self.alive && self.pos.distance(target.pos) < self.size + target.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet() -> Projectile {
        Projectile::new(Vec2::ZERO, 0.0, 600.0, Side::Player, 10.0, 4.0, 0xffffff)
    }

    #[test]
    fn test_step_moves_by_velocity() {
        let mut p = bullet();
        p.step(0.5, &[]);
        assert!(p.alive);
        assert!((p.pos.x - 300.0).abs() < 1e-3);
        assert!(p.pos.y.abs() < 1e-3);
        assert_eq!(p.age_ms, 500.0);
    }

    #[test]
    fn test_expires_at_max_lifetime() {
        let mut p = bullet();
        for _ in 0..11 {
            p.step(0.25, &[]);
        }
        assert!(p.alive);
        assert_eq!(p.age_ms, 2750.0);
        p.step(0.25, &[]);
        assert!(!p.alive, "dead at exactly 3000ms");
        let frozen = p.pos;
        p.step(0.25, &[]);
        assert_eq!(p.pos, frozen);
    }

    #[test]
    fn test_dies_on_obstacle() {
        let wall = Obstacle::new(100.0, -50.0, 20.0, 100.0);
        let mut p = bullet();
        p.step(0.1, &[wall]);
        assert!(p.alive, "60 units out, still clear");
        p.step(0.1, &[wall]);
        assert!(!p.alive);
    }

    #[test]
    fn test_check_hit_uses_both_radii() {
        let mut target = Combatant::new(Side::Ai, Vec2::new(23.0, 0.0));
        let p = bullet();
        assert!(p.check_hit(&target), "23 < 4 + 20");
        target.pos = Vec2::new(24.0, 0.0);
        assert!(!p.check_hit(&target));

        let mut dead = bullet();
        dead.alive = false;
        target.pos = Vec2::ZERO;
        assert!(!dead.check_hit(&target));
    }

    #[test]
    fn test_heading_matches_spawn_angle() {
        let p = Projectile::new(Vec2::ZERO, 1.0, 100.0, Side::Ai, 1.0, 1.0, 0);
        assert!((p.heading() - 1.0).abs() < 1e-5);
    }
}
