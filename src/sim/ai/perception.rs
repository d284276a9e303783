//! What the AI sees each tick: range to target, incoming fire, cover
//!
//! The target is always visible; there is no line-of-sight model.

use std::f32::consts::PI;

use glam::Vec2;

use crate::sim::arena::Obstacle;
use crate::sim::combatant::Combatant;
use crate::sim::projectile::Projectile;
use crate::{angle_to, normalize_angle};

/// Projectiles further than this are ignored
pub const THREAT_RANGE: f32 = 300.0;
/// Max deviation between a projectile's heading and the bearing to us (radians)
pub const THREAT_CONE: f32 = 0.5;
/// How far behind an obstacle's edge the cover point sits
pub const COVER_OFFSET: f32 = 30.0;
/// Cover points further than this from the AI are not considered
pub const COVER_SEARCH_RADIUS: f32 = 300.0;

/// An opposing projectile on course toward us
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threat {
    pub pos: Vec2,
    /// Projectile heading (radians)
    pub heading: f32,
    pub distance: f32,
}

/// Position behind an obstacle, on the side away from the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPoint {
    pub pos: Vec2,
    /// Index into the arena obstacle list
    pub obstacle: usize,
}

/// Per-tick cache, rebuilt by [`Perception::refresh`]
#[derive(Debug, Clone, Default)]
pub struct Perception {
    pub target_pos: Vec2,
    pub target_vel: Vec2,
    pub distance: f32,
    /// Nearest first
    pub threats: Vec<Threat>,
    pub cover: Option<CoverPoint>,
}

impl Perception {
    pub fn refresh(
        &mut self,
        me: &Combatant,
        target: &Combatant,
        obstacles: &[Obstacle],
        projectiles: &[Projectile],
    ) {
        self.target_pos = target.pos;
        self.target_vel = target.vel;
        self.distance = me.pos.distance(target.pos);
        self.threats = incoming_threats(me, projectiles);
        self.cover = find_cover(me.pos, target.pos, obstacles);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Opposing, live projectiles within range whose heading points at `me`
pub fn incoming_threats(me: &Combatant, projectiles: &[Projectile]) -> Vec<Threat> {
    let mut threats: Vec<Threat> = projectiles
        .iter()
        .filter(|p| p.alive && p.owner != me.side)
        .filter_map(|p| {
            let distance = me.pos.distance(p.pos);
            if distance >= THREAT_RANGE {
                return None;
            }
            let bearing = angle_to(me.pos, p.pos);
            let heading = p.heading();
            // heading toward us is the bearing to the projectile flipped by PI
            let deviation = normalize_angle(heading - bearing + PI).abs();
            (deviation < THREAT_CONE).then_some(Threat {
                pos: p.pos,
                heading,
                distance,
            })
        })
        .collect();
    threats.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    threats
}

/// Best cover point near `me`, scored to stay close while keeping distance from the target
pub fn find_cover(me: Vec2, target: Vec2, obstacles: &[Obstacle]) -> Option<CoverPoint> {
    let mut best: Option<(f32, CoverPoint)> = None;

    for (i, obstacle) in obstacles.iter().enumerate() {
        let center = obstacle.center();
        let away = Vec2::from_angle(angle_to(center, target));
        let reach = obstacle.half_extents() + Vec2::splat(COVER_OFFSET);
        let pos = center - away * reach;

        let to_me = me.distance(pos);
        if to_me >= COVER_SEARCH_RADIUS {
            continue;
        }
        let score = -to_me + pos.distance(target) * 0.5;
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, CoverPoint { pos, obstacle: i }));
        }
    }

    best.map(|(_, cover)| cover)
}
