//! Arena Rivals - a top-down arena shooter against a scripted AI rival
//!
//! Core modules:
//! - `sim`: Deterministic simulation (combatants, weapons, AI, match flow)
//! - `tuning`: Data-driven game balance (weapons, difficulty tiers, base stats)
//! - `feedback`: Audio/visual collaborator traits injected into the simulation
//! - `audio`: Sound table and Web Audio synthesis
//! - `settings` / `stats`: Persisted preferences and career statistics

pub mod audio;
pub mod feedback;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use settings::{Difficulty, MatchConfig, Settings, TieBreak};
pub use stats::{CareerStats, MatchStats};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the hosts (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Upper bound on a single frame delta (seconds), guards against stalled tabs
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1200.0;
    pub const ARENA_HEIGHT: f32 = 800.0;
    /// Horizontal inset of both spawn points from the side walls
    pub const SPAWN_INSET: f32 = 150.0;

    /// Distance from combatant center to the gun tip, beyond its radius
    pub const MUZZLE_OFFSET: f32 = 15.0;

    /// Projectile hard expiry (ms)
    pub const PROJECTILE_MAX_LIFETIME_MS: f64 = 3000.0;

    /// Visual recoil offset decay rate (1/s); roughly 20% per 60 Hz frame
    pub const RECOIL_DECAY_RATE: f32 = 13.4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Bearing (radians) from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Quadratic ease-out: fast start, decelerating to 1.0 at t = 1
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range instead of panicking
#[inline]
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Scale `v` down to unit length if it is longer than 1 (keeps partial stick deflection)
#[inline]
pub fn clamp_unit(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 1.0 { v / len } else { v }
}
