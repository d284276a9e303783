//! Combatant base stats and the default special ability

/// Unmodified combatant stats; upgrades and buffs scale from these
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub max_health: f32,
    /// Walk speed (units/s)
    pub speed: f32,
    /// Collision radius
    pub radius: f32,
    /// Peak dash speed (units/s), decays with an ease-out curve
    pub dash_speed: f32,
    pub dash_duration_ms: f64,
    pub dash_cooldown_ms: f64,
    pub special_cooldown_ms: f64,
    /// Delay between regen pulses
    pub regen_interval_ms: f64,
}

pub const BASE_STATS: BaseStats = BaseStats {
    max_health: 100.0,
    speed: 240.0,
    radius: 20.0,
    dash_speed: 900.0,
    dash_duration_ms: 150.0,
    dash_cooldown_ms: 2000.0,
    special_cooldown_ms: 10_000.0,
    regen_interval_ms: 1000.0,
};

/// Explosive shot fired by the special ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialShot {
    pub damage: f32,
    pub speed: f32,
    pub size: f32,
    pub color: u32,
    /// Explosion scale hint when it connects
    pub blast_scale: f32,
}

pub const SPECIAL_SHOT: SpecialShot = SpecialShot {
    damage: 50.0,
    speed: 720.0,
    size: 8.0,
    color: 0xaa44ff,
    blast_scale: 0.8,
};
