//! Power-up pickups and their spawner

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use super::combatant::{BuffKind, Combatant, Side};

/// Pickup radius
pub const POWERUP_RADIUS: f32 = 18.0;
/// Time on the floor before despawning (ms)
pub const POWERUP_LIFETIME_MS: f64 = 15_000.0;
/// Gap between spawn attempts (ms)
pub const SPAWN_INTERVAL_MS: f64 = 10_000.0;
/// Spawner holds off while this many are on the floor
pub const MAX_POWERUPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Shield,
    Speed,
    Damage,
    RapidFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Health,
        PowerUpKind::Shield,
        PowerUpKind::Speed,
        PowerUpKind::Damage,
        PowerUpKind::RapidFire,
    ];

    /// Relative spawn weight (health is the most common)
    pub fn weight(&self) -> f32 {
        match self {
            PowerUpKind::Health => 3.0,
            PowerUpKind::Shield => 1.0,
            PowerUpKind::Speed | PowerUpKind::Damage | PowerUpKind::RapidFire => 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "Health Pack",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Speed => "Speed Boost",
            PowerUpKind::Damage => "Damage Boost",
            PowerUpKind::RapidFire => "Rapid Fire",
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Health => 0xff4444,
            PowerUpKind::Shield => 0x4488ff,
            PowerUpKind::Speed => 0xffff00,
            PowerUpKind::Damage => 0xff6600,
            PowerUpKind::RapidFire => 0xff0088,
        }
    }

    /// Effect duration, 0 for instant effects
    pub fn duration_ms(&self) -> f64 {
        match self {
            PowerUpKind::Health => 0.0,
            PowerUpKind::Shield => 5000.0,
            PowerUpKind::Speed | PowerUpKind::RapidFire => 8000.0,
            PowerUpKind::Damage => 10_000.0,
        }
    }

    pub fn apply(&self, c: &mut Combatant, now: f64) {
        let duration = self.duration_ms();
        match self {
            PowerUpKind::Health => c.heal(50.0),
            PowerUpKind::Shield => c.grant_invulnerability(now, duration),
            PowerUpKind::Speed => c.apply_buff(BuffKind::Speed, 1.5, now, duration),
            PowerUpKind::Damage => c.apply_buff(BuffKind::Damage, 2.0, now, duration),
            PowerUpKind::RapidFire => c.apply_buff(BuffKind::RapidFire, 2.0, now, duration),
        }
    }

    /// Weighted random kind
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: f32 = Self::ALL.iter().map(|k| k.weight()).sum();
        let mut roll = rng.random::<f32>() * total;
        for kind in Self::ALL {
            roll -= kind.weight();
            if roll <= 0.0 {
                return kind;
            }
        }
        PowerUpKind::Health
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub spawned_at: f64,
    pub alive: bool,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2, now: f64) -> Self {
        Self {
            kind,
            pos,
            radius: POWERUP_RADIUS,
            spawned_at: now,
            alive: true,
        }
    }

    pub fn expired(&self, now: f64) -> bool {
        now - self.spawned_at > POWERUP_LIFETIME_MS
    }

    /// Hand the effect to `c` if it is touching this pickup
    pub fn collect(&mut self, c: &mut Combatant, now: f64) -> bool {
        if !self.alive || !c.alive || !circles_overlap(self.pos, self.radius, c.pos, c.radius) {
            return false;
        }
        self.alive = false;
        self.kind.apply(c, now);
        true
    }
}

/// A pickup event for the orchestrator to report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub side: Side,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

/// Floor items plus the spawn clock for one round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpField {
    pub items: Vec<PowerUp>,
    last_spawn: f64,
}

impl PowerUpField {
    /// Empty field whose spawn clock starts at `now`
    pub fn new(now: f64) -> Self {
        Self {
            items: Vec::new(),
            last_spawn: now,
        }
    }

    /// Collect, expire and spawn; the player is checked before the AI
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        player: &mut Combatant,
        ai: &mut Combatant,
        spawn_points: &[Vec2],
        rng: &mut R,
    ) -> (Vec<Pickup>, Option<PowerUpKind>) {
        let mut pickups = Vec::new();
        for item in &mut self.items {
            for c in [&mut *player, &mut *ai] {
                if item.collect(c, now) {
                    pickups.push(Pickup {
                        side: c.side,
                        kind: item.kind,
                        pos: item.pos,
                    });
                }
            }
            if item.expired(now) {
                item.alive = false;
            }
        }
        self.items.retain(|p| p.alive);

        let mut spawned = None;
        if now - self.last_spawn > SPAWN_INTERVAL_MS && self.items.len() < MAX_POWERUPS {
            self.last_spawn = now;
            if !spawn_points.is_empty() {
                let pos = spawn_points[rng.random_range(0..spawn_points.len())];
                let kind = PowerUpKind::roll(rng);
                self.items.push(PowerUp::new(kind, pos, now));
                spawned = Some(kind);
            }
        }
        (pickups, spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pair() -> (Combatant, Combatant) {
        (
            Combatant::new(Side::Player, Vec2::new(100.0, 100.0)),
            Combatant::new(Side::Ai, Vec2::new(1000.0, 100.0)),
        )
    }

    #[test]
    fn test_spawns_after_interval_up_to_cap() {
        let (mut p, mut a) = pair();
        let mut rng = Pcg32::seed_from_u64(2);
        let points = [Vec2::new(600.0, 400.0)];
        let mut field = PowerUpField::new(0.0);

        let (_, spawned) = field.update(10_000.0, &mut p, &mut a, &points, &mut rng);
        assert!(spawned.is_none());
        let (_, spawned) = field.update(10_001.0, &mut p, &mut a, &points, &mut rng);
        assert!(spawned.is_some());
        assert_eq!(field.items.len(), 1);
        assert_eq!(field.items[0].pos, points[0]);

        let mut full = PowerUpField::new(0.0);
        for _ in 0..MAX_POWERUPS {
            full.items
                .push(PowerUp::new(PowerUpKind::Health, points[0], 20_000.0));
        }
        let (_, spawned) = full.update(20_001.0, &mut p, &mut a, &points, &mut rng);
        assert!(spawned.is_none());
        assert_eq!(full.items.len(), MAX_POWERUPS);
    }

    #[test]
    fn test_player_collects_first() {
        let (mut p, mut a) = pair();
        p.pos = Vec2::new(600.0, 400.0);
        a.pos = Vec2::new(610.0, 400.0);
        p.health = 40.0;
        let mut field = PowerUpField::new(0.0);
        field
            .items
            .push(PowerUp::new(PowerUpKind::Health, Vec2::new(605.0, 400.0), 0.0));
        let mut rng = Pcg32::seed_from_u64(2);
        let (pickups, _) = field.update(100.0, &mut p, &mut a, &[], &mut rng);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].side, Side::Player);
        assert_eq!(p.health, 90.0);
        assert!(field.items.is_empty());
    }

    #[test]
    fn test_despawn_after_lifetime() {
        let (mut p, mut a) = pair();
        let mut field = PowerUpField::new(0.0);
        field
            .items
            .push(PowerUp::new(PowerUpKind::Shield, Vec2::new(600.0, 400.0), 0.0));
        let mut rng = Pcg32::seed_from_u64(2);
        field.update(15_000.0, &mut p, &mut a, &[], &mut rng);
        assert_eq!(field.items.len(), 1);
        field.update(15_001.0, &mut p, &mut a, &[], &mut rng);
        assert!(field.items.is_empty());
    }

    #[test]
    fn test_timed_effects() {
        let (mut p, _) = pair();
        PowerUpKind::Shield.apply(&mut p, 0.0);
        assert!(p.is_invulnerable(5000.0));
        assert!(!p.is_invulnerable(5001.0));

        PowerUpKind::RapidFire.apply(&mut p, 0.0);
        assert_eq!(p.weapon.fire_rate_multiplier, 2.0);
        PowerUpKind::Damage.apply(&mut p, 0.0);
        assert_eq!(p.weapon.damage_multiplier, 2.0);
        assert_eq!(p.buffs().len(), 2);
    }

    #[test]
    fn test_roll_weights() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut health = 0;
        let mut shield = 0;
        for _ in 0..5000 {
            match PowerUpKind::roll(&mut rng) {
                PowerUpKind::Health => health += 1,
                PowerUpKind::Shield => shield += 1,
                _ => {}
            }
        }
        assert!(health > shield * 2);
    }
}
