//! Between-round upgrades
//!
//! Every effect is an absolute function of level, so re-applying the whole
//! book after a combatant reset reproduces the same stats.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use crate::tuning::BASE_STATS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Offense,
    Defense,
    Mobility,
    Special,
}

impl Category {
    /// Preference weight when the AI chooses among offers
    pub fn ai_weight(&self) -> f32 {
        match self {
            Category::Offense => 0.4,
            Category::Defense => 0.3,
            Category::Mobility => 0.2,
            Category::Special => 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    DamageUp,
    FireRateUp,
    BulletSpeed,
    Accuracy,
    HealthUp,
    Armor,
    Regen,
    SpeedUp,
    DashCooldown,
    DashDistance,
    SpecialCooldown,
}

impl Upgrade {
    pub const ALL: [Upgrade; 11] = [
        Upgrade::DamageUp,
        Upgrade::FireRateUp,
        Upgrade::BulletSpeed,
        Upgrade::Accuracy,
        Upgrade::HealthUp,
        Upgrade::Armor,
        Upgrade::Regen,
        Upgrade::SpeedUp,
        Upgrade::DashCooldown,
        Upgrade::DashDistance,
        Upgrade::SpecialCooldown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Upgrade::DamageUp => "Damage+",
            Upgrade::FireRateUp => "Fire Rate+",
            Upgrade::BulletSpeed => "Velocity+",
            Upgrade::Accuracy => "Precision",
            Upgrade::HealthUp => "Vitality",
            Upgrade::Armor => "Armor",
            Upgrade::Regen => "Regeneration",
            Upgrade::SpeedUp => "Swift",
            Upgrade::DashCooldown => "Quick Dash",
            Upgrade::DashDistance => "Long Dash",
            Upgrade::SpecialCooldown => "Charged",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Upgrade::DamageUp => "+25% weapon damage",
            Upgrade::FireRateUp => "+20% fire rate",
            Upgrade::BulletSpeed => "+15% bullet speed",
            Upgrade::Accuracy => "-30% weapon spread",
            Upgrade::HealthUp => "+25 max health",
            Upgrade::Armor => "+10% damage reduction",
            Upgrade::Regen => "+3 HP per second",
            Upgrade::SpeedUp => "+15% movement speed",
            Upgrade::DashCooldown => "-25% dash cooldown",
            Upgrade::DashDistance => "+20% dash distance",
            Upgrade::SpecialCooldown => "-20% special cooldown",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Upgrade::DamageUp | Upgrade::FireRateUp | Upgrade::BulletSpeed | Upgrade::Accuracy => {
                Category::Offense
            }
            Upgrade::HealthUp | Upgrade::Armor | Upgrade::Regen => Category::Defense,
            Upgrade::SpeedUp | Upgrade::DashCooldown | Upgrade::DashDistance => Category::Mobility,
            Upgrade::SpecialCooldown => Category::Special,
        }
    }

    pub fn max_level(&self) -> u32 {
        match self {
            Upgrade::DamageUp
            | Upgrade::FireRateUp
            | Upgrade::HealthUp
            | Upgrade::Armor
            | Upgrade::SpeedUp => 4,
            Upgrade::BulletSpeed
            | Upgrade::Accuracy
            | Upgrade::Regen
            | Upgrade::DashCooldown
            | Upgrade::DashDistance
            | Upgrade::SpecialCooldown => 3,
        }
    }

    /// Set the stat this upgrade controls to its value at `level`
    pub fn apply(&self, c: &mut Combatant, level: u32) {
        let l = level as f32;
        match self {
            Upgrade::DamageUp => c.weapon.damage_multiplier = 1.0 + l * 0.25,
            Upgrade::FireRateUp => c.weapon.fire_rate_multiplier = 1.0 + l * 0.2,
            Upgrade::BulletSpeed => c.weapon.bullet_speed_multiplier = 1.0 + l * 0.15,
            Upgrade::Accuracy => c.weapon.spread_multiplier = 1.0 - l * 0.3,
            Upgrade::HealthUp => {
                c.max_health = BASE_STATS.max_health + l * 25.0;
                c.health = c.max_health;
            }
            Upgrade::Armor => c.damage_reduction = l * 0.1,
            Upgrade::Regen => c.health_regen = l * 3.0,
            Upgrade::SpeedUp => c.speed_multiplier = 1.0 + l * 0.15,
            Upgrade::DashCooldown => {
                c.dash_cooldown_ms = BASE_STATS.dash_cooldown_ms * (1.0 - level as f64 * 0.25)
            }
            Upgrade::DashDistance => c.dash_speed = BASE_STATS.dash_speed * (1.0 + l * 0.2),
            Upgrade::SpecialCooldown => {
                c.special_cooldown_ms =
                    BASE_STATS.special_cooldown_ms * (1.0 - level as f64 * 0.2)
            }
        }
    }
}

/// Upgrade levels owned by one side for the current match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpgradeBook {
    levels: BTreeMap<Upgrade, u32>,
}

impl UpgradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, upgrade: Upgrade) -> u32 {
        self.levels.get(&upgrade).copied().unwrap_or(0)
    }

    pub fn can_upgrade(&self, upgrade: Upgrade) -> bool {
        self.level(upgrade) < upgrade.max_level()
    }

    /// Raise one level and apply it; false when already maxed
    pub fn upgrade(&mut self, c: &mut Combatant, upgrade: Upgrade) -> bool {
        if !self.can_upgrade(upgrade) {
            return false;
        }
        let level = self.levels.entry(upgrade).or_insert(0);
        *level += 1;
        upgrade.apply(c, *level);
        true
    }

    /// Re-apply every owned level (after a reset)
    pub fn apply_all(&self, c: &mut Combatant) {
        for (upgrade, level) in &self.levels {
            upgrade.apply(c, *level);
        }
    }

    /// Up to `count` distinct random upgrades that are not maxed
    pub fn offers<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Upgrade> {
        let mut available: Vec<Upgrade> = Upgrade::ALL
            .into_iter()
            .filter(|u| self.can_upgrade(*u))
            .collect();
        available.shuffle(rng);
        available.truncate(count);
        available
    }

    /// AI choice: three offers, weighted by category preference
    pub fn ai_pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Upgrade> {
        let offers = self.offers(3, rng);
        let total: f32 = offers.iter().map(|u| u.category().ai_weight()).sum();
        let mut roll = rng.random::<f32>() * total;
        for upgrade in &offers {
            roll -= upgrade.category().ai_weight();
            if roll <= 0.0 {
                return Some(*upgrade);
            }
        }
        offers.first().copied()
    }

    pub fn total_levels(&self) -> u32 {
        self.levels.values().sum()
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }
}
