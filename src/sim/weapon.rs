//! Weapon instance: ammo, reload timer and upgrade multipliers

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::combatant::Side;
use super::projectile::Projectile;
use crate::random_between;
use crate::tuning::{Magazine, WeaponKind, WeaponProfile};

/// Why a trigger pull produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireBlocked {
    Reloading,
    Empty,
    Cooldown,
}

/// Result of a successful trigger pull
#[derive(Debug, Clone)]
pub struct Volley {
    pub projectiles: Vec<Projectile>,
    /// Recoil magnitude for visuals/camera shake
    pub recoil: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Rounds in the magazine (unused for unlimited magazines)
    pub current_ammo: u32,
    pub reserve_ammo: u32,
    pub is_reloading: bool,
    reload_start: f64,
    last_fire_time: Option<f64>,
    pub damage_multiplier: f32,
    pub fire_rate_multiplier: f32,
    pub spread_multiplier: f32,
    pub bullet_speed_multiplier: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponKind::Pistol)
    }
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let profile = kind.profile();
        Self {
            kind,
            current_ammo: magazine_rounds(profile),
            reserve_ammo: profile.reserve_ammo,
            is_reloading: false,
            reload_start: 0.0,
            last_fire_time: None,
            damage_multiplier: 1.0,
            fire_rate_multiplier: 1.0,
            spread_multiplier: 1.0,
            bullet_speed_multiplier: 1.0,
        }
    }

    #[inline]
    pub fn profile(&self) -> &'static WeaponProfile {
        self.kind.profile()
    }

    /// Magazine capacity, `None` for unlimited
    pub fn magazine_size(&self) -> Option<u32> {
        match self.profile().magazine {
            Magazine::Unlimited => None,
            Magazine::Rounds(n) => Some(n),
        }
    }

    /// Effective gap between shots after the fire-rate multiplier (ms)
    pub fn fire_interval_ms(&self) -> f64 {
        self.profile().fire_interval_ms / self.fire_rate_multiplier as f64
    }

    pub fn check_fire(&self, now: f64) -> Result<(), FireBlocked> {
        if self.is_reloading {
            return Err(FireBlocked::Reloading);
        }
        if self.magazine_size().is_some() && self.current_ammo == 0 {
            return Err(FireBlocked::Empty);
        }
        match self.last_fire_time {
            Some(last) if now - last < self.fire_interval_ms() => Err(FireBlocked::Cooldown),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn can_fire(&self, now: f64) -> bool {
        self.check_fire(now).is_ok()
    }

    /// Pull the trigger at `origin` facing `angle`
    ///
    /// Each pellet draws its own spread sample.
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        origin: Vec2,
        angle: f32,
        now: f64,
        owner: Side,
        rng: &mut R,
    ) -> Result<Volley, FireBlocked> {
        self.check_fire(now)?;
        self.last_fire_time = Some(now);

        let profile = self.profile();
        let spread = profile.spread * self.spread_multiplier;
        let speed = profile.bullet_speed * self.bullet_speed_multiplier;
        let damage = profile.damage * self.damage_multiplier;

        let projectiles = (0..profile.pellets)
            .map(|_| {
                let heading = angle + random_between(rng, -spread, spread);
                Projectile::new(
                    origin,
                    heading,
                    speed,
                    owner,
                    damage,
                    profile.bullet_size,
                    profile.color,
                )
            })
            .collect();

        if self.magazine_size().is_some() {
            self.current_ammo = self.current_ammo.saturating_sub(1);
        }

        Ok(Volley {
            projectiles,
            recoil: profile.recoil,
        })
    }

    /// Start a timed reload; returns whether one actually started
    pub fn reload(&mut self, now: f64) -> bool {
        let Some(size) = self.magazine_size() else {
            return false;
        };
        if self.is_reloading || self.current_ammo >= size || self.reserve_ammo == 0 {
            return false;
        }
        self.is_reloading = true;
        self.reload_start = now;
        true
    }

    /// Finish a pending reload once its time has elapsed; returns whether it completed
    pub fn update_reload(&mut self, now: f64) -> bool {
        if !self.is_reloading || now - self.reload_start < self.profile().reload_ms {
            return false;
        }
        if let Some(size) = self.magazine_size() {
            let load = size.saturating_sub(self.current_ammo).min(self.reserve_ammo);
            self.current_ammo += load;
            self.reserve_ammo -= load;
        }
        self.is_reloading = false;
        true
    }

    /// 0-1 reload completion, 1 when idle
    pub fn reload_progress(&self, now: f64) -> f32 {
        if !self.is_reloading {
            return 1.0;
        }
        ((now - self.reload_start) / self.profile().reload_ms).clamp(0.0, 1.0) as f32
    }

    /// Add reserve rounds, capped at twice the starting reserve
    pub fn add_ammo(&mut self, amount: u32) {
        let cap = self.profile().reserve_ammo * 2;
        self.reserve_ammo = self.reserve_ammo.saturating_add(amount).min(cap);
    }

    pub fn needs_reload(&self) -> bool {
        self.magazine_size().is_some()
            && self.current_ammo == 0
            && self.reserve_ammo > 0
            && !self.is_reloading
    }

    /// Short ammo readout for HUDs
    pub fn ammo_display(&self) -> String {
        match self.magazine_size() {
            None => "\u{221e}".to_string(),
            Some(_) => format!("{}/{}", self.current_ammo, self.reserve_ammo),
        }
    }
}

fn magazine_rounds(profile: &WeaponProfile) -> u32 {
    match profile.magazine {
        Magazine::Unlimited => 0,
        Magazine::Rounds(n) => n,
    }
}
