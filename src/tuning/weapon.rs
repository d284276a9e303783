//! Weapon catalogue

use serde::{Deserialize, Serialize};

/// Weapon families a combatant can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Pistol,
    Smg,
    Shotgun,
    Rifle,
    Minigun,
}

/// Magazine capacity; the default sidearm never runs dry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Magazine {
    Unlimited,
    Rounds(u32),
}

/// Static stat block for a weapon family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub name: &'static str,
    pub damage: f32,
    /// Minimum gap between shots (ms)
    pub fire_interval_ms: f64,
    /// Projectile speed (units/s)
    pub bullet_speed: f32,
    pub bullet_size: f32,
    /// Half-width of the uniform spread cone (radians)
    pub spread: f32,
    /// Projectiles per trigger pull
    pub pellets: u32,
    /// Recoil magnitude reported to the camera/visuals
    pub recoil: f32,
    /// Starting reserve ammo (ignored for unlimited magazines)
    pub reserve_ammo: u32,
    pub magazine: Magazine,
    pub reload_ms: f64,
    pub automatic: bool,
    pub color: u32,
}

const PISTOL: WeaponProfile = WeaponProfile {
    name: "Pistol",
    damage: 20.0,
    fire_interval_ms: 300.0,
    bullet_speed: 900.0,
    bullet_size: 4.0,
    spread: 0.05,
    pellets: 1,
    recoil: 2.0,
    reserve_ammo: 0,
    magazine: Magazine::Unlimited,
    reload_ms: 0.0,
    automatic: false,
    color: 0xffff00,
};

const SMG: WeaponProfile = WeaponProfile {
    name: "SMG",
    damage: 12.0,
    fire_interval_ms: 80.0,
    bullet_speed: 840.0,
    bullet_size: 3.0,
    spread: 0.15,
    pellets: 1,
    recoil: 1.5,
    reserve_ammo: 150,
    magazine: Magazine::Rounds(30),
    reload_ms: 1500.0,
    automatic: true,
    color: 0x00ffff,
};

const SHOTGUN: WeaponProfile = WeaponProfile {
    name: "Shotgun",
    damage: 8.0,
    fire_interval_ms: 800.0,
    bullet_speed: 720.0,
    bullet_size: 3.0,
    spread: 0.3,
    pellets: 8,
    recoil: 8.0,
    reserve_ammo: 24,
    magazine: Magazine::Rounds(6),
    reload_ms: 2000.0,
    automatic: false,
    color: 0xff6600,
};

const RIFLE: WeaponProfile = WeaponProfile {
    name: "Rifle",
    damage: 35.0,
    fire_interval_ms: 500.0,
    bullet_speed: 1200.0,
    bullet_size: 4.0,
    spread: 0.02,
    pellets: 1,
    recoil: 5.0,
    reserve_ammo: 60,
    magazine: Magazine::Rounds(10),
    reload_ms: 2000.0,
    automatic: false,
    color: 0xff00ff,
};

/// Fires at full rate from the first shot; there is no spin-up delay
const MINIGUN: WeaponProfile = WeaponProfile {
    name: "Minigun",
    damage: 8.0,
    fire_interval_ms: 50.0,
    bullet_speed: 960.0,
    bullet_size: 3.0,
    spread: 0.2,
    pellets: 1,
    recoil: 0.5,
    reserve_ammo: 200,
    magazine: Magazine::Rounds(100),
    reload_ms: 3000.0,
    automatic: true,
    color: 0xff0000,
};

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Pistol,
        WeaponKind::Smg,
        WeaponKind::Shotgun,
        WeaponKind::Rifle,
        WeaponKind::Minigun,
    ];

    pub fn profile(&self) -> &'static WeaponProfile {
        match self {
            WeaponKind::Pistol => &PISTOL,
            WeaponKind::Smg => &SMG,
            WeaponKind::Shotgun => &SHOTGUN,
            WeaponKind::Rifle => &RIFLE,
            WeaponKind::Minigun => &MINIGUN,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pistol" => Some(WeaponKind::Pistol),
            "smg" => Some(WeaponKind::Smg),
            "shotgun" => Some(WeaponKind::Shotgun),
            "rifle" => Some(WeaponKind::Rifle),
            "minigun" => Some(WeaponKind::Minigun),
            _ => None,
        }
    }
}
