//! Data-driven game balance
//!
//! Plain tables only; the simulation reads these and never mutates them.
//! Speeds are arena units per second, durations are milliseconds.

pub mod combatant;
pub mod difficulty;
pub mod weapon;

pub use combatant::{BASE_STATS, BaseStats, SPECIAL_SHOT, SpecialShot};
pub use difficulty::DifficultyProfile;
pub use weapon::{Magazine, WeaponKind, WeaponProfile};
