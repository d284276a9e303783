//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives as a millisecond clock plus a clamped delta
//! - Seeded RNG only
//! - Stable iteration order
//! - No rendering, audio or platform dependencies (cues go through `Feedback`)

pub mod ai;
pub mod arena;
pub mod collision;
pub mod combatant;
pub mod powerup;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod weapon;

pub use ai::{AiController, AiState};
pub use arena::{Arena, Bounds, Layout, Obstacle};
pub use collision::{CollisionResult, circle_rect_collision, circles_overlap, resolve_obstacles};
pub use combatant::{
    Combatant, ControlInput, DamageOutcome, DashBlocked, Side, SpecialBlocked, UpdateEvents,
};
pub use powerup::{PowerUp, PowerUpField, PowerUpKind};
pub use projectile::Projectile;
pub use state::{MatchPhase, MatchState};
pub use tick::{TickInput, tick};
pub use upgrade::{Category, Upgrade, UpgradeBook};
pub use weapon::{FireBlocked, Volley, Weapon};
