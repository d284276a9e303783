//! Combatant entity, shared by the human- and AI-driven sides
//!
//! A combatant turns a [`ControlInput`] into its next state: movement (or a
//! dash override), aim, trigger pulls and the timers for reload, regen,
//! invulnerability and the special ability.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collision::resolve_obstacles;
use super::projectile::Projectile;
use super::weapon::{Volley, Weapon};
use crate::consts::{MUZZLE_OFFSET, RECOIL_DECAY_RATE};
use crate::tuning::{BASE_STATS, SPECIAL_SHOT, WeaponKind};
use crate::{angle_to, clamp_unit, ease_out_quad, lerp};

/// Which side of the match an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            Side::Player => 0x00ff88,
            Side::Ai => 0xff3366,
        }
    }
}

/// Per-tick control vector, from a human input layer or the AI controller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Desired movement, each axis in [-1, 1]; longer than 1 is scaled down
    pub movement: Vec2,
    /// World point to face; `None` keeps the current facing
    pub aim: Option<Vec2>,
    pub shooting: bool,
    pub dash: bool,
    pub special: bool,
    pub reload: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashBlocked {
    Dead,
    AlreadyDashing,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialBlocked {
    Dead,
    Cooldown,
}

/// What a call to [`Combatant::take_damage`] actually did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Health removed after damage reduction (0 when ignored)
    pub applied: f32,
    /// This hit was the lethal one
    pub killed: bool,
}

/// Stat a timed buff overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    Speed,
    Damage,
    RapidFire,
}

/// Temporary multiplier override, undone at `expires_at`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    pub expires_at: f64,
    /// Value in place before the buff was applied
    pub restore: f32,
}

/// Things that happened during [`Combatant::update`] that the orchestrator reports
#[derive(Debug, Default)]
pub struct UpdateEvents {
    pub volley: Option<Volley>,
    pub reload_started: bool,
    pub reload_finished: bool,
    /// Still mid-dash after moving this tick
    pub dashing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub side: Side,
    pub color: u32,
    pub pos: Vec2,
    /// Units per second, as moved this tick
    pub vel: Vec2,
    /// Facing (radians)
    pub angle: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub radius: f32,
    pub speed: f32,
    pub speed_multiplier: f32,
    /// Fraction of incoming damage ignored, in [0, 1)
    pub damage_reduction: f32,
    /// Health restored per regen pulse
    pub health_regen: f32,
    last_regen: Option<f64>,

    pub dash_speed: f32,
    pub dash_duration_ms: f64,
    pub dash_cooldown_ms: f64,
    pub is_dashing: bool,
    dash_dir: Vec2,
    dash_start: f64,
    last_dash: Option<f64>,

    pub special_cooldown_ms: f64,
    pub special_ready: bool,
    last_special: Option<f64>,

    invulnerable_until: Option<f64>,

    pub weapon: Weapon,
    /// Weapon family restored on reset
    pub loadout: WeaponKind,
    /// Visual kick from the last shot, decays toward 0
    pub recoil_offset: f32,
    buffs: Vec<Buff>,
}

impl Combatant {
    pub fn new(side: Side, pos: Vec2) -> Self {
        Self {
            side,
            color: side.color(),
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            health: BASE_STATS.max_health,
            max_health: BASE_STATS.max_health,
            alive: true,
            radius: BASE_STATS.radius,
            speed: BASE_STATS.speed,
            speed_multiplier: 1.0,
            damage_reduction: 0.0,
            health_regen: 0.0,
            last_regen: None,
            dash_speed: BASE_STATS.dash_speed,
            dash_duration_ms: BASE_STATS.dash_duration_ms,
            dash_cooldown_ms: BASE_STATS.dash_cooldown_ms,
            is_dashing: false,
            dash_dir: Vec2::ZERO,
            dash_start: 0.0,
            last_dash: None,
            special_cooldown_ms: BASE_STATS.special_cooldown_ms,
            special_ready: true,
            last_special: None,
            invulnerable_until: None,
            weapon: Weapon::default(),
            loadout: WeaponKind::default(),
            recoil_offset: 0.0,
            buffs: Vec::new(),
        }
    }

    /// Reinitialize for a new round at `pos`
    ///
    /// Stats return to base values; upgrades are re-applied by the caller.
    pub fn reset(&mut self, pos: Vec2) {
        let (side, loadout) = (self.side, self.loadout);
        *self = Self::new(side, pos);
        self.loadout = loadout;
        self.weapon = Weapon::new(loadout);
    }

    /// Swap weapon family, keeping upgrade multipliers
    pub fn equip(&mut self, kind: WeaponKind) {
        let old = &self.weapon;
        let mut weapon = Weapon::new(kind);
        weapon.damage_multiplier = old.damage_multiplier;
        weapon.fire_rate_multiplier = old.fire_rate_multiplier;
        weapon.spread_multiplier = old.spread_multiplier;
        weapon.bullet_speed_multiplier = old.bullet_speed_multiplier;
        self.weapon = weapon;
        self.loadout = kind;
    }

    #[inline]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Gun tip position in world space
    pub fn muzzle(&self) -> Vec2 {
        self.pos + Vec2::from_angle(self.angle) * (self.radius + MUZZLE_OFFSET)
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        self.invulnerable_until.is_some_and(|until| now <= until)
    }

    pub fn grant_invulnerability(&mut self, now: f64, duration_ms: f64) {
        let until = now + duration_ms;
        self.invulnerable_until = Some(self.invulnerable_until.map_or(until, |t| t.max(until)));
    }

    /// 0-1, reaching 1 when a dash is available again
    pub fn dash_cooldown_progress(&self, now: f64) -> f32 {
        cooldown_progress(self.last_dash, now, self.dash_cooldown_ms)
    }

    /// 0-1, reaching 1 when the special is available again
    pub fn special_cooldown_progress(&self, now: f64) -> f32 {
        cooldown_progress(self.last_special, now, self.special_cooldown_ms)
    }

    /// Advance one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        now: f64,
        input: &ControlInput,
        arena: &Arena,
        rng: &mut R,
    ) -> UpdateEvents {
        let mut events = UpdateEvents::default();
        if !self.alive {
            return events;
        }

        if self.is_dashing && now - self.dash_start >= self.dash_duration_ms {
            self.is_dashing = false;
        }

        if self.is_dashing {
            let progress = ((now - self.dash_start) / self.dash_duration_ms) as f32;
            let speed = lerp(self.dash_speed, 0.0, ease_out_quad(progress.clamp(0.0, 1.0)));
            self.vel = self.dash_dir * speed;
        } else {
            let dir = clamp_unit(input.movement);
            self.vel = dir * self.speed * self.speed_multiplier;
        }
        self.pos = self.settle(self.pos + self.vel * dt, arena);
        events.dashing = self.is_dashing;

        if let Some(aim) = input.aim {
            if aim != self.pos {
                self.angle = angle_to(self.pos, aim);
            }
        }

        if input.shooting {
            if let Ok(volley) = self.weapon.fire(self.muzzle(), self.angle, now, self.side, rng) {
                self.recoil_offset = volley.recoil;
                events.volley = Some(volley);
            }
        }

        if input.reload {
            events.reload_started = self.weapon.reload(now);
        }
        events.reload_finished = self.weapon.update_reload(now);

        if self.health_regen > 0.0 {
            match self.last_regen {
                Some(last) if now - last > BASE_STATS.regen_interval_ms => {
                    self.heal(self.health_regen);
                    self.last_regen = Some(now);
                }
                Some(_) => {}
                None => self.last_regen = Some(now),
            }
        }

        if self.invulnerable_until.is_some_and(|until| now > until) {
            self.invulnerable_until = None;
        }

        self.special_ready = cooldown_progress(self.last_special, now, self.special_cooldown_ms) >= 1.0;

        self.expire_buffs(now);

        self.recoil_offset *= (-RECOIL_DECAY_RATE * dt).exp();

        events
    }

    /// Obstacle push-out, then clamp inside the arena walls
    fn settle(&self, pos: Vec2, arena: &Arena) -> Vec2 {
        let pos = resolve_obstacles(pos, self.radius, &arena.obstacles);
        arena.bounds.clamp_circle(pos, self.radius)
    }

    /// Start a dash along `direction` (facing when zero)
    pub fn dash(&mut self, now: f64, direction: Vec2) -> Result<(), DashBlocked> {
        if !self.alive {
            return Err(DashBlocked::Dead);
        }
        if self.is_dashing {
            return Err(DashBlocked::AlreadyDashing);
        }
        if self
            .last_dash
            .is_some_and(|last| now - last < self.dash_cooldown_ms)
        {
            return Err(DashBlocked::Cooldown);
        }

        self.is_dashing = true;
        self.dash_start = now;
        self.last_dash = Some(now);
        let dir = direction.normalize_or_zero();
        self.dash_dir = if dir == Vec2::ZERO {
            Vec2::from_angle(self.angle)
        } else {
            dir
        };
        Ok(())
    }

    /// Fire the explosive special shot from the gun tip
    pub fn use_special(&mut self, now: f64) -> Result<Projectile, SpecialBlocked> {
        if !self.alive {
            return Err(SpecialBlocked::Dead);
        }
        if cooldown_progress(self.last_special, now, self.special_cooldown_ms) < 1.0 {
            return Err(SpecialBlocked::Cooldown);
        }
        self.last_special = Some(now);
        self.special_ready = false;

        let mut shot = Projectile::new(
            self.muzzle(),
            self.angle,
            SPECIAL_SHOT.speed,
            self.side,
            SPECIAL_SHOT.damage,
            SPECIAL_SHOT.size,
            SPECIAL_SHOT.color,
        );
        shot.special = true;
        Ok(shot)
    }

    /// Apply damage after reduction; ignored while dead or invulnerable
    pub fn take_damage(&mut self, amount: f32, now: f64) -> DamageOutcome {
        if !self.alive || self.is_invulnerable(now) {
            return DamageOutcome::default();
        }
        let reduced = (amount * (1.0 - self.damage_reduction)).max(0.0);
        let applied = reduced.min(self.health);
        self.health -= applied;

        let killed = self.health <= 0.0;
        if killed {
            self.health = 0.0;
            self.alive = false;
            self.is_dashing = false;
            self.vel = Vec2::ZERO;
        }
        DamageOutcome { applied, killed }
    }

    pub fn heal(&mut self, amount: f32) {
        if self.alive {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Override a multiplier until `now + duration_ms`
    ///
    /// Re-applying an active buff refreshes it without touching the stored restore value.
    pub fn apply_buff(&mut self, kind: BuffKind, value: f32, now: f64, duration_ms: f64) {
        let expires_at = now + duration_ms;
        if let Some(buff) = self.buffs.iter_mut().find(|b| b.kind == kind) {
            buff.expires_at = buff.expires_at.max(expires_at);
        } else {
            let restore = *self.buff_target(kind);
            self.buffs.push(Buff {
                kind,
                expires_at,
                restore,
            });
        }
        *self.buff_target(kind) = value;
    }

    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    fn expire_buffs(&mut self, now: f64) {
        let mut i = 0;
        while i < self.buffs.len() {
            if now >= self.buffs[i].expires_at {
                let buff = self.buffs.swap_remove(i);
                *self.buff_target(buff.kind) = buff.restore;
            } else {
                i += 1;
            }
        }
    }

    fn buff_target(&mut self, kind: BuffKind) -> &mut f32 {
        match kind {
            BuffKind::Speed => &mut self.speed_multiplier,
            BuffKind::Damage => &mut self.weapon.damage_multiplier,
            BuffKind::RapidFire => &mut self.weapon.fire_rate_multiplier,
        }
    }
}

fn cooldown_progress(last: Option<f64>, now: f64, cooldown_ms: f64) -> f32 {
    match last {
        None => 1.0,
        Some(_) if cooldown_ms <= 0.0 => 1.0,
        Some(t) => ((now - t) / cooldown_ms).clamp(0.0, 1.0) as f32,
    }
}
