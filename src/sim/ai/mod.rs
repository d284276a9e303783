//! Scripted opponent
//!
//! The controller never touches the world. Each tick it reads the arena, its
//! own combatant, the target and the live projectiles, and returns the same
//! [`ControlInput`] a human input layer would produce.
//!
//! Three clocks drive it:
//! - perception refreshes every tick
//! - the behavior state is re-chosen every [`DECISION_INTERVAL_MS`]
//! - the aim point is re-sampled every [`AIM_INTERVAL_MS`]

pub mod behavior;
pub mod perception;
pub mod personality;

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub use behavior::{AiState, Intent, Situation};
pub use perception::{CoverPoint, Perception, Threat};
pub use personality::Personality;

use super::arena::Arena;
use super::combatant::{Combatant, ControlInput, Side};
use super::projectile::Projectile;
use crate::random_between;
use crate::settings::Difficulty;
use crate::tuning::DifficultyProfile;

/// Gap between behavior decisions (ms)
pub const DECISION_INTERVAL_MS: f64 = 200.0;
/// Gap between aim re-samples (ms)
pub const AIM_INTERVAL_MS: f64 = 100.0;
/// Dodge hands over to Strafe after this long in-state (ms)
pub const DODGE_DURATION_MS: f64 = 300.0;
/// Per-tick chance of firing a ready special inside [`SPECIAL_RANGE`]
pub const SPECIAL_CHANCE: f32 = 0.02;
pub const SPECIAL_RANGE: f32 = 200.0;
/// Seconds of target velocity to lead by at full prediction skill
pub const PREDICTION_HORIZON_SECS: f32 = 0.2;
/// Aim wobble at zero accuracy (units)
pub const MAX_AIM_WOBBLE: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct AiController {
    pub side: Side,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    personality: Personality,
    state: AiState,
    state_entered_at: f64,
    last_decision: Option<f64>,
    last_shot: Option<f64>,
    /// When the current target was acquired
    reaction_start: Option<f64>,
    strafe_sign: f32,
    last_strafe_flip: f64,
    dodge_dir: Vec2,
    aim_offset: Vec2,
    last_aim_update: Option<f64>,
    perception: Perception,
    rng: Pcg32,
}

impl AiController {
    pub fn new(side: Side, difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let personality = Personality::roll(&mut rng);
        log::debug!(
            "AI ({:?}) personality: range {:.0}, strafe every {:.0}ms",
            difficulty,
            personality.preferred_range,
            personality.strafe_frequency_ms
        );
        Self {
            side,
            difficulty,
            profile: difficulty.profile(),
            personality,
            state: AiState::Idle,
            state_entered_at: 0.0,
            last_decision: None,
            last_shot: None,
            reaction_start: None,
            strafe_sign: 1.0,
            last_strafe_flip: 0.0,
            dodge_dir: Vec2::ZERO,
            aim_offset: Vec2::ZERO,
            last_aim_update: None,
            perception: Perception::default(),
            rng,
        }
    }

    /// Replace the tier constants with a custom profile
    pub fn with_profile(mut self, profile: DifficultyProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    /// Offset added to the target position when aiming
    pub fn aim_offset(&self) -> Vec2 {
        self.aim_offset
    }

    /// Back to Idle with no target history; called at round start
    pub fn reset(&mut self) {
        self.state = AiState::Idle;
        self.state_entered_at = 0.0;
        self.last_decision = None;
        self.last_shot = None;
        self.reaction_start = None;
        self.last_strafe_flip = 0.0;
        self.dodge_dir = Vec2::ZERO;
        self.aim_offset = Vec2::ZERO;
        self.last_aim_update = None;
        self.perception.clear();
    }

    /// Produce this tick's input for `me`
    pub fn update(
        &mut self,
        now: f64,
        me: &Combatant,
        target: Option<&Combatant>,
        arena: &Arena,
        projectiles: &[Projectile],
    ) -> ControlInput {
        if !me.alive {
            return ControlInput::default();
        }
        let Some(target) = target.filter(|t| t.alive) else {
            self.change_state(AiState::Idle, now);
            self.reaction_start = None;
            return ControlInput::default();
        };

        self.perception
            .refresh(me, target, &arena.obstacles, projectiles);

        if self
            .last_decision
            .is_none_or(|t| now - t > DECISION_INTERVAL_MS)
        {
            self.decide(now, me, target);
            self.last_decision = Some(now);
        }

        let acquired = *self.reaction_start.get_or_insert(now);
        if now - acquired < self.profile.reaction_time_ms {
            return ControlInput::default();
        }

        let situation = Situation {
            now,
            me: me.pos,
            target: self.perception.target_pos,
            distance: self.perception.distance,
            cover: self.perception.cover.map(|c| c.pos),
            strafe_sign: self.strafe_sign,
            preferred_range: self.personality.preferred_range,
            dodge_dir: self.dodge_dir,
            dash_ready: me.dash_cooldown_progress(now) >= 1.0,
        };
        let intent = self.state.execute(&situation);

        if self.state == AiState::Dodge && now - self.state_entered_at > DODGE_DURATION_MS {
            self.change_state(AiState::Strafe, now);
        }

        let special = me.special_ready
            && self.perception.distance < SPECIAL_RANGE
            && self.rng.random::<f32>() < SPECIAL_CHANCE;

        self.update_aim(now);
        let shooting = intent.shooting && self.can_shoot(now, me);

        ControlInput {
            movement: intent.movement,
            aim: Some(self.perception.target_pos + self.aim_offset),
            shooting,
            dash: intent.dash,
            special,
            reload: me.weapon.needs_reload(),
        }
    }

    fn decide(&mut self, now: f64, me: &Combatant, target: &Combatant) {
        let next = self.choose_state(me, target);
        self.change_state(next, now);

        if now - self.last_strafe_flip > self.personality.strafe_frequency_ms {
            self.strafe_sign = -self.strafe_sign;
            self.last_strafe_flip = now;
        }
    }

    /// First matching rule wins
    fn choose_state(&mut self, me: &Combatant, target: &Combatant) -> AiState {
        let p = self.profile;

        if let Some(threat) = self.perception.threats.first().copied() {
            if self.rng.random::<f32>() < p.dodge_chance {
                let side = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
                self.dodge_dir = Vec2::from_angle(threat.heading + FRAC_PI_2 * side);
                return AiState::Dodge;
            }
        }

        let health = me.health_fraction();
        if health < 0.3 && self.perception.cover.is_some() {
            return if self.rng.random::<f32>() < p.tactical_skill {
                AiState::TakeCover
            } else {
                AiState::Retreat
            };
        }

        if target.health_fraction() < 0.4
            && health > 0.5
            && self.rng.random::<f32>() < p.aggressiveness
        {
            return AiState::Chase;
        }

        let optimal = self.personality.preferred_range;
        let distance = self.perception.distance;
        if distance > optimal * 1.5 {
            AiState::Chase
        } else if distance < optimal * 0.5 {
            if self.rng.random_bool(0.5) {
                AiState::Strafe
            } else {
                AiState::Retreat
            }
        } else if self.rng.random::<f32>() < 0.7 {
            AiState::Strafe
        } else if self.rng.random::<f32>() < p.tactical_skill {
            AiState::Flank
        } else {
            AiState::Attack
        }
    }

    fn change_state(&mut self, next: AiState, now: f64) {
        if next != self.state {
            log::trace!("AI {:?}: {:?} -> {:?}", self.side, self.state, next);
            self.state = next;
            self.state_entered_at = now;
        }
    }

    /// Re-sample the aim offset: velocity lead plus wobble
    fn update_aim(&mut self, now: f64) {
        if self
            .last_aim_update
            .is_some_and(|t| now - t <= AIM_INTERVAL_MS)
        {
            return;
        }
        self.last_aim_update = Some(now);

        let wobble = (1.0 - self.profile.aim_accuracy) * MAX_AIM_WOBBLE;
        let lead = if self.profile.prediction_skill > 0.0 {
            self.perception.target_vel * self.profile.prediction_skill * PREDICTION_HORIZON_SECS
        } else {
            Vec2::ZERO
        };
        let jitter = Vec2::new(
            random_between(&mut self.rng, -wobble, wobble),
            random_between(&mut self.rng, -wobble, wobble),
        );
        self.aim_offset = lead + jitter;
    }

    /// Extra shot spacing on top of the weapon's own fire rate
    fn can_shoot(&mut self, now: f64, me: &Combatant) -> bool {
        if self
            .last_shot
            .is_some_and(|t| now - t < self.profile.shooting_delay_ms)
        {
            return false;
        }
        if !me.weapon.can_fire(now) {
            return false;
        }
        self.last_shot = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::Obstacle;
    use crate::tuning::WeaponKind;
    use crate::tuning::difficulty::{EASY, MEDIUM};

    const TICK_MS: f64 = 1000.0 / 60.0;

    fn duel(distance: f32) -> (Combatant, Combatant) {
        let me = Combatant::new(Side::Ai, Vec2::new(1000.0, 400.0));
        let target = Combatant::new(Side::Player, Vec2::new(1000.0 - distance, 400.0));
        (me, target)
    }

    fn steady(profile: DifficultyProfile) -> DifficultyProfile {
        DifficultyProfile {
            reaction_time_ms: 0.0,
            dodge_chance: 0.0,
            ..profile
        }
    }

    #[test]
    fn test_reaction_delay_withholds_input() {
        let arena = Arena::open();
        let (me, target) = duel(900.0);
        let mut ai = AiController::new(Side::Ai, Difficulty::Easy, 1);
        let t0 = 1000.0;

        let mut now = t0;
        while now < t0 + EASY.reaction_time_ms {
            let input = ai.update(now, &me, Some(&target), &arena, &[]);
            assert_eq!(input, ControlInput::default(), "acted at {}", now);
            now += TICK_MS;
        }
        assert_eq!(ai.state(), AiState::Chase);

        let input = ai.update(t0 + EASY.reaction_time_ms, &me, Some(&target), &arena, &[]);
        assert!(input.movement.x < 0.0, "closes in once reacted");
        assert!(input.aim.is_some());
    }

    #[test]
    fn test_reaction_is_per_acquisition() {
        let arena = Arena::open();
        let (me, mut target) = duel(900.0);
        let mut ai = AiController::new(Side::Ai, Difficulty::Medium, 2);
        ai.update(0.0, &me, Some(&target), &arena, &[]);
        let reacted = ai.update(MEDIUM.reaction_time_ms, &me, Some(&target), &arena, &[]);
        assert_ne!(reacted.movement, Vec2::ZERO);
        // later decision cycles do not re-arm the delay
        let later = ai.update(MEDIUM.reaction_time_ms + 450.0, &me, Some(&target), &arena, &[]);
        assert_ne!(later.movement, Vec2::ZERO);

        target.take_damage(1000.0, 0.0);
        assert_eq!(
            ai.update(2000.0, &me, Some(&target), &arena, &[]),
            ControlInput::default()
        );
        assert_eq!(ai.state(), AiState::Idle);

        let fresh = Combatant::new(Side::Player, Vec2::new(100.0, 400.0));
        let input = ai.update(3000.0, &me, Some(&fresh), &arena, &[]);
        assert_eq!(input, ControlInput::default(), "new target, new delay");
    }

    #[test]
    fn test_missing_target_is_idle() {
        let arena = Arena::open();
        let (me, _) = duel(300.0);
        let mut ai = AiController::new(Side::Ai, Difficulty::Hard, 3);
        assert_eq!(ai.update(0.0, &me, None, &arena, &[]), ControlInput::default());
        assert_eq!(ai.state(), AiState::Idle);
    }

    #[test]
    fn test_dead_self_emits_nothing() {
        let arena = Arena::open();
        let (mut me, target) = duel(300.0);
        me.take_damage(1000.0, 0.0);
        let mut ai = AiController::new(Side::Ai, Difficulty::Insane, 3);
        assert_eq!(
            ai.update(0.0, &me, Some(&target), &arena, &[]),
            ControlInput::default()
        );
    }

    #[test]
    fn test_decision_cadence() {
        let arena = Arena::open();
        let (me, target) = duel(220.0);
        let mut ai = AiController::new(Side::Ai, Difficulty::Medium, 4)
            .with_profile(steady(MEDIUM));

        let mut last_change: Option<f64> = None;
        let mut prev = ai.state();
        for i in 0..600 {
            let now = i as f64 * TICK_MS;
            ai.update(now, &me, Some(&target), &arena, &[]);
            if ai.state() != prev {
                if let Some(t) = last_change {
                    assert!(now - t > DECISION_INTERVAL_MS, "{:?} at {} after {}", ai.state(), now, t);
                }
                last_change = Some(now);
                prev = ai.state();
            }
        }
        assert!(last_change.is_some());
    }

    #[test]
    fn test_certain_dodge_on_incoming_fire() {
        let arena = Arena::open();
        let (me, target) = duel(500.0);
        let bullet = Projectile::new(Vec2::new(800.0, 400.0), 0.0, 900.0, Side::Player, 10.0, 4.0, 0);
        let profile = DifficultyProfile {
            dodge_chance: 1.0,
            reaction_time_ms: 0.0,
            ..MEDIUM
        };
        for seed in 0..50 {
            let mut ai = AiController::new(Side::Ai, Difficulty::Medium, seed).with_profile(profile);
            let input = ai.update(0.0, &me, Some(&target), &arena, std::slice::from_ref(&bullet));
            assert_eq!(ai.state(), AiState::Dodge, "seed {}", seed);
            assert!(input.movement.x.abs() < 1e-4);
            assert!((input.movement.y.abs() - 1.0).abs() < 1e-4);
            assert!(input.dash);
        }
    }

    #[test]
    fn test_own_fire_is_not_a_threat() {
        let arena = Arena::open();
        let (me, target) = duel(500.0);
        let own = Projectile::new(Vec2::new(800.0, 400.0), 0.0, 900.0, Side::Ai, 10.0, 4.0, 0);
        let profile = DifficultyProfile {
            dodge_chance: 1.0,
            ..MEDIUM
        };
        let mut ai = AiController::new(Side::Ai, Difficulty::Medium, 5).with_profile(profile);
        ai.update(0.0, &me, Some(&target), &arena, &[own]);
        assert_ne!(ai.state(), AiState::Dodge);
    }

    #[test]
    fn test_dodge_hands_over_to_strafe() {
        let arena = Arena::open();
        let (me, target) = duel(500.0);
        let bullet = Projectile::new(Vec2::new(800.0, 400.0), 0.0, 900.0, Side::Player, 10.0, 4.0, 0);
        let profile = DifficultyProfile {
            dodge_chance: 1.0,
            reaction_time_ms: 0.0,
            ..MEDIUM
        };
        let mut ai = AiController::new(Side::Ai, Difficulty::Medium, 6).with_profile(profile);
        ai.update(0.0, &me, Some(&target), &arena, std::slice::from_ref(&bullet));
        assert_eq!(ai.state(), AiState::Dodge);
        // threat gone; next decision is at 200+, state must survive to 300
        ai.update(150.0, &me, Some(&target), &arena, &[]);
        assert_eq!(ai.state(), AiState::Dodge);
        ai.last_decision = Some(250.0);
        ai.update(301.0, &me, Some(&target), &arena, &[]);
        assert_eq!(ai.state(), AiState::Strafe);
    }

    #[test]
    fn test_prediction_is_time_based() {
        let arena = Arena::open();
        let (me, mut target) = duel(250.0);
        target.vel = Vec2::new(100.0, 0.0);
        let profile = DifficultyProfile {
            aim_accuracy: 1.0,
            prediction_skill: 0.5,
            ..steady(MEDIUM)
        };
        let mut ai = AiController::new(Side::Ai, Difficulty::Medium, 7).with_profile(profile);
        let input = ai.update(0.0, &me, Some(&target), &arena, &[]);
        assert!((ai.aim_offset() - Vec2::new(10.0, 0.0)).length() < 1e-4);
        let aim = input.aim.unwrap();
        assert!((aim - (target.pos + Vec2::new(10.0, 0.0))).length() < 1e-3);
    }

    #[test]
    fn test_aim_resamples_on_interval() {
        let arena = Arena::open();
        let (me, target) = duel(250.0);
        let mut ai = AiController::new(Side::Ai, Difficulty::Easy, 8).with_profile(steady(EASY));
        ai.update(0.0, &me, Some(&target), &arena, &[]);
        let first = ai.aim_offset();
        ai.update(100.0, &me, Some(&target), &arena, &[]);
        assert_eq!(ai.aim_offset(), first);
        ai.update(101.0, &me, Some(&target), &arena, &[]);
        assert_ne!(ai.aim_offset(), first);
        let wobble = (1.0 - EASY.aim_accuracy) * MAX_AIM_WOBBLE;
        assert!(ai.aim_offset().x.abs() <= wobble + 1e-4);
    }

    #[test]
    fn test_shooting_delay_gates_shots() {
        let arena = Arena::open();
        let (mut me, target) = duel(250.0);
        me.equip(WeaponKind::Minigun);
        let profile = DifficultyProfile {
            shooting_delay_ms: 300.0,
            ..steady(MEDIUM)
        };
        let mut ai = AiController::new(Side::Ai, Difficulty::Medium, 9)
            .with_profile(profile)
            .with_personality(Personality {
                preferred_range: 250.0,
                strafe_frequency_ms: 1000.0,
                patience: 0.5,
            });
        ai.state = AiState::Attack;
        ai.last_decision = Some(0.0);
        ai.reaction_start = Some(0.0);

        assert!(ai.update(1.0, &me, Some(&target), &arena, &[]).shooting);
        ai.state = AiState::Attack;
        assert!(!ai.update(200.0, &me, Some(&target), &arena, &[]).shooting);
        ai.state = AiState::Attack;
        assert!(ai.update(301.0, &me, Some(&target), &arena, &[]).shooting);
    }

    #[test]
    fn test_requests_reload_when_empty() {
        let arena = Arena::open();
        let (mut me, target) = duel(250.0);
        me.equip(WeaponKind::Rifle);
        me.weapon.current_ammo = 0;
        let mut ai = AiController::new(Side::Ai, Difficulty::Hard, 10).with_profile(steady(MEDIUM));
        let input = ai.update(0.0, &me, Some(&target), &arena, &[]);
        assert!(input.reload);
        assert!(!input.shooting);
    }

    #[test]
    fn test_low_health_with_cover_hides_or_runs() {
        let mut arena = Arena::open();
        arena.obstacles.push(Obstacle::new(850.0, 375.0, 50.0, 50.0));
        let (mut me, target) = duel(400.0);
        me.health = 20.0;
        for seed in 0..20 {
            let mut ai = AiController::new(Side::Ai, Difficulty::Hard, seed).with_profile(steady(MEDIUM));
            ai.update(0.0, &me, Some(&target), &arena, &[]);
            assert!(
                matches!(ai.state(), AiState::TakeCover | AiState::Retreat),
                "{:?}",
                ai.state()
            );
        }
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let arena = Arena::open();
        let (me, target) = duel(900.0);
        let mut ai = AiController::new(Side::Ai, Difficulty::Insane, 11);
        ai.update(0.0, &me, Some(&target), &arena, &[]);
        assert_eq!(ai.state(), AiState::Chase);
        ai.reset();
        assert_eq!(ai.state(), AiState::Idle);
        assert_eq!(ai.perception().threats.len(), 0);
        let input = ai.update(10.0, &me, Some(&target), &arena, &[]);
        assert_eq!(input, ControlInput::default(), "reaction delay re-armed");
    }

    #[test]
    fn test_same_seed_same_personality() {
        let a = AiController::new(Side::Ai, Difficulty::Medium, 42);
        let b = AiController::new(Side::Ai, Difficulty::Hard, 42);
        assert_eq!(a.personality(), b.personality());
    }
}
