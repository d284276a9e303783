//! Per-tick orchestration
//!
//! Order within a Playing tick:
//! 1. round clock (timeout ends the round)
//! 2. player input, actions and movement
//! 3. AI perceives the updated world, then acts and moves
//! 4. projectiles step, then hit tests
//! 5. power-ups
//! 6. round end on a death

use rand::Rng;

use super::arena::Arena;
use super::combatant::{Combatant, ControlInput, DamageOutcome, Side};
use super::projectile::Projectile;
use super::state::{MatchPhase, MatchState};
use crate::audio::SoundId;
use crate::consts::MAX_FRAME_DT;
use crate::feedback::Feedback;
use crate::stats::MatchStats;
use crate::tuning::SPECIAL_SHOT;

/// Player health fraction that triggers the warning sound
pub const LOW_HEALTH_FRACTION: f32 = 0.3;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Human control vector; ignored under autopilot
    pub player: ControlInput,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - a second AI drives the player
    pub autopilot: bool,
}

/// Advance the match by `dt` seconds
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32, fx: &mut Feedback<'_>) {
    if input.pause {
        state.toggle_pause();
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    match state.phase {
        MatchPhase::Countdown => {
            count_down(state, dt, fx);
            return;
        }
        MatchPhase::Playing => {}
        MatchPhase::Paused | MatchPhase::RoundOver | MatchPhase::MatchOver => return,
    }

    state.now_ms += dt as f64 * 1000.0;
    let now = state.now_ms;

    state.round_time_left -= dt;
    if state.round_time_left <= 0.0 {
        state.round_time_left = 0.0;
        let winner = state.timeout_winner();
        log::debug!("Round {} timed out", state.round);
        finish_round(state, winner, fx);
        return;
    }
    state.stats.time_played += dt;

    let player_input = if input.autopilot {
        state.autopilot.update(
            now,
            &state.player,
            Some(&state.ai),
            &state.arena,
            &state.projectiles,
        )
    } else {
        input.player
    };
    drive(
        &mut state.player,
        &player_input,
        dt,
        now,
        &state.arena,
        &mut state.projectiles,
        &mut state.rng,
        Some(&mut state.stats),
        fx,
    );

    let ai_input = state.brain.update(
        now,
        &state.ai,
        Some(&state.player),
        &state.arena,
        &state.projectiles,
    );
    drive(
        &mut state.ai,
        &ai_input,
        dt,
        now,
        &state.arena,
        &mut state.projectiles,
        &mut state.rng,
        None,
        fx,
    );

    for shot in state.projectiles.iter_mut() {
        shot.step(dt, &state.arena.obstacles);
        let target = match shot.owner {
            Side::Player => &mut state.ai,
            Side::Ai => &mut state.player,
        };
        if !target.alive || !shot.check_hit(target) {
            continue;
        }
        shot.alive = false;
        let outcome = target.take_damage(shot.damage, now);
        if shot.owner == Side::Player {
            state.stats.damage_dealt += outcome.applied;
            state.stats.shots_hit += 1;
        }
        fx.effects.hit_sparks(shot.pos, 10, shot.color);
        if shot.special {
            fx.effects.explosion(shot.pos, SPECIAL_SHOT.blast_scale);
        }
        report_damage(target, outcome, fx);
    }
    state.projectiles.retain(|p| p.alive);

    let (pickups, spawned) = state.powerups.update(
        now,
        &mut state.player,
        &mut state.ai,
        &state.arena.spawn_points,
        &mut state.rng,
    );
    if let Some(kind) = spawned {
        log::debug!("{} spawned", kind.name());
    }
    for pickup in pickups {
        log::debug!("{:?} picked up {}", pickup.side, pickup.kind.name());
        fx.play(SoundId::Pickup);
    }

    warn_low_health(state, fx);

    if !state.player.alive {
        finish_round(state, Some(Side::Ai), fx);
    } else if !state.ai.alive {
        finish_round(state, Some(Side::Player), fx);
    }
}

/// One beep per whole second, then the start signal
fn count_down(state: &mut MatchState, dt: f32, fx: &mut Feedback<'_>) {
    let second = state.countdown.ceil().max(0.0) as u32;
    if second > 0 && state.announced_second != Some(second) {
        state.announced_second = Some(second);
        fx.play(SoundId::Countdown);
    }

    state.countdown -= dt;
    if state.countdown <= 0.0 {
        state.countdown = 0.0;
        state.phase = MatchPhase::Playing;
        fx.play(SoundId::RoundStart);
    }
}

/// Apply one side's control vector: dash and special first, then the entity update
#[allow(clippy::too_many_arguments)]
fn drive<R: Rng + ?Sized>(
    c: &mut Combatant,
    input: &ControlInput,
    dt: f32,
    now: f64,
    arena: &Arena,
    projectiles: &mut Vec<Projectile>,
    rng: &mut R,
    stats: Option<&mut MatchStats>,
    fx: &mut Feedback<'_>,
) {
    if !c.alive {
        return;
    }

    if input.dash && c.dash(now, input.movement).is_ok() {
        fx.play(SoundId::Dash);
    }

    if input.special {
        if let Ok(shot) = c.use_special(now) {
            fx.play(SoundId::Explosion);
            fx.effects.muzzle_flash(shot.pos, c.angle, SPECIAL_SHOT.color);
            fx.effects.shake(10.0);
            projectiles.push(shot);
        }
    }

    let events = c.update(dt, now, input, arena, rng);

    if let Some(volley) = events.volley {
        fx.play(SoundId::Shoot);
        fx.effects
            .muzzle_flash(c.muzzle(), c.angle, c.weapon.profile().color);
        fx.effects.shake(volley.recoil * 0.5);
        if let Some(stats) = stats {
            stats.shots_fired += 1;
        }
        projectiles.extend(volley.projectiles);
    }
    if events.reload_started {
        fx.play(SoundId::Reload);
    }
    if events.dashing {
        fx.effects
            .dash_trail(c.pos, c.radius * 2.0, c.angle, c.color);
    }
}

fn report_damage(target: &Combatant, outcome: DamageOutcome, fx: &mut Feedback<'_>) {
    if outcome.applied > 0.0 || outcome.killed {
        fx.effects.damage_particles(target.pos, 8, target.color);
        fx.play(SoundId::Hit);
    }
    if outcome.killed {
        log::debug!("{:?} eliminated", target.side);
        fx.effects.explosion(target.pos, 1.5);
        fx.play(SoundId::Explosion);
        fx.effects.shake(20.0);
    }
}

/// Edge-triggered: one warning per dip below the threshold
fn warn_low_health(state: &mut MatchState, fx: &mut Feedback<'_>) {
    let low = state.player.alive && state.player.health_fraction() <= LOW_HEALTH_FRACTION;
    if low && !state.low_health_warned {
        fx.play(SoundId::LowHealth);
    }
    state.low_health_warned = low;
}

fn finish_round(state: &mut MatchState, winner: Option<Side>, fx: &mut Feedback<'_>) {
    state.end_round(winner);
    if winner == Some(Side::Player) {
        fx.play(SoundId::Victory);
    } else {
        fx.play(SoundId::Defeat);
    }
}
