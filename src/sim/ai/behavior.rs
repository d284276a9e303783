//! Behavior states and what each one does on a tick

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::angle_to;

/// Chase only opens fire inside this range
pub const CHASE_FIRE_RANGE: f32 = 400.0;
/// Flank only opens fire inside this range
pub const FLANK_FIRE_RANGE: f32 = 350.0;
/// Retreat dashes away when the target is this close
pub const RETREAT_DASH_RANGE: f32 = 100.0;
/// TakeCover stops moving this close to the cover point
pub const COVER_ARRIVE_RADIUS: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Chase,
    Attack,
    Retreat,
    Flank,
    TakeCover,
    Dodge,
    Strafe,
}

/// Inputs a behavior reads; snapshot of the controller and its perception
#[derive(Debug, Clone, Copy)]
pub struct Situation {
    pub now: f64,
    pub me: Vec2,
    pub target: Vec2,
    pub distance: f32,
    pub cover: Option<Vec2>,
    /// +1 or -1
    pub strafe_sign: f32,
    pub preferred_range: f32,
    pub dodge_dir: Vec2,
    /// Dash cooldown has fully elapsed
    pub dash_ready: bool,
}

/// Desired action for this tick before shot gating
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub movement: Vec2,
    pub shooting: bool,
    pub dash: bool,
}

impl AiState {
    pub fn execute(&self, s: &Situation) -> Intent {
        let to_target = angle_to(s.me, s.target);
        match self {
            AiState::Idle => Intent::default(),
            AiState::Chase => Intent {
                movement: Vec2::from_angle(to_target),
                shooting: s.distance < CHASE_FIRE_RANGE,
                dash: false,
            },
            AiState::Attack => Intent {
                // small sideways jitter so it is not a sitting duck
                movement: Vec2::new((s.now * 0.005).sin() as f32 * 0.3, 0.0),
                shooting: true,
                dash: false,
            },
            AiState::Retreat => retreat(s, to_target),
            AiState::Flank => {
                let flank = to_target + FRAC_PI_2 * s.strafe_sign;
                Intent {
                    movement: Vec2::from_angle(flank) * 0.7 + Vec2::from_angle(to_target) * 0.3,
                    shooting: s.distance < FLANK_FIRE_RANGE,
                    dash: false,
                }
            }
            AiState::TakeCover => match s.cover {
                Some(cover) => {
                    let movement = if s.me.distance(cover) > COVER_ARRIVE_RADIUS {
                        Vec2::from_angle(angle_to(s.me, cover))
                    } else {
                        Vec2::ZERO
                    };
                    Intent {
                        movement,
                        shooting: true,
                        dash: false,
                    }
                }
                None => retreat(s, to_target),
            },
            AiState::Dodge => Intent {
                movement: s.dodge_dir,
                shooting: false,
                dash: s.dash_ready,
            },
            AiState::Strafe => {
                let strafe = to_target + FRAC_PI_2 * s.strafe_sign;
                let range_error = (s.distance - s.preferred_range) / 100.0;
                Intent {
                    movement: Vec2::from_angle(strafe) * 0.8
                        + Vec2::from_angle(to_target) * range_error * 0.4,
                    shooting: true,
                    dash: false,
                }
            }
        }
    }
}

fn retreat(s: &Situation, to_target: f32) -> Intent {
    Intent {
        movement: -Vec2::from_angle(to_target),
        shooting: true,
        dash: s.distance < RETREAT_DASH_RANGE && s.dash_ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn situation(distance: f32) -> Situation {
        Situation {
            now: 0.0,
            me: Vec2::ZERO,
            target: Vec2::new(distance, 0.0),
            distance,
            cover: None,
            strafe_sign: 1.0,
            preferred_range: 200.0,
            dodge_dir: Vec2::Y,
            dash_ready: true,
        }
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_idle_does_nothing() {
        assert_eq!(AiState::Idle.execute(&situation(100.0)), Intent::default());
    }

    #[test]
    fn test_chase_fire_range() {
        let near = AiState::Chase.execute(&situation(399.0));
        assert!(close(near.movement, Vec2::X));
        assert!(near.shooting);
        assert!(!AiState::Chase.execute(&situation(400.0)).shooting);
    }

    #[test]
    fn test_retreat_dashes_when_crowded() {
        let crowded = AiState::Retreat.execute(&situation(80.0));
        assert!(close(crowded.movement, Vec2::NEG_X));
        assert!(crowded.dash && crowded.shooting);

        let mut cooling = situation(80.0);
        cooling.dash_ready = false;
        assert!(!AiState::Retreat.execute(&cooling).dash);
        assert!(!AiState::Retreat.execute(&situation(150.0)).dash);
    }

    #[test]
    fn test_flank_blend() {
        let intent = AiState::Flank.execute(&situation(300.0));
        assert!(close(intent.movement, Vec2::new(0.3, 0.7)));
        assert!(intent.shooting);
        assert!(!AiState::Flank.execute(&situation(350.0)).shooting);
    }

    #[test]
    fn test_strafe_range_correction() {
        // 100 too far: pull in by 0.4
        let far = AiState::Strafe.execute(&situation(300.0));
        assert!(close(far.movement, Vec2::new(0.4, 0.8)));
        // 100 too close: push out
        let near = AiState::Strafe.execute(&situation(100.0));
        assert!(close(near.movement, Vec2::new(-0.4, 0.8)));

        let mut flipped = situation(200.0);
        flipped.strafe_sign = -1.0;
        assert!(close(AiState::Strafe.execute(&flipped).movement, Vec2::new(0.0, -0.8)));
    }

    #[test]
    fn test_take_cover_moves_then_holds() {
        let mut s = situation(300.0);
        s.cover = Some(Vec2::new(0.0, -100.0));
        let moving = AiState::TakeCover.execute(&s);
        assert!(close(moving.movement, Vec2::NEG_Y));
        assert!(moving.shooting);

        s.cover = Some(Vec2::new(0.0, -10.0));
        assert_eq!(AiState::TakeCover.execute(&s).movement, Vec2::ZERO);
    }

    #[test]
    fn test_take_cover_without_cover_retreats() {
        let intent = AiState::TakeCover.execute(&situation(300.0));
        assert!(close(intent.movement, Vec2::NEG_X));
    }

    #[test]
    fn test_dodge_follows_escape_vector() {
        let intent = AiState::Dodge.execute(&situation(300.0));
        assert_eq!(intent.movement, Vec2::Y);
        assert!(intent.dash);
        assert!(!intent.shooting);
    }

    #[test]
    fn test_attack_jitters_sideways() {
        let mut s = situation(200.0);
        s.now = 314.159;
        let intent = AiState::Attack.execute(&s);
        assert!((intent.movement.x - 0.3).abs() < 1e-3);
        assert_eq!(intent.movement.y, 0.0);
        assert!(intent.shooting);
    }
}
