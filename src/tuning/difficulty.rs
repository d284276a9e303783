//! AI difficulty tiers

use crate::settings::Difficulty;

/// Static per-tier constants for the AI controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Latency before acting on a newly acquired target (ms)
    pub reaction_time_ms: f64,
    /// 0-1, higher means less aim wobble
    pub aim_accuracy: f32,
    /// 0-1, how far ahead of a moving target to lead
    pub prediction_skill: f32,
    /// Probability of dodging when shots are incoming
    pub dodge_chance: f32,
    /// Probability of pressing a weakened target
    pub aggressiveness: f32,
    /// Probability of preferring cover / flanks over plain fighting
    pub tactical_skill: f32,
    /// Extra gap enforced between shots on top of the weapon's fire rate (ms)
    pub shooting_delay_ms: f64,
}

pub const EASY: DifficultyProfile = DifficultyProfile {
    reaction_time_ms: 500.0,
    aim_accuracy: 0.5,
    prediction_skill: 0.3,
    dodge_chance: 0.2,
    aggressiveness: 0.4,
    tactical_skill: 0.3,
    shooting_delay_ms: 300.0,
};

pub const MEDIUM: DifficultyProfile = DifficultyProfile {
    reaction_time_ms: 300.0,
    aim_accuracy: 0.7,
    prediction_skill: 0.5,
    dodge_chance: 0.4,
    aggressiveness: 0.5,
    tactical_skill: 0.5,
    shooting_delay_ms: 150.0,
};

pub const HARD: DifficultyProfile = DifficultyProfile {
    reaction_time_ms: 150.0,
    aim_accuracy: 0.85,
    prediction_skill: 0.7,
    dodge_chance: 0.6,
    aggressiveness: 0.6,
    tactical_skill: 0.7,
    shooting_delay_ms: 50.0,
};

pub const INSANE: DifficultyProfile = DifficultyProfile {
    reaction_time_ms: 50.0,
    aim_accuracy: 0.95,
    prediction_skill: 0.9,
    dodge_chance: 0.8,
    aggressiveness: 0.7,
    tactical_skill: 0.9,
    shooting_delay_ms: 0.0,
};

impl Difficulty {
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
            Difficulty::Insane => INSANE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_get_sharper() {
        let tiers = [EASY, MEDIUM, HARD, INSANE];
        for pair in tiers.windows(2) {
            assert!(pair[1].reaction_time_ms < pair[0].reaction_time_ms);
            assert!(pair[1].aim_accuracy > pair[0].aim_accuracy);
            assert!(pair[1].shooting_delay_ms < pair[0].shooting_delay_ms);
        }
    }
}
