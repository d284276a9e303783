//! Match state and round flow
//!
//! Everything a match needs lives here; `tick` only advances it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiController;
use super::arena::Arena;
use super::combatant::{Combatant, Side};
use super::powerup::PowerUpField;
use super::projectile::Projectile;
use super::upgrade::{Upgrade, UpgradeBook};
use crate::audio::SoundId;
use crate::feedback::Feedback;
use crate::settings::{Difficulty, MatchConfig, TieBreak};
use crate::stats::{CareerStats, MatchStats};

/// Upgrades offered to the player between rounds
pub const UPGRADE_OFFERS: usize = 3;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Pre-round count, nothing moves
    Countdown,
    /// Active combat
    Playing,
    /// Frozen mid-round; timers do not advance
    Paused,
    /// Waiting for the player's upgrade choice
    RoundOver,
    /// One side reached the win target
    MatchOver,
}

#[derive(Debug, Clone)]
pub struct MatchState {
    pub config: MatchConfig,
    pub phase: MatchPhase,
    pub arena: Arena,
    pub player: Combatant,
    pub ai: Combatant,
    /// Drives the AI combatant
    pub brain: AiController,
    /// Drives the player combatant in demo mode
    pub autopilot: AiController,
    pub projectiles: Vec<Projectile>,
    pub powerups: PowerUpField,
    pub player_upgrades: UpgradeBook,
    pub ai_upgrades: UpgradeBook,
    /// Choices shown to the player during RoundOver
    pub upgrade_offers: Vec<Upgrade>,
    pub player_wins: u32,
    pub ai_wins: u32,
    /// 1-based
    pub round: u32,
    /// Seconds left on the round clock
    pub round_time_left: f32,
    /// Seconds left before the round starts
    pub countdown: f32,
    /// Match clock (ms); advances only while Playing
    pub now_ms: f64,
    /// `None` after a drawn round
    pub round_winner: Option<Side>,
    pub match_winner: Option<Side>,
    pub stats: MatchStats,
    /// Last countdown second announced
    pub(crate) announced_second: Option<u32>,
    /// Low-health warning already played this dip
    pub(crate) low_health_warned: bool,
    pub(crate) rng: Pcg32,
}

impl MatchState {
    pub fn new(config: MatchConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let arena = Arena::random(&mut rng);
        let brain = AiController::new(Side::Ai, config.difficulty, config.seed.wrapping_add(1));
        let autopilot =
            AiController::new(Side::Player, config.difficulty, config.seed.wrapping_add(2));
        let mut state = Self {
            phase: MatchPhase::Countdown,
            player: Combatant::new(Side::Player, arena.player_spawn()),
            ai: Combatant::new(Side::Ai, arena.opponent_spawn()),
            arena,
            brain,
            autopilot,
            projectiles: Vec::new(),
            powerups: PowerUpField::new(0.0),
            player_upgrades: UpgradeBook::new(),
            ai_upgrades: UpgradeBook::new(),
            upgrade_offers: Vec::new(),
            player_wins: 0,
            ai_wins: 0,
            round: 0,
            round_time_left: config.round_time_limit_secs,
            countdown: config.countdown_secs,
            now_ms: 0.0,
            round_winner: None,
            match_winner: None,
            stats: MatchStats::default(),
            announced_second: None,
            low_health_warned: false,
            rng,
            config,
        };
        state.start_round();
        state
    }

    /// Fresh arena, both sides back at their spawns with upgrades re-applied
    pub fn start_round(&mut self) {
        self.round += 1;
        self.arena = Arena::random(&mut self.rng);

        self.player.reset(self.arena.player_spawn());
        self.ai.reset(self.arena.opponent_spawn());
        self.player_upgrades.apply_all(&mut self.player);
        self.ai_upgrades.apply_all(&mut self.ai);
        self.brain.reset();
        self.autopilot.reset();

        self.projectiles.clear();
        self.powerups = PowerUpField::new(self.now_ms);
        self.upgrade_offers.clear();
        self.round_time_left = self.config.round_time_limit_secs;
        self.countdown = self.config.countdown_secs;
        self.round_winner = None;
        self.announced_second = None;
        self.low_health_warned = false;
        self.phase = MatchPhase::Countdown;

        log::info!(
            "Round {} ({:?}), score {}-{}",
            self.round,
            self.arena.layout,
            self.player_wins,
            self.ai_wins
        );
    }

    /// Credit `winner` (nobody on a draw) and move to RoundOver or MatchOver
    pub fn end_round(&mut self, winner: Option<Side>) {
        self.round_winner = winner;
        match winner {
            Some(Side::Player) => {
                self.player_wins += 1;
                self.stats.rounds_won += 1;
            }
            Some(Side::Ai) => self.ai_wins += 1,
            None => {}
        }
        self.projectiles.clear();

        let target = self.config.rounds_to_win;
        if self.player_wins >= target || self.ai_wins >= target {
            let champion = if self.player_wins >= target {
                Side::Player
            } else {
                Side::Ai
            };
            self.match_winner = Some(champion);
            self.phase = MatchPhase::MatchOver;
            log::info!(
                "Match over: {:?} wins {}-{}",
                champion,
                self.player_wins,
                self.ai_wins
            );
            return;
        }

        if winner.is_some() {
            if let Some(pick) = self.ai_upgrades.ai_pick(&mut self.rng) {
                self.ai_upgrades.upgrade(&mut self.ai, pick);
                log::debug!("AI takes {} (level {})", pick.name(), self.ai_upgrades.level(pick));
            }
        }
        self.upgrade_offers = self.player_upgrades.offers(UPGRADE_OFFERS, &mut self.rng);
        self.phase = MatchPhase::RoundOver;
        log::info!("Round {} over: {:?}", self.round, winner);
    }

    /// Apply the player's pick (if any) and start the next round
    ///
    /// Returns false outside RoundOver. Upgrades that are maxed are ignored.
    pub fn next_round(&mut self, choice: Option<Upgrade>, fx: &mut Feedback<'_>) -> bool {
        if self.phase != MatchPhase::RoundOver {
            return false;
        }
        if let Some(upgrade) = choice {
            if self.player_upgrades.upgrade(&mut self.player, upgrade) {
                fx.play(SoundId::Upgrade);
                log::debug!(
                    "Player takes {} (level {})",
                    upgrade.name(),
                    self.player_upgrades.level(upgrade)
                );
            }
        }
        self.start_round();
        true
    }

    /// Start over with the same rules; the RNG stream continues
    pub fn rematch(&mut self) {
        self.player_wins = 0;
        self.ai_wins = 0;
        self.round = 0;
        self.match_winner = None;
        self.stats = MatchStats::default();
        self.player_upgrades.clear();
        self.ai_upgrades.clear();
        self.start_round();
    }

    /// Playing <-> Paused; other phases ignore it
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            MatchPhase::Playing => MatchPhase::Paused,
            MatchPhase::Paused => MatchPhase::Playing,
            other => other,
        };
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
        self.brain.set_difficulty(difficulty);
        self.autopilot.set_difficulty(difficulty);
    }

    /// Winner when the clock runs out: higher health fraction
    pub fn timeout_winner(&self) -> Option<Side> {
        let player = self.player.health_fraction();
        let ai = self.ai.health_fraction();
        if player > ai {
            Some(Side::Player)
        } else if ai > player {
            Some(Side::Ai)
        } else {
            match self.config.tie_break {
                TieBreak::Opponent => Some(Side::Ai),
                TieBreak::Draw => None,
            }
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    /// Fold a finished match into the career record; no-op before MatchOver
    pub fn record_career(&self, career: &mut CareerStats) -> bool {
        let Some(winner) = self.match_winner else {
            return false;
        };
        career.record_match(winner == Side::Player, &self.stats);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{CueLog, Silent};

    fn advance(state: &mut MatchState, choice: Option<Upgrade>) -> bool {
        let mut audio = Silent;
        let mut effects = Silent;
        state.next_round(choice, &mut Feedback::new(&mut audio, &mut effects))
    }

    fn config() -> MatchConfig {
        MatchConfig {
            seed: 7,
            rounds_to_win: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_match_counts_down() {
        let state = MatchState::new(config());
        assert_eq!(state.phase, MatchPhase::Countdown);
        assert_eq!(state.round, 1);
        assert_eq!(state.countdown, 3.0);
        assert_eq!(state.round_time_left, 60.0);
        assert_eq!(state.player.pos, state.arena.player_spawn());
        assert_eq!(state.ai.pos, state.arena.opponent_spawn());
    }

    #[test]
    fn test_round_flow_to_match_over() {
        let mut state = MatchState::new(config());
        state.end_round(Some(Side::Player));
        assert_eq!(state.phase, MatchPhase::RoundOver);
        assert_eq!(state.stats.rounds_won, 1);
        assert_eq!(state.upgrade_offers.len(), UPGRADE_OFFERS);
        assert_eq!(state.ai_upgrades.total_levels(), 1, "AI upgrades after a decided round");

        let pick = state.upgrade_offers[0];
        assert!(advance(&mut state, Some(pick)));
        assert_eq!(state.round, 2);
        assert_eq!(state.player_upgrades.level(pick), 1);
        assert_eq!(state.phase, MatchPhase::Countdown);

        state.end_round(Some(Side::Player));
        assert_eq!(state.phase, MatchPhase::MatchOver);
        assert_eq!(state.match_winner, Some(Side::Player));
        assert_eq!(state.ai_upgrades.total_levels(), 1, "no AI upgrade on the final round");
        assert!(!advance(&mut state, None));

        let mut career = CareerStats::new();
        assert!(state.record_career(&mut career));
        assert_eq!(career.wins, 1);
    }

    #[test]
    fn test_applied_pick_plays_upgrade_sound() {
        let mut state = MatchState::new(config());
        state.end_round(Some(Side::Ai));
        let mut audio = CueLog::new();
        let mut effects = Silent;
        let mut fx = Feedback::new(&mut audio, &mut effects);
        assert!(state.next_round(Some(Upgrade::Armor), &mut fx));
        assert!(audio.played(SoundId::Upgrade));

        state.end_round(Some(Side::Player));
        let mut audio = CueLog::new();
        let mut fx = Feedback::new(&mut audio, &mut effects);
        assert!(state.next_round(None, &mut fx));
        assert!(!audio.played(SoundId::Upgrade), "skipping the offer is silent");
    }

    #[test]
    fn test_upgrades_survive_round_reset() {
        let mut state = MatchState::new(config());
        state.end_round(Some(Side::Ai));
        advance(&mut state, Some(Upgrade::HealthUp));
        assert_eq!(state.player.max_health, 125.0);
        assert_eq!(state.player.health, 125.0);
        let ai_levels = state.ai_upgrades.total_levels();
        assert_eq!(ai_levels, 1);
    }

    #[test]
    fn test_draw_credits_nobody() {
        let mut state = MatchState::new(config());
        state.end_round(None);
        assert_eq!((state.player_wins, state.ai_wins), (0, 0));
        assert_eq!(state.ai_upgrades.total_levels(), 0);
        assert_eq!(state.phase, MatchPhase::RoundOver);
    }

    #[test]
    fn test_timeout_winner_and_tie_break() {
        let mut state = MatchState::new(config());
        state.player.health = 50.0;
        assert_eq!(state.timeout_winner(), Some(Side::Ai));
        state.ai.health = 40.0;
        assert_eq!(state.timeout_winner(), Some(Side::Player));

        state.ai.health = 50.0;
        assert_eq!(state.timeout_winner(), Some(Side::Ai));
        state.config.tie_break = TieBreak::Draw;
        assert_eq!(state.timeout_winner(), None);
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut state = MatchState::new(config());
        state.toggle_pause();
        assert_eq!(state.phase, MatchPhase::Countdown);
        state.phase = MatchPhase::Playing;
        state.toggle_pause();
        assert_eq!(state.phase, MatchPhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_rematch_clears_progress() {
        let mut state = MatchState::new(config());
        state.end_round(Some(Side::Ai));
        advance(&mut state, Some(Upgrade::Armor));
        state.end_round(Some(Side::Ai));
        assert_eq!(state.phase, MatchPhase::MatchOver);
        state.rematch();
        assert_eq!(state.round, 1);
        assert_eq!(state.player_upgrades.total_levels(), 0);
        assert_eq!(state.ai_upgrades.total_levels(), 0);
        assert_eq!(state.player.damage_reduction, 0.0);
        assert!(state.match_winner.is_none());
    }

    #[test]
    fn test_set_difficulty_reaches_brain() {
        let mut state = MatchState::new(config());
        state.set_difficulty(Difficulty::Insane);
        assert_eq!(state.brain.difficulty(), Difficulty::Insane);
        assert_eq!(state.config.difficulty, Difficulty::Insane);
    }
}
