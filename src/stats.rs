//! Career and per-match statistics
//!
//! Career stats are persisted to LocalStorage; match stats live for one match.

use serde::{Deserialize, Serialize};

/// Numbers gathered during a single match
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStats {
    /// Damage the human dealt after reductions
    pub damage_dealt: f32,
    pub rounds_won: u32,
    /// Seconds spent in the Playing phase
    pub time_played: f32,
    pub shots_fired: u32,
    pub shots_hit: u32,
}

impl MatchStats {
    /// Hit percentage, rounded (0 when nothing was fired)
    pub fn accuracy(&self) -> u32 {
        accuracy(self.shots_hit, self.shots_fired)
    }
}

/// Lifetime record across matches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareerStats {
    pub wins: u32,
    pub losses: u32,
    pub best_streak: u32,
    pub current_streak: u32,
    pub total_damage: f32,
    pub total_shots: u32,
    pub total_hits: u32,
}

impl CareerStats {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arena_rivals_stats";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished match into the record
    pub fn record_match(&mut self, won: bool, stats: &MatchStats) {
        if won {
            self.wins += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.losses += 1;
            self.current_streak = 0;
        }
        self.total_damage += stats.damage_dealt;
        self.total_shots += stats.shots_fired;
        self.total_hits += stats.shots_hit;
    }

    /// Lifetime hit percentage, rounded
    pub fn accuracy(&self) -> u32 {
        accuracy(self.total_hits, self.total_shots)
    }

    /// Parse stored JSON, starting fresh on corruption
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(stats) => stats,
            Err(e) => {
                log::warn!("Discarding unreadable stats: {}", e);
                Self::new()
            }
        }
    }

    /// Load stats from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let stats = Self::from_json(&json);
                log::info!("Loaded stats ({} wins, {} losses)", stats.wins, stats.losses);
                return stats;
            }
        }

        log::info!("No stats found, starting fresh");
        Self::new()
    }

    /// Save stats to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Stats saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn accuracy(hits: u32, shots: u32) -> u32 {
    if shots == 0 {
        return 0;
    }
    ((hits as f32 / shots as f32) * 100.0).round() as u32
}

/// Format seconds as M:SS
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{}:{:02}", total / 60, total % 60)
}
