//! Game settings and match configuration
//!
//! Settings are persisted separately from stats in LocalStorage.

use serde::{Deserialize, Serialize};

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }
}

/// Who gets the round when the timer runs out with equal health fractions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TieBreak {
    /// The AI is credited with the round
    #[default]
    Opponent,
    /// Nobody is credited; the round is replayed
    Draw,
}

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects on/off
    pub sfx: bool,
    /// Music on/off
    pub music: bool,
    /// Haptic feedback on supporting devices
    pub vibration: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Last chosen AI difficulty
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx: true,
            music: true,
            vibration: true,
            show_fps: false,
            difficulty: Difficulty::Medium,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arena_rivals_settings";

    /// Parse stored JSON, falling back to defaults on corruption
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Discarding unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Match configuration seeded from these preferences
    pub fn match_config(&self, seed: u64) -> MatchConfig {
        MatchConfig {
            difficulty: self.difficulty,
            seed,
            ..MatchConfig::default()
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Fixed rules for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub difficulty: Difficulty,
    /// Round wins needed to take the match
    pub rounds_to_win: u32,
    pub round_time_limit_secs: f32,
    /// Pre-round countdown
    pub countdown_secs: f32,
    pub tie_break: TieBreak,
    /// Seed for every random draw in the match
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            rounds_to_win: 5,
            round_time_limit_secs: 60.0,
            countdown_secs: 3.0,
            tie_break: TieBreak::Opponent,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = Settings {
            sfx: false,
            difficulty: Difficulty::Insane,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back = Settings::from_json(&json);
        assert!(!back.sfx);
        assert_eq!(back.difficulty, Difficulty::Insane);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let settings = Settings::from_json("{not json");
        assert!(settings.sfx);
        assert_eq!(settings.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_older_settings_without_difficulty() {
        let json = r#"{"sfx":true,"music":false,"vibration":true,"show_fps":true}"#;
        let settings = Settings::from_json(json);
        assert!(!settings.music);
        assert_eq!(settings.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_match_config_uses_difficulty() {
        let settings = Settings {
            difficulty: Difficulty::Easy,
            ..Default::default()
        };
        let config = settings.match_config(42);
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.seed, 42);
        assert_eq!(config.rounds_to_win, 5);
    }
}
