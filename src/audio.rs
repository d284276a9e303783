//! Audio: a data table of synthesized sounds and a Web Audio player
//!
//! Every sound is a list of oscillator voices; one generic routine plays any entry.
//! No external files needed.

use serde::{Deserialize, Serialize};

use crate::feedback::AudioSink;

/// Sound identifiers the simulation can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    Shoot,
    Hit,
    Explosion,
    Dash,
    Pickup,
    Upgrade,
    Countdown,
    RoundStart,
    Victory,
    Defeat,
    LowHealth,
    Reload,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator with a pitch sweep and an attack/decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub wave: Wave,
    pub freq_start: f32,
    /// Exponential sweep target (equal to `freq_start` for a steady tone)
    pub freq_end: f32,
    /// Peak gain before master/sfx volume
    pub gain: f32,
    /// Linear ramp from silence to peak (seconds, 0 = instant)
    pub attack: f64,
    /// Time until the envelope has decayed (seconds)
    pub duration: f64,
    /// Start offset from the trigger (seconds)
    pub delay: f64,
}

impl Voice {
    const fn tone(wave: Wave, freq: f32, gain: f32, duration: f64) -> Self {
        Self {
            wave,
            freq_start: freq,
            freq_end: freq,
            gain,
            attack: 0.0,
            duration,
            delay: 0.0,
        }
    }

    const fn sweep(wave: Wave, from: f32, to: f32, gain: f32, duration: f64) -> Self {
        Self {
            wave,
            freq_start: from,
            freq_end: to,
            gain,
            attack: 0.0,
            duration,
            delay: 0.0,
        }
    }

    const fn note(wave: Wave, freq: f32, gain: f32, attack: f64, duration: f64, delay: f64) -> Self {
        Self {
            wave,
            freq_start: freq,
            freq_end: freq,
            gain,
            attack,
            duration,
            delay,
        }
    }
}

const SHOOT: &[Voice] = &[Voice::sweep(Wave::Square, 900.0, 200.0, 0.25, 0.08)];
const HIT: &[Voice] = &[Voice::sweep(Wave::Sine, 300.0, 100.0, 0.4, 0.1)];
const EXPLOSION: &[Voice] = &[
    Voice::sweep(Wave::Sawtooth, 100.0, 30.0, 0.5, 0.5),
    Voice::sweep(Wave::Sine, 60.0, 30.0, 0.4, 0.4),
];
const DASH: &[Voice] = &[Voice::sweep(Wave::Sine, 200.0, 400.0, 0.2, 0.15)];
const PICKUP: &[Voice] = &[
    Voice::note(Wave::Sine, 523.0, 0.2, 0.02, 0.15, 0.0),
    Voice::note(Wave::Sine, 659.0, 0.2, 0.02, 0.15, 0.05),
    Voice::note(Wave::Sine, 784.0, 0.2, 0.02, 0.15, 0.10),
];
const UPGRADE: &[Voice] = &[
    Voice::note(Wave::Triangle, 392.0, 0.25, 0.03, 0.2, 0.0),
    Voice::note(Wave::Triangle, 523.0, 0.25, 0.03, 0.2, 0.08),
    Voice::note(Wave::Triangle, 659.0, 0.25, 0.03, 0.2, 0.16),
    Voice::note(Wave::Triangle, 784.0, 0.25, 0.03, 0.2, 0.24),
];
const COUNTDOWN: &[Voice] = &[Voice::tone(Wave::Sine, 440.0, 0.3, 0.2)];
const ROUND_START: &[Voice] = &[Voice {
    wave: Wave::Sawtooth,
    freq_start: 200.0,
    freq_end: 800.0,
    gain: 0.3,
    attack: 0.15,
    duration: 0.4,
    delay: 0.0,
}];
const VICTORY: &[Voice] = &[
    Voice::note(Wave::Triangle, 523.0, 0.3, 0.05, 0.5, 0.0),
    Voice::note(Wave::Triangle, 659.0, 0.3, 0.05, 0.5, 0.12),
    Voice::note(Wave::Triangle, 784.0, 0.3, 0.05, 0.5, 0.24),
    Voice::note(Wave::Triangle, 1047.0, 0.3, 0.05, 0.5, 0.36),
];
const DEFEAT: &[Voice] = &[
    Voice::note(Wave::Sawtooth, 392.0, 0.2, 0.05, 0.4, 0.0),
    Voice::note(Wave::Sawtooth, 349.0, 0.2, 0.05, 0.4, 0.15),
    Voice::note(Wave::Sawtooth, 311.0, 0.2, 0.05, 0.4, 0.30),
    Voice::note(Wave::Sawtooth, 262.0, 0.2, 0.05, 0.4, 0.45),
];
const LOW_HEALTH: &[Voice] = &[Voice::tone(Wave::Sine, 100.0, 0.15, 0.5)];
const RELOAD: &[Voice] = &[
    Voice::sweep(Wave::Square, 2000.0, 1200.0, 0.2, 0.05),
    Voice::note(Wave::Square, 1600.0, 0.2, 0.0, 0.05, 0.12),
];

impl SoundId {
    pub const ALL: [SoundId; 12] = [
        SoundId::Shoot,
        SoundId::Hit,
        SoundId::Explosion,
        SoundId::Dash,
        SoundId::Pickup,
        SoundId::Upgrade,
        SoundId::Countdown,
        SoundId::RoundStart,
        SoundId::Victory,
        SoundId::Defeat,
        SoundId::LowHealth,
        SoundId::Reload,
    ];

    /// Voices that make up this sound
    pub fn voices(&self) -> &'static [Voice] {
        match self {
            SoundId::Shoot => SHOOT,
            SoundId::Hit => HIT,
            SoundId::Explosion => EXPLOSION,
            SoundId::Dash => DASH,
            SoundId::Pickup => PICKUP,
            SoundId::Upgrade => UPGRADE,
            SoundId::Countdown => COUNTDOWN,
            SoundId::RoundStart => ROUND_START,
            SoundId::Victory => VICTORY,
            SoundId::Defeat => DEFEAT,
            SoundId::LowHealth => LOW_HEALTH,
            SoundId::Reload => RELOAD,
        }
    }

    /// Seconds from trigger until the last voice stops
    pub fn length(&self) -> f64 {
        self.voices()
            .iter()
            .map(|v| v.delay + v.duration)
            .fold(0.0, f64::max)
    }
}

/// Audio sink for hosts without sound: logs at trace level and drops the request
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, sound: SoundId) {
        log::trace!("sound {:?}", sound);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundId, Voice, Wave};
    use crate::feedback::AudioSink;

    /// Web Audio player for the sound table
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 0.5,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            wave: Wave,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            });
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_voice(ctx: &AudioContext, voice: &Voice, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, voice.freq_start, voice.wave) else {
                return;
            };
            let t = ctx.current_time() + voice.delay;
            let peak = vol * voice.gain;

            if voice.attack > 0.0 {
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(peak, t + voice.attack)
                    .ok();
            } else {
                gain.gain().set_value_at_time(peak, t).ok();
            }
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + voice.duration)
                .ok();

            if voice.freq_end != voice.freq_start {
                osc.frequency().set_value_at_time(voice.freq_start, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(voice.freq_end, t + voice.duration)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + voice.duration + 0.02).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, sound: SoundId) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for voice in sound.voices() {
                Self::play_voice(ctx, voice, vol);
            }
        }
    }
}
