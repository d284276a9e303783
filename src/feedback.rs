//! Audio/visual collaborators injected into the simulation
//!
//! The simulation never owns a sound engine or particle system. It reports
//! fire-and-forget cues through these traits; nothing it does depends on them.

use glam::Vec2;
use serde::Serialize;

use crate::audio::SoundId;

/// Plays sounds by identifier
pub trait AudioSink {
    fn play(&mut self, sound: SoundId);
}

/// Visual effect hints (particles, flashes, camera shake)
pub trait EffectSink {
    fn muzzle_flash(&mut self, pos: Vec2, angle: f32, color: u32);
    fn hit_sparks(&mut self, pos: Vec2, count: u32, color: u32);
    fn explosion(&mut self, pos: Vec2, scale: f32);
    fn damage_particles(&mut self, pos: Vec2, count: u32, color: u32);
    fn dash_trail(&mut self, pos: Vec2, size: f32, angle: f32, color: u32);
    fn shake(&mut self, intensity: f32);
}

/// Both collaborators, borrowed for the duration of a tick
pub struct Feedback<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub effects: &'a mut dyn EffectSink,
}

impl<'a> Feedback<'a> {
    pub fn new(audio: &'a mut dyn AudioSink, effects: &'a mut dyn EffectSink) -> Self {
        Self { audio, effects }
    }

    #[inline]
    pub fn play(&mut self, sound: SoundId) {
        self.audio.play(sound);
    }
}

/// A recorded cue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum Cue {
    Sound(SoundId),
    MuzzleFlash { pos: Vec2, angle: f32, color: u32 },
    HitSparks { pos: Vec2, count: u32, color: u32 },
    Explosion { pos: Vec2, scale: f32 },
    DamageParticles { pos: Vec2, count: u32, color: u32 },
    DashTrail { pos: Vec2, size: f32, angle: f32, color: u32 },
    Shake(f32),
}

/// Records every cue in order; hosts drain it each frame, tests inspect it
#[derive(Debug, Default)]
pub struct CueLog {
    pub cues: Vec<Cue>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Cue> {
        self.cues.drain(..)
    }

    pub fn sounds(&self) -> impl Iterator<Item = SoundId> + '_ {
        self.cues.iter().filter_map(|c| match c {
            Cue::Sound(s) => Some(*s),
            _ => None,
        })
    }

    pub fn played(&self, sound: SoundId) -> bool {
        self.sounds().any(|s| s == sound)
    }
}

impl AudioSink for CueLog {
    fn play(&mut self, sound: SoundId) {
        self.cues.push(Cue::Sound(sound));
    }
}

impl EffectSink for CueLog {
    fn muzzle_flash(&mut self, pos: Vec2, angle: f32, color: u32) {
        self.cues.push(Cue::MuzzleFlash { pos, angle, color });
    }

    fn hit_sparks(&mut self, pos: Vec2, count: u32, color: u32) {
        self.cues.push(Cue::HitSparks { pos, count, color });
    }

    fn explosion(&mut self, pos: Vec2, scale: f32) {
        self.cues.push(Cue::Explosion { pos, scale });
    }

    fn damage_particles(&mut self, pos: Vec2, count: u32, color: u32) {
        self.cues.push(Cue::DamageParticles { pos, count, color });
    }

    fn dash_trail(&mut self, pos: Vec2, size: f32, angle: f32, color: u32) {
        self.cues.push(Cue::DashTrail {
            pos,
            size,
            angle,
            color,
        });
    }

    fn shake(&mut self, intensity: f32) {
        self.cues.push(Cue::Shake(intensity));
    }
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _sound: SoundId) {}
}

impl EffectSink for Silent {
    fn muzzle_flash(&mut self, _pos: Vec2, _angle: f32, _color: u32) {}
    fn hit_sparks(&mut self, _pos: Vec2, _count: u32, _color: u32) {}
    fn explosion(&mut self, _pos: Vec2, _scale: f32) {}
    fn damage_particles(&mut self, _pos: Vec2, _count: u32, _color: u32) {}
    fn dash_trail(&mut self, _pos: Vec2, _size: f32, _angle: f32, _color: u32) {}
    fn shake(&mut self, _intensity: f32) {}
}
