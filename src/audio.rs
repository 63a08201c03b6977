//! Sound cues
//!
//! The simulation reports `GameEvent`s; this module turns them into
//! `SoundEffect`s and hands them to whatever backend the host provides.
//! Effects are described procedurally (a short tone sweep), so a backend
//! needs no sample files.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump from the ground or a ladder
    Jump,
    /// Shield collected
    ShieldPickup,
    /// Any other item collected
    ItemPickup,
    /// Enemy stomped
    Stomp,
    /// Hit by an enemy or fell into water
    LifeLost,
    /// Gravity flipped
    GravityFlip,
    /// Goal reached
    Victory,
    GameOver,
}

/// Oscillator shape for a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// Procedural recipe: a frequency sweep with an exponential fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_s: f32,
    /// Peak gain before master/sfx volume
    pub gain: f32,
}

impl SoundEffect {
    pub fn tone(&self) -> Tone {
        let (waveform, start_hz, end_hz, duration_s, gain) = match self {
            SoundEffect::Jump => (Waveform::Square, 220.0, 440.0, 0.12, 0.3),
            SoundEffect::ShieldPickup => (Waveform::Sine, 660.0, 1320.0, 0.2, 0.4),
            SoundEffect::ItemPickup => (Waveform::Sine, 880.0, 990.0, 0.1, 0.3),
            SoundEffect::Stomp => (Waveform::Triangle, 180.0, 60.0, 0.15, 0.6),
            SoundEffect::LifeLost => (Waveform::Sawtooth, 400.0, 80.0, 0.5, 0.5),
            SoundEffect::GravityFlip => (Waveform::Sine, 120.0, 600.0, 0.6, 0.4),
            SoundEffect::Victory => (Waveform::Square, 523.0, 1046.0, 0.8, 0.4),
            SoundEffect::GameOver => (Waveform::Sawtooth, 300.0, 50.0, 1.2, 0.5),
        };
        Tone {
            waveform,
            start_hz,
            end_hz,
            duration_s,
            gain,
        }
    }
}

/// Cue for an event, if it has one
pub fn sound_for(event: &GameEvent, required_item_kind: &str) -> Option<SoundEffect> {
    match event {
        GameEvent::Jumped => Some(SoundEffect::Jump),
        GameEvent::ItemCollected { kind } if kind == required_item_kind => {
            Some(SoundEffect::ShieldPickup)
        }
        GameEvent::ItemCollected { .. } => Some(SoundEffect::ItemPickup),
        GameEvent::EnemyStomped { .. } => Some(SoundEffect::Stomp),
        // The game-over cue replaces the last life-lost cue
        GameEvent::LifeLost { lives_left: 0 } => None,
        GameEvent::LifeLost { .. } => Some(SoundEffect::LifeLost),
        GameEvent::GravityFlipped { .. } => Some(SoundEffect::GravityFlip),
        GameEvent::Victory { .. } => Some(SoundEffect::Victory),
        GameEvent::GameOver => Some(SoundEffect::GameOver),
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, tone: Tone, volume: f32);
}

/// Backend that only logs what would play (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, tone: Tone, volume: f32) {
        log::debug!(
            "sfx {:?}: {:?} {}->{}Hz {:.2}s vol {:.2}",
            effect,
            tone.waveform,
            tone.start_hz,
            tone.end_hz,
            tone.duration_s,
            volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
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

    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let tone = effect.tone();
        self.sink.play(effect, tone, vol * tone.gain);
    }

    /// Play the cues for one tick's events, in order
    pub fn play_events(&mut self, events: &[GameEvent], required_item_kind: &str) {
        for event in events {
            if let Some(effect) = sound_for(event, required_item_kind) {
                self.play(effect);
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
