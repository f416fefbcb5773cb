//! Fire-and-forget audio triggers.
//!
//! The simulation never owns sound buffers. It names a [`SoundCue`] and asks an
//! [`AudioSink`] handed to it at construction time to play, pause or rewind it.

use std::fmt;

/// Every sound or voice line the simulation can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Background music loop.
    Music,
    /// Normal gunshot.
    GunShot,
    /// Trigger pulled on an empty or reloading gun.
    DryFire,
    /// Magazine being swapped.
    GunReload,
    /// Bullet striking a zombie.
    Hit,
    /// Player caught by a zombie.
    PlayerDies,
    /// Dog warning about a nearby zombie.
    DogBark,
    /// Boss collapsing at the end of phase one.
    BigZombieDeath1,
    /// Boss rising again as a daemon.
    BigZombieScream,
    /// Boss final death.
    BigZombieDeath2,
    /// Voice line for reaching checkpoint `n` (1-based).
    Checkpoint(u32),
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkpoint(n) => write!(f, "checkpoint-{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Sink for audio triggers. Implementations must return immediately.
pub trait AudioSink {
    /// Starts (or resumes) playback of `cue`.
    fn play(&mut self, cue: SoundCue);
    /// Pauses `cue` if it is playing.
    fn pause(&mut self, cue: SoundCue);
    /// Rewinds `cue` to its beginning.
    fn rewind(&mut self, cue: SoundCue);

    /// Rewinds then plays `cue`, the usual way one-shot effects are fired.
    fn restart(&mut self, cue: SoundCue) {
        self.rewind(cue);
        self.play(cue);
    }
}

/// Sink that discards every trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) {}
    fn pause(&mut self, _cue: SoundCue) {}
    fn rewind(&mut self, _cue: SoundCue) {}
}

/// A single recorded trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    /// `play(cue)`
    Play(SoundCue),
    /// `pause(cue)`
    Pause(SoundCue),
    /// `rewind(cue)`
    Rewind(SoundCue),
}

/// Sink that logs each trigger at debug level and keeps the history.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    calls: Vec<AudioCall>,
}

impl RecordingAudio {
    /// Every trigger received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[AudioCall] {
        &self.calls
    }

    /// Cues that were played, oldest first.
    pub fn played(&self) -> impl Iterator<Item = SoundCue> + '_ {
        self.calls.iter().filter_map(|call| match call {
            AudioCall::Play(cue) => Some(*cue),
            AudioCall::Pause(_) | AudioCall::Rewind(_) => None,
        })
    }

    /// Whether `cue` was ever played.
    #[must_use]
    pub fn was_played(&self, cue: SoundCue) -> bool {
        self.played().any(|c| c == cue)
    }

    /// Forgets the recorded history.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("audio: play {cue}");
        self.calls.push(AudioCall::Play(cue));
    }

    fn pause(&mut self, cue: SoundCue) {
        log::debug!("audio: pause {cue}");
        self.calls.push(AudioCall::Pause(cue));
    }

    fn rewind(&mut self, cue: SoundCue) {
        log::debug!("audio: rewind {cue}");
        self.calls.push(AudioCall::Rewind(cue));
    }
}
