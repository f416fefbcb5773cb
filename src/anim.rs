//! Frame-range animation driven by the simulation tick.
//!
//! A state names a [`Clip`]: an inclusive frame range plus a playback mode.
//! The [`Animator`] steps through it once every `frame_divisor` ticks and
//! reports completion exactly once, on the advancing tick that lands on the
//! clip's final frame. Agents use that report as their animation-complete
//! trigger.

use crate::agent::{BossState, ZombieState};
use crate::companion::DogState;

/// Inclusive range of sprite-sheet frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRange {
    /// First frame.
    pub from: u32,
    /// Last frame.
    pub to: u32,
}

impl FrameRange {
    /// Range `from..=to`.
    #[must_use]
    pub const fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Whether `frame` falls inside the range.
    #[must_use]
    pub const fn contains(&self, frame: u32) -> bool {
        frame >= self.from && frame <= self.to
    }
}

/// What happens after the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Wrap back to the first frame.
    Loop,
    /// Stay on the last frame.
    Hold,
}

/// Frame range and playback mode for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    /// Frames of the clip.
    pub frames: FrameRange,
    /// Behaviour at the end of the range.
    pub playback: Playback,
}

impl Clip {
    const fn looped(from: u32, to: u32) -> Self {
        Self {
            frames: FrameRange::new(from, to),
            playback: Playback::Loop,
        }
    }

    const fn held(from: u32, to: u32) -> Self {
        Self {
            frames: FrameRange::new(from, to),
            playback: Playback::Hold,
        }
    }
}

/// Animation state identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipKey {
    /// Regular zombie sheet.
    Zombie(ZombieState),
    /// Boss sheet.
    Boss(BossState),
    /// Dog sheet.
    Dog(DogState),
}

/// Animation metadata provider: maps a state to its frame range.
pub trait AnimationSource {
    /// Clip played while in `key`.
    fn clip(&self, key: ClipKey) -> Clip;
}

/// Built-in frame tables matching the bundled sprite sheets.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClips;

impl AnimationSource for DefaultClips {
    fn clip(&self, key: ClipKey) -> Clip {
        match key {
            ClipKey::Zombie(state) => match state {
                ZombieState::Idle => Clip::looped(0, 3),
                ZombieState::Walking => Clip::looped(4, 11),
                ZombieState::Hit => Clip::held(12, 14),
                ZombieState::Dead => Clip::held(15, 19),
            },
            ClipKey::Boss(state) => match state {
                BossState::Idle1 => Clip::looped(0, 3),
                BossState::Walking1 => Clip::looped(4, 11),
                BossState::Hit1 => Clip::held(12, 14),
                BossState::Idle2 => Clip::looped(15, 18),
                BossState::Walking2 => Clip::looped(19, 26),
                BossState::Hit2 => Clip::held(27, 29),
                BossState::Idle3 => Clip::looped(30, 33),
                BossState::Walking3 => Clip::looped(34, 41),
                BossState::Death1 => Clip::held(42, 43),
                BossState::Phase2 => Clip::held(44, 49),
                BossState::Idle4 => Clip::looped(50, 53),
                BossState::Running => Clip::looped(54, 59),
                BossState::Death2 => Clip::held(60, 65),
            },
            ClipKey::Dog(state) => match state {
                DogState::Walking => Clip::looped(0, 7),
                DogState::Sniffing => Clip::looped(8, 13),
                DogState::Sitting => Clip::held(14, 17),
                DogState::Dead => Clip::held(18, 18),
            },
        }
    }
}

/// Per-agent frame cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Animator {
    frame: u32,
    frames: Option<FrameRange>,
    fresh: bool,
}

impl Animator {
    /// Current sprite-sheet frame.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Plays `clip` for one tick.
    ///
    /// Switching to a different clip rewinds to its first frame immediately.
    /// Frames only move on ticks divisible by `divisor`. Returns `true` on the
    /// advancing tick that first shows the clip's last frame.
    pub fn advance(&mut self, tick: u64, divisor: u64, clip: Clip) -> bool {
        let FrameRange { from, to } = clip.frames;
        if self.frames != Some(clip.frames) {
            self.frames = Some(clip.frames);
            self.frame = from;
            self.fresh = true;
        }
        if tick % divisor.max(1) != 0 {
            return false;
        }

        let before = self.frame;
        let entered = self.fresh;
        if self.fresh {
            self.fresh = false;
        } else if self.frame >= to {
            if clip.playback == Playback::Loop {
                self.frame = from;
            }
        } else {
            self.frame += 1;
        }
        self.frame == to && (entered || before != to)
    }

    /// Forgets the current clip so the next `advance` starts over even if
    /// it is handed the same clip again.
    pub const fn reset(&mut self) {
        self.frames = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(animator: &mut Animator, clip: Clip, ticks: std::ops::Range<u64>) -> Vec<bool> {
        ticks.map(|t| animator.advance(t, 1, clip)).collect()
    }

    #[rstest]
    fn held_clip_completes_once() {
        let mut animator = Animator::default();
        let done = run(&mut animator, Clip::held(3, 5), 0..6);
        assert_eq!(done, vec![false, false, true, false, false, false]);
        assert_eq!(animator.frame(), 5);
    }

    #[rstest]
    fn looped_clip_wraps_and_completes_each_cycle() {
        let mut animator = Animator::default();
        let done = run(&mut animator, Clip::looped(0, 1), 0..5);
        assert_eq!(done, vec![false, true, false, true, false]);
    }

    #[rstest]
    fn single_frame_clip_completes_on_entry() {
        let mut animator = Animator::default();
        let done = run(&mut animator, Clip::held(7, 7), 0..3);
        assert_eq!(done, vec![true, false, false]);
    }

    #[rstest]
    fn divisor_gates_frame_steps() {
        let mut animator = Animator::default();
        let clip = Clip::held(0, 1);
        assert!(!animator.advance(1, 5, clip));
        assert_eq!(animator.frame(), 0);
        assert!(!animator.advance(5, 5, clip));
        assert!(!animator.advance(7, 5, clip));
        assert!(animator.advance(10, 5, clip));
    }

    #[rstest]
    fn reset_replays_a_finished_clip() {
        let mut animator = Animator::default();
        let clip = Clip::held(0, 1);
        assert_eq!(run(&mut animator, clip, 0..3), vec![false, true, false]);
        animator.reset();
        assert_eq!(run(&mut animator, clip, 3..5), vec![false, true]);
    }

    #[rstest]
    fn switching_clips_rewinds() {
        let mut animator = Animator::default();
        let walking = DefaultClips.clip(ClipKey::Zombie(ZombieState::Walking));
        let hit = DefaultClips.clip(ClipKey::Zombie(ZombieState::Hit));
        run(&mut animator, walking, 0..3);
        animator.advance(3, 1, hit);
        assert_eq!(animator.frame(), hit.frames.from);
        assert!(hit.frames.contains(animator.frame()));
    }
}
