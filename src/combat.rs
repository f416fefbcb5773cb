//! The player's gun.
//!
//! Firing traces a line from the muzzle along the facing angle and damages
//! the first zombie found in the cells it crosses. An empty gun, or a trigger
//! pull during a reload, falls back to a dry-fire click instead of failing.

use glam::Vec2;
use log::{debug, info};

use crate::audio::{AudioSink, SoundCue};
use crate::config::PlayerConfig;
use crate::entity::EntityId;
use crate::spatial::{SpatialIndex, Tag};
use crate::vector_math::facing;

/// Weapon state. Durations count down once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GunState {
    /// Ready to fire or reload.
    Idle,
    /// Recovering from a shot; fire is ignored.
    Shooting {
        /// Ticks left.
        remaining: u32,
    },
    /// Swapping magazines; fire interrupts it.
    Reloading {
        /// Ticks left.
        remaining: u32,
    },
    /// Recovering from a dry fire.
    DryFire {
        /// Ticks left.
        remaining: u32,
    },
}

/// Result of pulling the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A round was spent and this zombie took a hit.
    Hit(EntityId),
    /// A round was spent without hitting anything.
    Miss,
    /// The magazine was empty.
    Dry,
    /// The gun was still recovering from a shot.
    Ignored,
    /// A reload was cancelled.
    ReloadInterrupted,
}

/// Result of asking for a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The reload is under way.
    Started,
    /// The gun is busy.
    Refused,
}

/// Ammunition and timing of the player's weapon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gunner {
    ammo: u32,
    capacity: u32,
    state: GunState,
    shot_ticks: u32,
    reload_ticks: u32,
    dry_fire_ticks: u32,
}

impl Gunner {
    /// A fully loaded gun.
    #[must_use]
    pub const fn new(config: &PlayerConfig) -> Self {
        Self {
            ammo: config.ammo_capacity,
            capacity: config.ammo_capacity,
            state: GunState::Idle,
            shot_ticks: config.shot_ticks,
            reload_ticks: config.reload_ticks,
            dry_fire_ticks: config.dry_fire_ticks,
        }
    }

    /// Rounds left in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Rounds in a full magazine.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GunState {
        self.state
    }

    /// Empties the magazine.
    pub const fn unload(&mut self) {
        self.ammo = 0;
    }

    fn dry_fire(&mut self, audio: &mut dyn AudioSink) {
        audio.pause(SoundCue::GunReload);
        audio.restart(SoundCue::DryFire);
        self.state = GunState::DryFire {
            remaining: self.dry_fire_ticks,
        };
    }

    /// Pulls the trigger from `origin` towards `angle`, reaching `range`.
    ///
    /// `hit` applies one unit of damage to a mob and reports whether it was
    /// accepted; mobs that refuse (already dying) do not stop the trace.
    pub fn fire(
        &mut self,
        origin: Vec2,
        angle: f32,
        range: f32,
        index: &dyn SpatialIndex,
        audio: &mut dyn AudioSink,
        mut hit: impl FnMut(EntityId) -> bool,
    ) -> FireOutcome {
        match self.state {
            GunState::Shooting { .. } => return FireOutcome::Ignored,
            GunState::Reloading { .. } => {
                debug!("reload interrupted by trigger");
                self.dry_fire(audio);
                return FireOutcome::ReloadInterrupted;
            }
            GunState::Idle | GunState::DryFire { .. } => {}
        }
        if self.ammo == 0 {
            self.dry_fire(audio);
            return FireOutcome::Dry;
        }

        audio.restart(SoundCue::GunShot);
        self.ammo -= 1;
        self.state = GunState::Shooting {
            remaining: self.shot_ticks,
        };

        let muzzle_end = origin + facing(angle) * range;
        let victim = index
            .cells_in_line(origin, muzzle_end)
            .into_iter()
            .flatten()
            .filter(|(_, tag)| *tag == Tag::Mob)
            .find_map(|(id, _)| hit(id).then_some(id));
        match victim {
            Some(id) => {
                audio.restart(SoundCue::Hit);
                debug!("shot hit {id}");
                FireOutcome::Hit(id)
            }
            None => FireOutcome::Miss,
        }
    }

    /// Starts a reload unless a shot or another reload is in progress.
    pub fn reload(&mut self, audio: &mut dyn AudioSink) -> ReloadOutcome {
        match self.state {
            GunState::Idle | GunState::DryFire { .. } => {
                audio.restart(SoundCue::GunReload);
                self.state = GunState::Reloading {
                    remaining: self.reload_ticks,
                };
                ReloadOutcome::Started
            }
            GunState::Shooting { .. } | GunState::Reloading { .. } => ReloadOutcome::Refused,
        }
    }

    /// Counts the current state down; a finished reload refills the magazine.
    pub fn tick(&mut self) {
        self.state = match self.state {
            GunState::Idle => GunState::Idle,
            GunState::Shooting { remaining } if remaining > 1 => GunState::Shooting {
                remaining: remaining - 1,
            },
            GunState::DryFire { remaining } if remaining > 1 => GunState::DryFire {
                remaining: remaining - 1,
            },
            GunState::Reloading { remaining } if remaining > 1 => GunState::Reloading {
                remaining: remaining - 1,
            },
            GunState::Reloading { .. } => {
                self.ammo = self.capacity;
                info!("reloaded, {} rounds", self.ammo);
                GunState::Idle
            }
            GunState::Shooting { .. } | GunState::DryFire { .. } => GunState::Idle,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCall, RecordingAudio};
    use crate::spatial::{Body, CellIndex};
    use rstest::{fixture, rstest};

    #[fixture]
    fn gun() -> Gunner {
        Gunner::new(&PlayerConfig::default())
    }

    fn range_with_mobs(xs: &[f32]) -> CellIndex {
        let mut index = CellIndex::new(16.0);
        for (n, x) in xs.iter().enumerate() {
            index.add(Body::new(
                EntityId(10 + n as u64),
                Tag::Mob,
                Vec2::new(*x, 8.0),
                Vec2::splat(16.0),
            ));
        }
        index
    }

    #[rstest]
    fn shot_damages_only_the_nearest_mob(mut gun: Gunner) {
        let index = range_with_mobs(&[200.0, 100.0]);
        let mut audio = RecordingAudio::default();
        let mut hits = Vec::new();
        let outcome = gun.fire(Vec2::new(8.0, 8.0), 0.0, 320.0, &index, &mut audio, |id| {
            hits.push(id);
            true
        });
        assert_eq!(outcome, FireOutcome::Hit(EntityId(11)));
        assert_eq!(hits, vec![EntityId(11)]);
        assert_eq!(gun.ammo(), 5);
        assert!(audio.was_played(SoundCue::GunShot));
        assert!(audio.was_played(SoundCue::Hit));
    }

    #[rstest]
    fn dying_mobs_do_not_stop_the_trace(mut gun: Gunner) {
        let index = range_with_mobs(&[100.0, 200.0]);
        let mut audio = RecordingAudio::default();
        let outcome = gun.fire(Vec2::new(8.0, 8.0), 0.0, 320.0, &index, &mut audio, |id| {
            id != EntityId(10)
        });
        assert_eq!(outcome, FireOutcome::Hit(EntityId(11)));
    }

    #[rstest]
    fn mobs_behind_the_muzzle_are_not_hit(mut gun: Gunner) {
        let mut index = CellIndex::new(16.0);
        let square = Vec2::splat(16.0);
        index.add(Body::new(EntityId(1), Tag::Mob, Vec2::new(18.0, 8.0), square));
        index.add(Body::new(EntityId(2), Tag::Mob, Vec2::new(100.0, 8.0), square));
        let mut audio = RecordingAudio::default();
        let mut hits = Vec::new();
        let outcome = gun.fire(Vec2::new(30.0, 8.0), 0.0, 320.0, &index, &mut audio, |id| {
            hits.push(id);
            true
        });
        assert_eq!(outcome, FireOutcome::Hit(EntityId(2)));
        assert_eq!(hits, vec![EntityId(2)]);
    }

    #[rstest]
    fn out_of_range_is_a_miss(mut gun: Gunner) {
        let index = range_with_mobs(&[400.0]);
        let mut audio = RecordingAudio::default();
        let outcome = gun.fire(Vec2::new(8.0, 8.0), 0.0, 100.0, &index, &mut audio, |_| true);
        assert_eq!(outcome, FireOutcome::Miss);
        assert!(!audio.was_played(SoundCue::Hit));
    }

    #[rstest]
    fn recovering_gun_ignores_the_trigger(mut gun: Gunner) {
        let index = CellIndex::new(16.0);
        let mut audio = RecordingAudio::default();
        gun.fire(Vec2::ZERO, 0.0, 10.0, &index, &mut audio, |_| true);
        let outcome = gun.fire(Vec2::ZERO, 0.0, 10.0, &index, &mut audio, |_| true);
        assert_eq!(outcome, FireOutcome::Ignored);
        assert_eq!(gun.ammo(), 5);
    }

    #[rstest]
    fn reload_refills_after_its_duration(mut gun: Gunner) {
        let config = PlayerConfig::default();
        let mut audio = RecordingAudio::default();
        gun.unload();
        assert_eq!(gun.reload(&mut audio), ReloadOutcome::Started);
        assert_eq!(gun.reload(&mut audio), ReloadOutcome::Refused);
        for _ in 0..config.reload_ticks {
            gun.tick();
        }
        assert_eq!(gun.state(), GunState::Idle);
        assert_eq!(gun.ammo(), config.ammo_capacity);
    }

    #[rstest]
    fn trigger_during_reload_cancels_it(mut gun: Gunner) {
        let index = CellIndex::new(16.0);
        let mut audio = RecordingAudio::default();
        gun.unload();
        gun.reload(&mut audio);
        audio.clear();
        let outcome = gun.fire(Vec2::ZERO, 0.0, 10.0, &index, &mut audio, |_| true);
        assert_eq!(outcome, FireOutcome::ReloadInterrupted);
        assert_eq!(audio.calls().first(), Some(&AudioCall::Pause(SoundCue::GunReload)));
        assert!(audio.was_played(SoundCue::DryFire));
        assert!(matches!(gun.state(), GunState::DryFire { .. }));
        assert_eq!(gun.ammo(), 0);
    }
}
