//! The two-phase boss.
//!
//! The boss owns a [`Zombie`] for steering and health and overrides only the
//! animation state. Display states come from an ordered dispatch table keyed
//! by remaining hits and the inner zombie's base state; the first matching
//! row wins.

use glam::Vec2;
use log::{debug, info};

use super::{AgentSignal, Effect, Removal, SpriteFrame, TickContext, Zombie, ZombieBehaviour, ZombieKind, ZombieState};
use crate::anim::{Animator, ClipKey};
use crate::audio::SoundCue;
use crate::config::ZombieStats;
use crate::entity::EntityId;
use crate::spatial::{Body, SpatialIndex};
use crate::spawn::SpawnPointId;

/// Boss display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossState {
    /// Unharmed, standing.
    Idle1,
    /// Unharmed, walking.
    Walking1,
    /// Unharmed, hit reaction.
    Hit1,
    /// One bleeding arm, standing.
    Idle2,
    /// One bleeding arm, walking.
    Walking2,
    /// Wounded hit reaction.
    Hit2,
    /// Two bleeding arms, standing.
    Idle3,
    /// Two bleeding arms, walking.
    Walking3,
    /// First collapse, leads into the second phase.
    Death1,
    /// Rising as the daemon.
    Phase2,
    /// Daemon, standing.
    Idle4,
    /// Daemon, running.
    Running,
    /// Final death.
    Death2,
}

impl BossState {
    /// Clips that may not be interrupted by hits or dispatch.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Death1 | Self::Phase2 | Self::Death2)
    }
}

/// One row of a dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRule {
    /// Lowest remaining-hits value of the bucket.
    pub min_hits: i32,
    /// Highest remaining-hits value of the bucket.
    pub max_hits: i32,
    /// Base zombie state the row applies to.
    pub base: ZombieState,
    /// Resulting display state.
    pub result: BossState,
}

impl DispatchRule {
    const fn new(min_hits: i32, max_hits: i32, base: ZombieState, result: BossState) -> Self {
        Self {
            min_hits,
            max_hits,
            base,
            result,
        }
    }

    /// Whether the row covers `hits` and `base`.
    #[must_use]
    pub fn matches(&self, hits: i32, base: ZombieState) -> bool {
        (self.min_hits..=self.max_hits).contains(&hits) && self.base == base
    }
}

use BossState as B;
use ZombieState as Z;

/// Dispatch rows before the first death.
pub const PHASE_ONE: &[DispatchRule] = &[
    DispatchRule::new(8, 10, Z::Idle, B::Idle1),
    DispatchRule::new(8, 10, Z::Walking, B::Walking1),
    DispatchRule::new(8, 10, Z::Hit, B::Hit1),
    DispatchRule::new(7, 7, Z::Hit, B::Hit1),
    DispatchRule::new(7, 7, Z::Idle, B::Idle2),
    DispatchRule::new(7, 7, Z::Walking, B::Walking2),
    DispatchRule::new(5, 6, Z::Hit, B::Hit2),
    DispatchRule::new(5, 6, Z::Idle, B::Idle2),
    DispatchRule::new(5, 6, Z::Walking, B::Walking2),
    DispatchRule::new(3, 4, Z::Hit, B::Hit2),
    DispatchRule::new(3, 4, Z::Idle, B::Idle3),
    DispatchRule::new(3, 4, Z::Walking, B::Walking3),
    DispatchRule::new(2, 2, Z::Hit, B::Death1),
    DispatchRule::new(2, 2, Z::Idle, B::Idle4),
    DispatchRule::new(2, 2, Z::Walking, B::Running),
    DispatchRule::new(1, 1, Z::Hit, B::Death2),
];

/// Dispatch rows once the daemon has risen.
pub const PHASE_TWO: &[DispatchRule] = &[
    DispatchRule::new(2, 2, Z::Hit, B::Death1),
    DispatchRule::new(2, 2, Z::Idle, B::Idle4),
    DispatchRule::new(2, 2, Z::Walking, B::Running),
    DispatchRule::new(1, 1, Z::Hit, B::Death2),
];

/// Looks up the display state for `hits` and `base`. `None` keeps the
/// current state.
#[must_use]
pub fn dispatch(daemon: bool, hits: i32, base: ZombieState) -> Option<BossState> {
    let table = if daemon { PHASE_TWO } else { PHASE_ONE };
    table
        .iter()
        .find(|rule| rule.matches(hits, base))
        .map(|rule| rule.result)
}

/// Effects applied when a boss clip finishes.
#[must_use]
pub const fn on_boss_complete(state: BossState) -> &'static [Effect<BossState>] {
    match state {
        B::Hit1 => &[Effect::Transition(B::Walking1), Effect::Base(Z::Walking)],
        B::Hit2 => &[Effect::Transition(B::Walking2), Effect::Base(Z::Walking)],
        B::Death1 => &[
            Effect::PlaySound(SoundCue::BigZombieDeath1),
            Effect::EnterPhaseTwo,
            Effect::Sprint { factor: 2.0 },
            Effect::Transition(B::Phase2),
            Effect::Base(Z::Walking),
        ],
        B::Phase2 => &[
            Effect::PlaySound(SoundCue::BigZombieScream),
            Effect::Transition(B::Running),
            Effect::Base(Z::Walking),
        ],
        B::Death2 => &[
            Effect::PlaySound(SoundCue::BigZombieDeath2),
            Effect::MarkDead,
            Effect::Base(Z::Dead),
            Effect::Remove,
        ],
        B::Idle1
        | B::Walking1
        | B::Idle2
        | B::Walking2
        | B::Idle3
        | B::Walking3
        | B::Idle4
        | B::Running => &[],
    }
}

/// Boss wrapper around a [`Zombie`].
#[derive(Debug, Clone)]
pub struct Boss {
    inner: Zombie,
    daemon: bool,
    state: BossState,
    animator: Animator,
    dead: bool,
}

impl Boss {
    /// A phase-one boss standing at `position`.
    #[must_use]
    pub fn new(id: EntityId, spawn_point: SpawnPointId, position: Vec2, stats: ZombieStats) -> Self {
        Self {
            inner: Zombie::new(id, spawn_point, ZombieKind::Big, position, stats),
            daemon: false,
            state: B::Idle1,
            animator: Animator::default(),
            dead: false,
        }
    }

    /// Collision footprint for the spatial index.
    #[must_use]
    pub fn body(&self) -> Body {
        self.inner.body()
    }

    /// Current display state.
    #[must_use]
    pub const fn state(&self) -> BossState {
        self.state
    }

    /// Whether the second phase has started.
    #[must_use]
    pub const fn is_daemon(&self) -> bool {
        self.daemon
    }

    /// Whether the final death has played out.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.dead
    }

    /// The wrapped zombie.
    #[must_use]
    pub const fn inner(&self) -> &Zombie {
        &self.inner
    }

    fn apply(
        &mut self,
        effect: Effect<BossState>,
        ctx: &mut TickContext<'_>,
        signals: &mut Vec<AgentSignal>,
    ) {
        match effect {
            Effect::PlaySound(cue) => ctx.audio.play(cue),
            Effect::EnterPhaseTwo => {
                self.daemon = true;
                info!("boss {} rises as the daemon", self.inner.id());
            }
            Effect::Sprint { factor } => {
                self.inner
                    .set_speed(ctx.config.zombies.sprinter.speed * factor);
            }
            Effect::Transition(state) => self.state = state,
            Effect::Base(state) => self.inner.set_state(state),
            Effect::MarkDead => {
                self.die();
                signals.push(AgentSignal::BossDefeated);
            }
            Effect::Remove => signals.push(AgentSignal::Remove),
        }
    }
}

impl ZombieBehaviour for Boss {
    fn id(&self) -> EntityId {
        self.inner.id()
    }

    fn spawn_point(&self) -> SpawnPointId {
        self.inner.spawn_point()
    }

    fn position(&self) -> Vec2 {
        self.inner.position()
    }

    fn hit_to_die(&self) -> i32 {
        self.inner.hit_to_die()
    }

    fn is_alive(&self) -> bool {
        !self.dead && self.state != B::Death2
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Vec<AgentSignal> {
        if self.dead {
            return Vec::new();
        }

        if !self.state.is_locked() {
            if let Some(next) = dispatch(self.daemon, self.inner.hit_to_die(), self.inner.state()) {
                self.state = next;
            }
        }

        let mut signals = Vec::new();
        let clip = ctx.clips.clip(ClipKey::Boss(self.state));
        if self
            .animator
            .advance(ctx.tick, ctx.config.frame_divisor, clip)
        {
            let finished = self.state;
            for effect in on_boss_complete(finished) {
                self.apply(*effect, ctx, &mut signals);
            }
            if finished != self.state {
                self.animator.reset();
                debug!("boss {} {finished:?} -> {:?}", self.inner.id(), self.state);
            }
        }

        if self.dead || self.state.is_locked() {
            return signals;
        }
        self.inner.steer(ctx);
        signals
    }

    fn sprite(&self) -> SpriteFrame {
        SpriteFrame {
            clip: ClipKey::Boss(self.state),
            frame: self.animator.frame(),
            position: self.inner.position(),
            angle: self.inner.angle(),
        }
    }

    fn hit(&mut self) -> bool {
        if self.dead || self.state.is_locked() {
            return false;
        }
        self.inner.wound();
        debug!(
            "boss {} hit, {} left",
            self.inner.id(),
            self.inner.hit_to_die()
        );
        true
    }

    fn die(&mut self) {
        self.inner.die();
        self.dead = true;
    }

    fn remove(&mut self, index: &mut dyn SpatialIndex) -> Removal {
        self.inner.remove(index)
    }
}
