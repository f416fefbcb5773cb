//! The shared zombie state machine and steering.

use glam::Vec2;
use log::debug;

use super::{AgentSignal, Effect, Removal, SpriteFrame, TickContext, ZombieBehaviour, ZombieKind};
use crate::anim::{Animator, ClipKey};
use crate::config::ZombieStats;
use crate::entity::EntityId;
use crate::spatial::{Body, SpatialIndex, Tag};
use crate::spawn::SpawnPointId;
use crate::vector_math::{distance, heading_towards, step_towards};

/// Base behaviour state of every zombie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZombieState {
    /// No target in sight.
    Idle,
    /// Chasing the nearest target.
    Walking,
    /// Reacting to a bullet.
    Hit,
    /// Dying; removed when the clip ends.
    Dead,
}

/// Effects applied when a zombie clip finishes.
#[must_use]
pub const fn on_zombie_complete(state: ZombieState) -> &'static [Effect<ZombieState>] {
    match state {
        ZombieState::Hit => &[Effect::Transition(ZombieState::Walking)],
        ZombieState::Dead => &[Effect::Remove],
        ZombieState::Idle | ZombieState::Walking => &[],
    }
}

/// A regular zombie, and the inner behaviour of a boss.
#[derive(Debug, Clone)]
pub struct Zombie {
    id: EntityId,
    spawn_point: SpawnPointId,
    kind: ZombieKind,
    position: Vec2,
    angle: f32,
    speed: f32,
    size: f32,
    hit_to_die: i32,
    state: ZombieState,
    animator: Animator,
    alive: bool,
}

impl Zombie {
    /// A fresh, idle zombie standing still at `position`.
    #[must_use]
    pub fn new(
        id: EntityId,
        spawn_point: SpawnPointId,
        kind: ZombieKind,
        position: Vec2,
        stats: ZombieStats,
    ) -> Self {
        Self {
            id,
            spawn_point,
            kind,
            position,
            angle: 0.0,
            speed: stats.speed,
            size: stats.size,
            hit_to_die: stats.hit_to_die,
            state: ZombieState::Idle,
            animator: Animator::default(),
            alive: true,
        }
    }

    /// Collision footprint for the spatial index.
    #[must_use]
    pub fn body(&self) -> Body {
        Body::new(self.id, Tag::Mob, self.position, Vec2::splat(self.size))
    }

    /// Archetype.
    #[must_use]
    pub const fn kind(&self) -> ZombieKind {
        self.kind
    }

    /// Current base state.
    #[must_use]
    pub const fn state(&self) -> ZombieState {
        self.state
    }

    /// Distance moved per tick while walking.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Facing, radians.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    pub(super) const fn set_state(&mut self, state: ZombieState) {
        self.state = state;
    }

    pub(super) const fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Removes one hit without triggering death.
    pub(super) const fn wound(&mut self) {
        self.hit_to_die -= 1;
        self.state = ZombieState::Hit;
    }

    /// Idle or walking depending on whether a target is in sight. Transient
    /// states are left alone. Returns the target being chased.
    fn select_state(&mut self, targets: &[Vec2], sight_range: f32) -> Option<Vec2> {
        if matches!(self.state, ZombieState::Hit | ZombieState::Dead) {
            return None;
        }
        let nearest = targets
            .iter()
            .copied()
            .map(|t| (distance(self.position, t), t))
            .filter(|(d, _)| *d <= sight_range)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, t)| t);
        self.state = if nearest.is_some() {
            ZombieState::Walking
        } else {
            ZombieState::Idle
        };
        nearest
    }

    /// Steps towards `target`, sliding along walls when the direct step is
    /// blocked.
    fn walk_towards(&mut self, target: Vec2, index: &mut dyn SpatialIndex) {
        self.angle = heading_towards(self.position, target, self.angle);
        let step = step_towards(self.position, target, self.speed);
        for candidate in [step, Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
            if candidate == Vec2::ZERO {
                continue;
            }
            if index
                .check(self.id, candidate.x, candidate.y, &[Tag::Wall])
                .is_none()
            {
                self.position += candidate;
                index.move_to(self.id, self.position);
                return;
            }
        }
    }

    /// State selection followed by movement, without touching the animator.
    /// Wrappers that own their own animation call this.
    pub fn steer(&mut self, ctx: &mut TickContext<'_>) {
        if !self.alive {
            return;
        }
        let target = self.select_state(ctx.targets, ctx.config.zombies.sight_range);
        if let (ZombieState::Walking, Some(t)) = (self.state, target) {
            self.walk_towards(t, ctx.index);
        }
    }

    fn apply(
        &mut self,
        effect: Effect<ZombieState>,
        ctx: &mut TickContext<'_>,
        signals: &mut Vec<AgentSignal>,
    ) {
        match effect {
            Effect::PlaySound(cue) => ctx.audio.play(cue),
            Effect::Transition(state) | Effect::Base(state) => self.state = state,
            Effect::Sprint { factor } => self.speed = ctx.config.zombies.sprinter.speed * factor,
            Effect::MarkDead => self.die(),
            Effect::Remove => signals.push(AgentSignal::Remove),
            Effect::EnterPhaseTwo => debug!("zombie {} has no second phase", self.id),
        }
    }
}

impl ZombieBehaviour for Zombie {
    fn id(&self) -> EntityId {
        self.id
    }

    fn spawn_point(&self) -> SpawnPointId {
        self.spawn_point
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn hit_to_die(&self) -> i32 {
        self.hit_to_die
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) -> Vec<AgentSignal> {
        let target = if self.alive {
            self.select_state(ctx.targets, ctx.config.zombies.sight_range)
        } else {
            None
        };

        let mut signals = Vec::new();
        let clip = ctx.clips.clip(ClipKey::Zombie(self.state));
        if self
            .animator
            .advance(ctx.tick, ctx.config.frame_divisor, clip)
        {
            let finished = self.state;
            for effect in on_zombie_complete(finished) {
                self.apply(*effect, ctx, &mut signals);
            }
            if finished != self.state {
                self.animator.reset();
                debug!("zombie {} {finished:?} -> {:?}", self.id, self.state);
            }
        }

        if let (ZombieState::Walking, Some(t)) = (self.state, target) {
            self.walk_towards(t, ctx.index);
        }
        signals
    }

    fn sprite(&self) -> SpriteFrame {
        SpriteFrame {
            clip: ClipKey::Zombie(self.state),
            frame: self.animator.frame(),
            position: self.position,
            angle: self.angle,
        }
    }

    fn hit(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.wound();
        debug!("zombie {} hit, {} left", self.id, self.hit_to_die);
        if self.hit_to_die <= 0 {
            self.die();
        }
        true
    }

    fn die(&mut self) {
        self.alive = false;
        self.state = ZombieState::Dead;
    }

    fn remove(&mut self, index: &mut dyn SpatialIndex) -> Removal {
        index.remove(self.id);
        Removal {
            agent: self.id,
            spawn_point: self.spawn_point,
        }
    }
}
