//! Zombie and boss behaviour.
//!
//! Every hostile agent implements [`ZombieBehaviour`]. A plain [`Zombie`]
//! carries the shared state machine (idle, walking, hit, dead) plus steering.
//! A [`Boss`] wraps a `Zombie`, delegates steering to it and replaces its
//! animation selection with a health-bucketed dispatch table.
//!
//! Each tick an agent recomputes its state, advances its animation, and only
//! then checks for clip completion. Completion applies the [`Effect`] list
//! registered for the finishing state; that list is the only place where
//! death, phase changes and sounds happen.

mod boss;
mod zombie;

pub use boss::{dispatch, on_boss_complete, Boss, BossState, DispatchRule, PHASE_ONE, PHASE_TWO};
pub use zombie::{on_zombie_complete, Zombie, ZombieState};

use glam::Vec2;
use serde::Deserialize;

use crate::anim::{AnimationSource, ClipKey};
use crate::audio::{AudioSink, SoundCue};
use crate::config::SimConfig;
use crate::entity::EntityId;
use crate::spatial::SpatialIndex;
use crate::spawn::SpawnPointId;

/// Zombie archetype authored on a spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZombieKind {
    /// Ordinary shambler.
    Normal,
    /// Fast and fragile.
    Sprinter,
    /// Slow and tough.
    Crawler,
    /// The two-phase boss.
    Big,
}

/// Side effect attached to the completion of an animation clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect<S> {
    /// Fire a sound.
    PlaySound(SoundCue),
    /// Switch the boss into its second phase.
    EnterPhaseTwo,
    /// Set speed to the sprinter speed times `factor`.
    Sprint {
        /// Multiplier applied to the sprinter speed.
        factor: f32,
    },
    /// Enter another display state.
    Transition(S),
    /// Set the underlying zombie state (used by wrappers).
    Base(ZombieState),
    /// Terminal death; the agent stops reacting.
    MarkDead,
    /// Ask the owner to remove the agent from the world.
    Remove,
}

/// Notification from an agent update to the owning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentSignal {
    /// The terminal clip finished; remove the agent this tick.
    Remove,
    /// The boss has died for good.
    BossDefeated,
}

/// What the renderer needs to draw an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    /// Sprite sheet and state.
    pub clip: ClipKey,
    /// Frame within the sheet.
    pub frame: u32,
    /// World position of the centre.
    pub position: Vec2,
    /// Facing, radians.
    pub angle: f32,
}

/// Bookkeeping handed back when an agent leaves the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// The removed agent.
    pub agent: EntityId,
    /// Spawn point that owned it.
    pub spawn_point: SpawnPointId,
}

/// Everything an agent may consult or poke during its update.
pub struct TickContext<'a> {
    /// Current simulation tick.
    pub tick: u64,
    /// Tunables.
    pub config: &'a SimConfig,
    /// Frame ranges per state.
    pub clips: &'a dyn AnimationSource,
    /// Collision queries and body positions.
    pub index: &'a mut dyn SpatialIndex,
    /// Sound triggers.
    pub audio: &'a mut dyn AudioSink,
    /// Positions zombies may chase (player, dog).
    pub targets: &'a [Vec2],
}

/// Capability shared by every hostile agent.
pub trait ZombieBehaviour {
    /// World identifier, also the spatial-index body id.
    fn id(&self) -> EntityId;
    /// Owning spawn point.
    fn spawn_point(&self) -> SpawnPointId;
    /// Centre position.
    fn position(&self) -> Vec2;
    /// Remaining hits before the next death stage.
    fn hit_to_die(&self) -> i32;
    /// False once the agent has died, even while its death clip plays.
    fn is_alive(&self) -> bool;
    /// Runs one simulation tick.
    fn update(&mut self, ctx: &mut TickContext<'_>) -> Vec<AgentSignal>;
    /// Frame to draw this tick.
    fn sprite(&self) -> SpriteFrame;
    /// Applies one unit of damage. Returns `false` when the hit was ignored.
    fn hit(&mut self) -> bool;
    /// Enters the terminal dead state.
    fn die(&mut self);
    /// Takes the agent's body out of `index`.
    fn remove(&mut self, index: &mut dyn SpatialIndex) -> Removal;
}
