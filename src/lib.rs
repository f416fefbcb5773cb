#![cfg_attr(docsrs, feature(doc_cfg))]
//! Simulation core for a top-down escort game.
//!
//! The player walks a dog through a zombie-infested level. This crate holds
//! the parts that decide what happens each tick: the obstacle grid and path
//! planner, the zombie and boss state machines, spawn points, the dog's path
//! follower and gunfire. Rendering, input and asset loading stay outside;
//! they reach the core through the [`SpatialIndex`], [`AudioSink`] and
//! [`AnimationSource`] traits and through [`LevelData`].
pub mod agent;
pub mod anim;
pub mod audio;
pub mod combat;
pub mod companion;
pub mod config;
pub mod constants;
pub mod entity;
pub mod grid;
pub mod level;
pub mod logging;
pub mod numeric;
pub mod path;
pub mod plugin;
pub mod session;
pub mod spatial;
pub mod spawn;
pub mod vector_math;

// Re-export commonly used items
pub use agent::{Boss, BossState, ZombieBehaviour, ZombieKind, ZombieState};
pub use anim::{AnimationSource, DefaultClips};
pub use audio::{AudioSink, RecordingAudio, SilentAudio, SoundCue};
pub use combat::{FireOutcome, Gunner};
pub use companion::{Dog, DogMode, DogState};
pub use config::SimConfig;
pub use entity::EntityId;
pub use grid::{GridError, GridMap};
pub use level::LevelData;
pub use logging::init as init_logging;
pub use path::{Path, PathEnd, PathPlanner};
pub use plugin::EscortPlugin;
pub use session::{Outcome, Session, TickInput};
pub use spatial::{CellIndex, SpatialIndex, Tag};
pub use spawn::{SpawnPointId, SpawnRegistry};
pub use vector_math::vec_normalize;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use escort::prelude::*;
    //! ```

    pub use crate::{
        AudioSink, CellIndex, EscortPlugin, LevelData, Outcome, Session, SimConfig,
        SpatialIndex, TickInput,
    };
    pub use glam::Vec2;
}
