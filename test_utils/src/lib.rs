//! Utility helpers for tests.
//!
//! Builders for small grids and levels plus a harness that hands out
//! [`TickContext`] values so agents can be driven one tick at a time without
//! a full session.

use escort::agent::TickContext;
use escort::entity::{EntityId, EntityIds};
use escort::spatial::Body;
use escort::spawn::{Horde, SpawnContext};
use escort::{CellIndex, DefaultClips, GridMap, LevelData, RecordingAudio, SimConfig, SpatialIndex, Tag};
use glam::{IVec2, Vec2};
use serde_json::json;

/// Grid of `width` x `height` tiles with `walls` blocked.
///
/// # Panics
/// Panics if the size is zero or a wall lies off the grid.
#[must_use]
pub fn grid_with_walls(width: u32, height: u32, walls: &[(i32, i32)]) -> GridMap {
    let mut grid = GridMap::new(width, height).unwrap_or_else(|e| panic!("grid: {e}"));
    for &(x, y) in walls {
        grid.set_obstacle(IVec2::new(x, y))
            .unwrap_or_else(|e| panic!("wall: {e}"));
    }
    grid
}

/// Config with animation frames advancing every tick, so clip lengths equal
/// tick counts.
#[must_use]
pub fn fast_config() -> SimConfig {
    SimConfig {
        frame_divisor: 1,
        ..SimConfig::default()
    }
}

/// A `length` x 5 open corridor with 32-unit tiles. The player starts at
/// the west end, the dog one tile ahead with a single control point two
/// tiles further, and the exit fills the last column.
///
/// `spawns` is inserted verbatim as the level's spawn list.
///
/// # Panics
/// Panics if the generated document is rejected.
#[must_use]
pub fn corridor_level(length: u32, spawns: &serde_json::Value) -> LevelData {
    let last = f64::from(length - 1) * 32.0 + 16.0;
    let doc = json!({
        "width": length,
        "height": 5,
        "tile_size": 32.0,
        "player": { "x": 48.0, "y": 80.0 },
        "dog": { "x": 80.0, "y": 80.0, "path": [{ "cx": 4, "cy": 2 }] },
        "spawns": spawns,
        "end": { "x": last, "y": 80.0, "width": 32.0, "height": 160.0 }
    });
    LevelData::from_json_str(&doc.to_string()).unwrap_or_else(|e| panic!("level: {e}"))
}

/// Standalone world for driving agents directly.
pub struct AgentHarness {
    /// Tunables handed to agents.
    pub config: SimConfig,
    /// Animation tables.
    pub clips: DefaultClips,
    /// Collision index.
    pub index: CellIndex,
    /// Recorded sound triggers.
    pub audio: RecordingAudio,
    /// Id allocator.
    pub ids: EntityIds,
    /// Last tick handed out.
    pub tick: u64,
}

impl AgentHarness {
    /// Empty world using `config`.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self {
            index: CellIndex::new(config.spatial_cell_size),
            config,
            clips: DefaultClips,
            audio: RecordingAudio::default(),
            ids: EntityIds::default(),
            tick: 0,
        }
    }

    /// Context for the next tick.
    pub fn next_tick<'a>(&'a mut self, targets: &'a [Vec2]) -> TickContext<'a> {
        self.tick += 1;
        TickContext {
            tick: self.tick,
            config: &self.config,
            clips: &self.clips,
            index: &mut self.index,
            audio: &mut self.audio,
            targets,
        }
    }

    /// Context for spawning into `horde`.
    pub fn spawner<'a>(&'a mut self, horde: &'a mut Horde) -> SpawnContext<'a> {
        SpawnContext {
            ids: &mut self.ids,
            config: &self.config,
            index: &mut self.index,
            horde,
        }
    }

    /// Adds a wall body of `size` centred on `centre`.
    pub fn add_wall(&mut self, centre: Vec2, size: Vec2) -> EntityId {
        let id = self.ids.next_id();
        self.index.add(Body::new(id, Tag::Wall, centre, size));
        id
    }
}

impl Default for AgentHarness {
    fn default() -> Self {
        Self::new(fast_config())
    }
}
