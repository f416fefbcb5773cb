//! Level data provider.
//!
//! A level is a JSON document describing the obstacle grid, where the player
//! and dog start, the dog's authored route, spawn points, checkpoints and the
//! exit. It is read once at load time.

use std::path::{Path as FsPath, PathBuf};

use glam::{IVec2, Vec2};
use serde::Deserialize;
use thiserror::Error;

use crate::agent::ZombieKind;
use crate::grid::{GridError, GridMap};
use crate::numeric::tile_centre;
use crate::spawn::SpawnSpec;

const DEMO_LEVEL: &str = include_str!("../assets/levels/demo.json");

/// Errors raised while reading a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The document is not valid level JSON.
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file could not be read.
    #[error("failed to read level {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// An obstacle or position lies off the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The dog has nowhere to go.
    #[error("the dog path has no control points")]
    EmptyDogPath,
    /// Tile size must be positive.
    #[error("tile size must be positive, got {0}")]
    TileSize(f32),
}

/// A world position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// A grid cell reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Cell {
    /// Column.
    pub cx: i32,
    /// Row.
    pub cy: i32,
}

impl From<Cell> for IVec2 {
    fn from(c: Cell) -> Self {
        Self::new(c.cx, c.cy)
    }
}

/// Rectangular trigger area, centred on `x`, `y`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Zone {
    /// Centre, horizontal.
    pub x: f32,
    /// Centre, vertical.
    pub y: f32,
    /// Full width.
    pub width: f32,
    /// Full height.
    pub height: f32,
}

impl Zone {
    /// Centre point.
    #[must_use]
    pub const fn centre(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Dog start and authored route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DogData {
    /// Start position.
    #[serde(flatten)]
    pub start: Point,
    /// Control points, as grid cells.
    pub path: Vec<Cell>,
}

/// Authored spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpawnData {
    /// Position.
    #[serde(flatten)]
    pub at: Point,
    /// Archetype.
    pub kind: ZombieKind,
    /// Agents spawned on load.
    pub initial: u32,
    /// Replace removed agents.
    #[serde(default)]
    pub continuous: bool,
}

/// Numbered checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CheckpointData {
    /// 1-based checkpoint number.
    pub number: u32,
    /// Trigger area.
    #[serde(flatten)]
    pub zone: Zone,
}

/// Everything the simulation reads from a level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelData {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// World units per tile.
    pub tile_size: f32,
    /// Blocked tiles.
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    /// Player start.
    pub player: Point,
    /// Dog start and route.
    pub dog: DogData,
    /// Spawn points.
    #[serde(default)]
    pub spawns: Vec<SpawnData>,
    /// Checkpoints.
    #[serde(default)]
    pub checkpoints: Vec<CheckpointData>,
    /// Exit zone.
    pub end: Zone,
}

impl LevelData {
    /// Parses and validates a level document.
    ///
    /// # Errors
    /// Returns [`LevelError`] for malformed JSON or inconsistent content.
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Reads a level file.
    ///
    /// # Errors
    /// Returns [`LevelError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn from_path(file: impl AsRef<FsPath>) -> Result<Self, LevelError> {
        let path = file.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The bundled demo level.
    ///
    /// # Errors
    /// Only fails if the bundled document is broken.
    pub fn demo() -> Result<Self, LevelError> {
        Self::from_json_str(DEMO_LEVEL)
    }

    /// Checks tile size, the dog path and that every obstacle is on the grid.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(LevelError::TileSize(self.tile_size));
        }
        if self.dog.path.is_empty() {
            return Err(LevelError::EmptyDogPath);
        }
        self.grid().map(|_| ())
    }

    /// Obstacle grid of the level.
    ///
    /// # Errors
    /// Fails when the grid is empty or an obstacle lies outside it.
    pub fn grid(&self) -> Result<GridMap, LevelError> {
        let mut grid = GridMap::new(self.width, self.height)?;
        for cell in &self.obstacles {
            grid.set_obstacle((*cell).into())?;
        }
        Ok(grid)
    }

    /// World position of the centre of `cell`.
    #[must_use]
    pub fn cell_centre(&self, cell: IVec2) -> Vec2 {
        Vec2::new(
            tile_centre(cell.x, self.tile_size),
            tile_centre(cell.y, self.tile_size),
        )
    }

    /// The dog's authored control points in world coordinates.
    #[must_use]
    pub fn dog_control_points(&self) -> Vec<Vec2> {
        self.dog
            .path
            .iter()
            .map(|cell| self.cell_centre((*cell).into()))
            .collect()
    }

    /// Spawn sources in document order.
    #[must_use]
    pub fn spawn_specs(&self) -> Vec<SpawnSpec> {
        self.spawns
            .iter()
            .map(|s| SpawnSpec {
                position: s.at.into(),
                kind: s.kind,
                initial_count: s.initial,
                continuous: s.continuous,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TINY: &str = r#"{
        "width": 4, "height": 3, "tile_size": 32.0,
        "obstacles": [{ "cx": 1, "cy": 1 }],
        "player": { "x": 16.0, "y": 16.0 },
        "dog": { "x": 16.0, "y": 48.0, "path": [{ "cx": 3, "cy": 1 }] },
        "spawns": [{ "x": 112.0, "y": 80.0, "kind": "sprinter", "initial": 2, "continuous": true }],
        "end": { "x": 112.0, "y": 48.0, "width": 32.0, "height": 96.0 }
    }"#;

    #[rstest]
    fn parses_a_minimal_level() {
        let level = LevelData::from_json_str(TINY).unwrap_or_else(|e| panic!("level: {e}"));
        assert_eq!(level.dog_control_points(), vec![Vec2::new(112.0, 48.0)]);
        let specs = level.spawn_specs();
        assert_eq!(specs.len(), 1);
        assert!(specs.iter().all(|s| s.continuous && s.kind == ZombieKind::Sprinter));
        let grid = level.grid().unwrap_or_else(|e| panic!("grid: {e}"));
        assert_eq!(grid.is_free(IVec2::new(1, 1)), Ok(false));
        assert!(level.checkpoints.is_empty());
    }

    #[rstest]
    fn rejects_obstacles_off_the_grid() {
        let json = TINY.replace(r#""cx": 1, "cy": 1"#, r#""cx": 9, "cy": 1"#);
        assert!(matches!(
            LevelData::from_json_str(&json),
            Err(LevelError::Grid(GridError::OutOfBounds { col: 9, .. }))
        ));
    }

    #[rstest]
    fn rejects_an_empty_dog_path() {
        let json = TINY.replace(r#"[{ "cx": 3, "cy": 1 }]"#, "[]");
        assert!(matches!(
            LevelData::from_json_str(&json),
            Err(LevelError::EmptyDogPath)
        ));
    }

    #[rstest]
    fn missing_files_report_their_path() {
        match LevelData::from_path("no/such/level.json") {
            Err(LevelError::Io { path, .. }) => assert!(path.ends_with("level.json")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[rstest]
    fn bundled_demo_is_valid() {
        let level = LevelData::demo().unwrap_or_else(|e| panic!("demo: {e}"));
        assert!(!level.spawns.is_empty());
        assert!(level.spawns.iter().any(|s| s.kind == ZombieKind::Big));
    }
}
