//! Path planning over the obstacle grid.
//!
//! [`PathPlanner`] runs A* between two world positions, strips collinear
//! interior tiles and optionally fits a smooth spline through the remaining
//! turn points. [`Path`] is the consumable result: a point list with a
//! forward-only cursor.

mod astar;
mod bezier;
mod simplify;

pub use astar::{find_tiles, tile_distance};
pub use bezier::{control_segments, smooth_path, CubicSegment};
pub use simplify::simplify;

use glam::{IVec2, Vec2};

use crate::grid::{GridError, GridMap};
use crate::numeric::{tile_centre, world_to_tile};

/// What a follower does once its cursor passes the final point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathEnd {
    /// Hold the final point indefinitely.
    #[default]
    Clamp,
    /// Restart from the first point.
    Loop,
}

/// Ordered points consumed by a follower through a monotonic cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    points: Vec<Vec2>,
    cursor: usize,
}

impl Path {
    /// Wraps `points` with the cursor at the start.
    #[must_use]
    pub const fn new(points: Vec<Vec2>) -> Self {
        Self { points, cursor: 0 }
    }

    /// All points of the path.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Index of the point currently being approached.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the path holds no points ("no path").
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point under the cursor, `None` once the path is exhausted.
    #[must_use]
    pub fn target(&self) -> Option<Vec2> {
        self.points.get(self.cursor).copied()
    }

    /// Last point of the path.
    #[must_use]
    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// True once the cursor has moved past the final point.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.points.len()
    }

    /// Moves the cursor to the next point, applying `end` when it runs off
    /// the final point.
    pub fn advance(&mut self, end: PathEnd) {
        if self.is_finished() {
            return;
        }
        self.cursor += 1;
        if self.is_finished() && end == PathEnd::Loop {
            self.cursor = 0;
        }
    }

    /// Restarts the path from its first point.
    pub const fn reset(&mut self) {
        self.cursor = 0;
    }
}

impl From<Vec<Vec2>> for Path {
    fn from(points: Vec<Vec2>) -> Self {
        Self::new(points)
    }
}

/// Plans routes across a read-only [`GridMap`].
#[derive(Debug, Clone, Copy)]
pub struct PathPlanner<'a> {
    grid: &'a GridMap,
    tile_size: f32,
}

impl<'a> PathPlanner<'a> {
    /// Planner over `grid` whose tiles span `tile_size` world units.
    #[must_use]
    pub const fn new(grid: &'a GridMap, tile_size: f32) -> Self {
        Self { grid, tile_size }
    }

    /// Tile containing the world position `pos`.
    ///
    /// # Errors
    /// Returns [`GridError::Unmappable`] for non-finite positions and
    /// [`GridError::OutOfBounds`] for positions off the map.
    pub fn tile_at(&self, pos: Vec2) -> Result<IVec2, GridError> {
        let (Some(col), Some(row)) = (
            world_to_tile(pos.x, self.tile_size),
            world_to_tile(pos.y, self.tile_size),
        ) else {
            return Err(GridError::Unmappable { x: pos.x, y: pos.y });
        };
        let tile = IVec2::new(col, row);
        self.grid.is_free(tile)?;
        Ok(tile)
    }

    /// World position of the centre of `tile`.
    #[must_use]
    pub fn centre_of(&self, tile: IVec2) -> Vec2 {
        Vec2::new(
            tile_centre(tile.x, self.tile_size),
            tile_centre(tile.y, self.tile_size),
        )
    }

    /// Turn points of the shortest route from `start` to `dest`, as tile
    /// centres. The first point is the centre of the start tile.
    ///
    /// An unreachable destination yields an empty vector which callers treat
    /// as "cannot proceed".
    ///
    /// # Errors
    /// Fails when either position does not lie on the grid.
    pub fn find_path(&self, start: Vec2, dest: Vec2) -> Result<Vec<Vec2>, GridError> {
        let from = self.tile_at(start)?;
        let to = self.tile_at(dest)?;
        let tiles = find_tiles(self.grid, from, to)?;
        if tiles.is_empty() {
            log::warn!("destination {dest} unreachable from {start}");
        }
        Ok(simplify(&tiles)
            .into_iter()
            .map(|tile| self.centre_of(tile))
            .collect())
    }

    /// Like [`Self::find_path`], then smoothed into a dense curve sampled
    /// `resolution` times per segment.
    ///
    /// # Errors
    /// Fails when either position does not lie on the grid.
    pub fn find_smooth_path(
        &self,
        start: Vec2,
        dest: Vec2,
        resolution: u32,
    ) -> Result<Path, GridError> {
        let waypoints = self.find_path(start, dest)?;
        Ok(Path::new(smooth_path(&waypoints, resolution)))
    }
}
