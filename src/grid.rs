//! Static obstacle grid used by the path planner.
//!
//! The grid is rectangular and sized once at level load. Tiles are addressed
//! with signed [`IVec2`] coordinates (`x` = column, `y` = row) so that
//! neighbour offsets can step outside the map; any access outside
//! `[0, width) x [0, height)` is rejected with [`GridError::OutOfBounds`].

use glam::IVec2;
use thiserror::Error;

/// Errors raised by grid construction and addressing.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GridError {
    /// A tile outside the grid was addressed.
    #[error("tile ({col}, {row}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        col: i32,
        /// Requested row.
        row: i32,
        /// Grid width in tiles.
        width: u32,
        /// Grid height in tiles.
        height: u32,
    },
    /// A world coordinate could not be mapped onto a tile.
    #[error("world position ({x}, {y}) does not map onto a tile")]
    Unmappable {
        /// World x coordinate.
        x: f32,
        /// World y coordinate.
        y: f32,
    },
    /// A grid with zero width or height was requested.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    Empty {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Orthogonal neighbour offsets: north, east, south, west.
const ORTHOGONAL: [IVec2; 4] = [
    IVec2::new(0, -1),
    IVec2::new(1, 0),
    IVec2::new(0, 1),
    IVec2::new(-1, 0),
];

/// Diagonal neighbour offsets: north-east, south-east, south-west, north-west.
const DIAGONAL: [IVec2; 4] = [
    IVec2::new(1, -1),
    IVec2::new(1, 1),
    IVec2::new(-1, 1),
    IVec2::new(-1, -1),
];

/// Binary walkability map. Obstacles are set during world construction and
/// never cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    blocked: Vec<bool>,
    width: u32,
    height: u32,
}

impl GridMap {
    /// Fully open grid of `width` x `height` tiles.
    ///
    /// # Errors
    /// Returns [`GridError::Empty`] when either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }
        let len = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| GridError::Empty { width, height })?;
        Ok(Self {
            blocked: vec![false; len],
            width,
            height,
        })
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// True when `tile` lies inside the grid.
    #[must_use]
    pub fn contains(&self, tile: IVec2) -> bool {
        self.index(tile).is_some()
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        let col = u32::try_from(tile.x).ok()?;
        let row = u32::try_from(tile.y).ok()?;
        if col >= self.width || row >= self.height {
            return None;
        }
        usize::try_from(u64::from(row) * u64::from(self.width) + u64::from(col)).ok()
    }

    fn checked_index(&self, tile: IVec2) -> Result<usize, GridError> {
        self.index(tile).ok_or(GridError::OutOfBounds {
            col: tile.x,
            row: tile.y,
            width: self.width,
            height: self.height,
        })
    }

    /// Marks `tile` as impassable.
    ///
    /// # Errors
    /// Returns [`GridError::OutOfBounds`] for tiles outside the grid.
    pub fn set_obstacle(&mut self, tile: IVec2) -> Result<(), GridError> {
        let idx = self.checked_index(tile)?;
        if let Some(cell) = self.blocked.get_mut(idx) {
            *cell = true;
        }
        Ok(())
    }

    /// Whether `tile` can be walked through.
    ///
    /// # Errors
    /// Returns [`GridError::OutOfBounds`] for tiles outside the grid.
    pub fn is_free(&self, tile: IVec2) -> Result<bool, GridError> {
        let idx = self.checked_index(tile)?;
        Ok(!self.blocked.get(idx).copied().unwrap_or(true))
    }

    /// Like [`Self::is_free`], but tiles outside the grid count as blocked.
    fn is_open(&self, tile: IVec2) -> bool {
        self.index(tile)
            .and_then(|idx| self.blocked.get(idx))
            .is_some_and(|blocked| !blocked)
    }

    /// Passable tiles adjacent to `tile`, at most eight.
    ///
    /// Diagonals come first and are only offered when the diagonal tile and
    /// both orthogonal tiles flanking it are free, so a path never clips a
    /// wall corner. Orthogonal neighbours follow in north, east, south, west
    /// order.
    ///
    /// # Errors
    /// Returns [`GridError::OutOfBounds`] when `tile` itself is outside the
    /// grid.
    pub fn neighbours(&self, tile: IVec2) -> Result<Vec<IVec2>, GridError> {
        self.checked_index(tile)?;
        let mut out = Vec::with_capacity(8);

        for offset in DIAGONAL {
            let diagonal = tile + offset;
            let same_row = tile + IVec2::new(offset.x, 0);
            let same_col = tile + IVec2::new(0, offset.y);
            if self.is_open(diagonal) && self.is_open(same_row) && self.is_open(same_col) {
                out.push(diagonal);
            }
        }

        out.extend(
            ORTHOGONAL
                .into_iter()
                .map(|offset| tile + offset)
                .filter(|q| self.is_open(*q)),
        );
        Ok(out)
    }
}
