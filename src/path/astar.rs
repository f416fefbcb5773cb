//! A* search over the obstacle grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use glam::IVec2;
use hashbrown::{HashMap, HashSet};
use ordered_float::OrderedFloat;

use crate::grid::{GridError, GridMap};

/// Euclidean distance between two tiles. Used both as the step cost and as
/// the heuristic, which keeps the heuristic admissible and consistent.
/// Computed in `f32` so wide grids cannot overflow the squared delta.
#[must_use]
pub fn tile_distance(a: IVec2, b: IVec2) -> f32 {
    (b - a).as_vec2().length()
}

/// Open-set entry ordered by estimated total cost, then insertion order so
/// equal-cost ties expand first-in-first-out.
type OpenEntry = Reverse<(OrderedFloat<f32>, u64, i32, i32)>;

/// Shortest tile sequence from `start` to `goal`, both inclusive.
///
/// Expansion uses [`GridMap::neighbours`], so diagonal moves obey the
/// corridor rule. An unreachable goal yields an empty vector.
///
/// # Errors
/// Returns [`GridError::OutOfBounds`] if either endpoint is outside the grid.
pub fn find_tiles(grid: &GridMap, start: IVec2, goal: IVec2) -> Result<Vec<IVec2>, GridError> {
    // Validate both endpoints up front.
    grid.is_free(start)?;
    grid.is_free(goal)?;

    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut cost_so_far: HashMap<IVec2, f32> = HashMap::new();
    let mut closed: HashSet<IVec2> = HashSet::new();
    let mut sequence = 0_u64;

    cost_so_far.insert(start, 0.0);
    open.push(Reverse((
        OrderedFloat(tile_distance(start, goal)),
        sequence,
        start.x,
        start.y,
    )));

    while let Some(Reverse((_, _, x, y))) = open.pop() {
        let current = IVec2::new(x, y);
        if current == goal {
            return Ok(reconstruct(&came_from, start, goal));
        }
        if !closed.insert(current) {
            continue;
        }
        let current_cost = cost_so_far.get(&current).copied().unwrap_or(f32::INFINITY);

        for next in grid.neighbours(current)? {
            if closed.contains(&next) {
                continue;
            }
            let candidate = current_cost + tile_distance(current, next);
            let known = cost_so_far.get(&next).copied().unwrap_or(f32::INFINITY);
            if candidate < known {
                cost_so_far.insert(next, candidate);
                came_from.insert(next, current);
                sequence += 1;
                open.push(Reverse((
                    OrderedFloat(candidate + tile_distance(next, goal)),
                    sequence,
                    next.x,
                    next.y,
                )));
            }
        }
    }

    log::debug!("no route from {start} to {goal}");
    Ok(Vec::new())
}

fn reconstruct(came_from: &HashMap<IVec2, IVec2>, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    let mut tiles = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match came_from.get(&cursor) {
            Some(&prev) => {
                tiles.push(prev);
                cursor = prev;
            }
            None => break,
        }
    }
    tiles.reverse();
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn grid(width: u32, height: u32, walls: &[(i32, i32)]) -> GridMap {
        let mut g = GridMap::new(width, height).unwrap_or_else(|e| panic!("grid: {e}"));
        for &(x, y) in walls {
            g.set_obstacle(IVec2::new(x, y))
                .unwrap_or_else(|e| panic!("wall: {e}"));
        }
        g
    }

    #[rstest]
    fn start_equals_goal() {
        let g = grid(3, 3, &[]);
        let tiles = find_tiles(&g, IVec2::ONE, IVec2::ONE).unwrap_or_default();
        assert_eq!(tiles, vec![IVec2::ONE]);
    }

    #[rstest]
    fn open_grid_takes_the_diagonal() {
        let g = grid(4, 4, &[]);
        let tiles = find_tiles(&g, IVec2::ZERO, IVec2::new(3, 3)).unwrap_or_default();
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles.first(), Some(&IVec2::ZERO));
        assert_eq!(tiles.last(), Some(&IVec2::new(3, 3)));
    }

    #[rstest]
    fn walled_off_goal_is_unreachable() {
        let g = grid(5, 3, &[(2, 0), (2, 1), (2, 2)]);
        let tiles = find_tiles(&g, IVec2::ZERO, IVec2::new(4, 0)).unwrap_or_default();
        assert!(tiles.is_empty());
    }

    #[rstest]
    #[case(IVec2::ZERO, IVec2::new(3, 4), 5.0)]
    #[case(IVec2::ZERO, IVec2::new(49_999, 0), 49_999.0)]
    #[case(IVec2::new(-60_000, 0), IVec2::new(0, 80_000), 100_000.0)]
    fn tile_distance_handles_wide_deltas(#[case] a: IVec2, #[case] b: IVec2, #[case] d: f32) {
        approx::assert_relative_eq!(tile_distance(a, b), d);
    }

    #[rstest]
    fn long_single_row_reaches_the_far_end() {
        let g = grid(50_000, 1, &[]);
        let goal = IVec2::new(49_999, 0);
        let tiles = find_tiles(&g, IVec2::ZERO, goal).unwrap_or_default();
        assert_eq!(tiles.len(), 50_000);
        assert_eq!(tiles.first(), Some(&IVec2::ZERO));
        assert_eq!(tiles.last(), Some(&goal));
    }

    #[rstest]
    fn out_of_bounds_goal_is_an_error() {
        let g = grid(3, 3, &[]);
        assert!(matches!(
            find_tiles(&g, IVec2::ZERO, IVec2::new(3, 0)),
            Err(GridError::OutOfBounds { col: 3, row: 0, .. })
        ));
    }
}
