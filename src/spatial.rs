//! Collision query contract and a uniform-grid reference implementation.
//!
//! The simulation asks a [`SpatialIndex`] whether a move is blocked, whether
//! two bodies touch, and which bodies lie along a line of fire. It never does
//! broad-phase work itself. [`CellIndex`] is the in-process index used by the
//! headless harness and the tests.

use glam::{IVec2, Vec2};
use hashbrown::{HashMap, HashSet};

use crate::entity::EntityId;
use crate::numeric::world_to_tile;

/// Collision category of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The player.
    Player,
    /// Any zombie, boss included.
    Mob,
    /// Static wall tile.
    Wall,
    /// The companion dog.
    Dog,
    /// Level exit zone.
    End,
    /// Numbered checkpoint zone.
    Checkpoint(u32),
}

impl Tag {
    /// Whether this tag belongs to the category `other`. Checkpoints match
    /// any checkpoint query regardless of number.
    #[must_use]
    pub const fn matches(self, other: Self) -> bool {
        match (self, other) {
            (Self::Checkpoint(_), Self::Checkpoint(_)) => true,
            (Self::Player, Self::Player)
            | (Self::Mob, Self::Mob)
            | (Self::Wall, Self::Wall)
            | (Self::Dog, Self::Dog)
            | (Self::End, Self::End) => true,
            _ => false,
        }
    }
}

/// Axis-aligned collision footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Owner of the footprint.
    pub id: EntityId,
    /// Collision category.
    pub tag: Tag,
    /// Centre in world coordinates.
    pub centre: Vec2,
    /// Half width and half height.
    pub half_extents: Vec2,
}

impl Body {
    /// Footprint of `size` centred on `centre`.
    #[must_use]
    pub fn new(id: EntityId, tag: Tag, centre: Vec2, size: Vec2) -> Self {
        Self {
            id,
            tag,
            centre,
            half_extents: size * 0.5,
        }
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.centre - self.half_extents
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.centre + self.half_extents
    }

    /// Strict overlap test; touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// Fraction along `from -> to` at which the segment first enters this
    /// footprint, or `None` when it misses. A segment starting inside the
    /// body enters at 0.
    #[must_use]
    pub fn segment_entry(&self, from: Vec2, to: Vec2) -> Option<f32> {
        let (lo, hi) = (self.min(), self.max());
        let delta = to - from;
        let mut enter = 0.0_f32;
        let mut exit = 1.0_f32;
        for (start, d, min, max) in [
            (from.x, delta.x, lo.x, hi.x),
            (from.y, delta.y, lo.y, hi.y),
        ] {
            if d.abs() <= f32::EPSILON {
                if start < min || start > max {
                    return None;
                }
                continue;
            }
            let (near, far) = ((min - start) / d, (max - start) / d);
            enter = enter.max(near.min(far));
            exit = exit.min(near.max(far));
        }
        (enter <= exit).then_some(enter)
    }

    /// This body shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            centre: self.centre + offset,
            ..*self
        }
    }
}

/// One cell visited by a line query with the bodies it contains.
pub type LineCell = Vec<(EntityId, Tag)>;

/// Collision queries the simulation relies on.
pub trait SpatialIndex {
    /// Inserts (or replaces) a body.
    fn add(&mut self, body: Body);
    /// Removes a body, returning it if it was present.
    fn remove(&mut self, id: EntityId) -> Option<Body>;
    /// Current centre of a body.
    fn position(&self, id: EntityId) -> Option<Vec2>;
    /// Moves a body so it is centred on `centre`.
    fn move_to(&mut self, id: EntityId, centre: Vec2);
    /// Bodies carrying one of `tags` that body `id` would touch after moving
    /// by `(dx, dy)`, or `None` when the move is clear.
    fn check(&self, id: EntityId, dx: f32, dy: f32, tags: &[Tag]) -> Option<Vec<EntityId>>;
    /// Whether bodies `a` and `b` currently overlap.
    fn overlaps(&self, a: EntityId, b: EntityId) -> bool;
    /// Cells crossed by the segment `from -> to`, nearest first. Each cell
    /// lists the bodies the segment enters there, nearest first. Bodies the
    /// segment misses, including those behind `from`, are left out, and a
    /// body is listed once however many cells it spans.
    fn cells_in_line(&self, from: Vec2, to: Vec2) -> Vec<LineCell>;
}

/// Uniform hash-grid broad phase.
#[derive(Debug, Clone)]
pub struct CellIndex {
    cell_size: f32,
    bodies: HashMap<EntityId, Body>,
    cells: HashMap<IVec2, Vec<EntityId>>,
}

impl CellIndex {
    /// Empty index with square cells of `cell_size` world units.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            bodies: HashMap::new(),
            cells: HashMap::new(),
        }
    }

    /// Number of bodies stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when no bodies are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Whether a body with `id` is stored.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn cell_of(&self, point: Vec2) -> IVec2 {
        IVec2::new(
            world_to_tile(point.x, self.cell_size).unwrap_or(0),
            world_to_tile(point.y, self.cell_size).unwrap_or(0),
        )
    }

    fn covered_cells(&self, body: &Body) -> impl Iterator<Item = IVec2> {
        let lo = self.cell_of(body.min());
        let hi = self.cell_of(body.max());
        (lo.y..=hi.y).flat_map(move |y| (lo.x..=hi.x).map(move |x| IVec2::new(x, y)))
    }

    fn unlink(&mut self, body: &Body) {
        let cells: Vec<IVec2> = self.covered_cells(body).collect();
        for cell in cells {
            if let Some(ids) = self.cells.get_mut(&cell) {
                ids.retain(|id| *id != body.id);
                if ids.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    fn link(&mut self, body: &Body) {
        let cells: Vec<IVec2> = self.covered_cells(body).collect();
        for cell in cells {
            let ids = self.cells.entry(cell).or_default();
            if let Err(slot) = ids.binary_search(&body.id) {
                ids.insert(slot, body.id);
            }
        }
    }
}

impl SpatialIndex for CellIndex {
    fn add(&mut self, body: Body) {
        if let Some(old) = self.bodies.insert(body.id, body) {
            self.unlink(&old);
        }
        self.link(&body);
    }

    fn remove(&mut self, id: EntityId) -> Option<Body> {
        let body = self.bodies.remove(&id)?;
        self.unlink(&body);
        Some(body)
    }

    fn position(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.centre)
    }

    fn move_to(&mut self, id: EntityId, centre: Vec2) {
        if let Some(body) = self.bodies.get(&id).copied() {
            self.add(Body { centre, ..body });
        }
    }

    fn check(&self, id: EntityId, dx: f32, dy: f32, tags: &[Tag]) -> Option<Vec<EntityId>> {
        let moved = self.bodies.get(&id)?.translated(Vec2::new(dx, dy));
        let mut hits: Vec<EntityId> = self
            .covered_cells(&moved)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .filter(|other| *other != id)
            .filter(|other| {
                self.bodies.get(other).is_some_and(|b| {
                    tags.iter().any(|t| b.tag.matches(*t)) && b.intersects(&moved)
                })
            })
            .collect();
        hits.sort_unstable();
        hits.dedup();
        (!hits.is_empty()).then_some(hits)
    }

    fn overlaps(&self, a: EntityId, b: EntityId) -> bool {
        match (self.bodies.get(&a), self.bodies.get(&b)) {
            (Some(first), Some(second)) => a != b && first.intersects(second),
            _ => false,
        }
    }

    fn cells_in_line(&self, from: Vec2, to: Vec2) -> Vec<LineCell> {
        let walk = line_cells(self.cell_of(from), self.cell_of(to));
        let mut entries: Vec<Vec<(f32, EntityId, Tag)>> = vec![Vec::new(); walk.len()];
        let mut seen: HashSet<EntityId> = HashSet::new();
        for (slot, cell) in walk.iter().enumerate() {
            let Some(ids) = self.cells.get(cell) else {
                continue;
            };
            for id in ids {
                if !seen.insert(*id) {
                    continue;
                }
                let Some(body) = self.bodies.get(id) else {
                    continue;
                };
                let Some(t) = body.segment_entry(from, to) else {
                    continue;
                };
                // File the body under the cell where the segment enters it.
                let entry_cell = self.cell_of(from.lerp(to, t));
                let at = walk
                    .iter()
                    .position(|c| *c == entry_cell)
                    .unwrap_or(slot);
                if let Some(bucket) = entries.get_mut(at) {
                    bucket.push((t, body.id, body.tag));
                }
            }
        }
        entries
            .into_iter()
            .map(|mut bucket| {
                bucket.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                bucket.into_iter().map(|(_, id, tag)| (id, tag)).collect()
            })
            .collect()
    }
}

/// Bresenham walk over grid cells from `a` to `b`, both inclusive.
fn line_cells(a: IVec2, b: IVec2) -> Vec<IVec2> {
    let delta = (b - a).abs();
    let step = (b - a).signum();
    let mut err = delta.x - delta.y;
    let mut cell = a;
    let mut out = Vec::with_capacity(usize::try_from(delta.x.max(delta.y) + 1).unwrap_or(1));
    loop {
        out.push(cell);
        if cell == b {
            break;
        }
        let doubled = err * 2;
        if doubled > -delta.y {
            err -= delta.y;
            cell.x += step.x;
        }
        if doubled < delta.x {
            err += delta.x;
            cell.y += step.y;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const SQUARE: Vec2 = Vec2::new(16.0, 16.0);

    #[fixture]
    fn index() -> CellIndex {
        let mut index = CellIndex::new(16.0);
        index.add(Body::new(EntityId(1), Tag::Player, Vec2::new(8.0, 8.0), SQUARE));
        index.add(Body::new(EntityId(2), Tag::Wall, Vec2::new(40.0, 8.0), SQUARE));
        index
    }

    #[rstest]
    fn check_reports_blocking_bodies(index: CellIndex) {
        assert_eq!(index.check(EntityId(1), 0.0, 0.0, &[Tag::Wall]), None);
        assert_eq!(
            index.check(EntityId(1), 20.0, 0.0, &[Tag::Wall]),
            Some(vec![EntityId(2)])
        );
        assert_eq!(index.check(EntityId(1), 20.0, 0.0, &[Tag::Mob]), None);
    }

    #[rstest]
    fn move_updates_overlap(mut index: CellIndex) {
        assert!(!index.overlaps(EntityId(1), EntityId(2)));
        index.move_to(EntityId(1), Vec2::new(36.0, 8.0));
        assert!(index.overlaps(EntityId(1), EntityId(2)));
        assert_eq!(index.position(EntityId(1)), Some(Vec2::new(36.0, 8.0)));
    }

    #[rstest]
    fn removed_bodies_disappear_from_queries(mut index: CellIndex) {
        assert!(index.remove(EntityId(2)).is_some());
        assert_eq!(index.check(EntityId(1), 20.0, 0.0, &[Tag::Wall]), None);
        assert!(index.cells_in_line(Vec2::ZERO, Vec2::new(60.0, 0.0))
            .iter()
            .all(|cell| cell.iter().all(|(id, _)| *id != EntityId(2))));
        assert_eq!(index.len(), 1);
    }

    #[rstest]
    #[case(Vec2::new(0.0, 8.0), Vec2::new(64.0, 8.0), Some(0.5))]
    #[case(Vec2::new(40.0, 8.0), Vec2::new(64.0, 8.0), Some(0.0))]
    #[case(Vec2::new(64.0, 8.0), Vec2::new(128.0, 8.0), None)]
    #[case(Vec2::new(0.0, 40.0), Vec2::new(64.0, 40.0), None)]
    fn segment_entry_measures_from_the_start(
        #[case] from: Vec2,
        #[case] to: Vec2,
        #[case] expected: Option<f32>,
    ) {
        let wall = Body::new(EntityId(2), Tag::Wall, Vec2::new(40.0, 8.0), SQUARE);
        assert_eq!(wall.segment_entry(from, to), expected);
    }

    #[rstest]
    fn line_skips_bodies_behind_the_start() {
        let mut index = CellIndex::new(16.0);
        index.add(Body::new(EntityId(1), Tag::Mob, Vec2::new(18.0, 8.0), SQUARE));
        index.add(Body::new(EntityId(2), Tag::Mob, Vec2::new(100.0, 8.0), SQUARE));
        let listed: Vec<EntityId> = index
            .cells_in_line(Vec2::new(30.0, 8.0), Vec2::new(350.0, 8.0))
            .into_iter()
            .flatten()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(listed, vec![EntityId(2)]);
    }

    #[rstest]
    fn line_lists_each_body_once_nearest_first() {
        let mut index = CellIndex::new(16.0);
        index.add(Body::new(EntityId(1), Tag::Mob, Vec2::new(60.0, 8.0), SQUARE * 4.0));
        index.add(Body::new(EntityId(2), Tag::Mob, Vec2::new(28.0, 8.0), Vec2::splat(4.0)));
        let listed: Vec<EntityId> = index
            .cells_in_line(Vec2::new(0.0, 8.0), Vec2::new(200.0, 8.0))
            .into_iter()
            .flatten()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(listed, vec![EntityId(2), EntityId(1)]);
    }

    #[rstest]
    fn line_cells_are_ordered_from_the_origin() {
        let cells = line_cells(IVec2::ZERO, IVec2::new(3, 1));
        assert_eq!(cells.first(), Some(&IVec2::ZERO));
        assert_eq!(cells.last(), Some(&IVec2::new(3, 1)));
        assert_eq!(cells.len(), 4);
    }

    #[rstest]
    fn checkpoint_tags_match_by_category() {
        assert!(Tag::Checkpoint(3).matches(Tag::Checkpoint(0)));
        assert!(!Tag::Checkpoint(3).matches(Tag::End));
    }
}
