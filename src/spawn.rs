//! Spawn points and the zombie population they own.
//!
//! Each [`SpawnPoint`] spawns its initial burst when the level loads. A
//! continuous point queues one replacement per owned agent that is removed
//! and spawns the queue on the next [`SpawnRegistry::tick`]. Agents refer back
//! to their spawn point by [`SpawnPointId`] only; the registry owns the
//! bookkeeping.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use hashbrown::HashSet;
use log::{debug, info};

use crate::agent::{Boss, Removal, Zombie, ZombieBehaviour, ZombieKind};
use crate::config::SimConfig;
use crate::entity::{EntityId, EntityIds};
use crate::spatial::SpatialIndex;

/// Live zombies keyed by id. Ordered so updates run deterministically.
pub type Horde = BTreeMap<EntityId, Box<dyn ZombieBehaviour>>;

/// Index of a spawn point in its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnPointId(pub usize);

impl fmt::Display for SpawnPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spawn-{}", self.0)
    }
}

/// Authored description of a spawn source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSpec {
    /// Where agents appear.
    pub position: Vec2,
    /// Archetype of every agent spawned here.
    pub kind: ZombieKind,
    /// Agents spawned on level load.
    pub initial_count: u32,
    /// Replace each removed agent.
    pub continuous: bool,
}

/// A spawn source and the agents it currently owns.
#[derive(Debug, Clone)]
pub struct SpawnPoint {
    id: SpawnPointId,
    spec: SpawnSpec,
    alive: HashSet<EntityId>,
    pending: u32,
}

impl SpawnPoint {
    /// Registry index.
    #[must_use]
    pub const fn id(&self) -> SpawnPointId {
        self.id
    }

    /// Spawn location.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.spec.position
    }

    /// Archetype spawned here.
    #[must_use]
    pub const fn kind(&self) -> ZombieKind {
        self.spec.kind
    }

    /// Whether removed agents are replaced.
    #[must_use]
    pub const fn is_continuous(&self) -> bool {
        self.spec.continuous
    }

    /// Number of agents currently owned.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    /// Whether `agent` belongs to this point.
    #[must_use]
    pub fn owns(&self, agent: EntityId) -> bool {
        self.alive.contains(&agent)
    }

    /// Replacements queued for the next tick.
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.pending
    }
}

/// Mutable world state a spawn needs.
pub struct SpawnContext<'a> {
    /// Id allocator shared with the rest of the session.
    pub ids: &'a mut EntityIds,
    /// Per-variant stats.
    pub config: &'a SimConfig,
    /// Receives the new agent's body.
    pub index: &'a mut dyn SpatialIndex,
    /// Receives the new agent.
    pub horde: &'a mut Horde,
}

/// Builds the behaviour for `kind`: the boss for [`ZombieKind::Big`], a plain
/// zombie otherwise. The body is added to the index.
pub fn spawn_agent(
    ctx: &mut SpawnContext<'_>,
    spawn_point: SpawnPointId,
    kind: ZombieKind,
    position: Vec2,
) -> EntityId {
    let id = ctx.ids.next_id();
    let stats = ctx.config.zombies.stats(kind);
    let agent: Box<dyn ZombieBehaviour> = match kind {
        ZombieKind::Big => {
            let boss = Boss::new(id, spawn_point, position, stats);
            ctx.index.add(boss.body());
            Box::new(boss)
        }
        ZombieKind::Normal | ZombieKind::Sprinter | ZombieKind::Crawler => {
            let zombie = Zombie::new(id, spawn_point, kind, position, stats);
            ctx.index.add(zombie.body());
            Box::new(zombie)
        }
    };
    ctx.horde.insert(id, agent);
    debug!("{spawn_point} spawned {kind:?} {id} at {position}");
    id
}

/// All spawn points of a level.
#[derive(Debug, Clone, Default)]
pub struct SpawnRegistry {
    points: Vec<SpawnPoint>,
}

impl SpawnRegistry {
    /// Registry of `specs`, numbered in order. Nothing is spawned yet.
    #[must_use]
    pub fn new(specs: impl IntoIterator<Item = SpawnSpec>) -> Self {
        let points = specs
            .into_iter()
            .enumerate()
            .map(|(n, spec)| SpawnPoint {
                id: SpawnPointId(n),
                spec,
                alive: HashSet::new(),
                pending: 0,
            })
            .collect();
        Self { points }
    }

    /// Spawn points in registry order.
    #[must_use]
    pub fn points(&self) -> &[SpawnPoint] {
        &self.points
    }

    /// Looks up a spawn point.
    #[must_use]
    pub fn get(&self, id: SpawnPointId) -> Option<&SpawnPoint> {
        self.points.get(id.0)
    }

    /// Agents owned across all points.
    #[must_use]
    pub fn alive_total(&self) -> usize {
        self.points.iter().map(SpawnPoint::alive_count).sum()
    }

    /// Spawns every point's initial burst. Returns the number spawned.
    pub fn populate(&mut self, ctx: &mut SpawnContext<'_>) -> usize {
        let mut spawned = 0;
        for point in &mut self.points {
            for _ in 0..point.spec.initial_count {
                let id = spawn_agent(ctx, point.id, point.spec.kind, point.spec.position);
                point.alive.insert(id);
                spawned += 1;
            }
        }
        info!("spawned {spawned} zombies from {} spawn points", self.points.len());
        spawned
    }

    /// Prunes a removed agent from its owner and queues a replacement if the
    /// owner is continuous. Returns `false` if no point owned the agent.
    pub fn notify_removed(&mut self, removal: Removal) -> bool {
        let Some(point) = self.points.get_mut(removal.spawn_point.0) else {
            return false;
        };
        if !point.alive.remove(&removal.agent) {
            return false;
        }
        if point.spec.continuous {
            point.pending += 1;
        }
        debug!("{} lost {}", point.id, removal.agent);
        true
    }

    /// Spawns exactly one replacement per queued removal. Returns the number
    /// spawned.
    pub fn tick(&mut self, ctx: &mut SpawnContext<'_>) -> usize {
        let mut spawned = 0;
        for point in &mut self.points {
            for _ in 0..std::mem::take(&mut point.pending) {
                let id = spawn_agent(ctx, point.id, point.spec.kind, point.spec.position);
                point.alive.insert(id);
                spawned += 1;
            }
        }
        spawned
    }
}
