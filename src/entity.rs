//! Identifiers shared by the simulation and the spatial index.
use std::fmt;

use serde::Serialize;

/// Stable identifier of anything placed in the world: player, dog, walls,
/// zombies, checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Raw numeric value.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh [`EntityId`] values, never reusing one within a session.
#[derive(Debug, Default)]
pub struct EntityIds {
    next: u64,
}

impl EntityIds {
    /// Allocates the next identifier.
    pub const fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_unique() {
        let mut ids = EntityIds::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(b.into_inner(), a.into_inner() + 1);
        assert_eq!(a.to_string(), "#0");
    }
}
