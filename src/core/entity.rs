//! Entity identification system.
//!
//! Every card instance that exists in a game (hero cards, market cards,
//! villains, locations, dark events, magical objects, objectives, potions,
//! curses) gets a unique `EntityId` when the game is set up.
//!
//! Two copies of the same card definition share a `CardId` but never an
//! `EntityId`, so registries keyed on `EntityId` distinguish them.
//!
//! ```
//! use coop_deck_engine::core::EntityId;
//!
//! let first = EntityId(10);
//! let second = first.next();
//!
//! assert_eq!(second, EntityId(11));
//! assert!(first < second);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one game.
///
/// Ordered so that registries can keep deterministic iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// The first id handed out by a fresh game.
    pub const FIRST: EntityId = EntityId(1);

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated right after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_sequential() {
        let id = EntityId::FIRST;
        assert_eq!(id.next(), EntityId(2));
        assert_eq!(id.next().next().raw(), 3);
    }

    #[test]
    fn test_ordering() {
        let mut ids = vec![EntityId(5), EntityId(1), EntityId(3)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(1), EntityId(3), EntityId(5)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
