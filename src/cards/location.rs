//! Locations and their mark track.

use serde::{Deserialize, Serialize};

use super::definition::{Card, CardId};
use crate::core::EntityId;
use crate::effects::Effect;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub entity_id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub marks: u32,
    pub mark_threshold: u32,
    pub entry_effects: Vec<Effect>,
}

impl Location {
    #[must_use]
    pub fn from_card(entity_id: EntityId, card: &Card) -> Option<Self> {
        let spec = card.as_location()?;
        Some(Self {
            entity_id,
            card_id: card.id,
            name: card.name.clone(),
            marks: 0,
            mark_threshold: spec.mark_threshold,
            entry_effects: spec.entry_effects.clone(),
        })
    }

    /// Add marks. Returns true if this call reached the threshold.
    ///
    /// Marks may exceed the threshold; the caller decides what a full
    /// location means.
    pub fn add_marks(&mut self, count: u32) -> bool {
        let was_full = self.is_full();
        self.marks = self.marks.saturating_add(count);
        !was_full && self.is_full()
    }

    /// Remove up to `count` marks. Returns the number removed.
    pub fn remove_marks(&mut self, count: u32) -> u32 {
        let removed = count.min(self.marks);
        self.marks -= removed;
        removed
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.marks >= self.mark_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_crossing_reported_once() {
        let hall = Card::location(CardId::new(1), "Hall", 3);
        let mut loc = Location::from_card(EntityId(1), &hall).unwrap();

        assert!(!loc.add_marks(2));
        assert!(loc.add_marks(1));
        assert!(!loc.add_marks(1));
        assert_eq!(loc.marks, 4);
    }

    #[test]
    fn test_remove_marks_floors_at_zero() {
        let hall = Card::location(CardId::new(1), "Hall", 3);
        let mut loc = Location::from_card(EntityId(1), &hall).unwrap();
        loc.add_marks(1);
        assert_eq!(loc.remove_marks(5), 1);
        assert_eq!(loc.marks, 0);
    }
}
