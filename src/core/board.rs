//! Shared board areas: villains, the location track, the market and the
//! dark-event deck.
//!
//! Decks are stacks with the next card at the end of the vec.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::rng::GameRng;
use crate::cards::{CardId, Location, Villain};

/// Villains in play, the villain deck and the defeated pile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillainBoard {
    pub active: Vec<Villain>,
    pub deck: Vec<EntityId>,
    pub defeated: Vec<Villain>,
}

impl VillainBoard {
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&Villain> {
        self.active.iter().find(|v| v.entity_id == entity)
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut Villain> {
        self.active.iter_mut().find(|v| v.entity_id == entity)
    }

    /// True if `entity` is a villain in play with its ability locked.
    #[must_use]
    pub fn is_locked(&self, entity: EntityId) -> bool {
        self.get(entity).is_some_and(|v| v.ability_locked)
    }

    /// Ids of villains in play, in slot order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.active.iter().map(|v| v.entity_id).collect()
    }

    /// Move a villain from play to the defeated pile.
    pub fn defeat(&mut self, entity: EntityId) -> Option<&Villain> {
        let pos = self.active.iter().position(|v| v.entity_id == entity)?;
        let villain = self.active.remove(pos);
        self.defeated.push(villain);
        self.defeated.last()
    }

    /// Definitions of every defeated villain.
    #[must_use]
    pub fn defeated_cards(&self) -> Vec<CardId> {
        self.defeated.iter().map(|v| v.card_id).collect()
    }

    /// No villain in play and none left to come.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.active.is_empty() && self.deck.is_empty()
    }
}

/// Ordered locations; the first one not yet passed is current.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTrack {
    pub locations: Vec<Location>,
    pub current: usize,
}

impl LocationTrack {
    #[must_use]
    pub fn current(&self) -> Option<&Location> {
        self.locations.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Location> {
        self.locations.get_mut(self.current)
    }

    /// Move to the next location, if there is one.
    pub fn advance(&mut self) -> Option<&Location> {
        if self.current + 1 >= self.locations.len() {
            return None;
        }
        self.current += 1;
        self.locations.get(self.current)
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.current + 1 >= self.locations.len()
    }
}

/// Face-up market row and the deck refilling it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub row: Vec<EntityId>,
    pub deck: Vec<EntityId>,
}

impl Market {
    /// Remove a card from the row. Returns false if it is not there.
    pub fn take(&mut self, card: EntityId) -> bool {
        match self.row.iter().position(|&c| c == card) {
            Some(pos) => {
                self.row.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Refill the row up to `size`; returns the cards added.
    pub fn refill(&mut self, size: usize) -> Vec<EntityId> {
        let mut added = Vec::new();
        while self.row.len() < size {
            let Some(card) = self.deck.pop() else { break };
            self.row.push(card);
            added.push(card);
        }
        added
    }
}

/// Dark-event deck with its own shuffle stream.
#[derive(Clone, Debug)]
pub struct DarkEventDeck {
    pub deck: Vec<EntityId>,
    pub discard: Vec<EntityId>,
    rng: GameRng,
}

impl DarkEventDeck {
    #[must_use]
    pub fn new(mut deck: Vec<EntityId>, mut rng: GameRng) -> Self {
        rng.shuffle(&mut deck);
        Self {
            deck,
            discard: Vec::new(),
            rng,
        }
    }

    /// Draw the next event, reshuffling the discard pile when the deck runs out.
    pub fn draw(&mut self) -> Option<EntityId> {
        if self.deck.is_empty() && !self.discard.is_empty() {
            self.deck = std::mem::take(&mut self.discard);
            self.rng.shuffle(&mut self.deck);
        }
        self.deck.pop()
    }

    pub fn discard(&mut self, event: EntityId) {
        self.discard.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_refill_stops_when_deck_empty() {
        let mut market = Market {
            row: vec![EntityId(1)],
            deck: vec![EntityId(2), EntityId(3)],
        };

        assert_eq!(market.refill(4), vec![EntityId(3), EntityId(2)]);
        assert_eq!(market.row.len(), 3);
        assert!(market.take(EntityId(2)));
        assert!(!market.take(EntityId(2)));
    }

    #[test]
    fn test_dark_event_deck_recycles_discard() {
        let mut events = DarkEventDeck::new(vec![EntityId(1)], GameRng::new(3));

        let first = events.draw().unwrap();
        assert!(events.draw().is_none());

        events.discard(first);
        assert_eq!(events.draw(), Some(first));
    }

    #[test]
    fn test_location_track_advance() {
        let mut track = LocationTrack::default();
        assert!(track.current().is_none());
        assert!(track.advance().is_none());
        assert!(track.is_final());
    }
}
