//! Per-hero card piles and movement between them.
//!
//! Each hero owns four piles:
//! - `Deck`: ordered, top = end of the vec
//! - `Hand`: in draw order
//! - `Discard`: ordered, top = end of the vec
//! - `InPlay`: cards played this turn
//!
//! Drawing from an empty deck first shuffles the discard pile into the deck,
//! one card at a time, so a draw only fails when both piles are empty.

use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;
use crate::core::rng::GameRng;

/// Position for inserting a card into an ordered pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Add to top of pile.
    Top,
    /// Add to bottom of pile.
    Bottom,
}

/// Named pile of a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Deck,
    Hand,
    Discard,
    InPlay,
}

/// The deck, hand, discard and in-play piles of one hero.
///
/// ```
/// use coop_deck_engine::core::{EntityId, GameRng};
/// use coop_deck_engine::zones::HeroZones;
///
/// let mut zones = HeroZones::with_deck(vec![EntityId(1), EntityId(2)]);
/// let mut rng = GameRng::new(1);
///
/// assert_eq!(zones.draw(&mut rng), Some(EntityId(2)));
/// assert_eq!(zones.hand(), &[EntityId(2)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroZones {
    deck: Vec<EntityId>,
    hand: Vec<EntityId>,
    discard: Vec<EntityId>,
    in_play: Vec<EntityId>,
}

impl HeroZones {
    /// Create empty piles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create piles with the given deck (last element is the top card).
    #[must_use]
    pub fn with_deck(deck: Vec<EntityId>) -> Self {
        Self {
            deck,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn deck(&self) -> &[EntityId] {
        &self.deck
    }

    #[must_use]
    pub fn hand(&self) -> &[EntityId] {
        &self.hand
    }

    #[must_use]
    pub fn discard(&self) -> &[EntityId] {
        &self.discard
    }

    #[must_use]
    pub fn in_play(&self) -> &[EntityId] {
        &self.in_play
    }

    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    #[must_use]
    pub fn discard_size(&self) -> usize {
        self.discard.len()
    }

    /// Which pile holds a card, if any.
    #[must_use]
    pub fn location(&self, entity: EntityId) -> Option<Pile> {
        [
            (Pile::Hand, &self.hand),
            (Pile::InPlay, &self.in_play),
            (Pile::Discard, &self.discard),
            (Pile::Deck, &self.deck),
        ]
        .into_iter()
        .find(|(_, pile)| pile.contains(&entity))
        .map(|(name, _)| name)
    }

    fn pile_mut(&mut self, pile: Pile) -> &mut Vec<EntityId> {
        match pile {
            Pile::Deck => &mut self.deck,
            Pile::Hand => &mut self.hand,
            Pile::Discard => &mut self.discard,
            Pile::InPlay => &mut self.in_play,
        }
    }

    /// Put a card onto a pile.
    pub fn put(&mut self, entity: EntityId, pile: Pile, position: ZonePosition) {
        let cards = self.pile_mut(pile);
        match position {
            ZonePosition::Top => cards.push(entity),
            ZonePosition::Bottom => cards.insert(0, entity),
        }
    }

    /// Remove a card from whichever pile holds it.
    pub fn remove(&mut self, entity: EntityId) -> Option<Pile> {
        let pile = self.location(entity)?;
        self.pile_mut(pile).retain(|&e| e != entity);
        Some(pile)
    }

    /// Shuffle the discard pile under the deck.
    ///
    /// Returns the number of cards moved.
    pub fn reshuffle_discard(&mut self, rng: &mut GameRng) -> usize {
        let moved = self.discard.len();
        if moved == 0 {
            return 0;
        }
        let mut cards = std::mem::take(&mut self.discard);
        rng.shuffle(&mut cards);
        // Existing deck cards stay on top.
        cards.append(&mut self.deck);
        self.deck = cards;
        moved
    }

    /// Shuffle the discard pile into the deck, then shuffle the whole deck.
    pub fn shuffle_discard_into_deck(&mut self, rng: &mut GameRng) -> usize {
        let moved = self.discard.len();
        self.deck.append(&mut self.discard);
        rng.shuffle(&mut self.deck);
        moved
    }

    /// Draw one card into hand, reshuffling the discard pile if the deck is empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<EntityId> {
        if self.deck.is_empty() {
            self.reshuffle_discard(rng);
        }
        let card = self.deck.pop()?;
        self.hand.push(card);
        Some(card)
    }

    /// Move the top card of the deck to the discard pile.
    pub fn mill(&mut self) -> Option<EntityId> {
        let card = self.deck.pop()?;
        self.discard.push(card);
        Some(card)
    }

    /// Move a card from hand to the in-play area.
    pub fn play_from_hand(&mut self, entity: EntityId) -> bool {
        if !self.take_from_hand(entity) {
            return false;
        }
        self.in_play.push(entity);
        true
    }

    /// Move a card from hand to the discard pile.
    pub fn discard_from_hand(&mut self, entity: EntityId) -> bool {
        if !self.take_from_hand(entity) {
            return false;
        }
        self.discard.push(entity);
        true
    }

    /// Remove a card from hand without placing it anywhere.
    pub fn take_from_hand(&mut self, entity: EntityId) -> bool {
        match self.hand.iter().position(|&c| c == entity) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Discard the whole hand; returns the discarded cards in hand order.
    pub fn discard_hand(&mut self) -> Vec<EntityId> {
        let cards = std::mem::take(&mut self.hand);
        self.discard.extend_from_slice(&cards);
        cards
    }

    /// Move every in-play card to the discard pile.
    pub fn clear_in_play(&mut self) -> Vec<EntityId> {
        let cards = std::mem::take(&mut self.in_play);
        self.discard.extend_from_slice(&cards);
        cards
    }

    /// Move the top-most discard card matching `pred` back into hand.
    pub fn return_from_discard(&mut self, pred: impl Fn(EntityId) -> bool) -> Option<EntityId> {
        let pos = self.discard.iter().rposition(|&c| pred(c))?;
        let card = self.discard.remove(pos);
        self.hand.push(card);
        Some(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId).collect()
    }

    #[test]
    fn test_draw_from_top() {
        let mut zones = HeroZones::with_deck(ids(&[1, 2, 3]));
        let mut rng = GameRng::new(1);

        assert_eq!(zones.draw(&mut rng), Some(EntityId(3)));
        assert_eq!(zones.deck_size(), 2);
        assert_eq!(zones.hand(), &[EntityId(3)]);
    }

    #[test]
    fn test_draw_reshuffles_discard_when_deck_empty() {
        let mut zones = HeroZones::new();
        let mut rng = GameRng::new(1);
        zones.put(EntityId(7), Pile::Discard, ZonePosition::Top);
        zones.put(EntityId(8), Pile::Discard, ZonePosition::Top);

        let drawn = zones.draw(&mut rng);

        assert!(drawn.is_some());
        assert_eq!(zones.discard_size(), 0);
        assert_eq!(zones.deck_size(), 1);
        assert_eq!(zones.hand_size(), 1);
    }

    #[test]
    fn test_draw_fails_when_everything_empty() {
        let mut zones = HeroZones::new();
        assert_eq!(zones.draw(&mut GameRng::new(1)), None);
    }

    #[test]
    fn test_play_and_clear() {
        let mut zones = HeroZones::with_deck(ids(&[1, 2]));
        let mut rng = GameRng::new(1);
        let card = zones.draw(&mut rng).unwrap();

        assert!(zones.play_from_hand(card));
        assert!(!zones.play_from_hand(card));
        assert_eq!(zones.location(card), Some(Pile::InPlay));

        assert_eq!(zones.clear_in_play(), vec![card]);
        assert_eq!(zones.location(card), Some(Pile::Discard));
    }

    #[test]
    fn test_return_from_discard_takes_topmost_match() {
        let mut zones = HeroZones::new();
        for id in [1, 2, 3] {
            zones.put(EntityId(id), Pile::Discard, ZonePosition::Top);
        }

        let back = zones.return_from_discard(|c| c.raw() % 2 == 1);

        assert_eq!(back, Some(EntityId(3)));
        assert_eq!(zones.discard(), &[EntityId(1), EntityId(2)]);
    }

    #[test]
    fn test_put_bottom_and_remove() {
        let mut zones = HeroZones::with_deck(ids(&[1]));
        zones.put(EntityId(9), Pile::Deck, ZonePosition::Bottom);
        assert_eq!(zones.deck(), &[EntityId(9), EntityId(1)]);

        assert_eq!(zones.remove(EntityId(9)), Some(Pile::Deck));
        assert_eq!(zones.remove(EntityId(9)), None);
    }
}
