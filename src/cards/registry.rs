//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores every card definition the loader supplied for
//! a game. It provides fast lookup by `CardId` and supports iteration.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardClass, CardId};
use crate::core::error::{EngineError, Result};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use coop_deck_engine::cards::{Card, CardClass, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(Card::new(CardId::new(1), "Old Broom", CardClass::Item)).unwrap();
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Old Broom");
/// assert!(registry.lookup(CardId::new(2)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Card>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from loaded cards.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Result<Self> {
        let mut registry = Self::new();
        for card in cards {
            registry.register(card)?;
        }
        Ok(registry)
    }

    /// Register a card definition. Ids must be unique.
    pub fn register(&mut self, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(EngineError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Get a card definition by ID, as an error if missing.
    pub fn lookup(&self, id: CardId) -> Result<&Card> {
        self.cards.get(&id).ok_or(EngineError::UnknownCard(id))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Find cards of one class.
    pub fn find_by_class(&self, class: CardClass) -> impl Iterator<Item = &Card> {
        self.cards.values().filter(move |c| c.class == class)
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &Card>
    where
        F: Fn(&Card) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }
}
