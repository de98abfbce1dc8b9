//! Card instances - one physical copy of a card in a game.
//!
//! Every copy gets its own `EntityId`, so two copies of the same ally are
//! distinct sources for triggers and lasting effects.
//!
//! ## Neutral Cards
//!
//! Cards can have no owner: the market, villains, locations, dark events and
//! other board cards belong to nobody until a hero acquires them.

use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    pub entity_id: EntityId,

    /// Reference to the card definition.
    pub card_id: CardId,

    /// `None` for neutral cards.
    pub owner: Option<PlayerId>,
}

impl CardInstance {
    /// Create a card instance with an owner.
    #[must_use]
    pub fn new(entity_id: EntityId, card_id: CardId, owner: PlayerId) -> Self {
        Self {
            entity_id,
            card_id,
            owner: Some(owner),
        }
    }

    /// Create a neutral card instance.
    #[must_use]
    pub fn neutral(entity_id: EntityId, card_id: CardId) -> Self {
        Self {
            entity_id,
            card_id,
            owner: None,
        }
    }

    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.owner.is_none()
    }
}
