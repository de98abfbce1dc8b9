//! Magical objects destroyed by assigning tokens.

use serde::{Deserialize, Serialize};

use super::definition::{Card, CardId};
use crate::core::{EntityId, Multiset};
use crate::effects::Effect;

/// A token that can be assigned to a magical object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectToken {
    Attack,
    Influence,
    Health,
    Card,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicalObject {
    pub entity_id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub required: Multiset<ObjectToken>,
    pub assigned: Multiset<ObjectToken>,
    /// Resolved against the active hero every MAGICAL_OBJECT phase.
    pub effects: Vec<Effect>,
}

impl MagicalObject {
    #[must_use]
    pub fn from_card(entity_id: EntityId, card: &Card) -> Option<Self> {
        let spec = card.as_magical_object()?;
        Some(Self {
            entity_id,
            card_id: card.id,
            name: card.name.clone(),
            required: spec.required.clone(),
            assigned: Multiset::new(),
            effects: card.effects.clone(),
        })
    }

    /// True while another `token` still counts toward destruction.
    #[must_use]
    pub fn accepts(&self, token: ObjectToken) -> bool {
        !self.is_destroyed() && self.assigned.count(&token) < self.required.count(&token)
    }

    /// Assign one token. Returns false if the object does not need it.
    pub fn assign(&mut self, token: ObjectToken) -> bool {
        if !self.accepts(token) {
            return false;
        }
        self.assigned.add(token, 1);
        true
    }

    /// Destroyed once the assigned tokens cover the requirement.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.assigned.contains_all(&self.required)
    }

    /// Tokens still needed.
    #[must_use]
    pub fn outstanding(&self) -> Multiset<ObjectToken> {
        self.assigned.missing_from(&self.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardClass, CardKind, MagicalObjectSpec};

    fn object() -> MagicalObject {
        let card = Card::new(CardId::new(1), "Locket", CardClass::MagicalObject).with_kind(
            CardKind::MagicalObject(MagicalObjectSpec {
                required: Multiset::new()
                    .with(ObjectToken::Attack, 2)
                    .with(ObjectToken::Card, 1),
            }),
        );
        MagicalObject::from_card(EntityId(7), &card).unwrap()
    }

    #[test]
    fn test_destroyed_when_all_tokens_assigned() {
        let mut obj = object();
        assert!(obj.assign(ObjectToken::Attack));
        assert!(obj.assign(ObjectToken::Attack));
        assert!(!obj.is_destroyed());
        assert_eq!(obj.outstanding(), Multiset::new().with(ObjectToken::Card, 1));

        assert!(obj.assign(ObjectToken::Card));
        assert!(obj.is_destroyed());
    }

    #[test]
    fn test_rejects_unneeded_tokens() {
        let mut obj = object();
        assert!(!obj.assign(ObjectToken::Influence));
        obj.assign(ObjectToken::Attack);
        obj.assign(ObjectToken::Attack);
        assert!(!obj.assign(ObjectToken::Attack));
        assert_eq!(obj.assigned.count(&ObjectToken::Attack), 2);
    }
}
