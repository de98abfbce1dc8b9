//! Curse potions kept face-up in front of a hero.

use serde::{Deserialize, Serialize};

use super::definition::{Card, CardClass, CardId};
use crate::core::{EntityId, PlayerId};
use crate::effects::Effect;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurseInPlay {
    pub entity_id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub owner: PlayerId,
    pub ongoing_effects: Vec<Effect>,
    pub block_allies: bool,
    pub block_spells: bool,
    pub block_items: bool,
}

impl CurseInPlay {
    /// Build the in-play curse, or `None` if the card has no ongoing effects.
    #[must_use]
    pub fn from_card(entity_id: EntityId, card: &Card, owner: PlayerId) -> Option<Self> {
        let spec = card.as_curse()?;
        if spec.ongoing_effects.is_empty() {
            return None;
        }
        Some(Self {
            entity_id,
            card_id: card.id,
            name: card.name.clone(),
            owner,
            ongoing_effects: spec.ongoing_effects.clone(),
            block_allies: spec.block_allies,
            block_spells: spec.block_spells,
            block_items: spec.block_items,
        })
    }

    /// Whether this curse forbids playing cards of `class`.
    #[must_use]
    pub fn blocks(&self, class: CardClass) -> bool {
        match class {
            CardClass::Ally => self.block_allies,
            CardClass::Spell => self.block_spells,
            CardClass::Item => self.block_items,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKind, CurseSpec};
    use crate::effects::EffectKind;

    #[test]
    fn test_curse_without_ongoing_effects_is_not_kept() {
        let card = Card::new(CardId::new(1), "Fizzle", CardClass::CursePotion)
            .with_kind(CardKind::OngoingCurse(CurseSpec::default()));
        assert!(CurseInPlay::from_card(EntityId(1), &card, PlayerId::new(0)).is_none());
    }

    #[test]
    fn test_blocks_by_class() {
        let card = Card::new(CardId::new(2), "Stupor", CardClass::CursePotion).with_kind(
            CardKind::OngoingCurse(CurseSpec {
                ongoing_effects: vec![Effect::of(EffectKind::LoseHealth, 1)],
                block_items: true,
                ..CurseSpec::default()
            }),
        );
        let curse = CurseInPlay::from_card(EntityId(2), &card, PlayerId::new(1)).unwrap();

        assert!(curse.blocks(CardClass::Item));
        assert!(!curse.blocks(CardClass::Ally));
        assert!(!curse.blocks(CardClass::Villain));
    }
}
