//! Villains in play.

use serde::{Deserialize, Serialize};

use super::definition::{Card, CardId};
use crate::core::{EntityId, PlayerId};
use crate::effects::Effect;

/// A villain on the board with its accumulated damage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Villain {
    pub entity_id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub health: i64,
    /// Never exceeds `health`.
    pub damage: i64,
    pub ability_locked: bool,
    /// Hero whose effect locked the ability; unlocked at the end of their turn.
    pub locked_by: Option<PlayerId>,
    /// Resolved against the active hero every VILLAINS phase.
    pub effects: Vec<Effect>,
    pub reward: Vec<Effect>,
}

impl Villain {
    /// Build the runtime villain for a card, or `None` if it is not a villain.
    #[must_use]
    pub fn from_card(entity_id: EntityId, card: &Card) -> Option<Self> {
        let spec = card.as_villain()?;
        Some(Self {
            entity_id,
            card_id: card.id,
            name: card.name.clone(),
            health: spec.health,
            damage: 0,
            ability_locked: false,
            locked_by: None,
            effects: card.effects.clone(),
            reward: spec.reward.clone(),
        })
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.damage < self.health
    }

    #[must_use]
    pub fn remaining_health(&self) -> i64 {
        (self.health - self.damage).max(0)
    }

    /// Add damage, clamped at health. Returns the damage actually dealt.
    pub fn apply_damage(&mut self, amount: i64) -> i64 {
        let dealt = amount.clamp(0, self.remaining_health());
        self.damage += dealt;
        dealt
    }

    pub fn lock(&mut self, by: PlayerId) {
        self.ability_locked = true;
        self.locked_by = Some(by);
    }

    pub fn unlock(&mut self) {
        self.ability_locked = false;
        self.locked_by = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn villain(health: i64) -> Villain {
        Villain::from_card(EntityId(1), &Card::villain(CardId::new(1), "Bully", health)).unwrap()
    }

    #[test]
    fn test_damage_clamps_at_health() {
        let mut v = villain(5);
        assert_eq!(v.apply_damage(3), 3);
        assert_eq!(v.apply_damage(4), 2);
        assert_eq!(v.damage, 5);
        assert!(!v.is_alive());
        assert_eq!(v.apply_damage(1), 0);
    }

    #[test]
    fn test_negative_damage_ignored() {
        let mut v = villain(5);
        assert_eq!(v.apply_damage(-2), 0);
        assert_eq!(v.damage, 0);
    }

    #[test]
    fn test_lock_records_player() {
        let mut v = villain(5);
        v.lock(PlayerId::new(1));
        assert!(v.ability_locked);
        assert_eq!(v.locked_by, Some(PlayerId::new(1)));
        v.unlock();
        assert!(!v.ability_locked);
        assert_eq!(v.locked_by, None);
    }

    #[test]
    fn test_non_villain_card() {
        let card = Card::location(CardId::new(2), "Hall", 4);
        assert!(Villain::from_card(EntityId(2), &card).is_none());
    }
}
