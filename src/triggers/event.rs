//! Events that can fire triggers.

use serde::{Deserialize, Serialize};

use crate::cards::CardClass;

/// The event a trigger listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    /// The owning card was discarded by an effect.
    AutoDiscard,
    CardPlayed,
    AllyPlayed,
    SpellPlayed,
    ItemPlayed,
    PotionPlayed,
    CardDrawn,
    CardAcquired,
    HeroHealed,
    HeroDamaged,
    HeroStunned,
    AttackGained,
    InfluenceGained,
    VillainDamaged,
    VillainDefeated,
    LocationMarkAdded,
    LocationMarkRemoved,
    LocationRevealed,
    DarkEventRevealed,
    TurnStart,
    TurnEnd,
    IngredientGathered,
    PotionBrewed,
    PotionBanished,
    ObjectTokenAssigned,
    MagicalObjectDestroyed,
    ObjectiveCompleted,
    CurseDrawn,
    /// Loader fallback for unknown tags. Never fired.
    #[serde(other)]
    Unhandled,
}

impl TriggerKind {
    /// The class-specific trigger fired alongside `CARD_PLAYED`.
    #[must_use]
    pub const fn played(class: CardClass) -> Option<TriggerKind> {
        match class {
            CardClass::Ally => Some(TriggerKind::AllyPlayed),
            CardClass::Spell => Some(TriggerKind::SpellPlayed),
            CardClass::Item => Some(TriggerKind::ItemPlayed),
            CardClass::Potion => Some(TriggerKind::PotionPlayed),
            CardClass::Villain
            | CardClass::Location
            | CardClass::DarkEvent
            | CardClass::MagicalObject
            | CardClass::StoryObjective
            | CardClass::CursePotion => None,
        }
    }

    /// Triggers that are live while their card is still in hand.
    #[must_use]
    pub const fn active_in_hand(self) -> bool {
        matches!(self, TriggerKind::AutoDiscard)
    }
}
