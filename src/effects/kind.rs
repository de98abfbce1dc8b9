//! Closed set of effect kinds the engine interprets.
//!
//! Kinds deserialize from SCREAMING_SNAKE_CASE tags. Any tag the engine does
//! not know becomes `EffectKind::Unhandled`, which the dispatcher logs and
//! ignores.

use serde::{Deserialize, Serialize};

/// What an effect does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    // === Hero resources ===
    GainHealth,
    LoseHealth,
    GainAttack,
    RemoveAttack,
    GainInfluence,
    RemoveInfluence,
    StunHero,
    RestoreFullHealth,

    // === Cards ===
    DrawCards,
    DiscardCards,
    DiscardHand,
    DiscardAlly,
    DiscardItem,
    DiscardSpell,
    ReturnAllyFromDiscard,
    ReturnItemFromDiscard,
    ReturnSpellFromDiscard,
    BanishFromHand,
    BanishTriggeringCard,
    ShuffleDiscardIntoDeck,
    MillCards,

    // === Location ===
    AddLocationMarks,
    RemoveLocationMarks,

    // === Villains ===
    DamageVillain,
    HealVillains,
    LockVillainAbility,
    UnlockVillainAbility,

    // === Magical objects ===
    AssignAttackToken,
    AssignInfluenceToken,
    AssignHealthToken,
    AssignCardToken,

    // === Brewing and curses ===
    GainWildIngredient,
    GainRandomIngredient,
    LoseIngredient,
    DrawCursePotion,
    RemoveCursePotion,
    RemoveAllCursePotions,

    // === Composition ===
    Choice,
    AllOf,
    Repeat,

    // === Rule modifiers ===
    PreventHealing,
    PreventDrawing,
    PreventLocationMarks,
    LimitDamageToOne,
    AttackBonus,
    InfluenceBonus,
    AcquireToDeckTop,
    AttackLimitOnePerVillain,
    BlockAllies,
    BlockSpells,
    BlockItems,

    /// Loader fallback for unknown tags.
    #[serde(other)]
    Unhandled,
}

impl EffectKind {
    /// True for kinds that only matter while registered in the duration
    /// registry.
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            EffectKind::PreventHealing
                | EffectKind::PreventDrawing
                | EffectKind::PreventLocationMarks
                | EffectKind::LimitDamageToOne
                | EffectKind::AttackBonus
                | EffectKind::InfluenceBonus
                | EffectKind::AcquireToDeckTop
                | EffectKind::AttackLimitOnePerVillain
                | EffectKind::BlockAllies
                | EffectKind::BlockSpells
                | EffectKind::BlockItems
        )
    }

    /// True for kinds that act on a villain rather than a hero.
    #[must_use]
    pub const fn targets_villain(self) -> bool {
        matches!(
            self,
            EffectKind::DamageVillain
                | EffectKind::LockVillainAbility
                | EffectKind::UnlockVillainAbility
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_screaming_snake_case() {
        let json = serde_json::to_string(&EffectKind::ReturnAllyFromDiscard).unwrap();
        assert_eq!(json, "\"RETURN_ALLY_FROM_DISCARD\"");

        let kind: EffectKind = serde_json::from_str("\"ATTACK_LIMIT_ONE_PER_VILLAIN\"").unwrap();
        assert_eq!(kind, EffectKind::AttackLimitOnePerVillain);
    }

    #[test]
    fn test_unknown_tag_is_unhandled() {
        let kind: EffectKind = serde_json::from_str("\"SUMMON_DRAGON\"").unwrap();
        assert_eq!(kind, EffectKind::Unhandled);
    }

    #[test]
    fn test_modifier_classification() {
        assert!(EffectKind::PreventHealing.is_modifier());
        assert!(EffectKind::BlockItems.is_modifier());
        assert!(!EffectKind::GainHealth.is_modifier());
        assert!(!EffectKind::Unhandled.is_modifier());
    }
}
