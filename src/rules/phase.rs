//! Turn phases and the transition table.

use serde::{Deserialize, Serialize};

use crate::core::Subsystems;

/// One step of a hero's turn.
///
/// Optional phases exist only when their subsystem is enabled:
///
/// ```
/// use coop_deck_engine::core::Subsystems;
/// use coop_deck_engine::rules::TurnPhase;
///
/// let plain = Subsystems::default();
/// assert_eq!(TurnPhase::Villains.next(&plain), Some(TurnPhase::PlayCards));
///
/// let full = Subsystems::all();
/// assert_eq!(TurnPhase::Villains.next(&full), Some(TurnPhase::MagicalObject));
/// assert_eq!(TurnPhase::EndTurn.next(&full), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnPhase {
    DarkEvent,
    Villains,
    MagicalObject,
    PlayCards,
    GatherIngredients,
    Attack,
    BuyCards,
    EndTurn,
}

impl TurnPhase {
    /// The phase after this one, or `None` after END_TURN.
    #[must_use]
    pub const fn next(self, subsystems: &Subsystems) -> Option<TurnPhase> {
        match self {
            TurnPhase::DarkEvent => Some(TurnPhase::Villains),
            TurnPhase::Villains if subsystems.magical_objects => Some(TurnPhase::MagicalObject),
            TurnPhase::Villains | TurnPhase::MagicalObject => Some(TurnPhase::PlayCards),
            TurnPhase::PlayCards if subsystems.potions => Some(TurnPhase::GatherIngredients),
            TurnPhase::PlayCards | TurnPhase::GatherIngredients => Some(TurnPhase::Attack),
            TurnPhase::Attack => Some(TurnPhase::BuyCards),
            TurnPhase::BuyCards => Some(TurnPhase::EndTurn),
            TurnPhase::EndTurn => None,
        }
    }

    /// Phases that do their work on entry rather than waiting for actions.
    #[must_use]
    pub const fn is_automatic(self) -> bool {
        matches!(
            self,
            TurnPhase::DarkEvent
                | TurnPhase::Villains
                | TurnPhase::MagicalObject
                | TurnPhase::EndTurn
        )
    }

    /// Position within a turn.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            TurnPhase::DarkEvent => 0,
            TurnPhase::Villains => 1,
            TurnPhase::MagicalObject => 2,
            TurnPhase::PlayCards => 3,
            TurnPhase::GatherIngredients => 4,
            TurnPhase::Attack => 5,
            TurnPhase::BuyCards => 6,
            TurnPhase::EndTurn => 7,
        }
    }

    /// Every phase of one turn, in order.
    #[must_use]
    pub fn sequence(subsystems: &Subsystems) -> Vec<TurnPhase> {
        let mut phases = vec![TurnPhase::DarkEvent];
        let mut phase = TurnPhase::DarkEvent;
        while let Some(next) = phase.next(subsystems) {
            phases.push(next);
            phase = next;
        }
        phases
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnPhase::DarkEvent => "DARK_EVENT",
            TurnPhase::Villains => "VILLAINS",
            TurnPhase::MagicalObject => "MAGICAL_OBJECT",
            TurnPhase::PlayCards => "PLAY_CARDS",
            TurnPhase::GatherIngredients => "GATHER_INGREDIENTS",
            TurnPhase::Attack => "ATTACK",
            TurnPhase::BuyCards => "BUY_CARDS",
            TurnPhase::EndTurn => "END_TURN",
        };
        f.write_str(name)
    }
}
