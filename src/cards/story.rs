//! Story objectives.

use serde::{Deserialize, Serialize};

use super::definition::{Card, CardId};
use crate::core::EntityId;
use crate::effects::Effect;
use crate::triggers::Trigger;

/// What completes a story objective.
///
/// Counter conditions compare a per-turn counter against the objective's
/// required value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveCondition {
    CardsPlayed,
    AlliesPlayed,
    SpellsPlayed,
    ItemsPlayed,
    InfluenceGained,
    AttackGained,
    AttackAssigned,
    DarkEventsResolved,
    VillainsDefeated,
    PotionsBrewed,
    /// Every associated villain is in the defeated pile.
    DefeatAssociatedVillains,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryObjective {
    pub entity_id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub pack: u32,
    pub order: u32,
    pub villains: Vec<CardId>,
    pub continuous_effects: Vec<Effect>,
    pub triggers: Vec<Trigger>,
    pub condition: ObjectiveCondition,
    pub required_value: i64,
    pub reward: Vec<Effect>,
    pub completed: bool,
}

impl StoryObjective {
    #[must_use]
    pub fn from_card(entity_id: EntityId, card: &Card) -> Option<Self> {
        let spec = card.as_story_objective()?;
        Some(Self {
            entity_id,
            card_id: card.id,
            name: card.name.clone(),
            pack: spec.pack,
            order: spec.order,
            villains: spec.villains.clone(),
            continuous_effects: spec.continuous_effects.clone(),
            triggers: card.triggers.clone(),
            condition: spec.condition,
            required_value: spec.required_value,
            reward: spec.reward.clone(),
            completed: false,
        })
    }
}
