//! Story-objective tracking and per-turn counters.
//!
//! The tracker owns the `TurnCounters` that every subsystem reads: objective
//! conditions compare against them, and potion-shelf slots unlock from them.
//! Counters are zeroed once per turn boundary.
//!
//! Objectives are worked through in (pack, order) sequence. Only the first
//! incomplete one is active; once it completes the caller applies its reward
//! and calls `advance`.

use serde::{Deserialize, Serialize};

use crate::cards::{CardClass, CardId, ObjectiveCondition, StoryObjective};

/// Counters of what happened this turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCounters {
    pub cards_played: u32,
    pub allies_played: u32,
    pub spells_played: u32,
    pub items_played: u32,
    pub potions_played: u32,
    pub influence_gained: i64,
    pub attack_gained: i64,
    pub attack_assigned: i64,
    pub dark_events_resolved: u32,
    pub discards: u32,
    pub heroes_stunned: u32,
    pub other_heroes_healed: u32,
    /// Highest cost among cards acquired this turn.
    pub max_acquired_cost: i64,
    pub villains_defeated: u32,
    pub potions_brewed: u32,
}

impl TurnCounters {
    /// Count a played card under its class.
    pub fn record_card_played(&mut self, class: CardClass) {
        self.cards_played += 1;
        match class {
            CardClass::Ally => self.allies_played += 1,
            CardClass::Spell => self.spells_played += 1,
            CardClass::Item => self.items_played += 1,
            CardClass::Potion => self.potions_played += 1,
            _ => {}
        }
    }

    pub fn record_acquired(&mut self, cost: i64) {
        self.max_acquired_cost = self.max_acquired_cost.max(cost);
    }

    /// Value of the counter a condition reads. `None` for conditions that are
    /// not counter based.
    #[must_use]
    pub fn value_for(&self, condition: ObjectiveCondition) -> Option<i64> {
        let value = match condition {
            ObjectiveCondition::CardsPlayed => i64::from(self.cards_played),
            ObjectiveCondition::AlliesPlayed => i64::from(self.allies_played),
            ObjectiveCondition::SpellsPlayed => i64::from(self.spells_played),
            ObjectiveCondition::ItemsPlayed => i64::from(self.items_played),
            ObjectiveCondition::InfluenceGained => self.influence_gained,
            ObjectiveCondition::AttackGained => self.attack_gained,
            ObjectiveCondition::AttackAssigned => self.attack_assigned,
            ObjectiveCondition::DarkEventsResolved => i64::from(self.dark_events_resolved),
            ObjectiveCondition::VillainsDefeated => i64::from(self.villains_defeated),
            ObjectiveCondition::PotionsBrewed => i64::from(self.potions_brewed),
            ObjectiveCondition::DefeatAssociatedVillains => return None,
        };
        Some(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveTracker {
    counters: TurnCounters,
    objectives: Vec<StoryObjective>,
    current: usize,
}

impl ObjectiveTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the objective list, sorted by (pack, order).
    pub fn set_objectives(&mut self, mut objectives: Vec<StoryObjective>) {
        objectives.sort_by_key(|o| (o.pack, o.order));
        self.objectives = objectives;
        self.current = 0;
    }

    #[must_use]
    pub fn counters(&self) -> &TurnCounters {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut TurnCounters {
        &mut self.counters
    }

    /// The objective currently being worked on.
    #[must_use]
    pub fn active(&self) -> Option<&StoryObjective> {
        self.objectives.get(self.current)
    }

    #[must_use]
    pub fn objectives(&self) -> &[StoryObjective] {
        &self.objectives
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.objectives.iter().filter(|o| o.completed).count()
    }

    /// Every objective is complete (vacuously true with none).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current >= self.objectives.len()
    }

    /// Check the active objective against the counters.
    ///
    /// Returns true only on the call that completes it; an already completed
    /// objective returns false, so the reward is applied exactly once.
    pub fn verify_completion(&mut self, defeated: &[CardId]) -> bool {
        let counters = &self.counters;
        let Some(objective) = self.objectives.get_mut(self.current) else {
            return false;
        };
        if objective.completed {
            return false;
        }
        let met = match counters.value_for(objective.condition) {
            Some(value) => value >= objective.required_value,
            None => objective.villains.iter().all(|v| defeated.contains(v)),
        };
        if met {
            objective.completed = true;
        }
        met
    }

    /// Move past a completed objective. Returns the next one, if any.
    pub fn advance(&mut self) -> Option<&StoryObjective> {
        if self.active().is_some_and(|o| o.completed) {
            self.current += 1;
        }
        self.active()
    }

    /// Zero every per-turn counter.
    pub fn reset_counters(&mut self) {
        self.counters = TurnCounters::default();
    }
}
