//! Registry of cards currently applying a lasting effect.
//!
//! Temporary and continuous effects are not executed when played. Instead
//! their source card is recorded here under the effect kind, and the rest of
//! the engine asks the registry whether a rule modification is in force:
//!
//! ```
//! use coop_deck_engine::core::EntityId;
//! use coop_deck_engine::effects::{DurationRegistry, EffectKind};
//!
//! let mut durations = DurationRegistry::new();
//! durations.add_temporary_effect(EffectKind::PreventHealing, EntityId(4));
//! assert!(durations.is_active(EffectKind::PreventHealing));
//!
//! durations.end_of_turn();
//! assert!(!durations.is_active(EffectKind::PreventHealing));
//! ```
//!
//! A card can source several kinds at once; `remove_effect` purges all of
//! them in one call.

use im::OrdSet;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::effect::{Duration, Effect};
use super::kind::EffectKind;
use crate::core::entity::EntityId;

#[derive(Clone, Debug, Default)]
pub struct DurationRegistry {
    /// Never holds an empty set.
    active: FxHashMap<EffectKind, OrdSet<EntityId>>,
    /// Sources added through `add_temporary_effect` this turn.
    temporary: OrdSet<EntityId>,
}

impl DurationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `card` as applying `kind`. Idempotent.
    pub fn add_effect(&mut self, kind: EffectKind, card: EntityId) {
        self.active.entry(kind).or_default().insert(card);
    }

    /// Record `card` as applying `kind` until `end_of_turn`.
    pub fn add_temporary_effect(&mut self, kind: EffectKind, card: EntityId) {
        self.add_effect(kind, card);
        self.temporary.insert(card);
    }

    /// Register the lasting rule modifiers among `effects` for `source`.
    ///
    /// Used for board cards, whose other effects are resolved by their phase
    /// instead. INSTANT entries and non-modifier kinds are skipped.
    pub fn register_modifiers(&mut self, source: EntityId, effects: &[Effect]) -> usize {
        let mut registered = 0;
        for effect in effects.iter().filter(|e| e.kind.is_modifier()) {
            match effect.duration {
                Duration::Temporary => self.add_temporary_effect(effect.kind, source),
                Duration::Continuous => self.add_effect(effect.kind, source),
                Duration::Instant => continue,
            }
            registered += 1;
        }
        registered
    }

    /// Purge `card` from every kind and from the temporary set.
    pub fn remove_effect(&mut self, card: EntityId) {
        self.active.retain(|_, cards| {
            cards.remove(&card);
            !cards.is_empty()
        });
        self.temporary.remove(&card);
    }

    /// Drop `card` once it has left play.
    ///
    /// A card marked temporary keeps all of its kinds until `end_of_turn`;
    /// anything else is purged now.
    pub fn release(&mut self, card: EntityId) {
        if !self.is_temporary(card) {
            self.remove_effect(card);
        }
    }

    /// Drop every temporary source. Runs once per turn.
    pub fn end_of_turn(&mut self) {
        let expired = std::mem::take(&mut self.temporary);
        if expired.is_empty() {
            return;
        }
        debug!(count = expired.len(), "expiring temporary effects");
        self.active.retain(|_, cards| {
            for card in expired.iter() {
                cards.remove(card);
            }
            !cards.is_empty()
        });
    }

    #[must_use]
    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// The cards currently applying `kind` (empty if none).
    #[must_use]
    pub fn cards_with_effect(&self, kind: EffectKind) -> OrdSet<EntityId> {
        self.active.get(&kind).cloned().unwrap_or_default()
    }

    /// How many cards currently apply `kind`.
    #[must_use]
    pub fn count(&self, kind: EffectKind) -> usize {
        self.active.get(&kind).map_or(0, OrdSet::len)
    }

    #[must_use]
    pub fn is_temporary(&self, card: EntityId) -> bool {
        self.temporary.contains(&card)
    }

    /// Kinds a card is currently applying, sorted.
    #[must_use]
    pub fn kinds_of(&self, card: EntityId) -> Vec<EffectKind> {
        let mut kinds: Vec<_> = self
            .active
            .iter()
            .filter(|(_, cards)| cards.contains(&card))
            .map(|(kind, _)| *kind)
            .collect();
        kinds.sort_unstable();
        kinds
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
