//! Game state: every piece of mutable data one game owns.
//!
//! ## Layout
//!
//! - Card instances by entity id, resolved against the `CardRegistry`
//! - One `Hero` per seat, with its card piles and resources
//! - Shared board: villains, location track, magical objects, market,
//!   dark-event deck
//! - Subsystem state: objective tracker, potion brewing, curses
//! - The duration and trigger registries
//!
//! Fields are public so the engine can borrow disjoint parts at once (for
//! example the villain board while draining the trigger registry). External
//! callers should treat the state as read-only and mutate it through `Game`.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::board::{DarkEventDeck, LocationTrack, Market, VillainBoard};
use super::config::GameConfig;
use super::entity::EntityId;
use super::error::{EngineError, Result};
use super::hero::Hero;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{
    Card, CardClass, CardId, CardInstance, CardRegistry, Location, MagicalObject, StoryObjective,
    Villain,
};
use crate::effects::DurationRegistry;
use crate::subsystems::{CurseResolution, ObjectiveTracker, PotionBrewing, TurnCounters};
use crate::triggers::TriggerRegistry;

/// Full game state.
///
/// Cloning is cheap where it matters: registries use persistent sets and the
/// RNG streams clone their exact position.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Configuration snapshot taken at game start.
    pub config: GameConfig,

    /// Card definitions.
    pub registry: CardRegistry,

    /// Card instances by entity ID.
    cards: FxHashMap<EntityId, CardInstance>,

    pub heroes: PlayerMap<Hero>,

    /// Hero whose turn it is.
    pub active_player: PlayerId,

    /// Turn number (starts at 1).
    pub turn_number: u32,

    // === Shared board ===
    pub villains: VillainBoard,
    pub locations: LocationTrack,
    pub magical_objects: Vec<MagicalObject>,
    pub market: Market,
    pub dark_events: DarkEventDeck,

    // === Subsystems ===
    pub objectives: ObjectiveTracker,
    pub brewing: PotionBrewing,
    pub curses: CurseResolution,

    // === Registries ===
    pub durations: DurationRegistry,
    pub triggers: TriggerRegistry,

    /// Attack assignments per villain this turn.
    pub attacks_this_turn: FxHashMap<EntityId, u32>,

    /// Cards removed from the game.
    pub banished: Vec<EntityId>,

    /// Deterministic RNG for hero decks and effects.
    pub rng: GameRng,

    /// Next entity ID to allocate.
    next_entity_id: EntityId,
}

impl GameState {
    /// Create an empty table for `config`.
    ///
    /// Board areas start empty; `GameBuilder` fills them.
    #[must_use]
    pub fn new(config: GameConfig, registry: CardRegistry) -> Self {
        let rng = GameRng::from_seed_option(config.seed);
        let heroes = PlayerMap::new(config.player_count, |player| {
            Hero::new(
                player,
                player.to_string(),
                config.starting_health,
                config.max_health,
            )
        });

        Self {
            registry,
            cards: FxHashMap::default(),
            heroes,
            active_player: PlayerId::new(0),
            turn_number: 1,
            villains: VillainBoard::default(),
            locations: LocationTrack::default(),
            magical_objects: Vec::new(),
            market: Market::default(),
            dark_events: DarkEventDeck::new(Vec::new(), rng.for_context("dark_events")),
            objectives: ObjectiveTracker::new(),
            brewing: PotionBrewing::new(rng.for_context("ingredients")),
            curses: CurseResolution::new(),
            durations: DurationRegistry::new(),
            triggers: TriggerRegistry::new(),
            attacks_this_turn: FxHashMap::default(),
            banished: Vec::new(),
            rng,
            next_entity_id: EntityId::FIRST,
            config,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.heroes.player_count()
    }

    // === Entity Management ===

    /// Allocate a new entity ID.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id = id.next();
        id
    }

    /// Create an instance of a registered card.
    pub fn spawn(&mut self, card_id: CardId, owner: Option<PlayerId>) -> Result<EntityId> {
        self.registry.lookup(card_id)?;
        let entity = self.alloc_entity();
        let instance = match owner {
            Some(player) => CardInstance::new(entity, card_id, player),
            None => CardInstance::neutral(entity, card_id),
        };
        self.cards.insert(entity, instance);
        Ok(entity)
    }

    #[must_use]
    pub fn instance(&self, entity: EntityId) -> Option<&CardInstance> {
        self.cards.get(&entity)
    }

    /// Definition behind an instance.
    #[must_use]
    pub fn card_of(&self, entity: EntityId) -> Option<&Card> {
        self.cards
            .get(&entity)
            .and_then(|instance| self.registry.get(instance.card_id))
    }

    #[must_use]
    pub fn class_of(&self, entity: EntityId) -> Option<CardClass> {
        self.card_of(entity).map(|card| card.class)
    }

    /// Hand a (market or board) card to `player`.
    pub fn set_owner(&mut self, entity: EntityId, player: PlayerId) {
        if let Some(instance) = self.cards.get_mut(&entity) {
            instance.owner = Some(player);
        }
    }

    // === Heroes ===

    pub fn hero(&self, player: PlayerId) -> Result<&Hero> {
        self.heroes.try_get(player).ok_or(EngineError::UnknownPlayer(player))
    }

    pub fn hero_mut(&mut self, player: PlayerId) -> Result<&mut Hero> {
        self.heroes
            .try_get_mut(player)
            .ok_or(EngineError::UnknownPlayer(player))
    }

    #[must_use]
    pub fn active_hero(&self) -> &Hero {
        &self.heroes[self.active_player]
    }

    pub fn active_hero_mut(&mut self) -> &mut Hero {
        &mut self.heroes[self.active_player]
    }

    #[must_use]
    pub fn counters(&self) -> &TurnCounters {
        self.objectives.counters()
    }

    pub fn counters_mut(&mut self) -> &mut TurnCounters {
        self.objectives.counters_mut()
    }

    /// Draw one card for `player`, reshuffling if needed, and register the
    /// drawn card's hand triggers.
    pub fn draw_card(&mut self, player: PlayerId) -> Option<EntityId> {
        let card = self.heroes.try_get_mut(player)?.zones.draw(&mut self.rng)?;
        self.register_hand_triggers(card);
        Some(card)
    }

    /// Draw until `player` holds `hand_size` cards or runs out.
    pub fn draw_up_to_hand_size(&mut self, player: PlayerId) -> usize {
        let mut drawn = 0;
        while self.heroes[player].zones.hand_size() < self.config.hand_size {
            if self.draw_card(player).is_none() {
                break;
            }
            drawn += 1;
        }
        drawn
    }

    // === Registrations ===

    /// Register the triggers that are live while the card is held.
    pub fn register_hand_triggers(&mut self, entity: EntityId) -> usize {
        self.register_triggers_where(entity, |trigger| trigger.kind.active_in_hand())
    }

    /// Register every trigger of the card.
    pub fn register_card_triggers(&mut self, entity: EntityId) -> usize {
        self.register_triggers_where(entity, |_| true)
    }

    fn register_triggers_where(
        &mut self,
        entity: EntityId,
        filter: impl Fn(&crate::triggers::Trigger) -> bool,
    ) -> usize {
        let Some(card) = self
            .cards
            .get(&entity)
            .and_then(|instance| self.registry.get(instance.card_id))
        else {
            return 0;
        };
        let mut registered = 0;
        for trigger in card.triggers.iter().filter(|t| filter(t)) {
            if self.triggers.register(trigger, entity) {
                registered += 1;
            }
        }
        registered
    }

    /// Drop every duration and trigger registration of `entity`.
    pub fn purge(&mut self, entity: EntityId) {
        let triggers = self.triggers.remove_trigger(entity);
        self.durations.remove_effect(entity);
        if triggers > 0 {
            debug!(%entity, triggers, "registrations purged");
        }
    }

    // === Board setup ===

    /// Put a villain instance into play and register its triggers.
    pub fn enter_villain(&mut self, entity: EntityId) -> Result<&Villain> {
        let card = self.card_of(entity).ok_or(EngineError::UnknownEntity(entity))?;
        let villain = Villain::from_card(entity, card).ok_or(EngineError::WrongCardKind {
            card: card.id,
            expected: "villain",
        })?;
        debug!(villain = %villain.name, %entity, "villain enters play");
        self.durations.register_modifiers(entity, &villain.effects);
        self.villains.active.push(villain);
        self.register_card_triggers(entity);
        self.villains
            .active
            .last()
            .ok_or(EngineError::VillainNotInPlay(entity))
    }

    /// Fill empty villain slots from the villain deck. Returns the newcomers.
    pub fn refill_villains(&mut self) -> Result<Vec<EntityId>> {
        let mut entered = Vec::new();
        while self.villains.active.len() < self.config.villain_slots {
            let Some(next) = self.villains.deck.pop() else { break };
            self.enter_villain(next)?;
            entered.push(next);
        }
        Ok(entered)
    }

    /// Fill the market row from the market deck.
    pub fn refill_market(&mut self) -> Vec<EntityId> {
        self.market.refill(self.config.market_size)
    }

    /// Spawn a location card at the end of the track.
    pub fn add_location(&mut self, card_id: CardId) -> Result<EntityId> {
        let entity = self.spawn(card_id, None)?;
        let card = self.registry.lookup(card_id)?;
        let location = Location::from_card(entity, card).ok_or(EngineError::WrongCardKind {
            card: card_id,
            expected: "location",
        })?;
        self.locations.locations.push(location);
        Ok(entity)
    }

    /// Spawn a magical object into play.
    pub fn add_magical_object(&mut self, card_id: CardId) -> Result<EntityId> {
        let entity = self.spawn(card_id, None)?;
        let card = self.registry.lookup(card_id)?;
        let object = MagicalObject::from_card(entity, card).ok_or(EngineError::WrongCardKind {
            card: card_id,
            expected: "magical object",
        })?;
        self.durations.register_modifiers(entity, &object.effects);
        self.magical_objects.push(object);
        self.register_card_triggers(entity);
        Ok(entity)
    }

    /// Spawn the story objectives and make the first one active.
    pub fn set_story_objectives(&mut self, card_ids: &[CardId]) -> Result<()> {
        let mut objectives = Vec::with_capacity(card_ids.len());
        for &card_id in card_ids {
            let entity = self.spawn(card_id, None)?;
            let card = self.registry.lookup(card_id)?;
            let objective = StoryObjective::from_card(entity, card).ok_or(
                EngineError::WrongCardKind {
                    card: card_id,
                    expected: "story objective",
                },
            )?;
            objectives.push(objective);
        }
        self.objectives.set_objectives(objectives);
        self.activate_objective();
        Ok(())
    }

    /// Register the triggers and continuous modifiers of the active objective.
    pub fn activate_objective(&mut self) {
        let Some(objective) = self.objectives.active() else {
            return;
        };
        let source = objective.entity_id;
        for trigger in &objective.triggers {
            self.triggers.register(trigger, source);
        }
        self.durations.register_modifiers(source, &objective.continuous_effects);
    }

    /// Lock a villain's ability. Its modifiers stop applying until unlocked.
    pub fn lock_villain(&mut self, entity: EntityId, by: PlayerId) -> bool {
        let Some(villain) = self.villains.get_mut(entity) else {
            return false;
        };
        villain.lock(by);
        self.durations.remove_effect(entity);
        true
    }

    /// Unlock a villain's ability and re-register its modifiers.
    pub fn unlock_villain(&mut self, entity: EntityId) -> bool {
        let Some(villain) = self.villains.get_mut(entity) else {
            return false;
        };
        villain.unlock();
        self.durations.register_modifiers(entity, &villain.effects);
        true
    }

    #[must_use]
    pub fn magical_object(&self, entity: EntityId) -> Option<&MagicalObject> {
        self.magical_objects.iter().find(|o| o.entity_id == entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Effect, EffectKind};
    use crate::triggers::{Trigger, TriggerKind};

    fn registry() -> CardRegistry {
        CardRegistry::from_cards([
            Card::new(CardId::new(1), "Trinket", CardClass::Item)
                .with_trigger(
                    Trigger::new(TriggerKind::AutoDiscard)
                        .with_effect(Effect::of(EffectKind::GainHealth, 2)),
                )
                .with_trigger(
                    Trigger::new(TriggerKind::TurnEnd)
                        .with_effect(Effect::of(EffectKind::GainAttack, 1)),
                ),
            Card::villain(CardId::new(2), "Brute", 4),
        ])
        .unwrap()
    }

    #[test]
    fn test_game_state_new() {
        let state = GameState::new(GameConfig::new(3).with_seed(42), registry());

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.active_hero().health, state.config.starting_health);
        assert!(state.triggers.is_empty());
    }

    #[test]
    fn test_spawn_unknown_card() {
        let mut state = GameState::new(GameConfig::new(1).with_seed(1), registry());
        assert_eq!(
            state.spawn(CardId::new(99), None),
            Err(EngineError::UnknownCard(CardId::new(99)))
        );
    }

    #[test]
    fn test_alloc_entity_is_sequential() {
        let mut state = GameState::new(GameConfig::new(2).with_seed(1), registry());
        let e1 = state.alloc_entity();
        let e2 = state.alloc_entity();
        assert_eq!(e2, e1.next());
    }

    #[test]
    fn test_hand_triggers_then_full_registration() {
        let mut state = GameState::new(GameConfig::new(2).with_seed(1), registry());
        let card = state.spawn(CardId::new(1), Some(PlayerId::new(0))).unwrap();

        assert_eq!(state.register_hand_triggers(card), 1);
        assert!(state.triggers.is_registered(TriggerKind::AutoDiscard, card));
        assert!(!state.triggers.is_registered(TriggerKind::TurnEnd, card));

        // The AUTO_DISCARD registration is already there.
        assert_eq!(state.register_card_triggers(card), 1);

        state.durations.add_effect(EffectKind::PreventHealing, card);
        state.purge(card);
        assert!(state.triggers.is_empty());
        assert!(!state.durations.is_active(EffectKind::PreventHealing));
    }

    #[test]
    fn test_refill_villains_respects_slots() {
        let config = GameConfig::new(1).with_seed(1).with_villain_slots(1);
        let mut state = GameState::new(config, registry());
        let a = state.spawn(CardId::new(2), None).unwrap();
        let b = state.spawn(CardId::new(2), None).unwrap();
        state.villains.deck = vec![a, b];

        assert_eq!(state.refill_villains().unwrap(), vec![b]);
        assert_eq!(state.villains.active_ids(), vec![b]);
        assert_eq!(state.villains.deck, vec![a]);
    }

    #[test]
    fn test_enter_villain_rejects_other_cards() {
        let mut state = GameState::new(GameConfig::new(1).with_seed(1), registry());
        let trinket = state.spawn(CardId::new(1), None).unwrap();
        assert!(matches!(
            state.enter_villain(trinket),
            Err(EngineError::WrongCardKind { .. })
        ));
    }

    #[test]
    fn test_draw_up_to_hand_size() {
        let config = GameConfig::new(1).with_seed(1).with_hand_size(2);
        let mut state = GameState::new(config, registry());
        let player = PlayerId::new(0);
        let deck: Vec<_> = (0..3)
            .map(|_| state.spawn(CardId::new(1), Some(player)).unwrap())
            .collect();
        state.heroes[player].zones = crate::zones::HeroZones::with_deck(deck);

        assert_eq!(state.draw_up_to_hand_size(player), 2);
        assert_eq!(state.draw_up_to_hand_size(player), 0);
        assert_eq!(state.triggers.registrations(TriggerKind::AutoDiscard), 2);
    }
}
