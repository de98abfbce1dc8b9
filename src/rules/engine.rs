//! The turn state machine and the external actions a host can take.
//!
//! A `Game` owns the `GameState` and walks it through the turn phases.
//! Automatic phases (DARK_EVENT, VILLAINS, MAGICAL_OBJECT, END_TURN) do their
//! work on entry; manual phases wait for the host's actions. Every phase is
//! left with `advance_phase`. Entering END_TURN finishes the turn and rolls
//! straight into the next hero's DARK_EVENT.
//!
//! Every state-mutating public call ends by invoking the refresh hook, if one
//! is installed.

use im::Vector;
use tracing::{debug, info};

use super::phase::TurnPhase;
use crate::cards::{Ingredient, ObjectToken, StoryObjective, Villain};
use crate::core::{EngineError, EntityId, GameState, PlayerId, Result};
use crate::effects::{
    assign_object_token, damage_villain, place_acquired, DurationRegistry, Effect, EffectContext,
    EffectEngine, EffectKind,
};
use crate::subsystems::{self, BrewOutcome, Shelf, ShelfSide, TurnCounters};
use crate::triggers::{activate_trigger, fire, TriggerKind};

/// One phase entry in the game history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseRecord {
    pub turn: u32,
    pub player: PlayerId,
    pub phase: TurnPhase,
}

/// Overall standing. Reported, never enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// No villain in play and none left in the deck.
    Won,
    /// The final location is full.
    Lost,
}

/// Called with the new state after each mutating call.
pub type RefreshHook = Box<dyn FnMut(&GameState)>;

pub struct Game {
    state: GameState,
    phase: TurnPhase,
    started: bool,
    history: Vector<PhaseRecord>,
    refresh: Option<RefreshHook>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("started", &self.started)
            .field("turn", &self.state.turn_number)
            .field("active_player", &self.state.active_player)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Wrap a prepared state. Nothing runs until `start`.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            phase: TurnPhase::DarkEvent,
            started: false,
            history: Vector::new(),
            refresh: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts that script positions directly.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn history(&self) -> &Vector<PhaseRecord> {
        &self.history
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.state.active_player
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.state.turn_number
    }

    #[must_use]
    pub fn active_villains(&self) -> &[Villain] {
        &self.state.villains.active
    }

    #[must_use]
    pub fn active_objective(&self) -> Option<&StoryObjective> {
        self.state.objectives.active()
    }

    #[must_use]
    pub fn shelf(&self, side: ShelfSide) -> &Shelf {
        self.state.brewing.shelf(side)
    }

    #[must_use]
    pub fn durations(&self) -> &DurationRegistry {
        &self.state.durations
    }

    #[must_use]
    pub fn counters(&self) -> &TurnCounters {
        self.state.counters()
    }

    pub fn set_refresh_hook(&mut self, hook: RefreshHook) {
        self.refresh = Some(hook);
    }

    fn refresh(&mut self) {
        if let Some(hook) = &mut self.refresh {
            hook(&self.state);
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.state.villains.is_cleared() {
            return GameStatus::Won;
        }
        let track = &self.state.locations;
        if track.is_final() && track.current().is_some_and(|l| l.is_full()) {
            return GameStatus::Lost;
        }
        GameStatus::InProgress
    }

    // === Phase machine ===

    /// Enter the first DARK_EVENT. Calling it again does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        info!(
            players = self.state.player_count(),
            seed = self.state.rng.seed(),
            "game started"
        );
        self.enter(TurnPhase::DarkEvent)?;
        self.refresh();
        Ok(())
    }

    /// Leave the current phase. Returns the phase the game is now in.
    pub fn advance_phase(&mut self) -> Result<TurnPhase> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        let Some(next) = self.phase.next(&self.state.config.subsystems) else {
            debug!("advance past END_TURN ignored");
            return Ok(self.phase);
        };
        self.enter(next)?;
        self.refresh();
        Ok(self.phase)
    }

    fn enter(&mut self, phase: TurnPhase) -> Result<()> {
        self.phase = phase;
        self.history.push_back(PhaseRecord {
            turn: self.state.turn_number,
            player: self.state.active_player,
            phase,
        });
        debug!(
            %phase,
            player = %self.state.active_player,
            turn = self.state.turn_number,
            "entering phase"
        );

        match phase {
            TurnPhase::DarkEvent => {
                self.run_dark_event();
                Ok(())
            }
            TurnPhase::Villains => {
                self.run_villains();
                Ok(())
            }
            TurnPhase::MagicalObject => {
                self.run_magical_objects();
                Ok(())
            }
            TurnPhase::EndTurn => self.run_end_turn(),
            TurnPhase::PlayCards
            | TurnPhase::GatherIngredients
            | TurnPhase::Attack
            | TurnPhase::BuyCards => Ok(()),
        }
    }

    fn run_dark_event(&mut self) {
        let state = &mut self.state;
        let player = state.active_player;
        activate_trigger(state, TriggerKind::TurnStart, player);

        let hero = &mut state.heroes[player];
        if hero.stunned {
            hero.stunned = false;
            hero.restore_full_health();
            info!(%player, "stunned hero recovers");
        }

        if state.config.subsystems.ongoing_curses {
            subsystems::resolve_ongoing_curses(state, player);
        }

        if let Some(event) = state.dark_events.draw() {
            let effects = state.card_of(event).map(|c| c.effects.clone()).unwrap_or_default();
            let ctx = EffectContext::from_source(event).with_triggering(event);
            EffectEngine::execute_all(state, &effects, player, &ctx);
            state.dark_events.discard(event);
            state.durations.release(event);
            state.counters_mut().dark_events_resolved += 1;
            fire(state, TriggerKind::DarkEventRevealed, player, None, &ctx);
        }

        if state.config.subsystems.story_objectives {
            let ongoing = state
                .objectives
                .active()
                .filter(|o| !o.completed)
                .map(|o| (o.entity_id, o.continuous_effects.clone()));
            if let Some((objective, effects)) = ongoing {
                resolve_ongoing(state, objective, &effects, player);
            }
        }
    }

    fn run_villains(&mut self) {
        let state = &mut self.state;
        let player = state.active_player;
        let acting: Vec<_> = state
            .villains
            .active
            .iter()
            .filter(|v| v.is_alive() && !v.ability_locked)
            .map(|v| (v.entity_id, v.effects.clone()))
            .collect();

        for (villain, effects) in &acting {
            resolve_ongoing(state, *villain, effects, player);
        }
    }

    fn run_magical_objects(&mut self) {
        let state = &mut self.state;
        let player = state.active_player;
        let acting: Vec<_> = state
            .magical_objects
            .iter()
            .filter(|o| !o.is_destroyed())
            .map(|o| (o.entity_id, o.effects.clone()))
            .collect();

        for (object, effects) in &acting {
            resolve_ongoing(state, *object, effects, player);
        }
    }

    fn run_end_turn(&mut self) -> Result<()> {
        let player = self.state.active_player;
        activate_trigger(&mut self.state, TriggerKind::TurnEnd, player);

        let zones = &mut self.state.heroes[player].zones;
        let mut leaving = zones.clear_in_play();
        leaving.extend(zones.discard_hand());
        for card in leaving {
            self.state.purge(card);
        }

        self.state.durations.end_of_turn();
        let swept = self.state.triggers.remove_temporary_triggers();
        self.state.triggers.reset_hits();
        debug!(swept, "temporary triggers removed");

        self.check_objective();

        let locked: Vec<_> = self
            .state
            .villains
            .active
            .iter()
            .filter(|v| v.locked_by == Some(player))
            .map(|v| v.entity_id)
            .collect();
        for villain in locked {
            self.state.unlock_villain(villain);
        }
        self.state.refill_villains()?;
        self.state.refill_market();

        self.state.heroes[player].reset_tokens();
        self.state.draw_up_to_hand_size(player);

        self.state.objectives.reset_counters();
        self.state.brewing.reset_turn();
        self.state.attacks_this_turn.clear();

        self.state.active_player = player.next_in_turn(self.state.player_count());
        self.state.turn_number += 1;
        self.enter(TurnPhase::DarkEvent)
    }

    /// Reward the active objective once if it is newly complete.
    fn check_objective(&mut self) -> bool {
        let state = &mut self.state;
        if !state.config.subsystems.story_objectives {
            return false;
        }
        let defeated = state.villains.defeated_cards();
        if !state.objectives.verify_completion(&defeated) {
            return false;
        }
        let Some(completed) = state.objectives.active().cloned() else {
            return false;
        };
        info!(objective = %completed.name, "story objective completed");

        let player = state.active_player;
        // Purge first so lasting rewards registered under the objective stay.
        state.purge(completed.entity_id);
        let ctx = EffectContext::from_source(completed.entity_id)
            .with_triggering(completed.entity_id);
        EffectEngine::execute_all(state, &completed.reward, player, &ctx);
        fire(state, TriggerKind::ObjectiveCompleted, player, None, &ctx);

        state.objectives.advance();
        state.activate_objective();
        true
    }

    /// Check the active objective now. True only on the call that completes it.
    pub fn verify_objective_completion(&mut self) -> bool {
        let completed = self.check_objective();
        self.refresh();
        completed
    }

    // === External actions ===

    fn require_phase(&self, allowed: &[TurnPhase]) -> Result<()> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EngineError::WrongPhase {
                expected: allowed[0],
                actual: self.phase,
            })
        }
    }

    /// Play a card from the active hero's hand.
    pub fn play_card(&mut self, card: EntityId) -> Result<()> {
        self.require_phase(&[TurnPhase::PlayCards])?;
        let state = &mut self.state;
        let player = state.active_player;
        let class = state.class_of(card).ok_or(EngineError::UnknownEntity(card))?;
        if !state.heroes[player].zones.play_from_hand(card) {
            return Err(EngineError::NotInHand { card, player });
        }
        if subsystems::is_blocked(state, player, class) {
            debug!(%card, ?class, "card class is blocked; playing anyway");
        }

        state.counters_mut().record_card_played(class);
        let effects = state.card_of(card).map(|c| c.effects.clone()).unwrap_or_default();
        let ctx = EffectContext::from_source(card).with_triggering(card);
        EffectEngine::execute_all(state, &effects, player, &ctx);
        state.register_card_triggers(card);

        fire(state, TriggerKind::CardPlayed, player, None, &ctx);
        if let Some(kind) = TriggerKind::played(class) {
            fire(state, kind, player, None, &ctx);
        }
        debug!(%player, %card, ?class, "card played");
        self.refresh();
        Ok(())
    }

    /// Buy a market card with the active hero's influence.
    pub fn buy_card(&mut self, card: EntityId) -> Result<()> {
        self.require_phase(&[TurnPhase::BuyCards])?;
        let state = &mut self.state;
        let player = state.active_player;
        if !state.market.row.contains(&card) {
            return Err(EngineError::NotInMarket(card));
        }
        let cost = state.card_of(card).map_or(0, |c| c.cost);
        let available = state.heroes[player].influence;
        if available < cost {
            return Err(EngineError::Insufficient {
                resource: "influence",
                needed: cost,
                available,
            });
        }

        state.heroes[player].influence -= cost;
        state.market.take(card);
        state.set_owner(card, player);
        place_acquired(state, player, card);
        state.counters_mut().record_acquired(cost);
        info!(%player, %card, cost, "card acquired");

        let ctx = EffectContext::default().with_triggering(card);
        fire(state, TriggerKind::CardAcquired, player, None, &ctx);
        state.refill_market();
        self.refresh();
        Ok(())
    }

    /// Spend attack tokens on a villain. Returns the damage dealt.
    ///
    /// Only the damage that lands is paid for.
    pub fn assign_attack(&mut self, villain: EntityId, amount: i64) -> Result<i64> {
        self.require_phase(&[TurnPhase::Attack])?;
        let state = &mut self.state;
        let player = state.active_player;
        let remaining = state
            .villains
            .get(villain)
            .ok_or(EngineError::VillainNotInPlay(villain))?
            .remaining_health();

        let mut amount = amount.max(0);
        if state.durations.is_active(EffectKind::AttackLimitOnePerVillain) {
            if state.attacks_this_turn.get(&villain).copied().unwrap_or(0) > 0 {
                return Err(EngineError::AttackLimitReached(villain));
            }
            amount = amount.min(1);
        }
        let spent = amount.min(remaining);
        let available = state.heroes[player].attack;
        if available < spent {
            return Err(EngineError::Insufficient {
                resource: "attack",
                needed: spent,
                available,
            });
        }
        if spent == 0 {
            return Ok(0);
        }
        state.heroes[player].attack -= spent;
        state.counters_mut().attack_assigned += spent;
        *state.attacks_this_turn.entry(villain).or_insert(0) += 1;

        let dealt = damage_villain(state, villain, spent, player, &EffectContext::default());
        self.refresh();
        Ok(dealt)
    }

    /// Take an ingredient from a shelf slot for the active hero.
    pub fn gather_ingredient(&mut self, side: ShelfSide, slot: usize) -> Result<Ingredient> {
        if !self.state.config.subsystems.potions {
            return Err(EngineError::SubsystemDisabled("potions"));
        }
        self.require_phase(&[TurnPhase::GatherIngredients])?;
        let ingredient = subsystems::gather_ingredient(&mut self.state, side, slot)?;
        self.refresh();
        Ok(ingredient)
    }

    /// Brew an available potion for `player`.
    pub fn brew_potion(
        &mut self,
        player: PlayerId,
        potion: EntityId,
        banish: bool,
    ) -> Result<BrewOutcome> {
        self.require_phase(&[TurnPhase::PlayCards, TurnPhase::GatherIngredients])?;
        let outcome = subsystems::brew_potion(&mut self.state, player, potion, banish)?;
        self.refresh();
        Ok(outcome)
    }

    /// Pay one token onto a magical object.
    ///
    /// ATTACK and INFLUENCE tokens cost one of the hero's tokens; HEALTH and
    /// CARD tokens only come from effects.
    pub fn assign_object_token(&mut self, object: EntityId, token: ObjectToken) -> Result<()> {
        if !self.state.config.subsystems.magical_objects {
            return Err(EngineError::SubsystemDisabled("magical objects"));
        }
        self.require_phase(&[TurnPhase::PlayCards, TurnPhase::Attack])?;
        let state = &mut self.state;
        let player = state.active_player;
        let target = state
            .magical_object(object)
            .ok_or(EngineError::ObjectNotInPlay(object))?;
        if !target.accepts(token) {
            return Err(EngineError::TokenRejected(format!(
                "{} does not need a {token:?} token",
                target.name
            )));
        }

        let hero = &mut state.heroes[player];
        let (resource, held) = match token {
            ObjectToken::Attack => ("attack", &mut hero.attack),
            ObjectToken::Influence => ("influence", &mut hero.influence),
            ObjectToken::Health | ObjectToken::Card => {
                return Err(EngineError::TokenRejected(format!(
                    "{token:?} tokens are only assigned by effects"
                )));
            }
        };
        if *held < 1 {
            return Err(EngineError::Insufficient {
                resource,
                needed: 1,
                available: *held,
            });
        }
        *held -= 1;

        assign_object_token(state, object, token, player, &EffectContext::default())?;
        self.refresh();
        Ok(())
    }

    /// Move to the next location and run its entry effects.
    pub fn reveal_next_location(&mut self) -> Result<EntityId> {
        let state = &mut self.state;
        let (location, effects) = state
            .locations
            .advance()
            .map(|l| (l.entity_id, l.entry_effects.clone()))
            .ok_or(EngineError::NoMoreLocations)?;
        info!(%location, "location revealed");

        let player = state.active_player;
        let ctx = EffectContext::from_source(location).with_triggering(location);
        EffectEngine::execute_all(state, &effects, player, &ctx);
        fire(state, TriggerKind::LocationRevealed, player, None, &ctx);
        self.refresh();
        Ok(location)
    }
}

/// Run a board card's ongoing effects against `player` for this turn.
///
/// Rule modifiers are registered for the card rather than dispatched, which
/// re-arms TEMPORARY ones after the previous end of turn swept them.
fn resolve_ongoing(state: &mut GameState, source: EntityId, effects: &[Effect], player: PlayerId) {
    let ctx = EffectContext::from_source(source);
    for effect in effects {
        if effect.kind.is_modifier() {
            state.durations.register_modifiers(source, std::slice::from_ref(effect));
        } else {
            EffectEngine::resolve(state, effect, player, &ctx);
        }
    }
}
