//! Potion brewing: ingredient shelves and recipe matching.
//!
//! ## Shelves
//!
//! The board has two shelves, side A and side B. Each slot on a shelf holds a
//! short column of ingredients and carries its own unlock requirement, read
//! from this turn's counters. The active hero may take the front ingredient
//! of every unlocked slot once per turn; the rest of the column falls forward
//! and a fresh ingredient from the pool lands at the back.
//!
//! ## Brewing
//!
//! A recipe is a multiset of ingredients. Specific kinds are paid with the
//! exact kind first and `WILD` for any shortfall; a required `WILD` unit
//! accepts anything, served from non-wild leftovers first. Using exact kinds
//! before wilds never loses a feasible match, so the greedy order is optimal.
//! Matching is all or nothing: a failed brew consumes no ingredients.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use super::objective::TurnCounters;
use crate::cards::{CardClass, Ingredient};
use crate::core::{EngineError, EntityId, GameRng, GameState, Multiset, PlayerId, Result};
use crate::effects::{EffectContext, EffectEngine};
use crate::triggers::{activate_trigger, fire, TriggerKind};
use crate::zones::{Pile, ZonePosition};

/// Ingredients stacked in each slot.
const COLUMN_DEPTH: usize = 3;

/// Copies of each specific kind in a fresh pool.
const POOL_SPECIFIC_COPIES: u32 = 8;

/// Wild ingredients in a fresh pool.
const POOL_WILD_COPIES: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShelfSide {
    A,
    B,
}

impl ShelfSide {
    const fn index(self) -> usize {
        match self {
            ShelfSide::A => 0,
            ShelfSide::B => 1,
        }
    }
}

/// What must have happened this turn before a slot can be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotRequirement {
    /// A card of at least this cost was acquired.
    AcquiredCardValue(i64),
    /// At least this many items were played.
    ItemsPlayed(u32),
    DiscardPerformed,
    HeroStunned,
    OtherHeroHealed,
    /// At least this much attack was assigned.
    AttackAssigned(i64),
}

impl SlotRequirement {
    #[must_use]
    pub fn is_met(self, counters: &TurnCounters) -> bool {
        match self {
            SlotRequirement::AcquiredCardValue(min) => counters.max_acquired_cost >= min,
            SlotRequirement::ItemsPlayed(min) => counters.items_played >= min,
            SlotRequirement::DiscardPerformed => counters.discards > 0,
            SlotRequirement::HeroStunned => counters.heroes_stunned > 0,
            SlotRequirement::OtherHeroHealed => counters.other_heroes_healed > 0,
            SlotRequirement::AttackAssigned(min) => counters.attack_assigned >= min,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfSlot {
    pub requirement: SlotRequirement,
    /// Front is takeable.
    column: SmallVec<[Ingredient; COLUMN_DEPTH]>,
    taken_this_turn: bool,
}

impl ShelfSlot {
    #[must_use]
    pub fn front(&self) -> Option<Ingredient> {
        self.column.first().copied()
    }

    #[must_use]
    pub fn column(&self) -> &[Ingredient] {
        &self.column
    }

    #[must_use]
    pub fn taken_this_turn(&self) -> bool {
        self.taken_this_turn
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    pub side: ShelfSide,
    pub slots: Vec<ShelfSlot>,
}

/// Result of a brew attempt that found its potion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrewOutcome {
    /// Potion went to the hero's discard pile.
    Brewed,
    /// Banish effects ran; the potion is gone for good.
    Banished,
    /// Nothing consumed. `missing` lists the unmatched units.
    MissingIngredients { missing: Multiset<Ingredient> },
}

/// Shelves, ingredient pool and the potions on offer.
#[derive(Clone, Debug)]
pub struct PotionBrewing {
    shelves: [Shelf; 2],
    pool: Vec<Ingredient>,
    rng: GameRng,
    /// Face-up potions that can be brewed.
    available: Vec<EntityId>,
    deck: Vec<EntityId>,
    display_size: usize,
    banished: Vec<EntityId>,
}

impl PotionBrewing {
    /// Standard slot layout for each side.
    #[must_use]
    pub fn standard_layout(side: ShelfSide) -> Vec<SlotRequirement> {
        match side {
            ShelfSide::A => vec![
                SlotRequirement::AcquiredCardValue(4),
                SlotRequirement::ItemsPlayed(2),
                SlotRequirement::DiscardPerformed,
                SlotRequirement::HeroStunned,
                SlotRequirement::OtherHeroHealed,
                SlotRequirement::AttackAssigned(3),
            ],
            ShelfSide::B => vec![
                SlotRequirement::AcquiredCardValue(6),
                SlotRequirement::ItemsPlayed(1),
                SlotRequirement::AttackAssigned(5),
                SlotRequirement::DiscardPerformed,
                SlotRequirement::OtherHeroHealed,
                SlotRequirement::HeroStunned,
            ],
        }
    }

    /// Shelves with the standard layouts, filled from a shuffled pool.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self::with_layout(
            Self::standard_layout(ShelfSide::A),
            Self::standard_layout(ShelfSide::B),
            rng,
        )
    }

    #[must_use]
    pub fn with_layout(
        side_a: Vec<SlotRequirement>,
        side_b: Vec<SlotRequirement>,
        rng: GameRng,
    ) -> Self {
        let shelf = |side, layout: Vec<SlotRequirement>| Shelf {
            side,
            slots: layout
                .into_iter()
                .map(|requirement| ShelfSlot {
                    requirement,
                    column: SmallVec::new(),
                    taken_this_turn: false,
                })
                .collect(),
        };
        let mut brewing = Self {
            shelves: [shelf(ShelfSide::A, side_a), shelf(ShelfSide::B, side_b)],
            pool: Vec::new(),
            rng,
            available: Vec::new(),
            deck: Vec::new(),
            display_size: 0,
            banished: Vec::new(),
        };
        brewing.fill_columns();
        brewing
    }

    fn fill_columns(&mut self) {
        for side in [ShelfSide::A, ShelfSide::B] {
            for index in 0..self.shelves[side.index()].slots.len() {
                while self.shelves[side.index()].slots[index].column.len() < COLUMN_DEPTH {
                    let ingredient = self.draw_from_pool();
                    self.shelves[side.index()].slots[index].column.push(ingredient);
                }
            }
        }
    }

    /// Take one ingredient from the pool, rebuilding it when empty.
    pub fn draw_from_pool(&mut self) -> Ingredient {
        loop {
            if let Some(ingredient) = self.pool.pop() {
                return ingredient;
            }
            self.rebuild_pool();
        }
    }

    fn rebuild_pool(&mut self) {
        debug!("rebuilding ingredient pool");
        self.pool = Ingredient::SPECIFIC
            .iter()
            .flat_map(|&kind| std::iter::repeat(kind).take(POOL_SPECIFIC_COPIES as usize))
            .chain(std::iter::repeat(Ingredient::Wild).take(POOL_WILD_COPIES as usize))
            .collect();
        self.rng.shuffle(&mut self.pool);
    }

    #[must_use]
    pub fn shelf(&self, side: ShelfSide) -> &Shelf {
        &self.shelves[side.index()]
    }

    #[must_use]
    pub fn slot(&self, side: ShelfSide, index: usize) -> Option<&ShelfSlot> {
        self.shelves[side.index()].slots.get(index)
    }

    /// Whether the slot may be used right now.
    #[must_use]
    pub fn is_unlocked(&self, side: ShelfSide, index: usize, counters: &TurnCounters) -> bool {
        self.slot(side, index)
            .is_some_and(|s| !s.taken_this_turn && s.requirement.is_met(counters))
    }

    /// Take the front ingredient of a slot.
    pub fn take(
        &mut self,
        side: ShelfSide,
        index: usize,
        counters: &TurnCounters,
    ) -> Result<Ingredient> {
        let slot = self
            .shelves[side.index()]
            .slots
            .get(index)
            .ok_or(EngineError::InvalidSlot { slot: index })?;
        if slot.taken_this_turn {
            return Err(EngineError::SlotAlreadyUsed { slot: index });
        }
        if !slot.requirement.is_met(counters) {
            return Err(EngineError::SlotLocked { slot: index });
        }
        if slot.column.is_empty() {
            return Err(EngineError::SlotEmpty { slot: index });
        }

        let refill = self.draw_from_pool();
        let slot = &mut self.shelves[side.index()].slots[index];
        let ingredient = slot.column.remove(0);
        slot.column.push(refill);
        slot.taken_this_turn = true;
        Ok(ingredient)
    }

    /// Clear every slot's used-this-turn flag.
    pub fn reset_turn(&mut self) {
        for slot in self.shelves.iter_mut().flat_map(|s| s.slots.iter_mut()) {
            slot.taken_this_turn = false;
        }
    }

    /// Set the potion deck and how many potions are face-up at once.
    pub fn set_potions(&mut self, deck: Vec<EntityId>, display_size: usize) {
        self.deck = deck;
        self.display_size = display_size;
        self.available.clear();
        self.refill_display();
    }

    fn refill_display(&mut self) {
        while self.available.len() < self.display_size {
            let Some(potion) = self.deck.pop() else { break };
            self.available.push(potion);
        }
    }

    #[must_use]
    pub fn available(&self) -> &[EntityId] {
        &self.available
    }

    #[must_use]
    pub fn banished(&self) -> &[EntityId] {
        &self.banished
    }

    fn take_potion(&mut self, potion: EntityId) -> bool {
        let Some(pos) = self.available.iter().position(|&p| p == potion) else {
            return false;
        };
        self.available.remove(pos);
        self.refill_display();
        true
    }
}

/// Work out which held ingredients pay for `required`.
///
/// Returns the units to consume, or the unmatched units on failure.
pub fn match_ingredients(
    held: &Multiset<Ingredient>,
    required: &Multiset<Ingredient>,
) -> std::result::Result<Multiset<Ingredient>, Multiset<Ingredient>> {
    let mut remaining = held.clone();
    let mut used = Multiset::new();
    let mut missing = Multiset::new();

    for (kind, count) in required.iter().filter(|(k, _)| !k.is_wild()) {
        let exact = count.min(remaining.count(&kind));
        remaining.remove(&kind, exact);
        used.add(kind, exact);

        let short = count - exact;
        let wild = short.min(remaining.count(&Ingredient::Wild));
        remaining.remove(&Ingredient::Wild, wild);
        used.add(Ingredient::Wild, wild);
        missing.add(kind, short - wild);
    }

    let mut any = required.count(&Ingredient::Wild);
    let leftovers: Vec<_> = remaining
        .iter()
        .filter(|(k, _)| !k.is_wild())
        .chain(remaining.iter().filter(|(k, _)| k.is_wild()))
        .collect();
    for (kind, count) in leftovers {
        let take = any.min(count);
        used.add(kind, take);
        any -= take;
    }
    missing.add(Ingredient::Wild, any);

    if missing.is_empty() {
        Ok(used)
    } else {
        Err(missing)
    }
}

/// Take an ingredient from a shelf slot for the active hero.
pub fn gather_ingredient(
    state: &mut GameState,
    side: ShelfSide,
    slot: usize,
) -> Result<Ingredient> {
    let ingredient = state.brewing.take(side, slot, state.objectives.counters())?;
    let player = state.active_player;
    state.heroes[player].ingredients.add(ingredient, 1);
    debug!(%player, %ingredient, ?side, slot, "ingredient gathered");
    activate_trigger(state, TriggerKind::IngredientGathered, player);
    Ok(ingredient)
}

/// Brew an available potion from `player`'s ingredients.
///
/// Lookup failures are errors; a recipe the hero cannot pay is
/// `BrewOutcome::MissingIngredients` and changes nothing.
pub fn brew_potion(
    state: &mut GameState,
    player: PlayerId,
    potion: EntityId,
    banish: bool,
) -> Result<BrewOutcome> {
    if !state.config.subsystems.potions {
        return Err(EngineError::SubsystemDisabled("potions"));
    }
    state.hero(player)?;
    if !state.brewing.available().contains(&potion) {
        return Err(EngineError::PotionNotAvailable(potion));
    }
    let card = state.card_of(potion).ok_or(EngineError::UnknownEntity(potion))?;
    let spec = card.as_potion().ok_or(EngineError::PotionNotAvailable(potion))?;
    let recipe = spec.ingredients.clone();
    let banish_effects = spec.banish_effects.clone();

    let consumed = match match_ingredients(&state.heroes[player].ingredients, &recipe) {
        Ok(consumed) => consumed,
        Err(missing) => {
            debug!(%player, %potion, ?missing, "brew failed");
            return Ok(BrewOutcome::MissingIngredients { missing });
        }
    };

    let held = &mut state.heroes[player].ingredients;
    for (kind, count) in consumed.iter() {
        held.remove(&kind, count);
    }
    state.brewing.take_potion(potion);
    state.objectives.counters_mut().potions_brewed += 1;
    state.set_owner(potion, player);
    let event = EffectContext::default().with_triggering(potion);

    if banish {
        state.brewing.banished.push(potion);
        let ctx = EffectContext::from_source(potion).with_triggering(potion);
        for effect in &banish_effects {
            EffectEngine::execute(state, effect, player, &ctx);
        }
        info!(%player, %potion, "potion brewed and banished");
        fire(state, TriggerKind::PotionBanished, player, None, &event);
        Ok(BrewOutcome::Banished)
    } else {
        state.heroes[player]
            .zones
            .put(potion, Pile::Discard, ZonePosition::Top);
        info!(%player, %potion, "potion brewed");
        fire(state, TriggerKind::PotionBrewed, player, None, &event);
        Ok(BrewOutcome::Brewed)
    }
}

/// Whether a potion card could be brewed by `player` right now.
#[must_use]
pub fn can_brew(state: &GameState, player: PlayerId, potion: EntityId) -> bool {
    let Some(recipe) = state
        .card_of(potion)
        .filter(|c| c.class == CardClass::Potion)
        .and_then(|c| c.as_potion())
    else {
        return false;
    };
    state
        .heroes
        .try_get(player)
        .is_some_and(|h| match_ingredients(&h.ingredients, &recipe.ingredients).is_ok())
}
