//! Ongoing curse potions.
//!
//! A curse potion is drawn from the curse deck by an effect. Its immediate
//! effects run at once; if it also has ongoing effects it stays face-up in
//! front of the hero who drew it, and those effects run again at the start
//! of each of that hero's turns until something removes it.

use tracing::{debug, info};

use crate::cards::{CardClass, CurseInPlay};
use crate::core::{EntityId, GameRng, GameState, PlayerId};
use crate::effects::{EffectContext, EffectEngine, EffectKind};
use crate::triggers::{fire, TriggerKind};

/// Curse deck, discard pile and the curses face-up in play.
#[derive(Clone, Debug, Default)]
pub struct CurseResolution {
    deck: Vec<EntityId>,
    discard: Vec<EntityId>,
    in_play: Vec<CurseInPlay>,
}

impl CurseResolution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the curse deck (top = end of vec).
    pub fn set_deck(&mut self, deck: Vec<EntityId>) {
        self.deck = deck;
    }

    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn discard(&self) -> &[EntityId] {
        &self.discard
    }

    #[must_use]
    pub fn in_play(&self) -> &[CurseInPlay] {
        &self.in_play
    }

    /// Curses in front of `player`, oldest first.
    pub fn curses_of(&self, player: PlayerId) -> impl Iterator<Item = &CurseInPlay> {
        self.in_play.iter().filter(move |c| c.owner == player)
    }

    /// Take the top curse, recycling the discard pile when the deck is empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<EntityId> {
        if self.deck.is_empty() && !self.discard.is_empty() {
            self.deck = std::mem::take(&mut self.discard);
            rng.shuffle(&mut self.deck);
        }
        self.deck.pop()
    }

    pub fn put_in_play(&mut self, curse: CurseInPlay) {
        self.in_play.push(curse);
    }

    pub fn discard_curse(&mut self, entity: EntityId) {
        self.discard.push(entity);
    }

    /// Move one curse from play to the discard pile.
    pub fn remove(&mut self, entity: EntityId) -> Option<CurseInPlay> {
        let pos = self.in_play.iter().position(|c| c.entity_id == entity)?;
        let curse = self.in_play.remove(pos);
        self.discard.push(entity);
        Some(curse)
    }

    /// Discard every curse in front of `player`. Returns the removed ids.
    pub fn remove_all_of(&mut self, player: PlayerId) -> Vec<EntityId> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.in_play).into_iter().partition(|c| c.owner == player);
        self.in_play = kept;
        let ids: Vec<_> = removed.iter().map(|c| c.entity_id).collect();
        self.discard.extend_from_slice(&ids);
        ids
    }

    /// Whether a curse in front of `player` blocks `class`.
    #[must_use]
    pub fn blocks(&self, player: PlayerId, class: CardClass) -> bool {
        self.curses_of(player).any(|c| c.blocks(class))
    }
}

/// Draw a curse potion for `player` and resolve it.
///
/// Returns the drawn curse, or `None` when no curse is left anywhere.
pub fn draw_curse_potion(
    state: &mut GameState,
    player: PlayerId,
    ctx: &EffectContext,
) -> Option<EntityId> {
    let curse = state.curses.draw(&mut state.rng)?;
    state.set_owner(curse, player);
    let Some(card) = state.card_of(curse).cloned() else {
        state.curses.discard_curse(curse);
        return Some(curse);
    };

    let inner = ctx.deeper().with_source(curse).with_triggering(curse);
    for effect in &card.effects {
        EffectEngine::execute(state, effect, player, &inner);
    }

    match CurseInPlay::from_card(curse, &card, player) {
        Some(in_play) => {
            info!(%player, curse = %card.name, "curse potion stays in play");
            state.curses.put_in_play(in_play);
        }
        None => {
            debug!(%player, curse = %card.name, "curse potion resolved and discarded");
            state.curses.discard_curse(curse);
        }
    }

    fire(state, TriggerKind::CurseDrawn, player, None, &inner);
    Some(curse)
}

/// Discard the oldest curse in front of `player`.
pub fn remove_curse_potion(state: &mut GameState, player: PlayerId) -> Option<EntityId> {
    let oldest = state.curses.curses_of(player).next()?.entity_id;
    state.curses.remove(oldest);
    state.purge(oldest);
    debug!(%player, curse = %oldest, "curse potion removed");
    Some(oldest)
}

/// Discard every curse in front of `player`.
pub fn remove_all_curse_potions(state: &mut GameState, player: PlayerId) -> usize {
    let removed = state.curses.remove_all_of(player);
    for &curse in &removed {
        state.purge(curse);
    }
    removed.len()
}

/// Run the ongoing effects of every curse in front of `player`.
///
/// Returns the number of curses resolved.
pub fn resolve_ongoing_curses(state: &mut GameState, player: PlayerId) -> usize {
    let ongoing: Vec<_> = state
        .curses
        .curses_of(player)
        .map(|c| (c.entity_id, c.ongoing_effects.clone()))
        .collect();

    for (curse, effects) in &ongoing {
        let ctx = EffectContext::from_source(*curse);
        for effect in effects {
            EffectEngine::resolve(state, effect, player, &ctx);
        }
    }
    ongoing.len()
}

/// Whether `player` is currently forbidden from playing `class` cards.
///
/// Combines curse block flags with BLOCK_* modifiers in the duration registry.
/// Advisory only; the engine does not refuse the play.
#[must_use]
pub fn is_blocked(state: &GameState, player: PlayerId, class: CardClass) -> bool {
    let modifier = match class {
        CardClass::Ally => Some(EffectKind::BlockAllies),
        CardClass::Spell => Some(EffectKind::BlockSpells),
        CardClass::Item => Some(EffectKind::BlockItems),
        _ => None,
    };
    state.curses.blocks(player, class)
        || modifier.is_some_and(|kind| state.durations.is_active(kind))
}
