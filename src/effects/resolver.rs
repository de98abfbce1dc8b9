//! Effect resolution: applying effects to the game state.
//!
//! `EffectEngine::execute` is the duration-routed entry point used for card
//! plays and trigger activations: lasting effects are registered against
//! their source card and change nothing else. `EffectEngine::resolve`
//! dispatches immediately whatever the duration, which is what the automatic
//! phases use for the ongoing effects of villains, objects, objectives and
//! curses.
//!
//! Neither entry point returns an error. Unknown kinds, empty choices and
//! effects that find nothing to act on come back as a `Resolution` so callers
//! and tests can observe what happened.

use tracing::{debug, info, warn};

use crate::cards::{CardClass, Ingredient, ObjectToken};
use crate::core::{EngineError, EntityId, GameState, PlayerId, Result};
use crate::subsystems::curses;
use crate::triggers::{fire, TriggerKind};
use crate::zones::{Pile, ZonePosition};

use super::effect::{Duration, Effect, TargetSelector};
use super::kind::EffectKind;

/// Outcome of executing one effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// State changed.
    Applied,
    /// Registered in the duration registry; nothing else changed.
    Deferred,
    /// Blocked by an active modifier.
    Suppressed,
    /// Nothing to act on, or a kind with no direct effect.
    Ignored,
    /// Malformed effect or unreachable target. State unchanged.
    Failed(&'static str),
}

impl Resolution {
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Resolution::Applied
    }

    fn merge(self, other: Resolution) -> Resolution {
        match (self, other) {
            (Resolution::Applied, _) | (_, Resolution::Applied) => Resolution::Applied,
            (Resolution::Deferred, _) | (_, Resolution::Deferred) => Resolution::Deferred,
            (first, _) => first,
        }
    }
}

/// Where an effect came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectContext {
    /// Card whose ability is resolving.
    pub source: Option<EntityId>,
    /// Card that caused the triggering event.
    pub triggering: Option<EntityId>,
    /// Nesting depth of effect and trigger chains.
    pub depth: u32,
}

impl EffectContext {
    #[must_use]
    pub fn from_source(source: EntityId) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_triggering(mut self, triggering: EntityId) -> Self {
        self.triggering = Some(triggering);
        self
    }

    /// Same context one level further down.
    #[must_use]
    pub fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    /// The triggering card, falling back to the source.
    #[must_use]
    pub fn subject(&self) -> Option<EntityId> {
        self.triggering.or(self.source)
    }
}

/// Interprets effects against a `GameState`.
pub struct EffectEngine;

impl EffectEngine {
    /// Execute with duration routing.
    ///
    /// INSTANT effects resolve now. TEMPORARY and CONTINUOUS effects are only
    /// registered for the context's source card.
    pub fn execute(
        state: &mut GameState,
        effect: &Effect,
        target: PlayerId,
        ctx: &EffectContext,
    ) -> Resolution {
        if ctx.depth > state.config.max_effect_depth {
            warn!(kind = ?effect.kind, depth = ctx.depth, "effect chain too deep, stopping");
            return Resolution::Failed("effect chain too deep");
        }

        match effect.duration {
            Duration::Instant => Self::resolve(state, effect, target, ctx),
            Duration::Temporary | Duration::Continuous => {
                let Some(source) = ctx.source else {
                    return Resolution::Failed("lasting effect without a source card");
                };
                if effect.duration == Duration::Temporary {
                    state.durations.add_temporary_effect(effect.kind, source);
                } else {
                    state.durations.add_effect(effect.kind, source);
                }
                debug!(
                    kind = ?effect.kind,
                    %source,
                    duration = ?effect.duration,
                    "effect registered"
                );
                Resolution::Deferred
            }
        }
    }

    /// Execute every effect in order. Returns how many applied.
    pub fn execute_all(
        state: &mut GameState,
        effects: &[Effect],
        target: PlayerId,
        ctx: &EffectContext,
    ) -> usize {
        effects
            .iter()
            .filter(|effect| Self::execute(state, effect, target, ctx).is_applied())
            .count()
    }

    /// Dispatch now, ignoring the effect's duration.
    pub fn resolve(
        state: &mut GameState,
        effect: &Effect,
        target: PlayerId,
        ctx: &EffectContext,
    ) -> Resolution {
        if ctx.depth > state.config.max_effect_depth {
            warn!(kind = ?effect.kind, depth = ctx.depth, "effect chain too deep, stopping");
            return Resolution::Failed("effect chain too deep");
        }

        match effect.target {
            TargetSelector::AllHeroes => {
                let heroes: Vec<_> = state.heroes.player_ids().collect();
                Self::fan_out(state, effect, &heroes, ctx)
            }
            TargetSelector::OtherHeroes => {
                let active = state.active_player;
                let heroes: Vec<_> = state.heroes.player_ids().filter(|&p| p != active).collect();
                Self::fan_out(state, effect, &heroes, ctx)
            }
            TargetSelector::AllVillains if effect.kind.targets_villain() => {
                let villains = state.villains.active_ids();
                villains.into_iter().fold(Resolution::Ignored, |acc, villain| {
                    acc.merge(Self::dispatch(state, effect, target, Some(villain), ctx))
                })
            }
            TargetSelector::TriggeringCard => {
                let owner = ctx
                    .subject()
                    .and_then(|card| state.instance(card))
                    .and_then(|instance| instance.owner)
                    .unwrap_or(target);
                Self::dispatch(state, effect, owner, None, ctx)
            }
            TargetSelector::ActiveHero
            | TargetSelector::ChosenHero
            | TargetSelector::MultiChoice
            | TargetSelector::CurrentLocation
            | TargetSelector::AllVillains => Self::dispatch(state, effect, target, None, ctx),
        }
    }

    /// Resolve a CHOICE with an explicit option instead of the first one.
    pub fn resolve_choice(
        state: &mut GameState,
        effect: &Effect,
        option: usize,
        target: PlayerId,
        ctx: &EffectContext,
    ) -> Resolution {
        if effect.kind != EffectKind::Choice {
            return Resolution::Failed("not a choice");
        }
        let Some(chosen) = effect.choices.get(option) else {
            return Resolution::Failed("no such option");
        };
        Self::execute(state, chosen, target, &ctx.deeper())
    }

    fn fan_out(
        state: &mut GameState,
        effect: &Effect,
        heroes: &[PlayerId],
        ctx: &EffectContext,
    ) -> Resolution {
        heroes.iter().fold(Resolution::Ignored, |acc, &hero| {
            acc.merge(Self::dispatch(state, effect, hero, None, ctx))
        })
    }

    fn dispatch(
        state: &mut GameState,
        effect: &Effect,
        player: PlayerId,
        villain: Option<EntityId>,
        ctx: &EffectContext,
    ) -> Resolution {
        if state.heroes.try_get(player).is_none() {
            return Resolution::Failed("target hero does not exist");
        }
        let amount = effect.amount();

        match effect.kind {
            // === Hero resources ===
            EffectKind::GainHealth => heal(state, player, amount, ctx),
            EffectKind::LoseHealth => {
                let amount = if state.durations.is_active(EffectKind::LimitDamageToOne) {
                    amount.min(1)
                } else {
                    amount
                };
                let lost = state.heroes[player].lose_health(amount);
                if lost == 0 {
                    return Resolution::Ignored;
                }
                fire(state, TriggerKind::HeroDamaged, player, None, ctx);
                if state.heroes[player].is_down() {
                    stun_hero(state, player, ctx);
                }
                Resolution::Applied
            }
            EffectKind::GainAttack => {
                if amount <= 0 {
                    return Resolution::Ignored;
                }
                let gained = amount + state.durations.count(EffectKind::AttackBonus) as i64;
                state.heroes[player].attack += gained;
                state.counters_mut().attack_gained += gained;
                fire(state, TriggerKind::AttackGained, player, None, ctx);
                Resolution::Applied
            }
            EffectKind::RemoveAttack => {
                let hero = &mut state.heroes[player];
                hero.attack = (hero.attack - amount.max(0)).max(0);
                Resolution::Applied
            }
            EffectKind::GainInfluence => {
                if amount <= 0 {
                    return Resolution::Ignored;
                }
                let gained = amount + state.durations.count(EffectKind::InfluenceBonus) as i64;
                state.heroes[player].influence += gained;
                state.counters_mut().influence_gained += gained;
                fire(state, TriggerKind::InfluenceGained, player, None, ctx);
                Resolution::Applied
            }
            EffectKind::RemoveInfluence => {
                let hero = &mut state.heroes[player];
                hero.influence = (hero.influence - amount.max(0)).max(0);
                Resolution::Applied
            }
            EffectKind::StunHero => {
                if stun_hero(state, player, ctx) {
                    Resolution::Applied
                } else {
                    Resolution::Ignored
                }
            }
            EffectKind::RestoreFullHealth => {
                if state.durations.is_active(EffectKind::PreventHealing) {
                    return Resolution::Suppressed;
                }
                let missing = state.heroes[player].max_health - state.heroes[player].health;
                heal(state, player, missing, ctx)
            }

            // === Cards ===
            EffectKind::DrawCards => {
                if state.durations.is_active(EffectKind::PreventDrawing) {
                    return Resolution::Suppressed;
                }
                applied_if(draw_cards(state, player, count(amount), ctx) > 0)
            }
            EffectKind::DiscardCards => {
                let mut discarded = 0;
                for _ in 0..count(amount) {
                    let Some(&card) = state.heroes[player].zones.hand().first() else {
                        break;
                    };
                    discard_from_hand(state, player, card, ctx);
                    discarded += 1;
                }
                applied_if(discarded > 0)
            }
            EffectKind::DiscardHand => {
                let hand = state.heroes[player].zones.hand().to_vec();
                for &card in &hand {
                    discard_from_hand(state, player, card, ctx);
                }
                applied_if(!hand.is_empty())
            }
            EffectKind::DiscardAlly => {
                discard_class(state, player, CardClass::Ally, count(amount), ctx)
            }
            EffectKind::DiscardItem => {
                discard_class(state, player, CardClass::Item, count(amount), ctx)
            }
            EffectKind::DiscardSpell => {
                discard_class(state, player, CardClass::Spell, count(amount), ctx)
            }
            EffectKind::ReturnAllyFromDiscard => {
                return_class(state, player, CardClass::Ally, count(amount))
            }
            EffectKind::ReturnItemFromDiscard => {
                return_class(state, player, CardClass::Item, count(amount))
            }
            EffectKind::ReturnSpellFromDiscard => {
                return_class(state, player, CardClass::Spell, count(amount))
            }
            EffectKind::BanishFromHand => {
                let mut banished = 0;
                for _ in 0..count(amount) {
                    let Some(&card) = state.heroes[player].zones.hand().first() else {
                        break;
                    };
                    state.heroes[player].zones.take_from_hand(card);
                    banish(state, card);
                    banished += 1;
                }
                applied_if(banished > 0)
            }
            EffectKind::BanishTriggeringCard => {
                let Some(card) = ctx.subject() else {
                    return Resolution::Failed("no triggering card");
                };
                let owner = state
                    .heroes
                    .iter_mut()
                    .find_map(|(p, hero)| hero.zones.remove(card).map(|_| p));
                match owner {
                    Some(_) => {
                        banish(state, card);
                        Resolution::Applied
                    }
                    None => Resolution::Ignored,
                }
            }
            EffectKind::ShuffleDiscardIntoDeck => {
                let moved = state.heroes[player]
                    .zones
                    .shuffle_discard_into_deck(&mut state.rng);
                applied_if(moved > 0)
            }
            EffectKind::MillCards => {
                let mut milled = 0;
                for _ in 0..count(amount) {
                    let Some(card) = state.heroes[player].zones.mill() else { break };
                    state.purge(card);
                    milled += 1;
                }
                applied_if(milled > 0)
            }

            // === Location ===
            EffectKind::AddLocationMarks => {
                add_location_marks(state, player, count(amount) as u32, ctx)
            }
            EffectKind::RemoveLocationMarks => {
                let Some(location) = state.locations.current_mut() else {
                    return Resolution::Ignored;
                };
                let removed = location.remove_marks(count(amount) as u32);
                if removed == 0 {
                    return Resolution::Ignored;
                }
                fire(state, TriggerKind::LocationMarkRemoved, player, None, ctx);
                Resolution::Applied
            }

            // === Villains ===
            EffectKind::DamageVillain => {
                let Some(target) = villain.or_else(|| villain_target(state, ctx)) else {
                    return Resolution::Ignored;
                };
                applied_if(damage_villain(state, target, amount, player, ctx) > 0)
            }
            EffectKind::HealVillains => {
                debug!("HEAL_VILLAINS has no effect");
                Resolution::Ignored
            }
            EffectKind::LockVillainAbility => {
                let Some(target) = villain.or_else(|| villain_target(state, ctx)) else {
                    return Resolution::Ignored;
                };
                if !state.lock_villain(target, player) {
                    return Resolution::Ignored;
                }
                debug!(villain = %target, %player, "villain ability locked");
                Resolution::Applied
            }
            EffectKind::UnlockVillainAbility => {
                let Some(target) = villain.or_else(|| villain_target(state, ctx)) else {
                    return Resolution::Ignored;
                };
                if state.unlock_villain(target) {
                    Resolution::Applied
                } else {
                    Resolution::Ignored
                }
            }

            // === Magical objects ===
            EffectKind::AssignAttackToken => {
                assign_to_first_object(state, ObjectToken::Attack, player, ctx)
            }
            EffectKind::AssignInfluenceToken => {
                assign_to_first_object(state, ObjectToken::Influence, player, ctx)
            }
            EffectKind::AssignHealthToken => {
                assign_to_first_object(state, ObjectToken::Health, player, ctx)
            }
            EffectKind::AssignCardToken => {
                assign_to_first_object(state, ObjectToken::Card, player, ctx)
            }

            // === Brewing and curses ===
            EffectKind::GainWildIngredient => {
                state.heroes[player].ingredients.add(Ingredient::Wild, 1);
                Resolution::Applied
            }
            EffectKind::GainRandomIngredient => {
                let ingredient = state.brewing.draw_from_pool();
                state.heroes[player].ingredients.add(ingredient, 1);
                debug!(%player, %ingredient, "random ingredient gained");
                Resolution::Applied
            }
            EffectKind::LoseIngredient => {
                let held = &mut state.heroes[player].ingredients;
                // Lose a specific ingredient before a wild one.
                let lost = held
                    .iter()
                    .map(|(kind, _)| kind)
                    .find(|kind| !kind.is_wild())
                    .or_else(|| (held.count(&Ingredient::Wild) > 0).then_some(Ingredient::Wild));
                match lost {
                    Some(kind) => {
                        held.remove(&kind, 1);
                        Resolution::Applied
                    }
                    None => Resolution::Ignored,
                }
            }
            EffectKind::DrawCursePotion => {
                if !state.config.subsystems.ongoing_curses {
                    debug!("curse potions disabled, ignoring DRAW_CURSE_POTION");
                    return Resolution::Ignored;
                }
                applied_if(curses::draw_curse_potion(state, player, ctx).is_some())
            }
            EffectKind::RemoveCursePotion => {
                applied_if(curses::remove_curse_potion(state, player).is_some())
            }
            EffectKind::RemoveAllCursePotions => {
                applied_if(curses::remove_all_curse_potions(state, player) > 0)
            }

            // === Composition ===
            EffectKind::Choice => {
                let Some(first) = effect.choices.first() else {
                    return Resolution::Failed("choice without options");
                };
                debug!(options = effect.choices.len(), "auto-resolving choice with first option");
                Self::execute(state, first, player, &ctx.deeper())
            }
            EffectKind::AllOf => {
                let inner = ctx.deeper();
                effect.choices.iter().fold(Resolution::Ignored, |acc, member| {
                    acc.merge(Self::execute(state, member, player, &inner))
                })
            }
            EffectKind::Repeat => {
                let Some(body) = effect.repeat.as_deref() else {
                    return Resolution::Failed("repeat without a body");
                };
                let inner = ctx.deeper();
                (0..count(amount)).fold(Resolution::Ignored, |acc, _| {
                    acc.merge(Self::execute(state, body, player, &inner))
                })
            }

            // === Rule modifiers ===
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
            | EffectKind::BlockItems => {
                debug!(kind = ?effect.kind, "modifier dispatched directly, nothing to do");
                Resolution::Ignored
            }

            EffectKind::Unhandled => {
                warn!(source = ?ctx.source, "unhandled effect kind ignored");
                Resolution::Ignored
            }
        }
    }
}

fn count(amount: i64) -> usize {
    usize::try_from(amount).unwrap_or(0)
}

fn applied_if(changed: bool) -> Resolution {
    if changed {
        Resolution::Applied
    } else {
        Resolution::Ignored
    }
}

fn heal(state: &mut GameState, player: PlayerId, amount: i64, ctx: &EffectContext) -> Resolution {
    if state.durations.is_active(EffectKind::PreventHealing) {
        return Resolution::Suppressed;
    }
    let gained = state.heroes[player].gain_health(amount);
    if gained == 0 {
        return Resolution::Ignored;
    }
    if player != state.active_player {
        state.counters_mut().other_heroes_healed += 1;
    }
    fire(state, TriggerKind::HeroHealed, player, None, ctx);
    Resolution::Applied
}

/// Villain addressed by a villain effect: the triggering card, then the
/// source, if either is a villain in play; otherwise the first villain.
fn villain_target(state: &GameState, ctx: &EffectContext) -> Option<EntityId> {
    [ctx.triggering, ctx.source]
        .into_iter()
        .flatten()
        .find(|&card| state.villains.get(card).is_some())
        .or_else(|| state.villains.active.first().map(|v| v.entity_id))
}

fn banish(state: &mut GameState, card: EntityId) {
    state.purge(card);
    state.banished.push(card);
    debug!(%card, "card banished");
}

fn discard_class(
    state: &mut GameState,
    player: PlayerId,
    class: CardClass,
    count: usize,
    ctx: &EffectContext,
) -> Resolution {
    let matching: Vec<_> = state.heroes[player]
        .zones
        .hand()
        .iter()
        .copied()
        .filter(|&card| state.class_of(card) == Some(class))
        .take(count)
        .collect();
    for &card in &matching {
        discard_from_hand(state, player, card, ctx);
    }
    applied_if(!matching.is_empty())
}

fn return_class(
    state: &mut GameState,
    player: PlayerId,
    class: CardClass,
    count: usize,
) -> Resolution {
    let matching: Vec<_> = state.heroes[player]
        .zones
        .discard()
        .iter()
        .copied()
        .filter(|&card| state.class_of(card) == Some(class))
        .collect();
    let mut returned = 0;
    for _ in 0..count {
        let Some(card) = state.heroes[player]
            .zones
            .return_from_discard(|card| matching.contains(&card))
        else {
            break;
        };
        state.register_hand_triggers(card);
        returned += 1;
    }
    applied_if(returned > 0)
}

fn assign_to_first_object(
    state: &mut GameState,
    token: ObjectToken,
    player: PlayerId,
    ctx: &EffectContext,
) -> Resolution {
    let Some(object) = state
        .magical_objects
        .iter()
        .find(|o| o.accepts(token))
        .map(|o| o.entity_id)
    else {
        return Resolution::Ignored;
    };
    match assign_object_token(state, object, token, player, ctx) {
        Ok(()) => Resolution::Applied,
        Err(_) => Resolution::Ignored,
    }
}

/// Draw `count` cards one at a time, firing CARD_DRAWN for each.
///
/// Does not consult PREVENT_DRAWING; the END_TURN refill uses the raw draw.
pub fn draw_cards(
    state: &mut GameState,
    player: PlayerId,
    count: usize,
    ctx: &EffectContext,
) -> usize {
    let mut drawn = 0;
    for _ in 0..count {
        let Some(card) = state.draw_card(player) else { break };
        drawn += 1;
        fire(state, TriggerKind::CardDrawn, player, None, &ctx.with_triggering(card));
    }
    drawn
}

/// Discard one card from hand, firing its AUTO_DISCARD ability.
pub fn discard_from_hand(
    state: &mut GameState,
    player: PlayerId,
    card: EntityId,
    ctx: &EffectContext,
) -> bool {
    if !state.heroes[player].zones.discard_from_hand(card) {
        return false;
    }
    state.counters_mut().discards += 1;
    fire(state, TriggerKind::AutoDiscard, player, Some(card), &ctx.with_triggering(card));
    state.purge(card);
    true
}

/// Knock a hero out.
///
/// Returns false if the hero was already stunned.
pub fn stun_hero(state: &mut GameState, player: PlayerId, ctx: &EffectContext) -> bool {
    let hero = &mut state.heroes[player];
    if hero.stunned {
        return false;
    }
    hero.stunned = true;
    hero.health = 0;
    hero.reset_tokens();
    let discards = hero.zones.hand_size() / 2;
    info!(%player, discards, "hero stunned");

    for _ in 0..discards {
        let Some(&card) = state.heroes[player].zones.hand().first() else { break };
        discard_from_hand(state, player, card, ctx);
    }
    add_location_marks(state, player, 1, ctx);
    state.counters_mut().heroes_stunned += 1;
    fire(state, TriggerKind::HeroStunned, player, None, ctx);
    true
}

/// Add marks to the current location.
///
/// Crossing the threshold is reported, not enforced.
pub fn add_location_marks(
    state: &mut GameState,
    player: PlayerId,
    marks: u32,
    ctx: &EffectContext,
) -> Resolution {
    if marks == 0 {
        return Resolution::Ignored;
    }
    if state.durations.is_active(EffectKind::PreventLocationMarks) {
        return Resolution::Suppressed;
    }
    let Some(location) = state.locations.current_mut() else {
        return Resolution::Ignored;
    };
    if location.add_marks(marks) {
        warn!(location = %location.name, marks = location.marks, "location is full");
    }
    fire(state, TriggerKind::LocationMarkAdded, player, None, ctx);
    Resolution::Applied
}

/// Damage a villain in play, defeating it when damage reaches its health.
///
/// Returns the damage actually dealt.
pub fn damage_villain(
    state: &mut GameState,
    villain: EntityId,
    amount: i64,
    player: PlayerId,
    ctx: &EffectContext,
) -> i64 {
    let Some(target) = state.villains.get_mut(villain) else {
        return 0;
    };
    let dealt = target.apply_damage(amount);
    let defeated = !target.is_alive();
    if dealt == 0 {
        return 0;
    }

    let event = ctx.with_triggering(villain);
    fire(state, TriggerKind::VillainDamaged, player, None, &event);
    if defeated {
        defeat_villain(state, villain, player, &event);
    }
    dealt
}

fn defeat_villain(state: &mut GameState, villain: EntityId, player: PlayerId, ctx: &EffectContext) {
    let Some(defeated) = state.villains.defeat(villain) else {
        return;
    };
    let reward = defeated.reward.clone();
    info!(villain = %defeated.name, %player, "villain defeated");

    state.counters_mut().villains_defeated += 1;
    state.purge(villain);
    let reward_ctx = ctx.deeper().with_source(villain);
    EffectEngine::execute_all(state, &reward, player, &reward_ctx);
    fire(state, TriggerKind::VillainDefeated, player, None, ctx);
}

/// Assign one token to a magical object in play.
///
/// A destroyed object leaves play and its registrations are purged.
pub fn assign_object_token(
    state: &mut GameState,
    object: EntityId,
    token: ObjectToken,
    player: PlayerId,
    ctx: &EffectContext,
) -> Result<()> {
    let Some(target) = state.magical_objects.iter_mut().find(|o| o.entity_id == object) else {
        return Err(EngineError::ObjectNotInPlay(object));
    };
    if !target.assign(token) {
        return Err(EngineError::TokenRejected(format!(
            "{} does not need a {token:?} token",
            target.name
        )));
    }
    let destroyed = target.is_destroyed();

    let event = ctx.with_triggering(object);
    fire(state, TriggerKind::ObjectTokenAssigned, player, None, &event);
    if destroyed {
        if let Some(pos) = state.magical_objects.iter().position(|o| o.entity_id == object) {
            let removed = state.magical_objects.remove(pos);
            info!(object = %removed.name, %player, "magical object destroyed");
        }
        state.purge(object);
        fire(state, TriggerKind::MagicalObjectDestroyed, player, None, &event);
    }
    Ok(())
}

/// Put a bought card where it belongs for `player`.
pub(crate) fn place_acquired(state: &mut GameState, player: PlayerId, card: EntityId) {
    let (pile, position) = if state.durations.is_active(EffectKind::AcquireToDeckTop) {
        (Pile::Deck, ZonePosition::Top)
    } else {
        (Pile::Discard, ZonePosition::Top)
    };
    state.heroes[player].zones.put(card, pile, position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, CardRegistry};
    use crate::core::GameConfig;

    fn state() -> GameState {
        let registry = CardRegistry::from_cards([
            Card::new(CardId::new(1), "Apprentice", CardClass::Ally),
            Card::new(CardId::new(2), "Wand", CardClass::Item),
            Card::villain(CardId::new(3), "Troll", 3),
        ])
        .unwrap();
        GameState::new(GameConfig::new(2).with_seed(7), registry)
    }

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    #[test]
    fn test_gain_health_from_zero() {
        let mut state = state();
        state.heroes[p0()].health = 0;

        let outcome = EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::GainHealth, 3),
            p0(),
            &EffectContext::default(),
        );

        assert_eq!(outcome, Resolution::Applied);
        assert_eq!(state.heroes[p0()].health, 3);
    }

    #[test]
    fn test_temporary_effect_is_registered_not_applied() {
        let mut state = state();
        let source = EntityId(100);
        let effect = Effect::of(EffectKind::GainAttack, 2).temporary();

        let outcome = EffectEngine::execute(
            &mut state,
            &effect,
            p0(),
            &EffectContext::from_source(source),
        );

        assert_eq!(outcome, Resolution::Deferred);
        assert_eq!(state.heroes[p0()].attack, 0);
        assert!(state.durations.is_temporary(source));
    }

    #[test]
    fn test_lasting_effect_without_source_fails() {
        let mut state = state();
        let effect = Effect::new(EffectKind::PreventHealing).continuous();

        let outcome = EffectEngine::execute(&mut state, &effect, p0(), &EffectContext::default());

        assert!(matches!(outcome, Resolution::Failed(_)));
        assert!(state.durations.is_empty());
    }

    #[test]
    fn test_prevent_healing_suppresses() {
        let mut state = state();
        state.heroes[p0()].health = 5;
        state.durations.add_effect(EffectKind::PreventHealing, EntityId(100));

        let outcome = EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::GainHealth, 3),
            p0(),
            &EffectContext::default(),
        );

        assert_eq!(outcome, Resolution::Suppressed);
        assert_eq!(state.heroes[p0()].health, 5);
    }

    #[test]
    fn test_limit_damage_to_one() {
        let mut state = state();
        state.durations.add_effect(EffectKind::LimitDamageToOne, EntityId(100));

        EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::LoseHealth, 4),
            p0(),
            &EffectContext::default(),
        );

        assert_eq!(state.heroes[p0()].health, state.config.starting_health - 1);
    }

    #[test]
    fn test_attack_bonus_per_source() {
        let mut state = state();
        state.durations.add_effect(EffectKind::AttackBonus, EntityId(100));
        state.durations.add_effect(EffectKind::AttackBonus, EntityId(101));

        EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::GainAttack, 1),
            p0(),
            &EffectContext::default(),
        );

        assert_eq!(state.heroes[p0()].attack, 3);
        assert_eq!(state.counters().attack_gained, 3);
    }

    #[test]
    fn test_empty_choice_fails_without_mutation() {
        let mut state = state();
        let before = state.heroes[p0()].clone();

        let outcome = EffectEngine::execute(
            &mut state,
            &Effect::choice(Vec::new()),
            p0(),
            &EffectContext::default(),
        );

        assert!(matches!(outcome, Resolution::Failed(_)));
        assert_eq!(state.heroes[p0()], before);
    }

    #[test]
    fn test_choice_picks_first_option_or_explicit_one() {
        let mut state = state();
        let choice = Effect::choice(vec![
            Effect::of(EffectKind::GainAttack, 1),
            Effect::of(EffectKind::GainInfluence, 2),
        ]);

        EffectEngine::execute(&mut state, &choice, p0(), &EffectContext::default());
        assert_eq!(state.heroes[p0()].attack, 1);
        assert_eq!(state.heroes[p0()].influence, 0);

        EffectEngine::resolve_choice(&mut state, &choice, 1, p0(), &EffectContext::default());
        assert_eq!(state.heroes[p0()].influence, 2);

        assert!(matches!(
            EffectEngine::resolve_choice(&mut state, &choice, 5, p0(), &EffectContext::default()),
            Resolution::Failed(_)
        ));
    }

    #[test]
    fn test_repeat_runs_body_amount_times() {
        let mut state = state();
        let repeat = Effect::repeated(Effect::of(EffectKind::GainInfluence, 2), 3);

        EffectEngine::execute(&mut state, &repeat, p0(), &EffectContext::default());

        assert_eq!(state.heroes[p0()].influence, 6);
    }

    #[test]
    fn test_all_heroes_fan_out() {
        let mut state = state();
        let hurt = Effect::of(EffectKind::LoseHealth, 2).with_target(TargetSelector::AllHeroes);

        EffectEngine::execute(&mut state, &hurt, p0(), &EffectContext::default());

        for (_, hero) in state.heroes.iter() {
            assert_eq!(hero.health, state.config.starting_health - 2);
        }
    }

    #[test]
    fn test_other_hero_healed_counter() {
        let mut state = state();
        let p1 = PlayerId::new(1);
        state.heroes[p1].health = 4;

        EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::GainHealth, 2),
            p1,
            &EffectContext::default(),
        );

        assert_eq!(state.counters().other_heroes_healed, 1);
    }

    #[test]
    fn test_lethal_damage_stuns() {
        let mut state = state();
        state.heroes[p0()].attack = 4;

        EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::LoseHealth, 99),
            p0(),
            &EffectContext::default(),
        );

        let hero = &state.heroes[p0()];
        assert!(hero.stunned);
        assert_eq!(hero.attack, 0);
        assert_eq!(state.counters().heroes_stunned, 1);
    }

    #[test]
    fn test_damage_villain_clamps_and_defeats() {
        let mut state = state();
        let troll = state.spawn(CardId::new(3), None).unwrap();
        state.enter_villain(troll).unwrap();

        let dealt = damage_villain(&mut state, troll, 10, p0(), &EffectContext::default());

        assert_eq!(dealt, 3);
        assert!(state.villains.active.is_empty());
        assert_eq!(state.villains.defeated[0].damage, 3);
        assert_eq!(state.counters().villains_defeated, 1);
    }

    #[test]
    fn test_heal_villains_is_a_stub() {
        let mut state = state();
        let outcome = EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::HealVillains, 2),
            p0(),
            &EffectContext::default(),
        );
        assert_eq!(outcome, Resolution::Ignored);
    }

    #[test]
    fn test_unhandled_is_ignored() {
        let mut state = state();
        let outcome = EffectEngine::execute(
            &mut state,
            &Effect::new(EffectKind::Unhandled),
            p0(),
            &EffectContext::default(),
        );
        assert_eq!(outcome, Resolution::Ignored);
    }

    #[test]
    fn test_discard_ally_only_discards_allies() {
        let mut state = state();
        let ally = state.spawn(CardId::new(1), Some(p0())).unwrap();
        let item = state.spawn(CardId::new(2), Some(p0())).unwrap();
        state.heroes[p0()].zones.put(item, Pile::Hand, ZonePosition::Top);
        state.heroes[p0()].zones.put(ally, Pile::Hand, ZonePosition::Top);

        EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::DiscardAlly, 2),
            p0(),
            &EffectContext::default(),
        );

        assert_eq!(state.heroes[p0()].zones.hand(), &[item]);
        assert_eq!(state.heroes[p0()].zones.discard(), &[ally]);
        assert_eq!(state.counters().discards, 1);
    }

    #[test]
    fn test_depth_limit() {
        let mut state = state();
        let ctx = EffectContext {
            depth: state.config.max_effect_depth + 1,
            ..EffectContext::default()
        };

        let outcome = EffectEngine::execute(
            &mut state,
            &Effect::of(EffectKind::GainAttack, 1),
            p0(),
            &ctx,
        );

        assert!(matches!(outcome, Resolution::Failed(_)));
        assert_eq!(state.heroes[p0()].attack, 0);
    }
}
