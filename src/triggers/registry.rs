//! Trigger registry.
//!
//! Cards register their triggers when they enter play (or, for hand-active
//! kinds, when drawn). The registry is keyed by trigger kind, and each
//! (kind, source card) pair is registered at most once.
//!
//! Activation runs in two steps, like any event dispatch over a structure the
//! effects themselves can change: `pending` snapshots the registrations that
//! should fire, then the snapshot is executed against the game state.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{EntityId, GameState, PlayerId};
use crate::effects::{Duration, Effect, EffectContext, EffectEngine, TargetSelector};

use super::event::TriggerKind;

/// A trigger definition as supplied by the loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: TriggerKind,

    /// Effects to execute when fired.
    #[serde(default)]
    pub effects: Vec<Effect>,

    #[serde(default)]
    pub target: TargetSelector,

    /// Fire only on the N-th activation within a turn.
    #[serde(default)]
    pub quorum: Option<u32>,

    /// Remove the registration after it fires once.
    #[serde(default)]
    pub one_shot: bool,

    #[serde(default)]
    pub duration: Duration,
}

impl Trigger {
    /// Create a trigger with no effects.
    #[must_use]
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            effects: Vec::new(),
            target: TargetSelector::default(),
            quorum: None,
            one_shot: false,
            duration: Duration::default(),
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetSelector) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_quorum(mut self, quorum: u32) -> Self {
        self.quorum = Some(quorum);
        self
    }

    #[must_use]
    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

#[derive(Clone, Debug)]
struct Registration {
    source: EntityId,
    effects: Vec<Effect>,
    target: TargetSelector,
    duration: Duration,
    quorum: Option<u32>,
    one_shot: bool,
    /// Activations seen this turn.
    hits: u32,
}

/// A registration selected to fire, detached from the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingActivation {
    pub source: EntityId,
    pub effects: Vec<Effect>,
    pub target: TargetSelector,
}

/// Registry for triggers.
///
/// ```
/// use coop_deck_engine::core::EntityId;
/// use coop_deck_engine::effects::{Duration, Effect, EffectKind};
/// use coop_deck_engine::triggers::{TriggerKind, TriggerRegistry};
///
/// let mut registry = TriggerRegistry::new();
/// let heal = vec![Effect::of(EffectKind::GainHealth, 1)];
///
/// let kind = TriggerKind::AutoDiscard;
/// assert!(registry.register_trigger(kind, heal.clone(), EntityId(3), Duration::Instant));
/// assert!(!registry.register_trigger(kind, heal, EntityId(3), Duration::Instant));
/// assert_eq!(registry.registrations(kind), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TriggerRegistry {
    by_kind: FxHashMap<TriggerKind, Vec<Registration>>,
    keys: FxHashSet<(TriggerKind, EntityId)>,
}

impl TriggerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `effects` under `kind` for `source`.
    ///
    /// Returns false (and changes nothing) if the pair is already registered.
    pub fn register_trigger(
        &mut self,
        kind: TriggerKind,
        effects: Vec<Effect>,
        source: EntityId,
        duration: Duration,
    ) -> bool {
        self.insert(kind, source, Registration {
            source,
            effects,
            target: TargetSelector::default(),
            duration,
            quorum: None,
            one_shot: false,
            hits: 0,
        })
    }

    /// Register a full trigger definition for `source`.
    pub fn register(&mut self, trigger: &Trigger, source: EntityId) -> bool {
        self.insert(trigger.kind, source, Registration {
            source,
            effects: trigger.effects.clone(),
            target: trigger.target,
            duration: trigger.duration,
            quorum: trigger.quorum,
            one_shot: trigger.one_shot,
            hits: 0,
        })
    }

    fn insert(&mut self, kind: TriggerKind, source: EntityId, registration: Registration) -> bool {
        if kind == TriggerKind::Unhandled {
            warn!(%source, "ignoring trigger of unhandled kind");
            return false;
        }
        if !self.keys.insert((kind, source)) {
            return false;
        }
        self.by_kind.entry(kind).or_default().push(registration);
        true
    }

    /// Delete every registration of `source`, across all kinds.
    pub fn remove_trigger(&mut self, source: EntityId) -> usize {
        self.remove_where(|r| r.source == source)
    }

    /// Delete TEMPORARY registrations. Called at end of turn.
    pub fn remove_temporary_triggers(&mut self) -> usize {
        self.remove_where(|r| r.duration == Duration::Temporary)
    }

    fn remove_where(&mut self, doomed: impl Fn(&Registration) -> bool) -> usize {
        let mut removed = 0;
        let keys = &mut self.keys;
        self.by_kind.retain(|kind, list| {
            list.retain(|r| {
                if doomed(r) {
                    keys.remove(&(*kind, r.source));
                    removed += 1;
                    false
                } else {
                    true
                }
            });
            !list.is_empty()
        });
        removed
    }

    /// Zero the per-turn quorum counters.
    pub fn reset_hits(&mut self) {
        for registration in self.by_kind.values_mut().flatten() {
            registration.hits = 0;
        }
    }

    #[must_use]
    pub fn is_registered(&self, kind: TriggerKind, source: EntityId) -> bool {
        self.keys.contains(&(kind, source))
    }

    /// Number of registrations under `kind`.
    #[must_use]
    pub fn registrations(&self, kind: TriggerKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Sources registered under `kind`, in registration order.
    #[must_use]
    pub fn sources(&self, kind: TriggerKind) -> Vec<EntityId> {
        self.by_kind
            .get(&kind)
            .map(|list| list.iter().map(|r| r.source).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Select the registrations under `kind` that fire now.
    ///
    /// `only` restricts activation to one source card; `suppressed` skips
    /// sources whose ability is currently locked. Quorum counters advance for
    /// every eligible registration, and one-shot registrations that fire are
    /// removed.
    pub fn pending(
        &mut self,
        kind: TriggerKind,
        only: Option<EntityId>,
        suppressed: impl Fn(EntityId) -> bool,
    ) -> Vec<PendingActivation> {
        let Some(list) = self.by_kind.get_mut(&kind) else {
            return Vec::new();
        };

        let mut fired = Vec::new();
        let mut spent = Vec::new();

        for registration in list.iter_mut() {
            if only.is_some_and(|source| source != registration.source) {
                continue;
            }
            if suppressed(registration.source) {
                debug!(source = %registration.source, ?kind, "trigger suppressed");
                continue;
            }
            registration.hits += 1;
            if registration.quorum.is_some_and(|q| registration.hits != q) {
                continue;
            }
            if registration.one_shot {
                spent.push(registration.source);
            }
            fired.push(PendingActivation {
                source: registration.source,
                effects: registration.effects.clone(),
                target: registration.target,
            });
        }

        if !spent.is_empty() {
            list.retain(|r| !spent.contains(&r.source));
            if list.is_empty() {
                self.by_kind.remove(&kind);
            }
            for source in spent {
                self.keys.remove(&(kind, source));
            }
        }

        fired
    }
}

/// Fire every registration under `kind` on behalf of `player`.
///
/// Returns the number of registrations that fired. Absent kinds fire nothing.
pub fn activate_trigger(state: &mut GameState, kind: TriggerKind, player: PlayerId) -> usize {
    fire(state, kind, player, None, &EffectContext::default())
}

/// Fire only the registrations owned by `source`, which is also the
/// triggering card.
pub fn activate_trigger_for(
    state: &mut GameState,
    kind: TriggerKind,
    source: EntityId,
    player: PlayerId,
) -> usize {
    let ctx = EffectContext::default().with_triggering(source);
    fire(state, kind, player, Some(source), &ctx)
}

/// Shared activation path. `ctx` is the context of whatever caused the event.
pub(crate) fn fire(
    state: &mut GameState,
    kind: TriggerKind,
    player: PlayerId,
    only: Option<EntityId>,
    ctx: &EffectContext,
) -> usize {
    // Fired effects run one level below the event, under the same bound as
    // `EffectEngine::execute`.
    let depth = ctx.depth + 1;
    if depth > state.config.max_effect_depth {
        warn!(?kind, depth, "trigger chain too deep, not firing");
        return 0;
    }

    let pending = {
        let villains = &state.villains;
        state.triggers.pending(kind, only, |source| villains.is_locked(source))
    };

    for activation in &pending {
        debug!(?kind, source = %activation.source, "trigger fired");
        let inner = EffectContext {
            source: Some(activation.source),
            triggering: ctx.triggering.or(Some(activation.source)),
            depth,
        };
        let targets: Vec<PlayerId> = match activation.target {
            TargetSelector::AllHeroes => state.heroes.player_ids().collect(),
            TargetSelector::OtherHeroes => state
                .heroes
                .player_ids()
                .filter(|&p| p != state.active_player)
                .collect(),
            _ => vec![player],
        };
        for target in targets {
            for effect in &activation.effects {
                EffectEngine::execute(state, effect, target, &inner);
            }
        }
    }

    pending.len()
}
