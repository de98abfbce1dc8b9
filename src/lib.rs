//! # coop-deck-engine
//!
//! Rules engine for a cooperative deck-building card game: heroes play cards
//! from their own decks to fight villains together while dark events, curses
//! and villain abilities wear them down.
//!
//! ## Design Principles
//!
//! 1. **Closed vocabularies**: effect kinds, trigger kinds and phases are
//!    enums matched exhaustively. Unknown tags from card data load as an
//!    explicit `Unhandled` variant and are logged, never fatal.
//!
//! 2. **N-Player First**: every seat is a `PlayerId` into a `PlayerMap`. No
//!    API assumes a particular table size.
//!
//! 3. **Configuration Over Convention**: optional subsystems (magical
//!    objects, potions, story objectives, ongoing curses) are switched on in
//!    `GameConfig` and the turn structure follows from that snapshot.
//!
//! 4. **Deterministic**: all randomness flows from a seeded `GameRng`, with
//!    separate streams for dark events and ingredients.
//!
//! ## Modules
//!
//! - `core`: entity ids, players, heroes, board areas, state, RNG, config,
//!   errors
//! - `zones`: each hero's deck, hand, discard and in-play piles
//! - `cards`: card definitions, the registry and runtime board cards
//! - `effects`: effect kinds, the duration registry and the effect engine
//! - `triggers`: event kinds and the trigger registry
//! - `subsystems`: story objectives, potion brewing, ongoing curses
//! - `rules`: turn phases, the `Game` state machine and `GameBuilder`
//!
//! ## Logging
//!
//! The crate emits `tracing` events and installs no subscriber; hosts choose
//! their own.

pub mod cards;
pub mod core;
pub mod effects;
pub mod rules;
pub mod subsystems;
pub mod triggers;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    EngineError, EntityId, GameConfig, GameRng, GameRngState, GameState, Hero, Multiset, PlayerId,
    PlayerMap, Result, Subsystems,
};

pub use crate::zones::{HeroZones, Pile, ZonePosition};

pub use crate::cards::{
    Card, CardClass, CardId, CardInstance, CardKind, CardRegistry, Ingredient, ObjectToken,
    ObjectiveCondition,
};

pub use crate::effects::{
    Duration, DurationRegistry, Effect, EffectContext, EffectEngine, EffectKind, Resolution,
    TargetSelector,
};

pub use crate::triggers::{
    activate_trigger, activate_trigger_for, Trigger, TriggerKind, TriggerRegistry,
};

pub use crate::subsystems::{BrewOutcome, ShelfSide, SlotRequirement, TurnCounters};

pub use crate::rules::{Game, GameBuilder, GameStatus, PhaseRecord, TurnPhase};
