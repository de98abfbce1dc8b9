//! Trigger system for event-driven card abilities.
//!
//! ## Key Components
//!
//! - [`TriggerKind`]: closed set of events a card can listen for
//! - [`Trigger`]: loader-supplied definition (kind, effects, quorum, one-shot)
//! - [`TriggerRegistry`]: registrations keyed by kind, unique per source card
//! - [`activate_trigger`] / [`activate_trigger_for`]: fire a kind against the
//!   game state
//!
//! ## Example Usage
//!
//! ```
//! use coop_deck_engine::core::{EntityId, GameConfig, GameState, PlayerId};
//! use coop_deck_engine::cards::CardRegistry;
//! use coop_deck_engine::effects::{Duration, Effect, EffectKind};
//! use coop_deck_engine::triggers::{activate_trigger, TriggerKind};
//!
//! let mut state = GameState::new(GameConfig::new(2).with_seed(1), CardRegistry::new());
//! state.heroes[PlayerId::new(0)].health = 5;
//!
//! state.triggers.register_trigger(
//!     TriggerKind::TurnStart,
//!     vec![Effect::of(EffectKind::GainHealth, 2)],
//!     EntityId(40),
//!     Duration::Instant,
//! );
//!
//! assert_eq!(activate_trigger(&mut state, TriggerKind::TurnStart, PlayerId::new(0)), 1);
//! assert_eq!(state.heroes[PlayerId::new(0)].health, 7);
//! ```

mod event;
mod registry;

pub use event::TriggerKind;
pub use registry::{
    activate_trigger, activate_trigger_for, PendingActivation, Trigger, TriggerRegistry,
};

pub(crate) use registry::fire;
