//! Effect system: what card abilities do and how long they last.
//!
//! - `Effect`: a kind, an optional amount, a target selector and a duration
//! - `EffectKind`: the closed set of kinds the engine interprets
//! - `DurationRegistry`: which cards currently apply which lasting modifiers
//! - `EffectEngine`: executes effects against the game state
//!
//! ## Durations
//!
//! INSTANT effects change the state when executed. TEMPORARY and CONTINUOUS
//! effects are recorded in the `DurationRegistry` against their source card
//! and only matter through the rules that consult it: a PREVENT_HEALING
//! modifier turns every later GAIN_HEALTH into a no-op until the end of the
//! turn (TEMPORARY) or until its source leaves play (CONTINUOUS).
//!
//! ```
//! use coop_deck_engine::cards::CardRegistry;
//! use coop_deck_engine::core::{EntityId, GameConfig, GameState, PlayerId};
//! use coop_deck_engine::effects::{Effect, EffectContext, EffectEngine, EffectKind, Resolution};
//!
//! let mut state = GameState::new(GameConfig::new(1).with_seed(3), CardRegistry::new());
//! let hero = PlayerId::new(0);
//! let ward = EffectContext::from_source(EntityId(900));
//!
//! let prevent = Effect::new(EffectKind::PreventHealing).temporary();
//! assert_eq!(EffectEngine::execute(&mut state, &prevent, hero, &ward), Resolution::Deferred);
//!
//! state.heroes[hero].health = 4;
//! let heal = Effect::of(EffectKind::GainHealth, 3);
//! let plain = EffectContext::default();
//! assert_eq!(EffectEngine::execute(&mut state, &heal, hero, &plain), Resolution::Suppressed);
//!
//! state.durations.end_of_turn();
//! assert_eq!(EffectEngine::execute(&mut state, &heal, hero, &plain), Resolution::Applied);
//! assert_eq!(state.heroes[hero].health, 7);
//! ```

mod duration;
mod effect;
mod kind;
mod resolver;

pub use duration::DurationRegistry;
pub use effect::{Duration, Effect, TargetSelector};
pub use kind::EffectKind;
pub use resolver::{
    add_location_marks, assign_object_token, damage_villain, discard_from_hand, draw_cards,
    stun_hero, EffectContext, EffectEngine, Resolution,
};
pub(crate) use resolver::place_acquired;
