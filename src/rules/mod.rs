//! Turn structure: phases, the `Game` state machine and game assembly.
//!
//! The state machine owns the `GameState`. Hosts drive it with
//! `advance_phase` and the phase-checked actions (`play_card`, `buy_card`,
//! `assign_attack`, ...); everything else happens inside.

pub mod builder;
pub mod engine;
pub mod phase;

pub use builder::GameBuilder;
pub use engine::{Game, GameStatus, PhaseRecord, RefreshHook};
pub use phase::TurnPhase;
