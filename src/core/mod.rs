//! Core engine types: entities, players, heroes, the shared board, RNG,
//! configuration, errors and the game state that ties them together.

pub mod board;
pub mod config;
pub mod entity;
pub mod error;
pub mod hero;
pub mod multiset;
pub mod player;
pub mod rng;
pub mod state;

pub use board::{DarkEventDeck, LocationTrack, Market, VillainBoard};
pub use config::{GameConfig, Subsystems};
pub use entity::EntityId;
pub use error::{EngineError, Result};
pub use hero::Hero;
pub use multiset::Multiset;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::GameState;
