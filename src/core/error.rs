//! Error types for the rules engine.
//!
//! Only lookup misses and illegal external actions are errors. Data-shape
//! problems inside card data (a choice without options, a brew that cannot
//! be paid) are reported through return values instead.

use thiserror::Error;

use super::entity::EntityId;
use super::player::PlayerId;
use crate::cards::CardId;
use crate::rules::TurnPhase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown card definition: {0}")]
    UnknownCard(CardId),

    #[error("Card definition {0} registered twice")]
    DuplicateCard(CardId),

    #[error("{card} is not a {expected} card")]
    WrongCardKind { card: CardId, expected: &'static str },

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("{card} is not in the hand of {player}")]
    NotInHand { card: EntityId, player: PlayerId },

    #[error("{0} is not in the market")]
    NotInMarket(EntityId),

    #[error("{0} is not a villain in play")]
    VillainNotInPlay(EntityId),

    #[error("{0} is not a magical object in play")]
    ObjectNotInPlay(EntityId),

    #[error("{0} is not an available potion")]
    PotionNotAvailable(EntityId),

    #[error("Action requires phase {expected:?}, current phase is {actual:?}")]
    WrongPhase { expected: TurnPhase, actual: TurnPhase },

    #[error("Not enough {resource}: need {needed}, have {available}")]
    Insufficient {
        resource: &'static str,
        needed: i64,
        available: i64,
    },

    #[error("{0} already took its one attack this turn")]
    AttackLimitReached(EntityId),

    #[error("Shelf slot {slot} does not exist")]
    InvalidSlot { slot: usize },

    #[error("Shelf slot {slot} is locked this turn")]
    SlotLocked { slot: usize },

    #[error("Shelf slot {slot} was already used this turn")]
    SlotAlreadyUsed { slot: usize },

    #[error("Shelf slot {slot} is empty")]
    SlotEmpty { slot: usize },

    #[error("Token cannot be assigned: {0}")]
    TokenRejected(String),

    #[error("Subsystem disabled: {0}")]
    SubsystemDisabled(&'static str),

    #[error("No further location")]
    NoMoreLocations,

    #[error("Game has not been started")]
    NotStarted,
}

pub type Result<T> = std::result::Result<T, EngineError>;
