//! Card system: definitions, instances, registry, and the runtime state of
//! board cards.
//!
//! ## Key Types
//!
//! - `CardId`: identifier for card definitions
//! - `Card`: static card data; `CardKind` carries type-specific fields
//! - `CardInstance`: one copy of a card in a game
//! - `CardRegistry`: card definition lookup
//! - `Villain`, `Location`, `MagicalObject`, `StoryObjective`, `CurseInPlay`:
//!   mutable per-game state of board cards
//!
//! ## Neutral Cards
//!
//! Cards can have `owner: None` for the shared market and board cards.

pub mod curse;
pub mod definition;
pub mod instance;
pub mod location;
pub mod magical_object;
pub mod potion;
pub mod registry;
pub mod story;
pub mod villain;

pub use curse::CurseInPlay;
pub use definition::{
    Card, CardClass, CardId, CardKind, CurseSpec, LocationSpec, MagicalObjectSpec, PotionSpec,
    StoryObjectiveSpec, VillainSpec,
};
pub use instance::CardInstance;
pub use location::Location;
pub use magical_object::{MagicalObject, ObjectToken};
pub use potion::Ingredient;
pub use registry::CardRegistry;
pub use story::{ObjectiveCondition, StoryObjective};
pub use villain::Villain;
