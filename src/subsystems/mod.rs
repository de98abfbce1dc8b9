//! Optional rule subsystems layered on the core turn loop.
//!
//! - `objective`: story objectives and the per-turn counters shared by every
//!   subsystem
//! - `brewing`: ingredient shelves, recipe matching and potion brewing
//! - `curses`: curse potions whose effects recur every turn

pub mod brewing;
pub mod curses;
pub mod objective;

pub use brewing::{
    brew_potion, can_brew, gather_ingredient, match_ingredients, BrewOutcome, PotionBrewing, Shelf,
    ShelfSide, ShelfSlot, SlotRequirement,
};
pub use curses::{
    draw_curse_potion, is_blocked, remove_all_curse_potions, remove_curse_potion,
    resolve_ongoing_curses, CurseResolution,
};
pub use objective::{ObjectiveTracker, TurnCounters};
