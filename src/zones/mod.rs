//! Card piles of each hero.
//!
//! ## Key Types
//!
//! - `HeroZones`: deck, hand, discard and in-play piles with draw/discard/shuffle
//! - `Pile`: names one of those piles
//! - `ZonePosition`: top or bottom insertion

pub mod manager;

pub use manager::{HeroZones, Pile, ZonePosition};
