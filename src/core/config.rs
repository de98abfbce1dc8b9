//! Game configuration.
//!
//! A `GameConfig` is supplied once when a game is built and is then treated
//! as an immutable snapshot. In particular the `Subsystems` flags decide
//! which optional turn phases exist for the whole game.
//!
//! The struct derives serde with `#[serde(default)]`, so a host can load a
//! partial configuration from any serde format:
//!
//! ```
//! use coop_deck_engine::core::GameConfig;
//!
//! let config = GameConfig::new(3)
//!     .with_seed(42)
//!     .with_potions(true);
//!
//! assert_eq!(config.player_count, 3);
//! assert!(config.subsystems.potions);
//! assert!(!config.subsystems.magical_objects);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Optional subsystems a game may enable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Subsystems {
    /// Adds the MAGICAL_OBJECT phase after VILLAINS.
    pub magical_objects: bool,
    /// Adds the GATHER_INGREDIENTS phase after PLAY_CARDS.
    pub potions: bool,
    /// Story objectives with continuous effects and rewards.
    pub story_objectives: bool,
    /// Curse potions that stay face-up and resolve every turn.
    pub ongoing_curses: bool,
}

impl Subsystems {
    /// Every optional subsystem switched on.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            magical_objects: true,
            potions: true,
            story_objectives: true,
            ongoing_curses: true,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of heroes at the table (1-255).
    pub player_count: usize,

    /// Health every hero starts (and recovers) with.
    pub starting_health: i64,

    /// Upper bound for GAIN_HEALTH.
    pub max_health: i64,

    /// Cards drawn at the end of each turn.
    pub hand_size: usize,

    /// Cards face-up in the shared market.
    pub market_size: usize,

    /// Villains in play at the same time.
    pub villain_slots: usize,

    /// RNG seed. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Deepest nesting of effects/trigger chains before resolution stops.
    pub max_effect_depth: u32,

    /// Optional subsystems.
    pub subsystems: Subsystems,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            starting_health: 10,
            max_health: 10,
            hand_size: 5,
            market_size: 6,
            villain_slots: 3,
            seed: None,
            max_effect_depth: 16,
            subsystems: Subsystems::default(),
        }
    }
}

impl GameConfig {
    /// Create a configuration for the given number of heroes.
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Check values that `new` and the builders cannot enforce, such as
    /// those of a deserialized configuration.
    pub fn validate(&self) -> Result<()> {
        if !(1..=255).contains(&self.player_count) {
            return Err(EngineError::InvalidConfig(format!(
                "player_count must be 1-255, got {}",
                self.player_count
            )));
        }
        if self.max_health < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "max_health must be positive, got {}",
                self.max_health
            )));
        }
        if !(0..=self.max_health).contains(&self.starting_health) {
            return Err(EngineError::InvalidConfig(format!(
                "starting_health must be between 0 and {}, got {}",
                self.max_health, self.starting_health
            )));
        }
        Ok(())
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set starting and maximum health.
    #[must_use]
    pub fn with_health(mut self, starting: i64, max: i64) -> Self {
        self.starting_health = starting;
        self.max_health = max.max(starting);
        self
    }

    /// Set the end-of-turn hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the market size.
    #[must_use]
    pub fn with_market_size(mut self, market_size: usize) -> Self {
        self.market_size = market_size;
        self
    }

    /// Set the number of villain slots.
    #[must_use]
    pub fn with_villain_slots(mut self, slots: usize) -> Self {
        self.villain_slots = slots;
        self
    }

    /// Replace all subsystem flags.
    #[must_use]
    pub fn with_subsystems(mut self, subsystems: Subsystems) -> Self {
        self.subsystems = subsystems;
        self
    }

    /// Toggle the magical-object subsystem.
    #[must_use]
    pub fn with_magical_objects(mut self, enabled: bool) -> Self {
        self.subsystems.magical_objects = enabled;
        self
    }

    /// Toggle the potion-brewing subsystem.
    #[must_use]
    pub fn with_potions(mut self, enabled: bool) -> Self {
        self.subsystems.potions = enabled;
        self
    }

    /// Toggle story objectives.
    #[must_use]
    pub fn with_story_objectives(mut self, enabled: bool) -> Self {
        self.subsystems.story_objectives = enabled;
        self
    }

    /// Toggle ongoing curse potions.
    #[must_use]
    pub fn with_ongoing_curses(mut self, enabled: bool) -> Self {
        self.subsystems.ongoing_curses = enabled;
        self
    }
}
