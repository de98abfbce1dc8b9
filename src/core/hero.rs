//! Heroes: the cooperating players' resources and card piles.

use serde::{Deserialize, Serialize};

use super::multiset::Multiset;
use super::player::PlayerId;
use crate::cards::Ingredient;
use crate::zones::HeroZones;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub player: PlayerId,
    pub name: String,
    /// Between 0 and `max_health`.
    pub health: i64,
    pub max_health: i64,
    /// Attack tokens, reset at end of turn.
    pub attack: i64,
    /// Influence tokens, reset at end of turn.
    pub influence: i64,
    pub stunned: bool,
    pub ingredients: Multiset<Ingredient>,
    pub zones: HeroZones,
}

impl Hero {
    #[must_use]
    pub fn new(player: PlayerId, name: impl Into<String>, health: i64, max_health: i64) -> Self {
        Self {
            player,
            name: name.into(),
            health: health.clamp(0, max_health.max(0)),
            max_health: max_health.max(0),
            attack: 0,
            influence: 0,
            stunned: false,
            ingredients: Multiset::new(),
            zones: HeroZones::new(),
        }
    }

    /// Heal up to max health. Returns the health actually gained.
    pub fn gain_health(&mut self, amount: i64) -> i64 {
        let gained = amount.clamp(0, self.max_health - self.health);
        self.health += gained;
        gained
    }

    /// Lose health, floored at 0. Returns the health actually lost.
    pub fn lose_health(&mut self, amount: i64) -> i64 {
        let lost = amount.clamp(0, self.health);
        self.health -= lost;
        lost
    }

    #[must_use]
    pub fn is_down(&self) -> bool {
        self.health == 0
    }

    pub fn restore_full_health(&mut self) {
        self.health = self.max_health;
    }

    /// Drop all attack and influence tokens.
    pub fn reset_tokens(&mut self) {
        self.attack = 0;
        self.influence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_health_caps_at_max() {
        let mut hero = Hero::new(PlayerId::new(0), "A", 8, 10);
        assert_eq!(hero.gain_health(5), 2);
        assert_eq!(hero.health, 10);
    }

    #[test]
    fn test_gain_from_zero() {
        let mut hero = Hero::new(PlayerId::new(0), "A", 0, 10);
        assert_eq!(hero.gain_health(3), 3);
        assert_eq!(hero.health, 3);
    }

    #[test]
    fn test_negative_max_health_does_not_panic() {
        let hero = Hero::new(PlayerId::new(0), "A", 5, -3);
        assert_eq!((hero.health, hero.max_health), (0, 0));
    }

    #[test]
    fn test_lose_health_floors_at_zero() {
        let mut hero = Hero::new(PlayerId::new(0), "A", 2, 10);
        assert_eq!(hero.lose_health(5), 2);
        assert!(hero.is_down());
    }
}
