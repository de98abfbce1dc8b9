//! Effect definitions.
//!
//! An `Effect` is one data-driven instruction from a card: a kind, an
//! optional amount, who it addresses, and how long it lasts. Effects are
//! built once by the loader and never mutated afterwards.
//!
//! ## Composition
//!
//! - `CHOICE`: `choices` holds the alternatives, one of which runs
//! - `ALL_OF`: every effect in `choices` runs in order
//! - `REPEAT`: `repeat` runs `amount` times

use serde::{Deserialize, Serialize};

use super::kind::EffectKind;

/// Who an effect addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetSelector {
    /// The default target passed by the caller (normally the active hero).
    #[default]
    ActiveHero,
    /// Every hero, in turn order.
    AllHeroes,
    /// Every hero except the active one, in turn order.
    OtherHeroes,
    /// A hero picked by the caller before execution.
    ChosenHero,
    /// The card that caused the current trigger (or the source card).
    TriggeringCard,
    /// Every villain in play.
    AllVillains,
    /// The location currently in play.
    CurrentLocation,
    /// Several targets picked by the caller before execution.
    MultiChoice,
}

/// How long an effect applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Duration {
    /// Applies once, right now.
    #[default]
    Instant,
    /// Registered until the end of the current turn.
    Temporary,
    /// Registered until its source card leaves play.
    Continuous,
}

/// A single card instruction.
///
/// ## Example
///
/// ```
/// use coop_deck_engine::effects::{Duration, Effect, EffectKind, TargetSelector};
///
/// let heal_all = Effect::new(EffectKind::GainHealth)
///     .with_amount(2)
///     .with_target(TargetSelector::AllHeroes);
///
/// assert_eq!(heal_all.amount(), 2);
/// assert_eq!(heal_all.duration, Duration::Instant);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,

    #[serde(default)]
    pub amount: Option<i64>,

    #[serde(default)]
    pub target: TargetSelector,

    #[serde(default)]
    pub duration: Duration,

    /// Alternatives for `CHOICE`, members for `ALL_OF`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Effect>,

    /// Body of `REPEAT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Box<Effect>>,
}

impl Effect {
    /// Create an instant effect addressing the active hero.
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            amount: None,
            target: TargetSelector::default(),
            duration: Duration::default(),
            choices: Vec::new(),
            repeat: None,
        }
    }

    /// Shorthand for `new(kind).with_amount(amount)`.
    #[must_use]
    pub fn of(kind: EffectKind, amount: i64) -> Self {
        Self::new(kind).with_amount(amount)
    }

    /// A `CHOICE` between the given options.
    #[must_use]
    pub fn choice(options: Vec<Effect>) -> Self {
        Self::new(EffectKind::Choice).with_choices(options)
    }

    /// An `ALL_OF` running every member.
    #[must_use]
    pub fn all_of(members: Vec<Effect>) -> Self {
        Self::new(EffectKind::AllOf).with_choices(members)
    }

    /// A `REPEAT` running `body` `times` times.
    #[must_use]
    pub fn repeated(body: Effect, times: i64) -> Self {
        Self {
            repeat: Some(Box::new(body)),
            ..Self::of(EffectKind::Repeat, times)
        }
    }

    /// The amount, defaulting to 0.
    #[must_use]
    pub fn amount(&self) -> i64 {
        self.amount.unwrap_or(0)
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetSelector) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Mark as lasting until end of turn.
    #[must_use]
    pub fn temporary(self) -> Self {
        self.with_duration(Duration::Temporary)
    }

    /// Mark as lasting while the source card is in play.
    #[must_use]
    pub fn continuous(self) -> Self {
        self.with_duration(Duration::Continuous)
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Vec<Effect>) -> Self {
        self.choices = choices;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_defaults_to_zero() {
        assert_eq!(Effect::new(EffectKind::DrawCards).amount(), 0);
        assert_eq!(Effect::of(EffectKind::DrawCards, 2).amount(), 2);
    }

    #[test]
    fn test_repeated_wraps_body() {
        let effect = Effect::repeated(Effect::of(EffectKind::GainAttack, 1), 3);
        assert_eq!(effect.kind, EffectKind::Repeat);
        assert_eq!(effect.amount(), 3);
        assert_eq!(effect.repeat.as_deref().map(|e| e.kind), Some(EffectKind::GainAttack));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"kind": "PREVENT_HEALING", "duration": "CONTINUOUS"}"#;
        let effect: Effect = serde_json::from_str(json).unwrap();

        assert_eq!(effect.kind, EffectKind::PreventHealing);
        assert_eq!(effect.amount, None);
        assert_eq!(effect.target, TargetSelector::ActiveHero);
        assert_eq!(effect.duration, Duration::Continuous);
    }

    #[test]
    fn test_deserialize_nested_choice() {
        let json = r#"{
            "kind": "CHOICE",
            "choices": [
                {"kind": "GAIN_HEALTH", "amount": 2},
                {"kind": "DRAW_CARDS", "amount": 1, "target": "ALL_HEROES"}
            ]
        }"#;
        let effect: Effect = serde_json::from_str(json).unwrap();

        assert_eq!(effect.choices.len(), 2);
        assert_eq!(effect.choices[1].target, TargetSelector::AllHeroes);
    }
}
