//! Card definitions - static card data.
//!
//! A `Card` holds the immutable data the loader supplies for one card: the
//! effects it runs when played, the triggers it registers, and a `CardKind`
//! carrying the fields only some card types have (villain health, location
//! threshold, potion recipe and so on).
//!
//! Mutable per-game state (villain damage, location marks, assigned tokens)
//! lives in the runtime types built from these definitions.

use serde::{Deserialize, Serialize};

use super::magical_object::ObjectToken;
use super::potion::Ingredient;
use super::story::ObjectiveCondition;
use crate::core::Multiset;
use crate::effects::Effect;
use crate::triggers::Trigger;

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g. a particular ally), not a copy
/// of it in a game. Copies are `EntityId`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Category of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardClass {
    Ally,
    Spell,
    Item,
    Potion,
    Villain,
    Location,
    DarkEvent,
    MagicalObject,
    StoryObjective,
    CursePotion,
}

/// Villain fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillainSpec {
    pub health: i64,
    /// Runs for the active hero when the villain is defeated.
    #[serde(default)]
    pub reward: Vec<Effect>,
}

/// Location fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSpec {
    pub mark_threshold: u32,
    /// Runs when the location is revealed.
    #[serde(default)]
    pub entry_effects: Vec<Effect>,
}

/// Magical-object fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicalObjectSpec {
    /// Tokens that destroy the object once all are assigned.
    pub required: Multiset<ObjectToken>,
}

/// Story-objective fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryObjectiveSpec {
    pub pack: u32,
    pub order: u32,
    /// Villain definitions tied to this objective.
    #[serde(default)]
    pub villains: Vec<CardId>,
    /// Negative effects resolved each turn while the objective is open.
    #[serde(default)]
    pub continuous_effects: Vec<Effect>,
    pub condition: ObjectiveCondition,
    #[serde(default)]
    pub required_value: i64,
    #[serde(default)]
    pub reward: Vec<Effect>,
}

/// Potion fields. The normal effects are the card's `effects`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionSpec {
    pub ingredients: Multiset<Ingredient>,
    /// Run instead of the normal effects when the potion is banished on brew.
    #[serde(default)]
    pub banish_effects: Vec<Effect>,
}

/// Curse-potion fields. Immediate effects are the card's `effects`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurseSpec {
    /// Resolved at the start of each of the owner's turns.
    pub ongoing_effects: Vec<Effect>,
    pub block_allies: bool,
    pub block_spells: bool,
    pub block_items: bool,
}

/// Type-specific card data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardKind {
    /// Allies, spells, items and dark events need nothing extra.
    #[default]
    Ordinary,
    Villain(VillainSpec),
    Location(LocationSpec),
    MagicalObject(MagicalObjectSpec),
    StoryObjective(StoryObjectiveSpec),
    Potion(PotionSpec),
    OngoingCurse(CurseSpec),
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use coop_deck_engine::cards::{Card, CardClass, CardId};
/// use coop_deck_engine::effects::{Effect, EffectKind};
///
/// let ally = Card::new(CardId::new(1), "Loyal Friend", CardClass::Ally)
///     .with_cost(3)
///     .with_effect(Effect::of(EffectKind::GainHealth, 2));
///
/// assert_eq!(ally.cost, 3);
/// assert_eq!(ally.effects.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub class: CardClass,

    #[serde(default)]
    pub description: String,

    /// Influence needed to acquire; also the card's value for brewing slots.
    #[serde(default)]
    pub cost: i64,

    /// Opaque asset reference for the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub effects: Vec<Effect>,

    #[serde(default)]
    pub triggers: Vec<Trigger>,

    #[serde(default)]
    pub kind: CardKind,
}

impl Card {
    /// Create an ordinary card with no effects.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, class: CardClass) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            description: String::new(),
            cost: 0,
            image: None,
            effects: Vec::new(),
            triggers: Vec::new(),
            kind: CardKind::Ordinary,
        }
    }

    /// A villain with the given health and no reward.
    #[must_use]
    pub fn villain(id: CardId, name: impl Into<String>, health: i64) -> Self {
        Self::new(id, name, CardClass::Villain).with_kind(CardKind::Villain(VillainSpec {
            health,
            reward: Vec::new(),
        }))
    }

    /// A location holding up to `mark_threshold` marks.
    #[must_use]
    pub fn location(id: CardId, name: impl Into<String>, mark_threshold: u32) -> Self {
        Self::new(id, name, CardClass::Location).with_kind(CardKind::Location(LocationSpec {
            mark_threshold,
            entry_effects: Vec::new(),
        }))
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i64) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a trigger (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: CardKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add a reward effect if this is a villain; otherwise unchanged.
    #[must_use]
    pub fn with_reward(mut self, effect: Effect) -> Self {
        match &mut self.kind {
            CardKind::Villain(spec) => spec.reward.push(effect),
            CardKind::StoryObjective(spec) => spec.reward.push(effect),
            _ => {}
        }
        self
    }

    #[must_use]
    pub fn as_villain(&self) -> Option<&VillainSpec> {
        match &self.kind {
            CardKind::Villain(spec) => Some(spec),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_location(&self) -> Option<&LocationSpec> {
        match &self.kind {
            CardKind::Location(spec) => Some(spec),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_magical_object(&self) -> Option<&MagicalObjectSpec> {
        match &self.kind {
            CardKind::MagicalObject(spec) => Some(spec),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_story_objective(&self) -> Option<&StoryObjectiveSpec> {
        match &self.kind {
            CardKind::StoryObjective(spec) => Some(spec),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_potion(&self) -> Option<&PotionSpec> {
        match &self.kind {
            CardKind::Potion(spec) => Some(spec),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_curse(&self) -> Option<&CurseSpec> {
        match &self.kind {
            CardKind::OngoingCurse(spec) => Some(spec),
            _ => None,
        }
    }
}
