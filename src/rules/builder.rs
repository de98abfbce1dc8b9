//! Assembling a game from card lists.

use tracing::debug;

use super::engine::Game;
use crate::cards::{CardId, CardRegistry};
use crate::core::{DarkEventDeck, EntityId, GameConfig, GameState, PlayerId, Result};
use crate::zones::HeroZones;

/// Builder for creating a `Game`.
///
/// Every list names card definitions; the builder spawns the instances,
/// shuffles the decks and deals the opening hands.
///
/// ```
/// use coop_deck_engine::cards::{Card, CardClass, CardId, CardRegistry};
/// use coop_deck_engine::core::GameConfig;
/// use coop_deck_engine::rules::{GameBuilder, TurnPhase};
///
/// let registry = CardRegistry::from_cards([
///     Card::new(CardId::new(1), "Spark", CardClass::Spell),
///     Card::villain(CardId::new(2), "Ogre", 5),
/// ])
/// .unwrap();
///
/// let mut game = GameBuilder::new(GameConfig::new(2).with_seed(11), registry)
///     .starting_deck(vec![CardId::new(1); 8])
///     .villains(vec![CardId::new(2)])
///     .build()
///     .unwrap();
///
/// game.start().unwrap();
/// assert_eq!(game.phase(), TurnPhase::DarkEvent);
/// assert_eq!(game.active_villains().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct GameBuilder {
    config: GameConfig,
    registry: CardRegistry,
    starting_deck: Vec<CardId>,
    hero_decks: Vec<(PlayerId, Vec<CardId>)>,
    market: Vec<CardId>,
    villains: Vec<CardId>,
    locations: Vec<CardId>,
    dark_events: Vec<CardId>,
    magical_objects: Vec<CardId>,
    story_objectives: Vec<CardId>,
    potions: Vec<CardId>,
    potion_display: usize,
    curses: Vec<CardId>,
}

impl GameBuilder {
    pub fn new(config: GameConfig, registry: CardRegistry) -> Self {
        Self {
            config,
            registry,
            starting_deck: Vec::new(),
            hero_decks: Vec::new(),
            market: Vec::new(),
            villains: Vec::new(),
            locations: Vec::new(),
            dark_events: Vec::new(),
            magical_objects: Vec::new(),
            story_objectives: Vec::new(),
            potions: Vec::new(),
            potion_display: 3,
            curses: Vec::new(),
        }
    }

    /// Deck every hero starts with unless given their own.
    pub fn starting_deck(mut self, cards: Vec<CardId>) -> Self {
        self.starting_deck = cards;
        self
    }

    /// Deck for one hero, replacing the shared starting deck.
    pub fn hero_deck(mut self, player: PlayerId, cards: Vec<CardId>) -> Self {
        self.hero_decks.push((player, cards));
        self
    }

    pub fn market(mut self, cards: Vec<CardId>) -> Self {
        self.market = cards;
        self
    }

    pub fn villains(mut self, cards: Vec<CardId>) -> Self {
        self.villains = cards;
        self
    }

    /// Locations in track order. Not shuffled.
    pub fn locations(mut self, cards: Vec<CardId>) -> Self {
        self.locations = cards;
        self
    }

    pub fn dark_events(mut self, cards: Vec<CardId>) -> Self {
        self.dark_events = cards;
        self
    }

    pub fn magical_objects(mut self, cards: Vec<CardId>) -> Self {
        self.magical_objects = cards;
        self
    }

    pub fn story_objectives(mut self, cards: Vec<CardId>) -> Self {
        self.story_objectives = cards;
        self
    }

    /// Potion deck and how many potions are face-up at once.
    pub fn potions(mut self, cards: Vec<CardId>, display: usize) -> Self {
        self.potions = cards;
        self.potion_display = display;
        self
    }

    pub fn curses(mut self, cards: Vec<CardId>) -> Self {
        self.curses = cards;
        self
    }

    /// Build the game. Fails on an invalid configuration, unknown cards or
    /// cards of the wrong kind.
    pub fn build(self) -> Result<Game> {
        self.config.validate()?;
        let subsystems = self.config.subsystems;
        let mut state = GameState::new(self.config, self.registry);

        let players: Vec<_> = state.heroes.player_ids().collect();
        for player in players {
            let cards = self
                .hero_decks
                .iter()
                .find(|(p, _)| *p == player)
                .map_or(&self.starting_deck, |(_, cards)| cards);
            let deck = spawn_shuffled(&mut state, cards, Some(player))?;
            state.hero_mut(player)?.zones = HeroZones::with_deck(deck);
            state.draw_up_to_hand_size(player);
        }

        state.market.deck = spawn_shuffled(&mut state, &self.market, None)?;
        state.refill_market();

        state.villains.deck = spawn_shuffled(&mut state, &self.villains, None)?;
        state.refill_villains()?;

        for &location in &self.locations {
            state.add_location(location)?;
        }

        let events = spawn_all(&mut state, &self.dark_events, None)?;
        state.dark_events = DarkEventDeck::new(events, state.rng.for_context("dark_events"));

        if subsystems.magical_objects {
            for &object in &self.magical_objects {
                state.add_magical_object(object)?;
            }
        }
        if subsystems.story_objectives {
            state.set_story_objectives(&self.story_objectives)?;
        }
        if subsystems.potions {
            let potions = spawn_shuffled(&mut state, &self.potions, None)?;
            state.brewing.set_potions(potions, self.potion_display);
        }
        if subsystems.ongoing_curses {
            let curses = spawn_shuffled(&mut state, &self.curses, None)?;
            state.curses.set_deck(curses);
        }

        debug!(
            players = state.player_count(),
            villains = state.villains.active.len(),
            locations = state.locations.locations.len(),
            "game built"
        );
        Ok(Game::new(state))
    }
}

fn spawn_all(
    state: &mut GameState,
    cards: &[CardId],
    owner: Option<PlayerId>,
) -> Result<Vec<EntityId>> {
    cards.iter().map(|&card| state.spawn(card, owner)).collect()
}

fn spawn_shuffled(
    state: &mut GameState,
    cards: &[CardId],
    owner: Option<PlayerId>,
) -> Result<Vec<EntityId>> {
    let mut spawned = spawn_all(state, cards, owner)?;
    state.rng.shuffle(&mut spawned);
    Ok(spawned)
}
