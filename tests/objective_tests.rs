//! Story objective integration tests.

use coop_deck_engine::cards::{
    Card, CardClass, CardId, CardKind, CardRegistry, ObjectiveCondition, StoryObjectiveSpec,
};
use coop_deck_engine::core::{EntityId, GameConfig, PlayerId};
use coop_deck_engine::effects::{Duration, Effect, EffectKind};
use coop_deck_engine::rules::{Game, GameBuilder, TurnPhase};
use coop_deck_engine::triggers::{Trigger, TriggerKind};

const CHARM: CardId = CardId(1);
const SHADE: CardId = CardId(10);
const FOUR_ITEMS: CardId = CardId(70);
const HUNT_SHADE: CardId = CardId(71);
const LONG_NIGHT: CardId = CardId(72);

fn spec(order: u32, condition: ObjectiveCondition, required_value: i64) -> StoryObjectiveSpec {
    StoryObjectiveSpec {
        pack: 1,
        order,
        villains: Vec::new(),
        continuous_effects: Vec::new(),
        condition,
        required_value,
        reward: Vec::new(),
    }
}

fn objective(id: CardId, name: &str, spec: StoryObjectiveSpec) -> Card {
    Card::new(id, name, CardClass::StoryObjective).with_kind(CardKind::StoryObjective(spec))
}

fn registry() -> CardRegistry {
    let four_items = StoryObjectiveSpec {
        reward: vec![Effect::of(EffectKind::GainHealth, 3)],
        ..spec(1, ObjectiveCondition::ItemsPlayed, 4)
    };
    let hunt = StoryObjectiveSpec {
        villains: vec![SHADE],
        ..spec(2, ObjectiveCondition::DefeatAssociatedVillains, 0)
    };
    let long_night = StoryObjectiveSpec {
        continuous_effects: vec![Effect::of(EffectKind::LoseHealth, 1)],
        ..spec(0, ObjectiveCondition::DarkEventsResolved, 5)
    };

    CardRegistry::from_cards([
        Card::new(CHARM, "Lucky Charm", CardClass::Item)
            .with_effect(Effect::of(EffectKind::GainAttack, 1)),
        Card::villain(SHADE, "Shade", 3),
        objective(FOUR_ITEMS, "Four Items", four_items).with_trigger(
            Trigger::new(TriggerKind::ItemPlayed)
                .with_effect(Effect::of(EffectKind::GainInfluence, 1)),
        ),
        objective(HUNT_SHADE, "Hunt the Shade", hunt),
        objective(LONG_NIGHT, "Long Night", long_night),
    ])
    .unwrap()
}

fn p(n: u8) -> PlayerId {
    PlayerId::new(n)
}

fn game(objectives: Vec<CardId>) -> Game {
    let config = GameConfig::new(2).with_seed(23).with_story_objectives(true);
    let mut game = GameBuilder::new(config, registry())
        .starting_deck(vec![CHARM; 10])
        .villains(vec![SHADE])
        .story_objectives(objectives)
        .build()
        .unwrap();
    game.start().unwrap();
    game
}

fn advance_to(game: &mut Game, phase: TurnPhase) {
    while game.phase() != phase {
        game.advance_phase().unwrap();
    }
}

fn play_items(game: &mut Game, count: usize) {
    for _ in 0..count {
        let card = game.state().active_hero().zones.hand()[0];
        game.play_card(card).unwrap();
    }
}

fn end_turn(game: &mut Game) {
    advance_to(game, TurnPhase::BuyCards);
    game.advance_phase().unwrap();
}

/// "Play 4 items" completes on the fourth item and rewards exactly once.
#[test]
fn test_play_four_items_completes_once() {
    let mut game = game(vec![FOUR_ITEMS, HUNT_SHADE]);
    advance_to(&mut game, TurnPhase::PlayCards);
    game.state_mut().heroes[p(0)].health = 5;

    play_items(&mut game, 3);
    assert!(!game.verify_objective_completion());

    play_items(&mut game, 1);
    assert!(game.verify_objective_completion());
    assert!(!game.verify_objective_completion());

    assert_eq!(game.state().heroes[p(0)].health, 8);
    assert_eq!(game.state().objectives.completed_count(), 1);
    assert_eq!(game.active_objective().unwrap().card_id, HUNT_SHADE);

    // Still rewarded only once when the turn ends.
    end_turn(&mut game);
    assert_eq!(game.state().heroes[p(0)].health, 8);
}

#[test]
fn test_objective_checked_at_end_turn() {
    let mut game = game(vec![FOUR_ITEMS, HUNT_SHADE]);
    advance_to(&mut game, TurnPhase::PlayCards);
    game.state_mut().heroes[p(0)].health = 5;
    play_items(&mut game, 4);

    end_turn(&mut game);

    assert_eq!(game.state().heroes[p(0)].health, 8);
    assert_eq!(game.active_objective().unwrap().card_id, HUNT_SHADE);
}

/// Counters are per turn: three items on each of two turns is not four.
#[test]
fn test_counters_do_not_carry_over() {
    let mut game = game(vec![FOUR_ITEMS]);
    advance_to(&mut game, TurnPhase::PlayCards);
    play_items(&mut game, 3);
    end_turn(&mut game);

    advance_to(&mut game, TurnPhase::PlayCards);
    play_items(&mut game, 3);
    assert_eq!(game.counters().items_played, 3);
    assert!(!game.verify_objective_completion());
}

#[test]
fn test_objectives_run_in_order() {
    let game = game(vec![HUNT_SHADE, FOUR_ITEMS, LONG_NIGHT]);

    let order: Vec<_> = game
        .state()
        .objectives
        .objectives()
        .iter()
        .map(|o| o.card_id)
        .collect();
    assert_eq!(order, vec![LONG_NIGHT, FOUR_ITEMS, HUNT_SHADE]);
    assert_eq!(game.active_objective().unwrap().card_id, LONG_NIGHT);
}

/// Continuous effects hit each turn while the objective is open.
#[test]
fn test_continuous_effects_each_turn() {
    let mut game = game(vec![LONG_NIGHT]);
    assert_eq!(game.state().heroes[p(0)].health, 9);

    end_turn(&mut game);
    assert_eq!(game.state().heroes[p(1)].health, 9);
}

/// The active objective's triggers are live; completion removes them and
/// registers the next objective's.
#[test]
fn test_objective_triggers_follow_active() {
    let mut game = game(vec![FOUR_ITEMS, HUNT_SHADE]);
    let four_items = game.active_objective().unwrap().entity_id;
    assert!(game.state().triggers.is_registered(TriggerKind::ItemPlayed, four_items));

    advance_to(&mut game, TurnPhase::PlayCards);
    play_items(&mut game, 4);
    assert_eq!(game.state().heroes[p(0)].influence, 4);

    game.verify_objective_completion();
    assert!(!game.state().triggers.is_registered(TriggerKind::ItemPlayed, four_items));
}

#[test]
fn test_defeat_associated_villains() {
    let mut game = game(vec![HUNT_SHADE]);
    advance_to(&mut game, TurnPhase::Attack);
    assert!(!game.verify_objective_completion());

    game.state_mut().heroes[p(0)].attack = 3;
    let shade = game.active_villains()[0].entity_id;
    game.assign_attack(shade, 3).unwrap();

    assert!(game.verify_objective_completion());
    assert!(game.state().objectives.is_finished());
    assert!(game.active_objective().is_none());
}

#[test]
fn test_objective_completed_trigger() {
    let mut game = game(vec![HUNT_SHADE]);
    game.state_mut().triggers.register_trigger(
        TriggerKind::ObjectiveCompleted,
        vec![Effect::of(EffectKind::GainInfluence, 2)],
        EntityId(900),
        Duration::Instant,
    );
    advance_to(&mut game, TurnPhase::Attack);
    game.state_mut().heroes[p(0)].attack = 3;
    let shade = game.active_villains()[0].entity_id;
    game.assign_attack(shade, 3).unwrap();

    game.verify_objective_completion();

    assert_eq!(game.state().heroes[p(0)].influence, 2);
}

#[test]
fn test_disabled_objectives_never_complete() {
    let mut game = GameBuilder::new(GameConfig::new(2).with_seed(23), registry())
        .starting_deck(vec![CHARM; 10])
        .villains(vec![SHADE])
        .story_objectives(vec![FOUR_ITEMS])
        .build()
        .unwrap();
    game.start().unwrap();
    advance_to(&mut game, TurnPhase::PlayCards);
    play_items(&mut game, 4);

    assert!(!game.verify_objective_completion());
    assert!(game.active_objective().is_none());
}
