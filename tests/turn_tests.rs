//! Turn state machine integration tests.
//!
//! These tests drive a `Game` through whole turns and check the automatic
//! phase work and the phase-checked external actions.

use std::cell::Cell;
use std::rc::Rc;

use coop_deck_engine::cards::{Card, CardClass, CardId, CardKind, CardRegistry, LocationSpec};
use coop_deck_engine::core::{EngineError, EntityId, GameConfig, PlayerId, Subsystems};
use coop_deck_engine::effects::{Effect, EffectContext, EffectEngine, EffectKind};
use coop_deck_engine::rules::{Game, GameBuilder, GameStatus, TurnPhase};
use coop_deck_engine::zones::Pile;

const FRIEND: CardId = CardId(1);
const CHARM: CardId = CardId(2);
const SHADE: CardId = CardId(10);
const WARDEN: CardId = CardId(11);
const MILL: CardId = CardId(20);
const TOWER: CardId = CardId(21);
const COLD_WIND: CardId = CardId(30);
const BLADE: CardId = CardId(40);

fn registry() -> CardRegistry {
    CardRegistry::from_cards([
        Card::new(FRIEND, "Loyal Friend", CardClass::Ally)
            .with_effect(Effect::of(EffectKind::GainInfluence, 1)),
        Card::new(CHARM, "Lucky Charm", CardClass::Item)
            .with_effect(Effect::of(EffectKind::GainAttack, 1)),
        Card::villain(SHADE, "Shade", 2).with_reward(Effect::of(EffectKind::GainInfluence, 2)),
        Card::villain(WARDEN, "Grim Warden", 5).with_effect(Effect::of(EffectKind::LoseHealth, 1)),
        Card::location(MILL, "Old Mill", 3),
        Card::new(TOWER, "Tower", CardClass::Location).with_kind(CardKind::Location(LocationSpec {
            mark_threshold: 2,
            entry_effects: vec![Effect::of(EffectKind::GainAttack, 1)],
        })),
        Card::new(COLD_WIND, "Cold Wind", CardClass::DarkEvent)
            .with_effect(Effect::of(EffectKind::LoseHealth, 1)),
        Card::new(BLADE, "Silver Blade", CardClass::Item)
            .with_cost(3)
            .with_effect(Effect::of(EffectKind::GainAttack, 2)),
    ])
    .unwrap()
}

fn builder(players: usize) -> GameBuilder {
    GameBuilder::new(GameConfig::new(players).with_seed(42), registry())
        .starting_deck([vec![FRIEND; 5], vec![CHARM; 5]].concat())
        .market(vec![BLADE; 8])
        .villains(vec![SHADE])
        .locations(vec![MILL])
}

fn started(builder: GameBuilder) -> Game {
    let mut game = builder.build().unwrap();
    game.start().unwrap();
    game
}

fn advance_to(game: &mut Game, phase: TurnPhase) {
    while game.phase() != phase {
        game.advance_phase().unwrap();
    }
}

fn hand_card_of(game: &Game, card: CardId) -> EntityId {
    let player = game.active_player();
    game.state().heroes[player]
        .zones
        .hand()
        .iter()
        .copied()
        .find(|&e| game.state().instance(e).unwrap().card_id == card)
        .unwrap()
}

/// With every optional subsystem off the turn visits exactly six phases.
#[test]
fn test_plain_turn_phase_sequence() {
    let mut game = started(builder(2));
    for _ in 0..5 {
        game.advance_phase().unwrap();
    }

    let phases: Vec<_> = game.history().iter().map(|r| r.phase).collect();
    assert_eq!(
        phases,
        vec![
            TurnPhase::DarkEvent,
            TurnPhase::Villains,
            TurnPhase::PlayCards,
            TurnPhase::Attack,
            TurnPhase::BuyCards,
            TurnPhase::EndTurn,
            TurnPhase::DarkEvent,
        ]
    );
    assert_eq!(game.history().last().unwrap().player, PlayerId::new(1));
}

/// Optional phases appear when their subsystems are enabled.
#[test]
fn test_full_turn_phase_sequence() {
    let config = GameConfig::new(2).with_seed(42).with_subsystems(Subsystems::all());
    let mut game = started(
        GameBuilder::new(config, registry())
            .starting_deck(vec![FRIEND; 10])
            .villains(vec![SHADE]),
    );
    for _ in 0..7 {
        game.advance_phase().unwrap();
    }

    let phases: Vec<_> = game.history().iter().map(|r| r.phase).collect();
    assert_eq!(
        phases,
        [TurnPhase::sequence(&Subsystems::all()), vec![TurnPhase::DarkEvent]].concat()
    );
}

/// A loaded configuration is checked before any state is built.
#[test]
fn test_build_rejects_invalid_config() {
    for json in [r#"{"player_count":0}"#, r#"{"player_count":2,"max_health":-4}"#] {
        let config: GameConfig = serde_json::from_str(json).unwrap();
        let built = GameBuilder::new(config, registry()).villains(vec![SHADE]).build();
        assert!(matches!(built, Err(EngineError::InvalidConfig(_))), "{json}");
    }
}

#[test]
fn test_advance_requires_start() {
    let mut game = builder(1).build().unwrap();
    assert_eq!(game.advance_phase(), Err(EngineError::NotStarted));
}

/// END_TURN advances the active player by exactly one, wrapping around.
#[test]
fn test_end_turn_rotates_players() {
    let mut game = started(builder(3));

    for expected in [1, 2, 0] {
        advance_to(&mut game, TurnPhase::BuyCards);
        game.advance_phase().unwrap();
        assert_eq!(game.active_player(), PlayerId::new(expected));
        assert_eq!(game.phase(), TurnPhase::DarkEvent);
    }
    assert_eq!(game.turn_number(), 4);
}

#[test]
fn test_play_card_wrong_phase() {
    let mut game = started(builder(2));
    let card = hand_card_of(&game, FRIEND);

    assert_eq!(
        game.play_card(card),
        Err(EngineError::WrongPhase {
            expected: TurnPhase::PlayCards,
            actual: TurnPhase::DarkEvent,
        })
    );
}

#[test]
fn test_play_card_not_in_hand() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::PlayCards);
    let market_card = game.state().market.row[0];

    assert_eq!(
        game.play_card(market_card),
        Err(EngineError::NotInHand {
            card: market_card,
            player: PlayerId::new(0),
        })
    );
}

#[test]
fn test_play_ally_runs_effects_and_counts() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::PlayCards);
    let friend = hand_card_of(&game, FRIEND);

    game.play_card(friend).unwrap();

    let hero = &game.state().heroes[PlayerId::new(0)];
    assert_eq!(hero.influence, 1);
    assert_eq!(hero.zones.location(friend), Some(Pile::InPlay));
    assert_eq!(game.counters().cards_played, 1);
    assert_eq!(game.counters().allies_played, 1);
    assert_eq!(game.counters().influence_gained, 1);
}

#[test]
fn test_buy_card_pays_influence_and_refills_market() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::BuyCards);
    game.state_mut().heroes[PlayerId::new(0)].influence = 3;
    let blade = game.state().market.row[0];

    game.buy_card(blade).unwrap();

    let state = game.state();
    let hero = &state.heroes[PlayerId::new(0)];
    assert_eq!(hero.influence, 0);
    assert_eq!(hero.zones.location(blade), Some(Pile::Discard));
    assert_eq!(state.instance(blade).unwrap().owner, Some(PlayerId::new(0)));
    assert_eq!(state.market.row.len(), state.config.market_size);
    assert_eq!(game.counters().max_acquired_cost, 3);
}

#[test]
fn test_buy_card_insufficient_influence() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::BuyCards);
    let blade = game.state().market.row[0];

    assert_eq!(
        game.buy_card(blade),
        Err(EngineError::Insufficient {
            resource: "influence",
            needed: 3,
            available: 0,
        })
    );
    assert!(game.state().market.row.contains(&blade));
}

#[test]
fn test_acquire_to_deck_top() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::BuyCards);
    let state = game.state_mut();
    state.heroes[PlayerId::new(0)].influence = 3;
    state.durations.add_effect(EffectKind::AcquireToDeckTop, EntityId(9_000));
    let blade = state.market.row[0];

    game.buy_card(blade).unwrap();

    let deck = game.state().heroes[PlayerId::new(0)].zones.deck();
    assert_eq!(deck.last(), Some(&blade));
}

/// Only the damage that lands is paid for; defeat pays the reward.
#[test]
fn test_assign_attack_spends_landed_damage() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::Attack);
    game.state_mut().heroes[PlayerId::new(0)].attack = 5;
    let shade = game.active_villains()[0].entity_id;

    assert_eq!(game.assign_attack(shade, 5), Ok(2));

    let hero = &game.state().heroes[PlayerId::new(0)];
    assert_eq!(hero.attack, 3);
    assert_eq!(hero.influence, 2);
    assert!(game.active_villains().is_empty());
    assert_eq!(game.counters().villains_defeated, 1);
    assert_eq!(game.counters().attack_assigned, 2);
    assert_eq!(game.status(), GameStatus::Won);
}

/// Asking for more than the villain can take charges only what lands.
#[test]
fn test_assign_attack_overkill_charges_remaining_health() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::Attack);
    game.state_mut().heroes[PlayerId::new(0)].attack = 2;
    let shade = game.active_villains()[0].entity_id;

    assert_eq!(game.assign_attack(shade, 5), Ok(2));
    assert_eq!(game.state().heroes[PlayerId::new(0)].attack, 0);
    assert!(game.active_villains().is_empty());
}

#[test]
fn test_attack_limit_one_per_villain() {
    let mut game = started(builder(2).villains(vec![WARDEN]));
    advance_to(&mut game, TurnPhase::Attack);
    let state = game.state_mut();
    state.heroes[PlayerId::new(0)].attack = 4;
    state.durations.add_effect(EffectKind::AttackLimitOnePerVillain, EntityId(9_000));
    let warden = game.active_villains()[0].entity_id;

    assert_eq!(game.assign_attack(warden, 3), Ok(1));
    assert_eq!(game.assign_attack(warden, 1), Err(EngineError::AttackLimitReached(warden)));
    assert_eq!(game.state().heroes[PlayerId::new(0)].attack, 3);
}

#[test]
fn test_villains_phase_hits_active_hero() {
    let mut game = started(builder(2).villains(vec![WARDEN]));
    game.advance_phase().unwrap();

    assert_eq!(game.phase(), TurnPhase::Villains);
    assert_eq!(game.state().heroes[PlayerId::new(0)].health, 9);
    assert_eq!(game.state().heroes[PlayerId::new(1)].health, 10);
}

/// A villain locked by a hero stays quiet until that hero's turn ends.
#[test]
fn test_locked_villain_skipped_until_locker_turn_ends() {
    let mut game = started(builder(2).villains(vec![WARDEN]));
    game.state_mut().villains.active[0].lock(PlayerId::new(1));

    // Hero 0's turn: locked, no damage.
    advance_to(&mut game, TurnPhase::PlayCards);
    assert_eq!(game.state().heroes[PlayerId::new(0)].health, 10);

    // Hero 1's turn: still locked; it unlocks when this turn ends.
    advance_to(&mut game, TurnPhase::BuyCards);
    game.advance_phase().unwrap();
    advance_to(&mut game, TurnPhase::PlayCards);
    assert_eq!(game.state().heroes[PlayerId::new(1)].health, 10);
    advance_to(&mut game, TurnPhase::BuyCards);
    game.advance_phase().unwrap();

    assert!(!game.active_villains()[0].ability_locked);
    game.advance_phase().unwrap();
    assert_eq!(game.state().heroes[PlayerId::new(0)].health, 9);
}

#[test]
fn test_dark_event_resolves_on_turn_start() {
    let game = started(builder(2).dark_events(vec![COLD_WIND]));

    let state = game.state();
    assert_eq!(state.heroes[PlayerId::new(0)].health, 9);
    assert_eq!(game.counters().dark_events_resolved, 1);
    assert_eq!(state.dark_events.discard.len(), 1);
}

#[test]
fn test_end_turn_discards_and_redraws() {
    let mut game = started(builder(2));
    advance_to(&mut game, TurnPhase::PlayCards);
    let friend = hand_card_of(&game, FRIEND);
    game.play_card(friend).unwrap();

    advance_to(&mut game, TurnPhase::BuyCards);
    game.advance_phase().unwrap();

    let hero = &game.state().heroes[PlayerId::new(0)];
    assert_eq!(hero.zones.hand_size(), 5);
    assert!(hero.zones.in_play().is_empty());
    assert_eq!(hero.influence, 0);
    assert_eq!(hero.attack, 0);
    assert_eq!(game.counters().cards_played, 0);
}

#[test]
fn test_stunned_hero_recovers_on_own_turn() {
    let mut game = started(builder(2));
    let p1 = PlayerId::new(1);
    EffectEngine::execute(
        game.state_mut(),
        &Effect::of(EffectKind::LoseHealth, 99),
        p1,
        &EffectContext::default(),
    );
    assert!(game.state().heroes[p1].stunned);
    assert_eq!(game.state().locations.current().unwrap().marks, 1);

    advance_to(&mut game, TurnPhase::BuyCards);
    game.advance_phase().unwrap();

    let hero = &game.state().heroes[p1];
    assert!(!hero.stunned);
    assert_eq!(hero.health, hero.max_health);
}

#[test]
fn test_status_lost_when_final_location_full() {
    let mut game = started(builder(2));
    assert_eq!(game.status(), GameStatus::InProgress);

    EffectEngine::execute(
        game.state_mut(),
        &Effect::of(EffectKind::AddLocationMarks, 3),
        PlayerId::new(0),
        &EffectContext::default(),
    );

    assert_eq!(game.status(), GameStatus::Lost);
}

#[test]
fn test_reveal_next_location_runs_entry_effects() {
    let mut game = started(builder(2).locations(vec![MILL, TOWER]));

    let tower = game.reveal_next_location().unwrap();

    assert_eq!(game.state().locations.current().unwrap().entity_id, tower);
    assert_eq!(game.state().heroes[PlayerId::new(0)].attack, 1);
    assert_eq!(game.reveal_next_location(), Err(EngineError::NoMoreLocations));
}

#[test]
fn test_refresh_hook_after_each_mutation() {
    let mut game = builder(2).build().unwrap();
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    game.set_refresh_hook(Box::new(move |_| seen.set(seen.get() + 1)));

    game.start().unwrap();
    game.advance_phase().unwrap();

    assert_eq!(calls.get(), 2);
}

/// Same seed, same game.
#[test]
fn test_seeded_games_are_deterministic() {
    let a = started(builder(2));
    let b = started(builder(2));

    let hand = |g: &Game| {
        g.state().heroes[PlayerId::new(0)]
            .zones
            .hand()
            .iter()
            .map(|&e| g.state().instance(e).unwrap().card_id)
            .collect::<Vec<_>>()
    };
    assert_eq!(hand(&a), hand(&b));
}
