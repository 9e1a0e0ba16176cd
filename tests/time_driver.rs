//! Integration tests for the clock, waiting, sleeping and travel

use waystone::character::{CharacterState, TravelState, FATIGUE_MAX};
use waystone::core::calendar::GameClock;
use waystone::effects::SkillScaling;
use waystone::{
    EffectId, Engine, EngineConfig, EngineError, InMemorySource, TravelOutcome, WaitDuration,
};

const CONTENT: &str = r#"
    [[effect]]
    id = "fatigue_drain"
    name = "Weariness"
    silent = true
    terminal_at_bound = true

    [[effect.modifiers]]
    kind = "periodic"
    stat = "fatigue"
    value = 1
    tick_interval = 120

    [[effect]]
    id = "hunger_drain"
    name = "Appetite"
    silent = true
    terminal_at_bound = true

    [[effect.modifiers]]
    kind = "periodic"
    stat = "hunger"
    value = -1
    tick_interval = 240

    [[effect]]
    id = "tired"
    name = "Tired"
    system_check = { stat = "fatigue", operator = ">=", threshold = 6 }

    [[skill]]
    id = "wayfinding"
    name = "Wayfinding"
    ratios = { wisdom = 1.0 }
"#;

fn engine() -> Engine {
    Engine::new(
        InMemorySource::from_toml_str(CONTENT).unwrap(),
        EngineConfig::default().with_upkeep(["fatigue_drain", "hunger_drain"]),
    )
    .unwrap()
}

// ============================================================================
// Clock
// ============================================================================

/// A jump past midnight rolls the day over
#[test]
fn test_day_rollover() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");
    character.clock = GameClock::new(1, 23 * 60);

    engine.advance(&mut character, 90);

    assert_eq!(character.clock.current_day(), 2);
    assert_eq!(character.clock.time_of_day(), 30);
}

/// Several days pass in a single call
#[test]
fn test_multi_day_jump() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");
    character.clock = GameClock::new(3, 600);

    engine.advance(&mut character, 3 * 1440 + 15);

    assert_eq!(character.clock.current_day(), 6);
    assert_eq!(character.clock.time_of_day(), 615);
}

// ============================================================================
// Upkeep
// ============================================================================

/// Fatigue and hunger build up while time passes, silently
#[test]
fn test_upkeep_accumulates_quietly() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");

    let messages = engine.advance(&mut character, 240);

    assert_eq!(character.fatigue, 2);
    assert_eq!(character.hunger, 2);
    assert!(messages.is_empty());
}

/// Drains stop at their bound and restart once the stat moves away
#[test]
fn test_upkeep_stops_at_bound_and_restarts() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");

    engine.advance(&mut character, 24 * 60);
    assert_eq!(character.fatigue, FATIGUE_MAX);
    assert_eq!(character.hunger, 0);
    assert!(!character.has_effect(&EffectId::from("fatigue_drain")));
    assert!(!character.has_effect(&EffectId::from("hunger_drain")));

    engine.advance(&mut character, 60);
    assert!(!character.has_effect(&EffectId::from("fatigue_drain")));

    character.fatigue = 3;
    engine.advance(&mut character, 120);
    assert_eq!(character.fatigue, 4);
    assert!(character.has_effect(&EffectId::from("fatigue_drain")));
}

/// Statuses follow the fatigue that upkeep builds
#[test]
fn test_status_appears_from_upkeep() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");
    character.fatigue = 5;

    let messages = engine.advance(&mut character, 120);

    assert_eq!(character.fatigue, 6);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "Tired");
}

// ============================================================================
// Wait and sleep
// ============================================================================

#[test]
fn test_wait_in_hours() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");
    let start = character.clock.time_of_day();

    engine.wait(&mut character, WaitDuration::Hours(2)).unwrap();
    assert_eq!(character.clock.time_of_day(), start + 120);
}

#[test]
fn test_wait_outside_bounds_rejected() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");

    let result = engine.wait(&mut character, WaitDuration::Minutes(10));
    assert!(matches!(
        result,
        Err(EngineError::WaitOutOfRange { minutes: 10, min: 15, max: 360 })
    ));
    assert!(character.active_effects.is_empty());
}

/// A full night clears fatigue and costs one hunger
#[test]
fn test_full_night_of_sleep() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");
    character.clock = GameClock::new(4, 21 * 60);
    character.fatigue = 7;
    character.hunger = 3;

    let report = engine.sleep(&mut character);

    assert_eq!(report.minutes_slept, 9 * 60);
    assert!(report.full_rest);
    assert_eq!(character.fatigue, 0);
    assert_eq!(character.clock.current_day(), 5);
    assert_eq!(character.clock.time_of_day(), 360);
    // two drain ticks overnight, then the night's cost
    assert_eq!(character.hunger, 0);
    assert!(!character.has_effect(&EffectId::from("tired")));
}

/// A short night only takes the edge off
#[test]
fn test_short_sleep_partial_recovery() {
    // no upkeep, so only the sleep rules touch fatigue
    let engine = Engine::new(
        InMemorySource::from_toml_str(CONTENT).unwrap(),
        EngineConfig::default(),
    )
    .unwrap();
    let mut character = CharacterState::new("Hale");
    character.clock = GameClock::new(4, 4 * 60);
    character.fatigue = 9;

    let report = engine.sleep(&mut character);

    assert_eq!(report.minutes_slept, 120);
    assert!(!report.full_rest);
    assert_eq!(character.fatigue, 5);
    assert_eq!(report.hunger_spent, 0);
}

// ============================================================================
// Travel
// ============================================================================

/// A journey completes once, relocating and unlocking content
#[test]
fn test_travel_arrival_is_one_shot() {
    let engine = engine();
    let mut character = CharacterState::new("Hale");
    character.location.location = "north_road".into();
    character.location.travel =
        Some(TravelState::new("greywatch", 180).with_unlocks(["greywatch_gate"]));

    assert!(matches!(
        engine.advance_travel(&mut character, 90),
        TravelOutcome::InProgress { .. }
    ));

    let TravelOutcome::Arrived(arrival) = engine.advance_travel(&mut character, 90) else {
        panic!("expected arrival");
    };
    assert!(arrival.first_visit);
    assert_eq!(arrival.unlocked, vec!["greywatch_gate".to_string()]);
    assert_eq!(character.location.location.to_string(), "greywatch");
    assert!(character.unlocks.contains("greywatch_gate"));

    assert_eq!(engine.advance_travel(&mut character, 90), TravelOutcome::NotTraveling);
}

/// Travel skill shortens the crossing
#[test]
fn test_travel_skill_multiplier() {
    let engine = engine();
    let mut character = CharacterState::new("Hale").with_ability("wisdom", 13);
    character.location.travel = Some(TravelState::new("greywatch", 200).with_scaling(SkillScaling {
        skill: "wayfinding".into(),
        base_level: 10,
        max_bonus_levels: 5,
        bonus_per_level: 0.25,
    }));

    // wisdom 13: three levels, x1.75
    let TravelOutcome::InProgress { progress } = engine.advance_travel(&mut character, 80) else {
        panic!("expected progress");
    };
    assert!((progress - 0.7).abs() < 1e-9);
}
