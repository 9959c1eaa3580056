use scale_boulders_core::{
    Clef, Command, Event, KeySignature, Letter, Outcome, Pitch, ScaleSpec, ScaleType, Tuning,
};
use scale_boulders_system_scoring::ScoringEngine;
use scale_boulders_world::{self as world, query, World};

fn world_with_boulder(scale_type: ScaleType) -> World {
    let mut world = World::new(Tuning::default());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnBoulder {
            scale: ScaleSpec::new(
                scale_type,
                Pitch::new(Letter::G, 0, 4),
                Clef::Treble,
                KeySignature::new(1),
            ),
        },
        &mut events,
    );
    world
}

fn guess(world: &mut World, engine: &ScoringEngine, key: char) -> (Option<Outcome>, Vec<Event>) {
    let selected = query::selected(world);
    let mut commands = Vec::new();
    let outcome = engine.handle(
        query::play_state(world),
        selected.as_ref(),
        key,
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    (outcome, events)
}

#[test]
fn wrong_then_right_awards_halved_values() {
    let engine = ScoringEngine::new();
    let mut world = world_with_boulder(ScaleType::Major);

    let (outcome, _) = guess(&mut world, &engine, ScaleType::Lydian.guess_key());
    assert_eq!(outcome, Some(Outcome::Incorrect));
    assert_eq!(query::selected(&world).expect("still live").point_value, 5);

    let (outcome, _) = guess(&mut world, &engine, ScaleType::NaturalMinor.guess_key());
    assert_eq!(outcome, Some(Outcome::Incorrect));
    let snapshot = query::selected(&world).expect("still live");
    assert_eq!(snapshot.point_value, 2);
    assert!(snapshot.attempted);

    let (outcome, events) = guess(&mut world, &engine, ScaleType::Major.guess_key());
    assert_eq!(outcome, Some(Outcome::Correct));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::BoulderSolved { awarded: 2, .. })));
    assert_eq!(query::score(&world), 2);
    assert!(query::boulder_view(&world).is_empty());
}

#[test]
fn repeating_the_same_wrong_guess_halves_again() {
    let engine = ScoringEngine::new();
    let mut world = world_with_boulder(ScaleType::Mixolydian);
    let key = ScaleType::Dorian.guess_key();

    let _ = guess(&mut world, &engine, key);
    let _ = guess(&mut world, &engine, key);
    assert_eq!(query::selected(&world).expect("live").point_value, 2);
}

#[test]
fn worthless_boulders_stay_until_solved_or_landed() {
    let engine = ScoringEngine::new();
    let mut world = world_with_boulder(ScaleType::Major);
    for _ in 0..6 {
        let _ = guess(&mut world, &engine, ScaleType::Locrian.guess_key());
    }
    let snapshot = query::selected(&world).expect("zero value boulders stay live");
    assert_eq!(snapshot.point_value, 0);

    let (outcome, _) = guess(&mut world, &engine, ScaleType::Major.guess_key());
    assert_eq!(outcome, Some(Outcome::Correct));
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::game_state(&world).correct_guess_count(), 1);
}

#[test]
fn invalid_key_changes_nothing() {
    let engine = ScoringEngine::new();
    let mut world = world_with_boulder(ScaleType::Major);
    let (outcome, events) = guess(&mut world, &engine, 'x');
    assert_eq!(outcome, Some(Outcome::InvalidKey));
    assert!(events.is_empty());
    let snapshot = query::selected(&world).expect("live");
    assert_eq!(snapshot.point_value, 10);
    assert!(!snapshot.attempted);
}

#[test]
fn guess_without_boulders_is_ignored() {
    let engine = ScoringEngine::new();
    let mut world = World::new(Tuning::default());
    let (outcome, events) = guess(&mut world, &engine, ScaleType::Major.guess_key());
    assert_eq!(outcome, None);
    assert!(events.is_empty());
    assert_eq!(query::score(&world), 0);
}
