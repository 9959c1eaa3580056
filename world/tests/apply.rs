use std::time::Duration;

use scale_boulders_core::{
    Clef, Command, Direction, Event, KeySignature, Letter, Pitch, PlayState, ScaleSpec, ScaleType,
    SpawnRejection, Tuning,
};
use scale_boulders_world::{self as world, query, World};

fn c_major() -> ScaleSpec {
    ScaleSpec::new(
        ScaleType::Major,
        Pitch::new(Letter::C, 0, 4),
        Clef::Treble,
        KeySignature::NONE,
    )
}

fn tuning() -> Tuning {
    Tuning {
        floor_position: 100.0,
        base_fall_speed: 10.0,
        slot_count: 3,
        ..Tuning::default()
    }
}

fn spawn(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnBoulder { scale: c_major() }, &mut events);
    events
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);
    events
}

#[test]
fn spawned_boulder_starts_at_top_with_full_value_and_selection() {
    let mut world = World::new(tuning());
    let events = spawn(&mut world);

    let view = query::boulder_view(&world);
    let boulder = view.iter().next().expect("spawned boulder");
    assert_eq!(boulder.vertical_position, 0.0);
    assert_eq!(boulder.point_value, 10);
    assert!(!boulder.attempted);
    assert!((boulder.fall_speed - 10.0).abs() < f32::EPSILON);

    assert!(events.contains(&Event::BoulderSpawned {
        boulder: boulder.id,
        slot: 0,
        scale_type: ScaleType::Major,
        clef: Clef::Treble,
    }));
    assert!(events.contains(&Event::SelectionChanged {
        selected: Some(boulder.id)
    }));
}

#[test]
fn landing_deducts_penalty_exactly_once() {
    let mut world = World::new(tuning());
    let _ = spawn(&mut world);

    let events = tick(&mut world, Duration::from_secs(10));
    let landings = events
        .iter()
        .filter(|event| matches!(event, Event::BoulderLanded { penalty: 10, .. }))
        .count();
    assert_eq!(landings, 1);
    assert_eq!(query::score(&world), -10);
    assert!(query::boulder_view(&world).is_empty());
    assert!(events.contains(&Event::SelectionChanged { selected: None }));

    let _ = tick(&mut world, Duration::from_secs(10));
    assert_eq!(query::score(&world), -10, "landed boulders are not charged twice");
}

#[test]
fn boulder_short_of_floor_stays_live() {
    let mut world = World::new(tuning());
    let _ = spawn(&mut world);
    let _ = tick(&mut world, Duration::from_millis(9_900));
    assert_eq!(query::boulder_view(&world).len(), 1);
    assert_eq!(query::score(&world), 0);
}

#[test]
fn paused_world_ignores_ticks_spawns_and_selection() {
    let mut world = World::new(tuning());
    let _ = spawn(&mut world);
    let _ = tick(&mut world, Duration::from_secs(1));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayState {
            state: PlayState::Paused,
        },
        &mut events,
    );
    assert_eq!(
        events,
        [Event::PlayStateChanged {
            state: PlayState::Paused
        }]
    );

    let before = query::boulder_view(&world).into_vec();
    for _ in 0..5 {
        assert!(tick(&mut world, Duration::from_secs(1)).is_empty());
    }
    assert_eq!(query::boulder_view(&world).into_vec(), before);
    assert_eq!(
        query::game_state(&world).running_time(),
        Duration::from_secs(1)
    );

    assert_eq!(
        spawn(&mut world),
        [Event::SpawnRejected {
            reason: SpawnRejection::InvalidMode
        }]
    );

    let frame = query::render_frame(&world);
    assert!(frame.paused);
    assert!(frame.boulders.is_empty(), "scales are hidden while paused");
}

#[test]
fn ended_is_terminal() {
    let mut world = World::new(tuning());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayState {
            state: PlayState::Ended,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SetPlayState {
            state: PlayState::Running,
        },
        &mut events,
    );
    assert_eq!(query::play_state(&world), PlayState::Ended);
    assert_eq!(events.len(), 1);
}

#[test]
fn solving_awards_current_value_and_speeds_up_future_boulders() {
    let mut world = World::new(tuning());
    let _ = spawn(&mut world);
    let id = query::selected(&world).expect("selected").id;

    let mut events = Vec::new();
    world::apply(&mut world, Command::HalveBoulderValue { boulder: id }, &mut events);
    world::apply(&mut world, Command::SolveBoulder { boulder: id }, &mut events);

    assert!(events.contains(&Event::BoulderValueHalved {
        boulder: id,
        point_value: 5
    }));
    assert!(events.contains(&Event::BoulderSolved {
        boulder: id,
        awarded: 5
    }));
    assert_eq!(query::score(&world), 5);
    assert_eq!(query::game_state(&world).correct_guess_count(), 1);
    assert!(query::selected(&world).is_none());

    let expected = tuning().fall_speed_for(1);
    assert!(events.contains(&Event::FallSpeedChanged { speed: expected }));
    let _ = spawn(&mut world);
    let snapshot = query::selected(&world).expect("new boulder");
    assert!((snapshot.fall_speed - expected).abs() < f32::EPSILON);
}

#[test]
fn render_frame_marks_selected_boulder() {
    let mut world = World::new(tuning());
    let _ = spawn(&mut world);
    let _ = spawn(&mut world);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::MoveSelection {
            direction: Direction::Right,
        },
        &mut events,
    );

    let frame = query::render_frame(&world);
    let flags: Vec<bool> = frame.boulders.iter().map(|boulder| boulder.selected).collect();
    assert_eq!(flags, [false, true]);
    assert_eq!(frame.boulders[1].horizontal_slot, 1);
    assert_eq!(frame.boulders[0].note_sequence.len(), ScaleType::Major.note_count());
    assert_eq!(frame.boulders[0].staff_notes[0].position, -2);
}

#[test]
fn configure_field_resets_the_game() {
    let mut world = World::new(tuning());
    let _ = spawn(&mut world);
    let _ = tick(&mut world, Duration::from_secs(20));
    assert_eq!(query::score(&world), -10);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureField { tuning: tuning() },
        &mut events,
    );
    assert_eq!(events, [Event::FieldConfigured]);
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::play_state(&world), PlayState::Running);
    assert!(query::boulder_view(&world).is_empty());
}
