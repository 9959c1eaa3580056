#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Scale Boulders.

use std::time::Duration;

use scale_boulders_core::{
    BoulderId, Command, Event, PlayState, SpawnRejection, Tuning, WELCOME_BANNER,
};

mod field;

pub use field::{Boulder, BoulderField};

/// Running totals of a single game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    score: i64,
    play_state: PlayState,
    global_fall_speed: f32,
    correct_guess_count: u32,
    running_time: Duration,
}

impl GameState {
    fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            play_state: PlayState::Running,
            global_fall_speed: tuning.fall_speed_for(0),
            correct_guess_count: 0,
            running_time: Duration::ZERO,
        }
    }

    /// Running score; negative after more landings than solves.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Current play state.
    #[must_use]
    pub const fn play_state(&self) -> PlayState {
        self.play_state
    }

    /// Whether the game is paused.
    #[must_use]
    pub const fn paused(&self) -> bool {
        matches!(self.play_state, PlayState::Paused)
    }

    /// Fall speed given to boulders spawned from now on.
    #[must_use]
    pub const fn global_fall_speed(&self) -> f32 {
        self.global_fall_speed
    }

    /// Number of boulders identified correctly.
    #[must_use]
    pub const fn correct_guess_count(&self) -> u32 {
        self.correct_guess_count
    }

    /// Simulated time spent running, pauses excluded.
    #[must_use]
    pub const fn running_time(&self) -> Duration {
        self.running_time
    }
}

/// Represents the authoritative Scale Boulders world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: Tuning,
    field: BoulderField,
    state: GameState,
}

impl World {
    /// Creates a running world using the provided tuning.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            banner: WELCOME_BANNER,
            field: BoulderField::new(tuning.slot_count, tuning.floor_position),
            state: GameState::new(&tuning),
            tuning,
        }
    }

    fn change_score(&mut self, delta: i64, out_events: &mut Vec<Event>) {
        self.state.score = self.state.score.saturating_add(delta);
        out_events.push(Event::ScoreChanged {
            score: self.state.score,
        });
    }

    fn refresh_fall_speed(&mut self, out_events: &mut Vec<Event>) {
        let speed = self.tuning.fall_speed_for(self.state.correct_guess_count);
        debug_assert!(
            speed >= self.state.global_fall_speed,
            "fall speed must not decrease"
        );
        if speed != self.state.global_fall_speed {
            self.state.global_fall_speed = speed;
            out_events.push(Event::FallSpeedChanged { speed });
        }
    }

    fn report_selection(&self, before: Option<BoulderId>, out_events: &mut Vec<Event>) {
        let selected = self.field.selected_id();
        if selected != before {
            out_events.push(Event::SelectionChanged { selected });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Ticks, spawns, selection moves, and guesses are only honoured while the
/// game is running. Play-state changes out of [`PlayState::Ended`] are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureField { tuning } => {
            *world = World::new(tuning);
            out_events.push(Event::FieldConfigured);
        }
        Command::SetPlayState { state } => {
            let current = world.state.play_state;
            if current == state || current == PlayState::Ended {
                return;
            }
            world.state.play_state = state;
            out_events.push(Event::PlayStateChanged { state });
        }
        Command::SpawnBoulder { scale } => {
            if !world.state.play_state.is_running() {
                out_events.push(Event::SpawnRejected {
                    reason: SpawnRejection::InvalidMode,
                });
                return;
            }
            let before = world.field.selected_id();
            let scale_type = scale.scale_type();
            let clef = scale.clef();
            match world.field.spawn(
                scale,
                world.state.global_fall_speed,
                world.tuning.base_point_value,
            ) {
                Ok((boulder, slot)) => out_events.push(Event::BoulderSpawned {
                    boulder,
                    slot,
                    scale_type,
                    clef,
                }),
                Err(reason) => out_events.push(Event::SpawnRejected { reason }),
            }
            world.report_selection(before, out_events);
        }
        Command::Tick { dt } => {
            if !world.state.play_state.is_running() {
                return;
            }
            world.state.running_time = world.state.running_time.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            let before = world.field.selected_id();
            world.field.advance(dt);
            let penalty = world.tuning.landing_penalty;
            for boulder in world.field.collect_landed() {
                out_events.push(Event::BoulderLanded {
                    boulder: boulder.id(),
                    penalty,
                });
                world.change_score(-i64::from(penalty), out_events);
            }
            world.report_selection(before, out_events);
            world.refresh_fall_speed(out_events);
        }
        Command::MoveSelection { direction } => {
            if !world.state.play_state.is_running() {
                return;
            }
            let before = world.field.selected_id();
            world.field.move_selection(direction);
            world.report_selection(before, out_events);
        }
        Command::SolveBoulder { boulder } => {
            if !world.state.play_state.is_running() {
                return;
            }
            let before = world.field.selected_id();
            let Some(solved) = world.field.remove(boulder) else {
                return;
            };
            let awarded = solved.point_value();
            world.state.correct_guess_count = world.state.correct_guess_count.saturating_add(1);
            out_events.push(Event::BoulderSolved { boulder, awarded });
            world.change_score(i64::from(awarded), out_events);
            world.report_selection(before, out_events);
            world.refresh_fall_speed(out_events);
        }
        Command::HalveBoulderValue { boulder } => {
            if !world.state.play_state.is_running() {
                return;
            }
            if let Some(target) = world.field.boulder_mut(boulder) {
                let point_value = target.halve_value();
                out_events.push(Event::BoulderValueHalved {
                    boulder,
                    point_value,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use scale_boulders_core::{
        BoulderSnapshot, BoulderView, PlayState, RenderFrame, RenderedBoulder, Tuning,
    };

    use super::{BoulderField, GameState, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the tuning the world was configured with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Provides read-only access to the running totals.
    #[must_use]
    pub fn game_state(world: &World) -> &GameState {
        &world.state
    }

    /// Current play state.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.state.play_state
    }

    /// Running score.
    #[must_use]
    pub fn score(world: &World) -> i64 {
        world.state.score
    }

    /// Provides read-only access to the boulder field.
    #[must_use]
    pub fn field(world: &World) -> &BoulderField {
        &world.field
    }

    /// Captures a snapshot of the selected boulder, if any.
    #[must_use]
    pub fn selected(world: &World) -> Option<BoulderSnapshot> {
        world.field.selected().map(super::Boulder::snapshot)
    }

    /// Captures a read-only view of the live boulders.
    #[must_use]
    pub fn boulder_view(world: &World) -> BoulderView {
        BoulderView::from_snapshots(
            world
                .field
                .boulders()
                .iter()
                .map(super::Boulder::snapshot)
                .collect(),
        )
    }

    /// Builds the payload the renderer draws for the current frame.
    ///
    /// Boulders are withheld while paused so the player cannot study scales
    /// with the clock stopped.
    #[must_use]
    pub fn render_frame(world: &World) -> RenderFrame {
        let paused = world.state.paused();
        let selected = world.field.cursor();
        let boulders = if paused {
            Vec::new()
        } else {
            world
                .field
                .boulders()
                .iter()
                .enumerate()
                .map(|(index, boulder)| RenderedBoulder {
                    boulder_id: boulder.id(),
                    horizontal_slot: boulder.slot(),
                    vertical_position: boulder.vertical_position(),
                    note_sequence: boulder.scale().note_sequence().to_vec(),
                    staff_notes: boulder.scale().staff_notes(),
                    clef: boulder.scale().clef(),
                    key_signature: boulder.scale().key_signature(),
                    selected: selected == Some(index),
                })
                .collect()
        };

        RenderFrame {
            boulders,
            score: world.state.score,
            paused,
            play_state: world.state.play_state,
        }
    }
}
