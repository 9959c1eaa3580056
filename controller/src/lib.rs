#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level game loop that routes ticks and input through the systems.
//!
//! The controller owns the world exclusively. Every tick and every input is
//! handled to completion before the next one, so guesses always observe a
//! consistent field.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scale_boulders_core::{
    Command, Direction, Event, GameConfig, GameError, Input, Outcome, PlayState, RenderFrame,
    SpawnRejection,
};
use scale_boulders_system_scale_generator::ScaleGenerator;
use scale_boulders_system_scoring::ScoringEngine;
use scale_boulders_system_spawning::Spawning;
use scale_boulders_world::{self as world, query, GameState, World};

/// Drives a single game of Scale Boulders.
#[derive(Debug)]
pub struct GameController<R = ChaCha8Rng> {
    world: World,
    generator: ScaleGenerator<R>,
    spawning: Spawning,
    scoring: ScoringEngine,
    events: Vec<Event>,
}

impl GameController<ChaCha8Rng> {
    /// Creates a controller whose scales are drawn from a seeded generator.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameController<R> {
    /// Creates a controller using the provided random source.
    ///
    /// Fails when the configuration is invalid or no enabled scale fits
    /// within the ledger-line bound.
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, GameError> {
        let tuning = config.tuning.clone();
        let generator = ScaleGenerator::new(config, rng)?;
        log::info!(
            "starting game: spawn every {:?}, {} slots",
            tuning.spawn_interval(),
            tuning.slot_count
        );
        Ok(Self {
            spawning: Spawning::new(tuning.spawn_interval()),
            world: World::new(tuning),
            generator,
            scoring: ScoringEngine::new(),
            events: Vec::new(),
        })
    }

    /// Advances the game by `dt`.
    ///
    /// `dt` is cut at every spawn point it contains: boulders fall and land
    /// up to that point, then the due boulder enters at the top, so a boulder
    /// only falls for the part of `dt` after its spawn. The end condition is
    /// checked once the whole of `dt` has elapsed. Nothing happens unless the
    /// game is running.
    pub fn tick(&mut self, dt: Duration) -> Result<(), GameError> {
        let play_state = query::play_state(&self.world);
        if !play_state.is_running() {
            return Ok(());
        }

        let mut remaining = dt;
        while let Some(until_spawn) = self.spawning.until_next_spawn() {
            if until_spawn > remaining {
                break;
            }
            remaining -= until_spawn;
            self.advance(until_spawn, play_state)?;
        }
        if !remaining.is_zero() {
            self.advance(remaining, play_state)?;
        }
        self.check_end_condition();
        Ok(())
    }

    /// Handles one input.
    ///
    /// Returns the outcome for guesses evaluated against a selected boulder.
    /// Selection and guesses are ignored unless the game is running.
    pub fn handle_input(&mut self, input: Input) -> Option<Outcome> {
        match input {
            Input::TogglePause => {
                let state = match query::play_state(&self.world) {
                    PlayState::Running => PlayState::Paused,
                    PlayState::Paused => PlayState::Running,
                    PlayState::Ended => return None,
                };
                self.execute(vec![Command::SetPlayState { state }]);
                None
            }
            Input::Terminate => {
                self.execute(vec![Command::SetPlayState {
                    state: PlayState::Ended,
                }]);
                None
            }
            Input::SelectLeft => {
                self.execute(vec![Command::MoveSelection {
                    direction: Direction::Left,
                }]);
                None
            }
            Input::SelectRight => {
                self.execute(vec![Command::MoveSelection {
                    direction: Direction::Right,
                }]);
                None
            }
            Input::Guess(key) => {
                let selected = query::selected(&self.world);
                let mut commands = Vec::new();
                let outcome = self.scoring.handle(
                    query::play_state(&self.world),
                    selected.as_ref(),
                    key,
                    &mut commands,
                );
                if let (Some(outcome), Some(boulder)) = (outcome, selected.as_ref()) {
                    log::debug!(
                        "guess {key:?} on boulder {} ({}): {outcome:?}",
                        boulder.id.get(),
                        boulder.scale.scale_type()
                    );
                }
                self.execute(commands);
                outcome
            }
        }
    }

    /// Starts a fresh game with the same configuration.
    ///
    /// The random source keeps its position, so a restarted game sees new
    /// scales.
    pub fn restart(&mut self) {
        let tuning = self.generator.config().tuning.clone();
        self.spawning = Spawning::new(tuning.spawn_interval());
        self.execute(vec![Command::ConfigureField { tuning }]);
        log::info!("game restarted");
    }

    /// Payload for the renderer.
    #[must_use]
    pub fn render_frame(&self) -> RenderFrame {
        query::render_frame(&self.world)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Configuration the game was started with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.generator.config()
    }

    /// Running totals of the game.
    #[must_use]
    pub fn game_state(&self) -> &GameState {
        query::game_state(&self.world)
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> i64 {
        query::score(&self.world)
    }

    /// Current play state.
    #[must_use]
    pub fn play_state(&self) -> PlayState {
        query::play_state(&self.world)
    }

    /// Running time collected toward the next spawn.
    #[must_use]
    pub fn spawn_accumulator(&self) -> Duration {
        self.spawning.accumulator()
    }

    /// Takes the events produced since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn advance(&mut self, dt: Duration, play_state: PlayState) -> Result<(), GameError> {
        let mut spawns = Vec::new();
        let _ = self
            .spawning
            .spawn_if_due(dt, play_state, &mut self.generator, &mut spawns)?;
        let mut commands = vec![Command::Tick { dt }];
        commands.append(&mut spawns);
        self.execute(commands);
        Ok(())
    }

    fn execute(&mut self, commands: Vec<Command>) {
        let start = self.events.len();
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
        for event in &self.events[start..] {
            log_event(event);
        }
    }

    fn check_end_condition(&mut self) {
        let Some(condition) = self.generator.config().end_condition else {
            return;
        };
        let state = query::game_state(&self.world);
        if condition.is_met(state.score(), state.running_time()) {
            log::info!("end condition {condition:?} reached");
            self.execute(vec![Command::SetPlayState {
                state: PlayState::Ended,
            }]);
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::BoulderSpawned {
            boulder,
            slot,
            scale_type,
            clef,
        } => log::debug!(
            "boulder {} spawned in slot {slot}: {scale_type} on {clef:?}",
            boulder.get()
        ),
        Event::SpawnRejected {
            reason: SpawnRejection::FieldFull,
        } => log::warn!("spawn skipped: every slot is taken"),
        Event::BoulderLanded { boulder, penalty } => {
            log::info!("boulder {} landed, -{penalty}", boulder.get());
        }
        Event::BoulderSolved { boulder, awarded } => {
            log::info!("boulder {} solved, +{awarded}", boulder.get());
        }
        Event::FallSpeedChanged { speed } => log::debug!("fall speed now {speed}"),
        Event::PlayStateChanged { state } => log::info!("play state {state:?}"),
        Event::TimeAdvanced { .. } => {}
        other => log::trace!("{other:?}"),
    }
}
