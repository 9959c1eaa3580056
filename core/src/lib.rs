#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scale Boulders engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The controller submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! changed. Systems consume events and immutable snapshots and respond
//! exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod config;
mod error;
mod music;

pub use config::{EndCondition, GameConfig, Tuning};
pub use error::{ConfigError, GameError, GenerationError};
pub use music::{
    ledger_lines_at, note_sequence, Clef, KeySignature, KeySignatureRange, LedgerSpan, Letter,
    ParsePitchError, Pitch, ScaleSpec, ScaleType, StaffNote, LETTERS_PER_OCTAVE, MAX_OCTAVE,
    SEMITONES_PER_OCTAVE, STAFF_TOP_LINE,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Scale Boulders.";

/// Lifecycle state of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// Boulders spawn and fall; input is accepted.
    Running,
    /// Time is frozen and boulders are hidden from rendering.
    Paused,
    /// Terminal state; the adapter should shut the game down.
    Ended,
}

impl PlayState {
    /// Reports whether time advances in this state.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Horizontal direction in which the selection cursor moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward lower slot indices.
    Left,
    /// Toward higher slot indices.
    Right,
}

/// Abstract key semantics consumed by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    /// Moves the selection one boulder to the left.
    SelectLeft,
    /// Moves the selection one boulder to the right.
    SelectRight,
    /// Guesses the scale type bound to the provided key for the selected boulder.
    Guess(char),
    /// Toggles between running and paused.
    TogglePause,
    /// Ends the game.
    Terminate,
}

impl Input {
    /// Builds the guess input bound to a scale type.
    #[must_use]
    pub const fn guess(scale_type: ScaleType) -> Self {
        Self::Guess(scale_type.guess_key())
    }
}

/// Result of evaluating a guess against a boulder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The guess matched; the boulder's points are awarded and it is removed.
    Correct,
    /// The guess named a different scale type; the boulder's value is halved.
    Incorrect,
    /// The key is not bound to any scale type; nothing changes.
    InvalidKey,
}

/// Unique identifier assigned to a boulder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoulderId(u32);

impl BoulderId {
    /// Creates a new boulder identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the field tuning and resets the world to a fresh game.
    ConfigureField {
        /// Timing, geometry, and scoring constants to adopt.
        tuning: Tuning,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a boulder carrying the scale enter the field.
    SpawnBoulder {
        /// Scale the boulder carries.
        scale: ScaleSpec,
    },
    /// Requests that the selection cursor move one boulder.
    MoveSelection {
        /// Direction of travel.
        direction: Direction,
    },
    /// Awards the boulder's points and removes it after a correct guess.
    SolveBoulder {
        /// Boulder that was identified.
        boulder: BoulderId,
    },
    /// Halves the boulder's point value after an incorrect guess.
    HalveBoulderValue {
        /// Boulder that was misidentified.
        boulder: BoulderId,
    },
    /// Requests a transition to the provided play state.
    SetPlayState {
        /// State the world should adopt.
        state: PlayState,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the world was reset with new tuning.
    FieldConfigured,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a boulder entered the field.
    BoulderSpawned {
        /// Identifier assigned to the boulder.
        boulder: BoulderId,
        /// Horizontal slot the boulder occupies.
        slot: u32,
        /// Scale type carried by the boulder.
        scale_type: ScaleType,
        /// Clef the scale is written on.
        clef: Clef,
    },
    /// Reports that a spawn request was refused.
    SpawnRejected {
        /// Specific reason the spawn failed.
        reason: SpawnRejection,
    },
    /// Confirms that a boulder reached the floor and was removed.
    BoulderLanded {
        /// Identifier of the landed boulder.
        boulder: BoulderId,
        /// Points deducted for the landing.
        penalty: u32,
    },
    /// Confirms that a boulder was correctly identified and removed.
    BoulderSolved {
        /// Identifier of the solved boulder.
        boulder: BoulderId,
        /// Points awarded for the solve.
        awarded: u32,
    },
    /// Confirms that a boulder's point value was halved.
    BoulderValueHalved {
        /// Identifier of the penalised boulder.
        boulder: BoulderId,
        /// Point value after halving.
        point_value: u32,
    },
    /// Announces that a different boulder, or none, is now selected.
    SelectionChanged {
        /// Newly selected boulder, if any.
        selected: Option<BoulderId>,
    },
    /// Announces the running score after it changed.
    ScoreChanged {
        /// Score after the change.
        score: i64,
    },
    /// Announces that the global fall speed changed.
    FallSpeedChanged {
        /// Speed assigned to boulders spawned from now on.
        speed: f32,
    },
    /// Announces that the game entered a new play state.
    PlayStateChanged {
        /// State that became active.
        state: PlayState,
    },
}

/// Reasons a spawn request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The game is paused or over, so nothing may enter the field.
    InvalidMode,
    /// Every horizontal slot is occupied by a live boulder.
    FieldFull,
}

/// Immutable representation of a single boulder's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct BoulderSnapshot {
    /// Unique identifier assigned to the boulder.
    pub id: BoulderId,
    /// Horizontal slot the boulder occupies.
    pub slot: u32,
    /// Scale the boulder carries.
    pub scale: ScaleSpec,
    /// Distance fallen from the top of the field.
    pub vertical_position: f32,
    /// Fall speed fixed when the boulder spawned.
    pub fall_speed: f32,
    /// Points awarded if the boulder is identified now.
    pub point_value: u32,
    /// Whether at least one guess was made on the boulder.
    pub attempted: bool,
}

/// Read-only snapshot describing all live boulders.
#[derive(Clone, Debug, Default)]
pub struct BoulderView {
    snapshots: Vec<BoulderSnapshot>,
}

impl BoulderView {
    /// Creates a new boulder view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BoulderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.slot);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &BoulderSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live boulders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the field holds no boulders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Retrieves the snapshot for the provided identifier.
    #[must_use]
    pub fn get(&self, id: BoulderId) -> Option<&BoulderSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BoulderSnapshot> {
        self.snapshots
    }
}

/// Renderable description of one boulder.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedBoulder {
    /// Identifier of the boulder.
    pub boulder_id: BoulderId,
    /// Horizontal slot the boulder occupies.
    pub horizontal_slot: u32,
    /// Distance fallen from the top of the field.
    pub vertical_position: f32,
    /// Pitches of the scale in playing order.
    pub note_sequence: Vec<Pitch>,
    /// Staff placement of every pitch.
    pub staff_notes: Vec<StaffNote>,
    /// Clef the scale is written on.
    pub clef: Clef,
    /// Key signature the scale is written in.
    pub key_signature: KeySignature,
    /// Whether the selection cursor rests on this boulder.
    pub selected: bool,
}

/// Everything a renderer needs to draw a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
    /// Live boulders in slot order; empty while paused.
    pub boulders: Vec<RenderedBoulder>,
    /// Running score.
    pub score: i64,
    /// Whether the game is paused.
    pub paused: bool,
    /// Current play state.
    pub play_state: PlayState,
}
