//! Game configuration supplied by the settings layer.

use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Clef, ConfigError, KeySignatureRange, ScaleType};

/// Player-facing options that shape which scales appear and when the game ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Scale types boulders may carry.
    pub scale_types: BTreeSet<ScaleType>,
    /// Clefs scales may be written on.
    pub clefs: BTreeSet<Clef>,
    /// Key signatures heptatonic scales may be written in.
    pub key_signatures: KeySignatureRange,
    /// Maximum ledger lines a scale may use above or below the staff.
    pub max_ledger_lines: u32,
    /// Optional condition that ends the game.
    pub end_condition: Option<EndCondition>,
    /// Timing and scoring constants.
    pub tuning: Tuning,
}

impl GameConfig {
    /// Checks the structural invariants of the configuration.
    ///
    /// Playability (whether any scale fits within the ledger-line bound) is
    /// checked by the scale generator, which owns the search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale_types.is_empty() {
            return Err(ConfigError::NoScaleTypes);
        }
        if self.clefs.is_empty() {
            return Err(ConfigError::NoClefs);
        }
        if !self.key_signatures.is_valid() {
            return Err(ConfigError::InvalidKeySignatures {
                lowest: self.key_signatures.lowest,
                highest: self.key_signatures.highest,
            });
        }
        self.tuning.validate()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            scale_types: [
                ScaleType::Major,
                ScaleType::NaturalMinor,
                ScaleType::HarmonicMinor,
                ScaleType::MelodicMinor,
            ]
            .into_iter()
            .collect(),
            clefs: [Clef::Treble, Clef::Bass].into_iter().collect(),
            key_signatures: KeySignatureRange::default(),
            max_ledger_lines: 2,
            end_condition: None,
            tuning: Tuning::default(),
        }
    }
}

/// Condition under which a running game ends on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndCondition {
    /// Ends once the score reaches or exceeds the threshold.
    Score {
        /// Score that ends the game.
        threshold: i64,
    },
    /// Ends once the game has been running for the given time, pauses excluded.
    Time {
        /// Running time limit in whole seconds.
        seconds: u64,
    },
}

impl EndCondition {
    /// Reports whether the condition holds for the provided score and running time.
    #[must_use]
    pub fn is_met(&self, score: i64, running_time: Duration) -> bool {
        match *self {
            Self::Score { threshold } => score >= threshold,
            Self::Time { seconds } => running_time >= Duration::from_secs(seconds),
        }
    }
}

/// Timing, geometry, and scoring constants of the boulder field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Milliseconds of running time between boulder spawns.
    pub spawn_interval_ms: u64,
    /// Vertical position at which a boulder lands; 0 is the top of the field.
    pub floor_position: f32,
    /// Number of horizontal slots boulders can occupy.
    pub slot_count: u32,
    /// Fall speed, in units per second, before any correct guess.
    pub base_fall_speed: f32,
    /// Fall speed added per correct guess.
    pub fall_speed_increment: f32,
    /// Upper bound on the fall speed.
    pub max_fall_speed: f32,
    /// Point value of a freshly spawned boulder.
    pub base_point_value: u32,
    /// Points deducted when a boulder lands.
    pub landing_penalty: u32,
}

impl Tuning {
    /// Interval between boulder spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Global fall speed after the given number of correct guesses.
    ///
    /// Linear in the guess count and capped at [`Tuning::max_fall_speed`], so
    /// it never decreases as the count grows.
    #[must_use]
    pub fn fall_speed_for(&self, correct_guesses: u32) -> f32 {
        let speed = self.base_fall_speed + self.fall_speed_increment * correct_guesses as f32;
        speed.min(self.max_fall_speed)
    }

    /// Checks that the constants describe a playable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.floor_position.is_finite() || self.floor_position <= 0.0 {
            return Err(ConfigError::InvalidFloor(self.floor_position));
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ZeroSpawnInterval);
        }
        if self.slot_count == 0 {
            return Err(ConfigError::NoSlots);
        }
        let speeds_finite = self.base_fall_speed.is_finite()
            && self.fall_speed_increment.is_finite()
            && self.max_fall_speed.is_finite();
        if !speeds_finite
            || self.base_fall_speed <= 0.0
            || self.fall_speed_increment < 0.0
            || self.max_fall_speed < self.base_fall_speed
        {
            return Err(ConfigError::InvalidFallSpeed);
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 4_000,
            floor_position: 600.0,
            slot_count: 6,
            base_fall_speed: 40.0,
            fall_speed_increment: 5.0,
            max_fall_speed: 160.0,
            base_point_value: 10,
            landing_penalty: 10,
        }
    }
}
