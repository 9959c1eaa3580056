//! Error taxonomy for configuration and scale generation.

use thiserror::Error;

/// Configuration problems detected before gameplay starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// No scale type is enabled.
    #[error("at least one scale type must be enabled")]
    NoScaleTypes,
    /// No clef is enabled.
    #[error("at least one clef must be enabled")]
    NoClefs,
    /// The key signature range is inverted or exceeds seven sharps or flats.
    #[error("key signature range {lowest}..={highest} must be ordered and within -7..=7")]
    InvalidKeySignatures {
        /// Lowest signature requested.
        lowest: i8,
        /// Highest signature requested.
        highest: i8,
    },
    /// The floor sits at or above the top of the field.
    #[error("floor position must be positive and finite, got {0}")]
    InvalidFloor(f32),
    /// Boulders would spawn continuously.
    #[error("spawn interval must be non-zero")]
    ZeroSpawnInterval,
    /// The field has no horizontal slots to spawn into.
    #[error("at least one horizontal slot is required")]
    NoSlots,
    /// Fall speeds are non-positive, non-finite, or capped below the base speed.
    #[error("fall speeds must be finite, the base positive, and the cap at least the base")]
    InvalidFallSpeed,
    /// No enabled scale type fits on any enabled clef within the ledger-line bound.
    #[error("no enabled scale fits on an enabled clef within {max_ledger_lines} ledger lines")]
    NoPlayableScale {
        /// Ledger-line bound that could not be satisfied.
        max_ledger_lines: u32,
    },
}

/// Scale generation ran out of candidate combinations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Every attempted scale type and clef combination had no fitting start.
    #[error("no scale fit within {max_ledger_lines} ledger lines after {attempts} attempts")]
    Exhausted {
        /// Number of combinations tried.
        attempts: usize,
        /// Ledger-line bound in force.
        max_ledger_lines: u32,
    },
}

/// Failures surfaced to whoever starts or drives a game.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GameError {
    /// The configuration cannot produce a game.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Scale generation failed mid-game, which indicates a configuration bug.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
