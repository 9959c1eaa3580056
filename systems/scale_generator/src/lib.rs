#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random scale generation constrained by the game configuration.
//!
//! Randomness is always injected, so a seeded source reproduces the exact
//! sequence of scales.

use rand::Rng;
use scale_boulders_core::{
    Clef, ConfigError, GameConfig, GenerationError, KeySignatureRange, Pitch, ScaleSpec,
    ScaleType, MAX_OCTAVE,
};

/// Upper bound on the scale type and clef combinations tried per scale.
pub const MAX_ATTEMPTS: usize = 32;

/// Source of the scales carried by newly spawned boulders.
pub trait ScaleSource {
    /// Produces the next scale.
    fn next_scale(&mut self) -> Result<ScaleSpec, GenerationError>;
}

/// Produces random scales that fit the configured clefs and ledger-line bound.
#[derive(Debug)]
pub struct ScaleGenerator<R> {
    config: GameConfig,
    rng: R,
}

impl<R: Rng> ScaleGenerator<R> {
    /// Validates the configuration and captures the random source.
    ///
    /// Fails when the configuration is structurally invalid or when no
    /// enabled scale type fits on any enabled clef.
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        validate(&config)?;
        Ok(Self { config, rng })
    }

    /// Generates the next scale.
    pub fn generate(&mut self) -> Result<ScaleSpec, GenerationError> {
        generate(&self.config, &mut self.rng)
    }

    /// Configuration the generator draws from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Checks the configuration and that at least one scale can be generated.
pub fn validate(config: &GameConfig) -> Result<(), ConfigError> {
    config.validate()?;
    let playable = combinations(config).any(|(scale_type, clef)| {
        !candidate_scales(
            scale_type,
            clef,
            config.key_signatures,
            config.max_ledger_lines,
        )
        .is_empty()
    });
    if playable {
        Ok(())
    } else {
        Err(ConfigError::NoPlayableScale {
            max_ledger_lines: config.max_ledger_lines,
        })
    }
}

/// Generates a random scale under the configuration.
///
/// A scale type and clef are drawn uniformly from the enabled sets, then a
/// starting note is drawn uniformly from those that keep the scale within the
/// ledger-line bound. Combinations without such a note are discarded and
/// another is drawn, up to [`MAX_ATTEMPTS`] times.
pub fn generate<R: Rng>(
    config: &GameConfig,
    rng: &mut R,
) -> Result<ScaleSpec, GenerationError> {
    let mut remaining: Vec<(ScaleType, Clef)> = combinations(config).collect();
    let mut attempts = 0;

    while attempts < MAX_ATTEMPTS && !remaining.is_empty() {
        attempts += 1;
        let (scale_type, clef) = remaining.swap_remove(rng.gen_range(0..remaining.len()));
        let mut candidates = candidate_scales(
            scale_type,
            clef,
            config.key_signatures,
            config.max_ledger_lines,
        );
        if !candidates.is_empty() {
            let pick = rng.gen_range(0..candidates.len());
            return Ok(candidates.swap_remove(pick));
        }
    }

    Err(GenerationError::Exhausted {
        attempts,
        max_ledger_lines: config.max_ledger_lines,
    })
}

/// Every scale of the given type and clef that fits within the ledger-line bound.
#[must_use]
pub fn candidate_scales(
    scale_type: ScaleType,
    clef: Clef,
    key_signatures: KeySignatureRange,
    max_ledger_lines: u32,
) -> Vec<ScaleSpec> {
    scale_type
        .starting_spellings(key_signatures)
        .into_iter()
        .flat_map(|(letter, accidental, signature)| {
            (0..=MAX_OCTAVE).map(move |octave| {
                ScaleSpec::new(
                    scale_type,
                    Pitch::new(letter, accidental, octave),
                    clef,
                    signature,
                )
            })
        })
        .filter(|scale| scale.fits(max_ledger_lines))
        .collect()
}

impl<R: Rng> ScaleSource for ScaleGenerator<R> {
    fn next_scale(&mut self) -> Result<ScaleSpec, GenerationError> {
        self.generate()
    }
}

fn combinations(config: &GameConfig) -> impl Iterator<Item = (ScaleType, Clef)> + '_ {
    config
        .scale_types
        .iter()
        .flat_map(move |scale_type| config.clefs.iter().map(move |clef| (*scale_type, *clef)))
}
