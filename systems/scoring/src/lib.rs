#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that judges guesses against the selected boulder.

use scale_boulders_core::{BoulderSnapshot, Command, Outcome, PlayState, ScaleType};

/// Scoring system that turns a guess key into solve or penalty commands.
#[derive(Debug, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    /// Creates a new scoring engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classifies a guess key against the boulder's scale.
    ///
    /// Keys bound to no scale type are [`Outcome::InvalidKey`]. Scale types
    /// sharing an interval pattern are treated as the same answer.
    #[must_use]
    pub fn evaluate(&self, boulder: &BoulderSnapshot, key: char) -> Outcome {
        match ScaleType::from_guess_key(key) {
            None => Outcome::InvalidKey,
            Some(guess) if guess.sounds_like(boulder.scale.scale_type()) => Outcome::Correct,
            Some(_) => Outcome::Incorrect,
        }
    }

    /// Judges a guess on the selected boulder and queues the resulting command.
    ///
    /// Returns `None` without emitting anything when the game is not running
    /// or no boulder is selected. A correct guess solves the boulder for its
    /// current value; an incorrect one halves that value. Invalid keys change
    /// nothing.
    pub fn handle(
        &self,
        play_state: PlayState,
        selected: Option<&BoulderSnapshot>,
        key: char,
        out: &mut Vec<Command>,
    ) -> Option<Outcome> {
        if !play_state.is_running() {
            return None;
        }
        let boulder = selected?;

        let outcome = self.evaluate(boulder, key);
        match outcome {
            Outcome::Correct => out.push(Command::SolveBoulder {
                boulder: boulder.id,
            }),
            Outcome::Incorrect => out.push(Command::HalveBoulderValue {
                boulder: boulder.id,
            }),
            Outcome::InvalidKey => {}
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scale_boulders_core::{BoulderId, Clef, KeySignature, Letter, Pitch, ScaleSpec};

    fn snapshot(scale_type: ScaleType) -> BoulderSnapshot {
        BoulderSnapshot {
            id: BoulderId::new(3),
            slot: 0,
            scale: ScaleSpec::new(
                scale_type,
                Pitch::new(Letter::A, 0, 3),
                Clef::Bass,
                KeySignature::NONE,
            ),
            vertical_position: 0.0,
            fall_speed: 40.0,
            point_value: 10,
            attempted: false,
        }
    }

    #[test]
    fn matching_pattern_is_correct() {
        let engine = ScoringEngine::new();
        let boulder = snapshot(ScaleType::NaturalMinor);
        assert_eq!(
            engine.evaluate(&boulder, ScaleType::NaturalMinor.guess_key()),
            Outcome::Correct
        );
        assert_eq!(
            engine.evaluate(&boulder, ScaleType::Aeolian.guess_key()),
            Outcome::Correct,
            "aeolian shares the natural minor pattern"
        );
        assert_eq!(
            engine.evaluate(&boulder, ScaleType::HarmonicMinor.guess_key()),
            Outcome::Incorrect
        );
    }

    #[test]
    fn unbound_keys_are_invalid() {
        let engine = ScoringEngine::new();
        let boulder = snapshot(ScaleType::Major);
        for key in ['z', ' ', '9', '?'] {
            assert_eq!(engine.evaluate(&boulder, key), Outcome::InvalidKey, "{key:?}");
        }
    }

    #[test]
    fn nothing_is_emitted_without_selection_or_while_paused() {
        let engine = ScoringEngine::new();
        let boulder = snapshot(ScaleType::Major);
        let mut out = Vec::new();
        let key = ScaleType::Major.guess_key();

        assert_eq!(engine.handle(PlayState::Running, None, key, &mut out), None);
        assert_eq!(
            engine.handle(PlayState::Paused, Some(&boulder), key, &mut out),
            None
        );
        assert_eq!(
            engine.handle(PlayState::Ended, Some(&boulder), key, &mut out),
            None
        );
        assert!(out.is_empty());
    }

    #[test]
    fn outcomes_map_to_commands() {
        let engine = ScoringEngine::new();
        let boulder = snapshot(ScaleType::Major);
        let mut out = Vec::new();

        let _ = engine.handle(PlayState::Running, Some(&boulder), 'z', &mut out);
        assert!(out.is_empty(), "invalid keys emit nothing");

        let _ = engine.handle(
            PlayState::Running,
            Some(&boulder),
            ScaleType::Dorian.guess_key(),
            &mut out,
        );
        let _ = engine.handle(
            PlayState::Running,
            Some(&boulder),
            ScaleType::Ionian.guess_key(),
            &mut out,
        );
        assert_eq!(
            out,
            [
                Command::HalveBoulderValue {
                    boulder: BoulderId::new(3)
                },
                Command::SolveBoulder {
                    boulder: BoulderId::new(3)
                },
            ]
        );
    }
}
