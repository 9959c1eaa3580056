#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn timer that emits a boulder spawn command once per spawn interval.

use std::time::Duration;

use scale_boulders_core::{Command, GenerationError, PlayState};
use scale_boulders_system_scale_generator::ScaleSource;

/// Pure system that turns elapsed running time into spawn commands.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a spawning system with an empty accumulator.
    #[must_use]
    pub const fn new(spawn_interval: Duration) -> Self {
        Self {
            spawn_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Interval between consecutive spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Running time collected toward the next spawn.
    #[must_use]
    pub const fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Empties the accumulator.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }

    /// Running time left until the next spawn, or `None` when spawning is disabled.
    #[must_use]
    pub fn until_next_spawn(&self) -> Option<Duration> {
        (!self.spawn_interval.is_zero())
            .then(|| self.spawn_interval.saturating_sub(self.accumulator))
    }

    /// Accumulates `elapsed` and emits one spawn command per interval crossed.
    ///
    /// Time only counts while the game is running; the accumulator is left
    /// untouched otherwise so a resumed game continues where it stopped.
    /// Overflow past the interval carries into the next spawn. When generation
    /// fails nothing is emitted and the accumulator is unchanged. Returns the
    /// number of commands emitted.
    pub fn spawn_if_due<S: ScaleSource>(
        &mut self,
        elapsed: Duration,
        play_state: PlayState,
        source: &mut S,
        out: &mut Vec<Command>,
    ) -> Result<usize, GenerationError> {
        if !play_state.is_running() || self.spawn_interval.is_zero() {
            return Ok(0);
        }

        let accumulated = self.accumulator.saturating_add(elapsed);
        let (due, remainder) = self.resolve_spawn_attempts(accumulated);
        let scales = (0..due)
            .map(|_| source.next_scale())
            .collect::<Result<Vec<_>, _>>()?;

        self.accumulator = remainder;
        out.extend(scales.into_iter().map(|scale| Command::SpawnBoulder { scale }));
        Ok(due)
    }

    fn resolve_spawn_attempts(&self, mut accumulated: Duration) -> (usize, Duration) {
        debug_assert!(!self.spawn_interval.is_zero(), "spawn interval must be positive");
        let mut attempts = 0;
        while accumulated >= self.spawn_interval {
            accumulated -= self.spawn_interval;
            attempts += 1;
        }
        (attempts, accumulated)
    }
}
