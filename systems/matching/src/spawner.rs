//! Spawn cadence that speeds up after every spawn attempt.

use std::time::Duration;

use crate::Config;

#[derive(Clone, Debug)]
pub(crate) struct Spawner {
    accumulator: Duration,
    interval: Duration,
    floor: Duration,
    step: Duration,
}

impl Spawner {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            accumulator: Duration::ZERO,
            interval: config.initial_spawn_interval.max(config.min_spawn_interval),
            floor: config.min_spawn_interval,
            step: config.spawn_interval_step,
        }
    }

    pub(crate) const fn interval(&self) -> Duration {
        self.interval
    }

    /// Accrues `dt` and reports whether a spawn attempt is due.
    ///
    /// A due attempt resets the accumulator and shortens the interval toward
    /// the floor, whether or not the caller manages to spawn anything.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator <= self.interval {
            return false;
        }

        self.accumulator = Duration::ZERO;
        if self.interval > self.floor {
            self.interval = self.interval.saturating_sub(self.step).max(self.floor);
        }
        true
    }
}
