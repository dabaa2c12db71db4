//! Timing and buffering configuration for a traffic light

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use rand::Rng;

use super::types::Phase;

/// Shortest cycle, in time units
pub const DEFAULT_MIN_CYCLE_UNITS: u32 = 4;
/// Longest cycle, in time units
pub const DEFAULT_MAX_CYCLE_UNITS: u32 = 6;
/// How often the background loop checks its deadline
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);
/// Maximum number of unread phase values a light keeps
pub const DEFAULT_QUEUE_LIMIT: usize = 16;

/// Configuration for a single traffic light
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightConfig {
    /// Length of one time unit
    pub time_unit: Duration,
    pub min_cycle_units: u32,
    pub max_cycle_units: u32,
    pub poll_interval: Duration,
    /// Phase the light starts in, before any toggle
    pub initial_phase: Phase,
    pub queue_limit: usize,
    /// Optional seed for reproducible cycle durations
    pub seed: Option<u64>,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            time_unit: Duration::from_secs(1),
            min_cycle_units: DEFAULT_MIN_CYCLE_UNITS,
            max_cycle_units: DEFAULT_MAX_CYCLE_UNITS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_phase: Phase::Red,
            queue_limit: DEFAULT_QUEUE_LIMIT,
            seed: None,
        }
    }
}

impl LightConfig {
    /// Default cycle bounds with a different time unit
    pub fn with_time_unit(time_unit: Duration) -> Self {
        Self {
            time_unit,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.time_unit.is_zero(), "time unit must be non-zero");
        ensure!(!self.poll_interval.is_zero(), "poll interval must be non-zero");
        ensure!(self.min_cycle_units >= 1, "minimum cycle must be at least one time unit");
        ensure!(
            self.min_cycle_units <= self.max_cycle_units,
            "minimum cycle ({}) exceeds maximum cycle ({})",
            self.min_cycle_units,
            self.max_cycle_units
        );
        ensure!(self.queue_limit >= 1, "queue limit must be at least 1");

        // Every cycle is added to an Instant, so the longest one must fit both
        let longest = self.time_unit.checked_mul(self.max_cycle_units);
        ensure!(
            longest.is_some_and(|cycle| Instant::now().checked_add(cycle).is_some()),
            "maximum cycle of {} x {:?} is too long",
            self.max_cycle_units,
            self.time_unit
        );
        Ok(())
    }

    pub fn min_cycle(&self) -> Duration {
        self.time_unit * self.min_cycle_units
    }

    pub fn max_cycle(&self) -> Duration {
        self.time_unit * self.max_cycle_units
    }

    /// Draw a cycle duration uniformly from the closed unit interval
    pub fn draw_cycle<R: Rng>(&self, rng: &mut R) -> Duration {
        let units = rng.random_range(self.min_cycle_units..=self.max_cycle_units);
        self.time_unit * units
    }
}
