use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::SchedulerError;

/// Signal timing parameters, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Time budget of one phase activation.
    pub phase_seconds: f64,
    /// Time one car needs to clear the intersection once it starts moving.
    pub car_clearance_seconds: f64,
    /// Lower bound of the per-car start delay.
    pub start_delay_min_seconds: f64,
    /// Upper bound of the per-car start delay.
    pub start_delay_max_seconds: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            phase_seconds: 30.0,
            car_clearance_seconds: 5.0,
            start_delay_min_seconds: 0.5,
            start_delay_max_seconds: 3.0,
        }
    }
}

impl TimingConfig {
    /// Rejects parameter sets under which the discharge loop would never
    /// terminate or the delay range would be unsampleable.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.phase_seconds <= 0.0 {
            return Err(SchedulerError::Configuration(format!(
                "phase_seconds must be positive, got {}",
                self.phase_seconds
            )));
        }
        if self.start_delay_min_seconds > self.start_delay_max_seconds {
            return Err(SchedulerError::Configuration(format!(
                "start delay range is inverted: [{}, {}]",
                self.start_delay_min_seconds, self.start_delay_max_seconds
            )));
        }
        if self.start_delay_min_seconds < 0.0 {
            return Err(SchedulerError::Configuration(format!(
                "start_delay_min_seconds must not be negative, got {}",
                self.start_delay_min_seconds
            )));
        }
        if self.car_clearance_seconds + self.start_delay_min_seconds <= 0.0 {
            return Err(SchedulerError::Configuration(
                "car clearance plus minimum start delay must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Computes how many queued cars clear an approach during one green phase.
#[derive(Debug, Clone, Copy)]
pub struct DischargeModel {
    config: TimingConfig,
}

impl DischargeModel {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Samples per-car start delays until the phase time budget runs out.
    ///
    /// Each car costs its clearance time plus a start delay drawn uniformly
    /// from the configured range. The car is counted before the budget check,
    /// so the count is at least 1: the car that exhausts the budget still
    /// goes through.
    pub fn cars_through<R: Rng>(&self, rng: &mut R) -> u32 {
        let mut remaining = self.config.phase_seconds;
        let mut cars = 0u32;
        while remaining > 0.0 {
            let delay = rng.random_range(
                self.config.start_delay_min_seconds..=self.config.start_delay_max_seconds,
            );
            remaining -= self.config.car_clearance_seconds + delay;
            cars += 1;
        }
        cars
    }
}
