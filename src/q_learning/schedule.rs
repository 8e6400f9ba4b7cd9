//! Exploration-rate schedules for ε-greedy action selection

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How epsilon evolves as the agent acts.
///
/// Each call to [`ExplorationSchedule::advance`] moves the schedule one step;
/// [`ExplorationSchedule::epsilon`] reads the current value without side
/// effects. Both variants are monotonically non-increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorationSchedule {
    /// Multiply epsilon by `decay` every step, never dropping below `floor`.
    Geometric {
        initial: f64,
        decay: f64,
        #[serde(default)]
        floor: f64,
        #[serde(skip)]
        current: Option<f64>,
    },
    /// Interpolate from `max` to `min` over `period` steps, then hold `min`.
    Linear {
        max: f64,
        min: f64,
        period: u64,
        #[serde(skip)]
        steps: u64,
    },
}

impl ExplorationSchedule {
    /// Geometric decay without a floor.
    pub fn geometric(initial: f64, decay: f64) -> Self {
        Self::geometric_with_floor(initial, decay, 0.0)
    }

    pub fn geometric_with_floor(initial: f64, decay: f64, floor: f64) -> Self {
        ExplorationSchedule::Geometric {
            initial,
            decay,
            floor,
            current: None,
        }
    }

    pub fn linear(max: f64, min: f64, period: u64) -> Self {
        ExplorationSchedule::Linear {
            max,
            min,
            period,
            steps: 0,
        }
    }

    /// Fixed exploration rate.
    pub fn constant(epsilon: f64) -> Self {
        Self::geometric(epsilon, 1.0)
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        match *self {
            ExplorationSchedule::Geometric {
                initial, current, ..
            } => current.unwrap_or(initial),
            ExplorationSchedule::Linear {
                max,
                min,
                period,
                steps,
            } => {
                if steps >= period {
                    min
                } else {
                    max - (max - min) * (steps as f64 / period as f64)
                }
            }
        }
    }

    /// Move one step along the schedule and return the new epsilon.
    pub fn advance(&mut self) -> f64 {
        match self {
            ExplorationSchedule::Geometric {
                initial,
                decay,
                floor,
                current,
            } => {
                let value = current.unwrap_or(*initial);
                let next = if value <= *floor {
                    value
                } else {
                    (value * *decay).max(*floor)
                };
                *current = Some(next);
            }
            ExplorationSchedule::Linear { steps, period, .. } => {
                if *steps < *period {
                    *steps += 1;
                }
            }
        }
        self.epsilon()
    }

    /// Return to the initial exploration rate.
    pub fn restart(&mut self) {
        match self {
            ExplorationSchedule::Geometric { current, .. } => *current = None,
            ExplorationSchedule::Linear { steps, .. } => *steps = 0,
        }
    }

    /// Check parameters for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        match *self {
            ExplorationSchedule::Geometric {
                initial,
                decay,
                floor,
                ..
            } => {
                if !(initial.is_finite() && initial >= 0.0) {
                    return Err(Error::config(format!(
                        "initial epsilon must be non-negative (got {initial})"
                    )));
                }
                if !(decay > 0.0 && decay <= 1.0) {
                    return Err(Error::config(format!(
                        "epsilon decay must be in (0, 1] (got {decay})"
                    )));
                }
                if !(floor.is_finite() && floor >= 0.0) {
                    return Err(Error::config(format!(
                        "epsilon floor must be non-negative (got {floor})"
                    )));
                }
            }
            ExplorationSchedule::Linear {
                max, min, period, ..
            } => {
                if !(min.is_finite() && max.is_finite() && min >= 0.0) {
                    return Err(Error::config(format!(
                        "linear epsilon bounds must be finite and non-negative (got {max}..{min})"
                    )));
                }
                if min > max {
                    return Err(Error::config(format!(
                        "linear epsilon min {min} exceeds max {max}"
                    )));
                }
                if period == 0 {
                    return Err(Error::config("linear epsilon period must be positive"));
                }
            }
        }
        Ok(())
    }
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self::geometric(1.2, 0.999)
    }
}
