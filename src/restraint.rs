//! Learning-rate ("restraint") schedules.
//!
//! A restraint maps the current iteration `t` and the total number of
//! iterations `T` to a coefficient applied uniformly to every neuron update
//! of that iteration.

use crate::error::{Result, SomError};
use serde::{Deserialize, Serialize};

/// Computes the learning-rate coefficient for an iteration.
pub trait Restraint: Send {
    /// `iteration` runs over `[0, total)`.
    fn coefficient(&self, iteration: usize, total: usize) -> f64;
}

/// Always 1: updates are never damped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRestraint;

impl Restraint for NoRestraint {
    #[inline]
    fn coefficient(&self, _iteration: usize, _total: usize) -> f64 {
        1.0
    }
}

/// `a / (b + t)`.
#[derive(Debug, Clone, Copy)]
pub struct SimpleRestraint {
    /// Numerator.
    pub a: f64,
    /// Offset added to the iteration.
    pub b: f64,
}

impl SimpleRestraint {
    /// Creates a new `a / (b + t)` schedule.
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl Restraint for SimpleRestraint {
    fn coefficient(&self, iteration: usize, _total: usize) -> f64 {
        self.a / (self.b + iteration as f64)
    }
}

/// Exponential decay: `initial_rate * exp(-t / T)`.
///
/// When `time_constant` is set it replaces `T` as the denominator.
#[derive(Debug, Clone, Copy)]
pub struct ExpRestraint {
    /// Coefficient at `t = 0`.
    pub initial_rate: f64,
    /// Fixed decay denominator; `None` uses the total iteration count.
    pub time_constant: Option<f64>,
}

impl ExpRestraint {
    /// Decays over the total iteration count.
    pub fn new(initial_rate: f64) -> Self {
        Self {
            initial_rate,
            time_constant: None,
        }
    }

    /// Decays over a fixed denominator instead of the iteration count.
    ///
    /// The time constant must be positive.
    pub fn with_time_constant(initial_rate: f64, time_constant: f64) -> Result<Self> {
        if time_constant.is_nan() || time_constant <= 0.0 {
            return Err(SomError::Config(format!(
                "exponential restraint time constant must be positive, got {time_constant}"
            )));
        }
        Ok(Self {
            initial_rate,
            time_constant: Some(time_constant),
        })
    }
}

impl Restraint for ExpRestraint {
    fn coefficient(&self, iteration: usize, total: usize) -> f64 {
        let t = iteration as f64;
        let denominator = self.time_constant.unwrap_or(total as f64);
        self.initial_rate * (-t / denominator).exp()
    }
}

/// Serializable description of a restraint schedule.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RestraintType {
    /// See [`NoRestraint`].
    #[default]
    None,
    /// See [`SimpleRestraint`].
    Simple {
        /// Numerator.
        a: f64,
        /// Offset added to the iteration.
        b: f64,
    },
    /// See [`ExpRestraint`].
    Exponential {
        /// Coefficient at `t = 0`.
        initial_rate: f64,
        /// Optional fixed decay denominator.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_constant: Option<f64>,
    },
}

impl RestraintType {
    /// Builds the schedule this variant names.
    pub fn build(&self) -> Box<dyn Restraint> {
        match *self {
            RestraintType::None => Box::new(NoRestraint),
            RestraintType::Simple { a, b } => Box::new(SimpleRestraint::new(a, b)),
            RestraintType::Exponential {
                initial_rate,
                time_constant,
            } => Box::new(ExpRestraint {
                initial_rate,
                time_constant,
            }),
        }
    }
}
