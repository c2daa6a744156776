//! Configuration for the SOM engine.

use crate::adapter::AdapterType;
use crate::distance::DistanceType;
use crate::error::{Result, SomError};
use crate::influence::InfluenceType;
use crate::init::InitializerType;
use crate::restraint::RestraintType;
use crate::selection::SelectorType;
use serde::{Deserialize, Serialize};

/// Self-Organizing Map configuration.
///
/// Describes the grid and one variant of every policy family. Caller-supplied
/// policies (closures, custom trait impls) are set on the [`crate::Som`]
/// directly instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SomConfig {
    /// Number of grid columns (`X`).
    /// Default: 10.
    pub x_dim: usize,

    /// Number of grid rows (`Y`).
    /// Default: 10.
    pub y_dim: usize,

    /// Random seed for reproducibility.
    /// Default: None (random).
    pub seed: Option<u64>,

    /// Weight initialization strategy.
    /// Default: zero-fill.
    pub initializer: InitializerType,

    /// Training vector selection strategy.
    /// Default: sequential.
    pub selector: SelectorType,

    /// Learning-rate schedule.
    /// Default: none (constant 1).
    pub restraint: RestraintType,

    /// Neighborhood influence function.
    /// Default: BMU only.
    pub influence: InfluenceType,

    /// Distance metric for BMU search.
    /// Default: Euclidean.
    pub distance: DistanceType,

    /// Input pre-processing.
    /// Default: identity.
    pub adapter: AdapterType,
}

impl Default for SomConfig {
    fn default() -> Self {
        Self {
            x_dim: 10,
            y_dim: 10,
            seed: None,
            initializer: InitializerType::default(),
            selector: SelectorType::default(),
            restraint: RestraintType::default(),
            influence: InfluenceType::default(),
            distance: DistanceType::default(),
            adapter: AdapterType::default(),
        }
    }
}

impl SomConfig {
    /// Creates a configuration for an `x_dim` by `y_dim` grid with default
    /// policies.
    pub fn new(x_dim: usize, y_dim: usize) -> Self {
        Self {
            x_dim,
            y_dim,
            ..Default::default()
        }
    }

    /// Returns the total number of neurons in the SOM.
    #[inline]
    pub fn total_neurons(&self) -> usize {
        self.x_dim * self.y_dim
    }

    /// Checks that the configuration describes a usable map.
    pub fn validate(&self) -> Result<()> {
        if self.x_dim == 0 || self.y_dim == 0 {
            return Err(SomError::Config(format!(
                "grid must have at least one neuron, got {}x{}",
                self.x_dim, self.y_dim
            )));
        }

        if let RestraintType::Exponential {
            time_constant: Some(n),
            ..
        } = self.restraint
        {
            if n.is_nan() || n <= 0.0 {
                return Err(SomError::Config(format!(
                    "exponential restraint time constant must be positive, got {n}"
                )));
            }
        }

        match self.influence {
            InfluenceType::RadiusReducing { radius } if radius < 0.0 => {
                return Err(SomError::Config(format!(
                    "influence radius must not be negative, got {radius}"
                )));
            }
            InfluenceType::Gaussian { initial_width } if initial_width <= 0.0 => {
                return Err(SomError::Config(format!(
                    "gaussian width must be positive, got {initial_width}"
                )));
            }
            _ => {}
        }

        if let AdapterType::MinMax { min, max } = &self.adapter {
            if min.len() != max.len() {
                return Err(SomError::Config(format!(
                    "min-max bounds differ in width: {} vs {}",
                    min.len(),
                    max.len()
                )));
            }
        }

        Ok(())
    }
}
