//! Input adapters applied to every vector before it reaches the grid.

use crate::dataset::Dataset;
use crate::error::{Result, SomError};
use serde::{Deserialize, Serialize};

/// Pre-processes an input vector in place.
pub trait InputAdapter: Send + Sync {
    /// Adapts `vector` in place.
    fn adapt(&self, vector: &mut [f64]) -> Result<()>;
}

/// Leaves inputs unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAdapter;

impl InputAdapter for IdentityAdapter {
    #[inline]
    fn adapt(&self, _vector: &mut [f64]) -> Result<()> {
        Ok(())
    }
}

/// Scales each coordinate into `[0, 1]` using per-coordinate bounds.
///
/// `v_i = (v_i - min_i) / (max_i - min_i)`. A coordinate whose bounds are
/// equal maps to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxAdapter {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl MinMaxAdapter {
    /// Creates an adapter from explicit bounds.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Result<Self> {
        if min.len() != max.len() {
            return Err(SomError::DimensionMismatch {
                expected: min.len(),
                actual: max.len(),
            });
        }
        Ok(Self { min, max })
    }

    /// Derives the bounds from the per-coordinate extremes of a dataset.
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        let width = dataset.width()?;
        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];

        for vector in dataset.iter() {
            for (k, &v) in vector.iter().enumerate() {
                min[k] = min[k].min(v);
                max[k] = max[k].max(v);
            }
        }

        Ok(Self { min, max })
    }

    /// Lower bounds.
    pub fn min(&self) -> &[f64] {
        &self.min
    }

    /// Upper bounds.
    pub fn max(&self) -> &[f64] {
        &self.max
    }
}

impl InputAdapter for MinMaxAdapter {
    fn adapt(&self, vector: &mut [f64]) -> Result<()> {
        if vector.len() != self.min.len() {
            return Err(SomError::DimensionMismatch {
                expected: self.min.len(),
                actual: vector.len(),
            });
        }

        for ((v, &lo), &hi) in vector.iter_mut().zip(&self.min).zip(&self.max) {
            let range = hi - lo;
            *v = if range == 0.0 { 0.0 } else { (*v - lo) / range };
        }
        Ok(())
    }
}

/// Serializable description of an input adapter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdapterType {
    /// See [`IdentityAdapter`].
    #[default]
    Identity,
    /// See [`MinMaxAdapter`].
    MinMax {
        /// Lower bounds.
        min: Vec<f64>,
        /// Upper bounds.
        max: Vec<f64>,
    },
}

impl AdapterType {
    /// Builds the adapter this variant names.
    pub fn build(&self) -> Result<Box<dyn InputAdapter>> {
        let adapter: Box<dyn InputAdapter> = match self {
            AdapterType::Identity => Box::new(IdentityAdapter),
            AdapterType::MinMax { min, max } => {
                Box::new(MinMaxAdapter::new(min.clone(), max.clone())?)
            }
        };
        Ok(adapter)
    }
}
