//! Distance metrics for comparing weight vectors with inputs.

mod chebyshev;
mod euclidean;
mod manhattan;

pub use chebyshev::ChebyshevDistance;
pub use euclidean::EuclideanDistance;
pub use manhattan::ManhattanDistance;

use serde::{Deserialize, Serialize};

/// Trait for distance metrics between two equal-length vectors.
///
/// Implementations must be pure and symmetric, and return zero only for
/// identical vectors. Extra trailing coordinates of the longer vector are
/// ignored.
pub trait DistanceMetric: Send + Sync {
    /// Computes the dissimilarity between `x` and `y`.
    fn distance(&self, x: &[f64], y: &[f64]) -> f64;
}

/// Enum naming the built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceType {
    /// Euclidean distance.
    #[default]
    Euclidean,
    /// Manhattan (L1) distance.
    Manhattan,
    /// Chebyshev (L-infinity) distance.
    Chebyshev,
}

impl DistanceMetric for DistanceType {
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            DistanceType::Euclidean => EuclideanDistance.distance(x, y),
            DistanceType::Manhattan => ManhattanDistance.distance(x, y),
            DistanceType::Chebyshev => ChebyshevDistance.distance(x, y),
        }
    }
}

impl<F> DistanceMetric for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Send + Sync,
{
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        self(x, y)
    }
}
