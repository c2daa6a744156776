//! Chebyshev distance.

use crate::distance::DistanceMetric;

/// Chebyshev distance: `max(|x_i - y_i|)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChebyshevDistance;

impl DistanceMetric for ChebyshevDistance {
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}
