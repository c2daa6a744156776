//! Manhattan distance.

use crate::distance::DistanceMetric;

/// Manhattan distance: `sum(|x_i - y_i|)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl DistanceMetric for ManhattanDistance {
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        x.iter().zip(y.iter()).map(|(a, b)| (a - b).abs()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_offsets() {
        let dist = ManhattanDistance.distance(&[1.0, 2.0, 3.0], &[2.0, 0.0, 3.5]);
        assert!((dist - 3.5).abs() < 1e-10);
    }
}
