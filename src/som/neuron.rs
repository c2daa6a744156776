//! Neuron representation for the Self-Organizing Map.

use serde::{Deserialize, Serialize};

/// A neuron in the Self-Organizing Map.
///
/// Each neuron has a fixed position on the 2D grid and a weight vector
/// that the map pulls towards the inputs it wins or neighbours.
///
/// Equality compares position and weights only; `distance` is scratch
/// state and is not serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neuron {
    /// Column position on the grid, in `[0, X)`.
    pub x: usize,
    /// Row position on the grid, in `[0, Y)`.
    pub y: usize,
    /// Weight vector; empty until the map is initialized.
    pub weights: Vec<f64>,
    /// Distance to the input of the last `test` or learning step.
    #[serde(skip)]
    pub distance: f64,
}

impl Neuron {
    /// Creates a neuron with no weights.
    pub fn new(x: usize, y: usize) -> Self {
        Self::new_with_weights(x, y, Vec::new())
    }

    /// Creates a neuron with the given weights.
    pub fn new_with_weights(x: usize, y: usize, weights: Vec<f64>) -> Self {
        Self {
            x,
            y,
            weights,
            distance: 0.0,
        }
    }

    /// Returns the `(x, y)` grid coordinates.
    #[inline]
    pub fn coords(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Resets the weights to `width` zeros.
    pub fn reset_weights(&mut self, width: usize) {
        self.weights.clear();
        self.weights.resize(width, 0.0);
    }

    /// Moves the weights towards an input vector.
    ///
    /// Each coordinate becomes `w + coefficient * (input - w)`.
    #[inline]
    pub fn update_weights(&mut self, input: &[f64], coefficient: f64) {
        for (w, i) in self.weights.iter_mut().zip(input.iter()) {
            *w += coefficient * (i - *w);
        }
    }
}

impl PartialEq for Neuron {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.weights == other.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neuron_creation() {
        let neuron = Neuron::new(5, 10);
        assert_eq!(neuron.coords(), (5, 10));
        assert!(neuron.weights.is_empty());
        assert_eq!(neuron.distance, 0.0);
    }

    #[test]
    fn test_reset_weights() {
        let mut neuron = Neuron::new_with_weights(0, 0, vec![1.0, 2.0]);
        neuron.reset_weights(4);
        assert_eq!(neuron.weights, vec![0.0; 4]);
    }

    #[test]
    fn test_update_weights() {
        let mut neuron = Neuron::new_with_weights(0, 0, vec![0.0, 0.0, 2.0]);
        neuron.update_weights(&[1.0, 1.0, 1.0], 0.5);
        assert_eq!(neuron.weights, vec![0.5, 0.5, 1.5]);
    }

    #[test]
    fn test_full_coefficient_copies_input() {
        let mut neuron = Neuron::new_with_weights(0, 0, vec![0.5, -0.75]);
        neuron.update_weights(&[1.0, 0.25], 1.0);
        assert_eq!(neuron.weights, vec![1.0, 0.25]);
    }

    #[test]
    fn test_equality_ignores_distance() {
        let a = Neuron::new_with_weights(1, 2, vec![0.5]);
        let mut b = a.clone();
        b.distance = 3.0;
        assert_eq!(a, b);

        b.weights[0] = 0.25;
        assert_ne!(a, b);
    }
}
