//! Rectangular grid of neurons.

use crate::error::{Result, SomError};
use crate::som::Neuron;
use serde::{Deserialize, Serialize};

/// An `X by Y` grid of neurons stored in row-major order (`x * Y + y`).
///
/// A deserialized grid is checked with [`Grid::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    x_len: usize,
    y_len: usize,
    neurons: Vec<Neuron>,
}

/// Unchecked wire form of a [`Grid`].
#[derive(Deserialize)]
struct RawGrid {
    x_len: usize,
    y_len: usize,
    neurons: Vec<Neuron>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = SomError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let grid = Self {
            x_len: raw.x_len,
            y_len: raw.y_len,
            neurons: raw.neurons,
        };
        grid.validate()?;
        Ok(grid)
    }
}

impl Grid {
    /// Creates a grid of neurons with empty weight vectors.
    pub fn new(x_len: usize, y_len: usize) -> Self {
        let neurons = (0..x_len * y_len)
            .map(|i| Neuron::new(i / y_len, i % y_len))
            .collect();

        Self {
            x_len,
            y_len,
            neurons,
        }
    }

    /// Returns the `(X, Y)` dimensions.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.x_len, self.y_len)
    }

    /// Returns the total number of neurons.
    #[inline]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Returns true if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Checks that the grid is dense, its neurons sit at their row-major
    /// coordinates and all weight vectors share one width.
    pub fn validate(&self) -> Result<()> {
        if self.neurons.len() != self.x_len * self.y_len {
            return Err(SomError::Config(format!(
                "grid {}x{} holds {} neurons",
                self.x_len,
                self.y_len,
                self.neurons.len()
            )));
        }

        let width = self.weight_width();
        for (i, neuron) in self.neurons.iter().enumerate() {
            if neuron.coords() != (i / self.y_len, i % self.y_len) {
                return Err(SomError::Config(format!(
                    "neuron {} has coordinates {:?}",
                    i,
                    neuron.coords()
                )));
            }
            if neuron.weights.len() != width {
                return Err(SomError::DimensionMismatch {
                    expected: width,
                    actual: neuron.weights.len(),
                });
            }
        }
        Ok(())
    }

    /// Width of the neurons' weight vectors; zero before initialization.
    pub fn weight_width(&self) -> usize {
        self.neurons.first().map_or(0, |n| n.weights.len())
    }

    /// Converts `(x, y)` coordinates to a row-major index.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x * self.y_len + y
    }

    /// Gets a neuron by its position.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Neuron> {
        if x < self.x_len && y < self.y_len {
            self.neurons.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Gets a mutable reference to a neuron by its position.
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Neuron> {
        if x < self.x_len && y < self.y_len {
            let index = self.index(x, y);
            self.neurons.get_mut(index)
        } else {
            None
        }
    }

    /// All neurons in row-major order.
    #[inline]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// All neurons in row-major order, mutably.
    ///
    /// Coordinates are fixed; only weights and distances should change.
    #[inline]
    pub fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    /// Iterates over the neurons in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, Neuron> {
        self.neurons.iter()
    }

    /// Builds an `[x][y]` matrix from a per-neuron value.
    pub fn to_matrix<F>(&self, mut value: F) -> Vec<Vec<f64>>
    where
        F: FnMut(&Neuron) -> f64,
    {
        self.neurons
            .chunks(self.y_len.max(1))
            .take(self.x_len)
            .map(|column| column.iter().map(&mut value).collect())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Neuron;
    type IntoIter = std::slice::Iter<'a, Neuron>;

    fn into_iter(self) -> Self::IntoIter {
        self.neurons.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neuron_positions() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.dimensions(), (3, 4));

        for (i, neuron) in grid.iter().enumerate() {
            assert_eq!(neuron.x, i / 4);
            assert_eq!(neuron.y, i % 4);
            assert_eq!(grid.index(neuron.x, neuron.y), i);
        }
    }

    #[test]
    fn test_get() {
        let grid = Grid::new(2, 5);
        assert_eq!(grid.get(1, 3).map(Neuron::coords), Some((1, 3)));
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 5).is_none());
    }

    #[test]
    fn test_weight_width() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(grid.weight_width(), 0);
        for neuron in grid.neurons_mut() {
            neuron.reset_weights(3);
        }
        assert_eq!(grid.weight_width(), 3);
    }

    #[test]
    fn test_to_matrix() {
        let grid = Grid::new(2, 3);
        let matrix = grid.to_matrix(|n| (n.x * 10 + n.y) as f64);
        assert_eq!(matrix, vec![vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]]);
    }

    #[test]
    fn test_validate() {
        let mut grid = Grid::new(2, 2);
        for neuron in grid.neurons_mut() {
            neuron.reset_weights(2);
        }
        assert!(grid.validate().is_ok());

        grid.neurons_mut()[3].weights.push(1.0);
        assert_eq!(
            grid.validate(),
            Err(SomError::DimensionMismatch { expected: 2, actual: 3 })
        );

        grid.neurons_mut()[3].weights.pop();
        grid.neurons_mut().swap(1, 2);
        assert!(matches!(grid.validate(), Err(SomError::Config(_))));
    }

    #[test]
    fn test_deserialize_rejects_sparse_grid() {
        let json = r#"{"x_len":2,"y_len":2,"neurons":[{"x":0,"y":0,"weights":[1.0]}]}"#;
        let err = serde_json::from_str::<Grid>(json).unwrap_err();
        assert!(err.to_string().contains("holds 1 neurons"), "{err}");

        let json = r#"{"x_len":1,"y_len":2,"neurons":[
            {"x":0,"y":0,"weights":[1.0]},
            {"x":0,"y":1,"weights":[2.0]}
        ]}"#;
        let grid: Grid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.get(0, 1).map(|n| n.weights.clone()), Some(vec![2.0]));
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::new(0, 4);
        assert!(grid.is_empty());
        assert!(grid.to_matrix(|_| 0.0).is_empty());
    }
}
