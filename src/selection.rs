//! Strategies for picking the training vector of each iteration.

use crate::dataset::Dataset;
use crate::error::{Result, SomError};
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Hands out training vectors from a dataset.
///
/// The selector keeps only its own cursor state; the dataset is passed to
/// every call so the returned vector borrows from it directly.
pub trait Selector: Send {
    /// Prepares the selector for a pass over `dataset`.
    fn init(&mut self, dataset: &Dataset, rng: &mut dyn RngCore);

    /// Returns the next vector, or [`SomError::NoDataLeft`] when exhausted.
    fn next<'a>(&mut self, dataset: &'a Dataset, rng: &mut dyn RngCore) -> Result<&'a [f64]>;
}

/// Walks the dataset once in stored order.
#[derive(Debug, Clone, Default)]
pub struct SequentialSelector {
    index: usize,
}

impl SequentialSelector {
    /// Creates a new sequential selector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for SequentialSelector {
    fn init(&mut self, _dataset: &Dataset, _rng: &mut dyn RngCore) {
        self.index = 0;
    }

    fn next<'a>(&mut self, dataset: &'a Dataset, _rng: &mut dyn RngCore) -> Result<&'a [f64]> {
        let vector = dataset.get(self.index).ok_or(SomError::NoDataLeft)?;
        self.index += 1;
        Ok(vector)
    }
}

/// Endless random selection without repeats inside a cycle.
///
/// Any `N` consecutive calls that start a cycle return each of the `N`
/// dataset vectors exactly once; a fresh permutation is drawn when the
/// current one runs out.
#[derive(Debug, Clone, Default)]
pub struct RandomSelector {
    permutation: Vec<usize>,
    index: usize,
}

impl RandomSelector {
    /// Creates a new random selector.
    pub fn new() -> Self {
        Self::default()
    }

    fn reshuffle(&mut self, len: usize, rng: &mut dyn RngCore) {
        self.permutation.clear();
        self.permutation.extend(0..len);
        self.permutation.shuffle(rng);
        self.index = 0;
    }
}

impl Selector for RandomSelector {
    fn init(&mut self, dataset: &Dataset, rng: &mut dyn RngCore) {
        self.reshuffle(dataset.len(), rng);
    }

    fn next<'a>(&mut self, dataset: &'a Dataset, rng: &mut dyn RngCore) -> Result<&'a [f64]> {
        if dataset.is_empty() {
            return Err(SomError::NoDataLeft);
        }
        if self.index >= self.permutation.len() || self.permutation.len() != dataset.len() {
            self.reshuffle(dataset.len(), rng);
        }

        let vector = dataset
            .get(self.permutation[self.index])
            .ok_or(SomError::NoDataLeft)?;
        self.index += 1;
        Ok(vector)
    }
}

/// Serializable description of a selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorType {
    /// See [`SequentialSelector`].
    #[default]
    Sequential,
    /// See [`RandomSelector`].
    Random,
}

impl SelectorType {
    /// Builds the selector this variant names.
    pub fn build(&self) -> Box<dyn Selector> {
        match self {
            SelectorType::Sequential => Box::new(SequentialSelector::new()),
            SelectorType::Random => Box::new(RandomSelector::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scalar_dataset(n: usize) -> Dataset {
        Dataset::from_vectors((0..n).map(|i| vec![i as f64]).collect()).unwrap()
    }

    #[test]
    fn test_sequential_order_then_exhausted() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ds = scalar_dataset(3);
        let mut selector = SequentialSelector::new();
        selector.init(&ds, &mut rng);

        for i in 0..3 {
            assert_eq!(selector.next(&ds, &mut rng).unwrap(), &[i as f64]);
        }
        assert_eq!(selector.next(&ds, &mut rng), Err(SomError::NoDataLeft));
        assert_eq!(selector.next(&ds, &mut rng), Err(SomError::NoDataLeft));
    }

    #[test]
    fn test_sequential_init_rewinds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ds = scalar_dataset(2);
        let mut selector = SequentialSelector::new();
        selector.init(&ds, &mut rng);
        selector.next(&ds, &mut rng).unwrap();
        selector.next(&ds, &mut rng).unwrap();

        selector.init(&ds, &mut rng);
        assert_eq!(selector.next(&ds, &mut rng).unwrap(), &[0.0]);
    }

    #[test]
    fn test_random_selects_each_vector_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ds = scalar_dataset(100);
        let mut selector = RandomSelector::new();
        selector.init(&ds, &mut rng);

        // Three full cycles, each must cover the dataset exactly once.
        for _ in 0..3 {
            let mut selected = vec![0usize; ds.len()];
            for _ in 0..ds.len() {
                let vector = selector.next(&ds, &mut rng).unwrap();
                selected[vector[0] as usize] += 1;
            }
            assert!(selected.iter().all(|&count| count == 1));
        }
    }

    #[test]
    fn test_random_without_init() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ds = scalar_dataset(4);
        let mut selector = RandomSelector::new();

        let mut seen: Vec<f64> = (0..4)
            .map(|_| selector.next(&ds, &mut rng).unwrap()[0])
            .collect();
        seen.sort_by(f64::total_cmp);
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_random_empty_dataset() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ds = Dataset::new();
        let mut selector = RandomSelector::new();
        selector.init(&ds, &mut rng);
        assert_eq!(selector.next(&ds, &mut rng), Err(SomError::NoDataLeft));
    }
}
