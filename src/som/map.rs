//! Self-Organizing Map (SOM) engine.

use crate::adapter::{IdentityAdapter, InputAdapter};
use crate::config::SomConfig;
use crate::dataset::Dataset;
use crate::distance::{DistanceMetric, EuclideanDistance};
use crate::error::{Result, SomError};
use crate::influence::{BmuOnly, Influence};
use crate::init::{Initializer, ZeroInitializer};
use crate::restraint::{NoRestraint, Restraint};
use crate::selection::{SequentialSelector, Selector};
use crate::som::{Grid, Neuron};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Iterations between progress log lines.
const LOG_INTERVAL: usize = 10_000;

/// A Self-Organizing Map.
///
/// Owns an `X by Y` grid of neurons and one policy of each kind. Training
/// pulls the best matching unit (BMU) and, depending on the influence
/// function, its grid neighbours towards each selected input, so that
/// nearby cells end up representing similar inputs.
///
/// Policies can be swapped between training calls. `learn` and `test`
/// mutate the neurons and take `&mut self`; the remaining queries are
/// read-only.
pub struct Som {
    grid: Grid,
    initializer: Box<dyn Initializer>,
    selector: Box<dyn Selector>,
    restraint: Box<dyn Restraint>,
    influence: Box<dyn Influence>,
    distance: Box<dyn DistanceMetric>,
    adapter: Box<dyn InputAdapter>,
    rng: ChaCha8Rng,
}

impl Som {
    /// Creates an `x_dim` by `y_dim` map with default policies.
    ///
    /// Defaults: zero initializer, sequential selector, no restraint,
    /// BMU-only influence, Euclidean distance, identity adapter. The random
    /// source is seeded from entropy; see [`Som::set_seed`].
    pub fn new(x_dim: usize, y_dim: usize) -> Self {
        Self::from_grid_unchecked(Grid::new(x_dim, y_dim))
    }

    /// Creates a map from a validated configuration.
    pub fn from_config(config: &SomConfig) -> Result<Self> {
        config.validate()?;

        let mut som = Self::new(config.x_dim, config.y_dim);
        som.initializer = config.initializer.build();
        som.selector = config.selector.build();
        som.restraint = config.restraint.build();
        som.influence = config.influence.build();
        som.distance = Box::new(config.distance);
        som.adapter = config.adapter.build()?;
        if let Some(seed) = config.seed {
            som.set_seed(seed);
        }

        Ok(som)
    }

    /// Wraps an existing grid, for example one restored by a collaborator,
    /// with default policies.
    ///
    /// The grid must be dense and all neurons must share one weight width.
    pub fn from_grid(grid: Grid) -> Result<Self> {
        grid.validate()?;
        Ok(Self::from_grid_unchecked(grid))
    }

    fn from_grid_unchecked(grid: Grid) -> Self {
        Self {
            grid,
            initializer: Box::new(ZeroInitializer),
            selector: Box::new(SequentialSelector::new()),
            restraint: Box::new(NoRestraint),
            influence: Box::new(BmuOnly),
            distance: Box::new(EuclideanDistance),
            adapter: Box::new(IdentityAdapter),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Sets the weight initialization strategy.
    pub fn with_initializer(mut self, initializer: impl Initializer + 'static) -> Self {
        self.set_initializer(initializer);
        self
    }

    /// Sets the training vector selection strategy.
    pub fn with_selector(mut self, selector: impl Selector + 'static) -> Self {
        self.set_selector(selector);
        self
    }

    /// Sets the learning-rate schedule.
    pub fn with_restraint(mut self, restraint: impl Restraint + 'static) -> Self {
        self.set_restraint(restraint);
        self
    }

    /// Sets the neighborhood influence function.
    pub fn with_influence(mut self, influence: impl Influence + 'static) -> Self {
        self.set_influence(influence);
        self
    }

    /// Sets the distance metric.
    pub fn with_distance(mut self, distance: impl DistanceMetric + 'static) -> Self {
        self.set_distance(distance);
        self
    }

    /// Sets the input adapter.
    pub fn with_adapter(mut self, adapter: impl InputAdapter + 'static) -> Self {
        self.set_adapter(adapter);
        self
    }

    /// Seeds the random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_seed(seed);
        self
    }

    /// Replaces the weight initialization strategy.
    pub fn set_initializer(&mut self, initializer: impl Initializer + 'static) {
        self.initializer = Box::new(initializer);
    }

    /// Replaces the training vector selection strategy.
    pub fn set_selector(&mut self, selector: impl Selector + 'static) {
        self.selector = Box::new(selector);
    }

    /// Replaces the learning-rate schedule.
    pub fn set_restraint(&mut self, restraint: impl Restraint + 'static) {
        self.restraint = Box::new(restraint);
    }

    /// Replaces the neighborhood influence function.
    pub fn set_influence(&mut self, influence: impl Influence + 'static) {
        self.influence = Box::new(influence);
    }

    /// Replaces the distance metric.
    pub fn set_distance(&mut self, distance: impl DistanceMetric + 'static) {
        self.distance = Box::new(distance);
    }

    /// Replaces the input adapter.
    pub fn set_adapter(&mut self, adapter: impl InputAdapter + 'static) {
        self.adapter = Box::new(adapter);
    }

    /// Reseeds the random source used for initialization, selection and
    /// BMU tie-breaking.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// The neuron grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All neurons in row-major order.
    #[inline]
    pub fn neurons(&self) -> &[Neuron] {
        self.grid.neurons()
    }

    /// Returns the `(X, Y)` grid dimensions.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    /// The configured distance metric.
    pub fn distance_metric(&self) -> &dyn DistanceMetric {
        self.distance.as_ref()
    }

    /// Trains the map on `dataset` for up to `iterations` steps.
    ///
    /// Runs the initializer and the selector's setup, then for every step
    /// adapts the next vector, finds its BMU and applies
    /// `w += restraint(t, T) * influence(bmu, t, T, x, y) * (input - w)` to
    /// every neuron. Stops early when the selector runs out of data.
    ///
    /// Returns the number of completed steps.
    pub fn learn(&mut self, dataset: &Dataset, iterations: usize) -> Result<usize> {
        self.initializer
            .init(dataset, &mut self.grid, &mut self.rng)?;
        self.selector.init(dataset, &mut self.rng);

        info!(
            "Starting SOM training with {} iterations on {} vectors ({} neurons, width {})",
            iterations,
            dataset.len(),
            self.grid.len(),
            self.grid.weight_width()
        );

        let mut input = Vec::with_capacity(self.grid.weight_width());
        let mut completed = 0;

        for iteration in 0..iterations {
            let vector = match self.selector.next(dataset, &mut self.rng) {
                Ok(vector) => vector,
                Err(SomError::NoDataLeft) => {
                    debug!("Selector exhausted after {} iterations", iteration);
                    break;
                }
                Err(err) => return Err(err),
            };

            input.clear();
            input.extend_from_slice(vector);
            self.adapter.adapt(&mut input)?;

            self.compute_distances(&input)?;
            let bmu = self.find_bmu().ok_or(SomError::EmptyGrid)?;
            let bmu_coords = self.grid.neurons()[bmu].coords();
            self.update(&input, bmu_coords, iteration, iterations);
            completed += 1;

            if iteration % LOG_INTERVAL == 0 {
                debug!(
                    "Iteration {}/{}: restraint={:.4}, bmu={:?}",
                    iteration,
                    iterations,
                    self.restraint.coefficient(iteration, iterations),
                    bmu_coords
                );
            }
        }

        info!("SOM training completed after {} iterations", completed);
        Ok(completed)
    }

    /// Finds the BMU for `vector` without changing any weights.
    ///
    /// Every neuron's `distance` is overwritten with its distance to the
    /// adapted vector.
    pub fn test(&mut self, vector: &[f64]) -> Result<&Neuron> {
        let input = self.adapted(vector)?;
        self.compute_distances(&input)?;
        let bmu = self.find_bmu().ok_or(SomError::EmptyGrid)?;
        Ok(&self.grid.neurons()[bmu])
    }

    /// Distances from the adapted `vector` to every neuron, indexed `[x][y]`.
    ///
    /// Leaves the neurons untouched.
    pub fn compute_distance_matrix(&self, vector: &[f64]) -> Result<Vec<Vec<f64>>> {
        let input = self.adapted(vector)?;
        self.check_width(input.len())?;

        let (x_dim, y_dim) = self.grid.dimensions();
        if y_dim == 0 {
            return Ok(vec![Vec::new(); x_dim]);
        }

        let metric = &self.distance;
        Ok(self
            .grid
            .neurons()
            .par_chunks(y_dim)
            .map(|column| {
                column
                    .iter()
                    .map(|neuron| metric.distance(&input, &neuron.weights))
                    .collect()
            })
            .collect())
    }

    /// Splits the weights by coordinate.
    ///
    /// `result[k][x][y]` is the `k`-th weight of neuron `(x, y)`.
    pub fn separate_weights(&self) -> Vec<Vec<Vec<f64>>> {
        (0..self.grid.weight_width())
            .map(|k| self.grid.to_matrix(|neuron| neuron.weights[k]))
            .collect()
    }

    /// Copies `vector` and runs it through the input adapter.
    pub(crate) fn adapted(&self, vector: &[f64]) -> Result<Vec<f64>> {
        let mut input = vector.to_vec();
        self.adapter.adapt(&mut input)?;
        Ok(input)
    }

    /// An uninitialized grid accepts any input width.
    pub(crate) fn check_width(&self, width: usize) -> Result<()> {
        let expected = self.grid.weight_width();
        if expected != 0 && expected != width {
            return Err(SomError::DimensionMismatch {
                expected,
                actual: width,
            });
        }
        Ok(())
    }

    fn compute_distances(&mut self, input: &[f64]) -> Result<()> {
        self.check_width(input.len())?;

        let metric = &self.distance;
        for neuron in self.grid.neurons_mut() {
            neuron.distance = metric.distance(input, &neuron.weights);
        }
        Ok(())
    }

    /// Index of the neuron with the smallest stored distance.
    ///
    /// Ties are broken uniformly at random; the random source is only
    /// consulted when there is a tie.
    fn find_bmu(&mut self) -> Option<usize> {
        let neurons = self.grid.neurons();
        if neurons.is_empty() {
            return None;
        }

        let min = neurons
            .iter()
            .map(|n| n.distance)
            .fold(f64::INFINITY, f64::min);
        let ties = neurons.iter().filter(|n| n.distance == min).count();

        let pick = match ties {
            // Only NaN distances: fall back to the first cell.
            0 => return Some(0),
            1 => 0,
            n => self.rng.gen_range(0..n),
        };

        neurons
            .iter()
            .enumerate()
            .filter(|(_, n)| n.distance == min)
            .nth(pick)
            .map(|(i, _)| i)
    }

    fn update(&mut self, input: &[f64], bmu: (usize, usize), iteration: usize, total: usize) {
        let restraint = self.restraint.coefficient(iteration, total);
        let influence = &self.influence;

        for neuron in self.grid.neurons_mut() {
            let coefficient = restraint * influence.influence(bmu, iteration, total, neuron.coords());
            if coefficient != 0.0 {
                neuron.update_weights(input, coefficient);
            }
        }
    }
}

impl std::fmt::Debug for Som {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (x_dim, y_dim) = self.grid.dimensions();
        f.debug_struct("Som")
            .field("x_dim", &x_dim)
            .field("y_dim", &y_dim)
            .field("weight_width", &self.grid.weight_width())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceType;
    use crate::influence::{Gaussian, RadiusReducing};
    use crate::init::RandomInitializer;
    use crate::restraint::ExpRestraint;
    use crate::selection::RandomSelector;

    fn dataset(vectors: &[&[f64]]) -> Dataset {
        Dataset::from_vectors(vectors.iter().map(|v| v.to_vec()).collect()).unwrap()
    }

    fn set_weights(som: &mut Som, weights: &[(usize, usize, Vec<f64>)]) {
        for (x, y, w) in weights {
            som.grid.get_mut(*x, *y).unwrap().weights = w.clone();
        }
    }

    #[test]
    fn test_som_creation() {
        let som = Som::new(3, 4);
        assert_eq!(som.dimensions(), (3, 4));
        assert_eq!(som.neurons().len(), 12);
        assert_eq!(som.grid().weight_width(), 0);
    }

    #[test]
    fn test_learn_zero_iterations() {
        let ds = dataset(&[&[0.1, 0.2, 0.3], &[0.9, 0.8, 0.7]]);
        let mut som = Som::new(4, 4)
            .with_initializer(RandomInitializer)
            .with_seed(42);

        let completed = som.learn(&ds, 0).unwrap();
        assert_eq!(completed, 0);

        // Same seed, same initializer: weights are exactly the initial ones.
        let mut reference = Grid::new(4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        RandomInitializer.init(&ds, &mut reference, &mut rng).unwrap();

        for (neuron, expected) in som.neurons().iter().zip(reference.iter()) {
            assert_eq!(neuron.weights.len(), 3);
            assert_eq!(neuron.weights, expected.weights);
        }
    }

    #[test]
    fn test_learn_sequential_stops_early() {
        let ds = dataset(&[&[1.0], &[2.0], &[3.0]]);
        let mut som = Som::new(2, 2).with_seed(1);

        let completed = som.learn(&ds, 100).unwrap();
        assert_eq!(completed, 3);
    }

    #[test]
    fn test_learn_random_selector_runs_all_iterations() {
        let ds = dataset(&[&[1.0], &[2.0], &[3.0]]);
        let mut som = Som::new(2, 2)
            .with_selector(RandomSelector::new())
            .with_seed(1);

        assert_eq!(som.learn(&ds, 50).unwrap(), 50);
    }

    #[test]
    fn test_learn_empty_dataset() {
        let mut som = Som::new(2, 2);
        assert_eq!(som.learn(&Dataset::new(), 10), Err(SomError::EmptyDataset));
    }

    #[test]
    fn test_bmu_only_update_copies_input() {
        // Zero weights everywhere: the first input ties all neurons, and
        // with no restraint the winner becomes exactly the input.
        let ds = dataset(&[&[1.0, 1.0]]);
        let mut som = Som::new(3, 3).with_seed(5);
        som.learn(&ds, 1).unwrap();

        let moved: Vec<&Neuron> = som
            .neurons()
            .iter()
            .filter(|n| n.weights == vec![1.0, 1.0])
            .collect();
        let untouched = som
            .neurons()
            .iter()
            .filter(|n| n.weights == vec![0.0, 0.0])
            .count();
        assert_eq!(moved.len(), 1);
        assert_eq!(untouched, 8);
    }

    #[test]
    fn test_update_rule_with_restraint_and_influence() {
        let mut som = Som::new(3, 1)
            .with_restraint(ExpRestraint::new(0.5))
            .with_influence(RadiusReducing::new(1.0));
        set_weights(
            &mut som,
            &[
                (0, 0, vec![0.0]),
                (1, 0, vec![0.0]),
                (2, 0, vec![0.0]),
            ],
        );

        // BMU is (1, 0) when (1, 0) is strictly closest.
        som.grid.get_mut(1, 0).unwrap().weights = vec![0.5];
        som.compute_distances(&[1.0]).unwrap();
        let bmu = som.find_bmu().unwrap();
        assert_eq!(som.neurons()[bmu].coords(), (1, 0));

        som.update(&[1.0], (1, 0), 0, 10);
        // Coefficient 0.5 at t = 0, all three cells within radius 1.
        assert_eq!(som.grid.get(0, 0).unwrap().weights, vec![0.5]);
        assert_eq!(som.grid.get(1, 0).unwrap().weights, vec![0.75]);
        assert_eq!(som.grid.get(2, 0).unwrap().weights, vec![0.5]);
    }

    #[test]
    fn test_find_bmu_unique() {
        let mut som = Som::new(4, 4);
        for neuron in som.grid.neurons_mut() {
            neuron.reset_weights(3);
        }
        som.grid.get_mut(1, 2).unwrap().weights = vec![1.0, 0.0, 0.0];

        let bmu = som.test(&[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(bmu.coords(), (1, 2));
        assert_eq!(bmu.distance, 0.0);
    }

    #[test]
    fn test_find_bmu_ties_cover_candidates() {
        let mut som = Som::new(2, 2).with_seed(11);
        set_weights(
            &mut som,
            &[
                (0, 0, vec![1.0]),
                (0, 1, vec![5.0]),
                (1, 0, vec![1.0]),
                (1, 1, vec![-3.0]),
            ],
        );

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let bmu = som.test(&[1.0]).unwrap().coords();
            assert!(bmu == (0, 0) || bmu == (1, 0));
            seen.insert(bmu);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let ds = dataset(&[&[0.1, 0.2, 0.3]]);
        let mut som = Som::new(2, 2);
        som.learn(&ds, 1).unwrap();

        let err = som.test(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, SomError::DimensionMismatch { expected: 3, actual: 2 });
        assert!(som.compute_distance_matrix(&[1.0]).is_err());
    }

    #[test]
    fn test_uninitialized_grid_gives_zero_distances() {
        let mut som = Som::new(2, 3);
        let bmu = som.test(&[4.0, 2.0]).unwrap();
        assert_eq!(bmu.distance, 0.0);

        let matrix = som.compute_distance_matrix(&[4.0, 2.0]).unwrap();
        assert!(matrix.iter().flatten().all(|&d| d == 0.0));
    }

    #[test]
    fn test_empty_grid() {
        let mut som = Som::new(0, 0);
        assert_eq!(som.test(&[1.0]).unwrap_err(), SomError::EmptyGrid);
    }

    #[test]
    fn test_distance_matrix_matches_test() {
        let ds = dataset(&[&[0.1, 0.2, 0.3], &[0.9, 0.8, 0.7]]);
        let mut som = Som::new(5, 5)
            .with_initializer(RandomInitializer)
            .with_seed(3);
        som.learn(&ds, ds.len()).unwrap();

        let vector = [0.4, 0.5, 0.6];
        som.test(&vector).unwrap();
        let distances = som.compute_distance_matrix(&vector).unwrap();

        assert_eq!(distances.len(), 5);
        for neuron in som.neurons() {
            assert_eq!(distances[neuron.x][neuron.y], neuron.distance);
        }
    }

    #[test]
    fn test_distance_matrix_does_not_touch_neurons() {
        let mut som = Som::new(2, 2).with_distance(DistanceType::Manhattan);
        set_weights(
            &mut som,
            &[
                (0, 0, vec![0.0, 0.0]),
                (0, 1, vec![1.0, 0.0]),
                (1, 0, vec![0.0, 1.0]),
                (1, 1, vec![1.0, 1.0]),
            ],
        );

        let matrix = som.compute_distance_matrix(&[1.0, 1.0]).unwrap();
        assert_eq!(matrix, vec![vec![2.0, 1.0], vec![1.0, 0.0]]);
        assert!(som.neurons().iter().all(|n| n.distance == 0.0));
    }

    #[test]
    fn test_separate_weights() {
        let ds = dataset(&[&[0.1, 0.2, 0.3]]);
        let mut som = Som::new(5, 4)
            .with_initializer(RandomInitializer)
            .with_seed(8);
        som.learn(&ds, ds.len()).unwrap();

        let separated = som.separate_weights();
        assert_eq!(separated.len(), 3);
        for neuron in som.neurons() {
            for (k, &w) in neuron.weights.iter().enumerate() {
                assert_eq!(separated[k][neuron.x][neuron.y], w);
            }
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let ds = dataset(&[&[0.0, 0.0], &[1.0, 1.0], &[0.0, 1.0], &[1.0, 0.0]]);
        let train = || {
            let mut som = Som::new(4, 4)
                .with_initializer(RandomInitializer)
                .with_selector(RandomSelector::new())
                .with_influence(Gaussian::new(2.0))
                .with_seed(2024);
            som.learn(&ds, 200).unwrap();
            som.neurons().to_vec()
        };

        assert_eq!(train(), train());
    }

    #[test]
    fn test_from_config() {
        let mut config = SomConfig::new(3, 2);
        config.seed = Some(1);
        config.selector = crate::selection::SelectorType::Random;

        let mut som = Som::from_config(&config).unwrap();
        assert_eq!(som.dimensions(), (3, 2));

        let ds = dataset(&[&[1.0]]);
        // A random selector never runs dry.
        assert_eq!(som.learn(&ds, 7).unwrap(), 7);

        assert!(Som::from_config(&SomConfig::new(0, 2)).is_err());
    }

    #[test]
    fn test_from_grid_validates() {
        let mut grid = Grid::new(2, 2);
        for neuron in grid.neurons_mut() {
            neuron.reset_weights(2);
        }
        assert!(Som::from_grid(grid.clone()).is_ok());

        grid.get_mut(1, 1).unwrap().weights.push(0.0);
        assert_eq!(
            Som::from_grid(grid).unwrap_err(),
            SomError::DimensionMismatch { expected: 2, actual: 3 }
        );
    }
}
