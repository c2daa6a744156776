//! Weight initialization strategies.
//!
//! An initializer runs at the start of every training call and sets the
//! width and starting values of all neuron weight vectors.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::selection::{RandomSelector, Selector};
use crate::som::Grid;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Sets the initial weights of every neuron in a grid.
pub trait Initializer: Send {
    /// Initializes `grid` for training on `dataset`.
    ///
    /// Fails with [`crate::SomError::EmptyDataset`] when the dataset has no
    /// vectors to take the width from.
    fn init(&self, dataset: &Dataset, grid: &mut Grid, rng: &mut dyn RngCore) -> Result<()>;
}

/// Zero-filled weights of the dataset's width.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroInitializer;

impl Initializer for ZeroInitializer {
    fn init(&self, dataset: &Dataset, grid: &mut Grid, _rng: &mut dyn RngCore) -> Result<()> {
        let width = dataset.width()?;
        for neuron in grid.neurons_mut() {
            neuron.reset_weights(width);
        }
        Ok(())
    }
}

/// Independent uniform `[0, 1)` weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInitializer;

impl Initializer for RandomInitializer {
    fn init(&self, dataset: &Dataset, grid: &mut Grid, rng: &mut dyn RngCore) -> Result<()> {
        ZeroInitializer.init(dataset, grid, rng)?;
        for neuron in grid.neurons_mut() {
            for w in &mut neuron.weights {
                *w = rng.gen::<f64>();
            }
        }
        Ok(())
    }
}

/// Copies dataset vectors into the neurons.
///
/// When the grid has fewer cells than the dataset has vectors, a sorted copy
/// of the dataset is downsampled to one representative per cell first.
/// Vectors are then dealt to the cells in row-major order through a
/// [`RandomSelector`], so no vector repeats until all have been used.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetSampleInitializer;

impl Initializer for DatasetSampleInitializer {
    fn init(&self, dataset: &Dataset, grid: &mut Grid, rng: &mut dyn RngCore) -> Result<()> {
        ZeroInitializer.init(dataset, grid, rng)?;

        let reduced;
        let source = if grid.len() < dataset.len() {
            let mut copy = dataset.clone();
            copy.sort_lexicographic();
            copy.downsample(grid.len());
            reduced = copy;
            &reduced
        } else {
            dataset
        };

        let mut selector = RandomSelector::new();
        selector.init(source, rng);
        for neuron in grid.neurons_mut() {
            let vector = selector.next(source, rng)?;
            neuron.weights.copy_from_slice(vector);
        }
        Ok(())
    }
}

/// Serializable description of an initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializerType {
    /// See [`ZeroInitializer`].
    #[default]
    Zero,
    /// See [`RandomInitializer`].
    Random,
    /// See [`DatasetSampleInitializer`].
    DatasetSample,
}

impl InitializerType {
    /// Builds the initializer this variant names.
    pub fn build(&self) -> Box<dyn Initializer> {
        match self {
            InitializerType::Zero => Box::new(ZeroInitializer),
            InitializerType::Random => Box::new(RandomInitializer),
            InitializerType::DatasetSample => Box::new(DatasetSampleInitializer),
        }
    }
}
