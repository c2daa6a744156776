//! Map quality measures.
//!
//! - **Quantization error**: mean distance between each input and the
//!   weights of its best matching unit. Lower means the prototypes sit
//!   closer to the data.
//! - **Topographic error**: fraction of inputs whose best and second-best
//!   units are not adjacent on the grid. Lower means the map preserves
//!   the topology of the data better.
//!
//! Both are read-only and leave the neurons' working distances untouched.

use crate::dataset::Dataset;
use crate::error::{Result, SomError};
use crate::som::{Neuron, Som};
use rayon::prelude::*;

impl Som {
    /// Mean distance from each adapted dataset vector to its BMU.
    pub fn quantization_error(&self, dataset: &Dataset) -> Result<f64> {
        let ranked = self.rank_units(dataset)?;
        let total: f64 = ranked.iter().map(|&(_, dist, _)| dist).sum();
        Ok(total / ranked.len() as f64)
    }

    /// Fraction of dataset vectors whose two closest units are not grid
    /// neighbours (8-neighbourhood).
    ///
    /// A single-neuron map has no second unit and scores zero.
    pub fn topographic_error(&self, dataset: &Dataset) -> Result<f64> {
        let ranked = self.rank_units(dataset)?;
        let neurons = self.neurons();

        let errors = ranked
            .iter()
            .filter(|&&(best, _, second)| match second {
                Some(second) => !adjacent(&neurons[best], &neurons[second]),
                None => false,
            })
            .count();

        Ok(errors as f64 / ranked.len() as f64)
    }

    /// For every dataset vector: (BMU index, BMU distance, second-best index).
    fn rank_units(&self, dataset: &Dataset) -> Result<Vec<(usize, f64, Option<usize>)>> {
        if dataset.is_empty() {
            return Err(SomError::EmptyDataset);
        }
        if self.neurons().is_empty() {
            return Err(SomError::EmptyGrid);
        }

        let inputs = dataset
            .iter()
            .map(|vector| {
                let input = self.adapted(vector)?;
                self.check_width(input.len())?;
                Ok(input)
            })
            .collect::<Result<Vec<_>>>()?;

        let metric = self.distance_metric();
        let neurons = self.neurons();

        Ok(inputs
            .par_iter()
            .map(|input| {
                let mut best = (0, f64::INFINITY);
                let mut second: Option<(usize, f64)> = None;

                for (i, neuron) in neurons.iter().enumerate() {
                    let dist = metric.distance(input, &neuron.weights);
                    if dist < best.1 {
                        second = Some(best).filter(|&(_, d)| d.is_finite());
                        best = (i, dist);
                    } else if i != best.0 && second.map_or(true, |(_, d)| dist < d) {
                        second = Some((i, dist));
                    }
                }

                (best.0, best.1, second.map(|(i, _)| i))
            })
            .collect())
    }
}

#[inline]
fn adjacent(a: &Neuron, b: &Neuron) -> bool {
    a.x.abs_diff(b.x) <= 1 && a.y.abs_diff(b.y) <= 1
}
