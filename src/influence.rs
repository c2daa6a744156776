//! Neighborhood influence functions.
//!
//! An influence function decides how far a candidate neuron moves towards the
//! current input, given its position on the grid relative to the Best
//! Matching Unit (BMU) and the training progress.

use serde::{Deserialize, Serialize};

/// Computes the neighborhood coefficient of a candidate neuron.
pub trait Influence: Send {
    /// Returns a value in `[0, 1]`.
    ///
    /// `bmu` and `candidate` are `(x, y)` grid coordinates; `iteration` runs
    /// over `[0, total)`.
    fn influence(
        &self,
        bmu: (usize, usize),
        iteration: usize,
        total: usize,
        candidate: (usize, usize),
    ) -> f64;
}

/// Euclidean distance between two grid positions.
#[inline]
pub fn grid_distance(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    (dx * dx + dy * dy).sqrt()
}

#[inline]
fn gaussian(d: f64, width: f64) -> f64 {
    (-(d * d) / (2.0 * width * width)).exp()
}

/// Only the BMU itself is updated.
#[derive(Debug, Clone, Copy, Default)]
pub struct BmuOnly;

impl Influence for BmuOnly {
    fn influence(&self, bmu: (usize, usize), _: usize, _: usize, candidate: (usize, usize)) -> f64 {
        if bmu == candidate {
            1.0
        } else {
            0.0
        }
    }
}

/// Full influence inside a shrinking radius, none outside.
///
/// The radius is `R / (1 + t/T)`, so it goes from `R` towards `R/2` over the
/// course of training.
#[derive(Debug, Clone, Copy)]
pub struct RadiusReducing {
    /// Initial radius `R`.
    pub radius: f64,
}

impl RadiusReducing {
    /// Creates a new radius-reducing influence.
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Neighborhood radius at the given iteration.
    #[inline]
    pub fn radius_at(&self, iteration: usize, total: usize) -> f64 {
        self.radius / (1.0 + iteration as f64 / total as f64)
    }
}

impl Influence for RadiusReducing {
    fn influence(
        &self,
        bmu: (usize, usize),
        iteration: usize,
        total: usize,
        candidate: (usize, usize),
    ) -> f64 {
        if grid_distance(bmu, candidate) <= self.radius_at(iteration, total) {
            1.0
        } else {
            0.0
        }
    }
}

/// Gaussian neighborhood whose width decays exponentially.
///
/// `g = exp(-d^2 / (2 q^2))` with `q = initial_width * exp(-t/T)`.
#[derive(Debug, Clone, Copy)]
pub struct Gaussian {
    /// Width at `t = 0`.
    pub initial_width: f64,
}

impl Gaussian {
    /// Creates a new Gaussian influence.
    pub fn new(initial_width: f64) -> Self {
        Self { initial_width }
    }

    /// Neighborhood width at the given iteration.
    #[inline]
    pub fn width_at(&self, iteration: usize, total: usize) -> f64 {
        self.initial_width * (-(iteration as f64) / total as f64).exp()
    }
}

impl Influence for Gaussian {
    fn influence(
        &self,
        bmu: (usize, usize),
        iteration: usize,
        total: usize,
        candidate: (usize, usize),
    ) -> f64 {
        gaussian(grid_distance(bmu, candidate), self.width_at(iteration, total))
    }
}

/// Gaussian neighborhood with a caller-supplied width schedule `q(t, T)`.
pub struct GaussianWith<F> {
    width: F,
}

impl<F> GaussianWith<F>
where
    F: Fn(usize, usize) -> f64 + Send,
{
    /// Creates a Gaussian influence using `width(t, T)` as its width.
    pub fn new(width: F) -> Self {
        Self { width }
    }
}

impl<F> Influence for GaussianWith<F>
where
    F: Fn(usize, usize) -> f64 + Send,
{
    fn influence(
        &self,
        bmu: (usize, usize),
        iteration: usize,
        total: usize,
        candidate: (usize, usize),
    ) -> f64 {
        gaussian(grid_distance(bmu, candidate), (self.width)(iteration, total))
    }
}

impl<F> std::fmt::Debug for GaussianWith<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaussianWith").finish_non_exhaustive()
    }
}

/// Serializable description of an influence function.
///
/// [`GaussianWith`] takes a closure and has no serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InfluenceType {
    /// See [`BmuOnly`].
    #[default]
    BmuOnly,
    /// See [`RadiusReducing`].
    RadiusReducing {
        /// Initial radius.
        radius: f64,
    },
    /// See [`Gaussian`].
    Gaussian {
        /// Width at `t = 0`.
        initial_width: f64,
    },
}

impl InfluenceType {
    /// Builds the influence function this variant names.
    pub fn build(&self) -> Box<dyn Influence> {
        match *self {
            InfluenceType::BmuOnly => Box::new(BmuOnly),
            InfluenceType::RadiusReducing { radius } => Box::new(RadiusReducing::new(radius)),
            InfluenceType::Gaussian { initial_width } => Box::new(Gaussian::new(initial_width)),
        }
    }
}
