//! In-memory collection of fixed-width training vectors.

use crate::error::{Result, SomError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An ordered collection of vectors sharing the same width.
///
/// The width is fixed by the first vector added; every later vector must
/// match it. Deserialization applies the same check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    vectors: Vec<Vec<f64>>,
}

/// Unchecked wire form of a [`Dataset`].
#[derive(Deserialize)]
struct RawDataset {
    vectors: Vec<Vec<f64>>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = SomError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Self::from_vectors(raw.vectors)
    }
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dataset from the given vectors, validating their widths.
    pub fn from_vectors(vectors: Vec<Vec<f64>>) -> Result<Self> {
        let mut dataset = Self::new();
        for vector in vectors {
            dataset.add(vector)?;
        }
        Ok(dataset)
    }

    /// Appends a vector.
    pub fn add(&mut self, vector: impl Into<Vec<f64>>) -> Result<()> {
        let vector = vector.into();
        if let Some(first) = self.vectors.first() {
            if first.len() != vector.len() {
                return Err(SomError::DimensionMismatch {
                    expected: first.len(),
                    actual: vector.len(),
                });
            }
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Returns the number of vectors.
    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns true if the dataset holds no vectors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Returns the shared width of the vectors.
    pub fn width(&self) -> Result<usize> {
        self.vectors
            .first()
            .map(Vec::len)
            .ok_or(SomError::EmptyDataset)
    }

    /// Gets a vector by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        self.vectors.get(index).map(Vec::as_slice)
    }

    /// All vectors in stored order.
    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }

    /// Iterates over the vectors in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.vectors.iter().map(Vec::as_slice)
    }

    /// Shuffles the vectors in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.vectors.shuffle(rng);
    }

    /// Sorts the vectors in ascending lexicographic order.
    ///
    /// The sort is stable; coordinates are compared with [`f64::total_cmp`].
    pub fn sort_lexicographic(&mut self) {
        self.vectors.sort_by(|a, b| lexicographic(a, b));
    }

    /// Keeps `n` representatives, one per contiguous segment.
    ///
    /// The sequence is split into `n` segments of `len / n` elements
    /// (fractional step) and the middle element of each segment is kept.
    /// Does nothing when the dataset already holds `n` vectors or fewer.
    pub fn downsample(&mut self, n: usize) {
        let len = self.vectors.len();
        if len <= n {
            return;
        }

        let step = len as f64 / n as f64;
        let kept: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let left = (i as f64 * step).floor() as usize;
                let right = ((i + 1) as f64 * step).floor() as usize;
                self.vectors[(left + right) >> 1].clone()
            })
            .collect();

        self.vectors = kept;
    }
}

impl From<Dataset> for Vec<Vec<f64>> {
    fn from(dataset: Dataset) -> Self {
        dataset.vectors
    }
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}
