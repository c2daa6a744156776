//! # somap - Self-Organizing Map engine
//!
//! A Self-Organizing Map (SOM) is a 2D grid of prototype vectors, the
//! neurons, trained by competitive learning so that neighbouring cells come
//! to represent similar regions of the input space.
//!
//! ## Overview
//!
//! Every training step selects an input, finds the Best Matching Unit (BMU),
//! the neuron closest to the input, and moves the BMU and, depending on the
//! influence function, its grid neighbours towards the input.
//!
//! Each part of that loop is a pluggable policy:
//!
//! - [`distance`] - how close a neuron is to an input
//! - [`influence`] - how much a neuron moves given its grid distance to the BMU
//! - [`restraint`] - the global learning rate per iteration
//! - [`selection`] - which input each iteration sees
//! - [`init`] - the starting weights
//! - [`adapter`] - pre-processing applied to every input
//!
//! ## Quick Start
//!
//! ```rust
//! use somap::{Dataset, Som};
//! use somap::influence::Gaussian;
//! use somap::init::RandomInitializer;
//! use somap::restraint::ExpRestraint;
//! use somap::selection::RandomSelector;
//!
//! let dataset = Dataset::from_vectors(vec![
//!     vec![0.1, 0.2, 0.3],
//!     vec![0.9, 0.8, 0.7],
//! ])?;
//!
//! let mut som = Som::new(5, 5)
//!     .with_initializer(RandomInitializer)
//!     .with_selector(RandomSelector::new())
//!     .with_restraint(ExpRestraint::new(1.0))
//!     .with_influence(Gaussian::new(2.0))
//!     .with_seed(42);
//!
//! som.learn(&dataset, 500)?;
//!
//! let bmu = som.test(&[0.85, 0.8, 0.75])?;
//! println!("closest cell: ({}, {})", bmu.x, bmu.y);
//! # Ok::<(), somap::SomError>(())
//! ```
//!
//! ## Configuration
//!
//! [`SomConfig`] describes a map and its built-in policies with serde, so a
//! caller can keep it in any format serde supports:
//!
//! ```rust
//! use somap::{Som, SomConfig};
//! use somap::influence::InfluenceType;
//!
//! let mut config = SomConfig::new(30, 30);
//! config.influence = InfluenceType::RadiusReducing { radius: 4.0 };
//! config.seed = Some(7);
//!
//! let som = Som::from_config(&config)?;
//! assert_eq!(som.dimensions(), (30, 30));
//! # Ok::<(), somap::SomError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod influence;
pub mod init;
pub mod restraint;
pub mod selection;
pub mod som;

// Re-export commonly used types
pub use adapter::{AdapterType, IdentityAdapter, InputAdapter, MinMaxAdapter};
pub use config::SomConfig;
pub use dataset::Dataset;
pub use distance::{ChebyshevDistance, DistanceMetric, DistanceType, EuclideanDistance, ManhattanDistance};
pub use error::{Result, SomError};
pub use influence::{BmuOnly, Gaussian, GaussianWith, Influence, InfluenceType, RadiusReducing};
pub use init::{DatasetSampleInitializer, Initializer, InitializerType, RandomInitializer, ZeroInitializer};
pub use restraint::{ExpRestraint, NoRestraint, Restraint, RestraintType, SimpleRestraint};
pub use selection::{RandomSelector, SelectorType, Selector, SequentialSelector};
pub use som::{Grid, Neuron, Som};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
