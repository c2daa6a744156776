//! Self-Organizing Map (SOM) engine.
//!
//! - **Neurons and grid**: fixed coordinates, mutable weights (neuron.rs, grid.rs)
//! - **Engine**: initialization, training loop, BMU search, queries (map.rs)
//! - **Quality**: quantization and topographic error (quality.rs)

mod grid;
mod map;
mod neuron;
mod quality;

pub use grid::Grid;
pub use map::Som;
pub use neuron::Neuron;
