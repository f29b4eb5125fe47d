//! Constructive heuristics for building annealing seeds.
//!
//! - [`nearest_neighbor_tw`] — Time-window-aware nearest-neighbor (Solomon, 1987), O(n²)

mod nn_tw;

pub use nn_tw::nearest_neighbor_tw;
