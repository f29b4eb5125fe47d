//! Travel cost and travel time matrices.
//!
//! Provides a dense, fully-populated matrix over the node index space.

mod matrix;

pub use matrix::{MatrixKind, TravelMatrix};
