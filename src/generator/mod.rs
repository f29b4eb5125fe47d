//! Random VRPTW instances for benchmarking and tests.

mod random;

pub use random::{generate, GeneratorConfig};
