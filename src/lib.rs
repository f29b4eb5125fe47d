//! # u-vrptw
//!
//! Vehicle routing with time windows (VRPTW) solved by simulated annealing:
//! a validated instance model, exact feasibility and cost evaluation, an
//! inter-route swap neighborhood, and a seeded, reproducible annealing engine.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Instance, TimeWindow, Route, Solution, errors)
//! - [`distance`] — Travel cost and travel time matrices
//! - [`evaluation`] — Feasibility checking, cost evaluation with an infeasible sentinel, schedules
//! - [`neighborhood`] — Move operators (inter-route customer swap)
//! - [`annealing`] — Simulated annealing engine
//! - [`constructive`] — Seed construction (time-window-aware nearest neighbor)
//! - [`generator`] — Seeded random instance generation
//!
//! ## Example
//!
//! ```
//! use u_vrptw::annealing::{anneal, AnnealingConfig};
//! use u_vrptw::constructive::nearest_neighbor_tw;
//! use u_vrptw::generator::{generate, GeneratorConfig};
//!
//! let instance = generate(&GeneratorConfig::default(), 7).unwrap();
//! let seed = nearest_neighbor_tw(&instance);
//! let result = anneal(&instance, seed, &AnnealingConfig::default().with_seed(7)).unwrap();
//! assert_eq!(result.iterations, 688);
//! ```

pub mod annealing;
pub mod constructive;
pub mod distance;
pub mod evaluation;
pub mod generator;
pub mod models;
pub mod neighborhood;
