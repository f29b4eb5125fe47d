//! Domain model types for the vehicle routing problem with time windows.
//!
//! Provides the validated problem instance, time windows, routes as node
//! sequences, solutions as vehicle-to-route mappings, and the construction
//! and ingestion error types.

mod error;
mod instance;
mod route;
mod solution;
mod time_window;

pub use error::{ConfigurationError, InvalidSeedError};
pub use instance::{Instance, InstanceData};
pub use route::Route;
pub use solution::Solution;
pub use time_window::TimeWindow;

#[cfg(test)]
pub(crate) use instance::fixtures;

/// Identifier of a vehicle in the fleet.
pub type VehicleId = usize;
