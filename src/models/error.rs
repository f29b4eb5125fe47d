//! Error types for instance construction and seed ingestion.

use std::fmt::Display;

use crate::distance::MatrixKind;

use super::VehicleId;

/// A malformed instance or search configuration.
///
/// Raised at construction time and never recovered internally.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The fleet has no vehicles.
    EmptyFleet,
    /// A vehicle identifier appears more than once.
    DuplicateVehicle {
        /// The repeated identifier.
        vehicle: VehicleId,
    },
    /// Vehicle capacity is zero or negative.
    NonPositiveCapacity {
        /// The rejected capacity.
        capacity: i32,
    },
    /// The node space cannot hold both depots.
    TooFewNodes {
        /// Number of nodes given.
        nodes: usize,
    },
    /// A matrix does not match the node count.
    MatrixSizeMismatch {
        /// Offending matrix.
        matrix: MatrixKind,
        /// Expected dimension.
        expected: usize,
        /// Dimension found.
        actual: usize,
    },
    /// An ordered pair of distinct nodes has no entry.
    MissingMatrixEntry {
        /// Offending matrix.
        matrix: MatrixKind,
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
    },
    /// An entry is negative or non-finite.
    InvalidMatrixEntry {
        /// Offending matrix.
        matrix: MatrixKind,
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
        /// Rejected value.
        value: f64,
    },
    /// The demand list does not have one entry per customer.
    DemandSizeMismatch {
        /// Number of customers.
        expected: usize,
        /// Number of demands given.
        actual: usize,
    },
    /// A customer has zero or negative demand.
    NonPositiveDemand {
        /// Customer node index.
        customer: usize,
        /// Rejected demand.
        demand: i32,
    },
    /// The window list does not have one entry per node.
    WindowSizeMismatch {
        /// Number of nodes.
        expected: usize,
        /// Number of windows given.
        actual: usize,
    },
    /// A window with `start >= end` or non-finite bounds.
    InvalidTimeWindow {
        /// Node index.
        node: usize,
        /// Window start.
        start: f64,
        /// Window end.
        end: f64,
    },
    /// Some route set could sum to a travel cost beyond `f64::MAX`.
    UnboundedRouteCost,
    /// A search or generator parameter is out of range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFleet => write!(f, "The fleet must contain at least one vehicle"),
            Self::DuplicateVehicle { vehicle } => {
                write!(f, "Vehicle {vehicle} appears more than once in the fleet")
            }
            Self::NonPositiveCapacity { capacity } => {
                write!(f, "Vehicle capacity must be positive, got {capacity}")
            }
            Self::TooFewNodes { nodes } => {
                write!(f, "An instance needs at least the two depot nodes, got {nodes} nodes")
            }
            Self::MatrixSizeMismatch {
                matrix,
                expected,
                actual,
            } => write!(
                f,
                "The {matrix} matrix must be {expected}x{expected}, found dimension {actual}"
            ),
            Self::MissingMatrixEntry { matrix, from, to } => {
                write!(f, "The {matrix} matrix has no entry for arc ({from}, {to})")
            }
            Self::InvalidMatrixEntry {
                matrix,
                from,
                to,
                value,
            } => write!(
                f,
                "The {matrix} matrix entry for arc ({from}, {to}) must be finite and non-negative, got {value}"
            ),
            Self::DemandSizeMismatch { expected, actual } => {
                write!(f, "Expected {expected} customer demands, got {actual}")
            }
            Self::NonPositiveDemand { customer, demand } => {
                write!(f, "Customer {customer} must have positive demand, got {demand}")
            }
            Self::WindowSizeMismatch { expected, actual } => {
                write!(f, "Expected {expected} time windows, got {actual}")
            }
            Self::InvalidTimeWindow { node, start, end } => {
                write!(f, "Node {node} has an invalid time window [{start}, {end}]")
            }
            Self::UnboundedRouteCost => {
                write!(f, "Travel costs are too large: a solution's total cost could overflow")
            }
            Self::InvalidParameter { name, reason } => write!(f, "Invalid {name}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// A seed solution that cannot be searched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSeedError {
    /// The seed assigns a route to a vehicle outside the fleet.
    UnknownVehicle {
        /// The unknown identifier.
        vehicle: VehicleId,
    },
    /// A fleet vehicle has no route in the seed.
    MissingRoute {
        /// The vehicle without a route.
        vehicle: VehicleId,
    },
    /// A route references a node index outside the instance.
    UnknownNode {
        /// Route owner.
        vehicle: VehicleId,
        /// The unknown node index.
        node: usize,
    },
    /// A route does not start at the departure depot or end at the return depot.
    InvalidEndpoints {
        /// Route owner.
        vehicle: VehicleId,
    },
    /// A depot node appears between the route endpoints.
    DepotInInterior {
        /// Route owner.
        vehicle: VehicleId,
        /// Position within the route.
        position: usize,
    },
    /// A customer is not visited by any route.
    MissingCustomer {
        /// The customer node index.
        customer: usize,
    },
    /// A customer is visited more than once.
    DuplicateCustomer {
        /// The customer node index.
        customer: usize,
    },
}

impl Display for InvalidSeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVehicle { vehicle } => {
                write!(f, "Seed assigns a route to unknown vehicle {vehicle}")
            }
            Self::MissingRoute { vehicle } => write!(f, "Seed has no route for vehicle {vehicle}"),
            Self::UnknownNode { vehicle, node } => {
                write!(f, "Route of vehicle {vehicle} references unknown node {node}")
            }
            Self::InvalidEndpoints { vehicle } => write!(
                f,
                "Route of vehicle {vehicle} must start at the departure depot and end at the return depot"
            ),
            Self::DepotInInterior { vehicle, position } => write!(
                f,
                "Route of vehicle {vehicle} visits a depot at interior position {position}"
            ),
            Self::MissingCustomer { customer } => {
                write!(f, "Customer {customer} is not visited by any route")
            }
            Self::DuplicateCustomer { customer } => {
                write!(f, "Customer {customer} is visited more than once")
            }
        }
    }
}

impl std::error::Error for InvalidSeedError {}
