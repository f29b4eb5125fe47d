//! Feasibility checking and seed validation.
//!
//! # Algorithm
//!
//! Structure first (known vehicles, node indices in range, routes running
//! `0 → … → n+1` without interior depots), then coverage (every customer
//! visited exactly once across all routes), then a left-to-right walk of
//! each route propagating load and arrival time:
//!
//! ```text
//! load(j)    = load(i) + demand[j]
//! arrival(j) = max(arrival(i) + time[i][j], windowStart[j])
//! ```
//!
//! The first violation ends the check.

use crate::models::{Instance, InvalidSeedError, Route, Solution, VehicleId};

/// The first hard constraint a solution was found to violate.
#[derive(Debug, Clone, PartialEq)]
pub enum Infeasibility {
    /// A route belongs to a vehicle outside the fleet.
    UnknownVehicle {
        /// Route owner.
        vehicle: VehicleId,
    },
    /// A route references a node index outside the instance.
    UnknownNode {
        /// Route owner.
        vehicle: VehicleId,
        /// The unknown node index.
        node: usize,
    },
    /// A route does not run from `0` to `n + 1`, or visits a depot in between.
    Endpoints {
        /// Route owner.
        vehicle: VehicleId,
    },
    /// A customer is visited zero times or more than once.
    Coverage {
        /// The customer node index.
        customer: usize,
        /// How many times it is visited.
        visits: usize,
    },
    /// The running load exceeded vehicle capacity.
    Capacity {
        /// Route owner.
        vehicle: VehicleId,
        /// Load after the offending visit.
        load: i64,
    },
    /// A node was reached after its window closed.
    TimeWindow {
        /// Route owner.
        vehicle: VehicleId,
        /// The late node.
        node: usize,
        /// Arrival time at that node.
        arrival: f64,
    },
}

/// Returns the first violated hard constraint, or `Ok(())` if the solution
/// is feasible.
///
/// # Examples
///
/// ```
/// use u_vrptw::evaluation::{check_feasibility, Infeasibility};
/// use u_vrptw::models::{Instance, InstanceData, Solution, TimeWindow};
///
/// let w = |a, b| TimeWindow::new(a, b).unwrap();
/// let instance = Instance::new(InstanceData {
///     vehicles: vec![0],
///     capacity: 3,
///     demands: vec![4],
///     cost: vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
///     time: vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
///     windows: vec![w(0.0, 10.0), w(0.0, 10.0), w(0.0, 10.0)],
/// })
/// .unwrap();
///
/// let sol = Solution::from_routes([(0, vec![0, 1, 2])]);
/// assert_eq!(
///     check_feasibility(&sol, &instance),
///     Err(Infeasibility::Capacity { vehicle: 0, load: 4 })
/// );
/// ```
pub fn check_feasibility(solution: &Solution, instance: &Instance) -> Result<(), Infeasibility> {
    check_structure(solution, instance)?;
    check_coverage(solution, instance)?;
    for (vehicle, route) in solution.routes() {
        check_route(instance, vehicle, route)?;
    }
    Ok(())
}

/// Returns `true` if the solution satisfies coverage, capacity, time-window
/// and endpoint constraints.
pub fn is_feasible(solution: &Solution, instance: &Instance) -> bool {
    check_feasibility(solution, instance).is_ok()
}

/// Checks that a solution can seed a search.
///
/// Every fleet vehicle needs a well-formed route and every customer must be
/// visited exactly once. Capacity and time windows are not checked: an
/// infeasible seed is a legitimate starting point.
pub fn validate_seed(solution: &Solution, instance: &Instance) -> Result<(), InvalidSeedError> {
    check_structure(solution, instance)?;
    if let Some(&vehicle) = instance
        .vehicles()
        .iter()
        .find(|&&v| solution.route(v).is_none())
    {
        return Err(InvalidSeedError::MissingRoute { vehicle });
    }
    check_coverage(solution, instance)?;
    Ok(())
}

/// A route that is malformed regardless of load or timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StructureError {
    UnknownVehicle { vehicle: VehicleId },
    UnknownNode { vehicle: VehicleId, node: usize },
    Endpoints { vehicle: VehicleId },
    InteriorDepot { vehicle: VehicleId, position: usize },
}

impl From<StructureError> for Infeasibility {
    fn from(e: StructureError) -> Self {
        match e {
            StructureError::UnknownVehicle { vehicle } => Self::UnknownVehicle { vehicle },
            StructureError::UnknownNode { vehicle, node } => Self::UnknownNode { vehicle, node },
            StructureError::Endpoints { vehicle } | StructureError::InteriorDepot { vehicle, .. } => {
                Self::Endpoints { vehicle }
            }
        }
    }
}

impl From<StructureError> for InvalidSeedError {
    fn from(e: StructureError) -> Self {
        match e {
            StructureError::UnknownVehicle { vehicle } => Self::UnknownVehicle { vehicle },
            StructureError::UnknownNode { vehicle, node } => Self::UnknownNode { vehicle, node },
            StructureError::Endpoints { vehicle } => Self::InvalidEndpoints { vehicle },
            StructureError::InteriorDepot { vehicle, position } => {
                Self::DepotInInterior { vehicle, position }
            }
        }
    }
}

/// A customer visited other than exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CoverageGap {
    customer: usize,
    visits: usize,
}

impl From<CoverageGap> for Infeasibility {
    fn from(gap: CoverageGap) -> Self {
        Self::Coverage {
            customer: gap.customer,
            visits: gap.visits,
        }
    }
}

impl From<CoverageGap> for InvalidSeedError {
    fn from(gap: CoverageGap) -> Self {
        match gap.visits {
            0 => Self::MissingCustomer {
                customer: gap.customer,
            },
            _ => Self::DuplicateCustomer {
                customer: gap.customer,
            },
        }
    }
}

fn check_structure(solution: &Solution, instance: &Instance) -> Result<(), StructureError> {
    let end = instance.end_depot();
    for (vehicle, route) in solution.routes() {
        if instance.vehicle_slot(vehicle).is_none() {
            return Err(StructureError::UnknownVehicle { vehicle });
        }
        if let Some(&node) = route.nodes().iter().find(|&&n| n > end) {
            return Err(StructureError::UnknownNode { vehicle, node });
        }
        let endpoints_ok = route.len() >= 2
            && route.first() == Some(instance.start_depot())
            && route.last() == Some(end);
        if !endpoints_ok {
            return Err(StructureError::Endpoints { vehicle });
        }
        if let Some(offset) = route.interior().iter().position(|&n| instance.is_depot(n)) {
            return Err(StructureError::InteriorDepot {
                vehicle,
                position: offset + 1,
            });
        }
    }
    Ok(())
}

/// Assumes [`check_structure`] passed, so every interior node is a customer.
fn check_coverage(solution: &Solution, instance: &Instance) -> Result<(), CoverageGap> {
    let mut visits = vec![0usize; instance.num_nodes()];
    for node in solution.visited() {
        visits[node] += 1;
    }
    match instance.customers().find(|&c| visits[c] != 1) {
        Some(customer) => Err(CoverageGap {
            customer,
            visits: visits[customer],
        }),
        None => Ok(()),
    }
}

fn check_route(instance: &Instance, vehicle: VehicleId, route: &Route) -> Result<(), Infeasibility> {
    // Summed in i64: demands and capacity each fit in i32, their sum may not.
    let capacity = i64::from(instance.capacity());
    let mut load: i64 = 0;
    let mut arrival = 0.0;
    for (from, to) in route.arcs() {
        load += i64::from(instance.demand(to));
        if load > capacity {
            return Err(Infeasibility::Capacity { vehicle, load });
        }
        let window = instance.window(to);
        arrival = window.service_start(arrival + instance.time(from, to));
        if window.is_violated(arrival) {
            return Err(Infeasibility::TimeWindow {
                vehicle,
                node: to,
                arrival,
            });
        }
    }
    Ok(())
}
