//! VRPTW problem instance.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::distance::{MatrixKind, TravelMatrix};

use super::{ConfigurationError, TimeWindow, VehicleId};

/// Raw instance parameters, before validation.
///
/// Node `0` is the departure depot, nodes `1..=n` are customers and node
/// `n + 1` is the return depot, where `n = demands.len()`. `demands[c - 1]`
/// is the demand of customer `c`; the matrices and `windows` are indexed by
/// node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceData {
    /// Vehicle identifiers, in fleet order.
    pub vehicles: Vec<VehicleId>,
    /// Capacity shared by every vehicle.
    pub capacity: i32,
    /// Demand per customer.
    pub demands: Vec<i32>,
    /// Travel cost rows, `(n + 2) × (n + 2)`.
    pub cost: Vec<Vec<f64>>,
    /// Travel time rows, `(n + 2) × (n + 2)`.
    pub time: Vec<Vec<f64>>,
    /// Time window per node.
    pub windows: Vec<TimeWindow>,
}

/// A validated, immutable VRPTW instance.
///
/// Construction checks every invariant the evaluators rely on, so search
/// code can index matrices and demands without further checks.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{Instance, InstanceData, TimeWindow};
///
/// let w = |a, b| TimeWindow::new(a, b).unwrap();
/// let data = InstanceData {
///     vehicles: vec![0],
///     capacity: 10,
///     demands: vec![4],
///     cost: vec![vec![0.0, 2.0, 0.0], vec![2.0, 0.0, 2.0], vec![0.0, 2.0, 0.0]],
///     time: vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
///     windows: vec![w(0.0, 10.0), w(0.0, 5.0), w(0.0, 10.0)],
/// };
/// let instance = Instance::new(data).unwrap();
/// assert_eq!(instance.num_customers(), 1);
/// assert_eq!(instance.end_depot(), 2);
/// assert_eq!(instance.demand(1), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InstanceData", into = "InstanceData")]
pub struct Instance {
    vehicles: Vec<VehicleId>,
    capacity: i32,
    demand: Vec<i32>,
    cost: TravelMatrix,
    time: TravelMatrix,
    windows: Vec<TimeWindow>,
}

impl Instance {
    /// Validates raw parameters and builds an instance.
    pub fn new(data: InstanceData) -> Result<Self, ConfigurationError> {
        let nodes = data.demands.len() + 2;
        let cost = matrix_from_rows(MatrixKind::Cost, nodes, data.cost)?;
        let time = matrix_from_rows(MatrixKind::Time, nodes, data.time)?;
        Self::from_parts(
            data.vehicles,
            data.capacity,
            &data.demands,
            cost,
            time,
            data.windows,
        )
    }

    /// Builds an instance from already-constructed matrices.
    ///
    /// `demands` holds one entry per customer, as in [`InstanceData`].
    pub fn from_parts(
        vehicles: Vec<VehicleId>,
        capacity: i32,
        demands: &[i32],
        cost: TravelMatrix,
        time: TravelMatrix,
        windows: Vec<TimeWindow>,
    ) -> Result<Self, ConfigurationError> {
        if vehicles.is_empty() {
            return Err(ConfigurationError::EmptyFleet);
        }
        let mut seen = HashSet::with_capacity(vehicles.len());
        for &v in &vehicles {
            if !seen.insert(v) {
                return Err(ConfigurationError::DuplicateVehicle { vehicle: v });
            }
        }
        if capacity <= 0 {
            return Err(ConfigurationError::NonPositiveCapacity { capacity });
        }

        let nodes = cost.size();
        if nodes < 2 {
            return Err(ConfigurationError::TooFewNodes { nodes });
        }
        for (kind, m) in [(MatrixKind::Cost, &cost), (MatrixKind::Time, &time)] {
            if m.size() != nodes {
                return Err(ConfigurationError::MatrixSizeMismatch {
                    matrix: kind,
                    expected: nodes,
                    actual: m.size(),
                });
            }
        }

        let n = nodes - 2;
        if demands.len() != n {
            return Err(ConfigurationError::DemandSizeMismatch {
                expected: n,
                actual: demands.len(),
            });
        }
        if let Some((idx, &d)) = demands.iter().enumerate().find(|&(_, &d)| d <= 0) {
            return Err(ConfigurationError::NonPositiveDemand {
                customer: idx + 1,
                demand: d,
            });
        }

        if windows.len() != nodes {
            return Err(ConfigurationError::WindowSizeMismatch {
                expected: nodes,
                actual: windows.len(),
            });
        }
        if let Some((node, tw)) = windows.iter().enumerate().find(|(_, tw)| !tw.is_well_formed()) {
            return Err(ConfigurationError::InvalidTimeWindow {
                node,
                start: tw.start(),
                end: tw.end(),
            });
        }

        // Each node departs at most once per solution, the start depot once
        // per vehicle.
        let max_departure = |from: usize| (0..nodes).map(|to| cost.get(from, to)).fold(0.0, f64::max);
        let worst_total = vehicles.len() as f64 * max_departure(0)
            + (1..=n).map(max_departure).sum::<f64>();
        if !worst_total.is_finite() {
            return Err(ConfigurationError::UnboundedRouteCost);
        }

        let mut demand = Vec::with_capacity(nodes);
        demand.push(0);
        demand.extend_from_slice(demands);
        demand.push(0);

        Ok(Self {
            vehicles,
            capacity,
            demand,
            cost,
            time,
            windows,
        })
    }

    /// Vehicle identifiers, in fleet order.
    pub fn vehicles(&self) -> &[VehicleId] {
        &self.vehicles
    }

    /// Number of vehicles.
    pub fn fleet_size(&self) -> usize {
        self.vehicles.len()
    }

    /// Position of a vehicle in the fleet, if it belongs to it.
    pub fn vehicle_slot(&self, vehicle: VehicleId) -> Option<usize> {
        self.vehicles.iter().position(|&v| v == vehicle)
    }

    /// Number of customers `n`.
    pub fn num_customers(&self) -> usize {
        self.demand.len() - 2
    }

    /// Number of nodes `n + 2`, depots included.
    pub fn num_nodes(&self) -> usize {
        self.demand.len()
    }

    /// The departure depot, always `0`.
    pub fn start_depot(&self) -> usize {
        0
    }

    /// The return depot, `n + 1`.
    pub fn end_depot(&self) -> usize {
        self.num_nodes() - 1
    }

    /// All node indices.
    pub fn nodes(&self) -> RangeInclusive<usize> {
        0..=self.end_depot()
    }

    /// Customer node indices.
    pub fn customers(&self) -> RangeInclusive<usize> {
        1..=self.num_customers()
    }

    /// Returns `true` if `node` is a customer.
    pub fn is_customer(&self, node: usize) -> bool {
        self.customers().contains(&node)
    }

    /// Returns `true` if `node` is either depot.
    pub fn is_depot(&self, node: usize) -> bool {
        node == self.start_depot() || node == self.end_depot()
    }

    /// Travel cost of arc `(from, to)`.
    pub fn cost(&self, from: usize, to: usize) -> f64 {
        self.cost.get(from, to)
    }

    /// Travel time of arc `(from, to)`.
    pub fn time(&self, from: usize, to: usize) -> f64 {
        self.time.get(from, to)
    }

    /// Cost matrix.
    pub fn cost_matrix(&self) -> &TravelMatrix {
        &self.cost
    }

    /// Travel time matrix.
    pub fn time_matrix(&self) -> &TravelMatrix {
        &self.time
    }

    /// Demand of `node`; zero for depots.
    pub fn demand(&self, node: usize) -> i32 {
        self.demand[node]
    }

    /// Capacity shared by every vehicle.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Time window of `node`.
    pub fn window(&self, node: usize) -> &TimeWindow {
        &self.windows[node]
    }

    /// Planning horizon: the close of the return depot's window.
    pub fn horizon(&self) -> f64 {
        self.windows[self.end_depot()].end()
    }

    /// Parses and validates an instance from JSON in the [`InstanceData`] layout.
    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn matrix_from_rows(
    kind: MatrixKind,
    nodes: usize,
    rows: Vec<Vec<f64>>,
) -> Result<TravelMatrix, ConfigurationError> {
    if rows.len() != nodes {
        return Err(ConfigurationError::MatrixSizeMismatch {
            matrix: kind,
            expected: nodes,
            actual: rows.len(),
        });
    }
    TravelMatrix::from_rows(kind, rows)
}

impl TryFrom<InstanceData> for Instance {
    type Error = ConfigurationError;

    fn try_from(data: InstanceData) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        let n = instance.num_customers();
        Self {
            demands: instance.demand[1..=n].to_vec(),
            vehicles: instance.vehicles,
            capacity: instance.capacity,
            cost: instance.cost.to_rows(),
            time: instance.time.to_rows(),
            windows: instance.windows,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_worked_example_accessors() {
        let inst = worked_example();
        assert_eq!(inst.num_customers(), 3);
        assert_eq!(inst.num_nodes(), 5);
        assert_eq!(inst.start_depot(), 0);
        assert_eq!(inst.end_depot(), 4);
        assert_eq!(inst.customers().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(inst.nodes().count(), 5);
        assert_eq!(inst.demand(0), 0);
        assert_eq!(inst.demand(1), 13);
        assert_eq!(inst.demand(3), 14);
        assert_eq!(inst.demand(4), 0);
        assert_eq!(inst.capacity(), 20);
        assert_eq!(inst.fleet_size(), 2);
        assert_eq!(inst.vehicle_slot(2), Some(1));
        assert_eq!(inst.vehicle_slot(7), None);
        assert_eq!(inst.cost(0, 1), 44.0);
        assert_eq!(inst.time(2, 3), 15.0);
        assert_eq!(inst.horizon(), 100.0);
        assert!(inst.is_depot(4));
        assert!(!inst.is_customer(4));
        assert!(inst.is_customer(2));
    }

    #[test]
    fn test_empty_fleet() {
        let mut data = worked_example_data();
        data.vehicles.clear();
        assert_eq!(Instance::new(data), Err(ConfigurationError::EmptyFleet));
    }

    #[test]
    fn test_duplicate_vehicle() {
        let mut data = worked_example_data();
        data.vehicles = vec![1, 2, 1];
        assert_eq!(
            Instance::new(data),
            Err(ConfigurationError::DuplicateVehicle { vehicle: 1 })
        );
    }

    #[test]
    fn test_non_positive_capacity() {
        let mut data = worked_example_data();
        data.capacity = 0;
        assert_eq!(
            Instance::new(data),
            Err(ConfigurationError::NonPositiveCapacity { capacity: 0 })
        );
    }

    #[test]
    fn test_non_positive_demand() {
        let mut data = worked_example_data();
        data.demands[1] = -3;
        assert_eq!(
            Instance::new(data),
            Err(ConfigurationError::NonPositiveDemand {
                customer: 2,
                demand: -3
            })
        );
    }

    #[test]
    fn test_missing_matrix_row() {
        let mut data = worked_example_data();
        data.time.pop();
        assert!(matches!(
            Instance::new(data),
            Err(ConfigurationError::MatrixSizeMismatch {
                matrix: MatrixKind::Time,
                expected: 5,
                actual: 4,
            })
        ));
    }

    #[test]
    fn test_short_matrix_row() {
        let mut data = worked_example_data();
        data.cost[2].pop();
        assert!(matches!(
            Instance::new(data),
            Err(ConfigurationError::MatrixSizeMismatch {
                matrix: MatrixKind::Cost,
                ..
            })
        ));
    }

    #[test]
    fn test_window_count_mismatch() {
        let mut data = worked_example_data();
        data.windows.pop();
        assert_eq!(
            Instance::new(data),
            Err(ConfigurationError::WindowSizeMismatch {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn test_entry_matrix_missing_pair() {
        let data = worked_example_data();
        let entries = |rows: &Vec<Vec<f64>>| {
            let rows = rows.clone();
            (0..5)
                .flat_map(|i| (0..5).map(move |j| (i, j)))
                .filter(|(i, j)| !(*i == 3 && *j == 1))
                .map(move |(i, j)| ((i, j), rows[i][j]))
                .collect::<Vec<_>>()
        };
        let err = TravelMatrix::from_entries(MatrixKind::Cost, 5, entries(&data.cost)).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingMatrixEntry {
                matrix: MatrixKind::Cost,
                from: 3,
                to: 1
            }
        );
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&worked_example()).expect("serialize");
        let back: Instance = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, worked_example());

        let mut data = worked_example_data();
        data.capacity = -5;
        let bad = serde_json::to_string(&data).expect("serialize");
        let parsed: Result<Instance, _> = serde_json::from_str(&bad);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_serde_rejects_bad_window() {
        let mut value = serde_json::to_value(worked_example_data()).expect("serialize");
        value["windows"][2] = serde_json::json!({ "start": 30.0, "end": 27.0 });
        let parsed: Result<Instance, _> = serde_json::from_value(value);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unbounded_route_cost() {
        let mut data = worked_example_data();
        for row in data.cost.iter_mut() {
            for v in row.iter_mut().filter(|v| **v > 0.0) {
                *v = f64::MAX / 4.0;
            }
        }
        assert_eq!(Instance::new(data), Err(ConfigurationError::UnboundedRouteCost));

        let near = near_overflow_costs();
        assert_eq!(near.cost(0, 1), f64::MAX / 8.0);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json_str() {
        let json = serde_json::to_string(&worked_example_data()).expect("serialize");
        let inst = Instance::from_json_str(&json).expect("valid instance");
        assert_eq!(inst, worked_example());

        let mut data = worked_example_data();
        data.demands[1] = 0;
        let json = serde_json::to_string(&data).expect("serialize");
        let err = Instance::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("Customer 2 must have positive demand"));

        assert!(Instance::from_json_str("{\"vehicles\": [1]}").is_err());
    }
}
