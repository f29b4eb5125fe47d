//! Read-only timing projection of a solution.

use serde::{Deserialize, Serialize};

use crate::models::{Instance, Solution, VehicleId};

/// A single stop within a scheduled route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Node being visited.
    pub node: usize,
    /// Time the vehicle reaches the node.
    pub arrival: f64,
    /// Time service begins, after waiting for the window to open.
    pub service_start: f64,
    /// Cumulative load after this stop.
    pub load_after: i64,
    /// Whether service starts within the node's window.
    pub on_time: bool,
}

/// Timing of one vehicle's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSchedule {
    /// Route owner.
    pub vehicle: VehicleId,
    /// Stops in driving order, the departure depot included.
    pub visits: Vec<Visit>,
    /// Travel cost of the scheduled arcs.
    pub cost: f64,
}

impl RouteSchedule {
    /// Load carried when the route ends.
    pub fn total_load(&self) -> i64 {
        self.visits.last().map_or(0, |v| v.load_after)
    }

    /// Time service begins at the last stop.
    pub fn completion_time(&self) -> f64 {
        self.visits.last().map_or(0.0, |v| v.service_start)
    }
}

/// Arrival times and loads for every route of a solution.
///
/// The projection applies the same propagation rule as the evaluators but
/// passes no judgement: late stops are flagged through [`Visit::on_time`]
/// and capacity is left to the caller. A route is cut short at the first
/// node index the instance does not know.
///
/// # Examples
///
/// ```
/// use u_vrptw::evaluation::Schedule;
/// use u_vrptw::models::{Instance, InstanceData, Solution, TimeWindow};
///
/// let w = |a, b| TimeWindow::new(a, b).unwrap();
/// let instance = Instance::new(InstanceData {
///     vehicles: vec![0],
///     capacity: 10,
///     demands: vec![4],
///     cost: vec![vec![0.0, 2.0, 0.0], vec![2.0, 0.0, 3.0], vec![0.0, 3.0, 0.0]],
///     time: vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
///     windows: vec![w(0.0, 10.0), w(3.0, 5.0), w(0.0, 10.0)],
/// })
/// .unwrap();
///
/// let sol = Solution::from_routes([(0, vec![0, 1, 2])]);
/// let schedule = Schedule::compute(&sol, &instance);
/// let visit = &schedule.routes[0].visits[1];
/// assert_eq!(visit.arrival, 1.0);
/// assert_eq!(visit.service_start, 3.0);
/// assert_eq!(schedule.total_cost(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// One entry per route, in ascending vehicle order.
    pub routes: Vec<RouteSchedule>,
}

impl Schedule {
    /// Projects `solution` onto the timeline of `instance`.
    pub fn compute(solution: &Solution, instance: &Instance) -> Self {
        let end = instance.end_depot();
        let routes = solution
            .routes()
            .map(|(vehicle, route)| {
                let mut visits: Vec<Visit> = Vec::with_capacity(route.len());
                let mut cost = 0.0;
                for &node in route.nodes() {
                    if node > end {
                        break;
                    }
                    let visit = match visits.last() {
                        None => Visit {
                            node,
                            arrival: 0.0,
                            service_start: 0.0,
                            load_after: i64::from(instance.demand(node)),
                            on_time: !instance.window(node).is_violated(0.0),
                        },
                        Some(prev) => {
                            let window = instance.window(node);
                            let arrival = prev.service_start + instance.time(prev.node, node);
                            let service_start = window.service_start(arrival);
                            cost += instance.cost(prev.node, node);
                            Visit {
                                node,
                                arrival,
                                service_start,
                                load_after: prev.load_after + i64::from(instance.demand(node)),
                                on_time: !window.is_violated(service_start),
                            }
                        }
                    };
                    visits.push(visit);
                }
                RouteSchedule {
                    vehicle,
                    visits,
                    cost,
                }
            })
            .collect();
        Self { routes }
    }

    /// Sum of route costs.
    pub fn total_cost(&self) -> f64 {
        self.routes.iter().map(|r| r.cost).sum()
    }

    /// The schedule of `vehicle`, if it has a route.
    pub fn route(&self, vehicle: VehicleId) -> Option<&RouteSchedule> {
        self.routes.iter().find(|r| r.vehicle == vehicle)
    }

    /// Returns `true` if every stop is served within its window.
    pub fn all_on_time(&self) -> bool {
        self.routes
            .iter()
            .all(|r| r.visits.iter().all(|v| v.on_time))
    }
}
