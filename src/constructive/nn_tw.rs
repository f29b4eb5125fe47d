//! Time-window-aware nearest-neighbor heuristic.
//!
//! # Algorithm
//!
//! Vehicles are filled one at a time in fleet order. From the current node,
//! the cheapest unvisited customer is appended if the vehicle still has room
//! for its demand, can reach it before its window closes, and can still get
//! back to the return depot in time afterwards. A vehicle is closed when no
//! such customer remains.
//!
//! Customers no vehicle could take are appended to the least loaded route,
//! so every customer is covered exactly once. The result is always a valid
//! annealing seed, but may violate capacity or time windows.
//!
//! # Complexity
//!
//! O(n²) where n = number of customers.
//!
//! # Reference
//!
//! Solomon, M.M. (1987). "Algorithms for the Vehicle Routing and Scheduling
//! Problems with Time Window Constraints", *Operations Research* 35(2), 254-265.

use tracing::debug;

use crate::models::{Instance, Route, Solution};

/// Constructs a VRPTW seed solution using a time-window-aware nearest-neighbor.
///
/// Every vehicle of the fleet gets a route, possibly `[0, n + 1]`.
///
/// # Examples
///
/// ```
/// use u_vrptw::constructive::nearest_neighbor_tw;
/// use u_vrptw::evaluation::is_feasible;
/// use u_vrptw::models::{Instance, InstanceData, TimeWindow};
///
/// let w = |a, b| TimeWindow::new(a, b).unwrap();
/// let instance = Instance::new(InstanceData {
///     vehicles: vec![0, 1],
///     capacity: 30,
///     demands: vec![10, 10, 10],
///     cost: vec![
///         vec![0.0, 1.0, 2.0, 3.0, 0.0],
///         vec![1.0, 0.0, 1.0, 2.0, 1.0],
///         vec![2.0, 1.0, 0.0, 1.0, 2.0],
///         vec![3.0, 2.0, 1.0, 0.0, 3.0],
///         vec![0.0, 1.0, 2.0, 3.0, 0.0],
///     ],
///     time: vec![vec![1.0; 5]; 5],
///     windows: vec![w(0.0, 10.0), w(0.0, 10.0), w(0.0, 20.0), w(0.0, 30.0), w(0.0, 10.0)],
/// })
/// .unwrap();
///
/// let solution = nearest_neighbor_tw(&instance);
/// assert_eq!(solution.num_served(), 3);
/// assert_eq!(solution.route(0).unwrap().interior(), &[1, 2, 3]);
/// assert!(solution.route(1).unwrap().is_empty());
/// assert!(is_feasible(&solution, &instance));
/// ```
pub fn nearest_neighbor_tw(instance: &Instance) -> Solution {
    let end = instance.end_depot();
    let capacity = i64::from(instance.capacity());
    let mut visited = vec![false; instance.num_nodes()];
    let mut routes: Vec<(Vec<usize>, i64)> = Vec::with_capacity(instance.fleet_size());
    let mut admissible = Vec::with_capacity(instance.num_customers());

    for _ in instance.vehicles() {
        let mut current = instance.start_depot();
        let mut current_time = instance.window(current).service_start(0.0);
        let mut current_load: i64 = 0;
        let mut route_customers = Vec::new();

        loop {
            admissible.clear();
            admissible.extend(instance.customers().filter(|&i| {
                !visited[i]
                    && current_load + i64::from(instance.demand(i)) <= capacity
                    && service_start(instance, current, current_time, i).is_some()
            }));

            let Some(next) = instance.cost_matrix().nearest(current, &admissible) else {
                break;
            };
            let Some(start) = service_start(instance, current, current_time, next) else {
                break;
            };
            visited[next] = true;
            route_customers.push(next);
            current_time = start;
            current_load += i64::from(instance.demand(next));
            current = next;
        }

        routes.push((route_customers, current_load));
    }

    for customer in instance.customers().filter(|&c| !visited[c]) {
        if let Some((route, load)) = routes.iter_mut().min_by_key(|(_, load)| *load) {
            debug!(customer, "no feasible vehicle, appending to least loaded route");
            route.push(customer);
            *load += i64::from(instance.demand(customer));
        }
    }

    Solution::from_routes(
        instance
            .vehicles()
            .iter()
            .zip(routes)
            .map(|(&v, (customers, _))| (v, Route::from_customers(&customers, end))),
    )
}

/// Service start at `to` when leaving `from` at `time`, if `to` is reached
/// before its window closes and the return depot is still reachable after.
fn service_start(instance: &Instance, from: usize, time: f64, to: usize) -> Option<f64> {
    let window = instance.window(to);
    let arrival = time + instance.time(from, to);
    if window.is_violated(arrival) {
        return None;
    }
    let start = window.service_start(arrival);
    let end = instance.end_depot();
    if instance.window(end).is_violated(start + instance.time(to, end)) {
        return None;
    }
    Some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{evaluate, is_feasible, validate_seed, Cost};
    use crate::generator::{generate, GeneratorConfig};
    use crate::models::fixtures::{saturated_capacity, worked_example};
    use crate::models::{InstanceData, TimeWindow};

    fn line_instance(capacity: i32, demands: Vec<i32>, windows: Vec<TimeWindow>) -> Instance {
        let n = demands.len();
        let size = n + 2;
        let pos = |i: usize| if i == size - 1 { 0.0 } else { i as f64 };
        let rows: Vec<Vec<f64>> = (0..size)
            .map(|i| (0..size).map(|j| (pos(i) - pos(j)).abs()).collect())
            .collect();
        Instance::new(InstanceData {
            vehicles: vec![0, 1],
            capacity,
            demands,
            cost: rows.clone(),
            time: rows,
            windows,
        })
        .expect("valid instance")
    }

    fn open(horizon: f64) -> TimeWindow {
        TimeWindow::new(0.0, horizon).expect("valid")
    }

    #[test]
    fn test_nn_tw_worked_example() {
        let inst = worked_example();
        let sol = nearest_neighbor_tw(&inst);
        // Vehicle 1 takes customer 3 first and then has no room for 1 and
        // is too late for 2.
        assert_eq!(sol.route(1).map(Route::interior), Some(&[3][..]));
        assert_eq!(sol.route(2).map(Route::interior), Some(&[2, 1][..]));
        assert_eq!(evaluate(&sol, &inst), Cost::Feasible(149.0));
    }

    #[test]
    fn test_nn_tw_capacity_forces_split() {
        let inst = line_instance(10, vec![6, 6], vec![open(100.0); 4]);
        let sol = nearest_neighbor_tw(&inst);
        assert_eq!(sol.route(0).map(Route::interior), Some(&[1][..]));
        assert_eq!(sol.route(1).map(Route::interior), Some(&[2][..]));
        assert!(is_feasible(&sol, &inst));
    }

    #[test]
    fn test_nn_tw_selects_nearest_feasible() {
        // Customer 1 is nearest but its window has closed by arrival.
        let windows = vec![
            open(100.0),
            TimeWindow::new(0.0, 0.5).expect("valid"),
            open(100.0),
            open(100.0),
        ];
        let inst = line_instance(100, vec![1, 1], windows);
        let sol = nearest_neighbor_tw(&inst);
        assert_eq!(sol.route(0).map(Route::interior), Some(&[2][..]));
        // Nobody can reach customer 1 in time; it lands on the empty route.
        assert_eq!(sol.route(1).map(Route::interior), Some(&[1][..]));
        assert!(!is_feasible(&sol, &inst));
        assert!(validate_seed(&sol, &inst).is_ok());
    }

    #[test]
    fn test_nn_tw_leftovers_go_to_least_loaded() {
        let inst = line_instance(10, vec![8, 7, 9], vec![open(100.0); 5]);
        let sol = nearest_neighbor_tw(&inst);
        // Vehicle 0 takes 1 (load 8), vehicle 1 takes 2 (load 7), 3 fits nowhere.
        assert_eq!(sol.route(0).map(Route::interior), Some(&[1][..]));
        assert_eq!(sol.route(1).map(Route::interior), Some(&[2, 3][..]));
        assert_eq!(evaluate(&sol, &inst), Cost::Infeasible);
    }

    #[test]
    fn test_nn_tw_waits_for_window() {
        let windows = vec![
            open(100.0),
            TimeWindow::new(10.0, 20.0).expect("valid"),
            TimeWindow::new(11.0, 12.0).expect("valid"),
            open(100.0),
        ];
        let inst = line_instance(100, vec![1, 1], windows);
        let sol = nearest_neighbor_tw(&inst);
        // Wait at 1 until 10, then reach 2 at 11.
        assert_eq!(sol.route(0).map(Route::interior), Some(&[1, 2][..]));
        assert!(is_feasible(&sol, &inst));
    }

    #[test]
    fn test_nn_tw_always_valid_seed() {
        for seed in 0..10 {
            let config = GeneratorConfig::default()
                .with_num_customers(15)
                .with_fleet_size(3);
            let inst = generate(&config, seed).expect("valid config");
            let sol = nearest_neighbor_tw(&inst);
            assert_eq!(sol.num_routes(), 3);
            assert!(validate_seed(&sol, &inst).is_ok(), "seed {seed}");
        }
    }

    #[test]
    fn test_nn_tw_capacity_at_i32_limit() {
        let inst = saturated_capacity();
        let sol = nearest_neighbor_tw(&inst);
        // Customer 1 fills vehicle 0 to i32::MAX; customer 2 needs vehicle 1.
        assert_eq!(sol.route(0).map(Route::interior), Some(&[1][..]));
        assert_eq!(sol.route(1).map(Route::interior), Some(&[2][..]));
        assert!(is_feasible(&sol, &inst));
    }
}
