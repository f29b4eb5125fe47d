//! Solution type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Route, VehicleId};

/// A complete assignment of routes to vehicles.
///
/// Routes are keyed by vehicle identifier and iterated in ascending
/// identifier order, which keeps every consumer of a solution (evaluators,
/// the move operator) deterministic.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::Solution;
///
/// let sol = Solution::from_routes([(1, vec![0, 1, 4]), (2, vec![0, 2, 3, 4])]);
/// assert_eq!(sol.num_routes(), 2);
/// assert_eq!(sol.num_served(), 3);
/// assert_eq!(sol.route(2).unwrap().interior(), &[2, 3]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    routes: BTreeMap<VehicleId, Route>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a solution from `(vehicle, node sequence)` pairs.
    ///
    /// A vehicle listed twice keeps its last route.
    pub fn from_routes<I, R>(routes: I) -> Self
    where
        I: IntoIterator<Item = (VehicleId, R)>,
        R: Into<Route>,
    {
        Self {
            routes: routes.into_iter().map(|(v, r)| (v, r.into())).collect(),
        }
    }

    /// Assigns a route to a vehicle, returning the route it replaces.
    pub fn insert_route(&mut self, vehicle: VehicleId, route: Route) -> Option<Route> {
        self.routes.insert(vehicle, route)
    }

    /// The route of `vehicle`, if it has one.
    pub fn route(&self, vehicle: VehicleId) -> Option<&Route> {
        self.routes.get(&vehicle)
    }

    /// Mutable access to the route of `vehicle`.
    pub fn route_mut(&mut self, vehicle: VehicleId) -> Option<&mut Route> {
        self.routes.get_mut(&vehicle)
    }

    /// Routes in ascending vehicle order.
    pub fn routes(&self) -> impl Iterator<Item = (VehicleId, &Route)> + '_ {
        self.routes.iter().map(|(&v, r)| (v, r))
    }

    /// Vehicles that have a route, ascending.
    pub fn vehicles(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.routes.keys().copied()
    }

    /// Number of routes.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of interior visits across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.values().map(Route::num_interior).sum()
    }

    /// Number of routes that serve at least one customer.
    pub fn num_active_routes(&self) -> usize {
        self.routes.values().filter(|r| !r.is_empty()).count()
    }

    /// Every interior node, route by route.
    pub fn visited(&self) -> impl Iterator<Item = usize> + '_ {
        self.routes.values().flat_map(|r| r.interior().iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_empty() {
        let sol = Solution::new();
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_served(), 0);
        assert!(sol.route(0).is_none());
    }

    #[test]
    fn test_solution_ordering() {
        let sol = Solution::from_routes([(7, vec![0, 2, 3]), (3, vec![0, 1, 3])]);
        assert_eq!(sol.vehicles().collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(sol.visited().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_insert_and_replace() {
        let mut sol = Solution::new();
        assert!(sol.insert_route(0, Route::empty(3)).is_none());
        let old = sol.insert_route(0, Route::from_customers(&[1, 2], 3));
        assert_eq!(old, Some(Route::empty(3)));
        assert_eq!(sol.num_served(), 2);
        assert_eq!(sol.num_active_routes(), 1);
    }

    #[test]
    fn test_route_mut() {
        let mut sol = Solution::from_routes([(0, vec![0, 1, 2, 3])]);
        if let Some(route) = sol.route_mut(0) {
            route.nodes_mut().swap(1, 2);
        }
        assert_eq!(sol.route(0).map(Route::nodes), Some(&[0, 2, 1, 3][..]));
    }

    #[test]
    fn test_serde_shape() {
        let sol = Solution::from_routes([(1, vec![0, 1, 4])]);
        let json = serde_json::to_string(&sol).expect("serialize");
        assert_eq!(json, r#"{"1":[0,1,4]}"#);
        let back: Solution = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, sol);
    }
}
