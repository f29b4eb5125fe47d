//! Inter-route customer swap.
//!
//! # Algorithm
//!
//! Pick two distinct vehicles uniformly at random. If both routes serve at
//! least one customer, pick one interior position in each uniformly at
//! random and exchange the two customers:
//!
//! ```text
//! R1 = [0, a₁, …, aᵢ, …, n+1]        R1' = [0, a₁, …, bⱼ, …, n+1]
//! R2 = [0, b₁, …, bⱼ, …, n+1]   ⇒    R2' = [0, b₁, …, aᵢ, …, n+1]
//! ```
//!
//! Route lengths, endpoints and the set of visited customers are unchanged.
//! A fleet of one vehicle, or an empty route among the two picked, yields an
//! unchanged copy.
//!
//! Random draws happen in a fixed order: first vehicle, second vehicle,
//! then (only when the move is not degenerate) the two positions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Route, Solution, VehicleId};

use super::Neighborhood;

/// An exchange of two customers between two routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapMove {
    /// First vehicle.
    pub first: VehicleId,
    /// Interior position in the first route.
    pub first_pos: usize,
    /// Second vehicle.
    pub second: VehicleId,
    /// Interior position in the second route.
    pub second_pos: usize,
}

impl SwapMove {
    /// Applies the exchange in place.
    ///
    /// Returns `false` and leaves the solution untouched if either vehicle
    /// has no route or a position is not interior.
    pub fn apply(&self, solution: &mut Solution) -> bool {
        let Some(a) = interior_node(solution, self.first, self.first_pos) else {
            return false;
        };
        let Some(b) = interior_node(solution, self.second, self.second_pos) else {
            return false;
        };
        if let Some(route) = solution.route_mut(self.first) {
            route.nodes_mut()[self.first_pos] = b;
        }
        if let Some(route) = solution.route_mut(self.second) {
            route.nodes_mut()[self.second_pos] = a;
        }
        true
    }
}

fn interior_node(solution: &Solution, vehicle: VehicleId, pos: usize) -> Option<usize> {
    let route = solution.route(vehicle)?;
    if pos == 0 || pos > route.num_interior() {
        return None;
    }
    Some(route.nodes()[pos])
}

/// The swap move operator.
///
/// Feasibility-agnostic: proposals are scored by the cost evaluator, never
/// filtered here.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::Solution;
/// use u_vrptw::neighborhood::{InterRouteSwap, Neighborhood};
/// use rand::SeedableRng;
///
/// let sol = Solution::from_routes([(1, vec![0, 1, 4]), (2, vec![0, 2, 3, 4])]);
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let next = InterRouteSwap.propose(&sol, &mut rng);
///
/// assert_eq!(next.route(1).unwrap().len(), 3);
/// assert_eq!(next.route(2).unwrap().len(), 4);
/// assert_eq!(next.num_served(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct InterRouteSwap;

impl InterRouteSwap {
    /// Draws a swap for `solution`, or `None` when the draw is degenerate.
    pub fn sample<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Option<SwapMove> {
        let vehicles: Vec<VehicleId> = solution.vehicles().collect();
        let k = vehicles.len();
        if k < 2 {
            return None;
        }

        let a = rng.random_range(0..k);
        let mut b = rng.random_range(0..k - 1);
        if b >= a {
            b += 1;
        }
        let (first, second) = (vehicles[a], vehicles[b]);

        let len_a = solution.route(first).map_or(0, Route::num_interior);
        let len_b = solution.route(second).map_or(0, Route::num_interior);
        if len_a == 0 || len_b == 0 {
            return None;
        }

        Some(SwapMove {
            first,
            first_pos: rng.random_range(1..=len_a),
            second,
            second_pos: rng.random_range(1..=len_b),
        })
    }
}

impl Neighborhood for InterRouteSwap {
    fn name(&self) -> &str {
        "inter_route_swap"
    }

    fn propose<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Solution {
        let mut next = solution.clone();
        if let Some(mv) = self.sample(solution, rng) {
            mv.apply(&mut next);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_routes() -> Solution {
        Solution::from_routes([(1, vec![0, 1, 4]), (2, vec![0, 2, 3, 4])])
    }

    fn sorted_customers(sol: &Solution) -> Vec<usize> {
        let mut c: Vec<usize> = sol.visited().collect();
        c.sort_unstable();
        c
    }

    #[test]
    fn test_swap_preserves_structure() {
        let sol = two_routes();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let next = InterRouteSwap.propose(&sol, &mut rng);
            assert_eq!(sorted_customers(&next), vec![1, 2, 3]);
            for (v, route) in next.routes() {
                assert_eq!(route.first(), Some(0));
                assert_eq!(route.last(), Some(4));
                assert_eq!(route.len(), sol.route(v).map_or(0, Route::len));
            }
        }
    }

    #[test]
    fn test_swap_changes_two_routes() {
        let sol = two_routes();
        let mut rng = StdRng::seed_from_u64(1);
        let mv = InterRouteSwap.sample(&sol, &mut rng).expect("both routes non-empty");
        assert_ne!(mv.first, mv.second);

        let mut next = sol.clone();
        assert!(mv.apply(&mut next));
        assert_ne!(next, sol);
        // Customer 1 is the only interior node of vehicle 1, so it always moves.
        assert_ne!(next.route(1), sol.route(1));
    }

    #[test]
    fn test_reaches_every_swap() {
        let sol = two_routes();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(InterRouteSwap.propose(&sol, &mut rng));
        }
        // [1]x[2,3] admits exactly two exchanges.
        let expected_a = Solution::from_routes([(1, vec![0, 2, 4]), (2, vec![0, 1, 3, 4])]);
        let expected_b = Solution::from_routes([(1, vec![0, 3, 4]), (2, vec![0, 2, 1, 4])]);
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&expected_a));
        assert!(seen.contains(&expected_b));
    }

    #[test]
    fn test_empty_route_is_noop() {
        let sol = Solution::from_routes([(1, vec![0, 4]), (2, vec![0, 1, 2, 3, 4])]);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            assert_eq!(InterRouteSwap.propose(&sol, &mut rng), sol);
        }
    }

    #[test]
    fn test_single_vehicle_is_noop() {
        let sol = Solution::from_routes([(0, vec![0, 1, 2, 3])]);
        let mut rng = StdRng::seed_from_u64(9);
        assert!(InterRouteSwap.sample(&sol, &mut rng).is_none());
        assert_eq!(InterRouteSwap.propose(&sol, &mut rng), sol);
        assert_eq!(InterRouteSwap.propose(&Solution::new(), &mut rng), Solution::new());
    }

    #[test]
    fn test_malformed_routes_do_not_panic() {
        let sol = Solution::from_routes([(1, vec![]), (2, vec![5]), (3, vec![0, 1, 4])]);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let _ = InterRouteSwap.propose(&sol, &mut rng);
        }
    }

    #[test]
    fn test_apply_rejects_depot_positions() {
        let mut sol = two_routes();
        let before = sol.clone();
        let mv = SwapMove {
            first: 1,
            first_pos: 0,
            second: 2,
            second_pos: 1,
        };
        assert!(!mv.apply(&mut sol));
        let mv = SwapMove {
            first: 1,
            first_pos: 1,
            second: 2,
            second_pos: 3,
        };
        assert!(!mv.apply(&mut sol));
        assert_eq!(sol, before);
    }

    #[test]
    fn test_same_seed_same_proposals() {
        let sol = two_routes();
        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(
                InterRouteSwap.propose(&sol, &mut a),
                InterRouteSwap.propose(&sol, &mut b)
            );
        }
    }
}
