//! Neighborhood moves for the annealing search.
//!
//! - [`InterRouteSwap`] — exchange one customer between two routes

mod swap;

pub use swap::{InterRouteSwap, SwapMove};

use rand::Rng;

use crate::models::Solution;

/// A move operator that perturbs a solution.
///
/// Implementations return a structurally independent copy and never judge
/// feasibility; that is the evaluators' job.
pub trait Neighborhood {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Produces a neighbor of `solution`.
    fn propose<R: Rng>(&self, solution: &Solution, rng: &mut R) -> Solution;
}

/// Proposes a neighbor with the default [`InterRouteSwap`] move.
pub fn propose<R: Rng>(solution: &Solution, rng: &mut R) -> Solution {
    InterRouteSwap.propose(solution, rng)
}
