//! Single-pass cost evaluation with inline feasibility checks.

use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::models::{Instance, Solution};

use super::ArcLedger;

/// Finite stand-in for an infeasible objective.
///
/// Used wherever a [`Cost`] must become a plain number, such as the
/// Metropolis exponent. Any feasible cost is strictly smaller.
pub const INFEASIBLE_PENALTY: f64 = f64::MAX;

/// Objective value of a solution.
///
/// `Infeasible` orders above every feasible cost, so a candidate that breaks
/// a hard constraint can never look cheaper than one that does not.
///
/// # Examples
///
/// ```
/// use u_vrptw::evaluation::Cost;
///
/// assert!(Cost::Feasible(1e300) < Cost::Infeasible);
/// assert!(Cost::Feasible(3.0) < Cost::Feasible(4.0));
/// assert_eq!(Cost::Infeasible.as_feasible(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    /// Total travel cost of a feasible solution.
    Feasible(f64),
    /// At least one hard constraint is violated.
    Infeasible,
}

impl Cost {
    /// Returns `true` for a feasible cost.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }

    /// The travel cost, if feasible.
    pub fn as_feasible(&self) -> Option<f64> {
        match *self {
            Self::Feasible(c) => Some(c),
            Self::Infeasible => None,
        }
    }

    /// Numeric projection: the travel cost, or [`INFEASIBLE_PENALTY`].
    pub fn value(&self) -> f64 {
        self.as_feasible().unwrap_or(INFEASIBLE_PENALTY)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Feasible(a), Self::Feasible(b)) => a.partial_cmp(b),
            (Self::Feasible(_), Self::Infeasible) => Some(Ordering::Less),
            (Self::Infeasible, Self::Feasible(_)) => Some(Ordering::Greater),
            (Self::Infeasible, Self::Infeasible) => Some(Ordering::Equal),
        }
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Feasible(c) => write!(f, "{c}"),
            Self::Infeasible => write!(f, "infeasible"),
        }
    }
}

/// Computes total travel cost while checking every hard constraint inline.
///
/// Each route is walked once, accumulating `cost[i][j]` alongside load and
/// arrival time. The first broken constraint turns the whole solution into
/// [`Cost::Infeasible`]; no partial penalties exist. The checks match
/// [`check_feasibility`](super::check_feasibility), so
/// `evaluate(s).is_feasible() == is_feasible(s)` for every solution.
///
/// # Examples
///
/// ```
/// use u_vrptw::evaluation::{Cost, CostEvaluator};
/// use u_vrptw::models::{Instance, InstanceData, Solution, TimeWindow};
///
/// let w = |a, b| TimeWindow::new(a, b).unwrap();
/// let instance = Instance::new(InstanceData {
///     vehicles: vec![0],
///     capacity: 10,
///     demands: vec![4],
///     cost: vec![vec![0.0, 2.0, 0.0], vec![2.0, 0.0, 3.0], vec![0.0, 3.0, 0.0]],
///     time: vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
///     windows: vec![w(0.0, 10.0), w(0.0, 5.0), w(0.0, 10.0)],
/// })
/// .unwrap();
///
/// let evaluator = CostEvaluator::new(&instance);
/// let sol = Solution::from_routes([(0, vec![0, 1, 2])]);
/// assert_eq!(evaluator.evaluate(&sol), Cost::Feasible(5.0));
///
/// let broken = Solution::from_routes([(0, vec![0, 2])]);
/// assert_eq!(evaluator.evaluate(&broken), Cost::Infeasible);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CostEvaluator<'a> {
    instance: &'a Instance,
}

impl<'a> CostEvaluator<'a> {
    /// Creates an evaluator bound to `instance`.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// The instance this evaluator scores against.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Scores a solution.
    pub fn evaluate(&self, solution: &Solution) -> Cost {
        self.walk(solution, |_, _, _| {})
    }

    /// Scores a solution and records every traversed arc in `ledger`.
    ///
    /// The ledger is cleared first. If the solution turns out infeasible
    /// the ledger holds the arcs walked before the violation.
    pub fn evaluate_with_ledger(&self, solution: &Solution, ledger: &mut ArcLedger) -> Cost {
        ledger.clear();
        self.walk(solution, |slot, from, to| ledger.record(slot, from, to))
    }

    fn walk<F>(&self, solution: &Solution, mut on_arc: F) -> Cost
    where
        F: FnMut(usize, usize, usize),
    {
        let inst = self.instance;
        let start = inst.start_depot();
        let end = inst.end_depot();
        let mut visited = vec![false; inst.num_nodes()];
        let mut served = 0usize;
        let mut total = 0.0;

        for (vehicle, route) in solution.routes() {
            let Some(slot) = inst.vehicle_slot(vehicle) else {
                return Cost::Infeasible;
            };
            let nodes = route.nodes();
            if nodes.len() < 2 || nodes[0] != start || nodes[nodes.len() - 1] != end {
                return Cost::Infeasible;
            }

            let last_arc = nodes.len() - 2;
            let capacity = i64::from(inst.capacity());
            let mut load: i64 = 0;
            let mut arrival = 0.0;
            for (idx, (from, to)) in route.arcs().enumerate() {
                if inst.is_customer(to) {
                    if visited[to] {
                        return Cost::Infeasible;
                    }
                    visited[to] = true;
                    served += 1;
                    load += i64::from(inst.demand(to));
                    if load > capacity {
                        return Cost::Infeasible;
                    }
                } else if to != end || idx != last_arc {
                    // Unknown index or a depot between the endpoints.
                    return Cost::Infeasible;
                }

                let window = inst.window(to);
                arrival = window.service_start(arrival + inst.time(from, to));
                if window.is_violated(arrival) {
                    return Cost::Infeasible;
                }

                total += inst.cost(from, to);
                on_arc(slot, from, to);
            }
        }

        if served != inst.num_customers() {
            return Cost::Infeasible;
        }
        Cost::Feasible(total)
    }
}

/// Scores `solution` against `instance`.
///
/// Shorthand for [`CostEvaluator::evaluate`].
pub fn evaluate(solution: &Solution, instance: &Instance) -> Cost {
    CostEvaluator::new(instance).evaluate(solution)
}
