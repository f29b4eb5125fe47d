//! Annealing execution loop.

use std::fmt::Display;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::evaluation::{validate_seed, Cost, CostEvaluator};
use crate::models::{ConfigurationError, Instance, InvalidSeedError, Solution};
use crate::neighborhood::{InterRouteSwap, Neighborhood};

use super::config::{AnnealingConfig, TEMPERATURE_FLOOR};

/// Magnitude bound on the Metropolis exponent.
///
/// `exp(-MAX_EXPONENT)` underflows to exactly `0.0`, so a gap this large
/// (in particular any feasible-vs-infeasible gap) can never be accepted.
pub const MAX_EXPONENT: f64 = 800.0;

/// Why an annealing run could not start.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnealError {
    /// The configuration is out of range.
    Configuration(ConfigurationError),
    /// The seed solution is not a valid starting point.
    InvalidSeed(InvalidSeedError),
}

impl Display for AnnealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "Configuration error: {e}"),
            Self::InvalidSeed(e) => write!(f, "Invalid seed solution: {e}"),
        }
    }
}

impl std::error::Error for AnnealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::InvalidSeed(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for AnnealError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<InvalidSeedError> for AnnealError {
    fn from(e: InvalidSeedError) -> Self {
        Self::InvalidSeed(e)
    }
}

/// What happened during one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Temperature the acceptance test used (before cooling).
    pub temperature: f64,
    /// Cost of the proposed candidate.
    pub candidate_cost: Cost,
    /// Whether the candidate became the current solution.
    pub accepted: bool,
    /// Whether the candidate became the new best.
    pub improved: bool,
}

/// Result of an annealing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealResult {
    /// The best solution found.
    pub best: Solution,

    /// Cost of the best solution.
    pub best_cost: Cost,

    /// Total number of iterations (candidate evaluations).
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of moves that improved the best solution.
    pub improving_moves: usize,

    /// Temperature when the search stopped.
    pub final_temperature: f64,

    /// Best cost before the first iteration and after every iteration.
    ///
    /// Non-increasing. Infeasible entries hold
    /// [`INFEASIBLE_PENALTY`](crate::evaluation::INFEASIBLE_PENALTY).
    pub cost_history: Vec<f64>,
}

/// Probability of accepting `candidate` when the best known cost is `best`.
///
/// `1` for a strict improvement, otherwise `exp((best - candidate) / T)`
/// with the exponent clamped to `[-MAX_EXPONENT, 0]`. An infeasible
/// candidate against a feasible best yields exactly `0`.
///
/// # Examples
///
/// ```
/// use u_vrptw::annealing::acceptance_probability;
/// use u_vrptw::evaluation::Cost;
///
/// let p = acceptance_probability(Cost::Feasible(100.0), Cost::Feasible(110.0), 10.0);
/// assert!((p - (-1.0f64).exp()).abs() < 1e-12);
/// assert_eq!(acceptance_probability(Cost::Feasible(100.0), Cost::Infeasible, 1e6), 0.0);
/// ```
pub fn acceptance_probability(best: Cost, candidate: Cost, temperature: f64) -> f64 {
    if candidate < best {
        return 1.0;
    }
    let exponent = ((best.value() - candidate.value()) / temperature).clamp(-MAX_EXPONENT, 0.0);
    exponent.exp()
}

/// Step-wise simulated annealing over VRPTW solutions.
///
/// Holds the search state: current solution, best solution, temperature,
/// and a single random stream used first for the move and then for the
/// acceptance draw of every iteration. Two annealers built from the same
/// instance, seed solution and configuration seed follow identical
/// trajectories.
///
/// Each iteration:
///
/// 1. `candidate = propose(current)`
/// 2. accept if `cost(candidate) < best_cost`, else with probability
///    [`acceptance_probability`]
/// 3. an accepted strict improvement also becomes the new best
/// 4. `T ← T · cooling_rate`
///
/// The search ends once `T <= TEMPERATURE_FLOOR`.
///
/// # Examples
///
/// ```
/// use u_vrptw::annealing::{Annealer, AnnealingConfig};
/// use u_vrptw::models::{Instance, InstanceData, Solution, TimeWindow};
///
/// let w = |a, b| TimeWindow::new(a, b).unwrap();
/// let instance = Instance::new(InstanceData {
///     vehicles: vec![0, 1],
///     capacity: 10,
///     demands: vec![5, 5],
///     cost: vec![
///         vec![0.0, 1.0, 9.0, 0.0],
///         vec![1.0, 0.0, 1.0, 1.0],
///         vec![9.0, 1.0, 0.0, 9.0],
///         vec![0.0, 1.0, 9.0, 0.0],
///     ],
///     time: vec![vec![1.0; 4]; 4],
///     windows: vec![w(0.0, 50.0), w(0.0, 50.0), w(0.0, 50.0), w(0.0, 50.0)],
/// })
/// .unwrap();
///
/// let seed = Solution::from_routes([(0, vec![0, 1, 3]), (1, vec![0, 2, 3])]);
/// let config = AnnealingConfig::default().with_seed(1);
/// let mut annealer = Annealer::new(&instance, seed, &config).unwrap();
///
/// let first = annealer.step().unwrap();
/// assert_eq!(first.iteration, 1);
///
/// let result = annealer.run();
/// assert_eq!(result.iterations, config.expected_iterations());
/// assert!(result.best_cost.is_feasible());
/// ```
#[derive(Debug, Clone)]
pub struct Annealer<'a, N: Neighborhood = InterRouteSwap> {
    evaluator: CostEvaluator<'a>,
    neighborhood: N,
    rng: StdRng,
    cooling_rate: f64,
    temperature: f64,
    current: Solution,
    current_cost: Cost,
    best: Solution,
    best_cost: Cost,
    iterations: usize,
    accepted_moves: usize,
    improving_moves: usize,
    cost_history: Vec<f64>,
}

impl<'a> Annealer<'a, InterRouteSwap> {
    /// Prepares a search from `seed` using the [`InterRouteSwap`] move.
    ///
    /// Fails if the configuration is invalid or `seed` does not cover every
    /// customer exactly once with well-formed routes for the whole fleet.
    pub fn new(
        instance: &'a Instance,
        seed: Solution,
        config: &AnnealingConfig,
    ) -> Result<Self, AnnealError> {
        Self::with_neighborhood(instance, seed, config, InterRouteSwap)
    }
}

impl<'a, N: Neighborhood> Annealer<'a, N> {
    /// Prepares a search from `seed` using a custom move operator.
    pub fn with_neighborhood(
        instance: &'a Instance,
        seed: Solution,
        config: &AnnealingConfig,
        neighborhood: N,
    ) -> Result<Self, AnnealError> {
        config.validate()?;
        validate_seed(&seed, instance)?;

        let evaluator = CostEvaluator::new(instance);
        let cost = evaluator.evaluate(&seed);
        if !cost.is_feasible() {
            warn!("seed solution violates capacity or time windows");
        }

        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::seed_from_u64(rand::random()),
        };

        Ok(Self {
            evaluator,
            neighborhood,
            rng,
            cooling_rate: config.cooling_rate,
            temperature: config.initial_temperature,
            current: seed.clone(),
            current_cost: cost,
            best: seed,
            best_cost: cost,
            iterations: 0,
            accepted_moves: 0,
            improving_moves: 0,
            cost_history: vec![cost.value()],
        })
    }

    /// Returns `true` once the temperature has reached the floor.
    pub fn is_finished(&self) -> bool {
        self.temperature <= TEMPERATURE_FLOOR
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The working solution.
    pub fn current(&self) -> &Solution {
        &self.current
    }

    /// Cost of the working solution.
    pub fn current_cost(&self) -> Cost {
        self.current_cost
    }

    /// The best solution found so far.
    pub fn best(&self) -> &Solution {
        &self.best
    }

    /// Cost of the best solution found so far.
    pub fn best_cost(&self) -> Cost {
        self.best_cost
    }

    /// Performs one iteration, or returns `None` if the search is over.
    pub fn step(&mut self) -> Option<StepOutcome> {
        if self.is_finished() {
            return None;
        }

        let candidate = self.neighborhood.propose(&self.current, &mut self.rng);
        let candidate_cost = self.evaluator.evaluate(&candidate);

        let improved = candidate_cost < self.best_cost;
        let accepted = improved || {
            let p = acceptance_probability(self.best_cost, candidate_cost, self.temperature);
            self.rng.random::<f64>() < p
        };

        if accepted {
            self.accepted_moves += 1;
            if improved {
                self.improving_moves += 1;
                debug!(
                    iteration = self.iterations + 1,
                    temperature = self.temperature,
                    best_cost = %candidate_cost,
                    "new best solution"
                );
                self.best = candidate.clone();
                self.best_cost = candidate_cost;
            }
            self.current = candidate;
            self.current_cost = candidate_cost;
        }

        self.iterations += 1;
        let temperature = self.temperature;
        self.temperature *= self.cooling_rate;
        self.cost_history.push(self.best_cost.value());

        trace!(
            iteration = self.iterations,
            temperature,
            candidate_cost = %candidate_cost,
            accepted,
            "annealing step"
        );

        Some(StepOutcome {
            iteration: self.iterations,
            temperature,
            candidate_cost,
            accepted,
            improved,
        })
    }

    /// Runs to the temperature floor and returns the best solution found.
    pub fn run(mut self) -> AnnealResult {
        info!(
            neighborhood = self.neighborhood.name(),
            temperature = self.temperature,
            cooling_rate = self.cooling_rate,
            seed_cost = %self.best_cost,
            "annealing started"
        );

        while self.step().is_some() {}

        info!(
            iterations = self.iterations,
            accepted = self.accepted_moves,
            improving = self.improving_moves,
            best_cost = %self.best_cost,
            "annealing finished"
        );

        self.into_result()
    }

    /// Stops the search where it is and returns the best solution so far.
    pub fn into_result(self) -> AnnealResult {
        AnnealResult {
            best: self.best,
            best_cost: self.best_cost,
            iterations: self.iterations,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            final_temperature: self.temperature,
            cost_history: self.cost_history,
        }
    }
}

/// Runs a full annealing search with the default move.
pub fn anneal(
    instance: &Instance,
    seed: Solution,
    config: &AnnealingConfig,
) -> Result<AnnealResult, AnnealError> {
    Ok(Annealer::new(instance, seed, config)?.run())
}
