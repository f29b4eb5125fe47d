//! Simulated annealing search.
//!
//! A single-solution trajectory metaheuristic: worse candidates are
//! accepted with a probability that shrinks with the cost gap and with a
//! geometrically cooling temperature, letting the search leave local optima
//! early and settle later. Infeasible candidates score as
//! [`Cost::Infeasible`](crate::evaluation::Cost::Infeasible) and are never
//! accepted against a feasible best.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;

pub use config::{
    AnnealingConfig, DEFAULT_COOLING_RATE, DEFAULT_INITIAL_TEMPERATURE, TEMPERATURE_FLOOR,
};
pub use runner::{
    acceptance_probability, anneal, AnnealError, AnnealResult, Annealer, StepOutcome,
    MAX_EXPONENT,
};
