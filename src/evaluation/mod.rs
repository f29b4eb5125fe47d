//! Solution evaluation.
//!
//! - [`check_feasibility`] / [`is_feasible`] — hard-constraint check with
//!   a diagnostic of the first violation
//! - [`validate_seed`] — admission check for search starting points
//! - [`CostEvaluator`] / [`evaluate`] — single-pass objective with the
//!   infeasible sentinel [`Cost::Infeasible`]
//! - [`ArcLedger`] — per-vehicle arc bookkeeping
//! - [`Schedule`] — arrival-time projection for reporting

mod cost;
mod feasibility;
mod ledger;
mod schedule;

pub use cost::{evaluate, Cost, CostEvaluator, INFEASIBLE_PENALTY};
pub use feasibility::{check_feasibility, is_feasible, validate_seed, Infeasibility};
pub use ledger::ArcLedger;
pub use schedule::{RouteSchedule, Schedule, Visit};
