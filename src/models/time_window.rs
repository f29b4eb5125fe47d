//! Time window type.

use serde::{Deserialize, Serialize};

/// A time window constraint for service at a node.
///
/// The vehicle must arrive no later than `end` and may arrive as early as it
/// likes, waiting until `start` if early.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// assert_eq!(tw.service_start(80.0), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` unless `start < end` and both values are finite.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Earliest service time.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Latest allowable arrival time.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Time at which service begins when arriving at `arrival`.
    ///
    /// Early vehicles wait for the window to open.
    pub fn service_start(&self, arrival: f64) -> f64 {
        arrival.max(self.start)
    }

    /// Returns `true` if arriving at the given time misses this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.end
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start < self.end
    }
}
