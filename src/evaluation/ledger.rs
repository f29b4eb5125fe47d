//! Arc-usage bookkeeping.

use std::collections::BTreeSet;

/// Per-vehicle record of the arcs a solution drives.
///
/// Mirrors the binary arc variables `x[k][i][j]` of the exact VRPTW
/// formulation, which makes heuristic results directly comparable with an
/// external integer-programming solver. Vehicles are addressed by their
/// fleet slot (position in [`Instance::vehicles`](crate::models::Instance::vehicles)).
///
/// The fleet size is fixed at construction; arcs reported for slots beyond
/// it are ignored.
///
/// # Examples
///
/// ```
/// use u_vrptw::evaluation::ArcLedger;
///
/// let mut ledger = ArcLedger::new(2);
/// ledger.record(1, 0, 3);
/// assert!(ledger.is_used(1, 0, 3));
/// assert!(!ledger.is_used(0, 0, 3));
/// assert_eq!(ledger.num_used(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcLedger {
    used: Vec<BTreeSet<(usize, usize)>>,
}

impl ArcLedger {
    /// Creates an empty ledger for `fleet_size` vehicles.
    pub fn new(fleet_size: usize) -> Self {
        Self {
            used: vec![BTreeSet::new(); fleet_size],
        }
    }

    /// Number of vehicle slots.
    pub fn fleet_size(&self) -> usize {
        self.used.len()
    }

    /// Marks arc `(from, to)` as used by the vehicle in `slot`.
    pub fn record(&mut self, slot: usize, from: usize, to: usize) {
        if let Some(arcs) = self.used.get_mut(slot) {
            arcs.insert((from, to));
        }
    }

    /// Returns `true` if the vehicle in `slot` drives arc `(from, to)`.
    pub fn is_used(&self, slot: usize, from: usize, to: usize) -> bool {
        self.used
            .get(slot)
            .is_some_and(|arcs| arcs.contains(&(from, to)))
    }

    /// Arcs used by the vehicle in `slot`, in ascending order.
    pub fn arcs(&self, slot: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.used.get(slot).into_iter().flatten().copied()
    }

    /// Total number of used arcs across all vehicles.
    pub fn num_used(&self) -> usize {
        self.used.iter().map(BTreeSet::len).sum()
    }

    /// Forgets every recorded arc, keeping the fleet size.
    pub fn clear(&mut self) {
        self.used.iter_mut().for_each(BTreeSet::clear);
    }
}
