//! Route type.

use serde::{Deserialize, Serialize};

/// An ordered sequence of node indices driven by one vehicle.
///
/// A well-formed route starts at the departure depot `0`, ends at the return
/// depot `n + 1` and visits customers in between. The type itself does not
/// enforce this: routes arrive from callers and from the move operator, and
/// the evaluators are the ones that judge them.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::Route;
///
/// let route = Route::from_customers(&[3, 1], 4);
/// assert_eq!(route.nodes(), &[0, 3, 1, 4]);
/// assert_eq!(route.interior(), &[3, 1]);
/// assert_eq!(route.arcs().collect::<Vec<_>>(), vec![(0, 3), (3, 1), (1, 4)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    nodes: Vec<usize>,
}

impl Route {
    /// Wraps a raw node sequence, depots included.
    pub fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    /// A route that leaves the depot and returns immediately.
    pub fn empty(end_depot: usize) -> Self {
        Self::new(vec![0, end_depot])
    }

    /// Builds `0 → customers… → end_depot`.
    pub fn from_customers(customers: &[usize], end_depot: usize) -> Self {
        let mut nodes = Vec::with_capacity(customers.len() + 2);
        nodes.push(0);
        nodes.extend_from_slice(customers);
        nodes.push(end_depot);
        Self { nodes }
    }

    /// The full node sequence, depots included.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Mutable access to the node sequence.
    pub fn nodes_mut(&mut self) -> &mut Vec<usize> {
        &mut self.nodes
    }

    /// Nodes strictly between the first and last position.
    pub fn interior(&self) -> &[usize] {
        if self.nodes.len() < 2 {
            return &[];
        }
        &self.nodes[1..self.nodes.len() - 1]
    }

    /// Number of interior (customer) positions.
    pub fn num_interior(&self) -> usize {
        self.interior().len()
    }

    /// Returns `true` if the route serves no customers.
    pub fn is_empty(&self) -> bool {
        self.interior().is_empty()
    }

    /// Total number of positions, depots included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// First node, if any.
    pub fn first(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    /// Last node, if any.
    pub fn last(&self) -> Option<usize> {
        self.nodes.last().copied()
    }

    /// Consecutive `(from, to)` pairs in driving order.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }
}

impl From<Vec<usize>> for Route {
    fn from(nodes: Vec<usize>) -> Self {
        Self::new(nodes)
    }
}
