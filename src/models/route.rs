//! Route type: an ordered path of graph nodes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// An ordered sequence of node identifiers traversed by the vehicle.
///
/// Routes produced by the ACO engine start at the requested start node,
/// end at the goal node and never repeat a node.
///
/// # Examples
///
/// ```
/// use u_ev_routing::models::Route;
///
/// let route = Route::from_nodes(["N0", "N1", "N2"]);
/// assert_eq!(route.start(), Some("N0"));
/// assert_eq!(route.end(), Some("N2"));
/// assert_eq!(route.num_legs(), 2);
/// assert!(!route.has_repeats());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    nodes: Vec<NodeId>,
}

impl Route {
    /// Creates a route containing only `start`.
    pub fn new(start: impl Into<NodeId>) -> Self {
        Self {
            nodes: vec![start.into()],
        }
    }

    /// Creates a route from an explicit node sequence.
    pub fn from_nodes<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends a node to the end of this route.
    pub fn push(&mut self, node: impl Into<NodeId>) {
        self.nodes.push(node.into());
    }

    /// The visited nodes in order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes (including start and end).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the route has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of traversed edges.
    pub fn num_legs(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// First node.
    pub fn start(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    /// Last node.
    pub fn end(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }

    /// Returns `true` if `node` appears on the route.
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n == node)
    }

    /// Consecutive `(from, to)` pairs.
    pub fn legs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
    }

    /// Returns `true` if some node appears more than once.
    pub fn has_repeats(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        !self.nodes.iter().all(|n| seen.insert(n.as_str()))
    }
}
