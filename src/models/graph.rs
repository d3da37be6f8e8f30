//! Directed road graph and the network trait consumed by the ACO engine.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::Vehicle;

/// Identifier of a node (intersection, depot, charging site) in the graph.
pub type NodeId = String;

/// Attributes of a directed road segment.
///
/// # Examples
///
/// ```
/// use u_ev_routing::models::Edge;
///
/// let e = Edge::new(12.0, 1.5).unwrap();
/// assert_eq!(e.distance(), 12.0);
/// assert!((e.weighted_distance() - 18.0).abs() < 1e-10);
/// assert!(Edge::new(0.0, 1.0).is_none());
/// assert!(Edge::new(5.0, 0.5).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    distance: f64,
    difficulty: f64,
}

impl Edge {
    /// Creates a new edge.
    ///
    /// Returns `None` unless `distance` is finite and positive and
    /// `difficulty` is finite and at least 1.
    pub fn new(distance: f64, difficulty: f64) -> Option<Self> {
        if !distance.is_finite() || distance <= 0.0 {
            return None;
        }
        if !difficulty.is_finite() || difficulty < 1.0 {
            return None;
        }
        Some(Self {
            distance,
            difficulty,
        })
    }

    /// Length of the segment in kilometres.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Terrain/traffic difficulty multiplier (>= 1).
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// `distance * difficulty`.
    pub fn weighted_distance(&self) -> f64 {
        self.distance * self.difficulty
    }
}

/// Read-only view of a road network as seen by route construction.
///
/// The engine is generic over this trait. [`Graph`] is the bundled
/// implementation; custom networks can override [`neighbors_of`] to apply
/// their own edge-level feasibility rules (closures, range limits, ...).
///
/// Implementations must return neighbors in a stable order so that seeded
/// runs are reproducible.
///
/// [`neighbors_of`]: RoadNetwork::neighbors_of
pub trait RoadNetwork: Send + Sync {
    /// All node identifiers, in a stable order.
    fn nodes(&self) -> Vec<&NodeId>;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Returns `true` if the node exists.
    fn contains_node(&self, id: &str) -> bool;

    /// The directed edge `from -> to`, if present.
    fn edge(&self, from: &str, to: &str) -> Option<&Edge>;

    /// Outgoing edges of `from`, in a stable order.
    fn edges_from(&self, from: &str) -> Vec<(&NodeId, &Edge)>;

    /// Candidate next hops from `current` for a vehicle holding `charge`.
    ///
    /// Visited nodes are never returned. The default does not filter on
    /// charge: running dry is resolved by the route builder.
    fn neighbors_of(
        &self,
        current: &str,
        visited: &HashSet<NodeId>,
        _charge: f64,
        _vehicle: &Vehicle,
    ) -> Vec<(&NodeId, &Edge)> {
        self.edges_from(current)
            .into_iter()
            .filter(|(node, _)| !visited.contains(node.as_str()))
            .collect()
    }
}

/// A directed graph with `distance`/`difficulty` attributes on each edge.
///
/// Adjacency is kept in ordered maps, so iteration order is deterministic.
///
/// # Examples
///
/// ```
/// use u_ev_routing::models::{Graph, RoadNetwork};
///
/// let mut g = Graph::new();
/// g.add_bidirectional_edge("A", "B", 10.0, 1.0).unwrap();
/// g.add_edge("B", "C", 5.0, 2.0).unwrap();
///
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.edge_count(), 3);
/// assert!(g.edge("C", "B").is_none());
/// assert_eq!(g.edge("B", "C").unwrap().difficulty(), 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, Edge>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an isolated node. No-op if it already exists.
    pub fn add_node(&mut self, id: impl Into<NodeId>) {
        self.adjacency.entry(id.into()).or_default();
    }

    /// Adds (or replaces) the directed edge `from -> to`.
    ///
    /// Both endpoints are created if missing.
    pub fn add_edge(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        distance: f64,
        difficulty: f64,
    ) -> Result<(), String> {
        let from = from.into();
        let to = to.into();
        if from == to {
            return Err(format!("self-loop on node {from} is not allowed"));
        }
        let edge = Edge::new(distance, difficulty).ok_or_else(|| {
            format!(
                "invalid edge {from} -> {to}: distance must be positive and difficulty >= 1, \
                 got distance={distance}, difficulty={difficulty}"
            )
        })?;
        self.adjacency.entry(to.clone()).or_default();
        self.adjacency.entry(from).or_default().insert(to, edge);
        Ok(())
    }

    /// Adds `a -> b` and `b -> a` with identical attributes.
    pub fn add_bidirectional_edge(
        &mut self,
        a: impl Into<NodeId>,
        b: impl Into<NodeId>,
        distance: f64,
        difficulty: f64,
    ) -> Result<(), String> {
        let a = a.into();
        let b = b.into();
        self.add_edge(a.clone(), b.clone(), distance, difficulty)?;
        self.add_edge(b, a, distance, difficulty)
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|out| out.len()).sum()
    }

    /// Number of outgoing edges of `node` (0 if unknown).
    pub fn out_degree(&self, node: &str) -> usize {
        self.adjacency.get(node).map_or(0, |out| out.len())
    }
}

impl RoadNetwork for Graph {
    fn nodes(&self) -> Vec<&NodeId> {
        self.adjacency.keys().collect()
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn contains_node(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    fn edge(&self, from: &str, to: &str) -> Option<&Edge> {
        self.adjacency.get(from).and_then(|out| out.get(to))
    }

    fn edges_from(&self, from: &str) -> Vec<(&NodeId, &Edge)> {
        self.adjacency
            .get(from)
            .map(|out| out.iter().collect())
            .unwrap_or_default()
    }
}
