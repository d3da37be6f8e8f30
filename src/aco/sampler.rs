//! Probabilistic next-hop selection.

use std::collections::HashSet;

use rand::Rng;

use super::PheromoneMatrix;
use crate::models::{Edge, NodeId, RoadNetwork, Vehicle};

/// Read-only data an ant consults at every step.
#[derive(Debug)]
pub struct SamplingContext<'a, N: ?Sized> {
    /// Road network queried for candidate hops.
    pub network: &'a N,
    /// Vehicle whose charge is being tracked.
    pub vehicle: &'a Vehicle,
    /// Shared pheromone levels (never mutated by ants).
    pub pheromones: &'a PheromoneMatrix,
}

impl<N: ?Sized> Clone for SamplingContext<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: ?Sized> Copy for SamplingContext<'_, N> {}

/// A feasible next hop with its selection probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    /// Node that would be entered.
    pub node: &'a NodeId,
    /// Edge from the current node to `node`.
    pub edge: &'a Edge,
    /// Normalized selection probability.
    pub probability: f64,
}

/// Random-proportional selection rule.
///
/// For each candidate `i` offered by the network:
///
/// ```text
/// η_i = 1 / (distance_i · difficulty_i)
/// w_i = τ(current, i)^α · η_i^β
/// p_i = w_i / Σ w
/// ```
///
/// Weights are normalized in log space, so neither overflow nor underflow
/// distorts the ratios. Candidates are drawn uniformly only when no weight
/// is usable.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use u_ev_routing::aco::{NeighborSampler, PheromoneMatrix, SamplingContext};
/// use u_ev_routing::models::{Graph, Vehicle};
///
/// let mut g = Graph::new();
/// g.add_edge("A", "B", 1.0, 1.0).unwrap();
/// g.add_edge("A", "C", 2.0, 1.0).unwrap();
/// let vehicle = Vehicle::new(100.0, 1.0);
/// let tau = PheromoneMatrix::initialize(&g, 1.0).unwrap();
/// let ctx = SamplingContext { network: &g, vehicle: &vehicle, pheromones: &tau };
///
/// let mut visited = HashSet::new();
/// visited.insert("A".to_string());
/// let dist = NeighborSampler::new(1.0, 1.0).distribution(ctx, "A", &visited, 100.0);
/// // weights 1 and 1/2
/// assert!((dist[0].probability - 2.0 / 3.0).abs() < 1e-12);
/// assert!((dist[1].probability - 1.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSampler {
    alpha: f64,
    beta: f64,
}

impl NeighborSampler {
    /// Creates a sampler with pheromone exponent `alpha` and heuristic
    /// exponent `beta`.
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Pheromone exponent.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Heuristic exponent.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Unnormalized desirability of taking `edge` given its pheromone level.
    ///
    /// May overflow to infinity or underflow to zero for extreme inputs;
    /// [`distribution`](Self::distribution) works on the logarithm instead.
    pub fn desirability(&self, pheromone: f64, edge: &Edge) -> f64 {
        let heuristic = 1.0 / (edge.distance() * edge.difficulty());
        pheromone.powf(self.alpha) * heuristic.powf(self.beta)
    }

    /// Natural logarithm of [`desirability`](Self::desirability).
    pub fn log_desirability(&self, pheromone: f64, edge: &Edge) -> f64 {
        let log_heuristic = -(edge.distance().ln() + edge.difficulty().ln());
        scaled(self.alpha, pheromone.ln()) + scaled(self.beta, log_heuristic)
    }

    /// Probability distribution over the network's candidate hops from
    /// `current`. Empty when there is no candidate.
    ///
    /// Weights are shifted by the largest log-desirability before
    /// exponentiating, so the ratios hold even where the raw weights would
    /// overflow or underflow. If one or more weights are infinite they share
    /// all the mass.
    pub fn distribution<'a, N: RoadNetwork + ?Sized>(
        &self,
        ctx: SamplingContext<'a, N>,
        current: &str,
        visited: &HashSet<NodeId>,
        charge: f64,
    ) -> Vec<Candidate<'a>> {
        let neighbors = ctx
            .network
            .neighbors_of(current, visited, charge, ctx.vehicle);
        if neighbors.is_empty() {
            return Vec::new();
        }

        let log_weights: Vec<f64> = neighbors
            .iter()
            .map(|(node, edge)| self.log_desirability(ctx.pheromones.level(current, node), edge))
            .collect();
        let max = log_weights
            .iter()
            .copied()
            .filter(|w| !w.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);

        let weights: Vec<f64> = log_weights
            .iter()
            .map(|&w| {
                if w.is_nan() {
                    0.0
                } else if max == f64::INFINITY {
                    if w == f64::INFINITY {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    (w - max).exp()
                }
            })
            .collect();
        let total: f64 = weights.iter().sum();

        // Uniform only when every weight is zero or NaN.
        let uniform = 1.0 / neighbors.len() as f64;
        let normalizable = total > 0.0;

        neighbors
            .into_iter()
            .zip(weights)
            .map(|((node, edge), w)| Candidate {
                node,
                edge,
                probability: if normalizable { w / total } else { uniform },
            })
            .collect()
    }

    /// Draws one candidate hop, or `None` if there is none.
    pub fn sample<'a, N: RoadNetwork + ?Sized, R: Rng>(
        &self,
        ctx: SamplingContext<'a, N>,
        current: &str,
        visited: &HashSet<NodeId>,
        charge: f64,
        rng: &mut R,
    ) -> Option<Candidate<'a>> {
        let candidates = self.distribution(ctx, current, visited, charge);
        let last = candidates.last().copied()?;

        let pick: f64 = rng.random();
        let mut cumulative = 0.0;
        for candidate in &candidates {
            cumulative += candidate.probability;
            if pick < cumulative {
                return Some(*candidate);
            }
        }
        // Rounding left the cumulative sum just below 1.
        Some(last)
    }
}

/// `exponent * log_value`, treating a zero exponent as contributing nothing.
fn scaled(exponent: f64, log_value: f64) -> f64 {
    if exponent == 0.0 {
        0.0
    } else {
        exponent * log_value
    }
}
