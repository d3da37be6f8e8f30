//! Single-ant route construction with battery tracking.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;

use super::{NeighborSampler, SamplingContext};
use crate::models::{NodeId, RoadNetwork, Route, StationRegistry};

/// Why an ant could not reach the goal.
///
/// These are ordinary outcomes: the optimizer drops the attempt and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionFailure {
    /// No unvisited feasible neighbor at `at`.
    DeadEnd {
        /// Node where the ant got stuck.
        at: NodeId,
    },
    /// Charge went negative on `from -> to` and `from` has no station.
    BatteryExhausted {
        /// Departure node of the failing leg.
        from: NodeId,
        /// Arrival node of the failing leg.
        to: NodeId,
    },
    /// The per-ant hop budget ran out before reaching the goal.
    StepLimit {
        /// Budget that was exhausted.
        steps: usize,
    },
}

impl fmt::Display for ConstructionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadEnd { at } => write!(f, "dead end at {at}"),
            Self::BatteryExhausted { from, to } => {
                write!(f, "battery exhausted on {from} -> {to} with no station at {from}")
            }
            Self::StepLimit { steps } => write!(f, "step limit of {steps} reached"),
        }
    }
}

/// Builds one ant's route from a start node to a goal node.
///
/// Each step samples a hop, deducts `distance * energy_per_km` from the
/// charge and, if the charge went negative, refills the battery to capacity
/// when the node being *left* hosts a station. Otherwise the ant fails.
/// A node is never entered twice.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_ev_routing::aco::{NeighborSampler, PheromoneMatrix, RouteBuilder, SamplingContext};
/// use u_ev_routing::models::{Graph, StationRegistry, Vehicle};
///
/// let mut g = Graph::new();
/// g.add_edge("A", "B", 4.0, 1.0).unwrap();
/// g.add_edge("B", "C", 4.0, 1.0).unwrap();
/// let vehicle = Vehicle::new(10.0, 1.0);
/// let stations = StationRegistry::new();
/// let tau = PheromoneMatrix::initialize(&g, 1.0).unwrap();
/// let ctx = SamplingContext { network: &g, vehicle: &vehicle, pheromones: &tau };
///
/// let builder = RouteBuilder::new(NeighborSampler::new(1.0, 2.0), &stations);
/// let route = builder.build(ctx, "A", "C", &mut StdRng::seed_from_u64(0)).unwrap();
/// assert_eq!(route.nodes(), ["A", "B", "C"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteBuilder<'a> {
    sampler: NeighborSampler,
    stations: &'a StationRegistry,
    max_steps: usize,
}

impl<'a> RouteBuilder<'a> {
    /// Creates a builder. The hop budget defaults to the network's node count.
    pub fn new(sampler: NeighborSampler, stations: &'a StationRegistry) -> Self {
        Self {
            sampler,
            stations,
            max_steps: 0,
        }
    }

    /// Caps the number of hops per ant. 0 = node count.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Runs one construction attempt.
    pub fn build<N: RoadNetwork + ?Sized, R: Rng>(
        &self,
        ctx: SamplingContext<'_, N>,
        start: &str,
        goal: &str,
        rng: &mut R,
    ) -> Result<Route, ConstructionFailure> {
        let step_limit = match self.max_steps {
            0 => ctx.network.node_count().max(1),
            n => n,
        };

        let mut current: NodeId = start.to_string();
        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(current.clone());
        let mut route = Route::new(current.clone());
        let mut charge = ctx.vehicle.initial_charge();
        let mut steps = 0usize;

        while current != goal {
            if steps >= step_limit {
                return Err(ConstructionFailure::StepLimit { steps: step_limit });
            }

            let Some(next) = self
                .sampler
                .sample(ctx, &current, &visited, charge, rng)
            else {
                return Err(ConstructionFailure::DeadEnd { at: current });
            };

            route.push(next.node.clone());
            visited.insert(next.node.clone());

            charge -= ctx.vehicle.energy_for(next.edge.distance());
            if charge < 0.0 {
                if self.stations.has_station(&current) {
                    charge = ctx.vehicle.battery_capacity();
                } else {
                    return Err(ConstructionFailure::BatteryExhausted {
                        from: current,
                        to: next.node.clone(),
                    });
                }
            }

            current = next.node.clone();
            steps += 1;
        }

        Ok(route)
    }
}
