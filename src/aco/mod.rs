//! Ant Colony Optimization (ACO) for battery-constrained routing.
//!
//! A population of ants builds start→goal routes hop by hop, choosing each
//! hop with probability proportional to `τ^α · η^β`, where `τ` is the
//! learned pheromone on the edge and `η = 1 / (distance · difficulty)`.
//! Each ant tracks its own battery charge and recharges only when the node
//! it is leaving hosts a station. After every iteration pheromones
//! evaporate and successful routes deposit `1 / score` on their edges.
//!
//! - [`PheromoneMatrix`] — Per-edge pheromone levels
//! - [`NeighborSampler`] — Random-proportional next-hop selection
//! - [`RouteBuilder`] — One ant's construction with battery tracking
//! - [`ColonyOptimizer`] — Iteration loop and best-route tracking
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), "Ant Colony Optimization"

mod builder;
mod config;
mod pheromone;
mod runner;
mod sampler;

pub use builder::{ConstructionFailure, RouteBuilder};
pub use config::AcoConfig;
pub use pheromone::PheromoneMatrix;
pub use runner::{AcoResult, ColonyOptimizer, InfoLogger};
pub use sampler::{Candidate, NeighborSampler, SamplingContext};
