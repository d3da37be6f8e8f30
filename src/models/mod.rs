//! Domain model types for electric vehicle routing.
//!
//! Provides the road graph and the [`RoadNetwork`] trait the engine queries,
//! the electric vehicle record, charging stations keyed by node, and routes
//! as ordered node sequences.

mod graph;
mod route;
mod station;
mod vehicle;

pub use graph::{Edge, Graph, NodeId, RoadNetwork};
pub use route::Route;
pub use station::{ChargingStation, StationRegistry};
pub use vehicle::Vehicle;
