//! # u-ev-routing
//!
//! Electric vehicle routing over weighted road graphs, solved with a
//! battery-aware Ant Colony Optimization engine.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Graph, RoadNetwork trait, Vehicle, ChargingStation, Route)
//! - [`evaluation`] — Objective function turning routes into comparable costs
//! - [`aco`] — Pheromone matrix, next-hop sampler, route builder and colony optimizer
//! - [`generator`] — Seeded synthetic graphs and station layouts for testing
//!
//! ## Quick start
//!
//! ```
//! use u_ev_routing::aco::{AcoConfig, ColonyOptimizer};
//! use u_ev_routing::evaluation::EnergyCostObjective;
//! use u_ev_routing::generator::{generate, GraphGenConfig};
//! use u_ev_routing::models::Vehicle;
//!
//! let (graph, stations) = generate(
//!     &GraphGenConfig::default()
//!         .with_num_nodes(30)
//!         .with_num_edges(120)
//!         .with_num_stations(8)
//!         .with_seed(1),
//! )
//! .unwrap();
//! let vehicle = Vehicle::new(10_000.0, 0.2);
//! let config = AcoConfig::default().with_num_ants(10).with_num_iterations(20).with_seed(1);
//!
//! let mut aco = ColonyOptimizer::new(&graph, &vehicle, &stations, EnergyCostObjective, config).unwrap();
//! let result = aco.optimize("N0", "N15");
//! if let Some(route) = &result.best_route {
//!     assert_eq!(route.start(), Some("N0"));
//!     assert_eq!(route.end(), Some("N15"));
//! }
//! ```

pub mod aco;
pub mod evaluation;
pub mod generator;
pub mod models;
