//! Synthetic test data.
//!
//! - [`generate`] — Seeded random road graph (ring plus chords) with
//!   randomly placed charging stations

mod random_graph;

pub use random_graph::{generate, generate_with_rng, GraphGenConfig};
