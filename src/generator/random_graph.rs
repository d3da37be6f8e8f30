//! Seeded synthetic road graph with charging stations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{ChargingStation, Graph, NodeId, RoadNetwork, StationRegistry};

/// Parameters for [`generate`].
///
/// # Examples
///
/// ```
/// use u_ev_routing::generator::GraphGenConfig;
///
/// let config = GraphGenConfig::default()
///     .with_num_nodes(20)
///     .with_num_edges(60)
///     .with_num_stations(5)
///     .with_seed(1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphGenConfig {
    /// Number of nodes, named `N0..N{n-1}`.
    pub num_nodes: usize,

    /// Target number of directed edges (capped at `n * (n - 1)`).
    pub num_edges: usize,

    /// Number of station placement draws. Repeated nodes are skipped, so
    /// the registry may end up smaller.
    pub num_stations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GraphGenConfig {
    fn default() -> Self {
        Self {
            num_nodes: 100,
            num_edges: 1000,
            num_stations: 30,
            seed: None,
        }
    }
}

impl GraphGenConfig {
    pub fn with_num_nodes(mut self, n: usize) -> Self {
        self.num_nodes = n;
        self
    }

    pub fn with_num_edges(mut self, n: usize) -> Self {
        self.num_edges = n;
        self
    }

    pub fn with_num_stations(mut self, n: usize) -> Self {
        self.num_stations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_nodes < 2 {
            return Err(format!(
                "num_nodes must be at least 2, got {}",
                self.num_nodes
            ));
        }
        Ok(())
    }
}

/// Generates a connected random graph and a station registry.
///
/// 1. Nodes are joined in a bidirectional ring, so every node is reachable.
/// 2. Random bidirectional chords are added until the directed edge count
///    reaches `num_edges`.
/// 3. `num_stations` random nodes receive a station.
///
/// Distances are whole kilometres in `10..=100`, difficulty is uniform in
/// `[1, 2]` rounded to two decimals. Stations charge 0.40-0.80 per kWh,
/// queue 0.10-0.50 h and deliver 30-100 kW.
///
/// # Examples
///
/// ```
/// use u_ev_routing::generator::{generate, GraphGenConfig};
/// use u_ev_routing::models::RoadNetwork;
///
/// let config = GraphGenConfig::default()
///     .with_num_nodes(10)
///     .with_num_edges(30)
///     .with_num_stations(3)
///     .with_seed(42);
/// let (graph, stations) = generate(&config).unwrap();
/// assert_eq!(graph.node_count(), 10);
/// assert!(graph.edge_count() >= 30);
/// assert!(stations.len() <= 3);
/// ```
pub fn generate(config: &GraphGenConfig) -> Result<(Graph, StationRegistry), String> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };
    generate_with_rng(config, &mut rng)
}

/// Same as [`generate`] but draws from a caller-provided generator.
///
/// `config.seed` is ignored.
pub fn generate_with_rng<R: Rng>(
    config: &GraphGenConfig,
    rng: &mut R,
) -> Result<(Graph, StationRegistry), String> {
    config.validate()?;
    let n = config.num_nodes;
    let nodes: Vec<NodeId> = (0..n).map(|i| format!("N{i}")).collect();

    let mut graph = Graph::new();
    for i in 0..n {
        let (distance, difficulty) = random_edge(rng);
        graph.add_bidirectional_edge(
            nodes[i].clone(),
            nodes[(i + 1) % n].clone(),
            distance,
            difficulty,
        )?;
    }

    let target = config.num_edges.min(n * (n - 1));
    while graph.edge_count() < target {
        let a = &nodes[rng.random_range(0..n)];
        let b = &nodes[rng.random_range(0..n)];
        if a == b || graph.edge(a, b).is_some() {
            continue;
        }
        let (distance, difficulty) = random_edge(rng);
        graph.add_bidirectional_edge(a.clone(), b.clone(), distance, difficulty)?;
    }

    let mut stations = StationRegistry::new();
    for _ in 0..config.num_stations {
        let node = &nodes[rng.random_range(0..n)];
        if stations.has_station(node) {
            continue;
        }
        let price_per_kwh = round2(rng.random_range(0.4..=0.8));
        let queue_time = round2(rng.random_range(0.1..=0.5));
        let max_power = rng.random_range(30..=100u32) as f64;
        let x = rng.random_range(0..=100u32) as f64;
        let y = rng.random_range(0..=100u32) as f64;
        stations.insert(
            ChargingStation::new(node.clone(), price_per_kwh, queue_time, max_power)
                .with_position(x, y),
        );
    }

    Ok((graph, stations))
}

fn random_edge<R: Rng>(rng: &mut R) -> (f64, f64) {
    let distance = rng.random_range(10..=100u32) as f64;
    let difficulty = round2(rng.random_range(1.0..=2.0));
    (distance, difficulty)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
