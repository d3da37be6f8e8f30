//! Charging stations and the node-keyed station registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::NodeId;

/// A charging station located at a graph node.
///
/// Only its presence matters for route feasibility. Price, queue time
/// and power are consumed by the objective function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    /// Node hosting the station.
    pub id: NodeId,
    /// Map X-coordinate.
    pub x: f64,
    /// Map Y-coordinate.
    pub y: f64,
    /// Energy price per kWh.
    pub price_per_kwh: f64,
    /// Expected waiting time before charging starts (hours).
    pub queue_time: f64,
    /// Maximum charging power (kW).
    pub max_power: f64,
}

impl ChargingStation {
    /// Creates a station at `id` with zero coordinates.
    pub fn new(id: impl Into<NodeId>, price_per_kwh: f64, queue_time: f64, max_power: f64) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            price_per_kwh,
            queue_time,
            max_power,
        }
    }

    /// Sets map coordinates.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// Stations keyed by the node that hosts them.
///
/// # Examples
///
/// ```
/// use u_ev_routing::models::{ChargingStation, StationRegistry};
///
/// let mut stations = StationRegistry::new();
/// stations.insert(ChargingStation::new("N0", 0.5, 0.2, 50.0));
/// assert!(stations.has_station("N0"));
/// assert!(!stations.has_station("N1"));
/// assert_eq!(stations.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationRegistry {
    stations: BTreeMap<NodeId, ChargingStation>,
}

impl StationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a station, keyed by its `id`. Returns the replaced station, if any.
    pub fn insert(&mut self, station: ChargingStation) -> Option<ChargingStation> {
        self.stations.insert(station.id.clone(), station)
    }

    /// Returns `true` if `node` hosts a station.
    pub fn has_station(&self, node: &str) -> bool {
        self.stations.contains_key(node)
    }

    /// Station at `node`, if any.
    pub fn get(&self, node: &str) -> Option<&ChargingStation> {
        self.stations.get(node)
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns `true` if there are no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Iterates stations in node order.
    pub fn iter(&self) -> impl Iterator<Item = &ChargingStation> {
        self.stations.values()
    }
}

impl FromIterator<ChargingStation> for StationRegistry {
    fn from_iter<T: IntoIterator<Item = ChargingStation>>(iter: T) -> Self {
        let mut registry = Self::new();
        for station in iter {
            registry.insert(station);
        }
        registry
    }
}
