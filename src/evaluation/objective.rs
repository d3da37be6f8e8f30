//! Route objective function: converts routes into a comparable cost.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{NodeId, RoadNetwork, Route, StationRegistry, Vehicle};

/// A type of infeasibility found while replaying a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Consecutive nodes are not joined by an edge.
    MissingEdge {
        /// Departure node.
        from: NodeId,
        /// Arrival node.
        to: NodeId,
    },
    /// Charge went negative on a leg whose departure node has no station.
    BatteryDepleted {
        /// Departure node (checked for a station).
        from: NodeId,
        /// Arrival node.
        to: NodeId,
        /// Charge after the leg.
        charge: f64,
    },
    /// A node appears more than once on the route.
    RepeatedNode {
        /// The repeated node.
        node: NodeId,
    },
}

/// A constraint violation on one route of an evaluated set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Index of the route in the evaluated slice.
    pub route_index: usize,
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(route_index: usize, kind: ViolationType) -> Self {
        Self { route_index, kind }
    }
}

/// Detailed breakdown produced alongside the numeric score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteEvaluation {
    /// Sum of edge distances.
    pub total_distance: f64,
    /// Sum of `distance * difficulty`.
    pub weighted_distance: f64,
    /// Energy drawn from the battery.
    pub energy_used: f64,
    /// Number of recharges.
    pub charging_stops: usize,
    /// Energy bought at stations.
    pub energy_charged: f64,
    /// Money spent at stations.
    pub charging_cost: f64,
    /// Hours spent queueing at stations.
    pub queue_time: f64,
    /// Infeasibilities, each weighted by the penalty in the score.
    pub violations: Vec<Violation>,
}

impl RouteEvaluation {
    /// Returns `true` if no violation was found.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Scores a set of routes. Lower is better.
///
/// Implementations must be pure: identical inputs yield identical output.
/// `penalty` weights infeasibility and is passed through from the
/// optimizer configuration untouched.
pub trait ObjectiveFunction: Send + Sync {
    /// Returns the detailed evaluation and the scalar score.
    fn score(
        &self,
        routes: &[Route],
        vehicle: &Vehicle,
        stations: &StationRegistry,
        network: &dyn RoadNetwork,
        penalty: f64,
    ) -> (RouteEvaluation, f64);
}

/// Default objective: travel effort plus charging expenses plus penalties.
///
/// Each route is replayed leg by leg with the same recharge rule the route
/// builder uses: when charge goes negative the *departure* node is checked
/// for a station, and if present the battery is refilled to capacity.
///
/// ```text
/// score = Σ distance·difficulty + Σ energy_bought·price + Σ queue_time
///       + penalty · |violations|
/// ```
///
/// The energy bought at a stop is the capacity minus what was left when
/// departing. A depleted leg without a station records a violation and
/// continues with an empty battery.
///
/// # Examples
///
/// ```
/// use u_ev_routing::evaluation::{EnergyCostObjective, ObjectiveFunction};
/// use u_ev_routing::models::{Graph, Route, StationRegistry, Vehicle};
///
/// let mut g = Graph::new();
/// g.add_edge("A", "B", 10.0, 1.5).unwrap();
/// let vehicle = Vehicle::new(100.0, 1.0);
///
/// let (detail, score) = EnergyCostObjective.score(
///     &[Route::from_nodes(["A", "B"])],
///     &vehicle,
///     &StationRegistry::new(),
///     &g,
///     1000.0,
/// );
/// assert!(detail.is_feasible());
/// assert!((score - 15.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyCostObjective;

impl EnergyCostObjective {
    fn replay(
        &self,
        route_index: usize,
        route: &Route,
        vehicle: &Vehicle,
        stations: &StationRegistry,
        network: &dyn RoadNetwork,
        eval: &mut RouteEvaluation,
    ) {
        let mut seen = HashSet::with_capacity(route.len());
        for node in route.nodes() {
            if !seen.insert(node.as_str()) {
                eval.violations.push(Violation::new(
                    route_index,
                    ViolationType::RepeatedNode { node: node.clone() },
                ));
            }
        }

        let mut charge = vehicle.initial_charge();
        for (from, to) in route.legs() {
            let Some(edge) = network.edge(from, to) else {
                eval.violations.push(Violation::new(
                    route_index,
                    ViolationType::MissingEdge {
                        from: from.to_string(),
                        to: to.to_string(),
                    },
                ));
                continue;
            };

            eval.total_distance += edge.distance();
            eval.weighted_distance += edge.weighted_distance();
            let needed = vehicle.energy_for(edge.distance());
            eval.energy_used += needed;

            let at_departure = charge;
            charge -= needed;
            if charge < 0.0 {
                match stations.get(from) {
                    Some(station) => {
                        let bought = vehicle.battery_capacity() - at_departure.max(0.0);
                        eval.charging_stops += 1;
                        eval.energy_charged += bought;
                        eval.charging_cost += bought * station.price_per_kwh;
                        eval.queue_time += station.queue_time;
                        charge = vehicle.battery_capacity();
                    }
                    None => {
                        eval.violations.push(Violation::new(
                            route_index,
                            ViolationType::BatteryDepleted {
                                from: from.to_string(),
                                to: to.to_string(),
                                charge,
                            },
                        ));
                        charge = 0.0;
                    }
                }
            }
        }
    }
}

impl ObjectiveFunction for EnergyCostObjective {
    fn score(
        &self,
        routes: &[Route],
        vehicle: &Vehicle,
        stations: &StationRegistry,
        network: &dyn RoadNetwork,
        penalty: f64,
    ) -> (RouteEvaluation, f64) {
        let mut eval = RouteEvaluation::default();
        for (idx, route) in routes.iter().enumerate() {
            self.replay(idx, route, vehicle, stations, network, &mut eval);
        }

        let score = eval.weighted_distance
            + eval.charging_cost
            + eval.queue_time
            + penalty * eval.violations.len() as f64;
        (eval, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChargingStation, Graph};

    fn line() -> Graph {
        let mut g = Graph::new();
        g.add_edge("A", "B", 10.0, 1.0).expect("valid edge");
        g.add_edge("B", "C", 20.0, 2.0).expect("valid edge");
        g
    }

    #[test]
    fn test_single_node_route_is_free() {
        let g = line();
        let (eval, score) = EnergyCostObjective.score(
            &[Route::new("A")],
            &Vehicle::new(100.0, 1.0),
            &StationRegistry::new(),
            &g,
            1000.0,
        );
        assert!(eval.is_feasible());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_weighted_distance() {
        let g = line();
        let (eval, score) = EnergyCostObjective.score(
            &[Route::from_nodes(["A", "B", "C"])],
            &Vehicle::new(100.0, 1.0),
            &StationRegistry::new(),
            &g,
            1000.0,
        );
        assert!(eval.is_feasible());
        assert!((eval.total_distance - 30.0).abs() < 1e-10);
        assert!((eval.energy_used - 30.0).abs() < 1e-10);
        // 10*1 + 20*2
        assert!((score - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_edge_penalized() {
        let g = line();
        let (eval, score) = EnergyCostObjective.score(
            &[Route::from_nodes(["C", "B"])],
            &Vehicle::new(100.0, 1.0),
            &StationRegistry::new(),
            &g,
            500.0,
        );
        assert_eq!(eval.violations.len(), 1);
        assert!(matches!(
            eval.violations[0].kind,
            ViolationType::MissingEdge { .. }
        ));
        assert!((score - 500.0).abs() < 1e-10);
    }

    #[test]
    fn test_battery_depleted_without_station() {
        let g = line();
        let vehicle = Vehicle::new(15.0, 1.0);
        let (eval, score) = EnergyCostObjective.score(
            &[Route::from_nodes(["A", "B", "C"])],
            &vehicle,
            &StationRegistry::new(),
            &g,
            1000.0,
        );
        // A->B leaves 5, B->C needs 20 and B has no station
        assert_eq!(eval.violations.len(), 1);
        assert!(matches!(
            &eval.violations[0].kind,
            ViolationType::BatteryDepleted { from, .. } if from == "B"
        ));
        assert!((score - 1050.0).abs() < 1e-10);
    }

    #[test]
    fn test_recharge_at_departure_node() {
        let g = line();
        let vehicle = Vehicle::new(15.0, 1.0);
        let stations: StationRegistry = [ChargingStation::new("B", 0.5, 0.25, 50.0)]
            .into_iter()
            .collect();
        let (eval, score) = EnergyCostObjective.score(
            &[Route::from_nodes(["A", "B", "C"])],
            &vehicle,
            &stations,
            &g,
            1000.0,
        );
        assert!(eval.is_feasible());
        assert_eq!(eval.charging_stops, 1);
        // 5 left on departure from B -> buy 10
        assert!((eval.energy_charged - 10.0).abs() < 1e-10);
        assert!((eval.charging_cost - 5.0).abs() < 1e-10);
        assert!((score - (50.0 + 5.0 + 0.25)).abs() < 1e-10);
    }

    #[test]
    fn test_station_at_arrival_does_not_help() {
        let g = line();
        let vehicle = Vehicle::new(15.0, 1.0);
        let stations: StationRegistry = [ChargingStation::new("C", 0.5, 0.25, 50.0)]
            .into_iter()
            .collect();
        let (eval, _) = EnergyCostObjective.score(
            &[Route::from_nodes(["A", "B", "C"])],
            &vehicle,
            &stations,
            &g,
            1000.0,
        );
        assert!(!eval.is_feasible());
    }

    #[test]
    fn test_repeated_node_flagged() {
        let mut g = line();
        g.add_edge("B", "A", 10.0, 1.0).expect("valid edge");
        let (eval, _) = EnergyCostObjective.score(
            &[Route::from_nodes(["A", "B", "A"])],
            &Vehicle::new(100.0, 1.0),
            &StationRegistry::new(),
            &g,
            1.0,
        );
        assert_eq!(
            eval.violations,
            vec![Violation::new(
                0,
                ViolationType::RepeatedNode {
                    node: "A".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_multiple_routes_indexed() {
        let g = line();
        let (eval, _) = EnergyCostObjective.score(
            &[Route::from_nodes(["A", "B"]), Route::from_nodes(["C", "A"])],
            &Vehicle::new(100.0, 1.0),
            &StationRegistry::new(),
            &g,
            1.0,
        );
        assert_eq!(eval.violations.len(), 1);
        assert_eq!(eval.violations[0].route_index, 1);
    }

    #[test]
    fn test_score_is_deterministic() {
        let g = line();
        let routes = [Route::from_nodes(["A", "B", "C"])];
        let vehicle = Vehicle::new(100.0, 0.3);
        let stations = StationRegistry::new();
        let a = EnergyCostObjective.score(&routes, &vehicle, &stations, &g, 10.0);
        let b = EnergyCostObjective.score(&routes, &vehicle, &stations, &g, 10.0);
        assert_eq!(a, b);
    }
}
