//! ACO iteration loop.
//!
//! [`ColonyOptimizer`] orchestrates the colony:
//! build ants → score successes → evaporate → reinforce → track best → repeat.

use std::slice;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::builder::{ConstructionFailure, RouteBuilder};
use super::config::AcoConfig;
use super::pheromone::PheromoneMatrix;
use super::sampler::{NeighborSampler, SamplingContext};
use crate::evaluation::{ObjectiveFunction, RouteEvaluation};
use crate::models::{RoadNetwork, Route, StationRegistry, Vehicle};

/// Progress sink receiving one human-readable line per iteration.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Result of an ACO run.
///
/// When no ant ever reached the goal, `best_route` is `None` and
/// `best_score` is `f64::INFINITY`.
#[derive(Debug, Clone)]
pub struct AcoResult {
    /// Best route found across all iterations.
    pub best_route: Option<Route>,

    /// Objective score of `best_route`. Lower is better.
    pub best_score: f64,

    /// Objective breakdown of `best_route`.
    pub best_evaluation: Option<RouteEvaluation>,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Ants that reached the goal.
    pub successful_ants: usize,

    /// Ants that did not reach the goal, for any reason.
    pub failed_ants: usize,

    /// Failures with no unvisited neighbor left.
    pub dead_ends: usize,

    /// Failures from running dry without a station at the departure node.
    pub battery_failures: usize,

    /// Failures from exhausting the hop budget.
    pub step_limit_hits: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best score after each iteration.
    pub score_history: Vec<f64>,
}

impl AcoResult {
    /// Returns `true` if at least one ant reached the goal.
    pub fn found_route(&self) -> bool {
        self.best_route.is_some()
    }
}

/// Ant Colony Optimization over a road network for one electric vehicle.
///
/// Owns the [`PheromoneMatrix`] for its whole lifetime: levels learned in
/// one [`optimize`](Self::optimize) call carry over to the next, while best
/// tracking restarts on every call.
///
/// # Examples
///
/// ```
/// use u_ev_routing::aco::{AcoConfig, ColonyOptimizer};
/// use u_ev_routing::evaluation::EnergyCostObjective;
/// use u_ev_routing::models::{Graph, StationRegistry, Vehicle};
///
/// let mut g = Graph::new();
/// g.add_bidirectional_edge("A", "B", 10.0, 1.0).unwrap();
/// g.add_bidirectional_edge("B", "C", 10.0, 1.0).unwrap();
/// g.add_bidirectional_edge("A", "C", 30.0, 1.0).unwrap();
///
/// let vehicle = Vehicle::new(100.0, 1.0);
/// let stations = StationRegistry::new();
/// let config = AcoConfig::default().with_num_ants(5).with_num_iterations(20).with_seed(42);
///
/// let mut aco = ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config).unwrap();
/// let result = aco.optimize("A", "C");
/// assert_eq!(result.best_route.unwrap().nodes(), ["A", "B", "C"]);
/// assert!((result.best_score - 20.0).abs() < 1e-10);
/// ```
pub struct ColonyOptimizer<'a, N: RoadNetwork, O: ObjectiveFunction> {
    network: &'a N,
    vehicle: &'a Vehicle,
    stations: &'a StationRegistry,
    objective: O,
    config: AcoConfig,
    pheromones: PheromoneMatrix,
    logger: Option<InfoLogger>,
}

impl<'a, N: RoadNetwork, O: ObjectiveFunction> ColonyOptimizer<'a, N, O> {
    /// Creates an optimizer with a fresh pheromone matrix.
    ///
    /// Fails if the configuration or the vehicle is invalid.
    pub fn new(
        network: &'a N,
        vehicle: &'a Vehicle,
        stations: &'a StationRegistry,
        objective: O,
        config: AcoConfig,
    ) -> Result<Self, String> {
        config
            .validate()
            .map_err(|e| format!("invalid AcoConfig: {e}"))?;
        vehicle
            .validate()
            .map_err(|e| format!("invalid Vehicle: {e}"))?;

        let pheromones = PheromoneMatrix::initialize(network, config.initial_pheromone)?;
        Ok(Self {
            network,
            vehicle,
            stations,
            objective,
            config,
            pheromones,
            logger: None,
        })
    }

    /// Sets a progress logger.
    pub fn with_logger(mut self, logger: InfoLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Current pheromone levels.
    pub fn pheromones(&self) -> &PheromoneMatrix {
        &self.pheromones
    }

    /// Runs the colony from `start` to `goal`.
    pub fn optimize(&mut self, start: &str, goal: &str) -> AcoResult {
        self.optimize_with_cancel(start, goal, None)
    }

    /// Runs the colony with an optional cancellation token.
    ///
    /// The flag is checked before each iteration; the best solution found
    /// so far is returned.
    pub fn optimize_with_cancel(
        &mut self,
        start: &str,
        goal: &str,
        cancel: Option<Arc<AtomicBool>>,
    ) -> AcoResult {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let sampler = NeighborSampler::new(self.config.alpha, self.config.beta);
        let builder =
            RouteBuilder::new(sampler, self.stations).with_max_steps(self.config.max_steps);

        let mut result = AcoResult {
            best_route: None,
            best_score: f64::INFINITY,
            best_evaluation: None,
            iterations: 0,
            successful_ants: 0,
            failed_ants: 0,
            dead_ends: 0,
            battery_failures: 0,
            step_limit_hits: 0,
            cancelled: false,
            score_history: Vec::with_capacity(self.config.num_iterations),
        };

        for iteration in 0..self.config.num_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    result.cancelled = true;
                    break;
                }
            }

            // Ants only read the pheromones; updates wait until all have finished.
            let ctx = SamplingContext {
                network: self.network,
                vehicle: self.vehicle,
                pheromones: &self.pheromones,
            };
            let mut scored: Vec<(Route, RouteEvaluation, f64)> =
                Vec::with_capacity(self.config.num_ants);
            for _ in 0..self.config.num_ants {
                match builder.build(ctx, start, goal, &mut rng) {
                    Ok(route) => {
                        let (evaluation, score) = self.objective.score(
                            slice::from_ref(&route),
                            self.vehicle,
                            self.stations,
                            self.network,
                            self.config.penalty,
                        );
                        result.successful_ants += 1;
                        scored.push((route, evaluation, score));
                    }
                    Err(failure) => {
                        result.failed_ants += 1;
                        match failure {
                            ConstructionFailure::DeadEnd { .. } => result.dead_ends += 1,
                            ConstructionFailure::BatteryExhausted { .. } => {
                                result.battery_failures += 1
                            }
                            ConstructionFailure::StepLimit { .. } => result.step_limit_hits += 1,
                        }
                    }
                }
            }

            self.pheromones.evaporate(self.config.evaporation_rate);
            // Zero, negative and non-finite scores deposit nothing.
            for (route, _, score) in &scored {
                self.pheromones.reinforce(route, 1.0 / score);
            }

            for (route, evaluation, score) in scored {
                if score < result.best_score {
                    result.best_score = score;
                    result.best_route = Some(route);
                    result.best_evaluation = Some(evaluation);
                }
            }

            result.iterations = iteration + 1;
            result.score_history.push(result.best_score);

            if let Some(ref logger) = self.logger {
                (logger)(
                    format!(
                        "iteration {}/{}: best score = {:.2}",
                        iteration + 1,
                        self.config.num_iterations,
                        result.best_score
                    )
                    .as_str(),
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EnergyCostObjective;
    use crate::models::{ChargingStation, Graph};
    use std::sync::Mutex;

    /// Two routes from S to T: a short one via A and a long one via B.
    fn fork() -> Graph {
        let mut g = Graph::new();
        g.add_edge("S", "A", 5.0, 1.0).expect("valid edge");
        g.add_edge("A", "T", 5.0, 1.0).expect("valid edge");
        g.add_edge("S", "B", 20.0, 1.0).expect("valid edge");
        g.add_edge("B", "T", 20.0, 1.0).expect("valid edge");
        g
    }

    fn config() -> AcoConfig {
        AcoConfig::default()
            .with_num_ants(8)
            .with_num_iterations(15)
            .with_alpha(1.0)
            .with_beta(1.0)
            .with_evaporation_rate(0.2)
            .with_seed(7)
    }

    /// Scores a route by its number of legs and records the penalty it got.
    struct HopCount {
        penalties: Mutex<Vec<f64>>,
    }

    impl ObjectiveFunction for HopCount {
        fn score(
            &self,
            routes: &[Route],
            _vehicle: &Vehicle,
            _stations: &StationRegistry,
            _network: &dyn RoadNetwork,
            penalty: f64,
        ) -> (RouteEvaluation, f64) {
            self.penalties.lock().expect("not poisoned").push(penalty);
            let hops: usize = routes.iter().map(|r| r.num_legs()).sum();
            (RouteEvaluation::default(), hops as f64)
        }
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let err = ColonyOptimizer::new(
            &g,
            &vehicle,
            &stations,
            EnergyCostObjective,
            config().with_evaporation_rate(-0.5),
        )
        .err()
        .expect("negative evaporation must be rejected");
        assert!(err.contains("evaporation_rate"), "{err}");
    }

    #[test]
    fn test_new_rejects_bad_vehicle() {
        let g = fork();
        let vehicle = Vehicle::new(-1.0, 1.0);
        let stations = StationRegistry::new();
        assert!(
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config()).is_err()
        );
    }

    #[test]
    fn test_finds_short_branch() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco =
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config())
                .expect("valid config");
        let result = aco.optimize("S", "T");

        assert!(result.found_route());
        assert_eq!(
            result.best_route.as_ref().map(|r| r.nodes().to_vec()),
            Some(vec!["S".to_string(), "A".to_string(), "T".to_string()])
        );
        assert!((result.best_score - 10.0).abs() < 1e-10);
        assert_eq!(result.iterations, 15);
        assert_eq!(result.successful_ants, 8 * 15);
        // Both branches of the fork lead to T.
        assert_eq!(result.failed_ants, 0);
        assert!(result
            .best_evaluation
            .as_ref()
            .is_some_and(|e| e.is_feasible()));
    }

    #[test]
    fn test_pheromone_concentrates_on_better_branch() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco =
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config())
                .expect("valid config");
        aco.optimize("S", "T");

        let tau = aco.pheromones();
        assert!(tau.level("S", "A") > tau.level("S", "B"));
        assert!(tau.level("A", "T") > tau.level("B", "T"));
    }

    #[test]
    fn test_score_history_non_increasing() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco = ColonyOptimizer::new(
            &g,
            &vehicle,
            &stations,
            EnergyCostObjective,
            config().with_num_ants(1).with_num_iterations(30),
        )
        .expect("valid config");
        let result = aco.optimize("S", "T");

        assert_eq!(result.score_history.len(), 30);
        for window in result.score_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best score history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(result.score_history.last().copied(), Some(result.best_score));
    }

    #[test]
    fn test_same_seed_same_result() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let run = || {
            let mut aco = ColonyOptimizer::new(
                &g,
                &vehicle,
                &stations,
                EnergyCostObjective,
                config().with_num_ants(2).with_num_iterations(5),
            )
            .expect("valid config");
            let result = aco.optimize("S", "T");
            (result.score_history, aco.pheromones().clone())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_no_route_returns_sentinel() {
        let mut g = fork();
        g.add_node("Z");
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco =
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config())
                .expect("valid config");
        let result = aco.optimize("S", "Z");

        assert!(result.best_route.is_none());
        assert!(result.best_evaluation.is_none());
        assert_eq!(result.best_score, f64::INFINITY);
        assert_eq!(result.dead_ends, 8 * 15);
        assert!(result.score_history.iter().all(|s| s.is_infinite()));
    }

    #[test]
    fn test_failed_iterations_only_evaporate() {
        let mut g = fork();
        g.add_node("Z");
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco = ColonyOptimizer::new(
            &g,
            &vehicle,
            &stations,
            EnergyCostObjective,
            config().with_num_iterations(3).with_evaporation_rate(0.5),
        )
        .expect("valid config");
        aco.optimize("S", "Z");
        assert!((aco.pheromones().level("S", "A") - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_penalty_passed_to_objective() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let objective = HopCount {
            penalties: Mutex::new(Vec::new()),
        };
        let mut aco = ColonyOptimizer::new(
            &g,
            &vehicle,
            &stations,
            objective,
            config().with_penalty(123.0).with_num_iterations(2),
        )
        .expect("valid config");
        let result = aco.optimize("S", "T");

        // Both branches have two hops
        assert_eq!(result.best_score, 2.0);
        let penalties = aco.objective.penalties.lock().expect("not poisoned");
        assert_eq!(penalties.len(), 16);
        assert!(penalties.iter().all(|&p| p == 123.0));
    }

    #[test]
    fn test_zero_score_does_not_reinforce() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco = ColonyOptimizer::new(
            &g,
            &vehicle,
            &stations,
            EnergyCostObjective,
            config().with_num_iterations(1).with_evaporation_rate(0.5),
        )
        .expect("valid config");
        // start == goal: single-node route with score 0
        let result = aco.optimize("S", "S");
        assert_eq!(result.best_score, 0.0);
        assert_eq!(result.best_route.map(|r| r.len()), Some(1));
        assert!((aco.pheromones().level("S", "A") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_battery_failures_counted() {
        let g = fork();
        // S->A costs 5, A->T another 5: only 6 in the battery and no stations
        let vehicle = Vehicle::new(6.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco =
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config())
                .expect("valid config");
        let result = aco.optimize("S", "T");
        assert!(!result.found_route());
        assert_eq!(result.battery_failures, 8 * 15);
    }

    #[test]
    fn test_station_enables_route() {
        let g = fork();
        let vehicle = Vehicle::new(6.0, 1.0);
        let stations: StationRegistry = [ChargingStation::new("A", 0.5, 0.1, 50.0)]
            .into_iter()
            .collect();
        let mut aco =
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config())
                .expect("valid config");
        let result = aco.optimize("S", "T");
        let best = result.best_route.expect("recharging at A makes S-A-T feasible");
        assert_eq!(best.nodes(), ["S", "A", "T"]);
        let detail = result.best_evaluation.expect("evaluated");
        assert_eq!(detail.charging_stops, 1);
    }

    #[test]
    fn test_cancellation() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco =
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config())
                .expect("valid config");
        let cancel = Arc::new(AtomicBool::new(true));
        let result = aco.optimize_with_cancel("S", "T", Some(cancel));
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.best_route.is_none());
    }

    #[test]
    fn test_logger_receives_one_line_per_iteration() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        let logger: InfoLogger = Arc::new(move |msg: &str| {
            sink.lock().expect("not poisoned").push(msg.to_string());
        });

        let mut aco = ColonyOptimizer::new(
            &g,
            &vehicle,
            &stations,
            EnergyCostObjective,
            config().with_num_iterations(4),
        )
        .expect("valid config")
        .with_logger(logger);
        aco.optimize("S", "T");

        let lines = lines.lock().expect("not poisoned");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "iteration 1/4: best score = 10.00");
        assert!(lines[3].starts_with("iteration 4/4"));
    }

    #[test]
    fn test_pheromones_persist_between_runs() {
        let g = fork();
        let vehicle = Vehicle::new(100.0, 1.0);
        let stations = StationRegistry::new();
        let mut aco =
            ColonyOptimizer::new(&g, &vehicle, &stations, EnergyCostObjective, config())
                .expect("valid config");
        aco.optimize("S", "T");
        let after_first = aco.pheromones().level("S", "A");
        let second = aco.optimize("S", "T");
        assert!(second.found_route());
        assert_ne!(aco.pheromones().level("S", "A"), after_first);
        assert_eq!(aco.config().num_ants, 8);
    }
}
