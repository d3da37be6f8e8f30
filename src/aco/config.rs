//! ACO configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the Ant Colony Optimization engine.
///
/// # Defaults
///
/// ```
/// use u_ev_routing::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.num_ants, 10);
/// assert_eq!(config.num_iterations, 50);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_ev_routing::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_num_ants(5)
///     .with_num_iterations(10)
///     .with_alpha(1.0)
///     .with_beta(2.0)
///     .with_evaporation_rate(0.1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoConfig {
    /// Route constructions per iteration.
    pub num_ants: usize,

    /// Number of build/evaporate/reinforce rounds.
    pub num_iterations: usize,

    /// Fraction of pheromone removed each iteration, in `[0, 1)`.
    pub evaporation_rate: f64,

    /// Exponent on the pheromone level in the selection rule.
    pub alpha: f64,

    /// Exponent on the `1 / (distance * difficulty)` heuristic.
    pub beta: f64,

    /// Infeasibility weight handed to the objective function.
    pub penalty: f64,

    /// Pheromone level every edge starts with.
    pub initial_pheromone: f64,

    /// Maximum hops per ant. 0 = number of nodes in the graph.
    pub max_steps: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed on every run.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            num_ants: 10,
            num_iterations: 50,
            evaporation_rate: 0.1,
            alpha: 1.0,
            beta: 2.0,
            penalty: 1000.0,
            initial_pheromone: 1.0,
            max_steps: 0,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_num_ants(mut self, n: usize) -> Self {
        self.num_ants = n;
        self
    }

    pub fn with_num_iterations(mut self, n: usize) -> Self {
        self.num_iterations = n;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_initial_pheromone(mut self, level: f64) -> Self {
        self.initial_pheromone = level;
        self
    }

    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_ants == 0 {
            return Err("num_ants must be at least 1".into());
        }
        if self.num_iterations == 0 {
            return Err("num_iterations must be at least 1".into());
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(format!(
                "evaporation_rate must be in [0, 1), got {}",
                self.evaporation_rate
            ));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(format!("alpha must be non-negative, got {}", self.alpha));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(format!("beta must be non-negative, got {}", self.beta));
        }
        if !self.penalty.is_finite() || self.penalty <= 0.0 {
            return Err(format!("penalty must be positive, got {}", self.penalty));
        }
        if !self.initial_pheromone.is_finite() || self.initial_pheromone <= 0.0 {
            return Err(format!(
                "initial_pheromone must be positive, got {}",
                self.initial_pheromone
            ));
        }
        Ok(())
    }
}
