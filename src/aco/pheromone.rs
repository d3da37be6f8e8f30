//! Per-edge pheromone store.

use std::collections::BTreeMap;

use crate::models::{NodeId, RoadNetwork, Route};

/// Learned desirability of each directed edge.
///
/// One entry per directed edge of the network, created up front. Every
/// stored level is finite and positive: constructors and [`set`] reject
/// anything else, [`evaporate`] floors at `f64::MIN_POSITIVE` and
/// [`reinforce`] only deposits finite positive amounts.
///
/// [`set`]: PheromoneMatrix::set
/// [`evaporate`]: PheromoneMatrix::evaporate
/// [`reinforce`]: PheromoneMatrix::reinforce
///
/// # Examples
///
/// ```
/// use u_ev_routing::aco::PheromoneMatrix;
/// use u_ev_routing::models::{Graph, Route};
///
/// let mut g = Graph::new();
/// g.add_bidirectional_edge("A", "B", 1.0, 1.0).unwrap();
///
/// let mut tau = PheromoneMatrix::initialize(&g, 1.0).unwrap();
/// tau.evaporate(0.5);
/// tau.reinforce(&Route::from_nodes(["A", "B"]), 0.25);
/// assert!((tau.level("A", "B") - 0.75).abs() < 1e-12);
/// assert!((tau.level("B", "A") - 0.5).abs() < 1e-12);
///
/// assert!(PheromoneMatrix::initialize(&g, 0.0).is_err());
/// assert!(tau.set("A", "B", f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    levels: BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
    default_level: f64,
}

impl PheromoneMatrix {
    /// Creates an empty matrix; every lookup returns `default_level`.
    ///
    /// Fails unless `default_level` is finite and positive.
    pub fn new(default_level: f64) -> Result<Self, String> {
        check_level(default_level)?;
        Ok(Self {
            levels: BTreeMap::new(),
            default_level,
        })
    }

    /// Creates one entry at `default_level` for every directed edge in `network`.
    ///
    /// Fails unless `default_level` is finite and positive.
    pub fn initialize<N: RoadNetwork + ?Sized>(
        network: &N,
        default_level: f64,
    ) -> Result<Self, String> {
        let mut matrix = Self::new(default_level)?;
        for from in network.nodes() {
            let row = matrix.levels.entry(from.clone()).or_default();
            for (to, _) in network.edges_from(from) {
                row.insert(to.clone(), default_level);
            }
        }
        Ok(matrix)
    }

    /// Level on `from -> to`, or the default level if the edge has no entry.
    pub fn level(&self, from: &str, to: &str) -> f64 {
        self.levels
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(self.default_level)
    }

    /// Returns `true` if `from -> to` has a stored entry.
    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.levels
            .get(from)
            .is_some_and(|row| row.contains_key(to))
    }

    /// Stores an explicit level for `from -> to`, creating the entry.
    ///
    /// Fails, leaving the matrix untouched, unless `level` is finite and positive.
    pub fn set(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        level: f64,
    ) -> Result<(), String> {
        check_level(level)?;
        self.levels
            .entry(from.into())
            .or_default()
            .insert(to.into(), level);
        Ok(())
    }

    /// Fallback returned for edges without an entry.
    pub fn default_level(&self) -> f64 {
        self.default_level
    }

    /// Number of stored edge entries.
    pub fn len(&self) -> usize {
        self.levels.values().map(|row| row.len()).sum()
    }

    /// Returns `true` if no edge entry is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Multiplies every stored level by `1 - rate`, with `rate` in `[0, 1)`.
    ///
    /// Results are clamped to `[f64::MIN_POSITIVE, f64::MAX]`, so levels stay
    /// positive and finite even for an out-of-range rate.
    pub fn evaporate(&mut self, rate: f64) {
        debug_assert!(
            (0.0..1.0).contains(&rate),
            "evaporation rate must be in [0, 1), got {rate}"
        );
        let keep = 1.0 - rate;
        for level in self.levels.values_mut().flat_map(|row| row.values_mut()) {
            // f64::max drops a NaN operand
            *level = (*level * keep).max(f64::MIN_POSITIVE).min(f64::MAX);
        }
    }

    /// Adds `amount` to every edge along `route` that has a stored entry.
    ///
    /// Pairs without an entry are skipped, not created. Amounts that are not
    /// finite and positive deposit nothing.
    pub fn reinforce(&mut self, route: &Route, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        for (from, to) in route.legs() {
            if let Some(level) = self.levels.get_mut(from).and_then(|row| row.get_mut(to)) {
                *level = (*level + amount).min(f64::MAX);
            }
        }
    }
}

fn check_level(level: f64) -> Result<(), String> {
    if !level.is_finite() || level <= 0.0 {
        return Err(format!(
            "pheromone level must be finite and positive, got {level}"
        ));
    }
    Ok(())
}
