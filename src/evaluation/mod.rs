//! Route scoring.
//!
//! - [`ObjectiveFunction`] — Trait the optimizer uses to score completed routes
//! - [`EnergyCostObjective`] — Default scorer: travel effort, charging cost,
//!   queue time and infeasibility penalties

mod objective;

pub use objective::{
    EnergyCostObjective, ObjectiveFunction, RouteEvaluation, Violation, ViolationType,
};
