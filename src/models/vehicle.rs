//! Electric vehicle with battery and consumption parameters.

use serde::{Deserialize, Serialize};

/// An electric vehicle travelling the road graph.
///
/// The vehicle record is read-only during optimization; each route
/// construction tracks its own charge starting from [`initial_charge`].
///
/// [`initial_charge`]: Vehicle::initial_charge
///
/// # Examples
///
/// ```
/// use u_ev_routing::models::Vehicle;
///
/// let v = Vehicle::new(60.0, 0.2).with_initial_charge(30.0);
/// assert_eq!(v.battery_capacity(), 60.0);
/// assert_eq!(v.initial_charge(), 30.0);
/// assert!((v.energy_for(50.0) - 10.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    battery_capacity: f64,
    energy_per_km: f64,
    initial_charge: f64,
}

impl Vehicle {
    /// Creates a vehicle with the given battery capacity (kWh) and
    /// consumption rate (kWh per km).
    ///
    /// Default: starts fully charged.
    pub fn new(battery_capacity: f64, energy_per_km: f64) -> Self {
        Self {
            battery_capacity,
            energy_per_km,
            initial_charge: battery_capacity,
        }
    }

    /// Sets the charge held when a route starts.
    pub fn with_initial_charge(mut self, charge: f64) -> Self {
        self.initial_charge = charge;
        self
    }

    /// Maximum charge; a recharge always fills up to this.
    pub fn battery_capacity(&self) -> f64 {
        self.battery_capacity
    }

    /// Energy consumed per kilometre travelled.
    pub fn energy_per_km(&self) -> f64 {
        self.energy_per_km
    }

    /// Charge at the start of every route.
    pub fn initial_charge(&self) -> f64 {
        self.initial_charge
    }

    /// Energy needed to travel `distance`.
    pub fn energy_for(&self, distance: f64) -> f64 {
        distance * self.energy_per_km
    }

    /// Validates the vehicle parameters.
    pub fn validate(&self) -> Result<(), String> {
        if !self.battery_capacity.is_finite() || self.battery_capacity <= 0.0 {
            return Err(format!(
                "battery_capacity must be positive, got {}",
                self.battery_capacity
            ));
        }
        if !self.energy_per_km.is_finite() || self.energy_per_km < 0.0 {
            return Err(format!(
                "energy_per_km must be non-negative, got {}",
                self.energy_per_km
            ));
        }
        if !self.initial_charge.is_finite()
            || self.initial_charge < 0.0
            || self.initial_charge > self.battery_capacity
        {
            return Err(format!(
                "initial_charge must be in [0, {}], got {}",
                self.battery_capacity, self.initial_charge
            ));
        }
        Ok(())
    }
}
