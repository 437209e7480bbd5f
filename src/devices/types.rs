//! Common types and traits for the hardware collaborators of the simulator.

use chrono::NaiveDateTime;
use rand::{Rng, rngs::StdRng};
use thiserror::Error;

/// Failure raised by a hardware curve or by hardware construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HardwareError {
    #[error("inverter overload: {load_w:.1} W requested, rated for {rated_w:.1} W")]
    InverterOverload { load_w: f64, rated_w: f64 },

    #[error("battery efficiency {value} at {power_w:.1} W is outside (0, 1]")]
    InvalidEfficiency { value: f64, power_w: f64 },

    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    #[error("curve queried at non-finite input {0}")]
    NonFiniteInput(f64),

    #[error("invalid battery: {0}")]
    InvalidBattery(String),

    #[error("invalid panel: {0}")]
    InvalidPanel(String),
}

/// Capability interface queried by the energy balance simulator.
///
/// Implementations must be pure: the same query always yields the same answer,
/// so a model can be rebuilt and re-evaluated freely by the area solver.
pub trait HardwareModel {
    /// DC power the inverter draws to deliver `customer_load_w` of AC load.
    fn inverter_input_power(&self, customer_load_w: f64) -> Result<f64, HardwareError>;

    /// DC power produced by the panel array at `timestamp`.
    fn panel_power(&self, timestamp: NaiveDateTime) -> Result<f64, HardwareError>;

    /// Battery efficiency when discharging at `discharge_w`, in (0, 1].
    ///
    /// The simulator never calls this with a zero discharge.
    fn battery_efficiency(&self, discharge_w: f64) -> Result<f64, HardwareError>;
}

/// Checks that an efficiency value lies in (0, 1].
pub fn check_efficiency(value: f64, power_w: f64) -> Result<f64, HardwareError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(HardwareError::InvalidEfficiency { value, power_w })
    }
}

/// Gaussian noise via the Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Half-sine daylight fraction for a fractional hour of the day.
///
/// Returns 0 outside `[sunrise_hour, sunset_hour)` and peaks at 1 halfway between.
pub fn daylight_frac(hour: f64, sunrise_hour: f64, sunset_hour: f64) -> f64 {
    if hour < sunrise_hour || hour >= sunset_hour {
        return 0.0;
    }
    let phase = (hour - sunrise_hour) / (sunset_hour - sunrise_hour);
    (std::f64::consts::PI * phase).sin().max(0.0)
}
