//! Error types for the energy balance simulator and area solver.

use thiserror::Error;

use crate::devices::HardwareError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("load profile has no samples")]
    EmptyProfile,

    #[error("step length must be positive and finite, got {0} h")]
    InvalidStep(f64),

    #[error("load sample {index} is not finite: {value} W")]
    NonFiniteLoad { index: usize, value: f64 },

    #[error("undefined ratio: {0} is zero")]
    UndefinedRatio(&'static str),

    #[error("invalid battery limits: min {min} Wh must be below max {max} Wh")]
    InvalidLimits { min: f64, max: f64 },

    #[error("hardware failure at step {step}: {source}")]
    Hardware {
        step: usize,
        #[source]
        source: HardwareError,
    },

    /// Building the hardware for a candidate area failed.
    #[error("cannot build hardware for area {area_m2} m²: {source}")]
    Build {
        area_m2: f64,
        #[source]
        source: HardwareError,
    },

    #[error(
        "solver did not converge after {iterations} iterations: \
         last x = {last}, residual {residual:e} > tolerance {tolerance:e}"
    )]
    NotConverged {
        iterations: usize,
        last: f64,
        residual: f64,
        tolerance: f64,
    },

    #[error("solver stalled at iteration {iteration}: flat secant at x = {x}")]
    Stalled { iteration: usize, x: f64 },

    #[error("solver produced a non-finite value at x = {x}")]
    NonFinite { x: f64 },
}
