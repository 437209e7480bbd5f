/// Battery cost, replacement cashflow and NPV.
pub mod cost;
pub mod engine;
pub mod error;
/// Secant root finder and panel-area sizing.
pub mod solver;
pub mod types;

pub use engine::{Engine, simulate, simulate_with_limits};
pub use error::SimError;
pub use solver::{Root, SolverOptions, find_root, solve_generation_area};
pub use types::{EnergyLimits, LegpOutcome, LoadProfile, SimulationResult, StepRecord, TimeSample};
