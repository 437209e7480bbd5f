//! Off-grid solar/battery sizing simulator.

pub mod cli;
pub mod config;
pub mod devices;
pub mod io;
pub mod reporting;
pub mod runner;
/// Energy-balance engine, area solver, and cost model.
pub mod sim;
pub mod telemetry;
