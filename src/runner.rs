//! Scenario orchestration: build hardware, size the array, cost the system.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::{BatteryConfig, PanelConfig, ScenarioConfig};
use crate::devices::{
    Battery, BatteryKind, HardwareError, Inverter, InverterKind, Irradiance, LoadShape,
    Panel, SystemModel,
};
use crate::reporting::SizingReport;
use crate::sim::cost::{self, CostError};
use crate::sim::{
    EnergyLimits, LoadProfile, SimError, SimulationResult, simulate, simulate_with_limits,
    solve_generation_area,
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid scenario: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<crate::config::ConfigError>),

    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Cost(#[from] CostError),
}

/// A completed sizing run: the headline numbers plus the hourly trace of the
/// sized system.
#[derive(Debug, Clone)]
pub struct SizingRun {
    pub report: SizingReport,
    pub trace: SimulationResult,
}

/// Builds the normalised customer load for a scenario.
///
/// # Errors
///
/// Fails on an empty profile or an all-zero shape.
pub fn build_load(config: &ScenarioConfig) -> Result<LoadProfile, SimError> {
    let s = &config.simulation;
    config
        .load
        .shape
        .profile(s.start, s.step_hours, s.steps)?
        .normalized(config.load.daily_energy_wh)
}

/// Builds the battery, filling unset parameters from the chemistry preset.
///
/// # Errors
///
/// Fails fast on an invalid DOD, life, cost, or efficiency curve.
pub fn build_battery(config: &BatteryConfig) -> Result<Battery, HardwareError> {
    Battery::new(
        config.kind.label(),
        config.curve()?,
        config.dod(),
        config.life_years(),
        config.cost_per_wh(),
    )
}

fn build_irradiance(config: &PanelConfig) -> Result<Irradiance, HardwareError> {
    Irradiance::new(
        config.peak_irradiance_w_m2,
        config.sunrise_hour,
        config.sunset_hour,
        config.cloud_noise_std,
        config.seed,
    )
}

/// LEGP of the sized battery: nominal capacity `excursion / dod`, usable window
/// `[nominal * (1 - dod), nominal]`, starting full.
///
/// Returns `None` when the excursion is zero and no battery is needed.
fn sized_legp(
    system: &SystemModel,
    load: &LoadProfile,
    excursion_wh: f64,
) -> Result<Option<f64>, SimError> {
    if excursion_wh <= 0.0 {
        return Ok(None);
    }
    let nominal_wh = system.battery.nominal_capacity_wh(excursion_wh);
    let limits = EnergyLimits::new(nominal_wh * (1.0 - system.battery.dod), nominal_wh)?;
    Ok(Some(simulate_with_limits(system, load, limits)?.legp))
}

/// Sizes and costs one scenario.
///
/// # Errors
///
/// Returns [`RunError::Invalid`] for a config that fails validation, and
/// propagates hardware, simulation, solver, and cost failures.
#[instrument(skip_all, fields(scenario = %config.label()))]
pub fn run_scenario(config: &ScenarioConfig) -> Result<SizingRun, RunError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(RunError::Invalid(errors));
    }

    let load = build_load(config)?;
    let inverter = Inverter::new(config.inverter.kind)?;
    let battery = build_battery(&config.battery)?;
    let irradiance = build_irradiance(&config.panel)?;
    let panel_efficiency = config.panel.efficiency;

    let factory = |area_m2: f64| -> Result<SystemModel, HardwareError> {
        Ok(SystemModel::new(
            inverter.clone(),
            battery.clone(),
            Panel::new(area_m2, panel_efficiency, irradiance.clone())?,
        ))
    };

    let root = solve_generation_area(
        &factory,
        &load,
        config.solver.initial_area_m2,
        &config.solver.options(),
    )?;
    if root.x <= 0.0 {
        warn!(area_m2 = root.x, "solver converged to a non-positive panel area");
    }

    let system = factory(root.x)?;
    let trace = simulate(&system, &load)?;
    let excursion_wh = trace.battery_excursion_wh();

    let battery_cost = cost::battery_cost(excursion_wh, battery.dod, battery.cost_per_wh)?;
    let cashflow =
        cost::battery_cashflow(battery_cost, battery.life_years, config.costs.horizon_years)?;
    let battery_npv = cost::npv(config.costs.discount_rate, &cashflow);
    let panel_cost = cost::panel_cost(root.x, panel_efficiency, config.costs.panel_cost_per_kw);
    let legp = sized_legp(&system, &load, excursion_wh)?;

    let report = SizingReport {
        label: config.label(),
        area_m2: root.x,
        panel_peak_kw: system.panel.peak_kw(),
        battery_size_kwh: excursion_wh / 1000.0,
        battery_cost,
        battery_npv,
        panel_cost,
        legp,
        solver_iterations: root.iterations,
        solver_residual_wh: root.residual,
    };
    info!(
        area_m2 = report.area_m2,
        battery_kwh = report.battery_size_kwh,
        battery_npv = report.battery_npv,
        "scenario sized"
    );

    Ok(SizingRun { report, trace })
}

/// Runs independent scenarios in parallel; results keep the input order.
pub fn run_batch(configs: &[ScenarioConfig]) -> Vec<Result<SizingRun, RunError>> {
    configs.par_iter().map(run_scenario).collect()
}

/// Expands `base` over every inverter × load × battery preset combination.
pub fn scenario_matrix(base: &ScenarioConfig) -> Vec<ScenarioConfig> {
    let mut configs = Vec::new();
    for inverter in InverterKind::ALL {
        for shape in LoadShape::ALL {
            for kind in BatteryKind::ALL {
                let mut cfg = base.clone();
                cfg.inverter.kind = inverter;
                cfg.load.shape = shape;
                cfg.battery = BatteryConfig::preset(kind);
                configs.push(cfg);
            }
        }
    }
    configs
}
