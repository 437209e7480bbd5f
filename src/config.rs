//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::devices::{BatteryKind, Curve, HardwareError, InverterKind, LoadShape};
use crate::sim::SolverOptions;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Customer load shape and daily energy.
    #[serde(default)]
    pub load: LoadConfig,
    /// Inverter preset.
    #[serde(default)]
    pub inverter: InverterConfig,
    /// Battery chemistry and cost parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Panel and irradiance parameters.
    #[serde(default)]
    pub panel: PanelConfig,
    /// Financial parameters.
    #[serde(default)]
    pub costs: CostConfig,
    /// Area solver policy.
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Simulation timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Timestamp of the first sample.
    pub start: NaiveDateTime,
    /// Number of samples (25 hourly samples cover one day inclusive of both midnights).
    pub steps: usize,
    /// Step length in hours.
    pub step_hours: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2012, 3, 23)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            steps: 25,
            step_hours: 1.0,
        }
    }
}

/// Customer load parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    pub shape: LoadShape,
    /// Energy the profile is normalised to (Wh per simulated period).
    pub daily_energy_wh: f64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            shape: LoadShape::Day,
            daily_energy_wh: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InverterConfig {
    pub kind: InverterKind,
}

impl Default for InverterConfig {
    fn default() -> Self {
        Self {
            kind: InverterKind::Typical,
        }
    }
}

/// Battery parameters. Unset fields fall back to the `kind` preset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    pub kind: BatteryKind,
    /// Discharge power (W) → efficiency control points, as `[[w, eff], ...]`.
    pub efficiency_curve: Option<Curve>,
    /// Depth of discharge (0.0–1.0].
    pub dod: Option<f64>,
    /// Replacement life in years.
    pub life_years: Option<u32>,
    /// Installed cost per Wh of nominal capacity.
    pub cost_per_wh: Option<f64>,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self::preset(BatteryKind::LeadAcid)
    }
}

impl BatteryConfig {
    /// A config that uses every parameter of the `kind` preset.
    pub fn preset(kind: BatteryKind) -> Self {
        Self {
            kind,
            efficiency_curve: None,
            dod: None,
            life_years: None,
            cost_per_wh: None,
        }
    }

    /// The configured efficiency curve, or the preset's.
    ///
    /// # Errors
    ///
    /// Fails only if the preset points are malformed.
    pub fn curve(&self) -> Result<Curve, HardwareError> {
        match &self.efficiency_curve {
            Some(curve) => Ok(curve.clone()),
            None => Curve::new(&self.kind.efficiency_points()),
        }
    }

    pub fn dod(&self) -> f64 {
        self.dod.unwrap_or_else(|| self.kind.depth_of_discharge())
    }

    pub fn life_years(&self) -> u32 {
        self.life_years.unwrap_or_else(|| self.kind.life_years())
    }

    pub fn cost_per_wh(&self) -> f64 {
        self.cost_per_wh.unwrap_or_else(|| self.kind.cost_per_wh())
    }
}

/// Panel and irradiance parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Conversion efficiency (0.0–1.0].
    pub efficiency: f64,
    /// Irradiance at solar noon (W/m²).
    pub peak_irradiance_w_m2: f64,
    pub sunrise_hour: f64,
    pub sunset_hour: f64,
    /// Multiplicative cloud noise standard deviation (0 = clear sky).
    pub cloud_noise_std: f64,
    pub seed: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            efficiency: 0.135,
            peak_irradiance_w_m2: 1000.0,
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            cloud_noise_std: 0.0,
            seed: 42,
        }
    }
}

/// Financial parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostConfig {
    pub discount_rate: f64,
    pub horizon_years: u32,
    /// Installed panel cost per peak kW.
    pub panel_cost_per_kw: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            discount_rate: crate::sim::cost::DEFAULT_DISCOUNT_RATE,
            horizon_years: crate::sim::cost::DEFAULT_HORIZON_YEARS,
            panel_cost_per_kw: 1000.0,
        }
    }
}

/// Area solver policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub initial_area_m2: f64,
    /// Accepted end-of-day battery energy error (Wh).
    pub tolerance_wh: f64,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let options = SolverOptions::default();
        Self {
            initial_area_m2: 4.0,
            tolerance_wh: options.tolerance,
            max_iterations: options.max_iterations,
        }
    }
}

impl SolverConfig {
    pub fn options(&self) -> SolverOptions {
        SolverOptions {
            tolerance: self.tolerance_wh,
            max_iterations: self.max_iterations,
            ..SolverOptions::default()
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: typical inverter, day load, lead-acid battery.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            load: LoadConfig::default(),
            inverter: InverterConfig::default(),
            battery: BatteryConfig::default(),
            panel: PanelConfig::default(),
            costs: CostConfig::default(),
            solver: SolverConfig::default(),
        }
    }

    /// Returns the night-lithium preset: evening load carried by a lithium-ion battery.
    pub fn night_lithium() -> Self {
        Self {
            load: LoadConfig {
                shape: LoadShape::Night,
                ..LoadConfig::default()
            },
            battery: BatteryConfig::preset(BatteryKind::LithiumIon),
            ..Self::baseline()
        }
    }

    /// Returns the continuous-flat preset: round-the-clock load on a flat inverter.
    pub fn continuous_flat() -> Self {
        Self {
            load: LoadConfig {
                shape: LoadShape::Continuous,
                ..LoadConfig::default()
            },
            inverter: InverterConfig {
                kind: InverterKind::Flat,
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "night_lithium", "continuous_flat"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "night_lithium" => Ok(Self::night_lithium()),
            "continuous_flat" => Ok(Self::continuous_flat()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Label used in report rows: `"<inverter> <load> <battery>"`.
    pub fn label(&self) -> String {
        format!(
            "{} {} {}",
            self.inverter.kind.label(),
            self.load.shape.label(),
            self.battery.kind.label()
        )
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.steps == 0 {
            errors.push(ConfigError::new("simulation.steps", "must be > 0"));
        }
        if !(s.step_hours.is_finite() && s.step_hours > 0.0) {
            errors.push(ConfigError::new("simulation.step_hours", "must be > 0"));
        }

        if !(self.load.daily_energy_wh.is_finite() && self.load.daily_energy_wh > 0.0) {
            errors.push(ConfigError::new("load.daily_energy_wh", "must be > 0"));
        }

        let bat = &self.battery;
        let dod = bat.dod();
        if !(dod > 0.0 && dod <= 1.0) {
            errors.push(ConfigError::new("battery.dod", "must be in (0.0, 1.0]"));
        }
        if bat.life_years() < 1 {
            errors.push(ConfigError::new("battery.life_years", "must be >= 1"));
        }
        if bat.cost_per_wh() < 0.0 {
            errors.push(ConfigError::new("battery.cost_per_wh", "must be >= 0"));
        }
        // Shape (non-empty, increasing power) is checked when the curve is parsed.
        match bat.curve() {
            Ok(curve) if curve.points().any(|(_, eff)| !(eff > 0.0 && eff <= 1.0)) => {
                errors.push(ConfigError::new(
                    "battery.efficiency_curve",
                    "efficiencies must be in (0.0, 1.0]",
                ));
            }
            Ok(_) => {}
            Err(e) => errors.push(ConfigError::new("battery.efficiency_curve", e.to_string())),
        }

        let p = &self.panel;
        if !(p.efficiency > 0.0 && p.efficiency <= 1.0) {
            errors.push(ConfigError::new("panel.efficiency", "must be in (0.0, 1.0]"));
        }
        if p.peak_irradiance_w_m2 < 0.0 {
            errors.push(ConfigError::new("panel.peak_irradiance_w_m2", "must be >= 0"));
        }
        if p.sunrise_hour >= p.sunset_hour {
            errors.push(ConfigError::new("panel.sunrise_hour", "must be < panel.sunset_hour"));
        }
        if !(0.0..=24.0).contains(&p.sunrise_hour) || !(0.0..=24.0).contains(&p.sunset_hour) {
            errors.push(ConfigError::new("panel.sunset_hour", "hours must be within [0, 24]"));
        }
        if p.cloud_noise_std < 0.0 {
            errors.push(ConfigError::new("panel.cloud_noise_std", "must be >= 0"));
        }

        let c = &self.costs;
        if c.discount_rate <= -1.0 {
            errors.push(ConfigError::new("costs.discount_rate", "must be > -1"));
        }
        if c.panel_cost_per_kw < 0.0 {
            errors.push(ConfigError::new("costs.panel_cost_per_kw", "must be >= 0"));
        }

        let sol = &self.solver;
        if !(sol.tolerance_wh > 0.0) {
            errors.push(ConfigError::new("solver.tolerance_wh", "must be > 0"));
        }
        if sol.max_iterations < 2 {
            errors.push(ConfigError::new("solver.max_iterations", "must be >= 2"));
        }
        if !sol.initial_area_m2.is_finite() {
            errors.push(ConfigError::new("solver.initial_area_m2", "must be finite"));
        }

        errors
    }
}
